use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use udf_harness_config::ServerConfig;
use udf_harness_runtime::UdfExecutor;

use crate::error::ServerError;
use crate::router::router;

/// A bound, not yet serving, harness listener.
pub struct HarnessServer {
  listener: TcpListener,
  local_addr: SocketAddr,
}

impl HarnessServer {
  /// Bind the configured address. Port `0` picks a free port.
  pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
      .await
      .map_err(|source| ServerError::Bind { addr, source })?;
    let local_addr = listener
      .local_addr()
      .map_err(|source| ServerError::Bind { addr, source })?;

    Ok(Self {
      listener,
      local_addr,
    })
  }

  pub fn local_addr(&self) -> SocketAddr {
    self.local_addr
  }

  pub fn port(&self) -> u16 {
    self.local_addr.port()
  }

  /// Write the bound port as a single line and flush.
  pub fn announce_to(&self, mut writer: impl Write) -> Result<(), ServerError> {
    writeln!(writer, "{}", self.port()).map_err(ServerError::Announce)?;
    writer.flush().map_err(ServerError::Announce)
  }

  /// Serve until `cancel` fires.
  pub async fn run(
    self,
    executor: Arc<UdfExecutor>,
    cancel: CancellationToken,
  ) -> Result<(), ServerError> {
    info!(addr = %self.local_addr, "udf harness listening");

    axum::serve(self.listener, router(executor))
      .with_graceful_shutdown(cancel.cancelled_owned())
      .await
      .map_err(ServerError::Serve)?;

    info!("udf harness stopped");
    Ok(())
  }
}

/// Bind, announce the port on stdout, and serve until `cancel` fires.
///
/// The announcement bypasses logging entirely: stdout carries nothing but
/// the port line.
pub async fn serve(
  config: &ServerConfig,
  executor: Arc<UdfExecutor>,
  cancel: CancellationToken,
) -> Result<(), ServerError> {
  let server = HarnessServer::bind(config).await?;
  server.announce_to(std::io::stdout().lock())?;
  server.run(executor, cancel).await
}
