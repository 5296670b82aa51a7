use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, info, instrument};

use crate::error::ClientError;

/// A running harness child process and the port it announced.
///
/// The child is killed when this handle is dropped.
#[derive(Debug)]
pub struct HarnessProcess {
  child: Child,
  port: u16,
}

impl HarnessProcess {
  /// Spawn `command` and wait for it to print its port.
  ///
  /// Lines that do not parse as a port are skipped and kept for the error
  /// reported if stdout closes first.
  #[instrument(name = "harness_spawn", skip(command))]
  pub async fn spawn(mut command: Command) -> Result<Self, ClientError> {
    command
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .kill_on_drop(true);

    let mut child = command
      .spawn()
      .map_err(|source| ClientError::Spawn { source })?;
    let Some(stdout) = child.stdout.take() else {
      return Err(ClientError::SpawnFailed {
        output: String::new(),
      });
    };

    let mut lines = BufReader::new(stdout).lines();
    let mut skipped = Vec::new();

    while let Some(line) = lines
      .next_line()
      .await
      .map_err(|source| ClientError::Output { source })?
    {
      if let Some(port) = parse_port_line(&line) {
        info!(port, "harness announced port");
        drain(lines.into_inner());
        return Ok(Self { child, port });
      }
      debug!(%line, "skipping harness output");
      skipped.push(line);
    }

    Err(ClientError::SpawnFailed {
      output: skipped.join("\n"),
    })
  }

  pub fn port(&self) -> u16 {
    self.port
  }

  pub fn id(&self) -> Option<u32> {
    self.child.id()
  }

  /// Kill the harness and wait for it to exit.
  pub async fn shutdown(mut self) -> std::io::Result<()> {
    self.child.kill().await
  }
}

/// Parse a stdout line as the announced port.
pub fn parse_port_line(line: &str) -> Option<u16> {
  line.trim().parse().ok()
}

/// Keep reading stdout so the child never blocks on a full pipe.
fn drain(stdout: BufReader<ChildStdout>) {
  tokio::spawn(async move {
    let mut lines = stdout.lines();
    while let Ok(Some(line)) = lines.next_line().await {
      debug!(%line, "harness stdout");
    }
  });
}
