use std::io::{self, Read};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use udf_harness_client::{HarnessProcess, merge_telemetry, wait_until_ready};
use udf_harness_config::HarnessConfig;
use udf_harness_protocol::InvokeRequest;
use udf_harness_runtime::UdfExecutor;

mod resolvers;

use resolvers::BundledResolver;

/// UDF Harness - run a resolver behind a local HTTP endpoint
#[derive(Parser)]
#[command(name = "udf-harness")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to a JSON config file
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Serve a resolver and print the bound port on stdout
  Serve {
    /// Resolver to serve
    #[arg(long, value_enum)]
    resolver: BundledResolver,

    /// Interface to bind (overrides the config file)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to bind, 0 for any free port (overrides the config file)
    #[arg(long)]
    port: Option<u16>,
  },

  /// Spawn a harness, invoke it once with the envelope read from stdin
  Invoke {
    /// Resolver to invoke
    #[arg(long, value_enum)]
    resolver: BundledResolver,
  },
}

fn main() -> Result<()> {
  init_tracing();

  let cli = Cli::parse();
  let config = load_config(cli.config.as_deref())?;

  match cli.command {
    Some(Commands::Serve {
      resolver,
      host,
      port,
    }) => {
      let mut config = config;
      if let Some(host) = host {
        config.server.host = host;
      }
      if let Some(port) = port {
        config.server.port = port;
      }
      serve(resolver, config)?;
    }
    Some(Commands::Invoke { resolver }) => {
      invoke(resolver, config, cli.config)?;
    }
    None => {
      eprintln!("udf-harness - use --help to see available commands");
    }
  }

  Ok(())
}

/// Logs go to stderr; stdout is reserved for the port line and results.
fn init_tracing() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "udf_harness=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .init();
}

fn load_config(path: Option<&Path>) -> Result<HarnessConfig> {
  match path {
    Some(path) => HarnessConfig::from_file(path)
      .with_context(|| format!("failed to load config: {}", path.display())),
    None => Ok(HarnessConfig::default()),
  }
}

fn serve(resolver: BundledResolver, config: HarnessConfig) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { serve_async(resolver, config).await })
}

async fn serve_async(resolver: BundledResolver, config: HarnessConfig) -> Result<()> {
  info!(resolver = resolver.name(), "starting udf harness");

  let executor = Arc::new(UdfExecutor::new(resolver.build()));

  let cancel = CancellationToken::new();
  let on_signal = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      info!("interrupted, shutting down");
    }
    on_signal.cancel();
  });

  udf_harness_server::serve(&config.server, executor, cancel)
    .await
    .context("udf harness server failed")
}

fn invoke(
  resolver: BundledResolver,
  config: HarnessConfig,
  config_path: Option<PathBuf>,
) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { invoke_async(resolver, config, config_path).await })
}

async fn invoke_async(
  resolver: BundledResolver,
  config: HarnessConfig,
  config_path: Option<PathBuf>,
) -> Result<()> {
  // Read payload from stdin
  let payload = read_payload_from_stdin()?;
  let request: InvokeRequest =
    serde_json::from_value(payload).context("payload is not an invocation envelope")?;

  // Spawn a harness serving the same resolver
  let exe = std::env::current_exe().context("could not locate the udf-harness binary")?;
  let mut command = tokio::process::Command::new(exe);
  if let Some(path) = &config_path {
    command.arg("--config").arg(path);
  }
  command.args(["serve", "--resolver", resolver.name()]);

  let process = HarnessProcess::spawn(command)
    .await
    .context("failed to start udf harness")?;
  let client = wait_until_ready(process.port(), &config.readiness)
    .await
    .context("udf harness did not become ready")?;

  let response = client
    .invoke(&request)
    .await
    .context("invocation failed")?;

  for event in merge_telemetry(&response) {
    eprintln!("{event}");
  }

  println!("{}", serde_json::to_string_pretty(&response.value)?);

  process
    .shutdown()
    .await
    .context("failed to stop udf harness")?;

  Ok(())
}

fn read_payload_from_stdin() -> Result<serde_json::Value> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    // No stdin pipe, use empty object
    Ok(serde_json::json!({}))
  } else {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("failed to read payload from stdin")?;

    if input.trim().is_empty() {
      Ok(serde_json::json!({}))
    } else {
      serde_json::from_str(&input).context("failed to parse payload JSON from stdin")
    }
  }
}
