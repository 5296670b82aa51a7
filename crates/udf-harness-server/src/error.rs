use std::net::SocketAddr;

/// Errors that can occur while starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
  /// The listener could not be bound.
  #[error("failed to bind {addr}: {source}")]
  Bind {
    addr: SocketAddr,
    #[source]
    source: std::io::Error,
  },

  /// The bound port could not be written to stdout.
  #[error("failed to announce port: {0}")]
  Announce(#[source] std::io::Error),

  /// The server stopped with an I/O error.
  #[error("server error: {0}")]
  Serve(#[source] std::io::Error),
}
