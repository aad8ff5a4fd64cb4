//! Errors raised while bringing the listener up.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// A fatal failure during listener setup. Each variant names the step that
/// failed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("socket: {0}")]
    Socket(#[source] io::Error),

    #[error("setsockopt SO_REUSEADDR: {0}")]
    ReuseAddr(#[source] io::Error),

    #[error("bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("listen: {0}")]
    Listen(#[source] io::Error),

    #[error("set non-blocking: {0}")]
    NonBlocking(#[source] io::Error),

    #[error("create poll: {0}")]
    Poll(#[source] io::Error),

    #[error("register listener: {0}")]
    Register(#[source] io::Error),
}

impl SetupError {
    /// The underlying OS error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            SetupError::Socket(e)
            | SetupError::ReuseAddr(e)
            | SetupError::Listen(e)
            | SetupError::NonBlocking(e)
            | SetupError::Poll(e)
            | SetupError::Register(e) => e,
            SetupError::Bind { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_step() {
        let err = SetupError::Bind {
            addr: "127.0.0.1:8083".parse().unwrap(),
            source: io::ErrorKind::AddrInUse.into(),
        };
        assert!(err.to_string().starts_with("bind 127.0.0.1:8083: "));
        assert_eq!(err.io_error().kind(), io::ErrorKind::AddrInUse);

        let err = SetupError::Listen(io::ErrorKind::Other.into());
        assert!(err.to_string().starts_with("listen: "));
    }
}
