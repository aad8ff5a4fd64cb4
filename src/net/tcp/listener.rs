use crate::config::Config;
use crate::error::SetupError;
use crate::net::TcpStream;

use mio::{Interest, Registry, Token};
use socket2::{Domain, Protocol, Socket, Type};

use std::io;
use std::net::SocketAddr;

pub struct TcpListener {
    /// Mio listener
    mio: mio::net::TcpListener,
}

impl TcpListener {
    /// Build the listening socket step by step so a failure can be reported
    /// against the step that caused it.
    pub fn bind(config: &Config) -> Result<TcpListener, SetupError> {
        let addr = config.addr;

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
            .map_err(SetupError::Socket)?;

        socket
            .set_reuse_address(true)
            .map_err(SetupError::ReuseAddr)?;

        socket
            .bind(&addr.into())
            .map_err(|source| SetupError::Bind { addr, source })?;

        socket.listen(config.backlog).map_err(SetupError::Listen)?;

        socket
            .set_nonblocking(true)
            .map_err(SetupError::NonBlocking)?;

        let listener: std::net::TcpListener = socket.into();
        Ok(TcpListener {
            mio: mio::net::TcpListener::from_std(listener),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.mio.local_addr()
    }

    /// Register for edge-triggered read readiness.
    pub(crate) fn register(&mut self, registry: &Registry, token: Token) -> io::Result<()> {
        registry.register(&mut self.mio, token, Interest::READABLE)
    }

    /// Accept one pending connection. The returned stream is already
    /// non-blocking.
    pub fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        let (mio, addr) = self.mio.accept()?;
        Ok((TcpStream::new(mio, addr), addr))
    }
}
