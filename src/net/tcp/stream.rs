use mio::{Interest, Registry, Token};

use std::io::{self, Read, Write};
use std::net::SocketAddr;

pub struct TcpStream {
    mio: mio::net::TcpStream,

    /// Remote end, kept for diagnostics
    peer: SocketAddr,
}

impl TcpStream {
    pub(crate) fn new(mio: mio::net::TcpStream, peer: SocketAddr) -> TcpStream {
        TcpStream { mio, peer }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Register for edge-triggered read readiness. Mio always asks for
    /// hang-up and error notifications alongside.
    pub(crate) fn register(&mut self, registry: &Registry, token: Token) -> io::Result<()> {
        registry.register(&mut self.mio, token, Interest::READABLE)
    }

    pub(crate) fn deregister(&mut self, registry: &Registry) -> io::Result<()> {
        registry.deregister(&mut self.mio)
    }

    /// Read once into `buf`. Nothing being available yet is reported as zero
    /// bytes rather than an error.
    pub fn read_request(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.mio.read(buf) {
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            x => x,
        }
    }

    /// Write as much of `buf` as the socket accepts without blocking and
    /// return the number of bytes written.
    pub fn write_response(&mut self, mut buf: &[u8]) -> io::Result<usize> {
        let mut written = 0;

        while !buf.is_empty() {
            match self.mio.write(buf) {
                Ok(0) => {
                    return Err(io::ErrorKind::WriteZero.into());
                }
                Ok(n) => {
                    written += n;
                    buf = &buf[n..];
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }

        Ok(written)
    }
}
