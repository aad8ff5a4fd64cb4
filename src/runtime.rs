pub(crate) mod io;
use io::{Driver, Ready, LISTENER};

use crate::config::Config;
use crate::error::SetupError;
use crate::net::{TcpListener, TcpStream};
use crate::response::RESPONSE;

use mio::Token;
use slab::Slab;
use std::net::SocketAddr;
use std::time::Duration;

const INITIAL_CONNECTIONS_CAPACITY: usize = 256;

/// Single-threaded accept/respond/close loop.
///
/// Owns the poll instance, the listening socket and every accepted
/// connection. A connection lives in the slab from accept until the first
/// readiness event for it, which either answers and closes it or, on
/// hang-up, closes it silently.
pub struct Runtime {
    driver: Driver,

    listener: TcpListener,

    /// Accepted connections, keyed by their mio token
    connections: Slab<TcpStream>,

    /// Ready set of the current turn
    ready: Vec<Ready>,

    /// Scratch space for the single read per connection
    buf: Vec<u8>,

    stats: Stats,
}

/// Connection counters since the runtime was bound.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub accepted: u64,

    /// Connections the whole response was written to
    pub responded: u64,

    /// Connections closed on hang-up or error before anything was read
    pub hung_up: u64,

    /// Connections dropped after a failed registration, read or write, or
    /// closed after a short write
    pub abandoned: u64,
}

impl Stats {
    fn record_write(&mut self, written: &std::io::Result<usize>) {
        match written {
            Ok(n) if *n == RESPONSE.len() => self.responded += 1,
            _ => self.abandoned += 1,
        }
    }
}

impl Runtime {
    /// Bind the listener and register it with a fresh poll instance.
    pub fn bind(config: &Config) -> Result<Runtime, SetupError> {
        let mut listener = TcpListener::bind(config)?;

        let driver = io::driver(config.events_capacity).map_err(SetupError::Poll)?;

        listener
            .register(driver.registry(), LISTENER)
            .map_err(SetupError::Register)?;

        Ok(Runtime {
            driver,
            listener,
            connections: Slab::with_capacity(INITIAL_CONNECTIONS_CAPACITY),
            ready: Vec::with_capacity(config.events_capacity),
            buf: vec![0; config.read_buffer],
            stats: Stats::default(),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Number of accepted connections still waiting for a readiness event
    pub fn open_connections(&self) -> usize {
        self.connections.len()
    }

    /// Serve forever. Only returns when waiting for events fails.
    pub fn run(&mut self) -> std::io::Result<()> {
        loop {
            self.turn(None)?;
        }
    }

    /// Wait once for events, with an optional timeout, and handle the whole
    /// ready set.
    pub fn turn(&mut self, timeout: Option<Duration>) -> std::io::Result<()> {
        let mut ready = std::mem::take(&mut self.ready);
        ready.clear();

        let res = self.driver.park(timeout, &mut ready);
        if res.is_ok() {
            for event in &ready {
                self.dispatch(event);
            }
        }

        self.ready = ready;
        res
    }

    fn dispatch(&mut self, event: &Ready) {
        if event.token == LISTENER {
            self.accept_all();
        } else if event.closed {
            self.hang_up(event.token);
        } else if event.readable {
            self.respond(event.token);
        }
    }

    /// Edge-triggered: the listener only fires once per edge, so keep
    /// accepting until the queue is empty.
    fn accept_all(&mut self) {
        loop {
            let (stream, peer) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => return,
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    return;
                }
            };

            self.stats.accepted += 1;

            match io::register(self.driver.registry(), &mut self.connections, stream) {
                Ok(token) => tracing::trace!(%peer, token = token.0, "accepted"),
                Err(e) => {
                    self.stats.abandoned += 1;
                    tracing::warn!(%peer, error = %e, "registering connection failed");
                }
            }
        }
    }

    fn hang_up(&mut self, token: Token) {
        if let Some(stream) = io::deregister(self.driver.registry(), &mut self.connections, token) {
            self.stats.hung_up += 1;
            tracing::trace!(peer = %stream.peer_addr(), "hung up");
        }
    }

    /// One read, one response, close. The request content is never looked
    /// at and a read that finds nothing still gets answered.
    fn respond(&mut self, token: Token) {
        let mut stream =
            match io::deregister(self.driver.registry(), &mut self.connections, token) {
                Some(stream) => stream,
                None => return,
            };
        let peer = stream.peer_addr();

        if let Err(e) = stream.read_request(&mut self.buf) {
            self.stats.abandoned += 1;
            tracing::warn!(%peer, error = %e, "read failed");
            return;
        }

        let written = stream.write_response(RESPONSE);
        match written {
            Ok(n) if n == RESPONSE.len() => {
                tracing::trace!(%peer, "responded");
            }
            Ok(n) => {
                tracing::warn!(%peer, written = n, len = RESPONSE.len(), "short write");
            }
            Err(ref e) => {
                tracing::warn!(%peer, error = %e, "write failed");
            }
        }
        self.stats.record_write(&written);
    }
}
