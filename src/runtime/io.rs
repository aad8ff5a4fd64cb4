use crate::net::TcpStream;

use mio::event::Event;
use mio::{Registry, Token};
use slab::Slab;
use std::io;
use std::time::Duration;

/// Token of the listening socket. Slab keys never reach it, so every other
/// token names a client connection.
pub(crate) const LISTENER: Token = Token(usize::MAX);

/// Used by the runtime to wait for I/O events
pub(crate) struct Driver {
    /// The system event queue
    mio: mio::Poll,

    /// Used to receive events from `Poll`
    events: mio::Events,
}

/// Readiness of one token, copied out of the event buffer so the runtime can
/// mutate its connections while walking the ready set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ready {
    pub(crate) token: Token,
    pub(crate) readable: bool,
    pub(crate) closed: bool,
}

pub(crate) fn driver(events_capacity: usize) -> io::Result<Driver> {
    Ok(Driver {
        mio: mio::Poll::new()?,
        events: mio::Events::with_capacity(events_capacity),
    })
}

impl Driver {
    pub(crate) fn registry(&self) -> &Registry {
        self.mio.registry()
    }

    /// Block until at least one event arrives or `timeout` elapses, then
    /// append the ready set to `ready`.
    pub(crate) fn park(&mut self, timeout: Option<Duration>, ready: &mut Vec<Ready>) -> io::Result<()> {
        loop {
            match self.mio.poll(&mut self.events, timeout) {
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
                Ok(()) => break,
            }
        }

        ready.extend(self.events.iter().map(Ready::from_event));
        Ok(())
    }
}

impl Ready {
    fn from_event(event: &Event) -> Ready {
        Ready {
            token: event.token(),
            readable: event.is_readable(),
            closed: event.is_read_closed() || event.is_error(),
        }
    }
}

/// Store `stream` in the slab and register it under its slot key.
pub(crate) fn register(
    registry: &Registry,
    connections: &mut Slab<TcpStream>,
    mut stream: TcpStream,
) -> io::Result<Token> {
    // Reserve a new slot for the new connection. We will be using the key as
    // the mio token.
    let entry = connections.vacant_entry();
    let token = Token(entry.key());

    // On failure the stream is dropped here, which closes it.
    stream.register(registry, token)?;

    entry.insert(stream);
    Ok(token)
}

/// Remove the connection behind `token` and deregister it. The stream is
/// handed back so the caller decides when it closes.
pub(crate) fn deregister(
    registry: &Registry,
    connections: &mut Slab<TcpStream>,
    token: Token,
) -> Option<TcpStream> {
    let mut stream = connections.try_remove(token.0)?;

    if let Err(e) = stream.deregister(registry) {
        tracing::warn!(peer = %stream.peer_addr(), error = %e, "deregister failed");
    }

    Some(stream)
}
