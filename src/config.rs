use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 8083;

const DEFAULT_READ_BUFFER: usize = 4096;
const DEFAULT_EVENTS_CAPACITY: usize = 1024;

/// Listener and event loop settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the listening socket binds to
    pub addr: SocketAddr,

    /// Backlog passed to `listen(2)`
    pub backlog: i32,

    /// Size of the single read performed per connection. The whole buffer is
    /// read into, so the default consumes at most 4096 request bytes.
    pub read_buffer: usize,

    /// Max number of readiness events returned by one wait
    pub events_capacity: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            backlog: libc::SOMAXCONN,
            read_buffer: DEFAULT_READ_BUFFER,
            events_capacity: DEFAULT_EVENTS_CAPACITY,
        }
    }
}

impl Config {
    pub fn with_addr(mut self, addr: SocketAddr) -> Config {
        self.addr = addr;
        self
    }
}
