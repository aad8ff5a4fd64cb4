use clap::Parser;

use std::net::{IpAddr, SocketAddr};

use crate::config::{Config, DEFAULT_PORT};

/// Fixed-response HTTP server for connection throughput benchmarks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Listen backlog, defaults to SOMAXCONN
    #[arg(long)]
    pub backlog: Option<i32>,

    /// Bytes read from each connection before responding
    #[arg(long = "read-buffer")]
    pub read_buffer: Option<usize>,

    /// Readiness events fetched per wait
    #[arg(long)]
    pub events: Option<usize>,
}

impl Cli {
    pub fn into_config(self) -> Config {
        let mut config = Config::default().with_addr(SocketAddr::new(self.host, self.port));

        if let Some(backlog) = self.backlog {
            config.backlog = backlog;
        }
        if let Some(read_buffer) = self.read_buffer {
            config.read_buffer = read_buffer.max(1);
        }
        if let Some(events) = self.events {
            config.events_capacity = events.max(1);
        }

        config
    }
}
