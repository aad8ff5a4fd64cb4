pub mod cli;
pub mod config;
pub mod error;
pub mod net;
pub mod response;
pub mod runtime;

pub use config::Config;
pub use error::SetupError;
pub use runtime::{Runtime, Stats};
