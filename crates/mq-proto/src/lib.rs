pub mod commands;
pub mod config;
pub mod error;
pub mod platform;
pub mod protocol;
pub mod state;

pub use error::{MpdError, ParseError};
pub use protocol::MpdClient;
pub use state::{PlayState, Snapshot, Song};
