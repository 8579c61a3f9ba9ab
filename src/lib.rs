pub mod extract;
pub mod handlers;
pub mod rank;

pub mod error;
pub mod types;
pub mod config;

pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use rank::{rank, Ranker};
