//! Schema module - Keys, melodies, configuration and result types.

mod config;
mod evolution;
mod job;
mod key;
mod melody;

pub use config::*;
pub use evolution::*;
pub use job::*;
pub use key::*;
pub use melody::*;
