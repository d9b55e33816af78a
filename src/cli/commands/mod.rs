//! CLI command implementations

pub mod clean;
pub mod config;
pub mod exec;
pub mod resolve;
pub mod setup;
mod shared;

pub use clean::execute as clean;
pub use config::execute as config;
pub use exec::{pip, python};
pub use resolve::execute as resolve;
pub use setup::execute as setup;
