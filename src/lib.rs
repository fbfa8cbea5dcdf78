pub mod aggregate;
mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod sample;
#[cfg(test)]
mod test;
mod utils;

pub use api::{Mode, TEST_MODE_ENV};
pub use config::Config;
pub use error::Error;
pub use error::Result;
