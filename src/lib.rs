//! need-a-number - random numbers behind blocking and non-blocking delays

pub mod config;
pub mod error;
pub mod number;

pub mod dispatch;
pub mod api;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};
pub use number::{draw, Variant, NUMBER_MAX, NUMBER_MIN, NUMBER_RANGE};
