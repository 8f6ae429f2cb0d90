pub mod config;
pub mod error;
pub mod scope;

pub use config::Config;
pub use error::HearthError;
