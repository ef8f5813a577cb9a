pub mod error;
pub mod ports;
pub mod services;

pub use error::GameError;
