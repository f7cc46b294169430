pub mod codec;
pub mod error;
pub mod models;
pub mod parser;
pub mod serial;
pub mod service;

pub use error::SerialError;
pub use service::SensorService;
