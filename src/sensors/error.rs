use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerialError {
    /// The device could not be opened at startup.
    #[error("could not open serial port {path} at {baud_rate} baud")]
    Open {
        path: String,
        baud_rate: u32,
        #[source]
        source: tokio_serial::Error,
    },

    /// Reading from an open port failed.
    #[error("serial port I/O failure")]
    Io(#[from] io::Error),
}
