use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tokio_util::codec::FramedRead;
use tracing::info;

use super::{codec::LineCodec, error::SerialError};

/// Line stream read from the station's serial port.
pub type SerialLines = FramedRead<SerialStream, LineCodec>;

/// Open `path` (8N1, no flow control) and frame it into text lines.
///
/// Not retried: a missing device is reported to the caller straight away.
pub fn open(path: &str, baud_rate: u32) -> Result<SerialLines, SerialError> {
    let stream = tokio_serial::new(path, baud_rate)
        .data_bits(tokio_serial::DataBits::Eight)
        .parity(tokio_serial::Parity::None)
        .stop_bits(tokio_serial::StopBits::One)
        .flow_control(tokio_serial::FlowControl::None)
        .open_native_async()
        .map_err(|source| SerialError::Open {
            path: path.to_owned(),
            baud_rate,
            source,
        })?;

    info!(path = %path, baud_rate, "Serial port opened");
    Ok(FramedRead::new(stream, LineCodec::default()))
}
