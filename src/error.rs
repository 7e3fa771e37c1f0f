/// Errors reported by the driver. `E` is the error type of the underlying transport and is passed
/// through unchanged in [`Error::Bus`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error<E> {
    #[error("i2c bus error: {0:?}")]
    Bus(E),

    /// The requested transfer doesn't fit the word protocol (e.g. too many words for one read).
    #[error("malformed data")]
    BadData,

    #[error("checksum mismatch in data received from the sensor")]
    Crc,

    #[error("unexpected response from the i2c device")]
    UnknownDevice,

    /// Only returned with strict timing enabled, when a measurement result is requested before the
    /// sensor can have finished converting.
    #[error("measurement not ready")]
    NotReady,
}

pub type Result<T, E> = std::result::Result<T, Error<E>>;
