use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("spi error: {0}")]
    Spi(String),
    #[error("ranging timeout: no echo")]
    EchoTimeout,
    #[error("ranging out of range")]
    OutOfRange,
    #[error("adc channel {0} does not exist")]
    InvalidChannel(u8),
}

pub type Result<T> = std::result::Result<T, HwError>;
