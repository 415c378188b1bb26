use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(&'static str),
    #[error("Requested {requested} stations, at most {max} are allowed")]
    TooManyStations { requested: usize, max: usize },
    #[error("Station {index} is out of range ({len} stations)")]
    StationOutOfRange { index: usize, len: usize },
    #[error("Not a digit: {0:?}")]
    InvalidDigit(char),
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),
}

pub type SessionResult<T> = Result<T, SessionError>;
