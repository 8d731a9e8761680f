use thiserror::Error;

#[derive(Error, Debug)]
#[error("error writing to timescaledb: {0}")]
pub struct TimescaleError(pub String);

impl From<postgres::Error> for TimescaleError {
    fn from(e: postgres::Error) -> TimescaleError {
        TimescaleError(e.to_string())
    }
}
