use thiserror::Error;

#[derive(Error, Debug)]
#[error("error in communication with CBase: {0}")]
pub struct CBaseError(pub String);

impl From<ureq::Error> for CBaseError {
    fn from(e: ureq::Error) -> CBaseError {
        CBaseError(format!("http request error: {}", e))
    }
}
impl From<std::io::Error> for CBaseError {
    fn from(e: std::io::Error) -> CBaseError {
        CBaseError(format!("offline forecast file error: {}", e))
    }
}
