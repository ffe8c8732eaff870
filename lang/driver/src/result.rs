use std::path::PathBuf;
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

use fortpeg_backend::result::BackendError;

pub type MainResult<T = ()> = Result<T, MainErrors>;

#[derive(Error, Diagnostic, Debug, Clone)]
#[error("The grammar could not be translated")]
pub struct MainErrors(#[related] pub Vec<MainError>);

impl<T: Into<MainError>> From<T> for MainErrors {
    fn from(value: T) -> Self {
        let err: MainError = value.into();
        MainErrors(vec![err])
    }
}

#[derive(Error, Diagnostic, Debug, Clone)]
#[error(transparent)]
#[diagnostic(transparent)]
pub enum MainError {
    Driver(#[from] DriverError),
    Backend(#[from] BackendError),
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum DriverError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] Arc<std::io::Error>),
    #[error("{} is not a valid grammar document: {message} (line {line}, column {column})", .path.display())]
    #[diagnostic(help("The document is the JSON encoding of a grammar and its action types."))]
    InvalidDocument { path: PathBuf, message: String, line: usize, column: usize },
    #[error("{} is not a valid configuration: {message}", .path.display())]
    #[diagnostic(help("Known keys are module_name, runtime_module, indent and width."))]
    InvalidConfig { path: PathBuf, message: String },
}

impl DriverError {
    pub(crate) fn io(err: std::io::Error) -> Self {
        DriverError::Io(Arc::new(err))
    }
}
