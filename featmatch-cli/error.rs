use std::path::PathBuf;

use featmatch_core::CoreError;
use featmatch_detect::DetectError;
use featmatch_match::MatchError;

#[derive(Debug)]
pub enum CliError {
    InvalidPath(PathBuf),
    DecodeFailure { path: PathBuf, source: image::ImageError },
    Core(CoreError),
    Detect(DetectError),
    Match(MatchError),
    Display(opencv::Error),
    Io { path: PathBuf, source: std::io::Error },
    Save { path: PathBuf, source: image::ImageError },
    Report(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::InvalidPath(path) if path.as_os_str().is_empty() => write!(f, "Empty path to the image"),
            CliError::InvalidPath(path) => write!(f, "Incorrect path to the image: {}", path.display()),
            CliError::DecodeFailure { path, source } => {
                write!(f, "Cannot decode image {}: {}", path.display(), source)
            }
            CliError::Core(e) => write!(f, "{}", e),
            CliError::Detect(e) => write!(f, "{}", e),
            CliError::Match(e) => write!(f, "{}", e),
            CliError::Display(e) => write!(f, "Cannot display result: {}", e),
            CliError::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            CliError::Save { path, source } => write!(f, "Cannot save image {}: {}", path.display(), source),
            CliError::Report(e) => write!(f, "Cannot serialize match report: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::InvalidPath(_) => None,
            CliError::DecodeFailure { source, .. } => Some(source),
            CliError::Core(e) => Some(e),
            CliError::Detect(e) => Some(e),
            CliError::Match(e) => Some(e),
            CliError::Display(e) => Some(e),
            CliError::Io { source, .. } => Some(source),
            CliError::Save { source, .. } => Some(source),
            CliError::Report(e) => Some(e),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Core(err)
    }
}

impl From<DetectError> for CliError {
    fn from(err: DetectError) -> Self {
        CliError::Detect(err)
    }
}

impl From<MatchError> for CliError {
    fn from(err: MatchError) -> Self {
        CliError::Match(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Report(err)
    }
}

pub type CliResult<T> = Result<T, CliError>;
