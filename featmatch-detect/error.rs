use featmatch_core::{CoreError, DescriptorMethod};

#[derive(Debug)]
pub enum DetectError {
    Core(CoreError),
    Vision(opencv::Error),
    UnexpectedDescriptorType { method: DescriptorMethod, cv_type: i32 },
}

impl std::fmt::Display for DetectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectError::Core(e) => write!(f, "{}", e),
            DetectError::Vision(e) => write!(f, "OpenCV error during detection: {}", e),
            DetectError::UnexpectedDescriptorType { method, cv_type } => {
                write!(f, "Unexpected descriptor matrix type {} from {} detector", cv_type, method)
            }
        }
    }
}

impl std::error::Error for DetectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DetectError::Core(e) => Some(e),
            DetectError::Vision(e) => Some(e),
            DetectError::UnexpectedDescriptorType { .. } => None,
        }
    }
}

impl From<CoreError> for DetectError {
    fn from(err: CoreError) -> Self {
        DetectError::Core(err)
    }
}

impl From<opencv::Error> for DetectError {
    fn from(err: opencv::Error) -> Self {
        DetectError::Vision(err)
    }
}

pub type DetectResult<T> = Result<T, DetectError>;
