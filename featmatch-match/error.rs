use featmatch_core::{CoreError, DescriptorKind, DescriptorMethod};

#[derive(Debug)]
pub enum MatchError {
    Core(CoreError),
    Vision(opencv::Error),
    IncompatibleDescriptors { method: DescriptorMethod, found: DescriptorKind },
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchError::Core(e) => write!(f, "{}", e),
            MatchError::Vision(e) => write!(f, "OpenCV error during matching: {}", e),
            MatchError::IncompatibleDescriptors { method, found } => write!(
                f,
                "{} matching expects {} descriptors, got {}",
                method,
                method.descriptor_kind(),
                found
            ),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::Core(e) => Some(e),
            MatchError::Vision(e) => Some(e),
            MatchError::IncompatibleDescriptors { .. } => None,
        }
    }
}

impl From<CoreError> for MatchError {
    fn from(err: CoreError) -> Self {
        MatchError::Core(err)
    }
}

impl From<opencv::Error> for MatchError {
    fn from(err: opencv::Error) -> Self {
        MatchError::Vision(err)
    }
}

pub type MatchResult<T> = Result<T, MatchError>;
