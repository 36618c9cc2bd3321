#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    UnknownMethod(String),
    UnknownMatcher(String),
    DescriptorCountMismatch { keypoints: usize, descriptors: usize },
    InvalidConfig(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::UnknownMethod(name) => write!(f, "Method '{}' not found", name),
            CoreError::UnknownMatcher(name) => write!(f, "Matcher '{}' not found", name),
            CoreError::DescriptorCountMismatch { keypoints, descriptors } => {
                write!(f, "Keypoint/descriptor count mismatch: {} keypoints, {} descriptor rows", keypoints, descriptors)
            }
            CoreError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for CoreError {}

pub type CoreResult<T> = Result<T, CoreError>;
