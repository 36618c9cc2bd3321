use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod config;
pub mod error;
pub mod filter;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use config::{Config, DetectorConfig, FlannConfig, MatchConfig, OrbParams, RenderConfig, SiftParams};
pub use error::{CoreError, CoreResult};
pub use filter::{best_matches, ratio_test};

/// Decoded RGB raster together with the path it was read from
#[derive(Debug, Clone)]
pub struct Image {
    path: PathBuf,
    pixels: image::RgbImage,
}

impl Image {
    pub fn new(path: impl Into<PathBuf>, pixels: image::RgbImage) -> Self {
        Self {
            path: path.into(),
            pixels,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pixels(&self) -> &image::RgbImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Detected keypoint; `angle` is in degrees, -1 when the detector does not assign one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub angle: f32,
    pub response: f32,
    pub octave: i32,
}

impl Keypoint {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            size: 1.0,
            angle: -1.0,
            response: 0.0,
            octave: 0,
        }
    }
}

/// Element type of a descriptor row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// Packed bits compared with Hamming distance
    Binary,
    /// Floating point vectors compared with L2 distance
    Float,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorKind::Binary => write!(f, "binary"),
            DescriptorKind::Float => write!(f, "float"),
        }
    }
}

/// Row-major descriptor matrix, one row per keypoint
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptors {
    Binary { data: Vec<u8>, width: usize },
    Float { data: Vec<f32>, width: usize },
}

impl Descriptors {
    pub fn empty(kind: DescriptorKind, width: usize) -> Self {
        match kind {
            DescriptorKind::Binary => Descriptors::Binary {
                data: Vec::new(),
                width,
            },
            DescriptorKind::Float => Descriptors::Float {
                data: Vec::new(),
                width,
            },
        }
    }

    pub fn kind(&self) -> DescriptorKind {
        match self {
            Descriptors::Binary { .. } => DescriptorKind::Binary,
            Descriptors::Float { .. } => DescriptorKind::Float,
        }
    }

    /// Number of elements per row
    pub fn width(&self) -> usize {
        match self {
            Descriptors::Binary { width, .. } | Descriptors::Float { width, .. } => *width,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        let (elems, width) = match self {
            Descriptors::Binary { data, width } => (data.len(), *width),
            Descriptors::Float { data, width } => (data.len(), *width),
        };
        if width == 0 {
            0
        } else {
            elems / width
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keypoints and their descriptors for one image
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    keypoints: Vec<Keypoint>,
    descriptors: Descriptors,
}

impl FeatureSet {
    /// Pairs keypoints with descriptor rows; both sequences must have the same length
    pub fn new(keypoints: Vec<Keypoint>, descriptors: Descriptors) -> CoreResult<Self> {
        if keypoints.len() != descriptors.len() {
            return Err(CoreError::DescriptorCountMismatch {
                keypoints: keypoints.len(),
                descriptors: descriptors.len(),
            });
        }
        Ok(Self {
            keypoints,
            descriptors,
        })
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn descriptors(&self) -> &Descriptors {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// Correspondence between descriptor `query_idx` of image A and `train_idx` of image B
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: f32,
}

impl Match {
    pub fn new(query_idx: usize, train_idx: usize, distance: f32) -> Self {
        Self {
            query_idx,
            train_idx,
            distance,
        }
    }
}

/// Candidates for one query descriptor, nearest first
pub type Neighbors = Vec<Match>;

/// Feature detector selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorMethod {
    Sift,
    Orb,
}

impl DescriptorMethod {
    pub const ALL: [DescriptorMethod; 2] = [DescriptorMethod::Sift, DescriptorMethod::Orb];

    pub fn name(self) -> &'static str {
        match self {
            DescriptorMethod::Sift => "sift",
            DescriptorMethod::Orb => "orb",
        }
    }

    /// Descriptor element type the detector produces
    pub fn descriptor_kind(self) -> DescriptorKind {
        match self {
            DescriptorMethod::Sift => DescriptorKind::Float,
            DescriptorMethod::Orb => DescriptorKind::Binary,
        }
    }

    /// Row width of the descriptor matrix
    pub fn descriptor_width(self) -> usize {
        match self {
            DescriptorMethod::Sift => 128,
            DescriptorMethod::Orb => 32,
        }
    }
}

impl fmt::Display for DescriptorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DescriptorMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sift" => Ok(DescriptorMethod::Sift),
            "orb" => Ok(DescriptorMethod::Orb),
            _ => Err(CoreError::UnknownMethod(s.to_string())),
        }
    }
}

/// Descriptor matcher selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    BruteForce,
    Flann,
}

impl MatcherKind {
    pub const ALL: [MatcherKind; 2] = [MatcherKind::BruteForce, MatcherKind::Flann];

    pub fn name(self) -> &'static str {
        match self {
            MatcherKind::BruteForce => "bf",
            MatcherKind::Flann => "flann",
        }
    }

    /// Ratio-test threshold used in knn mode
    pub fn ratio(self, cfg: &MatchConfig) -> f32 {
        match self {
            MatcherKind::BruteForce => cfg.bf_ratio,
            MatcherKind::Flann => cfg.flann_ratio,
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatcherKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bf" => Ok(MatcherKind::BruteForce),
            "flann" => Ok(MatcherKind::Flann),
            _ => Err(CoreError::UnknownMatcher(s.to_string())),
        }
    }
}

/// Best-match (sorted, truncated) or k-nearest-neighbour with ratio test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Best,
    Knn,
}

impl MatchMode {
    pub fn from_knn_flag(knn: bool) -> Self {
        if knn {
            MatchMode::Knn
        } else {
            MatchMode::Best
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Best => write!(f, "best"),
            MatchMode::Knn => write!(f, "knn"),
        }
    }
}
