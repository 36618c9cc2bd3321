use crate::error::{CoreError, CoreResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete run configuration; every section falls back to its defaults
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Config {
    pub matching: MatchConfig,
    pub flann: FlannConfig,
    pub detector: DetectorConfig,
    pub render: RenderConfig,
}

/// Selection rules applied to raw matcher output
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MatchConfig {
    /// Matches kept in best-match mode
    pub max_drawn_matches: usize,
    /// Ratio-test threshold for the brute-force matcher
    pub bf_ratio: f32,
    /// Ratio-test threshold for the FLANN matcher
    pub flann_ratio: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_drawn_matches: 20,
            bf_ratio: 0.75,
            flann_ratio: 0.7,
        }
    }
}

/// Index and search parameters for the FLANN matcher
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct FlannConfig {
    pub lsh_table_number: i32,
    pub lsh_key_size: i32,
    pub lsh_multi_probe_level: i32,
    pub kdtree_trees: i32,
    pub checks: i32,
}

impl Default for FlannConfig {
    fn default() -> Self {
        Self {
            lsh_table_number: 6,
            lsh_key_size: 12,
            lsh_multi_probe_level: 1,
            kdtree_trees: 5,
            checks: 50,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DetectorConfig {
    pub orb: OrbParams,
    pub sift: SiftParams,
}

/// ORB construction parameters, defaults match OpenCV's
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct OrbParams {
    pub n_features: i32,
    pub scale_factor: f32,
    pub n_levels: i32,
    pub edge_threshold: i32,
    pub first_level: i32,
    pub wta_k: i32,
    pub patch_size: i32,
    pub fast_threshold: i32,
}

impl Default for OrbParams {
    fn default() -> Self {
        Self {
            n_features: 500,
            scale_factor: 1.2,
            n_levels: 8,
            edge_threshold: 31,
            first_level: 0,
            wta_k: 2,
            patch_size: 31,
            fast_threshold: 20,
        }
    }
}

/// SIFT construction parameters, defaults match OpenCV's
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SiftParams {
    /// 0 keeps every detected feature
    pub n_features: i32,
    pub n_octave_layers: i32,
    pub contrast_threshold: f64,
    pub edge_threshold: f64,
    pub sigma: f64,
}

impl Default for SiftParams {
    fn default() -> Self {
        Self {
            n_features: 0,
            n_octave_layers: 3,
            contrast_threshold: 0.04,
            edge_threshold: 10.0,
            sigma: 1.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct RenderConfig {
    pub keypoint_radius: i32,
    pub window_title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            keypoint_radius: 4,
            window_title: "featmatch".to_string(),
        }
    }
}

fn invalid(msg: impl Into<String>) -> CoreError {
    CoreError::InvalidConfig(msg.into())
}

impl Config {
    /// Validate every section
    pub fn validate(&self) -> CoreResult<()> {
        self.matching.validate()?;
        self.flann.validate()?;
        self.detector.validate()?;
        if self.render.keypoint_radius < 0 {
            return Err(invalid(format!(
                "render.keypoint_radius must be >= 0, got {}",
                self.render.keypoint_radius
            )));
        }
        if self.render.window_title.trim().is_empty() {
            return Err(invalid("render.window_title must not be empty"));
        }
        Ok(())
    }

    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        format!(
            "Config: top={}, bf_ratio={}, flann_ratio={}, lsh=({}, {}, {}), kdtree_trees={}, checks={}",
            self.matching.max_drawn_matches,
            self.matching.bf_ratio,
            self.matching.flann_ratio,
            self.flann.lsh_table_number,
            self.flann.lsh_key_size,
            self.flann.lsh_multi_probe_level,
            self.flann.kdtree_trees,
            self.flann.checks
        )
    }

    /// Deserialize from a TOML string and validate
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl MatchConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_drawn_matches == 0 {
            return Err(invalid("matching.max_drawn_matches must be > 0"));
        }
        for (name, ratio) in [("bf_ratio", self.bf_ratio), ("flann_ratio", self.flann_ratio)] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(invalid(format!("matching.{} must be in (0, 1], got {}", name, ratio)));
            }
        }
        Ok(())
    }
}

impl FlannConfig {
    pub fn validate(&self) -> CoreResult<()> {
        let fields = [
            ("lsh_table_number", self.lsh_table_number),
            ("lsh_key_size", self.lsh_key_size),
            ("kdtree_trees", self.kdtree_trees),
            ("checks", self.checks),
        ];
        for (name, value) in fields {
            if value <= 0 {
                return Err(invalid(format!("flann.{} must be > 0, got {}", name, value)));
            }
        }
        if self.lsh_multi_probe_level < 0 {
            return Err(invalid(format!(
                "flann.lsh_multi_probe_level must be >= 0, got {}",
                self.lsh_multi_probe_level
            )));
        }
        Ok(())
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> CoreResult<()> {
        let orb = &self.orb;
        let positive = [
            ("n_features", orb.n_features),
            ("n_levels", orb.n_levels),
            ("edge_threshold", orb.edge_threshold),
            ("patch_size", orb.patch_size),
            ("fast_threshold", orb.fast_threshold),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(invalid(format!("detector.orb.{} must be > 0, got {}", name, value)));
            }
        }
        if orb.first_level < 0 {
            return Err(invalid(format!("detector.orb.first_level must be >= 0, got {}", orb.first_level)));
        }
        if orb.scale_factor <= 1.0 {
            return Err(invalid(format!("detector.orb.scale_factor must be > 1, got {}", orb.scale_factor)));
        }
        if !(2..=4).contains(&orb.wta_k) {
            return Err(invalid(format!("detector.orb.wta_k must be 2, 3 or 4, got {}", orb.wta_k)));
        }
        let sift = &self.sift;
        if sift.n_features < 0 || sift.n_octave_layers <= 0 {
            return Err(invalid("detector.sift n_features must be >= 0 and n_octave_layers > 0"));
        }
        for (name, value) in [
            ("contrast_threshold", sift.contrast_threshold),
            ("edge_threshold", sift.edge_threshold),
            ("sigma", sift.sigma),
        ] {
            if value <= 0.0 {
                return Err(invalid(format!("detector.sift.{} must be > 0, got {}", name, value)));
            }
        }
        Ok(())
    }
}
