use std::path::{Path, PathBuf};

use featmatch_core::{DescriptorMethod, FeatureSet, Match, MatchMode, MatcherKind};
use serde::Serialize;

use crate::error::{CliError, CliResult};

/// Machine-readable summary of one run
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub image1: PathBuf,
    pub image2: PathBuf,
    pub method: String,
    pub matcher: String,
    pub mode: String,
    pub keypoints1: usize,
    pub keypoints2: usize,
    pub matches: Vec<MatchEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchEntry {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: f32,
    pub from: [f32; 2],
    pub to: [f32; 2],
}

impl MatchReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        image1: &Path,
        image2: &Path,
        method: DescriptorMethod,
        matcher: MatcherKind,
        mode: MatchMode,
        features1: &FeatureSet,
        features2: &FeatureSet,
        matches: &[Match],
    ) -> Self {
        let entries = matches
            .iter()
            .filter_map(|m| {
                let a = features1.keypoints().get(m.query_idx)?;
                let b = features2.keypoints().get(m.train_idx)?;
                Some(MatchEntry {
                    query_idx: m.query_idx,
                    train_idx: m.train_idx,
                    distance: m.distance,
                    from: [a.x, a.y],
                    to: [b.x, b.y],
                })
            })
            .collect();

        Self {
            image1: image1.to_path_buf(),
            image2: image2.to_path_buf(),
            method: method.to_string(),
            matcher: matcher.to_string(),
            mode: mode.to_string(),
            keypoints1: features1.len(),
            keypoints2: features2.len(),
            matches: entries,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> CliResult<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
