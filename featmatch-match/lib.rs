use featmatch_core::{
    best_matches, ratio_test, Config, DescriptorMethod, FeatureSet, FlannConfig, Match, MatchMode, MatcherKind,
    Neighbors,
};
use featmatch_detect::convert::descriptors_to_mat;
use log::{debug, warn};
use opencv::core::{self, DMatch, Mat, Ptr, Vector};
use opencv::features2d::{BFMatcher, FlannBasedMatcher};
use opencv::flann::{IndexParams, KDTreeIndexParams, LshIndexParams, SearchParams};
use opencv::prelude::*;

pub mod error;

pub use error::{MatchError, MatchResult};

/// Distance used to compare descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Norm {
    Hamming,
    L2,
}

impl Norm {
    pub fn for_method(method: DescriptorMethod) -> Self {
        match method {
            DescriptorMethod::Orb => Norm::Hamming,
            DescriptorMethod::Sift => Norm::L2,
        }
    }

    fn cv_norm(self) -> i32 {
        match self {
            Norm::Hamming => core::NORM_HAMMING,
            Norm::L2 => core::NORM_L2,
        }
    }
}

/// FLANN index structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Locality-sensitive hashing, for binary descriptors
    Lsh,
    /// Randomized KD-trees, for float descriptors
    KdTree,
}

impl IndexKind {
    pub fn for_method(method: DescriptorMethod) -> Self {
        match method {
            DescriptorMethod::Orb => IndexKind::Lsh,
            DescriptorMethod::Sift => IndexKind::KdTree,
        }
    }
}

/// Constructed OpenCV matcher
pub enum Backend {
    BruteForce { norm: Norm, matcher: BFMatcher },
    Flann { index: IndexKind, matcher: FlannBasedMatcher },
}

fn flann_index_params(index: IndexKind, cfg: &FlannConfig) -> opencv::Result<Ptr<IndexParams>> {
    let params: Ptr<IndexParams> = match index {
        IndexKind::Lsh => Ptr::new(LshIndexParams::new(
            cfg.lsh_table_number,
            cfg.lsh_key_size,
            cfg.lsh_multi_probe_level,
        )?)
        .into(),
        IndexKind::KdTree => Ptr::new(KDTreeIndexParams::new(cfg.kdtree_trees)?).into(),
    };
    Ok(params)
}

fn train_match<M: DescriptorMatcherTraitConst>(matcher: &M, query: &Mat, train: &Mat) -> opencv::Result<Vector<DMatch>> {
    let mut matches = Vector::<DMatch>::new();
    matcher.train_match(query, train, &mut matches, &core::no_array())?;
    Ok(matches)
}

fn knn_train_match<M: DescriptorMatcherTraitConst>(
    matcher: &M,
    query: &Mat,
    train: &Mat,
    k: i32,
) -> opencv::Result<Vector<Vector<DMatch>>> {
    let mut matches = Vector::<Vector<DMatch>>::new();
    matcher.knn_train_match(query, train, &mut matches, k, &core::no_array(), false)?;
    Ok(matches)
}

fn from_cv(m: DMatch, squared: bool) -> Match {
    let distance = if squared { m.distance.sqrt() } else { m.distance };
    Match::new(m.query_idx as usize, m.train_idx as usize, distance)
}

impl Backend {
    /// Build the matcher for `kind`, branching on the descriptor type `method` produces
    pub fn create(kind: MatcherKind, method: DescriptorMethod, flann: &FlannConfig) -> MatchResult<Self> {
        let backend = match kind {
            MatcherKind::BruteForce => {
                let norm = Norm::for_method(method);
                Backend::BruteForce {
                    norm,
                    matcher: BFMatcher::new(norm.cv_norm(), false)?,
                }
            }
            MatcherKind::Flann => {
                let index = IndexKind::for_method(method);
                let index_params = flann_index_params(index, flann)?;
                let search_params = Ptr::new(SearchParams::new(flann.checks, 0.0, true, false)?);
                Backend::Flann {
                    index,
                    matcher: FlannBasedMatcher::new(&index_params, &search_params)?,
                }
            }
        };
        debug!("Constructed {} matcher for {}: {:?}, {:?}", kind, method, backend.norm(), backend.index());
        Ok(backend)
    }

    pub fn kind(&self) -> MatcherKind {
        match self {
            Backend::BruteForce { .. } => MatcherKind::BruteForce,
            Backend::Flann { .. } => MatcherKind::Flann,
        }
    }

    pub fn norm(&self) -> Norm {
        match self {
            Backend::BruteForce { norm, .. } => *norm,
            Backend::Flann { index: IndexKind::Lsh, .. } => Norm::Hamming,
            Backend::Flann { index: IndexKind::KdTree, .. } => Norm::L2,
        }
    }

    /// FLANN index structure, `None` for brute force
    pub fn index(&self) -> Option<IndexKind> {
        match self {
            Backend::BruteForce { .. } => None,
            Backend::Flann { index, .. } => Some(*index),
        }
    }

    /// FLANN's KD-tree reports squared L2 distances, brute force does not
    fn squared_distances(&self) -> bool {
        matches!(self, Backend::Flann { index: IndexKind::KdTree, .. })
    }

    /// Best correspondence for every query row, in matcher order
    ///
    /// L2 distances are Euclidean for both backends.
    pub fn best(&self, query: &Mat, train: &Mat) -> MatchResult<Vec<Match>> {
        let raw = match self {
            Backend::BruteForce { matcher, .. } => train_match(matcher, query, train)?,
            Backend::Flann { matcher, .. } => train_match(matcher, query, train)?,
        };
        let squared = self.squared_distances();
        Ok(raw.iter().map(|m| from_cv(m, squared)).collect())
    }

    /// Up to `k` nearest candidates for every query row, nearest first
    pub fn knn(&self, query: &Mat, train: &Mat, k: i32) -> MatchResult<Vec<Neighbors>> {
        let raw = match self {
            Backend::BruteForce { matcher, .. } => knn_train_match(matcher, query, train, k)?,
            Backend::Flann { matcher, .. } => knn_train_match(matcher, query, train, k)?,
        };
        let squared = self.squared_distances();
        Ok(raw
            .iter()
            .map(|candidates| candidates.iter().map(|m| from_cv(m, squared)).collect())
            .collect())
    }
}

/// Matcher strategy: resolves to a [`Backend`] per call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    kind: MatcherKind,
}

/// Matcher strategy for `kind`
pub fn select(kind: MatcherKind) -> Matcher {
    Matcher { kind }
}

/// Resolve a matcher name; unknown names fail without touching OpenCV
pub fn select_by_name(name: &str) -> MatchResult<Matcher> {
    Ok(select(name.parse()?))
}

impl Matcher {
    pub fn kind(&self) -> MatcherKind {
        self.kind
    }

    pub fn backend(&self, method: DescriptorMethod, cfg: &Config) -> MatchResult<Backend> {
        Backend::create(self.kind, method, &cfg.flann)
    }

    /// Both sides as matrices, or `None` when either side has no features
    fn prepare(&self, method: DescriptorMethod, a: &FeatureSet, b: &FeatureSet) -> MatchResult<Option<(Mat, Mat)>> {
        for features in [a, b] {
            let found = features.descriptors().kind();
            if found != method.descriptor_kind() {
                return Err(MatchError::IncompatibleDescriptors { method, found });
            }
        }
        if a.is_empty() || b.is_empty() {
            warn!(
                "Nothing to match: {} keypoints in first image, {} in second",
                a.len(),
                b.len()
            );
            return Ok(None);
        }
        let query = descriptors_to_mat(a.descriptors())?;
        let train = descriptors_to_mat(b.descriptors())?;
        Ok(Some((query, train)))
    }

    /// One best correspondence per descriptor of `a`, sorted by distance and truncated
    pub fn match_best(
        &self,
        method: DescriptorMethod,
        a: &FeatureSet,
        b: &FeatureSet,
        cfg: &Config,
    ) -> MatchResult<Vec<Match>> {
        let Some((query, train)) = self.prepare(method, a, b)? else {
            return Ok(Vec::new());
        };
        let raw = self.backend(method, cfg)?.best(&query, &train)?;
        let total = raw.len();
        let kept = best_matches(raw, cfg.matching.max_drawn_matches);
        debug!("{} best-match: kept {} of {} matches", self.kind, kept.len(), total);
        Ok(kept)
    }

    /// Two nearest neighbours per descriptor of `a`, filtered by the ratio test
    pub fn knn_match(
        &self,
        method: DescriptorMethod,
        a: &FeatureSet,
        b: &FeatureSet,
        cfg: &Config,
    ) -> MatchResult<Vec<Match>> {
        let Some((query, train)) = self.prepare(method, a, b)? else {
            return Ok(Vec::new());
        };
        let neighbors = self.backend(method, cfg)?.knn(&query, &train, 2)?;
        let ratio = self.kind.ratio(&cfg.matching);
        let kept = ratio_test(&neighbors, ratio);
        debug!(
            "{} knn: {} of {} queries passed ratio {}",
            self.kind,
            kept.len(),
            neighbors.len(),
            ratio
        );
        Ok(kept)
    }

    pub fn apply(
        &self,
        mode: MatchMode,
        method: DescriptorMethod,
        a: &FeatureSet,
        b: &FeatureSet,
        cfg: &Config,
    ) -> MatchResult<Vec<Match>> {
        match mode {
            MatchMode::Best => self.match_best(method, a, b, cfg),
            MatchMode::Knn => self.knn_match(method, a, b, cfg),
        }
    }
}
