use featmatch_core::{DescriptorMethod, DetectorConfig, FeatureSet, Image};
use log::debug;
use opencv::core::{self, KeyPoint, Mat, Ptr, Vector};
use opencv::features2d::{ORB_ScoreType, ORB, SIFT};
use opencv::prelude::*;

pub mod convert;
pub mod error;

pub use error::{DetectError, DetectResult};

/// Feature detector + descriptor extractor backed by OpenCV
pub enum Detector {
    Sift(Ptr<SIFT>),
    Orb(Ptr<ORB>),
}

/// Construct the detector for `method` with the configured parameters
pub fn select(method: DescriptorMethod, cfg: &DetectorConfig) -> DetectResult<Detector> {
    let detector = match method {
        DescriptorMethod::Sift => {
            let p = &cfg.sift;
            Detector::Sift(SIFT::create(
                p.n_features,
                p.n_octave_layers,
                p.contrast_threshold,
                p.edge_threshold,
                p.sigma,
                false,
            )?)
        }
        DescriptorMethod::Orb => {
            let p = &cfg.orb;
            Detector::Orb(ORB::create(
                p.n_features,
                p.scale_factor,
                p.n_levels,
                p.edge_threshold,
                p.first_level,
                p.wta_k,
                ORB_ScoreType::HARRIS_SCORE,
                p.patch_size,
                p.fast_threshold,
            )?)
        }
    };
    debug!("Constructed {} detector", method);
    Ok(detector)
}

/// Resolve a method name, then construct its detector
///
/// Unknown names fail before any OpenCV object is created.
pub fn select_by_name(name: &str, cfg: &DetectorConfig) -> DetectResult<Detector> {
    let method: DescriptorMethod = name.parse()?;
    select(method, cfg)
}

fn run_feature2d<T: Feature2DTrait>(detector: &mut T, image: &Mat) -> opencv::Result<(Vector<KeyPoint>, Mat)> {
    let mut keypoints = Vector::<KeyPoint>::new();
    let mut descriptors = Mat::default();
    detector.detect_and_compute(image, &core::no_array(), &mut keypoints, &mut descriptors, false)?;
    Ok((keypoints, descriptors))
}

impl Detector {
    pub fn method(&self) -> DescriptorMethod {
        match self {
            Detector::Sift(_) => DescriptorMethod::Sift,
            Detector::Orb(_) => DescriptorMethod::Orb,
        }
    }

    /// Detect keypoints and compute descriptors on one image
    ///
    /// The colour raster goes to OpenCV as BGR, so the grayscale conversion
    /// is OpenCV's own.
    pub fn compute(&mut self, image: &Image) -> DetectResult<FeatureSet> {
        let mat = convert::rgb_to_bgr_mat(image.pixels())?;
        let features = self.compute_mat(&mat)?;
        debug!(
            "{}: {} keypoints, descriptor width {} from {}",
            self.method(),
            features.len(),
            features.descriptors().width(),
            image.path().display()
        );
        Ok(features)
    }

    /// Detect and describe an 8-bit BGR or grayscale matrix
    pub fn compute_mat(&mut self, mat: &Mat) -> DetectResult<FeatureSet> {
        let method = self.method();
        let (cv_keypoints, cv_descriptors) = match self {
            Detector::Sift(sift) => run_feature2d(sift, mat)?,
            Detector::Orb(orb) => run_feature2d(orb, mat)?,
        };

        let keypoints = convert::keypoints_from_cv(&cv_keypoints);
        let descriptors = convert::descriptors_from_mat(&cv_descriptors, method)?;
        Ok(FeatureSet::new(keypoints, descriptors)?)
    }

    /// Detect and describe both images independently
    pub fn detect_and_compute(&mut self, a: &Image, b: &Image) -> DetectResult<(FeatureSet, FeatureSet)> {
        let features_a = self.compute(a)?;
        let features_b = self.compute(b)?;
        Ok((features_a, features_b))
    }
}
