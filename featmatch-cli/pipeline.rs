use featmatch_core::{Config, DescriptorMethod, FeatureSet, Match, MatchMode};
use image::RgbImage;
use log::{debug, info};

use crate::args::CliArgs;
use crate::error::{CliError, CliResult};
use crate::loader::load_image;
use crate::render::render_matches;
use crate::report::MatchReport;

/// Everything a run produced before display
pub struct Outcome {
    pub features1: FeatureSet,
    pub features2: FeatureSet,
    pub matches: Vec<Match>,
    pub composite: RgbImage,
    pub report: MatchReport,
}

pub fn load_config(args: &CliArgs) -> CliResult<Config> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Config::load_toml(path)?
        }
        None => Config::default(),
    };
    debug!("{}", config.summary());
    Ok(config)
}

/// Load, detect, match, render; saves the composite and report when asked
pub fn run(args: &CliArgs, config: &Config) -> CliResult<Outcome> {
    // Resolve both names before touching the images
    let method: DescriptorMethod = args.method.parse()?;
    let matcher = featmatch_match::select_by_name(&args.matcher)?;
    let mode = MatchMode::from_knn_flag(args.knn);

    let image1 = load_image(&args.image1)?;
    let image2 = load_image(&args.image2)?;

    let mut detector = featmatch_detect::select(method, &config.detector)?;
    let (features1, features2) = detector.detect_and_compute(&image1, &image2)?;
    info!(
        "{}: {} keypoints in image 1, {} in image 2",
        method,
        features1.len(),
        features2.len()
    );

    let matches = matcher.apply(mode, method, &features1, &features2, config)?;
    info!("{} {} matching kept {} correspondences", matcher.kind(), mode, matches.len());

    let composite = render_matches(&image1, &features1, &image2, &features2, &matches, &config.render);

    if let Some(path) = &args.output {
        composite.save(path).map_err(|source| CliError::Save {
            path: path.clone(),
            source,
        })?;
        info!("Saved composite to {}", path.display());
    }

    let report = MatchReport::new(
        image1.path(),
        image2.path(),
        method,
        matcher.kind(),
        mode,
        &features1,
        &features2,
        &matches,
    );
    if let Some(path) = &args.report {
        report.save_json(path)?;
        info!("Wrote match report to {}", path.display());
    }

    Ok(Outcome {
        features1,
        features2,
        matches,
        composite,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use featmatch_core::CoreError;
    use std::path::{Path, PathBuf};

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("featmatch-pipeline-{}-{}", std::process::id(), name))
    }

    fn create_textured_image(width: u32, height: u32) -> RgbImage {
        featmatch_core::testing::textured_image(width, height, 99)
    }

    fn create_args(image1: &Path, image2: &Path, method: &str, matcher: &str, knn: bool) -> CliArgs {
        let mut argv = vec![
            "featmatch".to_string(),
            "-i1".to_string(),
            image1.display().to_string(),
            "-i2".to_string(),
            image2.display().to_string(),
            "--method".to_string(),
            method.to_string(),
            "--matcher".to_string(),
            matcher.to_string(),
            "--no-display".to_string(),
        ];
        if knn {
            argv.push("--knn".to_string());
        }
        CliArgs::parse_normalized(argv).unwrap()
    }

    #[test]
    fn test_missing_image_fails_before_detection() {
        let missing = scratch_path("missing.png");
        let args = create_args(&missing, &missing, "orb", "bf", false);
        let err = run(&args, &Config::default()).err().unwrap();
        assert!(matches!(err, CliError::InvalidPath(ref p) if *p == missing));
    }

    #[test]
    fn test_unknown_names_fail_first() {
        let missing = scratch_path("missing-too.png");

        let args = create_args(&missing, &missing, "surf", "bf", false);
        let err = run(&args, &Config::default()).err().unwrap();
        assert!(matches!(err, CliError::Core(CoreError::UnknownMethod(_))));

        let args = create_args(&missing, &missing, "orb", "annoy", false);
        let err = run(&args, &Config::default()).err().unwrap();
        assert!(matches!(
            err,
            CliError::Match(featmatch_match::MatchError::Core(CoreError::UnknownMatcher(_)))
        ));
    }

    #[test]
    fn test_end_to_end_identical_images() {
        let input = scratch_path("identical.png");
        let output = scratch_path("identical-out.png");
        let report = scratch_path("identical-report.json");
        create_textured_image(320, 240).save(&input).unwrap();

        let mut args = create_args(&input, &input, "orb", "bf", false);
        args.output = Some(output.clone());
        args.report = Some(report.clone());
        let outcome = run(&args, &Config::default()).unwrap();

        assert!(!outcome.matches.is_empty());
        assert!(outcome.matches.len() <= 20);
        assert!(outcome.matches.windows(2).all(|w| w[0].distance <= w[1].distance));
        let near_zero = outcome.matches.iter().filter(|m| m.distance < 1e-3).count();
        assert!(near_zero * 10 >= outcome.matches.len() * 9);
        assert_eq!(outcome.composite.dimensions(), (640, 240));
        assert_eq!(outcome.features1.len(), outcome.features2.len());

        let saved = image::open(&output).unwrap();
        assert_eq!((saved.width(), saved.height()), (640, 240));
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["method"], "orb");
        assert_eq!(json["matches"].as_array().unwrap().len(), outcome.matches.len());

        for path in [&input, &output, &report] {
            std::fs::remove_file(path).ok();
        }
    }

    #[test]
    fn test_knn_run_reports_mode_and_valid_indices() {
        let input = scratch_path("knn.png");
        create_textured_image(320, 240).save(&input).unwrap();

        let args = create_args(&input, &input, "sift", "flann", true);
        let outcome = run(&args, &Config::default()).unwrap();
        std::fs::remove_file(&input).ok();

        assert_eq!(outcome.report.mode, "knn");
        assert_eq!(outcome.report.matcher, "flann");
        for m in &outcome.matches {
            assert!(m.query_idx < outcome.features1.len());
            assert!(m.train_idx < outcome.features2.len());
        }
    }

    #[test]
    fn test_config_file_is_applied() {
        let path = scratch_path("config.toml");
        std::fs::write(&path, "[matching]\nmax_drawn_matches = 5\n").unwrap();
        let mut args = create_args(Path::new("a.png"), Path::new("b.png"), "orb", "bf", false);
        args.config = Some(path.clone());

        let config = load_config(&args).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.matching.max_drawn_matches, 5);
    }

    #[test]
    fn test_invalid_config_file_is_rejected() {
        let path = scratch_path("bad-config.toml");
        std::fs::write(&path, "[matching]\nbf_ratio = 3.0\n").unwrap();
        let mut args = create_args(Path::new("a.png"), Path::new("b.png"), "orb", "bf", false);
        args.config = Some(path.clone());

        let err = load_config(&args).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, CliError::Core(CoreError::InvalidConfig(_))));
    }
}
