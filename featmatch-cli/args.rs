use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Draw key points and matches between two images
#[derive(Parser, Debug, Clone)]
#[command(name = "featmatch", version, about = "Draw key points and matches")]
pub struct CliArgs {
    /// Path to image 1 (also accepted as -i1)
    #[arg(long = "image1", value_name = "PATH")]
    pub image1: PathBuf,
    /// Path to image 2 (also accepted as -i2)
    #[arg(long = "image2", value_name = "PATH")]
    pub image2: PathBuf,
    /// Detector: sift or orb
    #[arg(long)]
    pub method: String,
    /// Matcher: bf or flann
    #[arg(long)]
    pub matcher: String,
    /// Use k-nearest-neighbour matching with the ratio test
    #[arg(long)]
    pub knn: bool,
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Save the composite image here
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Write a JSON match report here
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
    /// Do not open a window with the result
    #[arg(long)]
    pub no_display: bool,
    /// Log verbosity
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Rewrite the two-letter short flags `-i1`/`-i2` into their long forms
///
/// clap only knows single-character short options.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            let Some(text) = arg.to_str() else {
                return arg;
            };
            for (short, long) in [("-i1", "--image1"), ("-i2", "--image2")] {
                if text == short {
                    return OsString::from(long);
                }
                if let Some(value) = text.strip_prefix(short).and_then(|rest| rest.strip_prefix('=')) {
                    return OsString::from(format!("{}={}", long, value));
                }
            }
            arg
        })
        .collect()
}

impl CliArgs {
    /// Parse from an argument vector that may use `-i1`/`-i2`
    pub fn parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }
}
