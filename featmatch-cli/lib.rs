pub mod args;
pub mod display;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod report;

pub use args::{CliArgs, LogLevel};
pub use error::{CliError, CliResult};
pub use pipeline::{run, Outcome};

pub use featmatch_core::{self, Config, DescriptorMethod, MatchMode, MatcherKind};

/// Log filter: `--log-level`, then `RUST_LOG`, then `info`
pub fn resolve_log_level(args: &CliArgs) -> String {
    if let Some(level) = args.log_level {
        return level.as_str().to_string();
    }
    match std::env::var("RUST_LOG") {
        Ok(level) if !level.trim().is_empty() => level,
        _ => "info".to_string(),
    }
}

pub fn init_logger(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(log::LevelFilter::Info);
    builder.parse_filters(level);
    builder.format(|buf, record| {
        use std::io::Write;
        let module = record.module_path().unwrap_or(record.target());
        writeln!(
            buf,
            "{} [{}] {}: {}",
            buf.timestamp_millis(),
            record.level(),
            module,
            record.args()
        )
    });

    if let Err(err) = builder.try_init() {
        eprintln!("Failed to initialize logger: {}", err);
    }
}

/// Full run including the optional result window
pub fn execute(args: &CliArgs) -> CliResult<()> {
    let config = pipeline::load_config(args)?;
    let outcome = run(args, &config)?;
    if args.no_display {
        return Ok(());
    }
    display::show(&outcome.composite, &config.render.window_title).map_err(CliError::Display)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_log_level_wins() {
        let args = CliArgs::parse_normalized([
            "featmatch", "-i1", "a", "-i2", "b", "--method", "orb", "--matcher", "bf", "--log-level", "warn",
        ])
        .unwrap();
        assert_eq!(resolve_log_level(&args), "warn");
    }
}
