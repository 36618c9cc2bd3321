use std::path::Path;

use featmatch_core::Image;
use image::{ImageError, ImageReader};
use log::info;

use crate::error::{CliError, CliResult};

/// Validate `path` and decode the image it points to
///
/// Path problems are reported as `InvalidPath` before any decoding starts.
/// A file that exists but cannot be opened or decoded is a `DecodeFailure`.
pub fn load_image(path: &Path) -> CliResult<Image> {
    if path.as_os_str().is_empty() || !path.is_file() {
        return Err(CliError::InvalidPath(path.to_path_buf()));
    }

    let decode_failure = |source| CliError::DecodeFailure {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|err| decode_failure(ImageError::IoError(err)))?;
    let pixels = reader.decode().map_err(decode_failure)?.into_rgb8();

    info!("Loaded {} ({}x{})", path.display(), pixels.width(), pixels.height());
    Ok(Image::new(path, pixels))
}
