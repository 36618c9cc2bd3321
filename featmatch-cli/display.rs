use featmatch_detect::convert::rgb_to_bgr_mat;
use image::RgbImage;
use log::info;
use opencv::highgui;

/// Show `image` in a window and block until a key is pressed
pub fn show(image: &RgbImage, title: &str) -> opencv::Result<()> {
    let mat = rgb_to_bgr_mat(image)?;
    highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
    highgui::imshow(title, &mat)?;
    info!("Showing result in window '{}', press any key to close", title);
    highgui::wait_key(0)?;
    highgui::destroy_all_windows()
}
