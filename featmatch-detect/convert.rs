//! Conversions between workspace types and OpenCV matrices

use featmatch_core::{DescriptorKind, DescriptorMethod, Descriptors, Keypoint};
use image::RgbImage;
use opencv::core::{self, KeyPoint, Mat, Vec3b, VecN, Vector};
use opencv::prelude::*;

use crate::error::{DetectError, DetectResult};

/// Copy an RGB image into an 8-bit 3-channel BGR `Mat`
///
/// Detectors and HighGUI both take this layout; detectors reduce it to
/// luminance themselves.
pub fn rgb_to_bgr_mat(image: &RgbImage) -> opencv::Result<Mat> {
    let pixels: Vec<Vec3b> = image.pixels().map(|p| VecN([p[2], p[1], p[0]])).collect();
    let view = Mat::new_rows_cols_with_data(image.height() as i32, image.width() as i32, pixels.as_slice())?;
    view.try_clone()
}

pub fn keypoints_from_cv(keypoints: &Vector<KeyPoint>) -> Vec<Keypoint> {
    keypoints
        .iter()
        .map(|kp| {
            let pt = kp.pt();
            Keypoint {
                x: pt.x,
                y: pt.y,
                size: kp.size(),
                angle: kp.angle(),
                response: kp.response(),
                octave: kp.octave(),
            }
        })
        .collect()
}

/// Read a descriptor matrix produced by `method`
///
/// OpenCV hands back an empty matrix when nothing was detected; that maps to
/// empty descriptors of the method's row width.
pub fn descriptors_from_mat(mat: &Mat, method: DescriptorMethod) -> DetectResult<Descriptors> {
    if mat.empty() || mat.rows() == 0 {
        return Ok(Descriptors::empty(method.descriptor_kind(), method.descriptor_width()));
    }

    let width = mat.cols() as usize;
    let cv_type = mat.typ();
    match method.descriptor_kind() {
        DescriptorKind::Binary if cv_type == core::CV_8UC1 => Ok(Descriptors::Binary {
            data: mat.data_typed::<u8>()?.to_vec(),
            width,
        }),
        DescriptorKind::Float if cv_type == core::CV_32FC1 => Ok(Descriptors::Float {
            data: mat.data_typed::<f32>()?.to_vec(),
            width,
        }),
        _ => Err(DetectError::UnexpectedDescriptorType { method, cv_type }),
    }
}

/// Build the matrix a descriptor matcher consumes
pub fn descriptors_to_mat(descriptors: &Descriptors) -> opencv::Result<Mat> {
    let rows = descriptors.len() as i32;
    if rows == 0 {
        return Ok(Mat::default());
    }
    let cols = descriptors.width() as i32;
    match descriptors {
        Descriptors::Binary { data, .. } => Mat::new_rows_cols_with_data(rows, cols, data.as_slice())?.try_clone(),
        Descriptors::Float { data, .. } => Mat::new_rows_cols_with_data(rows, cols, data.as_slice())?.try_clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_are_swapped() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(1, 1, image::Rgb([10, 20, 30]));

        let mat = rgb_to_bgr_mat(&img).unwrap();
        assert_eq!(mat.typ(), core::CV_8UC3);
        assert_eq!((mat.rows(), mat.cols()), (2, 3));
        let px = mat.at_2d::<Vec3b>(1, 1).unwrap();
        assert_eq!(px.0, [30, 20, 10]);
        assert_eq!(mat.at_2d::<Vec3b>(0, 0).unwrap().0, [0, 0, 0]);
    }

    #[test]
    fn test_binary_descriptors_through_mat() {
        let desc = Descriptors::Binary {
            data: (0..64).map(|v| v as u8).collect(),
            width: 32,
        };
        let mat = descriptors_to_mat(&desc).unwrap();
        assert_eq!(mat.rows(), 2);
        assert_eq!(mat.typ(), core::CV_8UC1);
        assert_eq!(descriptors_from_mat(&mat, DescriptorMethod::Orb).unwrap(), desc);
    }

    #[test]
    fn test_empty_mat_gives_empty_descriptors() {
        let empty = descriptors_from_mat(&Mat::default(), DescriptorMethod::Sift).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.kind(), DescriptorKind::Float);
        assert_eq!(empty.width(), 128);

        let mat = descriptors_to_mat(&Descriptors::empty(DescriptorKind::Binary, 32)).unwrap();
        assert!(mat.empty());
    }

    #[test]
    fn test_type_mismatch_is_an_error() {
        let floats = Descriptors::Float {
            data: vec![0.5; 128],
            width: 128,
        };
        let mat = descriptors_to_mat(&floats).unwrap();
        let err = descriptors_from_mat(&mat, DescriptorMethod::Orb).unwrap_err();
        assert!(matches!(
            err,
            DetectError::UnexpectedDescriptorType { method: DescriptorMethod::Orb, .. }
        ));
    }
}
