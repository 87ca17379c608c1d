//! Image file output for captured frames.

use super::{CameraError, Frame, FrameData};
use image::{GrayImage, ImageBuffer, Luma, RgbImage};
use ndarray::{Array2, Array3, Axis};
use std::path::Path;

/// Writes a frame to `path`, choosing the encoder from the file extension.
///
/// BGR data is reordered to RGB before encoding. Depth is written as
/// 16-bit grayscale so no range is lost.
pub fn write_frame(frame: &Frame, path: &Path) -> Result<(), CameraError> {
    let (width, height) = (frame.width(), frame.height());

    match frame.data() {
        FrameData::Bgr8(_) | FrameData::Rgb8(_) => {
            let rgb = frame.clone().into_rgb_array();
            let image = RgbImage::from_raw(width, height, into_raw_vec3(rgb))
                .ok_or_else(|| buffer_mismatch(frame))?;
            image.save(path)?;
        }
        FrameData::Gray8(a) => {
            let image = GrayImage::from_raw(width, height, into_raw_vec2(a.clone()))
                .ok_or_else(|| buffer_mismatch(frame))?;
            image.save(path)?;
        }
        FrameData::Depth16(a) => {
            let image: ImageBuffer<Luma<u16>, Vec<u16>> =
                ImageBuffer::from_raw(width, height, into_raw_vec2(a.clone()))
                    .ok_or_else(|| buffer_mismatch(frame))?;
            image.save(path)?;
        }
    }

    tracing::debug!(path = %path.display(), format = %frame.format(), "Frame written");
    Ok(())
}

fn buffer_mismatch(frame: &Frame) -> CameraError {
    CameraError::InvalidArgument(format!(
        "{} frame buffer does not match {}x{}",
        frame.format(),
        frame.width(),
        frame.height()
    ))
}

fn into_raw_vec2<T: Clone>(a: Array2<T>) -> Vec<T> {
    a.as_standard_layout().iter().cloned().collect()
}

fn into_raw_vec3<T: Clone>(a: Array3<T>) -> Vec<T> {
    a.as_standard_layout().iter().cloned().collect()
}

impl Frame {
    /// Returns color data as an `(height, width, 3)` RGB array.
    ///
    /// Single-channel frames are replicated across channels; depth is
    /// scaled down to its high byte.
    pub fn into_rgb_array(self) -> Array3<u8> {
        let (height, width) = self.data().dimensions();
        match self.into_data() {
            FrameData::Rgb8(a) => a,
            FrameData::Bgr8(mut a) => {
                a.invert_axis(Axis(2));
                a
            }
            FrameData::Gray8(a) => Array3::from_shape_fn((height, width, 3), |(y, x, _)| a[[y, x]]),
            FrameData::Depth16(a) => {
                Array3::from_shape_fn((height, width, 3), |(y, x, _)| (a[[y, x]] >> 8) as u8)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::StreamKind;

    #[test]
    fn test_write_and_read_back_gray() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ir1.png");
        let pixels = Array2::from_shape_fn((4, 6), |(y, x)| (y * 6 + x) as u8);
        let frame = Frame::new(FrameData::Gray8(pixels), StreamKind::Ir1, 1).unwrap();

        write_frame(&frame, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (6, 4));
        assert_eq!(decoded.get_pixel(5, 3)[0], 23);
    }

    #[test]
    fn test_bgr_written_as_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("color.png");
        let mut pixels = Array3::zeros((1, 2, 3));
        pixels[[0, 0, 0]] = 255u8; // blue
        let frame = Frame::new(FrameData::Bgr8(pixels), StreamKind::Color, 1).unwrap();

        write_frame(&frame, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 255]);
    }

    #[test]
    fn test_depth_keeps_sixteen_bits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depth.png");
        let frame = Frame::new(
            FrameData::Depth16(Array2::from_elem((2, 2), 4321)),
            StreamKind::Depth,
            1,
        )
        .unwrap();

        write_frame(&frame, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_luma16();
        assert_eq!(decoded.get_pixel(1, 1)[0], 4321);
    }

    #[test]
    fn test_unknown_extension_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("color.xyz");
        let frame =
            Frame::new(FrameData::Gray8(Array2::zeros((2, 2))), StreamKind::Ir1, 1).unwrap();

        assert!(matches!(
            write_frame(&frame, &path),
            Err(CameraError::Encode(_))
        ));
    }
}
