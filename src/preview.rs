//! Preview images for inspecting camera output without a display.
//!
//! Builds the same 2x2 grid a live viewer shows: color and colorized
//! depth on top, both infrared imagers below.

use crate::camera::{CameraError, Frame, FrameData, FrameSet};
use image::{imageops, imageops::FilterType, Rgb, RgbImage};
use ndarray::Array2;

/// Default depth scaling before colorizing (maps ~8.5 m of z16 units onto 0..255).
pub const DEFAULT_DEPTH_ALPHA: f32 = 0.03;

/// Scales, takes the absolute value and saturates to `u8`.
fn scale_abs(value: f32, alpha: f32) -> u8 {
    (value * alpha).abs().round().min(255.0) as u8
}

/// Maps an intensity onto the JET color ramp (blue through red).
pub fn jet(intensity: u8) -> Rgb<u8> {
    let v = intensity as f32 / 255.0;
    let channel = |center: f32| {
        let c = (1.5 - (4.0 * v - center).abs()).clamp(0.0, 1.0);
        (c * 255.0).round() as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

fn colorize(depth: &Array2<u16>, alpha: f32) -> RgbImage {
    let (height, width) = depth.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        jet(scale_abs(depth[[y as usize, x as usize]] as f32, alpha))
    })
}

/// Colorizes a depth frame. Non-depth frames are converted with [`to_rgb`].
pub fn depth_colormap(frame: &Frame, alpha: f32) -> RgbImage {
    match frame.data() {
        FrameData::Depth16(depth) => colorize(depth, alpha),
        _ => to_rgb(frame),
    }
}

/// Converts any frame to an RGB image; depth is colorized with [`DEFAULT_DEPTH_ALPHA`].
pub fn to_rgb(frame: &Frame) -> RgbImage {
    if let FrameData::Depth16(depth) = frame.data() {
        return colorize(depth, DEFAULT_DEPTH_ALPHA);
    }

    let rgb = frame.clone().into_rgb_array();
    RgbImage::from_fn(frame.width(), frame.height(), |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([rgb[[y, x, 0]], rgb[[y, x, 1]], rgb[[y, x, 2]]])
    })
}

/// Resizes every tile to `tile_width` x `tile_height` and lays them out row-major.
///
/// Fails if a tile dimension is zero or the canvas size overflows.
pub fn mosaic(
    tiles: &[RgbImage],
    columns: u32,
    tile_width: u32,
    tile_height: u32,
) -> Result<RgbImage, CameraError> {
    if tile_width == 0 || tile_height == 0 {
        return Err(CameraError::InvalidArgument(format!(
            "preview tile {tile_width}x{tile_height} is empty"
        )));
    }

    let columns = columns.max(1);
    let rows = u32::try_from(tiles.len())
        .map(|n| n.div_ceil(columns))
        .map_err(|_| CameraError::InvalidArgument(format!("too many tiles ({})", tiles.len())))?;
    let (width, height) = canvas_size(columns, rows, tile_width, tile_height).ok_or_else(|| {
        CameraError::InvalidArgument(format!(
            "{columns}x{rows} mosaic of {tile_width}x{tile_height} tiles is too large"
        ))
    })?;
    let mut canvas = RgbImage::new(width, height);

    for (i, tile) in tiles.iter().enumerate() {
        let (col, row) = (i as u32 % columns, i as u32 / columns);
        let resized = if tile.dimensions() == (tile_width, tile_height) {
            tile.clone()
        } else {
            imageops::resize(tile, tile_width, tile_height, FilterType::Triangle)
        };
        imageops::replace(
            &mut canvas,
            &resized,
            (col * tile_width) as i64,
            (row * tile_height) as i64,
        );
    }

    Ok(canvas)
}

/// Canvas width and height, or `None` if either side or the RGB buffer length overflows.
fn canvas_size(columns: u32, rows: u32, tile_width: u32, tile_height: u32) -> Option<(u32, u32)> {
    let width = columns.checked_mul(tile_width)?;
    let height = rows.checked_mul(tile_height)?;
    let bytes = (width as usize).checked_mul(height as usize)?.checked_mul(3);
    bytes.map(|_| (width, height))
}

/// Color | depth on the top row, ir1 | ir2 on the bottom.
pub fn compose_frame_set(
    frames: &FrameSet,
    tile_width: u32,
    tile_height: u32,
) -> Result<RgbImage, CameraError> {
    let tiles = [
        to_rgb(&frames.color),
        depth_colormap(&frames.depth, DEFAULT_DEPTH_ALPHA),
        to_rgb(&frames.ir1),
        to_rgb(&frames.ir2),
    ];
    mosaic(&tiles, 2, tile_width, tile_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::StreamKind;
    use ndarray::Array3;

    #[test]
    fn test_scale_abs_saturates() {
        assert_eq!(scale_abs(1000.0, 0.03), 30);
        assert_eq!(scale_abs(20000.0, 0.03), 255);
        assert_eq!(scale_abs(-100.0, 1.0), 100);
    }

    #[test]
    fn test_jet_endpoints() {
        assert_eq!(jet(0).0, [0, 0, 128]);
        assert_eq!(jet(255).0, [128, 0, 0]);
        let mid = jet(128).0;
        assert_eq!(mid[1], 255);
    }

    #[test]
    fn test_gray_replicated() {
        let frame = Frame::new(
            FrameData::Gray8(Array2::from_elem((2, 3), 90)),
            StreamKind::Ir1,
            1,
        )
        .unwrap();
        let image = to_rgb(&frame);
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [90, 90, 90]);
    }

    #[test]
    fn test_mosaic_layout() {
        let red = RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]));
        let blue = RgbImage::from_pixel(8, 8, Rgb([0, 0, 255]));
        let canvas = mosaic(&[red.clone(), blue, red], 2, 4, 4).unwrap();

        assert_eq!(canvas.dimensions(), (8, 8));
        assert_eq!(canvas.get_pixel(0, 0).0, [255, 0, 0]);
        let resized = canvas.get_pixel(5, 1).0;
        assert!(resized[0] <= 1 && resized[2] >= 254);
        assert_eq!(canvas.get_pixel(1, 5).0, [255, 0, 0]);
        // Unused cell stays black.
        assert_eq!(canvas.get_pixel(6, 6).0, [0, 0, 0]);
    }

    #[test]
    fn test_mosaic_rejects_oversized_canvas() {
        let tile = RgbImage::new(1, 1);
        assert!(matches!(
            mosaic(&[tile.clone()], 3, u32::MAX / 2, 1),
            Err(CameraError::InvalidArgument(_))
        ));
        assert!(mosaic(&[tile.clone(), tile.clone()], 1, 1, u32::MAX).is_err());
        assert!(mosaic(&[tile.clone()], 1, u32::MAX, u32::MAX).is_err());
        assert!(mosaic(&[tile], 2, 0, 4).is_err());
    }

    #[test]
    fn test_compose_frame_set() {
        let color =
            Frame::new(FrameData::Bgr8(Array3::zeros((6, 8, 3))), StreamKind::Color, 1).unwrap();
        let depth = Frame::new(
            FrameData::Depth16(Array2::from_elem((6, 8), 1000)),
            StreamKind::Depth,
            1,
        )
        .unwrap();
        let ir = Frame::new(FrameData::Gray8(Array2::zeros((6, 8))), StreamKind::Ir1, 1).unwrap();
        let frames = FrameSet {
            color,
            depth,
            ir1: ir.clone(),
            ir2: ir,
        };

        let canvas = compose_frame_set(&frames, 8, 6).unwrap();
        assert_eq!(canvas.dimensions(), (16, 12));
        assert_eq!(*canvas.get_pixel(12, 2), jet(30));
    }
}
