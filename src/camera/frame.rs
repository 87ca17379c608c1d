//! Frame types representing captured images with metadata.

use super::CameraError;
use chrono::{DateTime, Utc};
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a stream or format name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseNameError {
    kind: &'static str,
    value: String,
}

impl ParseNameError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Image stream a frame was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// Color imager.
    Color,
    /// Depth computed from the stereo pair.
    Depth,
    /// Left infrared imager.
    Ir1,
    /// Right infrared imager.
    Ir2,
}

impl StreamKind {
    /// Every stream, in capture order.
    pub const ALL: [StreamKind; 4] = [Self::Color, Self::Depth, Self::Ir1, Self::Ir2];

    /// Lowercase name used in file names and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Depth => "depth",
            Self::Ir1 => "ir1",
            Self::Ir2 => "ir2",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color" => Ok(Self::Color),
            "depth" => Ok(Self::Depth),
            "ir1" => Ok(Self::Ir1),
            "ir2" => Ok(Self::Ir2),
            other => Err(ParseNameError::new("stream", other)),
        }
    }
}

/// Pixel layout of a frame, named after the SDK format codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit blue, green, red (`bgr8`).
    Bgr8,
    /// 8-bit red, green, blue (`rgb8`).
    Rgb8,
    /// 8-bit single channel (`y8`).
    Gray8,
    /// 16-bit depth units (`z16`).
    Depth16,
}

impl PixelFormat {
    /// SDK format code, e.g. `z16`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Bgr8 => "bgr8",
            Self::Rgb8 => "rgb8",
            Self::Gray8 => "y8",
            Self::Depth16 => "z16",
        }
    }

    /// Number of samples per pixel.
    pub fn channels(&self) -> usize {
        match self {
            Self::Bgr8 | Self::Rgb8 => 3,
            Self::Gray8 | Self::Depth16 => 1,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PixelFormat {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bgr8" => Ok(Self::Bgr8),
            "rgb8" => Ok(Self::Rgb8),
            "y8" => Ok(Self::Gray8),
            "z16" => Ok(Self::Depth16),
            _ => Err(ParseNameError::new("pixel format", s)),
        }
    }
}

/// Pixel storage. Color arrays are `(height, width, 3)`, the rest `(height, width)`.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameData {
    /// Blue, green, red samples.
    Bgr8(Array3<u8>),
    /// Red, green, blue samples.
    Rgb8(Array3<u8>),
    /// Single 8-bit channel.
    Gray8(Array2<u8>),
    /// Raw depth units; multiply by the driver's depth scale for metres.
    Depth16(Array2<u16>),
}

impl FrameData {
    /// Pixel layout of this data.
    pub fn format(&self) -> PixelFormat {
        match self {
            Self::Bgr8(_) => PixelFormat::Bgr8,
            Self::Rgb8(_) => PixelFormat::Rgb8,
            Self::Gray8(_) => PixelFormat::Gray8,
            Self::Depth16(_) => PixelFormat::Depth16,
        }
    }

    /// Array shape as `(height, width)`.
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Self::Bgr8(a) | Self::Rgb8(a) => (a.shape()[0], a.shape()[1]),
            Self::Gray8(a) => a.dim(),
            Self::Depth16(a) => a.dim(),
        }
    }

    /// Checks that color arrays carry exactly three channels.
    pub fn check_shape(&self) -> Result<(), CameraError> {
        match self {
            Self::Bgr8(a) | Self::Rgb8(a) if a.shape()[2] != 3 => {
                Err(CameraError::InvalidArgument(format!(
                    "{} data needs 3 channels, got shape {:?}",
                    self.format(),
                    a.shape()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Swaps the red and blue channels of color data; other formats are returned unchanged.
    pub fn swap_red_blue(self) -> Self {
        match self {
            Self::Bgr8(mut a) => {
                a.invert_axis(ndarray::Axis(2));
                Self::Rgb8(a.as_standard_layout().into_owned())
            }
            Self::Rgb8(mut a) => {
                a.invert_axis(ndarray::Axis(2));
                Self::Bgr8(a.as_standard_layout().into_owned())
            }
            other => other,
        }
    }
}

/// A single captured frame from a camera stream.
#[derive(Clone)]
pub struct Frame {
    data: FrameData,
    stream: StreamKind,
    /// Monotonic sequence number, shared by all streams of one poll.
    sequence: u64,
    timestamp: DateTime<Utc>,
}

impl Frame {
    /// Creates a new frame stamped with the current time.
    ///
    /// Color data that is not `(height, width, 3)` is rejected, so every
    /// consumer can index all three channels.
    pub fn new(data: FrameData, stream: StreamKind, sequence: u64) -> Result<Self, CameraError> {
        data.check_shape()?;
        Ok(Self {
            data,
            stream,
            sequence,
            timestamp: Utc::now(),
        })
    }

    /// Pixel data.
    #[inline]
    pub fn data(&self) -> &FrameData {
        &self.data
    }

    /// Consumes the frame, returning its pixel data.
    #[inline]
    pub fn into_data(self) -> FrameData {
        self.data
    }

    /// Stream the frame was captured from.
    #[inline]
    pub fn stream(&self) -> StreamKind {
        self.stream
    }

    /// Poll sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Capture time.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Pixel layout.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.data.format()
    }

    /// Returns the frame width in pixels.
    pub fn width(&self) -> u32 {
        self.data.dimensions().1 as u32
    }

    /// Returns the frame height in pixels.
    pub fn height(&self) -> u32 {
        self.data.dimensions().0 as u32
    }

    /// Returns a copy with red and blue channels swapped (no-op for single channel data).
    pub fn swap_red_blue(self) -> Self {
        Self {
            data: self.data.swap_red_blue(),
            ..self
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("stream", &self.stream)
            .field("format", &self.format())
            .field("width", &self.width())
            .field("height", &self.height())
            .field("sequence", &self.sequence)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// Frames from all streams captured in the same poll.
#[derive(Debug, Clone)]
pub struct FrameSet {
    /// Color frame.
    pub color: Frame,
    /// Depth frame.
    pub depth: Frame,
    /// Left infrared frame.
    pub ir1: Frame,
    /// Right infrared frame.
    pub ir2: Frame,
}

impl FrameSet {
    /// Returns the frame of one stream.
    pub fn get(&self, stream: StreamKind) -> &Frame {
        match stream {
            StreamKind::Color => &self.color,
            StreamKind::Depth => &self.depth,
            StreamKind::Ir1 => &self.ir1,
            StreamKind::Ir2 => &self.ir2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_dimensions() {
        let frame = Frame::new(
            FrameData::Bgr8(Array3::zeros((480, 640, 3))),
            StreamKind::Color,
            1,
        )
        .unwrap();

        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.sequence(), 1);
        assert_eq!(frame.format(), PixelFormat::Bgr8);
    }

    #[test]
    fn test_swap_red_blue() {
        let mut pixels = Array3::zeros((1, 1, 3));
        pixels[[0, 0, 0]] = 10u8;
        pixels[[0, 0, 2]] = 200u8;
        let frame = Frame::new(FrameData::Bgr8(pixels), StreamKind::Color, 0)
            .unwrap()
            .swap_red_blue();

        match frame.data() {
            FrameData::Rgb8(a) => {
                assert_eq!(a[[0, 0, 0]], 200);
                assert_eq!(a[[0, 0, 2]], 10);
            }
            other => panic!("unexpected format {:?}", other.format()),
        }
    }

    #[test]
    fn test_swap_leaves_depth_untouched() {
        let frame = Frame::new(
            FrameData::Depth16(Array2::from_elem((2, 2), 7)),
            StreamKind::Depth,
            0,
        )
        .unwrap();
        assert_eq!(frame.clone().swap_red_blue().data(), frame.data());
    }

    #[test]
    fn test_color_needs_three_channels() {
        let two = Frame::new(FrameData::Bgr8(Array3::zeros((2, 2, 2))), StreamKind::Color, 1);
        assert!(matches!(two, Err(CameraError::InvalidArgument(_))));

        let four = Frame::new(FrameData::Rgb8(Array3::zeros((2, 2, 4))), StreamKind::Color, 1);
        assert!(four.is_err());

        let gray = Frame::new(FrameData::Gray8(Array2::zeros((2, 2))), StreamKind::Ir1, 1);
        assert!(gray.is_ok());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("z16".parse::<PixelFormat>().unwrap(), PixelFormat::Depth16);
        assert_eq!("BGR8".parse::<PixelFormat>().unwrap(), PixelFormat::Bgr8);
        assert!("yuyv".parse::<PixelFormat>().is_err());
        assert_eq!("ir2".parse::<StreamKind>().unwrap(), StreamKind::Ir2);
        assert!("ir3".parse::<StreamKind>().is_err());
    }
}
