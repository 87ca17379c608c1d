//! Simulated depth camera.
//!
//! Mirrors a stereo depth camera with one color imager, a depth stream
//! and two infrared imagers. Frames are deterministic synthetic patterns
//! so they can be checked in tests; they carry no scene content.

use super::{
    data_file_name, storage, BasicCamera, CameraConfig, CameraError, CameraIntrinsics,
    CameraParams, CameraState, Frame, FrameData, FrameSet, ParamValue, PixelFormat, SaveOptions,
    StreamKind,
};
use ndarray::{Array2, Array3};
use std::path::PathBuf;

/// Metres per depth unit.
pub const DEPTH_SCALE: f32 = 0.001;

/// Highest frame rate the simulated device accepts.
const MAX_FPS: u32 = 90;

/// Number of distortion coefficients reported per stream (Brown-Conrady).
const DISTORTION_COEFFS: usize = 5;

/// Settings resolved from a [`CameraConfig`] during `init_camera`.
#[derive(Debug, Clone)]
struct StreamProfile {
    width: u32,
    height: u32,
    fps: u32,
    color_format: PixelFormat,
    save_directory: PathBuf,
    color_intrinsics: CameraIntrinsics,
    depth_intrinsics: CameraIntrinsics,
}

impl StreamProfile {
    fn resolve(config: &CameraConfig) -> Result<Self, CameraError> {
        if config.width == 0 || config.height == 0 {
            return Err(CameraError::InvalidConfig(format!(
                "invalid frame dimensions {}x{}",
                config.width, config.height
            )));
        }
        if config.fps == 0 || config.fps > MAX_FPS {
            return Err(CameraError::InvalidConfig(format!(
                "invalid frame rate {} (must be 1-{MAX_FPS} fps)",
                config.fps
            )));
        }

        let color_format = parse_format(&config.color_format, "color")?;
        if !matches!(color_format, PixelFormat::Bgr8 | PixelFormat::Rgb8) {
            return Err(unsupported_format("color", color_format));
        }
        let depth_format = parse_format(&config.depth_format, "depth")?;
        if depth_format != PixelFormat::Depth16 {
            return Err(unsupported_format("depth", depth_format));
        }
        let ir_format = parse_format(&config.ir_format, "ir")?;
        if ir_format != PixelFormat::Gray8 {
            return Err(unsupported_format("ir", ir_format));
        }

        let (width, height) = (config.width, config.height);
        Ok(Self {
            width,
            height,
            fps: config.fps,
            color_format,
            save_directory: config.camera_data_save_directory.clone(),
            color_intrinsics: synthetic_intrinsics(width, height, 0.70),
            depth_intrinsics: synthetic_intrinsics(width, height, 0.68),
        })
    }
}

fn parse_format(code: &str, stream: &str) -> Result<PixelFormat, CameraError> {
    code.parse()
        .map_err(|e| CameraError::InvalidConfig(format!("{stream} format: {e}")))
}

fn unsupported_format(stream: &str, format: PixelFormat) -> CameraError {
    CameraError::InvalidConfig(format!("{stream} stream does not support {format}"))
}

fn synthetic_intrinsics(width: u32, height: u32, focal_ratio: f64) -> CameraIntrinsics {
    let focal = width as f64 * focal_ratio;
    CameraIntrinsics::new(
        focal,
        focal,
        width as f64 / 2.0,
        height as f64 / 2.0,
        vec![0.0; DISTORTION_COEFFS],
        width,
        height,
    )
}

/// Sensor controls exposed through `get_params` / `set_params`.
#[derive(Debug, Clone, Copy)]
struct Controls {
    exposure_us: i64,
    gain: i64,
    emitter_enabled: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            exposure_us: 8500,
            gain: 16,
            emitter_enabled: true,
        }
    }
}

impl Controls {
    fn apply(&mut self, key: &str, value: &ParamValue) -> Result<(), CameraError> {
        match (key, value) {
            ("exposure_us", ParamValue::Int(v)) if *v > 0 => self.exposure_us = *v,
            ("gain", ParamValue::Int(v)) if *v >= 0 => self.gain = *v,
            ("emitter_enabled", ParamValue::Bool(v)) => self.emitter_enabled = *v,
            ("depth_scale", _) => {
                return Err(CameraError::InvalidArgument(
                    "depth_scale is read-only".to_string(),
                ))
            }
            ("exposure_us" | "gain" | "emitter_enabled", v) => {
                return Err(CameraError::InvalidArgument(format!(
                    "invalid value {v} for {key}"
                )))
            }
            _ => {
                return Err(CameraError::InvalidArgument(format!(
                    "unknown parameter {key}"
                )))
            }
        }
        Ok(())
    }
}

/// Simulated stereo depth camera.
#[derive(Debug)]
pub struct SimulatedCamera {
    profile: Option<StreamProfile>,
    state: CameraState,
    sequence: u64,
    controls: Controls,
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self {
            profile: None,
            state: CameraState::Uninitialized,
            sequence: 0,
            controls: Controls::default(),
        }
    }
}

impl SimulatedCamera {
    /// Creates an uninitialized camera; call `init_camera` or use `connect`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Metres per depth unit.
    pub fn depth_scale(&self) -> f32 {
        DEPTH_SCALE
    }

    /// Configured frame rate, once initialized.
    pub fn fps(&self) -> Option<u32> {
        self.profile.as_ref().map(|p| p.fps)
    }

    /// Returns the intrinsics of a specific stream.
    ///
    /// Depth and both infrared imagers share one sensor geometry.
    pub fn get_intrinsics_for(&self, stream: StreamKind) -> Result<CameraIntrinsics, CameraError> {
        let profile = self.profile.as_ref().ok_or(CameraError::NotInitialized)?;
        Ok(match stream {
            StreamKind::Color => profile.color_intrinsics.clone(),
            StreamKind::Depth | StreamKind::Ir1 | StreamKind::Ir2 => {
                profile.depth_intrinsics.clone()
            }
        })
    }

    /// Captures all streams at the same instant.
    pub fn get_current_frames(&mut self) -> Result<FrameSet, CameraError> {
        let sequence = self.next_sequence()?;
        Ok(FrameSet {
            color: self.render(StreamKind::Color, sequence)?,
            depth: self.render(StreamKind::Depth, sequence)?,
            ir1: self.render(StreamKind::Ir1, sequence)?,
            ir2: self.render(StreamKind::Ir2, sequence)?,
        })
    }

    /// Captures a color frame, optionally reordering BGR data to RGB.
    pub fn get_color(&mut self, bgr_to_rgb: bool) -> Result<Frame, CameraError> {
        let frame = self.get_current_frame()?;
        if bgr_to_rgb && frame.format() == PixelFormat::Bgr8 {
            Ok(frame.swap_red_blue())
        } else {
            Ok(frame)
        }
    }

    /// Captures a depth frame. Readings farther than `clip_m` metres are zeroed.
    pub fn get_depth(&mut self, clip_m: Option<f32>) -> Result<Frame, CameraError> {
        if let Some(clip) = clip_m {
            if !(clip.is_finite() && clip > 0.0) {
                return Err(CameraError::InvalidArgument(format!(
                    "depth clip must be a positive distance, got {clip}"
                )));
            }
        }

        let sequence = self.next_sequence()?;
        let frame = self.render(StreamKind::Depth, sequence)?;
        let Some(clip) = clip_m else {
            return Ok(frame);
        };

        let stream = frame.stream();
        match frame.into_data() {
            FrameData::Depth16(mut depth) => {
                depth.mapv_inplace(|d| if d as f32 * DEPTH_SCALE > clip { 0 } else { d });
                Frame::new(FrameData::Depth16(depth), stream, sequence)
            }
            other => Err(CameraError::CaptureFailed(format!(
                "depth stream produced {}",
                other.format()
            ))),
        }
    }

    /// Captures one infrared imager; `index` is 1 (left) or 2 (right).
    pub fn get_ir(&mut self, index: u8) -> Result<Frame, CameraError> {
        let stream = match index {
            1 => StreamKind::Ir1,
            2 => StreamKind::Ir2,
            other => {
                return Err(CameraError::InvalidArgument(format!(
                    "infrared index must be 1 or 2, got {other}"
                )))
            }
        };
        let sequence = self.next_sequence()?;
        self.render(stream, sequence)
    }

    fn next_sequence(&mut self) -> Result<u64, CameraError> {
        match self.state {
            CameraState::Uninitialized => Err(CameraError::NotInitialized),
            CameraState::Initialized => Err(CameraError::NotStreaming),
            CameraState::Streaming => {
                self.sequence += 1;
                Ok(self.sequence)
            }
        }
    }

    fn render(&self, stream: StreamKind, sequence: u64) -> Result<Frame, CameraError> {
        let profile = self.profile.as_ref().ok_or(CameraError::NotInitialized)?;
        let (h, w) = (profile.height as usize, profile.width as usize);
        let seq = sequence as usize;

        let data = match stream {
            StreamKind::Color => {
                // Horizontal red ramp, vertical green ramp, blue cycling with the sequence.
                let span = |n: usize| n.saturating_sub(1).max(1);
                let rgb = |y: usize, x: usize, c: usize| -> u8 {
                    match c {
                        0 => (x * 255 / span(w)) as u8,
                        1 => (y * 255 / span(h)) as u8,
                        _ => (seq % 256) as u8,
                    }
                };
                match profile.color_format {
                    PixelFormat::Rgb8 => {
                        FrameData::Rgb8(Array3::from_shape_fn((h, w, 3), |(y, x, c)| rgb(y, x, c)))
                    }
                    _ => FrameData::Bgr8(Array3::from_shape_fn((h, w, 3), |(y, x, c)| {
                        rgb(y, x, 2 - c)
                    })),
                }
            }
            StreamKind::Depth => FrameData::Depth16(Array2::from_shape_fn((h, w), |(y, x)| {
                (500 + (x + y + seq) % 4000) as u16
            })),
            StreamKind::Ir1 | StreamKind::Ir2 => {
                // The right imager sees the pattern shifted by a fixed baseline.
                let shift = if stream == StreamKind::Ir2 { 17 } else { 0 };
                let divisor = if self.controls.emitter_enabled { 1 } else { 2 };
                FrameData::Gray8(Array2::from_shape_fn((h, w), |(y, x)| {
                    (((x * 3 + y + seq + shift) % 256) / divisor) as u8
                }))
            }
        };

        tracing::trace!(%stream, sequence, "Rendered simulated frame");
        Frame::new(data, stream, sequence)
    }
}

impl BasicCamera for SimulatedCamera {
    fn init_camera(&mut self, config: &CameraConfig) -> Result<(), CameraError> {
        if self.state == CameraState::Streaming {
            return Err(CameraError::InvalidState {
                operation: "initialize",
                state: self.state,
            });
        }

        let profile = StreamProfile::resolve(config)?;
        tracing::info!(
            camera_type = %config.camera_type,
            serial = %config.serial_number,
            width = profile.width,
            height = profile.height,
            fps = profile.fps,
            "SimulatedCamera initialized"
        );
        if !config.extra.is_empty() {
            tracing::debug!(keys = ?config.extra.keys().collect::<Vec<_>>(), "Ignoring driver-specific keys");
        }

        self.profile = Some(profile);
        self.state = CameraState::Initialized;
        self.sequence = 0;
        Ok(())
    }

    fn start(&mut self) -> Result<(), CameraError> {
        match self.state {
            CameraState::Uninitialized => Err(CameraError::NotInitialized),
            CameraState::Streaming => Err(CameraError::InvalidState {
                operation: "start",
                state: self.state,
            }),
            CameraState::Initialized => {
                self.state = CameraState::Streaming;
                tracing::info!("SimulatedCamera streaming");
                Ok(())
            }
        }
    }

    fn stop(&mut self) -> Result<(), CameraError> {
        match self.state {
            CameraState::Uninitialized => Err(CameraError::NotInitialized),
            CameraState::Initialized => Err(CameraError::InvalidState {
                operation: "stop",
                state: self.state,
            }),
            CameraState::Streaming => {
                self.state = CameraState::Initialized;
                tracing::info!(frames = self.sequence, "SimulatedCamera stopped");
                Ok(())
            }
        }
    }

    fn get_intrinsics(&self) -> Result<CameraIntrinsics, CameraError> {
        self.get_intrinsics_for(StreamKind::Color)
    }

    fn get_current_frame(&mut self) -> Result<Frame, CameraError> {
        let sequence = self.next_sequence()?;
        self.render(StreamKind::Color, sequence)
    }

    fn state(&self) -> CameraState {
        self.state
    }

    fn get_params(&self) -> Result<CameraParams, CameraError> {
        let mut params = CameraParams::new();
        params.insert("exposure_us".to_string(), ParamValue::Int(self.controls.exposure_us));
        params.insert("gain".to_string(), ParamValue::Int(self.controls.gain));
        params.insert(
            "emitter_enabled".to_string(),
            ParamValue::Bool(self.controls.emitter_enabled),
        );
        params.insert(
            "depth_scale".to_string(),
            ParamValue::Float(DEPTH_SCALE as f64),
        );
        Ok(params)
    }

    /// Applies all parameters or none of them.
    fn set_params(&mut self, params: &CameraParams) -> Result<(), CameraError> {
        let mut staged = self.controls;
        for (key, value) in params {
            if let Err(e) = staged.apply(key, value) {
                tracing::warn!(parameter = %key, error = %e, "Rejected camera parameter");
                return Err(e);
            }
        }

        self.controls = staged;
        tracing::info!(count = params.len(), "Camera parameters updated");
        Ok(())
    }

    fn save_data(
        &self,
        frame: &Frame,
        name: &str,
        options: &SaveOptions,
    ) -> Result<PathBuf, CameraError> {
        let profile = self.profile.as_ref().ok_or(CameraError::NotInitialized)?;
        if !profile.save_directory.as_os_str().is_empty() {
            std::fs::create_dir_all(&profile.save_directory)?;
        }

        let path = profile.save_directory.join(data_file_name(name, options));
        storage::write_frame(frame, &path)?;
        tracing::info!(path = %path.display(), "Saved {} frame", frame.stream());
        Ok(path)
    }
}

impl Drop for SimulatedCamera {
    fn drop(&mut self) {
        if self.state == CameraState::Streaming {
            self.state = CameraState::Initialized;
            tracing::info!("SimulatedCamera stopped on drop");
        }
    }
}
