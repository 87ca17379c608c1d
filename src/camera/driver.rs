//! Camera driver contract.
//!
//! Every concrete driver implements [`BasicCamera`]. The five lifecycle and
//! query operations have no default body, so a driver that forgets one does
//! not compile. The optional capabilities default to
//! [`CameraError::Unsupported`].

use super::{CameraConfig, CameraIntrinsics, Frame};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// `init_camera` has not succeeded yet.
    #[error("camera not initialized")]
    NotInitialized,
    /// Frames were requested before `start`.
    #[error("camera stream not started")]
    NotStreaming,
    /// The operation is not valid in the current lifecycle state.
    #[error("cannot {operation} while camera is {state}")]
    InvalidState {
        /// Rejected operation.
        operation: &'static str,
        /// State the driver was in.
        state: CameraState,
    },
    /// The configuration cannot be honoured by this driver.
    #[error("invalid camera configuration: {0}")]
    InvalidConfig(String),
    /// A call argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Optional capability the driver does not implement.
    #[error("{0} is not supported by this camera")]
    Unsupported(&'static str),
    /// The device did not deliver a frame.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// Filesystem failure while saving.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Image encoding failure, including unknown file extensions.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Lifecycle state of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    /// Constructed, `init_camera` not yet run.
    Uninitialized,
    /// Configured and idle.
    Initialized,
    /// Producing frames.
    Streaming,
}

impl fmt::Display for CameraState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Streaming => "streaming",
        };
        f.write_str(name)
    }
}

/// A single driver parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// On/off switch.
    Bool(bool),
    /// Integer setting.
    Int(i64),
    /// Floating point setting.
    Float(f64),
    /// Free-form setting, e.g. a preset name.
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Named driver parameters, as reported by `get_params` and accepted by `set_params`.
pub type CameraParams = BTreeMap<String, ParamValue>;

/// File naming options for [`BasicCamera::save_data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Prepended to the name.
    pub prefix: String,
    /// Appended after the name; the extension picks the image encoder.
    pub suffix: String,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: ".png".to_string(),
        }
    }
}

impl SaveOptions {
    /// Default options with a file name prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }
}

/// Builds the file name `save_data` writes: `prefix + name + suffix`.
pub fn data_file_name(name: &str, options: &SaveOptions) -> String {
    format!("{}{}{}", options.prefix, name, options.suffix)
}

/// Contract every camera driver satisfies.
///
/// Calls block until the underlying device returns. Drivers own their
/// device handle exclusively and release it on drop, including after a
/// failed `init_camera` or `start`.
///
/// Leaving out any required operation is a compile error:
///
/// ```compile_fail
/// use auro_sensors::camera::{
///     BasicCamera, CameraConfig, CameraError, CameraIntrinsics, CameraState,
/// };
///
/// struct NoFrames;
///
/// impl BasicCamera for NoFrames {
///     fn init_camera(&mut self, _config: &CameraConfig) -> Result<(), CameraError> {
///         Ok(())
///     }
///     fn start(&mut self) -> Result<(), CameraError> {
///         Ok(())
///     }
///     fn stop(&mut self) -> Result<(), CameraError> {
///         Ok(())
///     }
///     fn get_intrinsics(&self) -> Result<CameraIntrinsics, CameraError> {
///         Err(CameraError::NotInitialized)
///     }
///     fn state(&self) -> CameraState {
///         CameraState::Uninitialized
///     }
///     // get_current_frame is missing
/// }
/// ```
///
/// With all five in place the same driver compiles and the optional
/// capabilities report [`CameraError::Unsupported`]:
///
/// ```
/// use auro_sensors::camera::{
///     BasicCamera, CameraConfig, CameraError, CameraIntrinsics, CameraState, Frame,
/// };
///
/// struct NoFrames;
///
/// impl BasicCamera for NoFrames {
///     fn init_camera(&mut self, _config: &CameraConfig) -> Result<(), CameraError> {
///         Ok(())
///     }
///     fn start(&mut self) -> Result<(), CameraError> {
///         Ok(())
///     }
///     fn stop(&mut self) -> Result<(), CameraError> {
///         Ok(())
///     }
///     fn get_intrinsics(&self) -> Result<CameraIntrinsics, CameraError> {
///         Err(CameraError::NotInitialized)
///     }
///     fn get_current_frame(&mut self) -> Result<Frame, CameraError> {
///         Err(CameraError::NotStreaming)
///     }
///     fn state(&self) -> CameraState {
///         CameraState::Uninitialized
///     }
/// }
///
/// assert!(matches!(NoFrames.get_params(), Err(CameraError::Unsupported(_))));
/// ```
pub trait BasicCamera {
    /// Initializes the device from `config`.
    fn init_camera(&mut self, config: &CameraConfig) -> Result<(), CameraError>;

    /// Starts frame production.
    fn start(&mut self) -> Result<(), CameraError>;

    /// Stops frame production.
    fn stop(&mut self) -> Result<(), CameraError>;

    /// Returns the intrinsics of the driver's primary stream.
    fn get_intrinsics(&self) -> Result<CameraIntrinsics, CameraError>;

    /// Returns the most recent frame of the primary stream.
    fn get_current_frame(&mut self) -> Result<Frame, CameraError>;

    /// Returns the current lifecycle state.
    fn state(&self) -> CameraState;

    /// Reads driver parameters.
    fn get_params(&self) -> Result<CameraParams, CameraError> {
        Err(CameraError::Unsupported("get_params"))
    }

    /// Writes driver parameters.
    fn set_params(&mut self, _params: &CameraParams) -> Result<(), CameraError> {
        Err(CameraError::Unsupported("set_params"))
    }

    /// Persists a frame to an image file and returns its path.
    fn save_data(
        &self,
        _frame: &Frame,
        _name: &str,
        _options: &SaveOptions,
    ) -> Result<PathBuf, CameraError> {
        Err(CameraError::Unsupported("save_data"))
    }

    /// Builds a driver and runs `init_camera` on it.
    ///
    /// On failure the half-initialized driver is dropped, which releases
    /// whatever it had acquired.
    fn connect(config: &CameraConfig) -> Result<Self, CameraError>
    where
        Self: Default + Sized,
    {
        let mut camera = Self::default();
        camera.init_camera(config)?;
        Ok(camera)
    }
}
