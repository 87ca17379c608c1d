//! Camera drivers, intrinsics and frames.
//!
//! [`BasicCamera`] is the contract every driver implements. Callers hold
//! a driver through that trait and never depend on a concrete device.

mod config;
mod driver;
mod frame;
mod intrinsics;
mod simulated;
mod storage;

pub use config::{CameraConfig, ConfigError, FileConfig, StreamConfig};
pub use driver::{
    data_file_name, BasicCamera, CameraError, CameraParams, CameraState, ParamValue, SaveOptions,
};
pub use frame::{Frame, FrameData, FrameSet, ParseNameError, PixelFormat, StreamKind};
pub use intrinsics::{CameraIntrinsics, IntrinsicsMatrix};
pub use simulated::{SimulatedCamera, DEPTH_SCALE};
pub use storage::write_frame;
