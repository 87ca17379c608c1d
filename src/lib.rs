//! Auromix Sensors Library
//!
//! A thin abstraction over depth cameras and the fiducial markers they
//! observe. Drivers implement a single lifecycle contract, so callers
//! never depend on a specific device SDK.
//!
//! # Architecture
//!
//! ```text
//! CameraConfig → BasicCamera::connect → start → get_current_frame / get_intrinsics → stop
//!                                                  ↓
//!                                       save_data / preview
//! ```
//!
//! - [`camera`]: driver contract, intrinsics, frames and the simulated driver
//! - [`markers`]: ArUco / AprilTag marker configuration
//! - [`preview`]: composes camera output into viewable images
//!
//! # Example
//!
//! ```no_run
//! use auro_sensors::camera::{BasicCamera, CameraConfig, SaveOptions, SimulatedCamera};
//!
//! let config = CameraConfig::with_dimensions(640, 480).with_save_directory("captures");
//! let mut camera = SimulatedCamera::connect(&config).unwrap();
//!
//! let intrinsics = camera.get_intrinsics().unwrap();
//! println!("{intrinsics}");
//! println!("{:?}", intrinsics.intrinsics_matrix());
//!
//! camera.start().unwrap();
//! let frame = camera.get_current_frame().unwrap();
//! camera.save_data(&frame, "color", &SaveOptions::default()).unwrap();
//! camera.stop().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod camera;
pub mod markers;
pub mod preview;

// Re-export commonly used types at crate root
pub use camera::{
    BasicCamera, CameraConfig, CameraError, CameraIntrinsics, FileConfig, Frame, FrameSet,
    SaveOptions, SimulatedCamera, StreamKind,
};
pub use markers::{ArucoDictionary, MarkerConfig, MarkerSpec};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
