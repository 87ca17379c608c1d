//! Fiducial marker configuration.
//!
//! Describes which ArUco / AprilTag markers a detector should look for
//! and how large they are printed. Detection and pose estimation are
//! left to the vision library consuming this configuration.

mod config;
mod dictionary;

pub use config::{MarkerConfig, MarkerError, MarkerSpec};
pub use dictionary::ArucoDictionary;
