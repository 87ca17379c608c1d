//! Pinhole camera intrinsics.
//!
//! Values are reported by the driver once per stream configuration
//! and never change afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 3x3 pinhole projection matrix in row-major order.
pub type IntrinsicsMatrix = [[f64; 3]; 3];

/// Intrinsic parameters of a single camera stream.
///
/// No validation is performed: a zero focal length is accepted here and
/// surfaces in whatever consumer divides by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Focal length along x, in pixels.
    pub fx: f64,
    /// Focal length along y, in pixels.
    pub fy: f64,
    /// Principal point x coordinate, in pixels.
    pub ppx: f64,
    /// Principal point y coordinate, in pixels.
    pub ppy: f64,
    /// Distortion coefficients, ordered as the driver's distortion model defines them.
    pub coeffs: Vec<f64>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl CameraIntrinsics {
    /// Creates intrinsics from raw driver values.
    pub fn new(
        fx: f64,
        fy: f64,
        ppx: f64,
        ppy: f64,
        coeffs: Vec<f64>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            fx,
            fy,
            ppx,
            ppy,
            coeffs,
            width,
            height,
        }
    }

    /// Returns the projection matrix
    ///
    /// ```text
    /// [fx  0  ppx]
    /// [0  fy  ppy]
    /// [0   0   1 ]
    /// ```
    pub fn intrinsics_matrix(&self) -> IntrinsicsMatrix {
        [
            [self.fx, 0.0, self.ppx],
            [0.0, self.fy, self.ppy],
            [0.0, 0.0, 1.0],
        ]
    }
}

impl fmt::Display for CameraIntrinsics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CameraIntrinsics(fx={}, fy={}, ppx={}, ppy={}, coeffs={:?}, width={}, height={})",
            self.fx, self.fy, self.ppx, self.ppy, self.coeffs, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_matrix() {
        let intrinsics = CameraIntrinsics::new(600.0, 600.0, 320.0, 240.0, vec![0.0; 5], 640, 480);
        assert_eq!(
            intrinsics.intrinsics_matrix(),
            [[600.0, 0.0, 320.0], [0.0, 600.0, 240.0], [0.0, 0.0, 1.0]]
        );
    }

    #[test]
    fn test_zero_focal_length_accepted() {
        let intrinsics = CameraIntrinsics::new(0.0, 0.0, 0.0, 0.0, Vec::new(), 1, 1);
        assert_eq!(intrinsics.intrinsics_matrix()[2], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_display_lists_all_fields() {
        let intrinsics = CameraIntrinsics::new(1.5, 2.0, 3.0, 4.0, vec![0.1, 0.2], 64, 48);
        assert_eq!(
            intrinsics.to_string(),
            "CameraIntrinsics(fx=1.5, fy=2, ppx=3, ppy=4, coeffs=[0.1, 0.2], width=64, height=48)"
        );
    }

    proptest! {
        #[test]
        fn matrix_places_fields_at_fixed_positions(
            fx in -1e6f64..1e6,
            fy in -1e6f64..1e6,
            ppx in -1e6f64..1e6,
            ppy in -1e6f64..1e6,
        ) {
            let m = CameraIntrinsics::new(fx, fy, ppx, ppy, Vec::new(), 640, 480).intrinsics_matrix();
            prop_assert_eq!(m[0], [fx, 0.0, ppx]);
            prop_assert_eq!(m[1], [0.0, fy, ppy]);
            prop_assert_eq!(m[2], [0.0, 0.0, 1.0]);
        }
    }
}
