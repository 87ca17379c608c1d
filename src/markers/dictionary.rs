//! Predefined fiducial marker dictionaries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker dictionaries, named as in the OpenCV `cv2.aruco` module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArucoDictionary {
    /// 4x4 bits, 50 markers.
    #[serde(rename = "DICT_4X4_50")]
    Dict4x4_50,
    /// 4x4 bits, 100 markers.
    #[serde(rename = "DICT_4X4_100")]
    Dict4x4_100,
    /// 4x4 bits, 250 markers.
    #[serde(rename = "DICT_4X4_250")]
    Dict4x4_250,
    /// 4x4 bits, 1000 markers.
    #[serde(rename = "DICT_4X4_1000")]
    Dict4x4_1000,
    /// 5x5 bits, 50 markers.
    #[serde(rename = "DICT_5X5_50")]
    Dict5x5_50,
    /// 5x5 bits, 100 markers.
    #[serde(rename = "DICT_5X5_100")]
    Dict5x5_100,
    /// 5x5 bits, 250 markers.
    #[serde(rename = "DICT_5X5_250")]
    Dict5x5_250,
    /// 5x5 bits, 1000 markers.
    #[serde(rename = "DICT_5X5_1000")]
    Dict5x5_1000,
    /// 6x6 bits, 50 markers.
    #[serde(rename = "DICT_6X6_50")]
    Dict6x6_50,
    /// 6x6 bits, 100 markers.
    #[serde(rename = "DICT_6X6_100")]
    Dict6x6_100,
    /// 6x6 bits, 250 markers.
    #[serde(rename = "DICT_6X6_250")]
    Dict6x6_250,
    /// 6x6 bits, 1000 markers.
    #[serde(rename = "DICT_6X6_1000")]
    Dict6x6_1000,
    /// 7x7 bits, 50 markers.
    #[serde(rename = "DICT_7X7_50")]
    Dict7x7_50,
    /// 7x7 bits, 100 markers.
    #[serde(rename = "DICT_7X7_100")]
    Dict7x7_100,
    /// 7x7 bits, 250 markers.
    #[serde(rename = "DICT_7X7_250")]
    Dict7x7_250,
    /// 7x7 bits, 1000 markers.
    #[serde(rename = "DICT_7X7_1000")]
    Dict7x7_1000,
    /// Original ArUco library set, 5x5 bits, 1024 markers.
    #[serde(rename = "DICT_ARUCO_ORIGINAL")]
    ArucoOriginal,
    /// AprilTag 16h5 family.
    #[serde(rename = "DICT_APRILTAG_16h5")]
    AprilTag16h5,
    /// AprilTag 25h9 family.
    #[serde(rename = "DICT_APRILTAG_25h9")]
    AprilTag25h9,
    /// AprilTag 36h10 family.
    #[serde(rename = "DICT_APRILTAG_36h10")]
    AprilTag36h10,
    /// AprilTag 36h11 family.
    #[serde(rename = "DICT_APRILTAG_36h11")]
    AprilTag36h11,
    /// ArUco MIP 36h12 set.
    #[serde(rename = "DICT_ARUCO_MIP_36h12")]
    ArucoMip36h12,
}

impl ArucoDictionary {
    /// Every dictionary, in declaration order.
    pub const ALL: [ArucoDictionary; 22] = {
        use ArucoDictionary::*;
        [
            Dict4x4_50,
            Dict4x4_100,
            Dict4x4_250,
            Dict4x4_1000,
            Dict5x5_50,
            Dict5x5_100,
            Dict5x5_250,
            Dict5x5_1000,
            Dict6x6_50,
            Dict6x6_100,
            Dict6x6_250,
            Dict6x6_1000,
            Dict7x7_50,
            Dict7x7_100,
            Dict7x7_250,
            Dict7x7_1000,
            ArucoOriginal,
            AprilTag16h5,
            AprilTag25h9,
            AprilTag36h10,
            AprilTag36h11,
            ArucoMip36h12,
        ]
    };

    /// OpenCV constant name, e.g. `DICT_6X6_250`.
    pub const fn name(&self) -> &'static str {
        use ArucoDictionary::*;
        match self {
            Dict4x4_50 => "DICT_4X4_50",
            Dict4x4_100 => "DICT_4X4_100",
            Dict4x4_250 => "DICT_4X4_250",
            Dict4x4_1000 => "DICT_4X4_1000",
            Dict5x5_50 => "DICT_5X5_50",
            Dict5x5_100 => "DICT_5X5_100",
            Dict5x5_250 => "DICT_5X5_250",
            Dict5x5_1000 => "DICT_5X5_1000",
            Dict6x6_50 => "DICT_6X6_50",
            Dict6x6_100 => "DICT_6X6_100",
            Dict6x6_250 => "DICT_6X6_250",
            Dict6x6_1000 => "DICT_6X6_1000",
            Dict7x7_50 => "DICT_7X7_50",
            Dict7x7_100 => "DICT_7X7_100",
            Dict7x7_250 => "DICT_7X7_250",
            Dict7x7_1000 => "DICT_7X7_1000",
            ArucoOriginal => "DICT_ARUCO_ORIGINAL",
            AprilTag16h5 => "DICT_APRILTAG_16h5",
            AprilTag25h9 => "DICT_APRILTAG_25h9",
            AprilTag36h10 => "DICT_APRILTAG_36h10",
            AprilTag36h11 => "DICT_APRILTAG_36h11",
            ArucoMip36h12 => "DICT_ARUCO_MIP_36h12",
        }
    }

    /// Number of distinct markers; valid ids are `0..marker_count()`.
    pub fn marker_count(&self) -> u32 {
        use ArucoDictionary::*;
        match self {
            Dict4x4_50 | Dict5x5_50 | Dict6x6_50 | Dict7x7_50 => 50,
            Dict4x4_100 | Dict5x5_100 | Dict6x6_100 | Dict7x7_100 => 100,
            Dict4x4_250 | Dict5x5_250 | Dict6x6_250 | Dict7x7_250 => 250,
            Dict4x4_1000 | Dict5x5_1000 | Dict6x6_1000 | Dict7x7_1000 => 1000,
            ArucoOriginal => 1024,
            AprilTag16h5 => 30,
            AprilTag25h9 => 35,
            AprilTag36h10 => 2320,
            AprilTag36h11 => 587,
            ArucoMip36h12 => 250,
        }
    }

    /// Side length of the marker's inner bit grid.
    pub fn marker_bits(&self) -> u32 {
        use ArucoDictionary::*;
        match self {
            Dict4x4_50 | Dict4x4_100 | Dict4x4_250 | Dict4x4_1000 | AprilTag16h5 => 4,
            Dict5x5_50 | Dict5x5_100 | Dict5x5_250 | Dict5x5_1000 | ArucoOriginal
            | AprilTag25h9 => 5,
            Dict6x6_50 | Dict6x6_100 | Dict6x6_250 | Dict6x6_1000 | AprilTag36h10
            | AprilTag36h11 | ArucoMip36h12 => 6,
            Dict7x7_50 | Dict7x7_100 | Dict7x7_250 | Dict7x7_1000 => 7,
        }
    }

    /// Returns `true` if `id` names a marker of this dictionary.
    pub fn contains(&self, id: u32) -> bool {
        id < self.marker_count()
    }
}

impl fmt::Display for ArucoDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
