use auro_sensors::camera::{BasicCamera, ConfigError, FileConfig, SimulatedCamera, StreamKind};
use auro_sensors::markers::ArucoDictionary;
use std::io::Write;

const FULL_CONFIG: &str = r#"
[camera]
serial_number = ""
camera_type = "Realsense D415"
camera_data_save_directory = ""
width = 640
height = 480
fps = 15
color_format = "rgb8"
depth_format = "z16"
ir_format = "y8"

[markers.my_marker1]
dictionary_name = "DICT_ARUCO_ORIGINAL"
marker_name = "my_marker1"
marker_size = 0.1
marker_id = 233

[markers.dock]
dictionary_name = "DICT_APRILTAG_36h11"
marker_name = "dock"
marker_size = 0.16
marker_id = 4

[stream]
frame_limit = 10
preview_every = 5
"#;

#[test]
fn test_load_full_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FULL_CONFIG.as_bytes()).unwrap();

    let config = FileConfig::from_file(file.path()).unwrap();
    assert_eq!(config.camera.fps, 15);
    assert_eq!(config.markers.len(), 2);
    assert_eq!(
        config
            .markers
            .find(ArucoDictionary::AprilTag36h11, 4)
            .unwrap()
            .marker_name,
        "dock"
    );
    assert_eq!(config.stream.frame_limit, 10);
    assert_eq!(config.stream.preview_tile_width, 640);

    let mut camera = SimulatedCamera::connect(&config.camera).unwrap();
    assert_eq!(camera.fps(), Some(15));
    camera.start().unwrap();
    let frames = camera.get_current_frames().unwrap();
    assert_eq!(frames.get(StreamKind::Color).width(), 640);
}

#[test]
fn test_invalid_markers_rejected_on_load() {
    let content = FULL_CONFIG.replace("marker_id = 4", "marker_id = 587");
    assert!(matches!(
        FileConfig::from_toml_str(&content),
        Err(ConfigError::Markers(_))
    ));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        FileConfig::from_file("/nonexistent/auro_sensors.toml"),
        Err(ConfigError::FileReadError(_))
    ));
}

#[test]
fn test_shipped_configs_load() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config");

    let config = FileConfig::from_file(root.join("d415.toml")).unwrap();
    assert_eq!(config.camera.camera_type, "Realsense D415");
    assert_eq!(config.markers.len(), 2);

    let markers = auro_sensors::MarkerConfig::from_json_file(root.join("markers.json")).unwrap();
    assert_eq!(markers.len(), 3);
    assert!(markers.find(ArucoDictionary::ArucoOriginal, 789).is_some());
}
