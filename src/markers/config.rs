//! Marker definitions keyed by marker name.

use super::ArucoDictionary;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating marker definitions.
#[derive(Debug, Error)]
pub enum MarkerError {
    /// The map key and the `marker_name` field disagree.
    #[error("marker '{key}' declares marker_name '{marker_name}'")]
    NameMismatch {
        /// Key the entry is stored under.
        key: String,
        /// Name declared inside the entry.
        marker_name: String,
    },
    /// Size is zero, negative or not finite.
    #[error("marker '{name}' has invalid size {size} (must be a positive length in metres)")]
    InvalidSize {
        /// Offending marker.
        name: String,
        /// Declared size.
        size: f64,
    },
    /// The id does not exist in the marker's dictionary.
    #[error("marker '{name}' id {id} is outside {dictionary} (0..{count})")]
    IdOutOfRange {
        /// Offending marker.
        name: String,
        /// Declared id.
        id: u32,
        /// Dictionary the id was checked against.
        dictionary: ArucoDictionary,
        /// Markers in that dictionary.
        count: u32,
    },
    /// Two markers share an id within one dictionary.
    #[error("markers '{first}' and '{second}' both use id {id} of {dictionary}")]
    DuplicateId {
        /// Shared dictionary.
        dictionary: ArucoDictionary,
        /// Shared id.
        id: u32,
        /// Marker seen first.
        first: String,
        /// Marker seen second.
        second: String,
    },
    /// The marker file could not be read.
    #[error("failed to read marker file: {0}")]
    Io(#[from] std::io::Error),
    /// The marker file is not valid JSON or has mistyped fields.
    #[error("failed to parse marker definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single physical marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    /// Dictionary the marker belongs to.
    pub dictionary_name: ArucoDictionary,
    /// Unique name; also the key in [`MarkerConfig`].
    pub marker_name: String,
    /// Printed side length in metres.
    pub marker_size: f64,
    /// Id within the dictionary.
    pub marker_id: u32,
}

/// Markers a detector should recognise, keyed by marker name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerConfig {
    markers: BTreeMap<String, MarkerSpec>,
}

impl MarkerConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a marker under its own name, replacing any previous entry.
    pub fn insert(&mut self, spec: MarkerSpec) -> Option<MarkerSpec> {
        self.markers.insert(spec.marker_name.clone(), spec)
    }

    /// Parses and validates a JSON object of marker definitions.
    pub fn from_json_str(content: &str) -> Result<Self, MarkerError> {
        let config: MarkerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON marker file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MarkerError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Checks names, sizes, id ranges and id uniqueness per dictionary.
    pub fn validate(&self) -> Result<(), MarkerError> {
        let mut seen: HashMap<(ArucoDictionary, u32), &str> = HashMap::new();

        for (key, spec) in &self.markers {
            if *key != spec.marker_name {
                return Err(MarkerError::NameMismatch {
                    key: key.clone(),
                    marker_name: spec.marker_name.clone(),
                });
            }
            if !(spec.marker_size.is_finite() && spec.marker_size > 0.0) {
                return Err(MarkerError::InvalidSize {
                    name: key.clone(),
                    size: spec.marker_size,
                });
            }
            let dictionary = spec.dictionary_name;
            if !dictionary.contains(spec.marker_id) {
                return Err(MarkerError::IdOutOfRange {
                    name: key.clone(),
                    id: spec.marker_id,
                    dictionary,
                    count: dictionary.marker_count(),
                });
            }
            if let Some(first) = seen.insert((dictionary, spec.marker_id), key.as_str()) {
                return Err(MarkerError::DuplicateId {
                    dictionary,
                    id: spec.marker_id,
                    first: first.to_string(),
                    second: key.clone(),
                });
            }
        }

        Ok(())
    }

    /// Looks up the marker a detector reported as `id` in `dictionary`.
    pub fn find(&self, dictionary: ArucoDictionary, id: u32) -> Option<&MarkerSpec> {
        self.markers
            .values()
            .find(|spec| spec.dictionary_name == dictionary && spec.marker_id == id)
    }

    /// Looks up a marker by name.
    pub fn get(&self, name: &str) -> Option<&MarkerSpec> {
        self.markers.get(name)
    }

    /// Dictionaries a detector has to search.
    pub fn dictionaries(&self) -> BTreeSet<ArucoDictionary> {
        self.markers.values().map(|s| s.dictionary_name).collect()
    }

    /// Markers in name order.
    pub fn iter(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.markers.values()
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns `true` if no markers are configured.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "my_marker1": {
            "dictionary_name": "DICT_ARUCO_ORIGINAL",
            "marker_name": "my_marker1",
            "marker_size": 0.1,
            "marker_id": 233
        },
        "my_marker2": {
            "dictionary_name": "DICT_ARUCO_ORIGINAL",
            "marker_name": "my_marker2",
            "marker_size": 0.1,
            "marker_id": 996
        },
        "my_marker3": {
            "dictionary_name": "DICT_ARUCO_ORIGINAL",
            "marker_name": "my_marker3",
            "marker_size": 0.1,
            "marker_id": 789
        }
    }"#;

    fn spec(name: &str, dictionary: ArucoDictionary, id: u32) -> MarkerSpec {
        MarkerSpec {
            dictionary_name: dictionary,
            marker_name: name.to_string(),
            marker_size: 0.05,
            marker_id: id,
        }
    }

    #[test]
    fn test_load_sample() {
        let config = MarkerConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.len(), 3);
        assert_eq!(
            config.find(ArucoDictionary::ArucoOriginal, 996).unwrap().marker_name,
            "my_marker2"
        );
        assert!(config.find(ArucoDictionary::Dict4x4_50, 996).is_none());
        assert_eq!(config.get("my_marker3").unwrap().marker_id, 789);
        assert_eq!(config.dictionaries().len(), 1);
    }

    #[test]
    fn test_id_out_of_range() {
        let mut config = MarkerConfig::new();
        config.insert(spec("tag", ArucoDictionary::Dict4x4_50, 50));
        assert!(matches!(
            config.validate(),
            Err(MarkerError::IdOutOfRange { count: 50, .. })
        ));
    }

    #[test]
    fn test_duplicate_id_within_dictionary() {
        let mut config = MarkerConfig::new();
        config.insert(spec("a", ArucoDictionary::Dict6x6_250, 7));
        config.insert(spec("b", ArucoDictionary::Dict6x6_250, 7));
        assert!(matches!(
            config.validate(),
            Err(MarkerError::DuplicateId { id: 7, .. })
        ));
    }

    #[test]
    fn test_same_id_across_dictionaries() {
        let mut config = MarkerConfig::new();
        config.insert(spec("a", ArucoDictionary::Dict6x6_250, 7));
        config.insert(spec("b", ArucoDictionary::AprilTag36h11, 7));
        assert!(config.validate().is_ok());
        assert_eq!(config.dictionaries().len(), 2);
    }

    #[test]
    fn test_name_mismatch() {
        let content = SAMPLE.replacen(
            "\"marker_name\": \"my_marker1\"",
            "\"marker_name\": \"other\"",
            1,
        );
        assert!(matches!(
            MarkerConfig::from_json_str(&content),
            Err(MarkerError::NameMismatch { .. })
        ));
    }

    #[test]
    fn test_non_positive_size() {
        let mut config = MarkerConfig::new();
        let mut flat = spec("flat", ArucoDictionary::ArucoOriginal, 1);
        flat.marker_size = 0.0;
        config.insert(flat);
        assert!(matches!(
            config.validate(),
            Err(MarkerError::InvalidSize { .. })
        ));
    }
}
