//! Save and load of the persistent world snapshot.
//!
//! Only the boat, the islands, the rocks and the wind are saved; clouds and
//! seagulls are regenerated on load. Transient fields (wakes, cached
//! offsets) are skipped by serde and come back empty.
//!
//! Saves are written to a temporary file and renamed into place, so a crash
//! mid-write never leaves a truncated save behind.

use std::fs;
use std::ops::RangeBounds;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::entity::boat::{Boat, RUDDER_RANGE, SAIL_RANGE};
use crate::entity::obstacle::{Island, Rock};
use crate::entity::EntityId;
use crate::wind::{Wind, MAX_WIND_SPEED};

/// Version number of the save format (increment when the format changes).
pub const SAVE_VERSION: u32 = 1;

/// File name used when the player presses Save.
pub const DEFAULT_SAVE_FILE: &str = "save_main.json";

/// Errors raised while saving or loading a snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the file failed.
    #[error("i/o error on save file {path}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The snapshot could not be serialized.
    #[error("failed to encode save data")]
    Encode(#[source] serde_json::Error),
    /// The file is not a valid snapshot.
    #[error("failed to decode save data")]
    Decode(#[source] serde_json::Error),
    /// The file was written by an incompatible version.
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Version this build writes
        expected: u32,
    },
    /// The boat is docked at an island that is not in the snapshot.
    #[error("boat is docked at unknown island {0}")]
    DanglingIsland(EntityId),
    /// A saved value lies outside the range the simulation keeps it in.
    #[error("{field} is out of range: {value}")]
    OutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// Value found in the snapshot
        value: f32,
    },
}

fn check_range(
    field: &'static str,
    value: f32,
    range: impl RangeBounds<f32>,
) -> Result<(), PersistenceError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(PersistenceError::OutOfRange { field, value })
    }
}

/// Serializable snapshot of the persistent world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// The player boat
    pub boat: Boat,
    /// Every island
    pub islands: Vec<Island>,
    /// Every rock
    pub rocks: Vec<Rock>,
    /// Wind state
    pub wind: Wind,
}

impl SaveData {
    /// Builds a snapshot at the current format version.
    #[must_use]
    pub fn new(boat: Boat, islands: Vec<Island>, rocks: Vec<Rock>, wind: Wind) -> Self {
        Self {
            version: SAVE_VERSION,
            boat,
            islands,
            rocks,
            wind,
        }
    }

    /// Checks version, value ranges and internal references.
    ///
    /// Boat controls must sit inside their clamps, speeds must be
    /// non-negative (wind at most [`MAX_WIND_SPEED`]), the wind direction
    /// must lie in `[0, 360)` and every obstacle needs a positive radius.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::UnsupportedVersion`],
    /// [`PersistenceError::OutOfRange`] or [`PersistenceError::DanglingIsland`].
    pub fn validate(&self) -> Result<(), PersistenceError> {
        if self.version != SAVE_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: self.version,
                expected: SAVE_VERSION,
            });
        }

        let boat = &self.boat;
        check_range("boat.sail", boat.sail(), SAIL_RANGE.0..=SAIL_RANGE.1)?;
        check_range("boat.rudder", boat.rudder(), RUDDER_RANGE.0..=RUDDER_RANGE.1)?;
        check_range("boat.reef", boat.reef(), 0.0..=1.0)?;
        check_range("boat.speed", boat.speed(), 0.0..f32::INFINITY)?;
        check_range("boat.orientation", boat.orientation(), 0.0..360.0)?;
        check_range("wind.speed", self.wind.speed(), 0.0..=MAX_WIND_SPEED)?;
        check_range("wind.direction", self.wind.direction(), 0.0..360.0)?;
        for island in &self.islands {
            check_range("island.radius", island.radius(), f32::MIN_POSITIVE..f32::INFINITY)?;
        }
        for rock in &self.rocks {
            check_range("rock.radius", rock.radius(), f32::MIN_POSITIVE..f32::INFINITY)?;
        }

        if let Some(id) = self.boat.docked_at() {
            if !self.islands.iter().any(|i| i.id() == id) {
                return Err(PersistenceError::DanglingIsland(id));
            }
        }
        Ok(())
    }

    /// Serializes to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(self).map_err(PersistenceError::Encode)
    }

    /// Parses and validates a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Decode`] for malformed input, otherwise
    /// the errors of [`SaveData::validate`].
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let data: Self = serde_json::from_str(json).map_err(PersistenceError::Decode)?;
        data.validate()?;
        Ok(data)
    }

    /// Writes the snapshot to `path` atomically.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if writing or renaming fails.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let json = self.to_json()?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(|source| PersistenceError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), islands = self.islands.len(), rocks = self.rocks.len(), "game saved");
        Ok(())
    }

    /// Reads and validates a snapshot from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the file cannot be read, otherwise
    /// the errors of [`SaveData::from_json`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = Self::from_json(&json)?;
        info!(path = %path.display(), "game loaded");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn sample() -> SaveData {
        let island = Island::new(EntityId::new(1), Vec2::new(0.0, 210.0), 200.0, "kal".into());
        let rock = Rock::new(EntityId::new(2), Vec2::new(500.0, 500.0), 40.0);
        let mut boat = Boat::new(Vec2::new(0.0, 100.0));
        boat.dock_at(island.id());
        SaveData::new(boat, vec![island], vec![rock], Wind::new(45.0, 12.0))
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("polysail-{}-{name}", std::process::id()))
    }

    mod validate_tests {
        use super::*;

        #[test]
        fn sample_is_valid() {
            assert!(sample().validate().is_ok());
        }

        #[test]
        fn wrong_version_rejected() {
            let mut data = sample();
            data.version = 99;
            assert!(matches!(
                data.validate(),
                Err(PersistenceError::UnsupportedVersion { found: 99, .. })
            ));
        }

        /// Rewrites one field of the sample's JSON form, as a hand-edited
        /// save file would.
        fn tampered(path: &[&str], value: f32) -> SaveData {
            let mut json = serde_json::to_value(sample()).unwrap();
            let mut slot = &mut json;
            for key in path {
                slot = match key.parse::<usize>() {
                    Ok(index) => &mut slot[index],
                    Err(_) => &mut slot[*key],
                };
            }
            *slot = serde_json::json!(value);
            serde_json::from_value(json).unwrap()
        }

        fn rejected_field(data: &SaveData) -> Option<&'static str> {
            match data.validate() {
                Err(PersistenceError::OutOfRange { field, .. }) => Some(field),
                _ => None,
            }
        }

        #[test]
        fn boat_controls_outside_clamps_rejected() {
            assert_eq!(rejected_field(&tampered(&["boat", "sail"], 500.0)), Some("boat.sail"));
            assert_eq!(rejected_field(&tampered(&["boat", "sail"], -1.0)), Some("boat.sail"));
            assert_eq!(
                rejected_field(&tampered(&["boat", "rudder"], -400.0)),
                Some("boat.rudder")
            );
            assert_eq!(rejected_field(&tampered(&["boat", "reef"], 7.0)), Some("boat.reef"));
        }

        #[test]
        fn negative_boat_speed_rejected() {
            assert_eq!(rejected_field(&tampered(&["boat", "speed"], -5.0)), Some("boat.speed"));
        }

        #[test]
        fn boat_heading_outside_compass_rejected() {
            assert_eq!(
                rejected_field(&tampered(&["boat", "orientation"], 400.0)),
                Some("boat.orientation")
            );
        }

        #[test]
        fn wind_outside_bounds_rejected() {
            assert_eq!(rejected_field(&tampered(&["wind", "speed"], 99.0)), Some("wind.speed"));
            assert_eq!(rejected_field(&tampered(&["wind", "speed"], -1.0)), Some("wind.speed"));
            assert_eq!(
                rejected_field(&tampered(&["wind", "direction"], 1_000.0)),
                Some("wind.direction")
            );
            assert_eq!(
                rejected_field(&tampered(&["wind", "direction"], 360.0)),
                Some("wind.direction")
            );
        }

        #[test]
        fn non_positive_radii_rejected() {
            assert_eq!(
                rejected_field(&tampered(&["islands", "0", "radius"], 0.0)),
                Some("island.radius")
            );
            assert_eq!(
                rejected_field(&tampered(&["rocks", "0", "radius"], -40.0)),
                Some("rock.radius")
            );
        }

        #[test]
        fn limits_themselves_are_valid() {
            assert!(tampered(&["boat", "sail"], 90.0).validate().is_ok());
            assert!(tampered(&["boat", "rudder"], -30.0).validate().is_ok());
            assert!(tampered(&["boat", "reef"], 1.0).validate().is_ok());
            assert!(tampered(&["wind", "speed"], MAX_WIND_SPEED).validate().is_ok());
            assert!(tampered(&["wind", "direction"], 0.0).validate().is_ok());
        }

        #[test]
        fn tampered_json_fails_to_load() {
            let mut json = serde_json::to_value(sample()).unwrap();
            json["boat"]["speed"] = serde_json::json!(-5.0);
            json["wind"]["speed"] = serde_json::json!(99.0);
            assert!(matches!(
                SaveData::from_json(&json.to_string()),
                Err(PersistenceError::OutOfRange { .. })
            ));
        }

        #[test]
        fn dangling_island_rejected() {
            let mut data = sample();
            data.islands.clear();
            assert!(matches!(
                data.validate(),
                Err(PersistenceError::DanglingIsland(_))
            ));
        }
    }

    mod json_tests {
        use super::*;

        #[test]
        fn json_roundtrip_preserves_state() {
            let data = sample();
            let back = SaveData::from_json(&data.to_json().unwrap()).unwrap();
            assert_eq!(back, data);
            assert_eq!(back.boat.docked_at(), Some(EntityId::new(1)));
        }

        #[test]
        fn garbage_is_decode_error() {
            assert!(matches!(
                SaveData::from_json("not a save"),
                Err(PersistenceError::Decode(_))
            ));
        }
    }

    mod file_tests {
        use super::*;

        #[test]
        fn save_then_load() {
            let path = temp_path("roundtrip.json");
            let data = sample();
            data.save_to(&path).unwrap();
            let back = SaveData::load_from(&path).unwrap();
            assert_eq!(back, data);

            let mut tmp = path.as_os_str().to_owned();
            tmp.push(".tmp");
            assert!(!PathBuf::from(tmp).exists());
            fs::remove_file(&path).unwrap();
        }

        #[test]
        fn missing_file_is_io_error() {
            let err = SaveData::load_from(temp_path("missing.json")).unwrap_err();
            assert!(matches!(err, PersistenceError::Io { .. }));
        }
    }
}
