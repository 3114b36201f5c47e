use liftlog_domain::SetField;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{KEY_SETTINGS, KeyValueStore, StorageError};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub weight_unit: WeightUnit,
    /// Seconds.
    pub default_rest_time: f64,
    pub show_placeholders: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::Kilogram,
            default_rest_time: 90.0,
            show_placeholders: true,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if SetField::RestTime.contains(self.default_rest_time) {
            Ok(())
        } else {
            let (min, max) = SetField::RestTime.range();
            Err(SettingsError::InvalidRestTime { min, max })
        }
    }
}

#[derive(
    Serialize,
    Deserialize,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "kg")]
    #[strum(serialize = "kg")]
    Kilogram,
    #[serde(rename = "lb")]
    #[strum(serialize = "lb")]
    Pound,
}

impl WeightUnit {
    const POUNDS_PER_KILOGRAM: f64 = 2.204_622_621_8;

    /// Converts a weight in kilograms into this unit.
    #[must_use]
    pub fn from_kg(self, weight: f64) -> f64 {
        match self {
            WeightUnit::Kilogram => weight,
            WeightUnit::Pound => weight * Self::POUNDS_PER_KILOGRAM,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("default rest time must be between {min} and {max}")]
    InvalidRestTime { min: f64, max: f64 },
    #[error("stored settings are not an object")]
    NotAnObject,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reads the settings, falling back to the defaults if none were stored yet.
///
/// Missing fields take their defaults, but the stored value itself must be an object.
pub fn read_settings(store: &impl KeyValueStore) -> Result<Settings, SettingsError> {
    match store.try_load::<Value>(KEY_SETTINGS)? {
        None => Ok(Settings::default()),
        Some(value @ Value::Object(_)) => {
            Ok(serde_json::from_value(value).map_err(StorageError::from)?)
        }
        Some(_) => Err(SettingsError::NotAnObject),
    }
}

pub fn write_settings(
    store: &impl KeyValueStore,
    settings: &Settings,
) -> Result<(), SettingsError> {
    settings.validate()?;
    let value = serde_json::to_string(settings).map_err(StorageError::from)?;
    store.write(KEY_SETTINGS, &value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::MemoryStore;

    use super::*;

    #[test]
    fn test_read_default_settings() {
        assert_eq!(read_settings(&MemoryStore::new()).unwrap(), Settings::default());
    }

    #[test]
    fn test_write_settings() {
        let store = MemoryStore::new();
        let settings = Settings {
            weight_unit: WeightUnit::Pound,
            default_rest_time: 120.0,
            show_placeholders: false,
        };
        write_settings(&store, &settings).unwrap();
        assert_eq!(read_settings(&store).unwrap(), settings);
        assert!(store.read(KEY_SETTINGS).unwrap().unwrap().contains("\"weightUnit\":\"lb\""));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(3601.0)]
    #[case(f64::NAN)]
    fn test_write_settings_invalid_rest_time(#[case] default_rest_time: f64) {
        let store = MemoryStore::new();
        let settings = Settings {
            default_rest_time,
            ..Settings::default()
        };
        assert!(matches!(
            write_settings(&store, &settings),
            Err(SettingsError::InvalidRestTime { .. })
        ));
        assert_eq!(store.read(KEY_SETTINGS).unwrap(), None);
    }

    #[test]
    fn test_read_partial_settings() {
        let store = MemoryStore::new();
        store.write(KEY_SETTINGS, "{\"showPlaceholders\":false}").unwrap();
        assert_eq!(
            read_settings(&store).unwrap(),
            Settings {
                show_placeholders: false,
                ..Settings::default()
            }
        );
    }

    #[rstest]
    #[case("[]")]
    #[case("[\"lb\", 120.0, false]")]
    #[case("\"kg\"")]
    #[case("null")]
    fn test_read_settings_not_an_object(#[case] value: &str) {
        let store = MemoryStore::new();
        store.write(KEY_SETTINGS, value).unwrap();
        assert!(matches!(read_settings(&store), Err(SettingsError::NotAnObject)));
    }

    #[rstest]
    #[case("{")]
    #[case("{\"weightUnit\":\"st\"}")]
    #[case("{\"defaultRestTime\":\"long\"}")]
    fn test_read_invalid_settings(#[case] value: &str) {
        let store = MemoryStore::new();
        store.write(KEY_SETTINGS, value).unwrap();
        assert!(matches!(
            read_settings(&store),
            Err(SettingsError::Storage(StorageError::Json(_)))
        ));
    }

    #[rstest]
    #[case(WeightUnit::Kilogram, 100.0, 100.0)]
    #[case(WeightUnit::Pound, 100.0, 220.462_262_18)]
    fn test_weight_unit_from_kg(#[case] unit: WeightUnit, #[case] kg: f64, #[case] expected: f64) {
        assert_approx_eq!(unit.from_kg(kg), expected);
    }

    #[test]
    fn test_weight_unit_display() {
        assert_eq!(WeightUnit::Kilogram.to_string(), "kg");
        assert_eq!(WeightUnit::Pound.to_string(), "lb");
    }
}
