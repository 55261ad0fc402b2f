//! Session restore and display preferences.
//!
//! The last-entered form is kept under `bmiFormData` as a camelCase JSON
//! object; the theme is kept under `theme` as the bare string `dark` or
//! `light`. Both are conveniences, so unreadable values are logged and
//! treated as absent.

use crate::storage::{KeyValueStore, FORM_DATA_KEY, THEME_KEY};
use crate::{Error, FormData, Result};
use std::fmt;
use std::str::FromStr;

impl FormData {
    /// Persist the form for the next session
    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<()> {
        let contents = serde_json::to_string(self)?;
        store.set(FORM_DATA_KEY, &contents)?;
        tracing::debug!("Saved form data");
        Ok(())
    }

    /// Load the saved form, if any
    pub fn restore<S: KeyValueStore>(store: &S) -> Option<FormData> {
        let contents = match store.get(FORM_DATA_KEY) {
            Ok(contents) => contents?,
            Err(e) => {
                tracing::warn!("Failed to read saved form data: {}. Ignoring.", e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(form) => Some(form),
            Err(e) => {
                tracing::warn!("Corrupt saved form data: {}. Ignoring.", e);
                None
            }
        }
    }

    pub fn clear<S: KeyValueStore>(store: &mut S) -> Result<()> {
        store.remove(FORM_DATA_KEY)
    }

    /// Fill every field missing here from `other`
    pub fn or(self, other: FormData) -> FormData {
        let m = self.measurements;
        let o = other.measurements;
        FormData {
            measurements: crate::RawMeasurements {
                height: m.height.or(o.height),
                height_unit: m.height_unit.or(o.height_unit),
                feet: m.feet.or(o.feet),
                inches: m.inches.or(o.inches),
                weight: m.weight.or(o.weight),
                weight_unit: m.weight_unit.or(o.weight_unit),
            },
            age: self.age.or(other.age),
            gender: self.gender.or(other.gender),
            activity_level: self.activity_level.or(other.activity_level),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Load the stored theme; unknown or unreadable values count as unset
    pub fn load<S: KeyValueStore>(store: &S) -> Option<Theme> {
        let value = match store.get(THEME_KEY) {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!("Failed to read theme preference: {}", e);
                return None;
            }
        };

        match value.parse() {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!("Ignoring stored theme: {}", e);
                None
            }
        }
    }

    pub fn save<S: KeyValueStore>(self, store: &mut S) -> Result<()> {
        store.set(THEME_KEY, self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(Error::InvalidInput(format!("unknown theme {:?}", other))),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::RawMeasurements;

    fn sample_form() -> FormData {
        FormData {
            measurements: RawMeasurements {
                height: Some("175".into()),
                height_unit: Some("cm".into()),
                weight: Some("70".into()),
                weight_unit: Some("kg".into()),
                ..Default::default()
            },
            age: Some("30".into()),
            gender: Some("female".into()),
            activity_level: Some("lightly".into()),
        }
    }

    #[test]
    fn test_form_save_restore_clear() {
        let mut store = MemoryStore::new();
        assert_eq!(FormData::restore(&store), None);

        sample_form().save(&mut store).unwrap();
        assert_eq!(FormData::restore(&store), Some(sample_form()));

        FormData::clear(&mut store).unwrap();
        assert_eq!(FormData::restore(&store), None);
    }

    #[test]
    fn test_corrupt_form_data_ignored() {
        let mut store = MemoryStore::new();
        store.set(FORM_DATA_KEY, "not json").unwrap();
        assert_eq!(FormData::restore(&store), None);
    }

    #[test]
    fn test_form_or_prefers_self() {
        let mut entered = FormData::default();
        entered.measurements.weight = Some("80".into());

        let merged = entered.or(sample_form());
        assert_eq!(merged.measurements.weight.as_deref(), Some("80"));
        assert_eq!(merged.measurements.height.as_deref(), Some("175"));
        assert_eq!(merged.gender.as_deref(), Some("female"));
    }

    #[test]
    fn test_theme_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(Theme::load(&store), None);

        Theme::Dark.save(&mut store).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(Theme::load(&store), Some(Theme::Dark));

        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(Theme::load(&store), None);
    }
}
