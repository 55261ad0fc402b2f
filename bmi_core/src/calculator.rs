//! Calculator session: current result, history and form restore.

use crate::history::HistoryStore;
use crate::storage::KeyValueStore;
use crate::{engine, normalize, Assessment, Error, FormData, HistoryRecord, Result};
use chrono::{DateTime, Utc};

/// Holds the current result between a calculation and a save or reset
pub struct Calculator<S: KeyValueStore> {
    store: S,
    current: Option<Assessment>,
}

impl<S: KeyValueStore> Calculator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Validate and assess a form, replacing the current result.
    ///
    /// On a validation failure the previous result is kept. The form itself
    /// is saved for session restore; failing to save it is only logged.
    pub fn calculate(&mut self, form: &FormData) -> Result<&Assessment> {
        let profile = normalize::normalize_profile(form)?;
        let assessment = engine::assess(&profile)?;

        if let Err(e) = form.save(&mut self.store) {
            tracing::warn!("Failed to save form data: {}", e);
        }

        Ok(self.current.insert(assessment))
    }

    pub fn current(&self) -> Option<&Assessment> {
        self.current.as_ref()
    }

    /// Append the current result to history, stamped with the current time
    pub fn save_current(&mut self) -> Result<HistoryRecord> {
        self.save_current_at(Utc::now())
    }

    pub fn save_current_at(&mut self, at: DateTime<Utc>) -> Result<HistoryRecord> {
        let assessment = self
            .current
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("no BMI result to save; calculate first".into()))?;

        let record = HistoryRecord::from_result(&assessment.result, at);
        HistoryStore::new(&mut self.store).append(record.clone())?;
        Ok(record)
    }

    /// Clear the current result and the saved form
    pub fn reset(&mut self) -> Result<()> {
        self.current = None;
        FormData::clear(&mut self.store)?;
        tracing::debug!("Calculator reset");
        Ok(())
    }

    /// Saved form from a previous session, if any
    pub fn restore_form(&self) -> Option<FormData> {
        FormData::restore(&self.store)
    }

    pub fn history(&mut self) -> HistoryStore<&mut S> {
        HistoryStore::new(&mut self.store)
    }
}
