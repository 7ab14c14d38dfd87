//! Loading forecast payloads saved as JSON files.

use crate::forecast_data::error::PayloadError;
use crate::types::payload::ForecastPayload;
use log::info;
use std::path::Path;

impl ForecastPayload {
    /// Parses a payload from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Json`] if the text is not valid JSON or a required
    /// section or key is missing or has the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a payload from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Io`] if the file can't be read and
    /// [`PayloadError::Json`] if it doesn't hold a forecast payload.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PayloadError> {
        let path = path.as_ref();
        info!("Loading forecast payload from {}", path.display());
        let json = std::fs::read_to_string(path)
            .map_err(|e| PayloadError::Io(path.to_path_buf(), e))?;
        Self::from_json_str(&json)
    }
}
