use serde::Deserialize;

use crate::ClientError;

/// Shape of the `config.json` the server generates at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct BootConfig {
    pub api_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
}

impl BootConfig {
    pub fn from_file(path: &str) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path).map_err(|e| ClientError::Io(e.to_string()))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        serde_json::from_str(json).map_err(|e| ClientError::Parse(e.to_string()))
    }
}
