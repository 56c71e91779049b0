use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_PAGE_SIZE: usize = 8;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// Types the backend accepts for upload, plus Google-native documents it can export.
pub const DEFAULT_DRIVE_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "text/plain",
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "audio/mpeg",
    "audio/wav",
    "video/mp4",
    "image/jpeg",
    "image/png",
    "application/vnd.google-apps.document",
    "application/vnd.google-apps.spreadsheet",
    "application/vnd.google-apps.presentation",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OnboardingConfig {
    /// Cards per page in the staged-sources grid
    pub page_size: usize,
    /// Per-file ceiling checked at submit time
    pub max_file_bytes: u64,
    /// Whether step 2 offers a way back once the workspace exists
    pub allow_back_after_workspace: bool,
    pub drive_mime_types: Vec<String>,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            allow_back_after_workspace: false,
            drive_mime_types: DEFAULT_DRIVE_MIME_TYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl OnboardingConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".into()));
        }
        if self.max_file_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_file_bytes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Comma-joined filter in the form the picker widget expects.
    pub fn drive_mime_filter(&self) -> String {
        self.drive_mime_types.join(",")
    }

    pub fn max_file_megabytes(&self) -> u64 {
        self.max_file_bytes / (1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = OnboardingConfig::from_toml_str("").unwrap();
        assert_eq!(config, OnboardingConfig::default());
        assert_eq!(config.max_file_megabytes(), 100);
    }

    #[test]
    fn overrides_apply() {
        let config = OnboardingConfig::from_toml_str(
            "page_size = 4\nallow_back_after_workspace = true\ndrive_mime_types = [\"application/pdf\"]\n",
        )
        .unwrap();
        assert_eq!(config.page_size, 4);
        assert!(config.allow_back_after_workspace);
        assert_eq!(config.drive_mime_filter(), "application/pdf");
    }

    #[test]
    fn rejects_zero_page_size_and_unknown_keys() {
        assert!(matches!(
            OnboardingConfig::from_toml_str("page_size = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            OnboardingConfig::from_toml_str("pagesize = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
