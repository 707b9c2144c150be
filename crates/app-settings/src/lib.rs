use core_types::{Dimensions, RgbColor};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Optional override file, resolved against the working directory.
pub const SETTINGS_FILE_NAME: &str = "store-assets.json";

#[derive(Debug, Error)]
pub enum AppSettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, AppSettingsError>;

/// Store screenshot normalization: 1280x800, 24-bit PNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotSettings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub target_width: u32,
    pub target_height: u32,
    pub background: RgbColor,
    /// Matched case-insensitively, without the leading dot.
    pub extensions: Vec<String>,
}

impl ScreenshotSettings {
    pub fn target(&self) -> Dimensions {
        Dimensions::new(self.target_width, self.target_height)
    }
}

impl Default for ScreenshotSettings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("screenshots"),
            output_dir: PathBuf::from("screenshots").join("store_ready"),
            target_width: 1280,
            target_height: 800,
            background: RgbColor::WHITE,
            extensions: vec!["png".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSettings {
    pub output_dir: PathBuf,
    pub sizes: Vec<u32>,
    /// Files are written as `{file_prefix}{size}.png`.
    pub file_prefix: String,
}

impl IconSettings {
    pub fn file_name(&self, size: u32) -> String {
        format!("{}{size}.png", self.file_prefix)
    }
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("assets"),
            sizes: vec![16, 32, 48, 128],
            file_prefix: "icon".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub screenshots: ScreenshotSettings,
    pub icons: IconSettings,
}

impl AppSettings {
    /// Read `store-assets.json` from the working directory, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = Path::new(SETTINGS_FILE_NAME);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: AppSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let shots = &self.screenshots;
        if shots.target().is_empty() {
            return Err(AppSettingsError::Invalid(format!(
                "target size {} has a zero side",
                shots.target()
            )));
        }
        if shots.extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(AppSettingsError::Invalid(
                "no screenshot extensions configured".to_string(),
            ));
        }
        if self.icons.sizes.contains(&0) {
            return Err(AppSettingsError::Invalid(
                "icon sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
