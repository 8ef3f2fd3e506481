// Configuration module
// Clinic settings that live outside the backend: where the data is and how
// the grid is drawn

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::models::appointment::DEFAULT_COLOR;
use crate::scheduler::time_grid::{is_aligned, SLOT_INTERVAL};
use crate::scheduler::GridGeometry;
use crate::services::backend::{Backend, RestBackend, SqliteBackend};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATABASE_FILE_NAME: &str = "clinic.db";
pub const DEFAULT_API_KEY_ENV: &str = "VET_CALENDAR_API_KEY";
/// Length of an appointment created by dropping onto the calendar
pub const DEFAULT_DROP_DURATION: u32 = 30;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "vet-calendar", "VetCalendar")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Sqlite,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// SQLite file; the per-user data directory when unset
    pub sqlite_path: Option<PathBuf>,
    pub rest_url: Option<String>,
    /// Environment variable holding the REST API key
    pub api_key_env: String,
    /// Base for public object URLs of the SQLite backend
    pub public_base: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Sqlite,
            sqlite_path: None,
            rest_url: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            public_base: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub slot_height: f32,
    pub column_width: f32,
    pub time_column_width: f32,
    pub default_color: String,
    pub drop_duration_minutes: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        let geometry = GridGeometry::default();
        Self {
            slot_height: geometry.slot_height,
            column_width: geometry.column_width,
            time_column_width: geometry.time_column_width,
            default_color: DEFAULT_COLOR.to_string(),
            drop_duration_minutes: DEFAULT_DROP_DURATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClinicConfig {
    /// Email of the account allowed into the admin screens
    pub admin_email: Option<String>,
    pub backend: BackendConfig,
    pub grid: GridConfig,
}

impl ClinicConfig {
    /// `config.toml` in the per-user config directory
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn default_database_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse configuration")?;
        config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Load `path` (or the default location); a missing file gives the
    /// defaults and a broken one is reported and replaced by them.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => {
                log::warn!("No config directory available, using defaults");
                return Self::default();
            }
        };

        if !path.exists() {
            log::info!("No configuration at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to load configuration: {:#}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), String> {
        let grid = &self.grid;
        if grid.slot_height <= 0.0 || grid.column_width <= 0.0 || grid.time_column_width < 0.0 {
            return Err("Grid dimensions must be positive".to_string());
        }
        if grid.drop_duration_minutes < SLOT_INTERVAL || !is_aligned(grid.drop_duration_minutes) {
            return Err(format!(
                "Drop duration must be a positive multiple of {} minutes",
                SLOT_INTERVAL
            ));
        }
        if !grid.default_color.starts_with('#') {
            return Err("Default color must be in hex format".to_string());
        }
        if self.backend.kind == BackendKind::Rest && self.backend.rest_url.is_none() {
            return Err("REST backend needs rest_url".to_string());
        }
        Ok(())
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry {
            slot_height: self.grid.slot_height,
            column_width: self.grid.column_width,
            time_column_width: self.grid.time_column_width,
        }
    }

    /// Open the configured backend.
    pub fn open_backend(&self) -> Result<Box<dyn Backend>> {
        match self.backend.kind {
            BackendKind::Sqlite => {
                let path = match self.backend.sqlite_path.clone().or_else(Self::default_database_path) {
                    Some(path) => path,
                    None => {
                        log::warn!("No data directory available, using an in-memory database");
                        PathBuf::from(":memory:")
                    }
                };
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }

                let mut backend = SqliteBackend::open(&path.to_string_lossy())?;
                if let Some(base) = &self.backend.public_base {
                    backend = backend.with_public_base(base.clone());
                }
                Ok(Box::new(backend))
            }
            BackendKind::Rest => {
                let url = self
                    .backend
                    .rest_url
                    .as_deref()
                    .ok_or_else(|| anyhow!("REST backend needs rest_url"))?;
                let key = std::env::var(&self.backend.api_key_env).with_context(|| {
                    format!("API key variable {} is not set", self.backend.api_key_env)
                })?;
                log::info!("Using hosted backend at {}", url);
                Ok(Box::new(RestBackend::new(url, key)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ClinicConfig::default();
        assert_eq!(config.backend.kind, BackendKind::Sqlite);
        assert_eq!(config.grid.drop_duration_minutes, 30);
        assert_eq!(config.geometry(), GridGeometry::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = ClinicConfig::from_toml_str(
            r#"
            admin_email = "admin@clinic.example"

            [grid]
            slot_height = 48.0
            "#,
        )
        .unwrap();

        assert_eq!(config.admin_email.as_deref(), Some("admin@clinic.example"));
        assert_eq!(config.grid.slot_height, 48.0);
        assert_eq!(config.grid.column_width, 240.0);
        assert_eq!(config.backend, BackendConfig::default());
    }

    #[test]
    fn test_rest_needs_url() {
        assert!(ClinicConfig::from_toml_str("[backend]\nkind = \"rest\"\n").is_err());
        let config = ClinicConfig::from_toml_str(
            "[backend]\nkind = \"rest\"\nrest_url = \"https://clinic.example.co\"\n",
        )
        .unwrap();
        assert_eq!(config.backend.kind, BackendKind::Rest);
    }

    #[test]
    fn test_rejects_misaligned_drop_duration() {
        assert!(ClinicConfig::from_toml_str("[grid]\ndrop_duration_minutes = 20\n").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = ClinicConfig::default();
        config.admin_email = Some("admin@clinic.example".to_string());
        config.backend.sqlite_path = Some(dir.path().join("clinic.db"));
        config.save_to(&path).unwrap();

        assert_eq!(ClinicConfig::load(Some(&path)), config);
    }

    #[test]
    fn test_load_missing_or_broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(ClinicConfig::load(Some(&missing)), ClinicConfig::default());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[grid\n").unwrap();
        assert_eq!(ClinicConfig::load(Some(&broken)), ClinicConfig::default());
    }

    #[test]
    fn test_open_sqlite_backend_in_tempdir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClinicConfig::default();
        config.backend.sqlite_path = Some(dir.path().join("data").join("clinic.db"));

        let backend = config.open_backend().unwrap();
        assert!(backend
            .fetch_all(crate::services::backend::Collection::Patients, None)
            .unwrap()
            .is_empty());
        assert!(dir.path().join("data").join("clinic.db").exists());
    }
}
