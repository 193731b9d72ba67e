use std::{env, fs, io, path::Path};
use serde::Deserialize;

const SETTINGS_FILENAME: &str = "settings.json";
const SETTINGS_ENV: &str = "TASKFLOW_SETTINGS";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("cannot parse JSON content from file {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_binding")]
    pub tcp_socket_binding: String,
    #[serde(default = "default_port")]
    pub tcp_socket_port: u16,
    /// redb file backing the record store. Without one the store is
    /// memory-only and starts from fixtures every boot.
    #[serde(default)]
    pub save_file: Option<String>,
    #[serde(default = "default_seed_fixtures")]
    pub seed_fixtures: bool,
    /// Endpoint of the AI description function.
    #[serde(default)]
    pub description_endpoint: Option<String>,
    /// Built frontend served for any path the API does not claim.
    #[serde(default)]
    pub static_dir: Option<String>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_binding() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_seed_fixtures() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tcp_socket_binding: default_binding(),
            tcp_socket_port: default_port(),
            save_file: None,
            seed_fixtures: default_seed_fixtures(),
            description_endpoint: None,
            static_dir: None,
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load from `$TASKFLOW_SETTINGS`, falling back to `settings.json` in the
    /// working directory. A missing file yields the defaults.
    pub fn load() -> Result<Settings, SettingsError> {
        let path = env::var(SETTINGS_ENV).unwrap_or_else(|_| SETTINGS_FILENAME.to_string());
        Settings::from_path(&path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => return Err(SettingsError::Read { path: display, source }),
        };
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse { path: display, source })
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.tcp_socket_binding, self.tcp_socket_port)
    }
}
