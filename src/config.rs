use image::Rgb;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([70, 70, 70]);

// Camera settings
pub const FOV_DEGREES: f64 = 75.0;
pub const NEAR_PLANE: f64 = 0.1;
pub const FAR_PLANE: f64 = 1000.0;
pub const CAMERA_POSITION: [f64; 3] = [0.0, 0.0, 3.0];

// Light settings
pub const AMBIENT_INTENSITY: f64 = 1.0;

// Material settings
pub const SUBMESH_PALETTE: [u32; 3] = [0xFFDBD3, 0xE116C3, 0x0000FF];
pub const MATERIAL_ROUGHNESS: f64 = 0.5;
pub const MATERIAL_METALNESS: f64 = 0.5;

// User interaction settings
pub const ROTATION_SENSITIVITY_FACTOR: f64 = 0.001;

// Upload settings
pub const UPLOAD_FILENAME: &str = "uploaded_image.jpg";

pub const CONFIG_FILE_NAME: &str = "mannequin.toml";
pub const CONFIG_PATH_ENV: &str = "MANNEQUIN_CONFIG";
pub const SERVER_BASE_URL_ENV: &str = "MANNEQUIN_SERVER_BASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Runtime configuration resolved at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Determines endpoint host:port, e.g. `http://192.168.100.11:5000`
    #[serde(default = "default_server_base_url")]
    pub server_base_url: String,
    /// Decorative scene background
    #[serde(default = "default_background_url")]
    pub background_url: String,
    /// No timeout when absent
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_base_url: default_server_base_url(),
            background_url: default_background_url(),
            request_timeout_secs: None,
        }
    }
}

fn default_server_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_background_url() -> String {
    "https://cdna.artstation.com/p/assets/images/images/066/755/696/large/bruno-ferrari-sastreria.jpg?1693694999"
        .to_string()
}

impl AppConfig {
    /// Defaults, then the config file (if any), then the environment override.
    ///
    /// A broken config file does not stop resolution: the returned error is
    /// for reporting only, the env override is still applied on top of the
    /// defaults.
    pub fn resolve() -> (Self, Option<ConfigError>) {
        Self::resolve_from(
            std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from),
            std::env::var(SERVER_BASE_URL_ENV).ok().as_deref(),
        )
    }

    fn resolve_from(
        config_path: Option<PathBuf>,
        server_override: Option<&str>,
    ) -> (Self, Option<ConfigError>) {
        let path = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

        let (mut config, error) = if path.exists() {
            log::info!("Loading config from {}", path.display());
            match Self::from_file(&path) {
                Ok(config) => (config, None),
                Err(e) => (Self::default(), Some(e)),
            }
        } else {
            (Self::default(), None)
        };

        if let Some(base_url) = server_override {
            config.apply_server_override(base_url);
        }

        (config, error)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    fn apply_server_override(&mut self, base_url: &str) {
        let base_url = base_url.trim();
        if !base_url.is_empty() {
            self.server_base_url = base_url.to_string();
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.server_base_url.trim_end_matches('/'), path)
    }

    pub fn model_url(&self) -> String {
        self.endpoint("model")
    }

    pub fn upload_url(&self) -> String {
        self.endpoint("upload")
    }

    pub fn generate_url(&self) -> String {
        self.endpoint("generate")
    }
}
