use serde::Deserialize;

/// Config file read when `STUDIO_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "studio.toml";

/// Top-level server configuration, loaded from `studio.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Reported by `GET /`.
    pub service_name: String,
    pub storage: StorageConfig,
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            service_name: "Architecture Studio API".to_string(),
            storage: StorageConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Where submissions are persisted and how the export is named.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Relative paths resolve against the process working directory.
    pub csv_path: String,
    pub export_filename: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            csv_path: "logs/contact_submissions.csv".to_string(),
            export_filename: "contact_submissions.csv".to_string(),
        }
    }
}

/// Request-level limits enforced by the router middleware.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_body_bytes: usize,
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// `host:port` string handed to the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("port must be > 0".to_string());
        }
        if self.storage.csv_path.trim().is_empty() {
            return Err("storage.csv_path must not be empty".to_string());
        }
        if std::path::Path::new(&self.storage.csv_path)
            .file_name()
            .is_none()
        {
            return Err(format!(
                "storage.csv_path {:?} does not name a file",
                self.storage.csv_path
            ));
        }
        let filename = &self.storage.export_filename;
        if filename.is_empty()
            || filename
                .chars()
                .any(|c| c == '"' || c == '/' || c == '\\' || c.is_control())
        {
            return Err(format!(
                "storage.export_filename {filename:?} is not a plain file name"
            ));
        }
        if self.limits.max_body_bytes == 0 {
            return Err("limits.max_body_bytes must be > 0".to_string());
        }
        if self.limits.request_timeout_secs == 0 {
            return Err("limits.request_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }

    /// Load config from `STUDIO_CONFIG` or `studio.toml` if it exists, then
    /// apply env var overrides.
    pub fn load() -> Self {
        let path = std::env::var("STUDIO_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        let mut config = Self::load_file(&path);
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Parse a config file, falling back to defaults when it is missing or invalid.
    pub fn load_file(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(path, "Loaded configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!(path, "Failed to parse config: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!(path, "No config file found, using defaults");
                ServerConfig::default()
            },
        }
    }

    /// Apply `PORT`, `STUDIO_HOST` and `STUDIO_CSV_PATH` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("PORT")
            && !val.is_empty()
        {
            match val.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(value = %val, "Ignoring unparseable PORT"),
            }
        }
        if let Some(host) = lookup("STUDIO_HOST")
            && !host.is_empty()
        {
            self.host = host;
        }
        if let Some(path) = lookup("STUDIO_CSV_PATH")
            && !path.is_empty()
        {
            self.storage.csv_path = path;
        }
    }
}
