use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use studio_server::build_app;
use studio_server::config::{ServerConfig, StorageConfig};

pub const HEADER_LINE: &str = "timestamp,name,email,message";

pub struct TestServer {
    pub addr: SocketAddr,
    pub csv_path: PathBuf,
    _storage_dir: TempDir,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server writing into a fresh temporary directory.
    pub async fn new() -> Self {
        Self::from_config(ServerConfig::default()).await
    }

    /// Start a test server with `config`; the CSV path is replaced by one
    /// inside a fresh temporary directory.
    pub async fn from_config(config: ServerConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("logs/contact_submissions.csv");
        let config = ServerConfig {
            storage: StorageConfig {
                csv_path: csv_path.to_string_lossy().into_owned(),
                ..config.storage
            },
            ..config
        };
        Self::start(config, dir, csv_path).await
    }

    /// Start a test server whose CSV path can never be created.
    pub async fn with_unwritable_storage() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let csv_path = blocker.join("contact_submissions.csv");
        let config = ServerConfig {
            storage: StorageConfig {
                csv_path: csv_path.to_string_lossy().into_owned(),
                ..StorageConfig::default()
            },
            ..ServerConfig::default()
        };
        Self::start(config, dir, csv_path).await
    }

    async fn start(config: ServerConfig, dir: TempDir, csv_path: PathBuf) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            csv_path,
            _storage_dir: dir,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Contents of the CSV file, or `None` if it has not been created.
    pub fn csv_contents(&self) -> Option<String> {
        std::fs::read_to_string(&self.csv_path).ok()
    }

    pub fn csv_lines(&self) -> Vec<String> {
        self.csv_contents()
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }
}

/// POST a JSON body to `/api/contact`.
pub async fn post_contact(server: &TestServer, body: &serde_json::Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/api/contact", server.base_url()))
        .json(body)
        .send()
        .await
        .unwrap()
}

/// Build a contact body.
pub fn contact(name: &str, email: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ "name": name, "email": email, "message": message })
}

/// Parse CSV text (with header) into records.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, ["timestamp", "name", "email", "message"]);
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}
