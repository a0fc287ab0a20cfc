use serde::Deserialize;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_media_root() -> String {
    "media".to_string()
}

fn default_media_base_url() -> String {
    "http://127.0.0.1:8080/media".to_string()
}

/// Configuration options for the Goodmarket service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Secret used to verify bearer tokens issued by the auth service.
    pub jwt_secret: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory where uploaded images are written.
    #[serde(default = "default_media_root")]
    pub media_root: String,
    /// Public base URL under which stored images are reachable.
    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,
}
