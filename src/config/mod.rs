use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::gemini;

const DEFAULT_PORT: u16 = 4400;
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 30;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP server port (default: 4400).
    port: Option<u16>,
    /// Bind address (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
    /// Log level filter string, e.g. "debug", "info,memboxd=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured for log aggregators).
    log_format: Option<String>,
    /// Directory of single-page-app assets to serve on unmatched routes.
    assets_dir: Option<PathBuf>,
    /// Gemini API key. Prefer the GEMINI_API_KEY env var; TOML is a fallback.
    gemini_api_key: Option<String>,
    /// Override the generative-language API base URL.
    gemini_api_url: Option<String>,
    /// Model used for letter enhancement (default: gemini-1.5-flash).
    gemini_model: Option<String>,
    /// Upstream request timeout in seconds (default: 30).
    gemini_timeout_secs: Option<u64>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            // Config is built before the tracing subscriber exists (the TOML
            // decides the log filter), so this goes straight to stderr.
            eprintln!(
                "warn: failed to parse {}: {e} — using defaults",
                path.display()
            );
            None
        }
    }
}

// ─── BoxConfig ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BoxConfig {
    pub port: u16,
    pub bind_address: String,
    pub data_dir: PathBuf,
    pub log: String,
    /// "pretty" (default) | "json".
    pub log_format: String,
    /// SPA assets served on unmatched routes. None = API only.
    pub assets_dir: Option<PathBuf>,
    /// Upstream credential (GEMINI_API_KEY env var). None is request-fatal
    /// for the proxy endpoint, never a startup crash.
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub gemini_timeout_secs: u64,
}

impl BoxConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        log_format: Option<String>,
        bind_address: Option<String>,
        assets_dir: Option<PathBuf>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let bind_address = bind_address
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let log_format = log_format
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let assets_dir = assets_dir.or(toml.assets_dir);

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or(toml.gemini_api_key);

        let gemini_api_url = std::env::var("MEMBOX_GEMINI_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.gemini_api_url)
            .unwrap_or_else(|| gemini::DEFAULT_API_URL.to_string());

        let gemini_model = toml
            .gemini_model
            .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string());

        let gemini_timeout_secs = toml
            .gemini_timeout_secs
            .unwrap_or(DEFAULT_GEMINI_TIMEOUT_SECS);

        Self {
            port,
            bind_address,
            data_dir,
            log,
            log_format,
            assets_dir,
            gemini_api_key,
            gemini_api_url,
            gemini_model,
            gemini_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn toml_logging_fields_reach_the_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "log = \"debug\"\nlog_format = \"json\"\nport = 5555\n",
        )
        .unwrap();

        let cfg = BoxConfig::new(None, Some(dir.path().to_path_buf()), None, None, None, None);
        assert_eq!(cfg.log, "debug");
        assert_eq!(cfg.log_format, "json");
        assert_eq!(cfg.port, 5555);
    }

    #[test]
    fn cli_layer_beats_toml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "log = \"debug\"\nlog_format = \"json\"\n",
        )
        .unwrap();

        let cfg = BoxConfig::new(
            Some(4242),
            Some(dir.path().to_path_buf()),
            Some("warn".to_string()),
            Some("pretty".to_string()),
            None,
            None,
        );
        assert_eq!(cfg.log, "warn");
        assert_eq!(cfg.log_format, "pretty");
        assert_eq!(cfg.port, 4242);
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = {{").unwrap();

        let cfg = BoxConfig::new(None, Some(dir.path().to_path_buf()), None, None, None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.log, "info");
        assert_eq!(cfg.log_format, "pretty");
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/membox
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("membox");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/membox or ~/.local/share/membox
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("membox");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("membox");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\membox
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("membox");
        }
    }
    // Fallback
    PathBuf::from(".membox")
}
