use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Letterboxd's poster CDN: resized film-poster JPEGs.
pub const DEFAULT_POSTER_URL_PATTERN: &str =
    r"https://a\.ltrbxd\.com/resized/film-poster.*?\.jpg";

/// HTTP client parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Seconds to wait for a TCP/TLS connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole request, page or poster.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 60,
            user_agent: format!("huesort/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Global configuration loaded from `~/.config/huesort/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuesortConfig {
    /// Number of leading CSV rows searched for the header row.
    pub max_header_scan_rows: usize,
    /// Column labels the header row must contain, in any order.
    pub required_labels: Vec<String>,
    /// Name of the posters directory created next to the CSV file.
    pub posters_dir_name: String,
    /// Posters are shrunk by this factor in both dimensions (1 = keep size).
    pub shrink_factor: u32,
    /// Regex matching a poster image URL inside a film page's scripts.
    #[serde(default = "default_poster_url_pattern")]
    pub poster_url_pattern: String,
    /// Optional HTTP settings; if missing, built-in defaults are used.
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

fn default_poster_url_pattern() -> String {
    DEFAULT_POSTER_URL_PATTERN.to_string()
}

impl Default for HuesortConfig {
    fn default() -> Self {
        Self {
            max_header_scan_rows: 6,
            required_labels: vec!["Name".into(), "URL".into(), "Year".into()],
            posters_dir_name: "posters".into(),
            shrink_factor: 2,
            poster_url_pattern: default_poster_url_pattern(),
            http: None,
        }
    }
}

impl HuesortConfig {
    /// HTTP settings, falling back to defaults when the section is absent.
    pub fn http(&self) -> HttpConfig {
        self.http.clone().unwrap_or_default()
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_header_scan_rows == 0 {
            anyhow::bail!("max_header_scan_rows must be at least 1");
        }
        if self.required_labels.is_empty() || self.required_labels.iter().any(|l| l.is_empty()) {
            anyhow::bail!("required_labels must list at least one non-empty label");
        }
        if self.shrink_factor == 0 {
            anyhow::bail!("shrink_factor must be at least 1");
        }
        if self.posters_dir_name.is_empty()
            || self.posters_dir_name.contains(['/', '\\'])
            || self.posters_dir_name == "."
            || self.posters_dir_name == ".."
        {
            anyhow::bail!("posters_dir_name must be a plain directory name");
        }
        regex::Regex::new(&self.poster_url_pattern).context("invalid poster_url_pattern")?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("huesort")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HuesortConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HuesortConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: HuesortConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = HuesortConfig::default();
        assert_eq!(cfg.max_header_scan_rows, 6);
        assert_eq!(cfg.required_labels, vec!["Name", "URL", "Year"]);
        assert_eq!(cfg.posters_dir_name, "posters");
        assert_eq!(cfg.shrink_factor, 2);
        assert_eq!(cfg.poster_url_pattern, DEFAULT_POSTER_URL_PATTERN);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = HuesortConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: HuesortConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.max_header_scan_rows, cfg.max_header_scan_rows);
        assert_eq!(parsed.required_labels, cfg.required_labels);
        assert_eq!(parsed.posters_dir_name, cfg.posters_dir_name);
        assert_eq!(parsed.shrink_factor, cfg.shrink_factor);
        assert_eq!(parsed.poster_url_pattern, cfg.poster_url_pattern);
    }

    #[test]
    fn config_toml_two_label_variant() {
        let toml = r#"
            max_header_scan_rows = 4
            required_labels = ["Name", "URL"]
            posters_dir_name = "covers"
            shrink_factor = 1
        "#;
        let cfg: HuesortConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_header_scan_rows, 4);
        assert_eq!(cfg.required_labels, vec!["Name", "URL"]);
        assert_eq!(cfg.posters_dir_name, "covers");
        assert_eq!(cfg.shrink_factor, 1);
        assert_eq!(cfg.poster_url_pattern, DEFAULT_POSTER_URL_PATTERN);
        assert!(cfg.http.is_none());
        assert_eq!(cfg.http().connect_timeout_secs, 15);
    }

    #[test]
    fn config_toml_http_section() {
        let toml = r#"
            max_header_scan_rows = 6
            required_labels = ["Name", "URL", "Year"]
            posters_dir_name = "posters"
            shrink_factor = 2

            [http]
            connect_timeout_secs = 5
            timeout_secs = 20
            user_agent = "test-agent"
        "#;
        let cfg: HuesortConfig = toml::from_str(toml).unwrap();
        let http = cfg.http();
        assert_eq!(http.connect_timeout_secs, 5);
        assert_eq!(http.timeout_secs, 20);
        assert_eq!(http.user_agent, "test-agent");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = HuesortConfig::default();
        cfg.shrink_factor = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = HuesortConfig::default();
        cfg.required_labels.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = HuesortConfig::default();
        cfg.posters_dir_name = "../elsewhere".into();
        assert!(cfg.validate().is_err());

        let mut cfg = HuesortConfig::default();
        cfg.poster_url_pattern = "(".into();
        assert!(cfg.validate().is_err());
    }
}
