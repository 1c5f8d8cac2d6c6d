use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";

static PAGE_CONTEXT: OnceLock<PageContext> = OnceLock::new();

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid page url: {url}")]
    InvalidPageUrl { url: String },

    #[error("page url has no host: {url}")]
    MissingHost { url: String },

    #[error("page context already initialised for {host}")]
    AlreadyInitialised { host: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageContext {
    pub page_url: reqwest::Url,
    pub host: String,
    pub static_path: Option<String>,
}

impl PageContext {
    pub fn from_location(page_url: &str, last_script_src: Option<&str>) -> Result<Self, ConfigError> {
        let parsed = reqwest::Url::parse(page_url.trim()).map_err(|_| ConfigError::InvalidPageUrl {
            url: page_url.to_string(),
        })?;
        let hostname = parsed
            .host_str()
            .ok_or_else(|| ConfigError::MissingHost {
                url: page_url.to_string(),
            })?
            .to_string();
        let host = match parsed.port() {
            Some(port) => format!("{}://{}:{}/", parsed.scheme(), hostname, port),
            None => format!("{}://{}/", parsed.scheme(), hostname),
        };
        Ok(Self {
            page_url: parsed,
            host,
            static_path: last_script_src.and_then(static_origin),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.host, path.trim_start_matches('/'))
    }
}

pub fn static_origin(src: &str) -> Option<String> {
    let trimmed = src.trim();
    let lower = trimmed.to_ascii_lowercase();
    let (prefix_len, rest) = if lower.starts_with("https://") {
        (8, &trimmed[8..])
    } else if lower.starts_with("http://") {
        (7, &trimmed[7..])
    } else {
        (0, trimmed)
    };
    let end = rest.find(['/', '?', '#']);
    let authority = &rest[..end.unwrap_or(rest.len())];
    if authority.is_empty() {
        return None;
    }
    let delimiter_len = end.map(|_| 1).unwrap_or(0);
    Some(trimmed[..prefix_len + authority.len() + delimiter_len].to_string())
}

pub fn init_page_context(ctx: PageContext) -> Result<&'static PageContext, ConfigError> {
    let host = ctx.host.clone();
    PAGE_CONTEXT
        .set(ctx)
        .map_err(|_| ConfigError::AlreadyInitialised { host })?;
    PAGE_CONTEXT
        .get()
        .ok_or(ConfigError::AlreadyInitialised { host: String::new() })
}

pub fn page_context() -> Option<&'static PageContext> {
    PAGE_CONTEXT.get()
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub origin: Option<String>,
    pub cookie: Option<String>,
    #[serde(alias = "csrf_cookie")]
    pub csrf_cookie_name: Option<String>,
    pub timeout: Option<u64>,
    pub user_agent: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".buy4industry").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# buy4 config
#
# Location (default):
#   ~/.buy4industry/config.yml

# Page the requests are issued from; API paths are resolved against it.
origin: http://localhost:8000/

# Raw Cookie header sent with every request (session + csrftoken).
# cookie: "sessionid=...; csrftoken=..."
csrf_cookie_name: csrftoken

# HTTP
timeout: 10
# user_agent: "Mozilla/5.0"

# Output
output_format: text
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}
