use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Cookie names and expiries carried over from the web client.
pub const LOCALE_COOKIE: &str = "doc_translator_language";
pub const EMAIL_COOKIE: &str = "doc_translator_email";
pub const LOCALE_COOKIE_DAYS: i64 = 365;
pub const EMAIL_COOKIE_DAYS: i64 = 30;

const STORE_FILE: &str = "cookies.json";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preference store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("no configuration directory available")]
    NoConfigDir,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

/// Name/value preference store with cookie semantics: per-entry expiry,
/// URL-encoded wire form, `Path=/; SameSite=Lax` attributes. Expired entries
/// read as absent and are pruned whenever the store is persisted.
#[derive(Debug, Default)]
pub struct CookieStore {
    entries: HashMap<String, StoredValue>,
    path: Option<PathBuf>,
}

impl CookieStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store under the platform configuration directory, creating
    /// an empty one when no file exists yet.
    pub fn open_default(app_dir: &str) -> Result<Self, PrefsError> {
        let dir = dirs::config_dir()
            .ok_or(PrefsError::NoConfigDir)?
            .join(app_dir);
        Self::open(dir.join(STORE_FILE))
    }

    pub fn open(path: PathBuf) -> Result<Self, PrefsError> {
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            entries,
            path: Some(path),
        })
    }

    /// Stores a value; `days` of `None` means a session entry with no expiry.
    pub fn set(&mut self, name: &str, value: &str, days: Option<i64>) {
        let expires_at = days.map(|days| Utc::now() + Duration::days(days));
        self.entries.insert(
            name.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.get_at(name, Utc::now())
    }

    fn get_at(&self, name: &str, now: DateTime<Utc>) -> Option<String> {
        let entry = self.entries.get(name)?;
        match entry.expires_at {
            Some(expires) if expires <= now => None,
            _ => Some(entry.value.clone()),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.remove(name);
    }

    /// Writes the store back to disk, dropping entries that have expired.
    pub fn persist(&mut self) -> Result<(), PrefsError> {
        let now = Utc::now();
        self.entries
            .retain(|_, entry| !matches!(entry.expires_at, Some(expires) if expires <= now));

        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_vec_pretty(&self.entries)?;
        fs::write(&path, serialized)?;
        Ok(())
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Renders a `Set-Cookie`-style string the way the web client wrote cookies:
/// URL-encoded value, `Expires` as an HTTP date, path-scoped, `SameSite=Lax`.
pub fn format_set_cookie(
    name: &str,
    value: &str,
    days: Option<i64>,
    now: SystemTime,
) -> String {
    let mut cookie = format!("{name}={}", urlencoding::encode(value));
    if let Some(days) = days {
        let expires = now + std::time::Duration::from_secs(days.unsigned_abs() * 24 * 60 * 60);
        cookie.push_str("; Expires=");
        cookie.push_str(&httpdate::fmt_http_date(expires));
    }
    cookie.push_str("; Path=/; SameSite=Lax");
    cookie
}

/// Parses a `a=1; b=2` cookie header, URL-decoding values. Malformed pairs
/// are skipped.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let decoded = urlencoding::decode(value).ok()?;
            Some((name.to_string(), decoded.into_owned()))
        })
        .collect()
}
