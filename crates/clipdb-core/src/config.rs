//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `clipdb.toml` + `clipdb.<env>.toml` + `CLIPDB_*` env
//! vars. Provides helpers to expand `~` and `${VAR}` and to locate the
//! clippings export on a mounted device.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::codec::TextCodec;
use crate::error::Error;

/// File name the device writes its export to.
pub const CLIPPINGS_FILE_NAME: &str = "My Clippings.txt";

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("clipdb.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("clipdb.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("clipdb.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("clipdb.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("CLIPDB_").split("__"));

        let config = Self { figment };
        config.export_settings()?.validate()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The `[export]` table, or defaults when the table is absent.
    pub fn export_settings(&self) -> anyhow::Result<ExportSettings> {
        if self.figment.find_value("export").is_err() {
            return Ok(ExportSettings::default());
        }
        self.get("export")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub source: String,
    pub destination: String,
    pub encoding: String,
    pub format: String,
    pub include_metadata: bool,
    pub show_progress: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            source: "/Volumes/Kindle".to_string(),
            destination: "./KindleClippings".to_string(),
            encoding: "utf-8".to_string(),
            format: "txt".to_string(),
            include_metadata: false,
            show_progress: true,
        }
    }
}

impl ExportSettings {
    pub fn validate(&self) -> Result<(), Error> {
        TextCodec::for_label(&self.encoding)?;
        if self.destination.trim().is_empty() {
            return Err(Error::InvalidConfig("export.destination must not be empty".to_string()));
        }
        if self.source.trim().is_empty() {
            return Err(Error::InvalidConfig("export.source must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn source_file(&self) -> PathBuf {
        resolve_source(&expand_path(&self.source))
    }

    pub fn destination_dir(&self) -> PathBuf {
        expand_path(&self.destination)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// A `.txt` source is used verbatim; anything else is taken to be the device
/// mount (or a folder) holding [`CLIPPINGS_FILE_NAME`].
pub fn resolve_source(source: &Path) -> PathBuf {
    let is_txt = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
    if is_txt {
        source.to_path_buf()
    } else {
        source.join(CLIPPINGS_FILE_NAME)
    }
}
