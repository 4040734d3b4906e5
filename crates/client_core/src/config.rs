use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use shared::{
    domain::{
        parse_fret_count, ChordFilter, ScaleQuery, DEFAULT_FRETS, STANDARD_TUNING,
    },
    error::ValidationError,
    protocol::{DIAGRAM_PATH, STATIC_DIAGRAM_PATH},
};
use tracing::warn;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "scalemate.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub server_url: String,
    pub diagram_path: String,
    pub static_path: String,
    pub default_root: String,
    pub default_scale: String,
    pub default_tuning: String,
    pub default_frets: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            diagram_path: DIAGRAM_PATH.into(),
            static_path: STATIC_DIAGRAM_PATH.into(),
            default_root: "A".into(),
            default_scale: "minor".into(),
            default_tuning: STANDARD_TUNING.into(),
            default_frets: DEFAULT_FRETS,
        }
    }
}

impl ClientSettings {
    pub fn parsed_server_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.server_url.trim())
            .with_context(|| format!("invalid server url '{}'", self.server_url))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(anyhow!(
                "server url must use http or https, got '{other}://'"
            )),
        }
    }

    /// Query the controller starts from, before any user edit.
    pub fn initial_query(&self) -> Result<ScaleQuery, ValidationError> {
        Ok(ScaleQuery {
            root: self.default_root.trim().parse()?,
            scale_type: self.default_scale.parse()?,
            tuning: self.default_tuning.parse()?,
            frets: parse_fret_count(&self.default_frets.to_string())?,
            chord_filter: ChordFilter::Any,
        })
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE))
}

pub fn load_settings_from(path: &Path) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_file_values(&mut settings, &file_cfg),
            Err(err) => warn!(path = %path.display(), error = %err, "ignoring unreadable config file"),
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file_values(settings: &mut ClientSettings, file_cfg: &HashMap<String, toml::Value>) {
    let text = |key: &str| file_cfg.get(key).and_then(|v| v.as_str()).map(str::to_string);

    if let Some(v) = text("server_url") {
        settings.server_url = v;
    }
    if let Some(v) = text("diagram_path") {
        settings.diagram_path = v;
    }
    if let Some(v) = text("static_path") {
        settings.static_path = v;
    }
    if let Some(v) = text("root") {
        settings.default_root = v;
    }
    if let Some(v) = text("scale") {
        settings.default_scale = v;
    }
    if let Some(v) = text("tuning") {
        settings.default_tuning = v;
    }
    match file_cfg.get("frets").map(|v| v.as_integer()) {
        Some(Some(frets)) if frets > 0 => match u32::try_from(frets) {
            Ok(frets) => settings.default_frets = frets,
            Err(_) => warn!(frets, "ignoring out-of-range 'frets' in config file"),
        },
        Some(_) => warn!("ignoring non-positive or non-integer 'frets' in config file"),
        None => {}
    }
}

fn apply_env_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SCALEMATE_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__DIAGRAM_PATH") {
        settings.diagram_path = v;
    }
    if let Some(v) = lookup("APP__STATIC_PATH") {
        settings.static_path = v;
    }

    if let Some(v) = lookup("APP__ROOT") {
        settings.default_root = v;
    }
    if let Some(v) = lookup("APP__SCALE") {
        settings.default_scale = v;
    }
    if let Some(v) = lookup("APP__TUNING") {
        settings.default_tuning = v;
    }

    if let Some(v) = lookup("APP__FRETS") {
        match parse_fret_count(&v) {
            Ok(frets) => settings.default_frets = frets.get(),
            Err(err) => warn!(error = %err, "ignoring APP__FRETS"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
