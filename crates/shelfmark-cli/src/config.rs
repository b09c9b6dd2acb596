// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use shelfmark_app::{LabelLayout, Messages};
use shelfmark_sheets::{DEFAULT_BASE_URL, SheetSource};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "shelfmark";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_SHEET_ID: &str = "1jT55HXOqVATpFRmUmtm8GrraipfvNjNDKzlQXldER_M";
const DEFAULT_SHEET_NAME: &str = "Box";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub messages: MessageOverrides,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            source: Source::default(),
            labels: Labels::default(),
            messages: MessageOverrides::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub base_url: Option<String>,
    pub sheet_id: Option<String>,
    pub sheet_name: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            sheet_id: Some(DEFAULT_SHEET_ID.to_owned()),
            sheet_name: Some(DEFAULT_SHEET_NAME.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Labels {
    pub output_dir: Option<String>,
    pub width_mm: Option<u32>,
    pub height_mm: Option<u32>,
}

/// Per-message overrides; unset keys keep the built-in Thai text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageOverrides {
    pub load_failed: Option<String>,
    pub empty_selection: Option<String>,
    pub no_results: Option<String>,
    pub all_shelves: Option<String>,
    pub loading: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("SHELFMARK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set SHELFMARK_CONFIG_PATH to the config file"
            )
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [source], [labels], [messages], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        for (field, value) in [
            ("source.sheet_id", &self.source.sheet_id),
            ("source.sheet_name", &self.source.sheet_name),
            ("source.base_url", &self.source.base_url),
        ] {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                bail!("{field} in {} must not be empty", path.display());
            }
        }

        if let Some(timeout) = &self.source.timeout {
            let parsed = parse_duration(timeout)
                .with_context(|| format!("source.timeout in {}", path.display()))?;
            if parsed.is_zero() {
                bail!(
                    "source.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        for (field, value) in [
            ("labels.width_mm", self.labels.width_mm),
            ("labels.height_mm", self.labels.height_mm),
        ] {
            if value == Some(0) {
                bail!("{field} in {} must be positive, got 0", path.display());
            }
        }

        if let Some(level) = &self.log.level
            && level.trim().is_empty()
        {
            bail!("log.level in {} must not be empty", path.display());
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.source
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn sheet_id(&self) -> &str {
        self.source.sheet_id.as_deref().unwrap_or(DEFAULT_SHEET_ID)
    }

    pub fn sheet_name(&self) -> &str {
        self.source
            .sheet_name
            .as_deref()
            .unwrap_or(DEFAULT_SHEET_NAME)
    }

    pub fn sheet_source(&self) -> Result<SheetSource> {
        SheetSource::new(self.base_url(), self.sheet_id(), self.sheet_name())
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.source.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn label_layout(&self) -> LabelLayout {
        let defaults = LabelLayout::default();
        LabelLayout {
            width_mm: self.labels.width_mm.unwrap_or(defaults.width_mm),
            height_mm: self.labels.height_mm.unwrap_or(defaults.height_mm),
        }
    }

    pub fn output_dir(&self) -> Result<PathBuf> {
        match &self.labels.output_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(data_dir()?.join("labels")),
        }
    }

    pub fn messages(&self) -> Messages {
        let overrides = &self.messages;
        let mut messages = Messages::default();
        for (slot, value) in [
            (&mut messages.load_failed, &overrides.load_failed),
            (&mut messages.empty_selection, &overrides.empty_selection),
            (&mut messages.no_results, &overrides.no_results),
            (&mut messages.all_shelves, &overrides.all_shelves),
            (&mut messages.loading, &overrides.loading),
        ] {
            if let Some(value) = value {
                value.clone_into(slot);
            }
        }
        messages
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# shelfmark config\n# Place this file at: {}\n\nversion = 1\n\n[source]\nbase_url = \"{}\"\nsheet_id = \"{}\"\nsheet_name = \"{}\"\ntimeout = \"{}\"\n\n[labels]\n# Optional. Default is platform data dir (for example ~/.local/share/shelfmark/labels)\n# output_dir = \"/absolute/path/to/labels\"\nwidth_mm = 100\nheight_mm = 80\n\n[messages]\n# Any key left out keeps the built-in text.\n# load_failed = \"Could not load data. Check your connection.\"\n# empty_selection = \"Select at least one row to print.\"\n# no_results = \"No matching rows.\"\n# all_shelves = \"All\"\n# loading = \"Loading...\"\n\n[log]\n# SHELFMARK_LOG overrides this filter.\nlevel = \"{}\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_SHEET_ID,
            DEFAULT_SHEET_NAME,
            DEFAULT_TIMEOUT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

/// Platform data directory for label output and the log file.
pub fn data_dir() -> Result<PathBuf> {
    let root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set [labels].output_dir in the config")
    })?;
    Ok(root.join(APP_NAME))
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("timeout duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use shelfmark_app::{DEFAULT_EMPTY_SELECTION, DEFAULT_LOAD_FAILED, LabelLayout};
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.sheet_name(), "Box");
        assert_eq!(config.timeout()?, Duration::from_secs(10));
        assert_eq!(config.label_layout(), LabelLayout::default());
        assert_eq!(config.log_level(), "info");
        assert_eq!(
            config.sheet_source()?.query_url().path(),
            "/spreadsheets/d/1jT55HXOqVATpFRmUmtm8GrraipfvNjNDKzlQXldER_M/gviz/tq"
        );
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[source]\nsheet_name = \"Box\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[source], [labels], [messages], and [log]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[source]\nbase_url = \"http://127.0.0.1:9000/\"\nsheet_id = \"abc\"\nsheet_name = \"Boxes\"\ntimeout = \"500ms\"\n[labels]\noutput_dir = \"/srv/labels\"\nwidth_mm = 60\n[log]\nlevel = \"debug\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
        assert_eq!(config.sheet_id(), "abc");
        assert_eq!(config.sheet_name(), "Boxes");
        assert_eq!(config.timeout()?, Duration::from_millis(500));
        assert_eq!(config.output_dir()?, PathBuf::from("/srv/labels"));
        assert_eq!(
            config.label_layout(),
            LabelLayout {
                width_mm: 60,
                height_mm: 80,
            }
        );
        assert_eq!(config.log_level(), "debug");
        Ok(())
    }

    #[test]
    fn partial_message_overrides_keep_remaining_defaults() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[messages]\nload_failed = \"Could not load\"\n")?;
        let messages = Config::load(&path)?.messages();
        assert_eq!(messages.load_failed, "Could not load");
        assert_ne!(messages.load_failed, DEFAULT_LOAD_FAILED);
        assert_eq!(messages.empty_selection, DEFAULT_EMPTY_SELECTION);
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn blank_source_fields_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[source]\nsheet_id = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank sheet id should fail");
        assert!(error.to_string().contains("source.sheet_id"));
        Ok(())
    }

    #[test]
    fn zero_label_dimensions_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[labels]\nheight_mm = 0\n")?;
        let error = Config::load(&path).expect_err("zero height should fail");
        assert!(error.to_string().contains("labels.height_mm"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("SHELFMARK_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("SHELFMARK_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("SHELFMARK_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("shelfmark/config.toml"));
        Ok(())
    }

    #[test]
    fn timeout_parses_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn timeout_rejects_minutes_that_overflow() -> Result<()> {
        let error = parse_duration("307445734561825861m").expect_err("overflow should fail");
        assert!(error.to_string().contains("too large"));

        let (_temp, path) =
            write_config("version = 1\n[source]\ntimeout = \"307445734561825861m\"\n")?;
        let error = Config::load(&path).expect_err("overflowing timeout should fail");
        assert!(format!("{error:#}").contains("too large"));
        Ok(())
    }

    #[test]
    fn timeout_rejects_invalid_duration() {
        let error = parse_duration("oops").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid duration"));
    }

    #[test]
    fn timeout_rejects_non_positive_values_in_config() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[source]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[source]"));
        assert!(example.contains("[labels]"));
        assert!(example.contains("[messages]"));
        assert!(example.contains("[log]"));

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.sheet_name(), "Box");
        Ok(())
    }
}
