//! Loading and persisting the keyword configuration.
//!
//! The registry lives in a YAML file. A built-in copy is compiled in and
//! written out the first time a missing config path is used. User-added
//! abbreviations and excluded keywords live in a separate JSON overlay so
//! the main file can be replaced without losing them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::registry::KeywordRegistry;

pub const DEFAULT_CONFIG: &str = include_str!("../config.yml");
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";
pub const DEFAULT_CUSTOM_FILE: &str = "custom_keywords.json";

/// Parse and validate a YAML registry.
pub fn from_yaml(text: &str) -> Result<KeywordRegistry> {
    let registry: KeywordRegistry = serde_yaml::from_str(text)
        .map_err(|e| Error::Config(format!("invalid keyword configuration: {e}")))?;
    registry.validate()?;
    Ok(registry)
}

/// The compiled-in registry.
pub fn builtin() -> Result<KeywordRegistry> {
    from_yaml(DEFAULT_CONFIG)
}

pub fn load(path: &Path) -> Result<KeywordRegistry> {
    let text = fs::read_to_string(path)?;
    let registry = from_yaml(&text).map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
        other => other,
    })?;
    info!(
        path = %path.display(),
        suffixes = registry.organization.suffixes.len(),
        abbreviations = registry.organization.abbreviations.len(),
        "keyword configuration loaded"
    );
    Ok(registry)
}

/// Load `path`, first writing the built-in configuration there if it does
/// not exist yet.
pub fn load_or_init(path: &Path) -> Result<KeywordRegistry> {
    if !path.exists() {
        warn!(path = %path.display(), "config file missing, writing defaults");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG)?;
    }
    load(path)
}

// ── Custom keyword overlay ───────────────────────────────────────────────

/// User-maintained keywords kept next to the main configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomKeywords {
    #[serde(default)]
    pub abbreviations: Vec<String>,
    #[serde(default)]
    pub excluded_keywords: Vec<String>,
}

impl CustomKeywords {
    /// A missing file is an empty overlay.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let custom: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        info!(
            path = %path.display(),
            abbreviations = custom.abbreviations.len(),
            excluded = custom.excluded_keywords.len(),
            "custom keywords loaded"
        );
        Ok(custom)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), "custom keywords saved");
        Ok(())
    }

    /// Add keywords, skipping blanks and ones already listed.
    pub fn merge(&mut self, abbreviations: &[String], excluded_keywords: &[String]) {
        merge_unique(&mut self.abbreviations, abbreviations);
        merge_unique(&mut self.excluded_keywords, excluded_keywords);
    }

    pub fn apply(&self, registry: &mut KeywordRegistry) {
        registry.add_abbreviations(self.abbreviations.iter().cloned());
        registry.add_excluded_keywords(self.excluded_keywords.iter().cloned());
    }
}

fn merge_unique(target: &mut Vec<String>, additions: &[String]) {
    for keyword in additions {
        let keyword = keyword.trim();
        if !keyword.is_empty() && !target.iter().any(|k| k == keyword) {
            target.push(keyword.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let registry = builtin().unwrap();
        assert!(registry.identity.instructor.contains("教师"));
        assert!(registry.organization.abbreviations.contains("河工大"));
        assert_eq!(registry.name.default_name, "无名无姓");
        assert!(!registry.formatting.include_secondary_unit);
    }

    #[test]
    fn test_missing_section_is_config_error() {
        let text = DEFAULT_CONFIG.replace("name:\n  default_name: 无名无姓\n", "");
        assert!(matches!(from_yaml(&text), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_pattern_is_config_error() {
        let text = DEFAULT_CONFIG.replace("{organization}-{name}（教师）", "{org}-{name}");
        let err = from_yaml(&text).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("unknown placeholder {org}"));
    }

    #[test]
    fn test_load_or_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");

        let registry = load_or_init(&path).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
        assert_eq!(registry, builtin().unwrap());

        // an existing file is left alone
        let edited = DEFAULT_CONFIG.replace(
            "include_secondary_unit: false",
            "include_secondary_unit: true",
        );
        fs::write(&path, &edited).unwrap();
        assert!(load_or_init(&path).unwrap().formatting.include_secondary_unit);
    }

    #[test]
    fn test_custom_keywords_roundtrip_and_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CUSTOM_FILE);
        assert_eq!(CustomKeywords::load(&path).unwrap(), CustomKeywords::default());

        let mut custom = CustomKeywords::default();
        custom.merge(
            &["郑轻".to_string(), " ".to_string(), "郑轻".to_string()],
            &["路飞".to_string()],
        );
        assert_eq!(custom.abbreviations, vec!["郑轻"]);
        custom.save(&path).unwrap();

        let loaded = CustomKeywords::load(&path).unwrap();
        assert_eq!(loaded, custom);

        let mut registry = builtin().unwrap();
        loaded.apply(&mut registry);
        assert!(registry.organization.abbreviations.contains("郑轻"));
        assert!(registry.organization.excluded_keywords.contains("路飞"));
    }

    #[test]
    fn test_malformed_custom_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(CustomKeywords::load(&path), Err(Error::Config(_))));
    }
}
