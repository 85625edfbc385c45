//! Startup configuration for the masking policy.
//!
//! A [`MaskingConfig`] is loaded once from YAML, JSON or the environment,
//! validated by [`MaskingConfig::into_policy`], and turned into an immutable
//! [`MaskingPolicy`]. Loading errors are fatal; nothing is silently defaulted
//! once a value is present.
//!
//! Documents may either be the masking section itself or contain it under a
//! top-level `masking` key:
//!
//! ```yaml
//! masking:
//!   enabled: true
//!   fields: [email, phone]
//!   style: SHOW_LAST
//!   mask-character: "#"
//! ```

use std::{ffi::OsStr, fs, path::Path};

use serde::{Deserialize, Deserializer};

use crate::{error::ConfigError, policy::MaskingPolicy, style::MaskStyle};

/// Name of the section holding masking keys in a larger document.
const SECTION: &str = "masking";

/// Raw masking configuration, before validation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaskingConfig {
    /// Master switch.
    pub enabled: bool,
    /// Sensitive field names. Accepts a list or a comma-separated string.
    #[serde(deserialize_with = "field_list")]
    pub fields: Vec<String>,
    #[serde(alias = "mask-style", alias = "mask_style")]
    pub style: MaskStyle,
    /// Must hold exactly one character.
    #[serde(alias = "mask-character")]
    pub mask_character: String,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fields: Vec::new(),
            style: MaskStyle::default(),
            mask_character: crate::style::DEFAULT_MASK_CHAR.to_string(),
        }
    }
}

impl MaskingConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let doc: serde_yaml::Value = serde_yaml::from_str(text)?;
        let section = doc.get(SECTION).cloned().unwrap_or(doc);
        if section.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_value(section)?)
    }

    /// Parses a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let doc: serde_json::Value = serde_json::from_str(text)?;
        let section = doc.get(SECTION).cloned().unwrap_or(doc);
        if section.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(section)?)
    }

    /// Reads a `.yaml`, `.yml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&fs::read_to_string(path)?),
            Some("json") => Self::from_json_str(&fs::read_to_string(path)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Reads `{prefix}ENABLED`, `{prefix}FIELDS`, `{prefix}STYLE` and
    /// `{prefix}MASK_CHARACTER` from the process environment.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_vars(prefix, std::env::vars())
    }

    /// [`MaskingConfig::from_env`] over an explicit set of variables.
    pub fn from_env_vars<I, K, V>(prefix: &str, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(prefix) else {
                continue;
            };
            let value = value.as_ref();
            match name {
                "ENABLED" => config.enabled = parse_bool(key.as_ref(), value)?,
                "FIELDS" => config.fields = split_csv(value),
                "STYLE" => config.style = value.parse()?,
                "MASK_CHARACTER" => config.mask_character = value.to_string(),
                _ => {}
            }
        }
        Ok(config)
    }

    /// Validates the configuration and builds the policy.
    pub fn into_policy(self) -> Result<MaskingPolicy, ConfigError> {
        if let Some(blank) = self.fields.iter().find(|field| field.trim().is_empty()) {
            return Err(ConfigError::InvalidFieldName(blank.clone()));
        }

        let mut chars = self.mask_character.chars();
        let mask_char = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(ConfigError::InvalidMaskCharacter(self.mask_character)),
        };

        Ok(MaskingPolicy::new()
            .with_enabled(self.enabled)
            .with_fields(self.fields)
            .with_style(self.style)
            .with_mask_char(mask_char))
    }
}

impl TryFrom<MaskingConfig> for MaskingPolicy {
    type Error = ConfigError;

    fn try_from(config: MaskingConfig) -> Result<Self, Self::Error> {
        config.into_policy()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Empty segments are skipped, so `""` and `"a,,b,"` are accepted.
fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldList {
    Csv(String),
    List(Vec<String>),
}

fn field_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FieldList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(FieldList::Csv(csv)) => split_csv(&csv),
        Some(FieldList::List(list)) => list,
    })
}
