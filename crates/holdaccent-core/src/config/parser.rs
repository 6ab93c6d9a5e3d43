// Holdaccent Config Parser - TOML with Serde
// Parses and writes the flat key/value configuration

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::timeouts::{
    sanitize_delay_ms, TimeoutConfig, DEFAULT_LOWERCASE_DELAY_MS, DEFAULT_UPPERCASE_DELAY_MS,
};
use crate::mapping::{default_slots, MappingSlot, MappingTable, MAX_MAPPING_SLOTS};
use crate::LeaderKey;

/// Configuration parser errors
///
/// Only unreadable files and TOML syntax errors are reported. Bad values
/// inside a well-formed file are sanitised with a warning instead.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

/// Root TOML table
///
/// Mapping slots are named `Mapping<N>Input` / `Mapping<N>Output` and land
/// in `rest` together with any unknown keys.
#[derive(Debug, Clone, Deserialize, Default)]
struct ConfigToml {
    #[serde(rename = "DelayLowercase", default)]
    delay_lowercase: Option<toml::Value>,

    #[serde(rename = "DelayUppercase", default)]
    delay_uppercase: Option<toml::Value>,

    #[serde(rename = "LeaderKey", default)]
    leader_key: Option<toml::Value>,

    #[serde(flatten)]
    rest: BTreeMap<String, toml::Value>,
}

/// Which side of a mapping slot a key names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotSide {
    Input,
    Output,
}

/// Engine configuration snapshot.
///
/// Delays are kept as configured; [`Config::timeouts`] applies the clamp.
/// `mappings` always holds exactly [`MAX_MAPPING_SLOTS`] slots, slot N at
/// index N-1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Substitution window for lowercase and non-letter keys (milliseconds)
    pub delay_lowercase_ms: i64,
    /// Substitution window for uppercase letters (milliseconds)
    pub delay_uppercase_ms: i64,
    /// Key(s) that confirm a substitution
    pub leader_key: LeaderKey,
    /// Persisted mapping slots
    pub mappings: Vec<MappingSlot>,
}

impl Default for Config {
    fn default() -> Self {
        let mut mappings = default_slots();
        mappings.resize(MAX_MAPPING_SLOTS, MappingSlot::default());
        Self {
            delay_lowercase_ms: DEFAULT_LOWERCASE_DELAY_MS as i64,
            delay_uppercase_ms: DEFAULT_UPPERCASE_DELAY_MS as i64,
            leader_key: LeaderKey::Space,
            mappings,
        }
    }
}

impl Config {
    /// Configuration with the given slots and default delays/leader
    pub fn with_mappings(slots: Vec<MappingSlot>) -> Self {
        let mut mappings = slots;
        mappings.resize(MAX_MAPPING_SLOTS, MappingSlot::default());
        Self {
            mappings,
            ..Self::default()
        }
    }

    /// Parse a TOML configuration file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let toml_config: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;

        Ok(toml_config.to_config())
    }

    /// Get the default config path (~/.config/holdaccent/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("holdaccent").join("config.toml"))
    }

    /// Load from the default location, or defaults if no file exists there
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                log::debug!("Loading configuration from {}", path.display());
                return Self::from_toml_path(path);
            }
        }
        Ok(Self::default())
    }

    /// Sanitised timeouts for the engine
    pub fn timeouts(&self) -> TimeoutConfig {
        TimeoutConfig::from_millis(self.delay_lowercase_ms, self.delay_uppercase_ms)
    }

    /// Mapping table built from the active slots
    pub fn mapping_table(&self) -> MappingTable {
        MappingTable::from_slots(&self.mappings)
    }

    /// Copy with both delays clamped and rounded
    pub fn sanitized(&self) -> Self {
        Self {
            delay_lowercase_ms: sanitize_delay_ms(self.delay_lowercase_ms) as i64,
            delay_uppercase_ms: sanitize_delay_ms(self.delay_uppercase_ms) as i64,
            ..self.clone()
        }
    }

    /// Serialize every key, including the empty slots, in slot order
    pub fn to_toml(&self) -> String {
        let mut lines = vec![
            format!("DelayLowercase = {}", self.delay_lowercase_ms),
            format!("DelayUppercase = {}", self.delay_uppercase_ms),
            format!("LeaderKey = {}", toml_string(self.leader_key.as_ref())),
        ];

        for index in 0..MAX_MAPPING_SLOTS {
            let slot = self.mappings.get(index).cloned().unwrap_or_default();
            let n = index + 1;
            lines.push(format!("Mapping{}Input = {}", n, toml_string(&slot.input)));
            lines.push(format!("Mapping{}Output = {}", n, toml_string(&slot.output)));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the configuration to `path`, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml())?;
        log::debug!("Configuration written to {}", path.display());
        Ok(())
    }
}

impl ConfigToml {
    /// Convert parsed TOML to internal Config structure
    fn to_config(&self) -> Config {
        let mut config = Config::default();

        if let Some(value) = &self.delay_lowercase {
            config.delay_lowercase_ms =
                parse_delay(value, "DelayLowercase", DEFAULT_LOWERCASE_DELAY_MS);
        }
        if let Some(value) = &self.delay_uppercase {
            config.delay_uppercase_ms =
                parse_delay(value, "DelayUppercase", DEFAULT_UPPERCASE_DELAY_MS);
        }
        if let Some(value) = &self.leader_key {
            config.leader_key = match value {
                toml::Value::String(s) => LeaderKey::parse_or_default(s),
                other => {
                    log::warn!("LeaderKey must be a string, got {}; using Space", other);
                    LeaderKey::Space
                }
            };
        }

        for (name, value) in &self.rest {
            let Some((index, side)) = parse_slot_name(name) else {
                log::warn!("Ignoring unknown configuration key '{}'", name);
                continue;
            };
            let text = match value {
                toml::Value::String(s) => s.clone(),
                other => {
                    log::warn!("{} must be a string, got {}; ignoring", name, other);
                    continue;
                }
            };
            let slot = &mut config.mappings[index];
            match side {
                SlotSide::Input => slot.input = text,
                SlotSide::Output => slot.output = text,
            }
        }

        config
    }
}

/// Read a delay value, falling back to `default` for non-numeric values
fn parse_delay(value: &toml::Value, name: &str, default: u64) -> i64 {
    match value {
        toml::Value::Integer(ms) => *ms,
        toml::Value::Float(ms) if ms.is_finite() => ms.round() as i64,
        toml::Value::String(s) => s.trim().parse::<i64>().unwrap_or_else(|_| {
            log::warn!("{} '{}' is not a number; using {}", name, s, default);
            default as i64
        }),
        other => {
            log::warn!("{} must be an integer, got {}; using {}", name, other, default);
            default as i64
        }
    }
}

/// Parse `Mapping<N>Input` / `Mapping<N>Output` into a 0-based slot index
fn parse_slot_name(name: &str) -> Option<(usize, SlotSide)> {
    let rest = name.strip_prefix("Mapping")?;
    let (number, side) = if let Some(number) = rest.strip_suffix("Input") {
        (number, SlotSide::Input)
    } else {
        (rest.strip_suffix("Output")?, SlotSide::Output)
    };

    let n: usize = number.parse().ok()?;
    if (1..=MAX_MAPPING_SLOTS).contains(&n) {
        Some((n - 1, side))
    } else {
        None
    }
}

fn toml_string(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

/// Create default configuration content for a new installation
pub fn default_config_content() -> String {
    format!(
        "# Holdaccent configuration\n\
         # Place this file at: ~/.config/holdaccent/config.toml\n\
         #\n\
         # Delays are in milliseconds (50-2000, 25 ms steps).\n\
         # LeaderKey: Space | LeftArrow | RightArrow | SpaceOrLeft | SpaceOrRight | LeftOrRight | All\n\
         # Slots with an empty input or output are ignored.\n\n{}",
        Config::default().to_toml()
    )
}
