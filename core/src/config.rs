//! Decoder configuration, serialized with `serde` + `toml`.
//!
//! Mirrors the `load_toml`/`save_toml`/`to_toml_string` pattern the teacher
//! crate's `Config` used, narrowed to the fields this decoder actually has:
//! no fuzzy-matching, full-width, or phrase-masking knobs, since those back
//! word-segmentation features out of scope here.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Default `k` for top-k operations when a caller doesn't specify one.
    pub default_top_k: usize,
    /// Default beam size for `decode_topk` and the incremental decoder's
    /// pruning threshold.
    pub default_beam_size: usize,
    /// Keys an IME-style driver uses to select among displayed candidates.
    pub select_keys: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            default_top_k: 5,
            default_beam_size: 16,
            select_keys: "123456789".to_string(),
        }
    }
}

impl DecoderConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).expect("DecoderConfig always serializes");
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("DecoderConfig always serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let config = DecoderConfig::default();
        let text = config.to_toml_string();
        let parsed: DecoderConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.default_top_k, config.default_top_k);
        assert_eq!(parsed.default_beam_size, config.default_beam_size);
        assert_eq!(parsed.select_keys, config.select_keys);
    }

    #[test]
    fn load_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decoder.toml");
        let config = DecoderConfig {
            default_top_k: 3,
            default_beam_size: 8,
            select_keys: "asdfghjkl".to_string(),
        };
        config.save_toml(&path).unwrap();
        let loaded = DecoderConfig::load_toml(&path).unwrap();
        assert_eq!(loaded.default_top_k, 3);
        assert_eq!(loaded.select_keys, "asdfghjkl");
    }
}
