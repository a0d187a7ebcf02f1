//! Decoder configuration
//!
//! The decoder needs very little configuration: whether to decode known
//! record types at all, whether to hold on to raw payload bytes after a type
//! has decoded, and which record type anchors positional time
//! reconstruction. Everything else is fixed, compiled-in format knowledge.

use crate::registry;
use serde::{Deserialize, Serialize};

/// Configuration for one decode run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Whether to run per-type decoders (false = raw frame groups only)
    #[serde(default = "default_true")]
    pub decode_records: bool,

    /// Whether raw payload bytes stay in the dataset's raw groups.
    ///
    /// Multi-mission inputs reach tens to low hundreds of megabytes; with
    /// this off, payload bytes are dropped once a type has decoded and only
    /// counts and sizes are retained.
    #[serde(default = "default_true")]
    pub keep_raw_payloads: bool,

    /// Record type whose series anchors positional interpolation for
    /// clockless types. Defaults to Navigation, the highest-rate
    /// intrinsically-timestamped stream.
    #[serde(default = "default_reference_type")]
    pub reference_type: u16,
}

fn default_true() -> bool {
    true
}

fn default_reference_type() -> u16 {
    registry::REC_NAV
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            decode_records: true,
            keep_raw_payloads: true,
            reference_type: registry::REC_NAV,
        }
    }
}

impl DecoderConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable per-type decoding
    pub fn with_record_decoding(mut self, enabled: bool) -> Self {
        self.decode_records = enabled;
        self
    }

    /// Builder method: keep or discard raw payload bytes after decoding
    pub fn with_raw_payloads(mut self, enabled: bool) -> Self {
        self.keep_raw_payloads = enabled;
        self
    }

    /// Builder method: set the positional-interpolation reference type
    pub fn with_reference_type(mut self, type_code: u16) -> Self {
        self.reference_type = type_code;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = DecoderConfig::new();
        assert!(config.decode_records);
        assert!(config.keep_raw_payloads);
        assert_eq!(config.reference_type, registry::REC_NAV);
    }

    #[test]
    fn test_config_builder() {
        let config = DecoderConfig::new()
            .with_record_decoding(false)
            .with_raw_payloads(false)
            .with_reference_type(0x041D);

        assert!(!config.decode_records);
        assert!(!config.keep_raw_payloads);
        assert_eq!(config.reference_type, 0x041D);
    }

    #[test]
    fn test_config_serde_defaults() {
        // An empty TOML-ish document must deserialize to the defaults
        let config: DecoderConfig = serde_json::from_str("{}").unwrap();
        assert!(config.decode_records);
        assert!(config.keep_raw_payloads);
        assert_eq!(config.reference_type, registry::REC_NAV);
    }
}
