//! Configuration target and loader document.
//!
//! `EngineConfig` is the shared state that module `set` calls write into.
//! `ConfigDocument` is the JSON form handed over by the configuration
//! loader: module blocks grouped by scope, each block a key/value object or,
//! for list modules, an array of such objects.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::module::{ModuleError, Scope, Usage};

/// Default GTP-U and GTP-C ports.
pub const DEFAULT_GTP_PORTS: [u16; 2] = [2152, 3386];

/// Shared configuration mutated by module `set` calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    pub decode: DecodeConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeConfig {
    pub udp: UdpConfig,
    pub mpls: MplsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UdpConfig {
    pub deep_teredo_inspection: bool,
    pub enable_gtp: bool,
    pub gtp_ports: BTreeSet<u16>,
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            deep_teredo_inspection: false,
            enable_gtp: false,
            gtp_ports: DEFAULT_GTP_PORTS.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MplsPayloadType {
    Eth,
    #[default]
    Ip4,
    Ip6,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MplsConfig {
    pub enable_multicast: bool,
    pub enable_overlapping_ip: bool,
    /// `None` means no stack depth limit.
    pub max_stack_depth: Option<u8>,
    pub payload_type: MplsPayloadType,
}

/// Loader document: module name to option block(s), per scope.
///
/// # Examples
/// ```
/// use codecmap_core::ConfigDocument;
///
/// let doc = ConfigDocument::from_json_str(r#"{ "context": { "udp": { "enable_gtp": true } } }"#)?;
/// assert!(doc.global.is_empty());
/// assert_eq!(doc.context.len(), 1);
/// # Ok::<(), codecmap_core::DocumentError>(())
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    #[serde(default)]
    pub global: BTreeMap<String, ModuleBlocks>,
    #[serde(default)]
    pub context: BTreeMap<String, ModuleBlocks>,
}

pub type OptionBlock = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModuleBlocks {
    Single(OptionBlock),
    List(Vec<OptionBlock>),
}

impl ModuleBlocks {
    pub fn blocks(&self) -> Vec<&OptionBlock> {
        match self {
            ModuleBlocks::Single(block) => vec![block],
            ModuleBlocks::List(blocks) => blocks.iter().collect(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ModuleBlocks::List(_))
    }
}

impl ConfigDocument {
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Sections in application order: global first, then context.
    pub fn sections(&self) -> [(Scope, &BTreeMap<String, ModuleBlocks>); 2] {
        [(Scope::Global, &self.global), (Scope::Context, &self.context)]
    }
}

/// Errors reading a configuration document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration failures routed back from modules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown module '{module}'")]
    UnknownModule { module: String },
    #[error("module '{module}' ({usage}) is not allowed in {scope} scope")]
    ScopeMismatch {
        module: String,
        usage: Usage,
        scope: Scope,
    },
    #[error("module '{module}' does not accept a list of blocks")]
    NotList { module: String },
    #[error("{module}: {source}")]
    Module {
        module: String,
        #[source]
        source: ModuleError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_accepts_single_and_list_blocks() {
        let doc = ConfigDocument::from_json_str(
            r#"{
                "global": { "trace": { "decode": 2 } },
                "context": { "policy": [ { "name": "a" }, { "name": "b" } ] }
            }"#,
        )
        .unwrap();
        assert!(!doc.global["trace"].is_list());
        assert_eq!(doc.context["policy"].blocks().len(), 2);
    }

    #[test]
    fn document_rejects_unknown_sections() {
        let err = ConfigDocument::from_json_str(r#"{ "detection": {} }"#).unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert!(!config.decode.udp.enable_gtp);
        assert_eq!(
            config.decode.udp.gtp_ports.iter().copied().collect::<Vec<_>>(),
            vec![2152, 3386]
        );
        assert_eq!(config.decode.mpls.max_stack_depth, None);
        assert_eq!(config.decode.mpls.payload_type, MplsPayloadType::Ip4);
    }
}
