//! codecmap core library: decode anomaly rules and the decoder module contract.
//!
//! The crate names, numbers and describes decode-time anomalies (gid 116)
//! and defines how decoder components declare and validate their
//! configuration surface:
//! `rules` (identifiers, descriptors, registry, counters) -> `module`
//! (configurable module contract) -> `codecs` (decoder modules) -> `engine`
//! (registration, configuration, activation). Packet parsing and alert
//! delivery live elsewhere; this crate only resolves and counts codes.
//!
//! Invariants:
//! - Every decode sid is written down with its numeric value and never reused.
//! - `DECODE_INDEX_MAX` is one past the highest assigned sid.
//! - Configuration closes before the engine goes active; the active engine
//!   is read-only apart from atomic counters.
//!
//! Version française (résumé):
//! Cette crate décrit les anomalies de décodage (gid 116) : identifiants
//! numériques figés, descriptions, registre en lecture seule, et contrat des
//! modules configurables utilisé par chaque décodeur de protocole.
//!
//! # Examples
//! ```
//! use codecmap_core::{ModuleManager, Scope, Tracer, Value};
//!
//! let tracer = Tracer::new();
//! let mut manager = ModuleManager::with_builtins(&tracer)?;
//! manager.set(Scope::Context, "udp", "enable_gtp", &Value::Bool(true))?;
//! let engine = manager.finish()?;
//! assert!(engine.raise(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod codecs;
mod config;
mod engine;
mod module;
mod rules;
mod trace;

pub use codecs::{CodecModule, MplsModule, UdpModule, builtin_codecs};
pub use config::{
    ConfigDocument, ConfigError, DecodeConfig, DocumentError, EngineConfig, ModuleBlocks,
    MplsConfig, MplsPayloadType, UdpConfig,
};
pub use engine::{Engine, ModuleManager, StartupError};
pub use module::{BasicModule, Module, ModuleError, ParamType, Parameter, Scope, Usage, Value};
pub use rules::{
    AnomalyCount, Classification, CodecSid, DECODE_INDEX_MAX, DECODE_RULES, DecodeStats,
    GID_DECODE, RegistryBuilder, RegistryError, RuleDescriptor, RuleRegistry, decode_rule,
};
pub use trace::{DECODE_TRACE, Trace, TraceModule, Tracer};

/// Current catalog schema version.
pub const CATALOG_VERSION: u32 = 1;

/// Exported rule catalog, ordered by `(gid, sid)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog schema version (not the binary version).
    pub catalog_version: u32,
    pub tool: ToolInfo,
    /// Group filter applied, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,
    /// One past the highest assigned decode sid.
    pub decode_index_max: u32,
    pub rules: Vec<RuleEntry>,
}

/// Tool metadata embedded in catalogs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// One catalog row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    pub gid: u32,
    pub sid: u32,
    /// Symbolic name for decode sids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub msg: String,
    pub classification: Classification,
}

impl From<&RuleDescriptor> for RuleEntry {
    fn from(rule: &RuleDescriptor) -> Self {
        let name = if rule.gid == GID_DECODE {
            CodecSid::from_sid(rule.sid).map(|sid| sid.name().to_string())
        } else {
            None
        };
        Self {
            gid: rule.gid,
            sid: rule.sid,
            name,
            msg: rule.msg.to_string(),
            classification: rule.classification,
        }
    }
}

/// Module listing row.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub name: String,
    pub help: String,
    pub usage: Usage,
    pub gid: u32,
    pub list: bool,
    pub rules: usize,
    pub params: Vec<ParamSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub help: String,
}

/// Build a catalog from `registry`, optionally restricted to one gid.
///
/// # Examples
/// ```
/// use codecmap_core::{RuleRegistry, make_catalog};
///
/// let registry = RuleRegistry::decode().unwrap();
/// let catalog = make_catalog(&registry, Some(116));
/// assert_eq!(catalog.rules[0].name.as_deref(), Some("DECODE_NOT_IPV4_DGRAM"));
/// ```
pub fn make_catalog(registry: &RuleRegistry, gid: Option<u32>) -> Catalog {
    let rules = match gid {
        Some(gid) => registry.rules_for_gid(gid).map(RuleEntry::from).collect(),
        None => registry.iter().map(RuleEntry::from).collect(),
    };
    Catalog {
        catalog_version: CATALOG_VERSION,
        tool: ToolInfo {
            name: "codecmap".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        gid,
        decode_index_max: DECODE_INDEX_MAX,
        rules,
    }
}

pub fn describe_module(module: &dyn Module) -> ModuleSummary {
    ModuleSummary {
        name: module.name().to_string(),
        help: module.help().to_string(),
        usage: module.usage(),
        gid: module.gid(),
        list: module.is_list(),
        rules: module.rules().len(),
        params: module
            .params()
            .iter()
            .map(|param| ParamSummary {
                name: param.name.to_string(),
                kind: param.kind.to_string(),
                default: param.default.map(str::to_string),
                help: param.help.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_omits_name_for_foreign_gid() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(1, 1, "text rule", Classification::MiscActivity)
            .unwrap();
        let catalog = make_catalog(&builder.build(), None);
        let value = serde_json::to_value(&catalog).unwrap();
        assert!(value.get("gid").is_none());
        assert!(value["rules"][0].get("name").is_none());
        assert_eq!(value["rules"][0]["classification"], "misc-activity");
    }

    #[test]
    fn catalog_covers_decode_rules() {
        let registry = RuleRegistry::decode().unwrap();
        let catalog = make_catalog(&registry, Some(GID_DECODE));
        assert_eq!(catalog.rules.len(), DECODE_RULES.len());
        assert_eq!(catalog.decode_index_max, 476);
        assert!(make_catalog(&registry, Some(1)).rules.is_empty());
    }

    #[test]
    fn describe_module_lists_schema() {
        let tracer = Tracer::new();
        let udp = UdpModule::new(tracer.decode());
        let summary = describe_module(&udp);
        assert_eq!(summary.usage, Usage::Context);
        assert_eq!(summary.gid, 116);
        assert_eq!(summary.params.len(), 3);
        assert_eq!(summary.params[2].kind, "bit_list 65535");
        assert_eq!(summary.params[2].default.as_deref(), Some("2152 3386"));
    }
}
