//! Module lifecycle: registration, configuration and activation.
//!
//! `ModuleManager` covers the startup phase: modules are attached (their
//! rules checked against the registry and against each other), then
//! configured one key/value pair at a time. `finish` either aborts with every
//! recorded failure or yields an [`Engine`], which has no mutation API and
//! is shared read-only with packet workers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::codecs::builtin_codecs;
use crate::config::{ConfigDocument, ConfigError, EngineConfig, OptionBlock};
use crate::module::{Module, ModuleError, Scope, Value};
use crate::rules::{DecodeStats, RegistryError, RuleRegistry};
use crate::trace::{TraceModule, Tracer};

/// Startup failures; any of them keeps the engine from going active.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("module '{0}' is already registered")]
    DuplicateModule(String),
    #[error("rule {gid}:{sid} claimed by both '{first}' and '{second}'")]
    DuplicateRule {
        gid: u32,
        sid: u32,
        first: String,
        second: String,
    },
    #[error("module '{module}' declares rule {gid}:{sid} outside its group {module_gid}")]
    ForeignRule {
        module: String,
        module_gid: u32,
        gid: u32,
        sid: u32,
    },
    #[error("module '{module}' declares unregistered rule {gid}:{sid}")]
    UnregisteredRule { module: String, gid: u32, sid: u32 },
    #[error("{} configuration error(s)", .0.len())]
    Config(Vec<ConfigError>),
}

/// Startup-phase owner of modules, registry and configuration.
pub struct ModuleManager {
    registry: Arc<RuleRegistry>,
    modules: Vec<Box<dyn Module>>,
    owners: HashMap<(u32, u32), usize>,
    config: EngineConfig,
    errors: Vec<ConfigError>,
}

impl ModuleManager {
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            modules: Vec::new(),
            owners: HashMap::new(),
            config: EngineConfig::default(),
            errors: Vec::new(),
        }
    }

    /// Decode registry plus the `trace` module and every built-in decoder.
    pub fn with_builtins(tracer: &Tracer) -> Result<Self, StartupError> {
        let mut manager = Self::new(RuleRegistry::decode()?);
        manager.add(Box::new(TraceModule::new(tracer)))?;
        for module in builtin_codecs(&tracer.decode()) {
            manager.add(module)?;
        }
        info!(
            modules = manager.modules.len(),
            rules = manager.registry.len(),
            "built-in modules registered"
        );
        Ok(manager)
    }

    /// Attach a module and claim its rules.
    ///
    /// Every rule must be registered under the module's gid and unclaimed by
    /// any other module; on failure nothing is attached.
    pub fn add(&mut self, module: Box<dyn Module>) -> Result<(), StartupError> {
        let name = module.name().to_string();
        if self.find(&name).is_some() {
            return Err(StartupError::DuplicateModule(name));
        }
        let rules = module.rules();
        let mut claimed = HashSet::new();
        for rule in &rules {
            if rule.gid != module.gid() {
                return Err(StartupError::ForeignRule {
                    module: name,
                    module_gid: module.gid(),
                    gid: rule.gid,
                    sid: rule.sid,
                });
            }
            if !self.registry.contains(rule.gid, rule.sid) {
                return Err(StartupError::UnregisteredRule {
                    module: name,
                    gid: rule.gid,
                    sid: rule.sid,
                });
            }
            if let Some(&owner) = self.owners.get(&(rule.gid, rule.sid)) {
                return Err(StartupError::DuplicateRule {
                    gid: rule.gid,
                    sid: rule.sid,
                    first: self.modules[owner].name().to_string(),
                    second: name,
                });
            }
            if !claimed.insert((rule.gid, rule.sid)) {
                return Err(StartupError::DuplicateRule {
                    gid: rule.gid,
                    sid: rule.sid,
                    first: name.clone(),
                    second: name,
                });
            }
        }
        let index = self.modules.len();
        self.owners.extend(claimed.into_iter().map(|key| (key, index)));
        debug!(module = %name, gid = module.gid(), rules = rules.len(), "module registered");
        self.modules.push(module);
        Ok(())
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn find(&self, name: &str) -> Option<&dyn Module> {
        self.modules
            .iter()
            .find(|module| module.name() == name)
            .map(|module| module.as_ref())
    }

    pub fn modules(&self) -> impl Iterator<Item = &dyn Module> + '_ {
        self.modules.iter().map(|module| module.as_ref())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Failures recorded so far.
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Route one key/value pair to `module`.
    ///
    /// Scope, key and value type are checked before the module sees the
    /// pair. Failures are returned and also recorded for `finish`.
    pub fn set(
        &mut self,
        scope: Scope,
        module: &str,
        key: &str,
        value: &Value,
    ) -> Result<(), ConfigError> {
        let result = self.try_set(scope, module, key, value);
        self.record(result)
    }

    /// Apply a whole loader document, global section first.
    ///
    /// Every failure is recorded; the return value is how many were added.
    pub fn apply(&mut self, doc: &ConfigDocument) -> usize {
        let before = self.errors.len();
        for (scope, section) in doc.sections() {
            for (module, blocks) in section {
                let result = self.check_blocks(scope, module, blocks.is_list());
                if self.record(result).is_err() {
                    continue;
                }
                for (index, block) in blocks.blocks().into_iter().enumerate() {
                    self.apply_block(scope, module, index, block);
                }
            }
        }
        self.errors.len() - before
    }

    /// Leave the configuration phase.
    pub fn finish(self) -> Result<Engine, StartupError> {
        if !self.errors.is_empty() {
            warn!(errors = self.errors.len(), "configuration rejected");
            return Err(StartupError::Config(self.errors));
        }
        info!(modules = self.modules.len(), "engine active");
        let stats = DecodeStats::new(Arc::clone(&self.registry));
        Ok(Engine {
            registry: self.registry,
            modules: self.modules,
            config: self.config,
            stats,
        })
    }

    fn apply_block(&mut self, scope: Scope, module: &str, index: usize, block: &OptionBlock) {
        let result = self.with_module(module, |m, config| m.begin(index, config));
        if self.record(result).is_err() {
            return;
        }
        for (key, raw) in block {
            let value = self.with_module(module, |m, _| {
                m.param(key)
                    .ok_or_else(|| ModuleError::unknown(key))?
                    .coerce(raw)
            });
            let Ok(value) = self.record(value) else {
                continue;
            };
            let _ = self.set(scope, module, key, &value);
        }
        let result = self.with_module(module, |m, config| m.end(index, config));
        let _ = self.record(result);
    }

    fn check_blocks(&self, scope: Scope, module: &str, list: bool) -> Result<(), ConfigError> {
        let target = self.find(module).ok_or_else(|| ConfigError::UnknownModule {
            module: module.to_string(),
        })?;
        if !target.usage().allows(scope) {
            return Err(ConfigError::ScopeMismatch {
                module: module.to_string(),
                usage: target.usage(),
                scope,
            });
        }
        if list && !target.is_list() {
            return Err(ConfigError::NotList {
                module: module.to_string(),
            });
        }
        Ok(())
    }

    fn try_set(
        &mut self,
        scope: Scope,
        module: &str,
        key: &str,
        value: &Value,
    ) -> Result<(), ConfigError> {
        self.check_blocks(scope, module, false)?;
        self.with_module(module, |m, config| {
            if let Some(param) = m.param(key) {
                param.validate(value)?;
            }
            m.set(key, value, config)
        })?;
        debug!(module, key, %value, "option applied");
        Ok(())
    }

    fn with_module<T>(
        &mut self,
        module: &str,
        f: impl FnOnce(&mut dyn Module, &mut EngineConfig) -> Result<T, ModuleError>,
    ) -> Result<T, ConfigError> {
        let target = self
            .modules
            .iter_mut()
            .find(|m| m.name() == module)
            .ok_or_else(|| ConfigError::UnknownModule {
                module: module.to_string(),
            })?;
        f(target.as_mut(), &mut self.config).map_err(|source| ConfigError::Module {
            module: module.to_string(),
            source,
        })
    }

    fn record<T>(&mut self, result: Result<T, ConfigError>) -> Result<T, ConfigError> {
        if let Err(err) = &result {
            warn!("{err}");
            self.errors.push(err.clone());
        }
        result
    }
}

/// Active engine: configuration is closed and everything is read-only.
pub struct Engine {
    registry: Arc<RuleRegistry>,
    modules: Vec<Box<dyn Module>>,
    config: EngineConfig,
    stats: DecodeStats,
}

impl Engine {
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    pub fn module(&self, name: &str) -> Option<&dyn Module> {
        self.modules
            .iter()
            .find(|module| module.name() == name)
            .map(|module| module.as_ref())
    }

    pub fn modules(&self) -> impl Iterator<Item = &dyn Module> + '_ {
        self.modules.iter().map(|module| module.as_ref())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Raise a decode anomaly from a worker; see [`DecodeStats::raise`].
    pub fn raise(&self, sid: u32) -> bool {
        self.stats.raise(sid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::CodecModule;
    use crate::module::{BasicModule, ModuleError, ParamType, Parameter};
    use crate::rules::{CodecSid, GID_DECODE, RuleDescriptor, decode_rule};

    static POLICY_PARAMS: &[Parameter] = &[Parameter::new(
        "name",
        ParamType::Str,
        None,
        "policy name",
    )];

    fn manager() -> ModuleManager {
        ModuleManager::with_builtins(&Tracer::new()).unwrap()
    }

    #[test]
    fn builtins_register_cleanly() {
        let manager = manager();
        assert!(manager.find("udp").is_some());
        assert!(manager.find("trace").is_some());
        assert!(manager.errors().is_empty());
    }

    #[test]
    fn duplicate_rule_claim_aborts_startup() {
        let mut manager = ModuleManager::new(RuleRegistry::decode().unwrap());
        manager
            .add(Box::new(
                CodecModule::new("ipv4", "first").owning(&[CodecSid::NotIpv4Dgram]),
            ))
            .unwrap();
        let err = manager
            .add(Box::new(
                CodecModule::new("legacy_ipv4", "second").owning(&[CodecSid::NotIpv4Dgram]),
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            StartupError::DuplicateRule { gid: 116, sid: 1, .. }
        ));
        assert!(manager.find("legacy_ipv4").is_none());
    }

    struct RepeatedClaim;

    impl Module for RepeatedClaim {
        fn name(&self) -> &str {
            "repeated"
        }

        fn help(&self) -> &str {
            "lists one rule twice"
        }

        fn gid(&self) -> u32 {
            GID_DECODE
        }

        fn rules(&self) -> Vec<RuleDescriptor> {
            let rule = *decode_rule(CodecSid::NotIpv4Dgram).unwrap();
            vec![rule, rule]
        }
    }

    #[test]
    fn repeated_rule_in_one_module_leaves_manager_unchanged() {
        let mut manager = ModuleManager::new(RuleRegistry::decode().unwrap());
        let err = manager.add(Box::new(RepeatedClaim)).unwrap_err();
        assert!(matches!(
            err,
            StartupError::DuplicateRule { gid: 116, sid: 1, .. }
        ));
        assert!(manager.find("repeated").is_none());
        assert_eq!(manager.modules().count(), 0);

        manager
            .add(Box::new(
                CodecModule::new("ipv4", "ipv4").owning(&[CodecSid::NotIpv4Dgram]),
            ))
            .unwrap();
        let err = manager
            .add(Box::new(
                CodecModule::new("legacy_ipv4", "second").owning(&[CodecSid::NotIpv4Dgram]),
            ))
            .unwrap_err();
        assert!(matches!(err, StartupError::DuplicateRule { first, .. } if first == "ipv4"));
    }

    #[test]
    fn duplicate_module_name_is_rejected() {
        let mut manager = ModuleManager::new(RuleRegistry::decode().unwrap());
        manager.add(Box::new(BasicModule::new("alpha", "a"))).unwrap();
        let err = manager
            .add(Box::new(BasicModule::new("alpha", "b")))
            .unwrap_err();
        assert!(matches!(err, StartupError::DuplicateModule(name) if name == "alpha"));
    }

    #[test]
    fn unregistered_rule_is_rejected() {
        let mut manager = ModuleManager::new(crate::rules::RegistryBuilder::new().build());
        let err = manager
            .add(Box::new(
                CodecModule::new("arp", "arp").owning(&[CodecSid::ArpTruncated]),
            ))
            .unwrap_err();
        assert!(matches!(err, StartupError::UnregisteredRule { sid: 109, .. }));
    }

    #[test]
    fn set_routes_to_module_and_updates_config() {
        let mut manager = manager();
        manager
            .set(Scope::Context, "udp", "enable_gtp", &Value::Bool(true))
            .unwrap();
        assert!(manager.config().decode.udp.enable_gtp);
        let engine = manager.finish().unwrap();
        assert!(engine.config().decode.udp.enable_gtp);
    }

    #[test]
    fn unknown_key_is_recorded_and_blocks_activation() {
        let mut manager = manager();
        let before = manager.config().clone();
        let err = manager
            .set(Scope::Context, "eth", "anything", &Value::Int(1))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Module {
                module: "eth".to_string(),
                source: ModuleError::unknown("anything"),
            }
        );
        assert_eq!(manager.config(), &before);
        match manager.finish() {
            Err(StartupError::Config(errors)) => assert_eq!(errors.len(), 1),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("engine must not go active"),
        }
    }

    #[test]
    fn scope_is_enforced() {
        let mut manager = manager();
        let err = manager
            .set(Scope::Context, "trace", "decode", &Value::Int(1))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ScopeMismatch { .. }));
        assert!(manager.set(Scope::Global, "udp", "enable_gtp", &Value::Bool(true)).is_ok());
    }

    #[test]
    fn apply_aggregates_every_failure() {
        let mut manager = manager();
        let doc = ConfigDocument::from_json_str(
            r#"{
                "global": { "trace": { "decode": 2 } },
                "context": {
                    "udp": { "enable_gtp": true, "gtp_ports": [2152], "bogus": 1 },
                    "mpls": { "max_mpls_stack_depth": "deep" },
                    "nope": { "x": 1 },
                    "eth": [ {}, {} ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(manager.apply(&doc), 4);
        assert!(manager.config().decode.udp.enable_gtp);
        assert_eq!(
            manager.config().decode.udp.gtp_ports.iter().copied().collect::<Vec<_>>(),
            vec![2152]
        );
        assert!(manager.finish().is_err());
    }

    #[test]
    fn list_module_receives_each_block() {
        let mut manager = ModuleManager::new(RuleRegistry::decode().unwrap());
        manager
            .add(Box::new(
                BasicModule::with_params("policy", "named policies", POLICY_PARAMS, true)
                    .with_usage(crate::module::Usage::Context),
            ))
            .unwrap();
        let doc = ConfigDocument::from_json_str(
            r#"{ "context": { "policy": [ { "name": "a" }, { "name": "b" } ] } }"#,
        )
        .unwrap();
        assert_eq!(manager.apply(&doc), 0);
        let engine = manager.finish().unwrap();
        assert!(engine.module("policy").is_some());
    }

    #[test]
    fn active_engine_raises_without_locking() {
        let engine = manager().finish().unwrap();
        assert!(engine.raise(CodecSid::NotIpv4Dgram.sid()));
        assert!(!engine.raise(417));
        assert_eq!(engine.stats().count(1), 1);
        assert_eq!(engine.stats().unresolved(), 1);
    }
}
