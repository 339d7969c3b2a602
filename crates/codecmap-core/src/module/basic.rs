use std::collections::BTreeMap;

use super::{Module, ModuleError, Parameter, Usage, Value};
use crate::config::EngineConfig;

/// Generic module without protocol-specific behavior.
///
/// `new` builds a module with no options whose `set` always fails;
/// `with_params` builds a schema-bearing module that stores validated values
/// per configuration block.
#[derive(Debug, Clone)]
pub struct BasicModule {
    name: &'static str,
    help: &'static str,
    params: &'static [Parameter],
    list: bool,
    usage: Usage,
    blocks: Vec<BTreeMap<String, Value>>,
}

impl BasicModule {
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Self::with_params(name, help, &[], false)
    }

    pub fn with_params(
        name: &'static str,
        help: &'static str,
        params: &'static [Parameter],
        list: bool,
    ) -> Self {
        Self {
            name,
            help,
            params,
            list,
            usage: Usage::Global,
            blocks: Vec::new(),
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    /// Values applied to block `index`.
    pub fn values(&self, index: usize) -> Option<&BTreeMap<String, Value>> {
        self.blocks.get(index)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

impl Module for BasicModule {
    fn name(&self) -> &str {
        self.name
    }

    fn help(&self) -> &str {
        self.help
    }

    fn usage(&self) -> Usage {
        self.usage
    }

    fn params(&self) -> &[Parameter] {
        self.params
    }

    fn is_list(&self) -> bool {
        self.list
    }

    fn begin(&mut self, index: usize, _config: &mut EngineConfig) -> Result<(), ModuleError> {
        while self.blocks.len() <= index {
            self.blocks.push(BTreeMap::new());
        }
        Ok(())
    }

    fn set(
        &mut self,
        key: &str,
        value: &Value,
        _config: &mut EngineConfig,
    ) -> Result<(), ModuleError> {
        let param = self
            .params
            .iter()
            .find(|param| param.name == key)
            .ok_or_else(|| ModuleError::unknown(key))?;
        param.validate(value)?;
        if self.blocks.is_empty() {
            self.blocks.push(BTreeMap::new());
        }
        if let Some(block) = self.blocks.last_mut() {
            block.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ParamType;

    static POLICY_PARAMS: &[Parameter] = &[
        Parameter::new("name", ParamType::Str, None, "policy name"),
        Parameter::new("enabled", ParamType::Bool, Some("true"), "enable policy"),
    ];

    #[test]
    fn trivial_module_rejects_every_key() {
        let mut module = BasicModule::new("plain", "no options");
        let mut config = EngineConfig::default();
        let before = config.clone();
        let err = module
            .set("anything", &Value::Bool(true), &mut config)
            .unwrap_err();
        assert!(matches!(err, ModuleError::UnknownKey { .. }));
        assert_eq!(config, before);
        assert_eq!(module.block_count(), 0);
    }

    #[test]
    fn schema_module_stores_valid_values() {
        let mut module = BasicModule::with_params("policy", "policies", POLICY_PARAMS, true);
        let mut config = EngineConfig::default();
        module.begin(0, &mut config).unwrap();
        module
            .set("name", &Value::Str("a".to_string()), &mut config)
            .unwrap();
        module.begin(1, &mut config).unwrap();
        module.set("enabled", &Value::Bool(false), &mut config).unwrap();

        assert!(module.is_list());
        assert_eq!(module.block_count(), 2);
        assert_eq!(
            module.values(0).unwrap().get("name"),
            Some(&Value::Str("a".to_string()))
        );
        assert_eq!(
            module.values(1).unwrap().get("enabled"),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn schema_module_rejects_mistyped_value() {
        let mut module = BasicModule::with_params("policy", "policies", POLICY_PARAMS, false);
        let mut config = EngineConfig::default();
        let err = module.set("enabled", &Value::Int(1), &mut config).unwrap_err();
        assert!(matches!(err, ModuleError::TypeMismatch { .. }));
        assert_eq!(module.block_count(), 0);
    }
}
