use std::sync::Arc;

use super::{CodecModule, expect_bool, expect_str};
use crate::config::{EngineConfig, MplsPayloadType};
use crate::module::{Module, ModuleError, ParamType, Parameter, Usage, Value};
use crate::rules::{CodecSid, RuleDescriptor};
use crate::trace::Trace;

static MPLS_SIDS: &[CodecSid] = &[
    CodecSid::BadMpls,
    CodecSid::BadMplsLabel0,
    CodecSid::BadMplsLabel1,
    CodecSid::BadMplsLabel2,
    CodecSid::BadMplsLabel3,
    CodecSid::MplsReservedLabel,
    CodecSid::MplsLabelStack,
];

static PAYLOAD_TYPES: &[&str] = &["eth", "ip4", "ip6"];

static MPLS_PARAMS: &[Parameter] = &[
    Parameter::new(
        "enable_mpls_multicast",
        ParamType::Bool,
        Some("false"),
        "enables support for MPLS multicast",
    ),
    Parameter::new(
        "enable_mpls_overlapping_ip",
        ParamType::Bool,
        Some("false"),
        "enable if private network addresses overlap and must be differentiated by MPLS label(s)",
    ),
    Parameter::new(
        "max_mpls_stack_depth",
        ParamType::Int { min: -1, max: 255 },
        Some("-1"),
        "set MPLS stack depth; -1 is unlimited",
    ),
    Parameter::new(
        "mpls_payload_type",
        ParamType::Enum(PAYLOAD_TYPES),
        Some("ip4"),
        "set encapsulated payload type",
    ),
];

/// `mpls` decoder module.
pub struct MplsModule {
    base: CodecModule,
    trace: Arc<Trace>,
}

impl MplsModule {
    pub fn new(trace: Arc<Trace>) -> Self {
        Self {
            base: CodecModule::with_params(
                "mpls",
                "support for multiprotocol label switching",
                MPLS_PARAMS,
                false,
            )
            .owning(MPLS_SIDS),
            trace,
        }
    }
}

fn payload_type(key: &str, word: &str) -> Result<MplsPayloadType, ModuleError> {
    match word {
        "eth" => Ok(MplsPayloadType::Eth),
        "ip4" => Ok(MplsPayloadType::Ip4),
        "ip6" => Ok(MplsPayloadType::Ip6),
        other => Err(ModuleError::invalid(
            key,
            format!("'{other}' is not one of {}", PAYLOAD_TYPES.join(" | ")),
        )),
    }
}

fn stack_depth(key: &str, value: &Value) -> Result<Option<u8>, ModuleError> {
    let depth = value
        .as_int()
        .ok_or_else(|| ModuleError::mismatch(key, "an integer"))?;
    if depth == -1 {
        return Ok(None);
    }
    u8::try_from(depth)
        .map(Some)
        .map_err(|_| ModuleError::OutOfRange {
            key: key.to_string(),
            value: depth,
            min: -1,
            max: 255,
        })
}

impl Module for MplsModule {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn help(&self) -> &str {
        self.base.help()
    }

    fn gid(&self) -> u32 {
        self.base.gid()
    }

    fn rules(&self) -> Vec<RuleDescriptor> {
        self.base.rules()
    }

    fn usage(&self) -> Usage {
        self.base.usage()
    }

    fn params(&self) -> &[Parameter] {
        self.base.params()
    }

    fn set(
        &mut self,
        key: &str,
        value: &Value,
        config: &mut EngineConfig,
    ) -> Result<(), ModuleError> {
        let mpls = &mut config.decode.mpls;
        match key {
            "enable_mpls_multicast" => mpls.enable_multicast = expect_bool(key, value)?,
            "enable_mpls_overlapping_ip" => mpls.enable_overlapping_ip = expect_bool(key, value)?,
            "max_mpls_stack_depth" => mpls.max_stack_depth = stack_depth(key, value)?,
            "mpls_payload_type" => mpls.payload_type = payload_type(key, expect_str(key, value)?)?,
            _ => return self.base.set(key, value, config),
        }
        self.trace.log(1, format_args!("mpls.{key} = {value}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Tracer;

    fn module() -> MplsModule {
        MplsModule::new(Tracer::new().decode())
    }

    #[test]
    fn stack_depth_minus_one_is_unlimited() {
        let mut module = module();
        let mut config = EngineConfig::default();
        module
            .set("max_mpls_stack_depth", &Value::Int(4), &mut config)
            .unwrap();
        assert_eq!(config.decode.mpls.max_stack_depth, Some(4));
        module
            .set("max_mpls_stack_depth", &Value::Int(-1), &mut config)
            .unwrap();
        assert_eq!(config.decode.mpls.max_stack_depth, None);
    }

    #[test]
    fn stack_depth_out_of_range_is_rejected() {
        let mut module = module();
        let mut config = EngineConfig::default();
        let err = module
            .set("max_mpls_stack_depth", &Value::Int(256), &mut config)
            .unwrap_err();
        assert!(matches!(err, ModuleError::OutOfRange { value: 256, .. }));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn payload_type_words() {
        let mut module = module();
        let mut config = EngineConfig::default();
        module
            .set("mpls_payload_type", &Value::Str("eth".to_string()), &mut config)
            .unwrap();
        assert_eq!(config.decode.mpls.payload_type, MplsPayloadType::Eth);
        assert!(
            module
                .set("mpls_payload_type", &Value::Str("ipx".to_string()), &mut config)
                .is_err()
        );
        assert_eq!(config.decode.mpls.payload_type, MplsPayloadType::Eth);
    }

    #[test]
    fn toggles_and_unknown_keys() {
        let mut module = module();
        let mut config = EngineConfig::default();
        module
            .set("enable_mpls_multicast", &Value::Bool(true), &mut config)
            .unwrap();
        assert!(config.decode.mpls.enable_multicast);
        assert!(
            module
                .set("mpls_label_limit", &Value::Int(1), &mut config)
                .is_err()
        );
    }
}
