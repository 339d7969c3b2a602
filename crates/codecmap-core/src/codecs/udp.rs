use std::sync::Arc;

use super::{CodecModule, expect_bool, expect_str};
use crate::config::EngineConfig;
use crate::module::param::parse_bit_list;
use crate::module::{Module, ModuleError, ParamType, Parameter, Usage, Value};
use crate::rules::{CodecSid, RuleDescriptor};
use crate::trace::Trace;

static UDP_SIDS: &[CodecSid] = &[
    CodecSid::UdpDgramLtUdphdr,
    CodecSid::UdpDgramInvalidLength,
    CodecSid::UdpDgramShortPacket,
    CodecSid::UdpDgramLongPacket,
    CodecSid::UdpIpv6ZeroChecksum,
    CodecSid::UdpLargePacket,
    CodecSid::UdpPortZero,
];

static UDP_PARAMS: &[Parameter] = &[
    Parameter::new(
        "deep_teredo_inspection",
        ParamType::Bool,
        Some("false"),
        "look for Teredo on all UDP ports (default is only 3544)",
    ),
    Parameter::new(
        "enable_gtp",
        ParamType::Bool,
        Some("false"),
        "decode GTP encapsulations",
    ),
    Parameter::new(
        "gtp_ports",
        ParamType::BitList { max: 65535 },
        Some("2152 3386"),
        "set GTP ports",
    ),
];

/// `udp` decoder module.
pub struct UdpModule {
    base: CodecModule,
    trace: Arc<Trace>,
}

impl UdpModule {
    pub fn new(trace: Arc<Trace>) -> Self {
        Self {
            base: CodecModule::with_params(
                "udp",
                "support for user datagram protocol",
                UDP_PARAMS,
                false,
            )
            .owning(UDP_SIDS),
            trace,
        }
    }
}

impl Module for UdpModule {
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
        let udp = &mut config.decode.udp;
        match key {
            "deep_teredo_inspection" => udp.deep_teredo_inspection = expect_bool(key, value)?,
            "enable_gtp" => udp.enable_gtp = expect_bool(key, value)?,
            "gtp_ports" => {
                let ports = parse_bit_list(expect_str(key, value)?, u16::MAX as u32)
                    .map_err(|reason| ModuleError::invalid(key, reason))?;
                udp.gtp_ports = ports
                    .into_iter()
                    .filter_map(|port| u16::try_from(port).ok())
                    .collect();
            }
            _ => return self.base.set(key, value, config),
        }
        self.trace.log(1, format_args!("udp.{key} = {value}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Tracer;

    fn module() -> UdpModule {
        UdpModule::new(Tracer::new().decode())
    }

    #[test]
    fn set_known_keys_updates_config() {
        let mut module = module();
        let mut config = EngineConfig::default();
        module
            .set("enable_gtp", &Value::Bool(true), &mut config)
            .unwrap();
        module
            .set("gtp_ports", &Value::Str("2123 2152".to_string()), &mut config)
            .unwrap();
        module
            .set("deep_teredo_inspection", &Value::Bool(true), &mut config)
            .unwrap();

        let udp = &config.decode.udp;
        assert!(udp.enable_gtp);
        assert!(udp.deep_teredo_inspection);
        assert_eq!(udp.gtp_ports.iter().copied().collect::<Vec<_>>(), vec![2123, 2152]);
    }

    #[test]
    fn unknown_key_falls_back_to_base_failure() {
        let mut module = module();
        let mut config = EngineConfig::default();
        let before = config.clone();
        let err = module
            .set("enable_teredo", &Value::Bool(true), &mut config)
            .unwrap_err();
        assert_eq!(err, ModuleError::unknown("enable_teredo"));
        assert_eq!(config, before);
    }

    #[test]
    fn mistyped_value_leaves_config_unchanged() {
        let mut module = module();
        let mut config = EngineConfig::default();
        let before = config.clone();
        assert!(module.set("enable_gtp", &Value::Int(1), &mut config).is_err());
        assert!(
            module
                .set("gtp_ports", &Value::Str("80 99999".to_string()), &mut config)
                .is_err()
        );
        assert_eq!(config, before);
    }

    #[test]
    fn owns_udp_rules() {
        let sids: Vec<u32> = module().rules().iter().map(|rule| rule.sid).collect();
        assert_eq!(sids, vec![95, 96, 97, 98, 406, 445, 447]);
    }
}
