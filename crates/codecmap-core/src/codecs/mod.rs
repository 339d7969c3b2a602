//! Protocol decoder modules.
//!
//! Every decoder module composes a [`CodecModule`], which pins the decode
//! group id, the per-context usage and rule lookup. Decoders with options
//! override `set` for their own keys and hand everything else back to the
//! base, which rejects it.
//!
//! Each assigned decode sid is owned by exactly one built-in module.

mod mpls;
mod udp;

use std::sync::Arc;

use crate::module::{Module, ModuleError, Parameter, Usage, Value};
use crate::rules::{CodecSid, DECODE_RULES, GID_DECODE, RuleDescriptor};
use crate::trace::Trace;

pub use mpls::MplsModule;
pub use udp::UdpModule;

/// Base decoder module bound to the decode group.
///
/// # Examples
/// ```
/// use codecmap_core::{CodecModule, CodecSid, GID_DECODE, Module, Usage};
///
/// let module = CodecModule::new("arp", "support for address resolution protocol")
///     .owning(&[CodecSid::ArpTruncated]);
/// assert_eq!(module.gid(), GID_DECODE);
/// assert_eq!(module.usage(), Usage::Context);
/// assert_eq!(module.rules()[0].sid, 109);
/// ```
#[derive(Debug, Clone)]
pub struct CodecModule {
    name: &'static str,
    help: &'static str,
    params: &'static [Parameter],
    list: bool,
    sids: &'static [CodecSid],
}

impl CodecModule {
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
            sids: &[],
        }
    }

    pub fn owning(mut self, sids: &'static [CodecSid]) -> Self {
        self.sids = sids;
        self
    }

    pub fn sids(&self) -> &'static [CodecSid] {
        self.sids
    }
}

impl Module for CodecModule {
    fn name(&self) -> &str {
        self.name
    }

    fn help(&self) -> &str {
        self.help
    }

    fn gid(&self) -> u32 {
        GID_DECODE
    }

    fn rules(&self) -> Vec<RuleDescriptor> {
        DECODE_RULES
            .iter()
            .filter(|rule| rule.gid == GID_DECODE)
            .filter(|rule| self.sids.iter().any(|sid| sid.sid() == rule.sid))
            .copied()
            .collect()
    }

    fn usage(&self) -> Usage {
        Usage::Context
    }

    fn params(&self) -> &[Parameter] {
        self.params
    }

    fn is_list(&self) -> bool {
        self.list
    }
}

pub(crate) fn expect_bool(key: &str, value: &Value) -> Result<bool, ModuleError> {
    value
        .as_bool()
        .ok_or_else(|| ModuleError::mismatch(key, "a boolean"))
}

pub(crate) fn expect_str<'a>(key: &str, value: &'a Value) -> Result<&'a str, ModuleError> {
    value
        .as_str()
        .ok_or_else(|| ModuleError::mismatch(key, "a string"))
}

use CodecSid::*;

static ETH: &[CodecSid] = &[EthHdrTrunc, BadEtherType];
static ARP: &[CodecSid] = &[ArpTruncated];
static EAPOL: &[CodecSid] = &[EapolTruncated, EapKeyTruncated, EapTruncated];
static PPPOE: &[CodecSid] = &[BadPppoe];
static VLAN: &[CodecSid] = &[BadVlan];
static LLC: &[CodecSid] = &[BadLlcHeader, BadLlcOther];
static WLAN: &[CodecSid] = &[Bad80211EthLlc, Bad80211Other];
static TOKEN_RING: &[CodecSid] = &[BadTrh, BadTrEthLlc, BadTrMrLen, BadTrhMr];
static IPV4: &[CodecSid] = &[
    NotIpv4Dgram,
    Ipv4InvalidHeaderLen,
    Ipv4DgramLtIphdr,
    Ipv4OptBadLen,
    Ipv4OptTruncated,
    Ipv4DgramGtCaplen,
    BadTrafficLoopback,
    BadTrafficSameSrcDst,
    IpMultipleEncapsulation,
    ZeroTtl,
    BadFragBits,
    Ip4LenOffset,
    Ip4SrcThisNet,
    Ip4DstThisNet,
    Ip4SrcMulticast,
    Ip4SrcReserved,
    Ip4DstReserved,
    Ip4SrcBroadcast,
    Ip4DstBroadcast,
    Ip4HdrTrunc,
    Ip4MinTtl,
    Ip4DfOffset,
    IpOptionSet,
    IpReservedFragBit,
    IpUnassignedProto,
    IpBadProto,
];
static TCP: &[CodecSid] = &[
    TcpDgramLtTcphdr,
    TcpInvalidOffset,
    TcpLargeOffset,
    TcpOptBadLen,
    TcpOptTruncated,
    TcpOptTtcp,
    TcpOptObsolete,
    TcpOptExperimental,
    TcpOptWscaleInvalid,
    TcpXmas,
    TcpNmapXmas,
    DosNaptha,
    SynToMulticast,
    TcpBadUrp,
    TcpSynFin,
    TcpSynRst,
    TcpMustAck,
    TcpNoSynAckRst,
    TcpShaftSynflood,
    TcpPortZero,
];
static ICMP4: &[CodecSid] = &[
    IcmpDgramLtIcmphdr,
    IcmpDgramLtTimestamphdr,
    IcmpDgramLtAddrhdr,
    IcmpOrigIpTruncated,
    IcmpOrigIpVerMismatch,
    IcmpOrigDgramLtOrigIp,
    IcmpOrigPayloadLt64,
    IcmpOrigPayloadGt576,
    IcmpOrigIpWithFragOffset,
    Icmp4DstMulticast,
    Icmp4DstBroadcast,
    Icmp4TypeOther,
    Icmp4HdrTrunc,
    IcmpPingNmap,
    IcmpIcmpenum,
    IcmpRedirectHost,
    IcmpRedirectNet,
    IcmpTracerouteIpopts,
    IcmpSourceQuench,
    IcmpBroadscanSmurfScanner,
    IcmpDstUnreachAdminProhibited,
    IcmpDstUnreachDstHostProhibited,
    IcmpDstUnreachDstNetProhibited,
    IcmpPathMtuDos,
    IcmpDosAttempt,
];
static GRE: &[CodecSid] = &[
    GreDgramLtGrehdr,
    GreMultipleEncapsulation,
    GreInvalidVersion,
    GreInvalidHeader,
    GreV1InvalidHeader,
    GreTransDgramLtTranshdr,
];
static IPV6: &[CodecSid] = &[
    Ipv6MinTtl,
    Ipv6IsNot,
    Ipv6TruncatedExt,
    Ipv6Truncated,
    Ipv6DgramLtIphdr,
    Ipv6DgramGtCaplen,
    Ipv6DstZero,
    Ipv6SrcMulticast,
    Ipv6DstReservedMulticast,
    Ipv6BadOptType,
    Ipv6BadMulticastScope,
    Ipv6BadNextHeader,
    Ipv6RouteAndHopByHop,
    Ipv6TwoRouteHeaders,
    Ipv6TunneledIpv4Truncated,
    Ipv6DstOptsWithRouting,
    Ipv6BadOptLen,
    Ipv6UnorderedExtensions,
    Ip6ZeroHopLimit,
    Ipv6IsatapSpoof,
    Ip6ExcessExtHdr,
    Ipv6BadFragPkt,
    ZeroLengthFrag,
    Ipv6RouteZero,
];
static ICMP6: &[CodecSid] = &[
    Icmpv6TooBigBadMtu,
    Icmpv6UnreachableNonRfc2463Code,
    Icmpv6SolicitationBadCode,
    Icmpv6AdvertBadCode,
    Icmpv6SolicitationBadReserved,
    Icmpv6AdvertBadReachable,
    Icmp6HdrTrunc,
    Icmp6TypeOther,
    Icmp6DstMulticast,
    Icmpv6UnreachableNonRfc4443Code,
    Icmpv6NodeInfoBadCode,
    Icmp6NotIp6,
];
static ESP: &[CodecSid] = &[EspHeaderTrunc];
static GTP: &[CodecSid] = &[GtpMultipleEncapsulation, GtpBadLen];
static IGMP: &[CodecSid] = &[IgmpOptionsDos];
static PGM: &[CodecSid] = &[PgmNakOverflow];
static ERSPAN: &[CodecSid] = &[
    ErspanHdrVersionMismatch,
    Erspan2DgramLtHdr,
    Erspan3DgramLtHdr,
];
static AUTH: &[CodecSid] = &[AuthHdrTrunc, AuthHdrBadLen];
static FABRICPATH: &[CodecSid] = &[FpathHdrTrunc];
static CISCO_METADATA: &[CodecSid] = &[
    CiscoMetaHdrTrunc,
    CiscoMetaHdrOptLen,
    CiscoMetaHdrOptType,
    CiscoMetaHdrSgt,
];
static MIPV6: &[CodecSid] = &[Mipv6BadPayloadProto];
static DECODE: &[CodecSid] = &[TooManyLayers];

/// Decoders without options: (name, help, owned sids).
static PLAIN_CODECS: &[(&str, &str, &[CodecSid])] = &[
    ("eth", "support for ethernet protocol", ETH),
    ("arp", "support for address resolution protocol", ARP),
    ("eapol", "support for extensible authentication protocol over LAN", EAPOL),
    ("pppoe", "support for point-to-point protocol over ethernet", PPPOE),
    ("vlan", "support for local area network", VLAN),
    ("llc", "support for logical link control", LLC),
    ("wlan", "support for wireless local area network protocol", WLAN),
    ("token_ring", "support for token ring decoding", TOKEN_RING),
    ("ipv4", "support for Internet protocol v4", IPV4),
    ("tcp", "support for transmission control protocol", TCP),
    ("icmp4", "support for Internet control message protocol v4", ICMP4),
    ("gre", "support for generic routing encapsulation", GRE),
    ("ipv6", "support for Internet protocol v6", IPV6),
    ("icmp6", "support for Internet control message protocol v6", ICMP6),
    ("esp", "support for encapsulating security payload", ESP),
    ("gtp", "support for general-packet-radio-service tunnelling protocol", GTP),
    ("igmp", "support for Internet group management protocol", IGMP),
    ("pgm", "support for pragmatic general multicast", PGM),
    ("erspan", "support for encapsulated remote switched port analyzer", ERSPAN),
    ("auth", "support for IP authentication header", AUTH),
    ("fabricpath", "support for fabricpath", FABRICPATH),
    ("ciscometadata", "support for cisco metadata", CISCO_METADATA),
    ("mipv6", "support for mobility for IPv6", MIPV6),
    ("decode", "general decoder rules", DECODE),
];

/// Every built-in decoder module.
pub fn builtin_codecs(trace: &Arc<Trace>) -> Vec<Box<dyn Module>> {
    let mut modules: Vec<Box<dyn Module>> = PLAIN_CODECS
        .iter()
        .map(|&(name, help, sids)| {
            Box::new(CodecModule::new(name, help).owning(sids)) as Box<dyn Module>
        })
        .collect();
    modules.push(Box::new(UdpModule::new(Arc::clone(trace))));
    modules.push(Box::new(MplsModule::new(Arc::clone(trace))));
    modules
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::EngineConfig;
    use crate::trace::Tracer;

    #[test]
    fn trivial_codec_rejects_any_key() {
        let mut module = CodecModule::new("eth", "support for ethernet protocol");
        let mut config = EngineConfig::default();
        let before = config.clone();
        let err = module
            .set("anything", &Value::Int(1), &mut config)
            .unwrap_err();
        assert!(matches!(err, ModuleError::UnknownKey { .. }));
        assert_eq!(config, before);
    }

    #[test]
    fn codec_gid_is_decode_group() {
        let tracer = Tracer::new();
        for module in builtin_codecs(&tracer.decode()) {
            assert_eq!(module.gid(), 116, "{}", module.name());
            assert_eq!(module.usage(), Usage::Context);
        }
    }

    #[test]
    fn builtin_codecs_partition_decode_rules() {
        let tracer = Tracer::new();
        let mut owners: BTreeMap<u32, String> = BTreeMap::new();
        for module in builtin_codecs(&tracer.decode()) {
            for rule in module.rules() {
                assert_eq!(rule.gid, GID_DECODE);
                if let Some(previous) = owners.insert(rule.sid, module.name().to_string()) {
                    panic!("sid {} owned by {} and {}", rule.sid, previous, module.name());
                }
            }
        }
        let owned: Vec<u32> = owners.keys().copied().collect();
        let mut expected: Vec<u32> = CodecSid::ALL.iter().map(|sid| sid.sid()).collect();
        expected.sort_unstable();
        assert_eq!(owned, expected);
    }

    #[test]
    fn rules_follow_owned_sids() {
        let module = CodecModule::new("gtp", "gtp").owning(GTP);
        let sids: Vec<u32> = module.rules().iter().map(|rule| rule.sid).collect();
        assert_eq!(sids, vec![297, 298]);
        assert!(CodecModule::new("none", "none").rules().is_empty());
    }
}
