//! Decode anomaly identifiers (gid 116).
//!
//! Every identifier carries an explicit numeric value. Released values are
//! persisted by rule and alert consumers and are never reassigned; new codes
//! are appended after the highest value of their protocol block or placed in
//! a reserved gap, and `DECODE_INDEX_MAX` moves with the highest value.

use std::fmt;

/// Group identifier owning every decode anomaly.
pub const GID_DECODE: u32 = 116;

macro_rules! codec_sids {
    ($($variant:ident = $value:literal => $name:literal,)+) => {
        /// Decode anomaly signature identifier.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u32)]
        pub enum CodecSid {
            $($variant = $value,)+
        }

        impl CodecSid {
            /// Every assigned identifier in declaration order.
            pub const ALL: &'static [CodecSid] = &[$(CodecSid::$variant,)+];

            /// Resolve a raw sid into its identifier.
            pub fn from_sid(sid: u32) -> Option<CodecSid> {
                match sid {
                    $($value => Some(CodecSid::$variant),)+
                    _ => None,
                }
            }

            /// Stable upper-case name (e.g. `DECODE_NOT_IPV4_DGRAM`).
            pub fn name(self) -> &'static str {
                match self {
                    $(CodecSid::$variant => $name,)+
                }
            }
        }
    };
}

codec_sids! {
    NotIpv4Dgram = 1 => "DECODE_NOT_IPV4_DGRAM",
    Ipv4InvalidHeaderLen = 2 => "DECODE_IPV4_INVALID_HEADER_LEN",
    Ipv4DgramLtIphdr = 3 => "DECODE_IPV4_DGRAM_LT_IPHDR",
    Ipv4OptBadLen = 4 => "DECODE_IPV4OPT_BADLEN",
    Ipv4OptTruncated = 5 => "DECODE_IPV4OPT_TRUNCATED",
    Ipv4DgramGtCaplen = 6 => "DECODE_IPV4_DGRAM_GT_CAPLEN",

    TcpDgramLtTcphdr = 45 => "DECODE_TCP_DGRAM_LT_TCPHDR",
    TcpInvalidOffset = 46 => "DECODE_TCP_INVALID_OFFSET",
    TcpLargeOffset = 47 => "DECODE_TCP_LARGE_OFFSET",

    TcpOptBadLen = 54 => "DECODE_TCPOPT_BADLEN",
    TcpOptTruncated = 55 => "DECODE_TCPOPT_TRUNCATED",
    TcpOptTtcp = 56 => "DECODE_TCPOPT_TTCP",
    TcpOptObsolete = 57 => "DECODE_TCPOPT_OBSOLETE",
    TcpOptExperimental = 58 => "DECODE_TCPOPT_EXPERIMENTAL",
    TcpOptWscaleInvalid = 59 => "DECODE_TCPOPT_WSCALE_INVALID",

    UdpDgramLtUdphdr = 95 => "DECODE_UDP_DGRAM_LT_UDPHDR",
    UdpDgramInvalidLength = 96 => "DECODE_UDP_DGRAM_INVALID_LENGTH",
    UdpDgramShortPacket = 97 => "DECODE_UDP_DGRAM_SHORT_PACKET",
    UdpDgramLongPacket = 98 => "DECODE_UDP_DGRAM_LONG_PACKET",

    IcmpDgramLtIcmphdr = 105 => "DECODE_ICMP_DGRAM_LT_ICMPHDR",
    IcmpDgramLtTimestamphdr = 106 => "DECODE_ICMP_DGRAM_LT_TIMESTAMPHDR",
    IcmpDgramLtAddrhdr = 107 => "DECODE_ICMP_DGRAM_LT_ADDRHDR",

    ArpTruncated = 109 => "DECODE_ARP_TRUNCATED",
    EapolTruncated = 110 => "DECODE_EAPOL_TRUNCATED",
    EapKeyTruncated = 111 => "DECODE_EAPKEY_TRUNCATED",
    EapTruncated = 112 => "DECODE_EAP_TRUNCATED",

    BadPppoe = 120 => "DECODE_BAD_PPPOE",
    BadVlan = 130 => "DECODE_BAD_VLAN",
    BadLlcHeader = 131 => "DECODE_BAD_LLC_HEADER",
    BadLlcOther = 132 => "DECODE_BAD_LLC_OTHER",
    Bad80211EthLlc = 133 => "DECODE_BAD_80211_ETHLLC",
    Bad80211Other = 134 => "DECODE_BAD_80211_OTHER",

    BadTrh = 140 => "DECODE_BAD_TRH",
    BadTrEthLlc = 141 => "DECODE_BAD_TR_ETHLLC",
    BadTrMrLen = 142 => "DECODE_BAD_TR_MR_LEN",
    BadTrhMr = 143 => "DECODE_BAD_TRHMR",

    BadTrafficLoopback = 150 => "DECODE_BAD_TRAFFIC_LOOPBACK",
    BadTrafficSameSrcDst = 151 => "DECODE_BAD_TRAFFIC_SAME_SRCDST",

    GreDgramLtGrehdr = 160 => "DECODE_GRE_DGRAM_LT_GREHDR",
    GreMultipleEncapsulation = 161 => "DECODE_GRE_MULTIPLE_ENCAPSULATION",
    GreInvalidVersion = 162 => "DECODE_GRE_INVALID_VERSION",
    GreInvalidHeader = 163 => "DECODE_GRE_INVALID_HEADER",
    GreV1InvalidHeader = 164 => "DECODE_GRE_V1_INVALID_HEADER",
    GreTransDgramLtTranshdr = 165 => "DECODE_GRE_TRANS_DGRAM_LT_TRANSHDR",

    BadMpls = 170 => "DECODE_BAD_MPLS",
    BadMplsLabel0 = 171 => "DECODE_BAD_MPLS_LABEL0",
    BadMplsLabel1 = 172 => "DECODE_BAD_MPLS_LABEL1",
    BadMplsLabel2 = 173 => "DECODE_BAD_MPLS_LABEL2",
    BadMplsLabel3 = 174 => "DECODE_BAD_MPLS_LABEL3",
    MplsReservedLabel = 175 => "DECODE_MPLS_RESERVED_LABEL",
    MplsLabelStack = 176 => "DECODE_MPLS_LABEL_STACK",

    IcmpOrigIpTruncated = 250 => "DECODE_ICMP_ORIG_IP_TRUNCATED",
    IcmpOrigIpVerMismatch = 251 => "DECODE_ICMP_ORIG_IP_VER_MISMATCH",
    IcmpOrigDgramLtOrigIp = 252 => "DECODE_ICMP_ORIG_DGRAM_LT_ORIG_IP",
    IcmpOrigPayloadLt64 = 253 => "DECODE_ICMP_ORIG_PAYLOAD_LT_64",
    IcmpOrigPayloadGt576 = 254 => "DECODE_ICMP_ORIG_PAYLOAD_GT_576",
    IcmpOrigIpWithFragOffset = 255 => "DECODE_ICMP_ORIG_IP_WITH_FRAGOFFSET",

    Ipv6MinTtl = 270 => "DECODE_IPV6_MIN_TTL",
    Ipv6IsNot = 271 => "DECODE_IPV6_IS_NOT",
    Ipv6TruncatedExt = 272 => "DECODE_IPV6_TRUNCATED_EXT",
    Ipv6Truncated = 273 => "DECODE_IPV6_TRUNCATED",
    Ipv6DgramLtIphdr = 274 => "DECODE_IPV6_DGRAM_LT_IPHDR",
    Ipv6DgramGtCaplen = 275 => "DECODE_IPV6_DGRAM_GT_CAPLEN",
    Ipv6DstZero = 276 => "DECODE_IPV6_DST_ZERO",
    Ipv6SrcMulticast = 277 => "DECODE_IPV6_SRC_MULTICAST",
    Ipv6DstReservedMulticast = 278 => "DECODE_IPV6_DST_RESERVED_MULTICAST",
    Ipv6BadOptType = 279 => "DECODE_IPV6_BAD_OPT_TYPE",
    Ipv6BadMulticastScope = 280 => "DECODE_IPV6_BAD_MULTICAST_SCOPE",
    Ipv6BadNextHeader = 281 => "DECODE_IPV6_BAD_NEXT_HEADER",
    Ipv6RouteAndHopByHop = 282 => "DECODE_IPV6_ROUTE_AND_HOPBYHOP",
    Ipv6TwoRouteHeaders = 283 => "DECODE_IPV6_TWO_ROUTE_HEADERS",

    Icmpv6TooBigBadMtu = 285 => "DECODE_ICMPV6_TOO_BIG_BAD_MTU",
    Icmpv6UnreachableNonRfc2463Code = 286 => "DECODE_ICMPV6_UNREACHABLE_NON_RFC_2463_CODE",
    Icmpv6SolicitationBadCode = 287 => "DECODE_ICMPV6_SOLICITATION_BAD_CODE",
    Icmpv6AdvertBadCode = 288 => "DECODE_ICMPV6_ADVERT_BAD_CODE",
    Icmpv6SolicitationBadReserved = 289 => "DECODE_ICMPV6_SOLICITATION_BAD_RESERVED",
    Icmpv6AdvertBadReachable = 290 => "DECODE_ICMPV6_ADVERT_BAD_REACHABLE",

    Ipv6TunneledIpv4Truncated = 291 => "DECODE_IPV6_TUNNELED_IPV4_TRUNCATED",
    Ipv6DstOptsWithRouting = 292 => "DECODE_IPV6_DSTOPTS_WITH_ROUTING",
    IpMultipleEncapsulation = 293 => "DECODE_IP_MULTIPLE_ENCAPSULATION",

    EspHeaderTrunc = 294 => "DECODE_ESP_HEADER_TRUNC",
    Ipv6BadOptLen = 295 => "DECODE_IPV6_BAD_OPT_LEN",
    Ipv6UnorderedExtensions = 296 => "DECODE_IPV6_UNORDERED_EXTENSIONS",

    GtpMultipleEncapsulation = 297 => "DECODE_GTP_MULTIPLE_ENCAPSULATION",
    GtpBadLen = 298 => "DECODE_GTP_BAD_LEN",

    TcpXmas = 400 => "DECODE_TCP_XMAS",
    TcpNmapXmas = 401 => "DECODE_TCP_NMAP_XMAS",
    DosNaptha = 402 => "DECODE_DOS_NAPTHA",
    SynToMulticast = 403 => "DECODE_SYN_TO_MULTICAST",
    ZeroTtl = 404 => "DECODE_ZERO_TTL",
    BadFragBits = 405 => "DECODE_BAD_FRAGBITS",
    UdpIpv6ZeroChecksum = 406 => "DECODE_UDP_IPV6_ZERO_CHECKSUM",
    Ip4LenOffset = 407 => "DECODE_IP4_LEN_OFFSET",
    Ip4SrcThisNet = 408 => "DECODE_IP4_SRC_THIS_NET",
    Ip4DstThisNet = 409 => "DECODE_IP4_DST_THIS_NET",
    Ip4SrcMulticast = 410 => "DECODE_IP4_SRC_MULTICAST",
    Ip4SrcReserved = 411 => "DECODE_IP4_SRC_RESERVED",
    Ip4DstReserved = 412 => "DECODE_IP4_DST_RESERVED",
    Ip4SrcBroadcast = 413 => "DECODE_IP4_SRC_BROADCAST",
    Ip4DstBroadcast = 414 => "DECODE_IP4_DST_BROADCAST",
    Icmp4DstMulticast = 415 => "DECODE_ICMP4_DST_MULTICAST",
    Icmp4DstBroadcast = 416 => "DECODE_ICMP4_DST_BROADCAST",
    // 417 is unassigned.
    Icmp4TypeOther = 418 => "DECODE_ICMP4_TYPE_OTHER",
    TcpBadUrp = 419 => "DECODE_TCP_BAD_URP",
    TcpSynFin = 420 => "DECODE_TCP_SYN_FIN",
    TcpSynRst = 421 => "DECODE_TCP_SYN_RST",
    TcpMustAck = 422 => "DECODE_TCP_MUST_ACK",
    TcpNoSynAckRst = 423 => "DECODE_TCP_NO_SYN_ACK_RST",
    EthHdrTrunc = 424 => "DECODE_ETH_HDR_TRUNC",
    Ip4HdrTrunc = 425 => "DECODE_IP4_HDR_TRUNC",
    Icmp4HdrTrunc = 426 => "DECODE_ICMP4_HDR_TRUNC",
    Icmp6HdrTrunc = 427 => "DECODE_ICMP6_HDR_TRUNC",
    Ip4MinTtl = 428 => "DECODE_IP4_MIN_TTL",
    Ip6ZeroHopLimit = 429 => "DECODE_IP6_ZERO_HOP_LIMIT",
    Ip4DfOffset = 430 => "DECODE_IP4_DF_OFFSET",
    Icmp6TypeOther = 431 => "DECODE_ICMP6_TYPE_OTHER",
    Icmp6DstMulticast = 432 => "DECODE_ICMP6_DST_MULTICAST",
    TcpShaftSynflood = 433 => "DECODE_TCP_SHAFT_SYNFLOOD",
    IcmpPingNmap = 434 => "DECODE_ICMP_PING_NMAP",
    IcmpIcmpenum = 435 => "DECODE_ICMP_ICMPENUM",
    IcmpRedirectHost = 436 => "DECODE_ICMP_REDIRECT_HOST",
    IcmpRedirectNet = 437 => "DECODE_ICMP_REDIRECT_NET",
    IcmpTracerouteIpopts = 438 => "DECODE_ICMP_TRACEROUTE_IPOPTS",
    IcmpSourceQuench = 439 => "DECODE_ICMP_SOURCE_QUENCH",
    IcmpBroadscanSmurfScanner = 440 => "DECODE_ICMP_BROADSCAN_SMURF_SCANNER",
    IcmpDstUnreachAdminProhibited = 441 => "DECODE_ICMP_DST_UNREACH_ADMIN_PROHIBITED",
    IcmpDstUnreachDstHostProhibited = 442 => "DECODE_ICMP_DST_UNREACH_DST_HOST_PROHIBITED",
    IcmpDstUnreachDstNetProhibited = 443 => "DECODE_ICMP_DST_UNREACH_DST_NET_PROHIBITED",
    IpOptionSet = 444 => "DECODE_IP_OPTION_SET",
    UdpLargePacket = 445 => "DECODE_UDP_LARGE_PACKET",
    TcpPortZero = 446 => "DECODE_TCP_PORT_ZERO",
    UdpPortZero = 447 => "DECODE_UDP_PORT_ZERO",
    IpReservedFragBit = 448 => "DECODE_IP_RESERVED_FRAG_BIT",
    IpUnassignedProto = 449 => "DECODE_IP_UNASSIGNED_PROTO",
    IpBadProto = 450 => "DECODE_IP_BAD_PROTO",
    IcmpPathMtuDos = 451 => "DECODE_ICMP_PATH_MTU_DOS",
    IcmpDosAttempt = 452 => "DECODE_ICMP_DOS_ATTEMPT",
    Ipv6IsatapSpoof = 453 => "DECODE_IPV6_ISATAP_SPOOF",
    PgmNakOverflow = 454 => "DECODE_PGM_NAK_OVERFLOW",
    IgmpOptionsDos = 455 => "DECODE_IGMP_OPTIONS_DOS",
    Ip6ExcessExtHdr = 456 => "DECODE_IP6_EXCESS_EXT_HDR",
    Icmpv6UnreachableNonRfc4443Code = 457 => "DECODE_ICMPV6_UNREACHABLE_NON_RFC_4443_CODE",
    Ipv6BadFragPkt = 458 => "DECODE_IPV6_BAD_FRAG_PKT",
    ZeroLengthFrag = 459 => "DECODE_ZERO_LENGTH_FRAG",
    Icmpv6NodeInfoBadCode = 460 => "DECODE_ICMPV6_NODE_INFO_BAD_CODE",
    Ipv6RouteZero = 461 => "DECODE_IPV6_ROUTE_ZERO",
    ErspanHdrVersionMismatch = 462 => "DECODE_ERSPAN_HDR_VERSION_MISMATCH",
    Erspan2DgramLtHdr = 463 => "DECODE_ERSPAN2_DGRAM_LT_HDR",
    Erspan3DgramLtHdr = 464 => "DECODE_ERSPAN3_DGRAM_LT_HDR",
    AuthHdrTrunc = 465 => "DECODE_AUTH_HDR_TRUNC",
    AuthHdrBadLen = 466 => "DECODE_AUTH_HDR_BAD_LEN",
    FpathHdrTrunc = 467 => "DECODE_FPATH_HDR_TRUNC",
    CiscoMetaHdrTrunc = 468 => "DECODE_CISCO_META_HDR_TRUNC",
    CiscoMetaHdrOptLen = 469 => "DECODE_CISCO_META_HDR_OPT_LEN",
    CiscoMetaHdrOptType = 470 => "DECODE_CISCO_META_HDR_OPT_TYPE",
    CiscoMetaHdrSgt = 471 => "DECODE_CISCO_META_HDR_SGT",
    TooManyLayers = 472 => "DECODE_TOO_MANY_LAYERS",
    BadEtherType = 473 => "DECODE_BAD_ETHER_TYPE",
    Icmp6NotIp6 = 474 => "DECODE_ICMP6_NOT_IP6",
    Mipv6BadPayloadProto = 475 => "DECODE_MIPV6_BAD_PAYLOAD_PROTO",
}

/// One past the highest assigned decode sid; sizes per-code counter arrays.
pub const DECODE_INDEX_MAX: u32 = 476;

impl CodecSid {
    /// Raw numeric sid.
    pub fn sid(self) -> u32 {
        self as u32
    }
}

impl From<CodecSid> for u32 {
    fn from(value: CodecSid) -> Self {
        value.sid()
    }
}

impl fmt::Display for CodecSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", GID_DECODE, self.sid())
    }
}
