//! Decode rule descriptors, one per assigned `CodecSid`.

use super::descriptor::{Classification, RuleDescriptor};
use super::sid::{CodecSid, GID_DECODE};

use Classification::{
    AttemptedDos as Dos, AttemptedRecon as Recon, BadUnknown as Bad, MiscActivity as Misc,
    MiscAttack as Attack, NonStandardProtocol as NonStd, ProtocolCommandDecode as Decode,
};
use CodecSid::*;

const fn rule(sid: CodecSid, msg: &'static str, class: Classification) -> RuleDescriptor {
    RuleDescriptor::new(GID_DECODE, sid as u32, msg, class)
}

pub static DECODE_RULES: &[RuleDescriptor] = &[
    rule(NotIpv4Dgram, "not IPv4 datagram", Decode),
    rule(Ipv4InvalidHeaderLen, "IPv4 header length < minimum", Decode),
    rule(Ipv4DgramLtIphdr, "IPv4 datagram length < header field", Decode),
    rule(Ipv4OptBadLen, "IPv4 options found with bad lengths", Decode),
    rule(Ipv4OptTruncated, "truncated IPv4 options", Decode),
    rule(Ipv4DgramGtCaplen, "IPv4 datagram length > captured length", Decode),
    rule(TcpDgramLtTcphdr, "TCP packet length is smaller than 20 bytes", Decode),
    rule(TcpInvalidOffset, "TCP data offset is less than 5", Decode),
    rule(TcpLargeOffset, "TCP header length exceeds packet length", Decode),
    rule(TcpOptBadLen, "TCP options found with bad lengths", Decode),
    rule(TcpOptTruncated, "truncated TCP options", Decode),
    rule(TcpOptTtcp, "T/TCP detected", Decode),
    rule(TcpOptObsolete, "obsolete TCP options found", Decode),
    rule(TcpOptExperimental, "experimental TCP options found", Decode),
    rule(TcpOptWscaleInvalid, "TCP window scale option found with length > 14", Decode),
    rule(UdpDgramLtUdphdr, "truncated UDP header", Decode),
    rule(UdpDgramInvalidLength, "invalid UDP header, length field < 8", Decode),
    rule(UdpDgramShortPacket, "short UDP packet, length field > payload length", Decode),
    rule(UdpDgramLongPacket, "long UDP packet, length field < payload length", Decode),
    rule(IcmpDgramLtIcmphdr, "ICMP header truncated", Decode),
    rule(IcmpDgramLtTimestamphdr, "ICMP timestamp header truncated", Decode),
    rule(IcmpDgramLtAddrhdr, "ICMP address header truncated", Decode),
    rule(ArpTruncated, "truncated ARP", Decode),
    rule(EapolTruncated, "truncated EAP header", Decode),
    rule(EapKeyTruncated, "EAP key truncated", Decode),
    rule(EapTruncated, "EAP header truncated", Decode),
    rule(BadPppoe, "bad PPPOE frame detected", Decode),
    rule(BadVlan, "bad VLAN frame", Decode),
    rule(BadLlcHeader, "bad LLC header", Decode),
    rule(BadLlcOther, "bad extra LLC info", Decode),
    rule(Bad80211EthLlc, "bad 802.11 LLC header", Decode),
    rule(Bad80211Other, "bad 802.11 extra LLC info", Decode),
    rule(BadTrh, "bad token ring header", Decode),
    rule(BadTrEthLlc, "bad token ring ETHLLC header", Decode),
    rule(BadTrMrLen, "bad token ring MRLEN header", Decode),
    rule(BadTrhMr, "bad token ring MR header", Decode),
    rule(BadTrafficLoopback, "bad traffic loopback IP", Bad),
    rule(BadTrafficSameSrcDst, "bad traffic same src/dst IP", Bad),
    rule(GreDgramLtGrehdr, "GRE header length > payload length", Decode),
    rule(GreMultipleEncapsulation, "multiple encapsulations in packet", Decode),
    rule(GreInvalidVersion, "invalid GRE version", Decode),
    rule(GreInvalidHeader, "invalid GRE header", Decode),
    rule(GreV1InvalidHeader, "invalid GRE v.1 PPTP header", Decode),
    rule(GreTransDgramLtTranshdr, "GRE trans header length > payload length", Decode),
    rule(BadMpls, "bad MPLS frame", Decode),
    rule(BadMplsLabel0, "MPLS label 0 appears in non-bottom header", Decode),
    rule(BadMplsLabel1, "MPLS label 1 appears in bottom header", Decode),
    rule(BadMplsLabel2, "MPLS label 2 appears in non-bottom header", Decode),
    rule(BadMplsLabel3, "MPLS label 3 appears in header", Decode),
    rule(MplsReservedLabel, "MPLS label 4, 5,.. or 15 appears in header", Decode),
    rule(MplsLabelStack, "too many MPLS headers", Decode),
    rule(IcmpOrigIpTruncated, "ICMP original IP header truncated", Decode),
    rule(IcmpOrigIpVerMismatch, "ICMP version and original IP header versions differ", Decode),
    rule(
        IcmpOrigDgramLtOrigIp,
        "ICMP original datagram length < original IP header length",
        Decode,
    ),
    rule(IcmpOrigPayloadLt64, "ICMP original IP payload < 64 bits", Decode),
    rule(IcmpOrigPayloadGt576, "ICMP original IP payload > 576 bytes", Decode),
    rule(IcmpOrigIpWithFragOffset, "ICMP original IP fragmented and offset not 0", Decode),
    rule(Ipv6MinTtl, "IPv6 packet below TTL limit", Decode),
    rule(Ipv6IsNot, "IPv6 header claims to not be IPv6", Decode),
    rule(Ipv6TruncatedExt, "IPV6 truncated extension header", Decode),
    rule(Ipv6Truncated, "IPV6 truncated header", Decode),
    rule(Ipv6DgramLtIphdr, "IPv6 datagram length < header field", Decode),
    rule(Ipv6DgramGtCaplen, "IPv6 datagram length > captured length", Decode),
    rule(Ipv6DstZero, "IPv6 packet with destination address ::0", Decode),
    rule(Ipv6SrcMulticast, "IPv6 packet with multicast source address", Decode),
    rule(
        Ipv6DstReservedMulticast,
        "IPv6 packet with reserved multicast destination address",
        Decode,
    ),
    rule(Ipv6BadOptType, "IPv6 header includes an undefined option type", Decode),
    rule(
        Ipv6BadMulticastScope,
        "IPv6 address includes an unassigned multicast scope value",
        Decode,
    ),
    rule(
        Ipv6BadNextHeader,
        "IPv6 header includes an invalid value for the next header field",
        Decode,
    ),
    rule(
        Ipv6RouteAndHopByHop,
        "IPv6 header includes a routing extension header followed by a hop-by-hop header",
        Decode,
    ),
    rule(Ipv6TwoRouteHeaders, "IPv6 header includes two routing extension headers", Decode),
    rule(
        Icmpv6TooBigBadMtu,
        "ICMPv6 packet of type 2 (message too big) with MTU field < 1280",
        Decode,
    ),
    rule(
        Icmpv6UnreachableNonRfc2463Code,
        "ICMPv6 packet of type 1 (destination unreachable) with non-RFC 2463 code",
        Decode,
    ),
    rule(
        Icmpv6SolicitationBadCode,
        "ICMPv6 router solicitation packet with a code not equal to 0",
        Decode,
    ),
    rule(
        Icmpv6AdvertBadCode,
        "ICMPv6 router advertisement packet with a code not equal to 0",
        Decode,
    ),
    rule(
        Icmpv6SolicitationBadReserved,
        "ICMPv6 router solicitation packet with the reserved field not equal to 0",
        Decode,
    ),
    rule(
        Icmpv6AdvertBadReachable,
        "ICMPv6 router advertisement packet with the reachable time field set > 1 hour",
        Decode,
    ),
    rule(
        Ipv6TunneledIpv4Truncated,
        "IPV6 tunneled over IPv4, IPv6 header truncated, possible Linux kernel attack",
        Attack,
    ),
    rule(
        Ipv6DstOptsWithRouting,
        "IPv6 header has destination options followed by a routing header",
        Decode,
    ),
    rule(
        IpMultipleEncapsulation,
        "two or more IP (v4 and/or v6) encapsulation layers present",
        Decode,
    ),
    rule(EspHeaderTrunc, "truncated encapsulated security payload header", Decode),
    rule(
        Ipv6BadOptLen,
        "IPv6 header includes an option which is too big for the containing header",
        Decode,
    ),
    rule(Ipv6UnorderedExtensions, "IPv6 packet includes out-of-order extension headers", Decode),
    rule(GtpMultipleEncapsulation, "two or more GTP encapsulation layers present", Decode),
    rule(GtpBadLen, "GTP header length is invalid", Decode),
    rule(TcpXmas, "XMAS attack detected", Recon),
    rule(TcpNmapXmas, "Nmap XMAS attack detected", Recon),
    rule(DosNaptha, "DOS NAPTHA vulnerability detected", Dos),
    rule(SynToMulticast, "bad traffic SYN to multicast address", Bad),
    rule(ZeroTtl, "IPV4 packet with zero TTL", Misc),
    rule(BadFragBits, "IPV4 packet with bad frag bits (both MF and DF set)", Misc),
    rule(UdpIpv6ZeroChecksum, "invalid IPv6 UDP packet, checksum zero", Decode),
    rule(Ip4LenOffset, "IPV4 packet frag offset + length exceed maximum", Misc),
    rule(Ip4SrcThisNet, "IPV4 packet from 'current net' source address", Misc),
    rule(Ip4DstThisNet, "IPV4 packet to 'current net' dest address", Misc),
    rule(Ip4SrcMulticast, "IPV4 packet from multicast source address", Misc),
    rule(Ip4SrcReserved, "IPV4 packet from reserved source address", Misc),
    rule(Ip4DstReserved, "IPV4 packet to reserved dest address", Misc),
    rule(Ip4SrcBroadcast, "IPV4 packet from broadcast source address", Misc),
    rule(Ip4DstBroadcast, "IPV4 packet to broadcast dest address", Misc),
    rule(Icmp4DstMulticast, "ICMP4 packet to multicast dest address", Misc),
    rule(Icmp4DstBroadcast, "ICMP4 packet to broadcast dest address", Misc),
    rule(Icmp4TypeOther, "ICMP4 type other", Misc),
    rule(TcpBadUrp, "TCP urgent pointer exceeds payload length or no payload", Misc),
    rule(TcpSynFin, "TCP SYN with FIN", Misc),
    rule(TcpSynRst, "TCP SYN with RST", Misc),
    rule(TcpMustAck, "TCP PDU missing ack for established session", Misc),
    rule(TcpNoSynAckRst, "TCP has no SYN, ACK, or RST", Misc),
    rule(EthHdrTrunc, "truncated ethernet header", Decode),
    rule(Ip4HdrTrunc, "truncated IPv4 header", Decode),
    rule(Icmp4HdrTrunc, "truncated ICMPv4 header", Decode),
    rule(Icmp6HdrTrunc, "truncated ICMPv6 header", Decode),
    rule(Ip4MinTtl, "IPV4 packet below TTL limit", Misc),
    rule(Ip6ZeroHopLimit, "IPV6 packet has zero hop limit", Misc),
    rule(Ip4DfOffset, "IPV4 packet both DF and offset set", Misc),
    rule(Icmp6TypeOther, "ICMPv6 type not decoded", Misc),
    rule(Icmp6DstMulticast, "ICMPv6 packet to multicast address", Misc),
    rule(TcpShaftSynflood, "DDOS shaft SYN flood", Dos),
    rule(IcmpPingNmap, "ICMP ping Nmap", Recon),
    rule(IcmpIcmpenum, "ICMP icmpenum v1.1.1", Recon),
    rule(IcmpRedirectHost, "ICMP redirect host", Misc),
    rule(IcmpRedirectNet, "ICMP redirect net", Misc),
    rule(IcmpTracerouteIpopts, "ICMP traceroute ipopts", Recon),
    rule(IcmpSourceQuench, "ICMP source quench", Bad),
    rule(IcmpBroadscanSmurfScanner, "broadscan smurf scanner", Recon),
    rule(
        IcmpDstUnreachAdminProhibited,
        "ICMP destination unreachable communication administratively prohibited",
        Misc,
    ),
    rule(
        IcmpDstUnreachDstHostProhibited,
        "ICMP destination unreachable communication with destination host is administratively prohibited",
        Misc,
    ),
    rule(
        IcmpDstUnreachDstNetProhibited,
        "ICMP destination unreachable communication with destination network is administratively prohibited",
        Misc,
    ),
    rule(IpOptionSet, "IP option set", Misc),
    rule(UdpLargePacket, "UDP large packet", Bad),
    rule(TcpPortZero, "TCP port 0 traffic", Misc),
    rule(UdpPortZero, "UDP port 0 traffic", Misc),
    rule(IpReservedFragBit, "IP reserved bit set", Misc),
    rule(IpUnassignedProto, "IP unassigned protocol", NonStd),
    rule(IpBadProto, "IP bad protocol", NonStd),
    rule(IcmpPathMtuDos, "ICMP path MTU denial of service attempt", Dos),
    rule(IcmpDosAttempt, "Linux ICMP header DOS attempt", Dos),
    rule(Ipv6IsatapSpoof, "IPv6 ISATAP spoof", Attack),
    rule(PgmNakOverflow, "PGM nak list overflow", Attack),
    rule(IgmpOptionsDos, "IGMP options DOS", Dos),
    rule(Ip6ExcessExtHdr, "too many IP6 extension headers", Misc),
    rule(
        Icmpv6UnreachableNonRfc4443Code,
        "ICMPv6 packet of type 1 (destination unreachable) with non-RFC 4443 code",
        Decode,
    ),
    rule(Ipv6BadFragPkt, "bogus fragmentation packet, possible BSD attack", Attack),
    rule(ZeroLengthFrag, "fragment with zero length", Decode),
    rule(
        Icmpv6NodeInfoBadCode,
        "ICMPv6 node info query/response packet with a code greater than 2",
        Decode,
    ),
    rule(Ipv6RouteZero, "IPV6 routing type 0 extension header", Decode),
    rule(ErspanHdrVersionMismatch, "ERSpan header version mismatch", Decode),
    rule(Erspan2DgramLtHdr, "captured length < ERSpan type2 header length", Decode),
    rule(Erspan3DgramLtHdr, "captured < ERSpan type3 header length", Decode),
    rule(AuthHdrTrunc, "truncated authentication header", Decode),
    rule(AuthHdrBadLen, "bad authentication header length", Decode),
    rule(FpathHdrTrunc, "truncated FabricPath header", Decode),
    rule(CiscoMetaHdrTrunc, "truncated Cisco Metadata header", Decode),
    rule(CiscoMetaHdrOptLen, "invalid Cisco Metadata option length", Decode),
    rule(CiscoMetaHdrOptType, "invalid Cisco Metadata option type", Decode),
    rule(CiscoMetaHdrSgt, "invalid Cisco Metadata security group tag", Decode),
    rule(TooManyLayers, "too many protocols present", Decode),
    rule(BadEtherType, "ether type out of range", Decode),
    rule(Icmp6NotIp6, "ICMPv6 not encapsulated in IPv6", Decode),
    rule(Mipv6BadPayloadProto, "MIPV6 payload protocol is not 59 (no next header)", Decode),
];

/// Descriptor for a decode sid.
pub fn decode_rule(sid: CodecSid) -> Option<&'static RuleDescriptor> {
    DECODE_RULES.iter().find(|rule| rule.sid == sid.sid())
}
