use std::fmt;

use serde::{Deserialize, Serialize};

/// Rule classtype attached to a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    ProtocolCommandDecode,
    MiscActivity,
    BadUnknown,
    AttemptedRecon,
    AttemptedDos,
    MiscAttack,
    NonStandardProtocol,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::ProtocolCommandDecode => "protocol-command-decode",
            Classification::MiscActivity => "misc-activity",
            Classification::BadUnknown => "bad-unknown",
            Classification::AttemptedRecon => "attempted-recon",
            Classification::AttemptedDos => "attempted-dos",
            Classification::MiscAttack => "misc-attack",
            Classification::NonStandardProtocol => "non-standard-protocol",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable explanation bound to one `(gid, sid)` pair.
///
/// The textual form `gid:sid "msg" (classification)` is consumed by rule
/// documentation tooling and stays stable for a released sid.
///
/// # Examples
/// ```
/// use codecmap_core::{Classification, RuleDescriptor};
///
/// let rule = RuleDescriptor::new(
///     116,
///     1,
///     "not IPv4 datagram",
///     Classification::ProtocolCommandDecode,
/// );
/// assert_eq!(rule.to_string(), "116:1 \"not IPv4 datagram\" (protocol-command-decode)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleDescriptor {
    pub gid: u32,
    pub sid: u32,
    pub msg: &'static str,
    pub classification: Classification,
}

impl RuleDescriptor {
    pub const fn new(
        gid: u32,
        sid: u32,
        msg: &'static str,
        classification: Classification,
    ) -> Self {
        Self {
            gid,
            sid,
            msg,
            classification,
        }
    }
}

impl fmt::Display for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} \"{}\" ({})",
            self.gid, self.sid, self.msg, self.classification
        )
    }
}
