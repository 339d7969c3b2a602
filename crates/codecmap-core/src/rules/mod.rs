//! Decode anomaly rules.
//!
//! Layout:
//! - `sid`: numeric identifiers and the sentinel (source of truth)
//! - `descriptor`: the `gid:sid "msg" (classtype)` record
//! - `table`: one descriptor per assigned sid
//! - `registry`: startup builder and frozen lookup table
//! - `stats`: lock-free per-sid counters for runtime raises
//!
//! Numbers are load-bearing: external rule and alert consumers persist them,
//! so identifiers carry literal values and the registry refuses collisions.

pub mod descriptor;
pub mod error;
pub mod registry;
pub mod sid;
pub mod stats;
pub mod table;

pub use descriptor::{Classification, RuleDescriptor};
pub use error::RegistryError;
pub use registry::{RegistryBuilder, RuleRegistry};
pub use sid::{CodecSid, DECODE_INDEX_MAX, GID_DECODE};
pub use stats::{AnomalyCount, DecodeStats};
pub use table::{DECODE_RULES, decode_rule};
