use std::collections::BTreeMap;

use tracing::debug;

use super::descriptor::{Classification, RuleDescriptor};
use super::error::RegistryError;
use super::sid::GID_DECODE;
use super::table::DECODE_RULES;

/// Startup-phase registry builder.
///
/// Registration happens on the single configuration thread; `build` hands
/// back a frozen [`RuleRegistry`] that only exposes queries.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    rules: BTreeMap<(u32, u32), RuleDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one descriptor. A `(gid, sid)` collision is a build defect and
    /// must abort startup.
    pub fn register(
        &mut self,
        gid: u32,
        sid: u32,
        msg: &'static str,
        classification: Classification,
    ) -> Result<&mut Self, RegistryError> {
        self.insert(RuleDescriptor::new(gid, sid, msg, classification))
    }

    pub fn register_all<'a, I>(&mut self, rules: I) -> Result<&mut Self, RegistryError>
    where
        I: IntoIterator<Item = &'a RuleDescriptor>,
    {
        for rule in rules {
            self.insert(*rule)?;
        }
        Ok(self)
    }

    fn insert(&mut self, rule: RuleDescriptor) -> Result<&mut Self, RegistryError> {
        if let Some(existing) = self.rules.get(&(rule.gid, rule.sid)) {
            return Err(RegistryError::DuplicateRule {
                gid: rule.gid,
                sid: rule.sid,
                existing: existing.msg,
            });
        }
        debug!(gid = rule.gid, sid = rule.sid, "registered rule");
        self.rules.insert((rule.gid, rule.sid), rule);
        Ok(self)
    }

    pub fn build(self) -> RuleRegistry {
        RuleRegistry { rules: self.rules }
    }
}

/// Read-only mapping from `(gid, sid)` to [`RuleDescriptor`].
///
/// Built once during startup and shared read-only with packet workers.
///
/// # Examples
/// ```
/// use codecmap_core::{GID_DECODE, RuleRegistry};
///
/// let registry = RuleRegistry::decode().unwrap();
/// let rule = registry.lookup_decode(1).unwrap();
/// assert_eq!(rule.gid, GID_DECODE);
/// assert_eq!(rule.msg, "not IPv4 datagram");
/// ```
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: BTreeMap<(u32, u32), RuleDescriptor>,
}

impl RuleRegistry {
    /// Registry holding every decode descriptor.
    pub fn decode() -> Result<Self, RegistryError> {
        let mut builder = RegistryBuilder::new();
        builder.register_all(DECODE_RULES)?;
        Ok(builder.build())
    }

    pub fn lookup(&self, gid: u32, sid: u32) -> Result<&RuleDescriptor, RegistryError> {
        self.rules
            .get(&(gid, sid))
            .ok_or(RegistryError::Unresolved { gid, sid })
    }

    pub fn lookup_decode(&self, sid: u32) -> Result<&RuleDescriptor, RegistryError> {
        self.lookup(GID_DECODE, sid)
    }

    pub fn contains(&self, gid: u32, sid: u32) -> bool {
        self.rules.contains_key(&(gid, sid))
    }

    /// Descriptors owned by `gid`, ascending by sid.
    pub fn rules_for_gid(&self, gid: u32) -> impl Iterator<Item = &RuleDescriptor> + '_ {
        self.rules.range((gid, 0)..=(gid, u32::MAX)).map(|(_, rule)| rule)
    }

    /// All descriptors ordered by `(gid, sid)`.
    pub fn iter(&self) -> impl Iterator<Item = &RuleDescriptor> + '_ {
        self.rules.values()
    }

    pub fn gids(&self) -> Vec<u32> {
        let mut gids: Vec<u32> = self.rules.keys().map(|(gid, _)| *gid).collect();
        gids.dedup();
        gids
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
