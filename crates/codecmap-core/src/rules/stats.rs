use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::warn;

use super::registry::RuleRegistry;
use super::sid::{DECODE_INDEX_MAX, GID_DECODE};

/// Per-sid decode anomaly counters.
///
/// The registry is frozen before workers start, so raising a code is a
/// lookup plus one relaxed atomic increment.
#[derive(Debug)]
pub struct DecodeStats {
    registry: Arc<RuleRegistry>,
    counts: Box<[AtomicU64]>,
    unresolved: AtomicU64,
}

/// One non-zero counter with its descriptor text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyCount {
    pub gid: u32,
    pub sid: u32,
    pub msg: &'static str,
    pub count: u64,
}

impl DecodeStats {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        let counts = (0..DECODE_INDEX_MAX).map(|_| AtomicU64::new(0)).collect();
        Self {
            registry,
            counts,
            unresolved: AtomicU64::new(0),
        }
    }

    /// Record one decode anomaly.
    ///
    /// Returns `false` when the sid has no descriptor; the fault is logged
    /// and the caller keeps decoding.
    pub fn raise(&self, sid: u32) -> bool {
        let slot = self.counts.get(sid as usize);
        match (slot, self.registry.lookup_decode(sid)) {
            (Some(counter), Ok(_)) => {
                counter.fetch_add(1, Ordering::Relaxed);
                true
            }
            (_, Err(err)) => {
                self.unresolved.fetch_add(1, Ordering::Relaxed);
                warn!(gid = GID_DECODE, sid, "{err}");
                false
            }
            (None, Ok(_)) => {
                self.unresolved.fetch_add(1, Ordering::Relaxed);
                warn!(gid = GID_DECODE, sid, "sid beyond counter table");
                false
            }
        }
    }

    pub fn count(&self, sid: u32) -> u64 {
        self.counts
            .get(sid as usize)
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn unresolved(&self) -> u64 {
        self.unresolved.load(Ordering::Relaxed)
    }

    /// Non-zero counters in ascending sid order.
    pub fn snapshot(&self) -> Vec<AnomalyCount> {
        self.counts
            .iter()
            .enumerate()
            .filter_map(|(sid, counter)| {
                let count = counter.load(Ordering::Relaxed);
                if count == 0 {
                    return None;
                }
                let rule = self.registry.lookup_decode(sid as u32).ok()?;
                Some(AnomalyCount {
                    gid: rule.gid,
                    sid: rule.sid,
                    msg: rule.msg,
                    count,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::rules::sid::CodecSid;

    fn stats() -> DecodeStats {
        DecodeStats::new(Arc::new(RuleRegistry::decode().unwrap()))
    }

    #[test]
    fn raise_counts_resolved_sids() {
        let stats = stats();
        assert!(stats.raise(CodecSid::TcpXmas.sid()));
        assert!(stats.raise(CodecSid::TcpXmas.sid()));
        assert_eq!(stats.count(400), 2);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].sid, 400);
        assert_eq!(snapshot[0].count, 2);
    }

    #[test]
    fn unresolved_sid_is_not_fatal() {
        let stats = stats();
        assert!(!stats.raise(417));
        assert!(!stats.raise(DECODE_INDEX_MAX));
        assert!(!stats.raise(u32::MAX));
        assert_eq!(stats.unresolved(), 3);
        assert!(stats.snapshot().is_empty());
    }

    #[test]
    fn concurrent_raises_are_counted() {
        let stats = stats();
        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        stats.raise(CodecSid::NotIpv4Dgram.sid());
                    }
                });
            }
        });
        assert_eq!(stats.count(1), 4000);
    }
}
