//! Encounter tallies shared by every session of one bot process.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::domain::models::EncounterKind;

/// Completed-encounter counters.
///
/// Injected into sessions behind an `Arc`; bots that report one tally share
/// one instance.
#[derive(Debug, Default)]
pub struct SessionCounters {
    encounters: AtomicU64,
    legends: AtomicU64,
}

/// Point-in-time copy of [`SessionCounters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CountsSnapshot {
    pub encounters: u64,
    pub legends: u64,
}

impl CountsSnapshot {
    pub const fn total(&self) -> u64 {
        self.encounters + self.legends
    }
}

impl SessionCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_completed_encounters(&self) -> u64 {
        self.encounters.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn add_completed_legends(&self) -> u64 {
        self.legends.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Route one confirmed encounter to its counter.
    pub fn record(&self, kind: EncounterKind) -> u64 {
        match kind {
            EncounterKind::Wild => self.add_completed_encounters(),
            EncounterKind::Legend => self.add_completed_legends(),
        }
    }

    pub fn snapshot(&self) -> CountsSnapshot {
        CountsSnapshot {
            encounters: self.encounters.load(Ordering::Relaxed),
            legends: self.legends.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_record_routes_by_kind() {
        let counters = SessionCounters::new();
        assert_eq!(counters.record(EncounterKind::Wild), 1);
        assert_eq!(counters.record(EncounterKind::Legend), 1);
        assert_eq!(counters.record(EncounterKind::Legend), 2);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.encounters, 1);
        assert_eq!(snapshot.legends, 2);
        assert_eq!(snapshot.total(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let counters = Arc::new(SessionCounters::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let counters = Arc::clone(&counters);
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    counters.add_completed_encounters();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(counters.snapshot().encounters, 800);
    }

    proptest! {
        #[test]
        fn prop_counters_never_decrease(kinds in proptest::collection::vec(any::<bool>(), 0..64)) {
            let counters = SessionCounters::new();
            let mut previous = counters.snapshot();
            for legend in kinds {
                counters.record(if legend { EncounterKind::Legend } else { EncounterKind::Wild });
                let current = counters.snapshot();
                prop_assert!(current.encounters >= previous.encounters);
                prop_assert!(current.legends >= previous.legends);
                prop_assert_eq!(current.total(), previous.total() + 1);
                previous = current;
            }
        }
    }
}
