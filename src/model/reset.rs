//! Reset counter profiling ke nol
//!
//! Hanya values yang disentuh. Header, identity, dan checksum tetap.

use super::unit::CoverageUnit;

/// Set semua counter value di unit ke nol
///
/// Walk: functions -> slot aktif (urut naik) -> values. Tidak ada alokasi,
/// tidak ada resize.
pub fn reset(unit: &mut CoverageUnit) {
    let active = unit.mask().active_count();
    let mut cleared = 0usize;

    for function in unit.functions_mut() {
        for group in function.groups_mut().iter_mut().take(active) {
            let values = group.values_mut();
            values.fill(0);
            cleared += values.len();
        }
    }

    tracing::debug!("🧹 Reset {} counters", cleared);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CounterGroup, CounterKind, FunctionRecord};

    #[test]
    fn test_reset_zeroes_counters_only() {
        let mut unit = CoverageUnit::builder("reset.gcda")
            .version(0x4230_332a)
            .stamp(77)
            .checksum(88)
            .counter_kind(CounterKind::Arcs)
            .counter_kind(CounterKind::Ior)
            .function(FunctionRecord::new(
                1,
                11,
                12,
                vec![
                    CounterGroup::from_values(vec![3, 4, 5]),
                    CounterGroup::from_values(vec![u64::MAX]),
                ],
            ))
            .function(FunctionRecord::new(
                2,
                21,
                22,
                vec![CounterGroup::from_values(vec![9]), CounterGroup::zeroed(0)],
            ))
            .build()
            .unwrap();
        let before = unit.clone();

        reset(&mut unit);

        for function in unit.functions() {
            for group in function.groups() {
                assert!(group.values().iter().all(|&v| v == 0));
            }
        }
        assert_eq!(unit.version(), before.version());
        assert_eq!(unit.stamp(), before.stamp());
        assert_eq!(unit.checksum(), before.checksum());
        for (after, before) in unit.functions().iter().zip(before.functions()) {
            assert_eq!(after.ident(), before.ident());
            assert_eq!(after.lineno_checksum(), before.lineno_checksum());
            assert_eq!(after.cfg_checksum(), before.cfg_checksum());
            let lens: Vec<_> = after.groups().iter().map(|g| g.count()).collect();
            let old: Vec<_> = before.groups().iter().map(|g| g.count()).collect();
            assert_eq!(lens, old);
        }
    }

    #[test]
    fn test_reset_empty_unit() {
        let mut unit = CoverageUnit::builder("empty.gcda").build().unwrap();
        reset(&mut unit);
        assert!(unit.functions().is_empty());
    }
}
