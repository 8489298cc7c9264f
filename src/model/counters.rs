//! Counter kinds dan mask slot aktif
//!
//! Layout slot mengikuti gcc >= 10 (`GCOV_COUNTERS == 8`). Slot yang tidak
//! punya merge strategy dianggap absent: tidak ada group, tidak ada record.

use crate::protocol::tag_for_counter;

/// Jumlah slot counter kind per unit
pub const COUNTER_SLOTS: usize = 8;

/// Nama untuk setiap slot counter, urut sesuai index slot
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    /// Arc (edge) execution counts
    Arcs = 0,
    /// Histogram nilai dalam interval
    Interval = 1,
    /// Histogram power-of-two
    Pow2 = 2,
    /// Top-N value profiling
    TopN = 3,
    /// Indirect call targets
    IndirectCall = 4,
    /// Rata-rata nilai
    Average = 5,
    /// Bitwise OR dari nilai
    Ior = 6,
    /// Urutan eksekusi pertama
    TimeProfiler = 7,
}

impl CounterKind {
    /// Semua kind dalam urutan slot
    pub const ALL: [CounterKind; COUNTER_SLOTS] = [
        Self::Arcs,
        Self::Interval,
        Self::Pow2,
        Self::TopN,
        Self::IndirectCall,
        Self::Average,
        Self::Ior,
        Self::TimeProfiler,
    ];

    #[inline(always)]
    pub const fn slot(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.get(slot).copied()
    }

    /// Tag record counter untuk kind ini
    #[inline(always)]
    pub const fn tag(self) -> u32 {
        tag_for_counter(self.slot())
    }

    /// Merge strategy yang dipasang gcc untuk kind ini
    pub const fn default_merge(self) -> MergeKind {
        match self {
            Self::Arcs | Self::Interval | Self::Pow2 | Self::Average => MergeKind::Add,
            Self::TopN | Self::IndirectCall => MergeKind::TopN,
            Self::Ior => MergeKind::Ior,
            Self::TimeProfiler => MergeKind::TimeProfile,
        }
    }
}

/// Strategi merge counter (pengganti pointer merge function di libgcov)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeKind {
    Add,
    Ior,
    TimeProfile,
    TopN,
}

/// Mask slot counter per unit: `Some` = aktif, `None` = absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterKindMask {
    slots: [Option<MergeKind>; COUNTER_SLOTS],
}

impl CounterKindMask {
    /// Mask tanpa slot aktif
    pub const fn empty() -> Self {
        Self {
            slots: [None; COUNTER_SLOTS],
        }
    }

    /// Mask dari array merge mentah, satu entry per slot
    pub const fn from_slots(slots: [Option<MergeKind>; COUNTER_SLOTS]) -> Self {
        Self { slots }
    }

    /// Aktifkan satu kind dengan merge strategy tertentu
    #[must_use]
    pub fn with(mut self, kind: CounterKind, merge: MergeKind) -> Self {
        self.slots[kind.slot()] = Some(merge);
        self
    }

    #[inline(always)]
    pub fn is_active(&self, slot: usize) -> bool {
        self.merge(slot).is_some()
    }

    #[inline(always)]
    pub fn merge(&self, slot: usize) -> Option<MergeKind> {
        self.slots.get(slot).copied().flatten()
    }

    /// Slot aktif, urut naik. Slot absent di-skip.
    #[inline(always)]
    pub fn active_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, merge)| merge.map(|_| slot))
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|m| m.is_some()).count()
    }
}
