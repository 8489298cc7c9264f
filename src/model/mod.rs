//! Model: coverage tree per translation unit
//!
//! Prinsip desain:
//! - Build once: struktur dibuat sekali, tidak pernah di-resize
//! - Mutable leaves: hanya counter values yang berubah saat runtime
//! - No sync: caller bertanggung jawab atas akses bersamaan

mod counters;
mod reset;
mod unit;

pub use counters::{CounterKind, CounterKindMask, MergeKind, COUNTER_SLOTS};
pub use reset::reset;
pub use unit::{
    source_name, CounterGroup, CoverageUnit, CoverageUnitBuilder, FunctionRecord, MAX_GROUP_VALUES,
};
