//! Coverage tree per translation unit
//!
//! ```text
//! CoverageUnit ── header (version, stamp, checksum) + mask
//!   └── FunctionRecord[]          urutan = urutan encoding
//!         └── CounterGroup[]      satu per slot aktif di mask, urut naik
//!               └── u64[]         satu-satunya bagian yang mutable
//! ```
//!
//! Tree dibangun sekali lewat [`CoverageUnitBuilder`], setelah itu hanya
//! counter values yang berubah. Semua field struktural private dan array
//! disimpan sebagai boxed slice, jadi jumlah group dan panjang values tidak
//! bisa berubah setelah build.
//!
//! Tidak ada sinkronisasi internal. Caller yang meng-increment counter dari
//! interrupt atau thread lain wajib memastikan encode/reset tidak jalan
//! bersamaan (torn read 64-bit counter mungkin terjadi).

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use super::counters::{CounterKind, CounterKindMask, MergeKind, COUNTER_SLOTS};
use crate::error::{GcovError, Result};

/// Batas counter per group: length record (2 word per nilai) harus muat di u32
pub const MAX_GROUP_VALUES: usize = (u32::MAX / 2) as usize;

/// Counter values untuk satu function dan satu counter kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterGroup {
    values: Box<[u64]>,
}

impl CounterGroup {
    /// Group dengan `count` counter bernilai nol
    pub fn zeroed(count: usize) -> Self {
        Self {
            values: alloc::vec![0u64; count].into_boxed_slice(),
        }
    }

    pub fn from_values(values: Vec<u64>) -> Self {
        Self {
            values: values.into_boxed_slice(),
        }
    }

    /// Jumlah counter value (field `num` di format gcov)
    ///
    /// Tidak terpotong untuk group di dalam unit yang lolos build.
    #[inline(always)]
    pub fn count(&self) -> u32 {
        self.values.len() as u32
    }

    #[inline(always)]
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Akses mutable ke values. Panjang slice tetap.
    #[inline(always)]
    pub fn values_mut(&mut self) -> &mut [u64] {
        &mut self.values
    }

    /// Increment satu counter, seperti kode instrumentasi
    #[inline(always)]
    pub fn hit(&mut self, index: usize) {
        if let Some(v) = self.values.get_mut(index) {
            *v = v.wrapping_add(1);
        }
    }
}

/// Metadata profiling per function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    ident: u32,
    lineno_checksum: u32,
    cfg_checksum: u32,
    groups: Box<[CounterGroup]>,
}

impl FunctionRecord {
    pub fn new(
        ident: u32,
        lineno_checksum: u32,
        cfg_checksum: u32,
        groups: Vec<CounterGroup>,
    ) -> Self {
        Self {
            ident,
            lineno_checksum,
            cfg_checksum,
            groups: groups.into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn ident(&self) -> u32 {
        self.ident
    }

    #[inline(always)]
    pub fn lineno_checksum(&self) -> u32 {
        self.lineno_checksum
    }

    #[inline(always)]
    pub fn cfg_checksum(&self) -> u32 {
        self.cfg_checksum
    }

    /// Counter groups, satu per slot aktif di mask unit
    #[inline(always)]
    pub fn groups(&self) -> &[CounterGroup] {
        &self.groups
    }

    #[inline(always)]
    pub fn groups_mut(&mut self) -> &mut [CounterGroup] {
        &mut self.groups
    }
}

/// Data profiling per object file (satu translation unit)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageUnit {
    version: u32,
    stamp: u32,
    checksum: u32,
    filename: String,
    mask: CounterKindMask,
    functions: Box<[FunctionRecord]>,
}

impl CoverageUnit {
    pub fn builder(filename: impl Into<String>) -> CoverageUnitBuilder {
        CoverageUnitBuilder::new(filename)
    }

    /// Version magic dari compiler, di-echo ke header
    #[inline(always)]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline(always)]
    pub fn stamp(&self) -> u32 {
        self.stamp
    }

    #[inline(always)]
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Nama file `.gcda` tujuan. Tidak ikut di-encode.
    #[inline(always)]
    pub fn source_name(&self) -> &str {
        &self.filename
    }

    #[inline(always)]
    pub fn mask(&self) -> &CounterKindMask {
        &self.mask
    }

    #[inline(always)]
    pub fn functions(&self) -> &[FunctionRecord] {
        &self.functions
    }

    #[inline(always)]
    pub fn functions_mut(&mut self) -> &mut [FunctionRecord] {
        &mut self.functions
    }

    /// Total counter value di seluruh unit
    pub fn counter_count(&self) -> usize {
        self.functions
            .iter()
            .flat_map(|f| f.groups.iter())
            .map(|g| g.values.len())
            .sum()
    }
}

/// Accessor nama source untuk logging/diagnostics
#[inline(always)]
pub fn source_name(unit: &CoverageUnit) -> &str {
    unit.source_name()
}

/// Builder untuk [`CoverageUnit`]
///
/// Pengganti tabel yang di-generate compiler. Struktur divalidasi sekali di
/// [`build`](Self::build); encode dan reset tidak mengecek ulang.
#[derive(Debug, Clone)]
pub struct CoverageUnitBuilder {
    version: u32,
    stamp: u32,
    checksum: u32,
    filename: String,
    slots: Vec<(usize, MergeKind)>,
    functions: Vec<FunctionRecord>,
}

impl CoverageUnitBuilder {
    fn new(filename: impl Into<String>) -> Self {
        Self {
            version: 0,
            stamp: 0,
            checksum: 0,
            filename: filename.into(),
            slots: Vec::new(),
            functions: Vec::new(),
        }
    }

    #[must_use]
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn stamp(mut self, stamp: u32) -> Self {
        self.stamp = stamp;
        self
    }

    #[must_use]
    pub fn checksum(mut self, checksum: u32) -> Self {
        self.checksum = checksum;
        self
    }

    /// Aktifkan counter kind dengan merge default-nya
    #[must_use]
    pub fn counter_kind(self, kind: CounterKind) -> Self {
        self.counter_slot(kind.slot(), kind.default_merge())
    }

    /// Aktifkan slot mentah (index dari tabel merge compiler)
    #[must_use]
    pub fn counter_slot(mut self, slot: usize, merge: MergeKind) -> Self {
        self.slots.push((slot, merge));
        self
    }

    /// Tambah function. Urutan pemanggilan = urutan encoding.
    #[must_use]
    pub fn function(mut self, function: FunctionRecord) -> Self {
        self.functions.push(function);
        self
    }

    #[must_use]
    pub fn functions(mut self, functions: impl IntoIterator<Item = FunctionRecord>) -> Self {
        self.functions.extend(functions);
        self
    }

    pub fn build(self) -> Result<CoverageUnit> {
        let mut mask = CounterKindMask::empty();
        for (slot, merge) in self.slots {
            let kind = CounterKind::from_slot(slot).ok_or(GcovError::SlotOutOfRange {
                slot,
                max: COUNTER_SLOTS,
            })?;
            mask = mask.with(kind, merge);
        }

        let expected = mask.active_count();
        for function in &self.functions {
            if function.groups.len() != expected {
                return Err(GcovError::GroupCountMismatch {
                    function: function.ident,
                    expected,
                    found: function.groups.len(),
                });
            }
            for group in function.groups.iter() {
                check_group_len(function.ident, group.values.len())?;
            }
        }

        Ok(CoverageUnit {
            version: self.version,
            stamp: self.stamp,
            checksum: self.checksum,
            filename: self.filename,
            mask,
            functions: self.functions.into_boxed_slice(),
        })
    }
}

fn check_group_len(function: u32, count: usize) -> Result<()> {
    if count > MAX_GROUP_VALUES {
        return Err(GcovError::GroupTooLarge {
            function,
            count,
            max: MAX_GROUP_VALUES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arcs_unit() -> CoverageUnit {
        CoverageUnit::builder("/tmp/build/main.gcda")
            .version(0x1234)
            .stamp(100)
            .checksum(200)
            .counter_kind(CounterKind::Arcs)
            .function(FunctionRecord::new(
                7,
                0,
                0,
                vec![CounterGroup::from_values(vec![5, 300_000_000_000])],
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_and_accessors() {
        let unit = arcs_unit();
        assert_eq!(unit.version(), 0x1234);
        assert_eq!(unit.stamp(), 100);
        assert_eq!(unit.checksum(), 200);
        assert_eq!(source_name(&unit), "/tmp/build/main.gcda");
        assert_eq!(unit.functions().len(), 1);
        assert_eq!(unit.functions()[0].groups()[0].count(), 2);
        assert_eq!(unit.counter_count(), 2);
    }

    #[test]
    fn test_group_count_mismatch_rejected() {
        let err = CoverageUnit::builder("bad.gcda")
            .counter_kind(CounterKind::Arcs)
            .counter_kind(CounterKind::TimeProfiler)
            .function(FunctionRecord::new(3, 1, 2, vec![CounterGroup::zeroed(4)]))
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            GcovError::GroupCountMismatch {
                function: 3,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_slot_out_of_range_rejected() {
        let err = CoverageUnit::builder("bad.gcda")
            .counter_slot(COUNTER_SLOTS, MergeKind::Add)
            .build()
            .unwrap_err();
        assert!(matches!(err, GcovError::SlotOutOfRange { slot: 8, .. }));
    }

    #[test]
    fn test_group_len_limit() {
        assert!(check_group_len(1, MAX_GROUP_VALUES).is_ok());

        let err = check_group_len(9, MAX_GROUP_VALUES + 1).unwrap_err();
        assert!(matches!(err, GcovError::GroupTooLarge { function: 9, .. }));
    }

    #[test]
    fn test_hit_increments_and_ignores_out_of_range() {
        let mut group = CounterGroup::zeroed(2);
        group.hit(1);
        group.hit(1);
        group.hit(5);
        assert_eq!(group.values(), &[0, 2]);
    }
}
