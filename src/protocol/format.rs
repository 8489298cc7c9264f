//! gcov `.gcda` Data Format
//!
//! Layout (semua field u32, byte order native mesin produsen):
//! ┌─────────────────────────────────────────────────────┐
//! │ Header:   [MAGIC, version][stamp][checksum]         │
//! ├─────────────────────────────────────────────────────┤
//! │ Function: [TAG_FUNCTION, 3][ident][lineno][cfg]     │
//! │   Counter: [TAG(kind), 2*n][lo, hi] * n             │
//! │   ...satu counter record per slot aktif             │
//! ├─────────────────────────────────────────────────────┤
//! │ ...satu function record per function                │
//! └─────────────────────────────────────────────────────┘
//!
//! Length dalam satuan word (u32). Nilai 64-bit ditulis low word dulu.

/// Magic file data: "gcda"
pub const GCOV_DATA_MAGIC: u32 = 0x6763_6461;
pub const GCOV_TAG_FUNCTION: u32 = 0x0100_0000;
/// ident + lineno_checksum + cfg_checksum
pub const GCOV_TAG_FUNCTION_LENGTH: u32 = 3;
pub const GCOV_TAG_COUNTER_BASE: u32 = 0x01a1_0000;

/// Ukuran satu word dalam bytes
pub const WORD_SIZE: usize = core::mem::size_of::<u32>();

/// Tag record counter untuk slot tertentu
#[inline(always)]
pub const fn tag_for_counter(slot: usize) -> u32 {
    GCOV_TAG_COUNTER_BASE + ((slot as u32) << 17)
}

/// Length record counter untuk `count` nilai 64-bit
///
/// `count` dibatasi [`MAX_GROUP_VALUES`](crate::model::MAX_GROUP_VALUES)
/// saat build, jadi hasilnya selalu muat di u32.
#[inline(always)]
pub const fn counter_length(count: u32) -> u32 {
    count * 2
}
