//! Result dan error types untuk gcda-writer.
//!
//! Encode dan reset sendiri tidak punya error path: struktur unit divalidasi
//! sekali saat build, buffer overflow dilaporkan setelah traversal selesai.

use thiserror::Error;

/// Result type untuk operasi gcda-writer
pub type Result<T> = core::result::Result<T, GcovError>;

/// Errors yang bisa terjadi saat build, encode ke buffer, atau dump ke sink
#[derive(Debug, Error)]
pub enum GcovError {
    /// Jumlah counter group sebuah function tidak sama dengan slot aktif di mask
    #[error("function {function:#x} has {found} counter groups, mask has {expected} active slots")]
    GroupCountMismatch {
        /// Ident function yang bermasalah
        function: u32,
        /// Jumlah slot aktif di mask unit
        expected: usize,
        /// Jumlah group yang diberikan
        found: usize,
    },

    /// Counter group melebihi batas field `num` (u32, length 2 word per nilai)
    #[error("function {function:#x} has a group of {count} counters (max {max})")]
    GroupTooLarge {
        /// Ident function yang bermasalah
        function: u32,
        /// Jumlah counter di group
        count: usize,
        /// Batas jumlah counter per group
        max: usize,
    },

    /// Index slot counter di luar layout gcc
    #[error("counter slot {slot} out of range (max {max})")]
    SlotOutOfRange {
        /// Slot yang diminta
        slot: usize,
        /// Jumlah slot yang didukung
        max: usize,
    },

    /// Buffer tujuan lebih kecil dari hasil encoding
    #[error("destination buffer too small: need {required} bytes, have {capacity}")]
    BufferTooSmall {
        /// Ukuran encoding dalam bytes
        required: usize,
        /// Kapasitas buffer dalam bytes
        capacity: usize,
    },

    /// I/O error dari sink
    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
