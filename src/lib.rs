//! gcda-writer - Zero-Allocation gcov Encoder
//!
//! Konversi counter coverage gcc (metadata per translation unit + array
//! counter 64-bit) ke format `.gcda`, byte-identik dengan output libgcov,
//! tanpa filesystem. Cocok untuk target embedded: hasil encode cukup
//! di-copy ke serial, flash, atau memory dump.
//!
//! Arsitektur:
//! - `model`: coverage tree + reset counter (no_std + alloc)
//! - `protocol`: encoder `.gcda` ke buffer caller (no_std + alloc)
//! - `sink`, `config`: transport hasil encode (feature `std`)
//!
//! ```
//! use gcda_writer::model::{CounterGroup, CounterKind, CoverageUnit, FunctionRecord};
//!
//! let mut unit = CoverageUnit::builder("main.gcda")
//!     .version(0x4231_342a)
//!     .stamp(1)
//!     .checksum(2)
//!     .counter_kind(CounterKind::Arcs)
//!     .function(FunctionRecord::new(1, 0, 0, vec![CounterGroup::zeroed(3)]))
//!     .build()?;
//!
//! unit.functions_mut()[0].groups_mut()[0].hit(2);
//!
//! let size = gcda_writer::encode(&unit, None)?;
//! let mut buf = vec![0u32; size / 4];
//! assert_eq!(gcda_writer::encode(&unit, Some(&mut buf[..]))?, size);
//!
//! gcda_writer::reset(&mut unit);
//! # Ok::<(), gcda_writer::GcovError>(())
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

pub mod error;
pub mod model;
pub mod protocol;

#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
pub mod sink;

pub use error::{GcovError, Result};
pub use model::{reset, source_name, CoverageUnit};
pub use protocol::{encode, encode_with, encoded_len, NoWatchdog, Watchdog};
