//! Sink Layer: transport hasil encode
//!
//! Encoder hanya menghasilkan bytes. Sink yang memutuskan ke mana bytes itu
//! pergi: file `.gcda`, hex dump serial, atau memory.
//!
//! Fitur:
//! - Mmap-backed file writer dengan prefix/strip ala libgcov
//! - Hex dump yang bisa dibalik dengan `xxd -r`
//! - Optional reset counter setelah dump

mod gcda_file;
mod hexdump;

pub use gcda_file::{FileSink, GcdaFile};
pub use hexdump::{HexDumpSink, BYTES_PER_LINE};

use crate::config::DumpConfig;
use crate::error::Result;
use crate::model::{reset, CoverageUnit};
use crate::protocol::GcdaEncoder;

/// Byte sink untuk data `.gcda` satu unit
pub trait GcdaSink {
    fn write_gcda(&mut self, source_name: &str, data: &[u8]) -> Result<()>;
}

impl<S: GcdaSink + ?Sized> GcdaSink for &mut S {
    fn write_gcda(&mut self, source_name: &str, data: &[u8]) -> Result<()> {
        (**self).write_gcda(source_name, data)
    }
}

/// Simpan hasil encode di memory, urut sesuai dump
#[derive(Debug, Default)]
pub struct MemorySink {
    dumps: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dumps(&self) -> &[(String, Vec<u8>)] {
        &self.dumps
    }

    /// Data dump terakhir untuk nama source tertentu
    pub fn get(&self, source_name: &str) -> Option<&[u8]> {
        self.dumps
            .iter()
            .rev()
            .find(|(name, _)| name == source_name)
            .map(|(_, data)| data.as_slice())
    }
}

impl GcdaSink for MemorySink {
    fn write_gcda(&mut self, source_name: &str, data: &[u8]) -> Result<()> {
        self.dumps.push((source_name.to_string(), data.to_vec()));
        Ok(())
    }
}

/// Encode unit, kirim ke sink, lalu optional reset counter
///
/// Returns jumlah bytes yang dikirim. Counter hanya di-reset kalau sink
/// sukses, supaya data tidak hilang saat transport gagal.
pub fn dump<S: GcdaSink + ?Sized>(
    unit: &mut CoverageUnit,
    sink: &mut S,
    config: &DumpConfig,
) -> Result<usize> {
    let mut encoder = GcdaEncoder::for_unit(unit);
    encoder.encode(unit)?;

    sink.write_gcda(unit.source_name(), encoder.as_bytes())?;

    if config.reset_after_dump {
        reset(unit);
    }

    tracing::info!(
        "📤 Dumped {} ({} bytes, reset={})",
        unit.source_name(),
        encoder.len(),
        config.reset_after_dump
    );

    Ok(encoder.len())
}
