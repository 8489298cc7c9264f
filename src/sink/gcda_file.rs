//! Memory-Mapped `.gcda` File Writer
//!
//! File di-size dulu sesuai hasil encode, lalu di-mmap dan encoder menulis
//! langsung ke region mmap (tanpa buffer perantara).

use memmap2::{MmapMut, MmapOptions};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use super::GcdaSink;
use crate::config::DumpConfig;
use crate::error::Result;
use crate::model::CoverageUnit;
use crate::protocol::{encode_bytes_with, encoded_len, NoWatchdog, Watchdog};

/// Mmap-backed file `.gcda` dengan ukuran tetap
pub struct GcdaFile {
    mmap: MmapMut,
    path: PathBuf,
}

impl GcdaFile {
    /// Membuat (atau truncate) file dengan panjang tepat `len` bytes
    pub fn create<P: AsRef<Path>>(path: P, len: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        file.set_len(len as u64)?;

        // SAFETY: File baru saja dibuka read/write dan di-truncate oleh kita;
        // tidak ada mapping lain ke file ini selama GcdaFile hidup.
        let mmap = unsafe { MmapOptions::new().len(len).map_mut(&file)? };

        Ok(Self { mmap, path })
    }

    /// Encode unit langsung ke file baru
    pub fn write_unit<P: AsRef<Path>>(path: P, unit: &CoverageUnit) -> Result<usize> {
        Self::write_unit_with(path, unit, &mut NoWatchdog)
    }

    /// [`write_unit`](Self::write_unit) dengan watchdog selama walk
    pub fn write_unit_with<P, W>(path: P, unit: &CoverageUnit, watchdog: &mut W) -> Result<usize>
    where
        P: AsRef<Path>,
        W: Watchdog + ?Sized,
    {
        let len = encoded_len(unit);
        let mut file = Self::create(path, len)?;
        let written = encode_bytes_with(unit, Some(file.as_mut_bytes()), watchdog)?;
        file.flush()?;
        Ok(written)
    }

    /// Region mmap untuk ditulisi
    #[inline(always)]
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.mmap[..]
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    /// Sync mmap ke disk
    pub fn flush(&self) -> Result<()> {
        self.mmap.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sink yang menulis satu file `.gcda` per unit
///
/// Path file = [`DumpConfig::output_path`] dari nama source unit.
#[derive(Debug, Clone)]
pub struct FileSink {
    config: DumpConfig,
}

impl FileSink {
    pub fn new(config: DumpConfig) -> Self {
        Self { config }
    }
}

impl GcdaSink for FileSink {
    fn write_gcda(&mut self, source_name: &str, data: &[u8]) -> Result<()> {
        let path = self.config.output_path(source_name);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = GcdaFile::create(&path, data.len())?;
        file.as_mut_bytes().copy_from_slice(data);
        file.flush()?;

        tracing::info!("💾 Wrote {} bytes to {}", data.len(), file.path().display());
        Ok(())
    }
}
