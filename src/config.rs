//! Dump configuration
//!
//! Path resolution mengikuti konvensi libgcov:
//! - `GCOV_PREFIX`: direktori root pengganti untuk file `.gcda`
//! - `GCOV_PREFIX_STRIP`: jumlah komponen direktori depan yang dibuang
//!   dari nama source sebelum digabung dengan prefix

use std::path::{Component, Path, PathBuf};

pub const ENV_PREFIX: &str = "GCOV_PREFIX";
pub const ENV_PREFIX_STRIP: &str = "GCOV_PREFIX_STRIP";

/// Tujuan output hasil encode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Tulis file `.gcda` (mmap-backed)
    File,
    /// Hex dump teks, seperti output serial di target embedded
    HexDump,
    /// Simpan bytes di memory saja
    Memory,
}

impl OutputMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "file" => Some(Self::File),
            "hex" | "hexdump" => Some(Self::HexDump),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Dump configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    pub output: OutputMode,
    pub prefix: Option<PathBuf>,
    pub prefix_strip: usize,
    /// Nol-kan counter setelah dump berhasil
    pub reset_after_dump: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            output: OutputMode::File,
            prefix: None,
            prefix_strip: 0,
            reset_after_dump: false,
        }
    }
}

impl DumpConfig {
    /// Default + `GCOV_PREFIX` / `GCOV_PREFIX_STRIP` dari environment
    pub fn from_env() -> Self {
        Self::default().with_env_vars(
            std::env::var(ENV_PREFIX).ok(),
            std::env::var(ENV_PREFIX_STRIP).ok(),
        )
    }

    fn with_env_vars(mut self, prefix: Option<String>, strip: Option<String>) -> Self {
        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            self.prefix = Some(PathBuf::from(prefix));
        }
        if let Some(strip) = strip {
            match strip.trim().parse() {
                Ok(n) => self.prefix_strip = n,
                Err(_) => tracing::warn!("⚠️  Ignoring invalid {}={:?}", ENV_PREFIX_STRIP, strip),
            }
        }
        self
    }

    /// Path file output untuk nama source tertentu
    ///
    /// Tanpa prefix, nama source dipakai apa adanya (strip diabaikan,
    /// sama seperti libgcov).
    pub fn output_path(&self, source_name: &str) -> PathBuf {
        let source = Path::new(source_name);
        let Some(prefix) = &self.prefix else {
            return source.to_path_buf();
        };

        let mut dirs_left = self.prefix_strip;
        let mut rest = PathBuf::new();
        let mut components = source.components().peekable();

        while let Some(component) = components.next() {
            match component {
                Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
                Component::Normal(_) | Component::ParentDir
                    if dirs_left > 0 && components.peek().is_some() =>
                {
                    dirs_left -= 1;
                }
                other => rest.push(other),
            }
        }

        if dirs_left > 0 {
            tracing::warn!(
                "⚠️  {}={} exceeds directory depth of {}",
                ENV_PREFIX_STRIP,
                self.prefix_strip,
                source_name
            );
        }

        prefix.join(rest)
    }
}
