//! Serial Hex Dump Sink
//!
//! Untuk target tanpa filesystem: bytes `.gcda` dicetak sebagai teks ke
//! serial console. Format per unit:
//!
//! ```text
//! Emitting 60 bytes for /build/main.gcda
//! 00000000: 6164 6367 3412 0000 6400 0000 c800 0000  adcg4...d.......
//! ...
//! Gcov End
//! ```
//!
//! Baris data kompatibel dengan `xxd -r`, jadi file bisa direkonstruksi di host.

use std::io::Write;

use super::GcdaSink;
use crate::error::Result;

/// Bytes per baris hex dump
pub const BYTES_PER_LINE: usize = 16;

/// Hex dump sink ke writer apa saja (stdout, UART, file log)
pub struct HexDumpSink<W: Write> {
    out: W,
}

impl<W: Write> HexDumpSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> GcdaSink for HexDumpSink<W> {
    fn write_gcda(&mut self, source_name: &str, data: &[u8]) -> Result<()> {
        let len = data.len();
        writeln!(self.out, "Emitting {} bytes for {}", len, source_name)?;
        write_hex_lines(&mut self.out, data)?;
        writeln!(self.out, "Gcov End")?;
        self.out.flush()?;

        tracing::info!("📟 Hex-dumped {} bytes for {}", len, source_name);
        Ok(())
    }
}

/// Tulis baris format `xxd`: offset, grup 2 byte, lalu kolom ASCII
fn write_hex_lines<W: Write>(out: &mut W, data: &[u8]) -> std::io::Result<()> {
    for (line, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        write!(out, "{:08x}:", line * BYTES_PER_LINE)?;

        for i in 0..BYTES_PER_LINE {
            if i % 2 == 0 {
                write!(out, " ")?;
            }
            match chunk.get(i) {
                Some(b) => write!(out, "{:02x}", b)?,
                None => write!(out, "  ")?,
            }
        }

        write!(out, "  ")?;
        for &b in chunk {
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            };
            write!(out, "{}", c)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
