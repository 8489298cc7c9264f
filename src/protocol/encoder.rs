//! Zero-Allocation gcda Encoder
//!
//! Walk coverage tree dan tulis word langsung ke buffer caller.
//! Tanpa buffer, jalur yang sama hanya menghitung ukuran, jadi
//! size-only dan size-and-fill selalu menghasilkan angka yang sama.

use alloc::boxed::Box;

use super::format::{
    counter_length, tag_for_counter, GCOV_DATA_MAGIC, GCOV_TAG_FUNCTION, GCOV_TAG_FUNCTION_LENGTH,
    WORD_SIZE,
};
use crate::error::{GcovError, Result};
use crate::model::CoverageUnit;

/// Hook periodik yang dipanggil sekali per function saat encode
///
/// Untuk target embedded yang perlu kick watchdog timer selama walk tree
/// yang panjang. Tidak boleh mempengaruhi output.
pub trait Watchdog {
    fn kick(&mut self);
}

impl<F: FnMut()> Watchdog for F {
    #[inline(always)]
    fn kick(&mut self) {
        self()
    }
}

/// Watchdog no-op (default di luar embedded)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWatchdog;

impl Watchdog for NoWatchdog {
    #[inline(always)]
    fn kick(&mut self) {}
}

/// Tujuan tulis encoder
enum Target<'b> {
    /// Size-only, tidak ada yang ditulis
    Discard,
    /// Buffer u32-aligned
    Words(&'b mut [u32]),
    /// Buffer byte tanpa syarat alignment
    Bytes(&'b mut [u8]),
}

impl Target<'_> {
    fn capacity(&self) -> usize {
        match self {
            Target::Discard => 0,
            Target::Words(buf) => buf.len() * WORD_SIZE,
            Target::Bytes(buf) => buf.len(),
        }
    }
}

/// Primitive penulis word. Offset dan return dalam satuan word.
struct GcdaWriter<'b> {
    target: Target<'b>,
    overflow: bool,
}

impl<'b> GcdaWriter<'b> {
    fn new(target: Target<'b>) -> Self {
        Self {
            target,
            overflow: false,
        }
    }

    #[inline(always)]
    fn store_words<const N: usize>(&mut self, off: usize, words: [u32; N]) -> usize {
        match &mut self.target {
            Target::Discard => {}
            Target::Words(buf) => match buf.get_mut(off..off + N) {
                Some(dst) => dst.copy_from_slice(&words),
                None => self.overflow = true,
            },
            Target::Bytes(buf) => match buf.get_mut(off * WORD_SIZE..(off + N) * WORD_SIZE) {
                Some(dst) => {
                    for (chunk, word) in dst.chunks_exact_mut(WORD_SIZE).zip(words) {
                        chunk.copy_from_slice(&word.to_ne_bytes());
                    }
                }
                None => self.overflow = true,
            },
        }
        N
    }

    /// 1 word
    #[inline(always)]
    fn store_unsigned(&mut self, off: usize, v: u32) -> usize {
        self.store_words(off, [v])
    }

    /// 2 word: tag lalu length
    #[inline(always)]
    fn store_tag_length(&mut self, off: usize, tag: u32, length: u32) -> usize {
        self.store_words(off, [tag, length])
    }

    /// 2 word: nilai 64-bit, low word dulu
    #[inline(always)]
    fn store_counter(&mut self, off: usize, v: u64) -> usize {
        self.store_words(off, [(v & 0xffff_ffff) as u32, (v >> 32) as u32])
    }
}

/// Walk tree, return jumlah bytes
fn convert<W: Watchdog + ?Sized>(
    unit: &CoverageUnit,
    writer: &mut GcdaWriter<'_>,
    watchdog: &mut W,
) -> usize {
    let mut pos = 0usize;

    // File header
    pos += writer.store_tag_length(pos, GCOV_DATA_MAGIC, unit.version());
    pos += writer.store_unsigned(pos, unit.stamp());
    pos += writer.store_unsigned(pos, unit.checksum());

    let mask = unit.mask();

    for function in unit.functions() {
        watchdog.kick();

        // Function record
        pos += writer.store_tag_length(pos, GCOV_TAG_FUNCTION, GCOV_TAG_FUNCTION_LENGTH);
        pos += writer.store_unsigned(pos, function.ident());
        pos += writer.store_unsigned(pos, function.lineno_checksum());
        pos += writer.store_unsigned(pos, function.cfg_checksum());

        // Counter records, slot absent tidak punya group
        for (slot, group) in mask.active_slots().zip(function.groups()) {
            let length = counter_length(group.count());
            pos += writer.store_tag_length(pos, tag_for_counter(slot), length);

            for &value in group.values() {
                pos += writer.store_counter(pos, value);
            }
        }
    }

    pos * WORD_SIZE
}

fn run<W: Watchdog + ?Sized>(
    unit: &CoverageUnit,
    target: Target<'_>,
    watchdog: &mut W,
) -> Result<usize> {
    let capacity = target.capacity();
    let mut writer = GcdaWriter::new(target);
    let bytes = convert(unit, &mut writer, watchdog);

    tracing::trace!(
        "📦 Encoded {} ({} functions, {} bytes)",
        unit.source_name(),
        unit.functions().len(),
        bytes
    );

    if writer.overflow {
        return Err(GcovError::BufferTooSmall {
            required: bytes,
            capacity,
        });
    }

    Ok(bytes)
}

/// Encode unit ke format gcda
///
/// `None` = hanya hitung ukuran. Dengan buffer, word ditulis dalam byte
/// order native. Return jumlah bytes, identik di kedua jalur.
///
/// Caller wajib memastikan tidak ada increment counter bersamaan.
#[inline]
pub fn encode(unit: &CoverageUnit, buffer: Option<&mut [u32]>) -> Result<usize> {
    encode_with(unit, buffer, &mut NoWatchdog)
}

/// [`encode`] dengan watchdog yang di-kick sekali per function
pub fn encode_with<W: Watchdog + ?Sized>(
    unit: &CoverageUnit,
    buffer: Option<&mut [u32]>,
    watchdog: &mut W,
) -> Result<usize> {
    let target = match buffer {
        Some(buf) => Target::Words(buf),
        None => Target::Discard,
    };
    run(unit, target, watchdog)
}

/// Encode ke buffer byte (tanpa syarat alignment), misal region mmap
#[inline]
pub fn encode_bytes(unit: &CoverageUnit, buffer: Option<&mut [u8]>) -> Result<usize> {
    encode_bytes_with(unit, buffer, &mut NoWatchdog)
}

/// [`encode_bytes`] dengan watchdog yang di-kick sekali per function
pub fn encode_bytes_with<W: Watchdog + ?Sized>(
    unit: &CoverageUnit,
    buffer: Option<&mut [u8]>,
    watchdog: &mut W,
) -> Result<usize> {
    let target = match buffer {
        Some(buf) => Target::Bytes(buf),
        None => Target::Discard,
    };
    run(unit, target, watchdog)
}

/// Ukuran encoding dalam bytes
#[inline]
pub fn encoded_len(unit: &CoverageUnit) -> usize {
    convert(unit, &mut GcdaWriter::new(Target::Discard), &mut NoWatchdog)
}

/// Pre-allocated encoder buffer
///
/// Alokasi hanya sekali saat dibuat; encode berikutnya menulis ulang
/// buffer yang sama.
#[derive(Debug)]
pub struct GcdaEncoder {
    buffer: Box<[u32]>,
    len_words: usize,
}

impl GcdaEncoder {
    /// Buffer dengan kapasitas minimal `bytes` (dibulatkan ke word)
    pub fn with_capacity(bytes: usize) -> Self {
        let words = bytes.div_ceil(WORD_SIZE);
        Self {
            buffer: alloc::vec![0u32; words].into_boxed_slice(),
            len_words: 0,
        }
    }

    /// Buffer pas untuk ukuran unit saat ini
    pub fn for_unit(unit: &CoverageUnit) -> Self {
        Self::with_capacity(encoded_len(unit))
    }

    /// Encode unit ke buffer internal
    ///
    /// Returns slice ke encoded words, atau `BufferTooSmall` kalau kapasitas kurang.
    pub fn encode(&mut self, unit: &CoverageUnit) -> Result<&[u32]> {
        self.encode_with(unit, &mut NoWatchdog)
    }

    pub fn encode_with<W: Watchdog + ?Sized>(
        &mut self,
        unit: &CoverageUnit,
        watchdog: &mut W,
    ) -> Result<&[u32]> {
        self.len_words = 0;
        let bytes = encode_with(unit, Some(&mut self.buffer[..]), watchdog)?;
        self.len_words = bytes / WORD_SIZE;
        Ok(&self.buffer[..self.len_words])
    }

    /// Reset encoder untuk reuse
    #[inline(always)]
    pub fn clear(&mut self) {
        self.len_words = 0;
    }

    #[inline(always)]
    pub fn as_words(&self) -> &[u32] {
        &self.buffer[..self.len_words]
    }

    /// Encoded data sebagai bytes (ZERO-COPY)
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        let words = self.as_words();
        // SAFETY: u32 tidak punya padding, alignment u8 = 1, dan panjang
        // byte view persis words.len() * 4 di dalam alokasi yang sama.
        unsafe { core::slice::from_raw_parts(words.as_ptr().cast::<u8>(), words.len() * WORD_SIZE) }
    }

    /// Kapasitas dalam bytes
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buffer.len() * WORD_SIZE
    }

    /// Panjang hasil encode terakhir dalam bytes
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len_words * WORD_SIZE
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len_words == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{reset, CounterGroup, CounterKind, FunctionRecord};

    fn sample_unit() -> CoverageUnit {
        CoverageUnit::builder("sample.gcda")
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
    fn test_encode_sample_words() {
        let unit = sample_unit();
        let mut buf = vec![0u32; 32];
        let bytes = encode(&unit, Some(&mut buf[..])).unwrap();

        let expected = [
            GCOV_DATA_MAGIC,
            0x1234,
            100,
            200,
            GCOV_TAG_FUNCTION,
            3,
            7,
            0,
            0,
            0x01a1_0000,
            4,
            5,
            0,
            0xD964_B800,
            0x45,
        ];
        assert_eq!(bytes, expected.len() * 4);
        assert_eq!(&buf[..expected.len()], &expected);
    }

    #[test]
    fn test_size_only_matches_fill() {
        let unit = sample_unit();
        let size = encode(&unit, None).unwrap();
        let mut buf = vec![0u32; size / 4];
        assert_eq!(encode(&unit, Some(&mut buf[..])).unwrap(), size);
        assert_eq!(encoded_len(&unit), size);
    }

    #[test]
    fn test_buffer_too_small_reports_required() {
        let unit = sample_unit();
        let mut buf = vec![0u32; 6];
        let err = encode(&unit, Some(&mut buf[..])).unwrap_err();
        assert!(matches!(
            err,
            GcovError::BufferTooSmall {
                required: 60,
                capacity: 24
            }
        ));
    }

    #[test]
    fn test_encode_bytes_too_small() {
        let unit = sample_unit();
        // Tidak kelipatan word: record terakhir tidak muat
        let mut bytes = vec![0u8; 59];
        let err = encode_bytes(&unit, Some(&mut bytes[..])).unwrap_err();
        assert!(matches!(
            err,
            GcovError::BufferTooSmall {
                required: 60,
                capacity: 59
            }
        ));
        // Record yang muat tetap tertulis
        assert_eq!(&bytes[..4], &GCOV_DATA_MAGIC.to_ne_bytes());
        assert_eq!(&bytes[56..], &[0, 0, 0]);
    }

    #[test]
    fn test_bytes_match_native_words() {
        let unit = sample_unit();
        let mut words = vec![0u32; 15];
        let mut bytes = vec![0u8; 60];
        encode(&unit, Some(&mut words[..])).unwrap();
        assert_eq!(encode_bytes(&unit, Some(&mut bytes[..])).unwrap(), 60);

        let expected: Vec<u8> = words.iter().flat_map(|w| w.to_ne_bytes()).collect();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_watchdog_kicked_once_per_function() {
        let unit = CoverageUnit::builder("wd.gcda")
            .functions((0..5).map(|i| FunctionRecord::new(i, 0, 0, Vec::new())))
            .build()
            .unwrap();

        let mut kicks = 0;
        let mut watchdog = || kicks += 1;
        let with = encode_with(&unit, None, &mut watchdog).unwrap();
        assert_eq!(kicks, 5);
        assert_eq!(with, encode(&unit, None).unwrap());
    }

    #[test]
    fn test_watchdog_does_not_change_output() {
        let unit = sample_unit();
        let mut words = vec![0u32; 15];
        let mut out = vec![0u32; 15];
        let mut raw = vec![0u8; 60];
        let mut kicks = 0;
        let mut kick = || kicks += 1;

        encode(&unit, Some(&mut words[..])).unwrap();
        encode_with(&unit, Some(&mut out[..]), &mut kick).unwrap();
        let written = encode_bytes_with(&unit, Some(&mut raw[..]), &mut kick);
        assert_eq!(written.unwrap(), 60);

        assert_eq!(words, out);
        let expected: Vec<u8> = words.iter().flat_map(|w| w.to_ne_bytes()).collect();
        assert_eq!(raw, expected);
        assert_eq!(kicks, 2);
    }

    #[test]
    fn test_absent_slots_emit_nothing() {
        let unit = CoverageUnit::builder("sparse.gcda")
            .counter_kind(CounterKind::Interval)
            .counter_kind(CounterKind::TimeProfiler)
            .function(FunctionRecord::new(
                1,
                2,
                3,
                vec![
                    CounterGroup::from_values(vec![1]),
                    CounterGroup::from_values(vec![2]),
                ],
            ))
            .build()
            .unwrap();

        let mut encoder = GcdaEncoder::for_unit(&unit);
        let words = encoder.encode(&unit).unwrap();
        // header 4 + function 5 + 2 * (tag/len 2 + value 2)
        assert_eq!(words.len(), 17);
        assert_eq!(words[9], CounterKind::Interval.tag());
        assert_eq!(words[13], CounterKind::TimeProfiler.tag());
    }

    #[test]
    fn test_encoder_reuse_after_reset() {
        let mut unit = sample_unit();
        let mut encoder = GcdaEncoder::for_unit(&unit);
        assert_eq!(encoder.capacity(), 60);

        let first = encoder.encode(&unit).unwrap().to_vec();
        reset(&mut unit);
        let second = encoder.encode(&unit).unwrap().to_vec();

        assert_eq!(first[..11], second[..11]);
        assert_eq!(&second[11..], &[0, 0, 0, 0]);
        assert_eq!(encoder.as_bytes().len(), 60);

        encoder.clear();
        assert!(encoder.is_empty());
    }
}
