//! Protocol Layer: gcov `.gcda` Binary Encoding
//!
//! Prinsip desain:
//! - Flat Binary: hanya word u32 native, tanpa konversi endianness
//! - Dual path: size-only dan fill memakai walk yang sama
//! - No allocation: encode langsung ke buffer caller

mod encoder;
mod format;

pub use encoder::{
    encode, encode_bytes, encode_bytes_with, encode_with, encoded_len, GcdaEncoder, NoWatchdog,
    Watchdog,
};
pub use format::{
    counter_length, tag_for_counter, GCOV_DATA_MAGIC, GCOV_TAG_COUNTER_BASE, GCOV_TAG_FUNCTION,
    GCOV_TAG_FUNCTION_LENGTH, WORD_SIZE,
};
