//! # Granular Serde
//! Bit-level writers and readers used to frame replicated transform snapshots.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bit_counter;
mod bit_reader;
mod bit_write;
mod error;
mod number;
mod serde;
mod stream_writer;

pub use bit_counter::BitCounter;
pub use bit_reader::BitReader;
pub use bit_write::BitWrite;
pub use error::SerdeErr;
pub use serde::{ConstBitLength, Serde};
pub use stream_writer::StreamWriter;
