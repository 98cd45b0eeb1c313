//! Errors produced by the segmenter.

use std::io;

use thiserror::Error;

/// Errors that can occur while configuring or running a
/// [`Segmenter`](crate::Segmenter).
#[derive(Debug, Error)]
pub enum ChunkerError {
    /// I/O error reading from the underlying byte source.
    #[error("I/O error reading chunker input: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// `ChunkerConfig::new` received an out-of-range `minsegsize_bits`.
    #[error("chunker configuration invalid: {0}")]
    InvalidConfig(String),
    /// Two boundary hits were found within a single block. The geometry of
    /// the algorithm (`window <= minsegsize`) guarantees this cannot
    /// happen; seeing it means an invariant elsewhere has been violated.
    #[error(
        "multiple segment boundaries found within a single {window}-byte block, \
         at offsets {first} and {second} (should be impossible)"
    )]
    MultipleBoundariesInBlock {
        /// Window/block length in bytes.
        window: usize,
        /// In-block offset of the first boundary seen.
        first: usize,
        /// In-block offset of the second boundary seen.
        second: usize,
    },
}
