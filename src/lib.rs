//! Content-defined stream segmenter.
//!
//! Splits an arbitrary byte stream into non-overlapping segments whose
//! boundaries are decided by a Fletcher-sum rolling checksum over a sliding
//! window, rather than by fixed offsets. A localized edit to the input
//! perturbs at most one or two emitted segments: everything before the edit
//! stays bit-identical, and the segmentation re-synchronizes a bounded
//! distance after it. See `SPEC_FULL.md` for the full design.
//!
//! ```
//! use std::io::Cursor;
//! use fletchseg::{ChunkerConfig, Segmenter};
//!
//! let config = ChunkerConfig::for_bits(8);
//! let mut segmenter = Segmenter::with_config(Cursor::new(b"hello world".to_vec()), config)
//!     .expect("cold-start read failed");
//!
//! let mut segments = Vec::new();
//! while let Some(segment) = segmenter.read_segment().expect("read failed") {
//!     segments.push(segment.into_bytes());
//! }
//! assert_eq!(segments, vec![b"hello world".to_vec()]);
//! ```

pub mod config;
pub mod error;
pub mod rolling;
pub mod segmenter;

pub use config::ChunkerConfig;
pub use error::ChunkerError;
pub use rolling::RollingWindow;
pub use segmenter::{Segment, Segmenter};
