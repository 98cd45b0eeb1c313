//! The segmenter state machine: reads fixed-size blocks from a byte source,
//! drives the [`RollingWindow`] one byte at a time, and assembles segments
//! across the block-split protocol described in spec section 4.3.

use std::io::{self, Read};
use std::mem;

use crate::config::ChunkerConfig;
use crate::error::ChunkerError;
use crate::rolling::RollingWindow;

/// A single emitted, non-overlapping segment of the input stream.
///
/// Ownership of the bytes transfers to the caller; the segmenter keeps no
/// reference to a segment once it has been returned from
/// [`Segmenter::read_segment`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Segment(Vec<u8>);

impl Segment {
    /// Borrows the segment's bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the segment, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Number of bytes in the segment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Segments are never empty (spec invariant: every emitted segment is
    /// non-empty), but this is provided for API symmetry with `Vec`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reads up to `buf.len()` bytes, looping over short individual `read`
/// calls until the buffer is full or the source signals end-of-stream.
///
/// A single `Read::read` call is permitted to return fewer bytes than
/// requested without that meaning EOF; only a `0`-byte read means EOF. This
/// mirrors `std::io::Read::read_to_end`'s own tolerance of short reads,
/// retried transparently except where the source reports
/// `ErrorKind::Interrupted`, which is retried rather than surfaced.
fn fill_block<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Streaming content-defined chunker.
///
/// `Segmenter<R>` owns the byte source `R` for its entire lifetime;
/// dropping the segmenter drops `R`, which is the Rust equivalent of the
/// original's explicit `close` (see `DESIGN.md` for the Open Question
/// resolution). There is no separate `close` method.
pub struct Segmenter<R> {
    input: R,
    eof: bool,
    cur_block: Vec<u8>,
    prev_block: Vec<u8>,
    rolling: RollingWindow,
    bytes_into_seg: u64,
    last_hit_at: u64,
    cur_out: Vec<u8>,
    config: ChunkerConfig,
}

impl<R: Read> Segmenter<R> {
    /// Opens a segmenter over `input` using the default configuration
    /// (`MINSEGSIZE_BITS = 20`: 1 MiB minimum, ~4 MiB mean segment size).
    pub fn new(input: R) -> Result<Self, ChunkerError> {
        Self::with_config(input, ChunkerConfig::default())
    }

    /// Opens a segmenter over `input` using an explicit [`ChunkerConfig`].
    ///
    /// Performs the cold-start read of the first window's worth of bytes
    /// (spec section 4.4): if a full window is available, the rolling sums
    /// are computed from scratch and a hit exactly at the end of the
    /// window seeds `last_hit_at`, without itself counting as a boundary
    /// (the minimum-distance rule cannot fire yet). If the source is
    /// shorter than one window, end-of-stream is recorded immediately.
    pub fn with_config(mut input: R, config: ChunkerConfig) -> Result<Self, ChunkerError> {
        let window = config.window();
        let mut rolling = RollingWindow::new(&config);

        let mut prev_block = vec![0u8; window];
        let got = fill_block(&mut input, &mut prev_block)?;

        let mut cur_out = Vec::with_capacity(output_buffer_capacity(&config));
        cur_out.extend_from_slice(&prev_block[..got]);

        let (eof, last_hit_at) = if got == window {
            rolling.fill_from_scratch(&prev_block);
            let last_hit_at = if rolling.is_hit() { window as u64 } else { 0 };
            (false, last_hit_at)
        } else {
            (true, 0)
        };

        tracing::debug!(
            window,
            minsegsize = config.minsegsize(),
            prime = config.prime(),
            "segmenter initialized"
        );

        Ok(Self {
            input,
            eof,
            cur_block: vec![0u8; window],
            prev_block,
            rolling,
            bytes_into_seg: got as u64,
            last_hit_at,
            cur_out,
            config,
        })
    }

    /// Returns the next segment, or `Ok(None)` at end-of-stream.
    ///
    /// Once `Ok(None)` has been returned, every subsequent call also
    /// returns `Ok(None)`.
    pub fn read_segment(&mut self) -> Result<Option<Segment>, ChunkerError> {
        if self.eof {
            return Ok(self.take_pending_segment());
        }

        loop {
            let window = self.config.window();
            let got = fill_block(&mut self.input, &mut self.cur_block[..window])?;

            if got < window {
                self.eof = true;
                self.cur_out.extend_from_slice(&self.cur_block[..got]);
                tracing::trace!(
                    len = self.cur_out.len(),
                    eof = true,
                    "segment emitted (stream end)"
                );
                return Ok(self.take_pending_segment());
            }

            let mut completed: Option<Vec<u8>> = None;
            let mut boundary_index: Option<usize> = None;

            // `bytes_into_seg` is read against this snapshot for the whole block, never
            // against `self.bytes_into_seg` directly: the original C only assigns
            // `fsss->bytes_into_seg` once, after the loop, right before `return`, so that
            // a second hit later in the same block is still measured on the pre-split
            // basis (spec.md section 4.3, "Coordinate basis for last_hit_at and
            // bytes_into_seg").
            let block_start_bytes_into_seg = self.bytes_into_seg;
            let mut residual_bytes_into_seg: Option<u64> = None;

            for i in 0..window {
                let outgoing = self.prev_block[i];
                let incoming = self.cur_block[i];
                self.rolling.roll(outgoing, incoming);

                if self.rolling.is_hit() {
                    let position = block_start_bytes_into_seg + i as u64;

                    if position > self.last_hit_at + self.config.minsegsize() {
                        if let Some(first) = boundary_index {
                            tracing::error!(
                                first,
                                second = i,
                                window,
                                "multiple segment boundaries in one block"
                            );
                            return Err(ChunkerError::MultipleBoundariesInBlock {
                                window,
                                first,
                                second: i,
                            });
                        }
                        boundary_index = Some(i);

                        self.cur_out.extend_from_slice(&self.cur_block[..=i]);
                        completed = Some(mem::take(&mut self.cur_out));

                        self.cur_out = Vec::with_capacity(output_buffer_capacity(&self.config));
                        self.cur_out.extend_from_slice(&self.cur_block[i + 1..window]);
                        residual_bytes_into_seg = Some((window - (i + 1)) as u64);
                    }

                    self.last_hit_at = position;
                }
            }

            self.bytes_into_seg =
                residual_bytes_into_seg.unwrap_or(block_start_bytes_into_seg + window as u64);

            mem::swap(&mut self.cur_block, &mut self.prev_block);

            match completed {
                Some(bytes) => {
                    tracing::trace!(len = bytes.len(), eof = false, "segment emitted");
                    return Ok(Some(Segment(bytes)));
                }
                None => {
                    self.cur_out.extend_from_slice(&self.prev_block[..window]);
                }
            }
        }
    }

    fn take_pending_segment(&mut self) -> Option<Segment> {
        if self.cur_out.is_empty() {
            None
        } else {
            Some(Segment(mem::take(&mut self.cur_out)))
        }
    }
}

/// Initial capacity for a fresh output buffer: `2 * mean_segment_size`,
/// matching the original's `PycStringIO->NewOutput(2 * MEAN_SEGMENT_SIZE)`.
fn output_buffer_capacity(config: &ChunkerConfig) -> usize {
    (8 * config.minsegsize()) as usize
}
