//! Property-based tests for the universal invariants in spec section 8:
//! conservation, determinism, and insertion locality. Grounded in
//! `oferchen-rsync/crates/checksums/src/rolling/tests/checksum/properties.rs`'s
//! `proptest!` style.

use std::io::Cursor;

use fletchseg::{ChunkerConfig, Segmenter};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn segment_all(data: Vec<u8>, config: ChunkerConfig) -> Vec<Vec<u8>> {
    let mut segmenter = Segmenter::with_config(Cursor::new(data), config).unwrap();
    let mut segments = Vec::new();
    while let Some(segment) = segmenter.read_segment().unwrap() {
        segments.push(segment.into_bytes());
    }
    segments
}

proptest! {
    /// Conservation: concatenating all emitted segments reproduces the input.
    #[test]
    fn conservation_holds_for_arbitrary_input(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let config = ChunkerConfig::for_bits(8);
        let segments = segment_all(data.clone(), config);
        let reconstructed: Vec<u8> = segments.into_iter().flatten().collect();
        proptest::prop_assert_eq!(reconstructed, data);
    }

    /// Every emitted segment is non-empty.
    #[test]
    fn every_segment_is_non_empty(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let config = ChunkerConfig::for_bits(8);
        for segment in segment_all(data, config) {
            proptest::prop_assert!(!segment.is_empty());
        }
    }

    /// Every interior segment (all but possibly the first and last) exceeds
    /// the configured minimum segment size.
    #[test]
    fn interior_segments_exceed_minsegsize(data in proptest::collection::vec(any::<u8>(), 0..8192)) {
        let config = ChunkerConfig::for_bits(8);
        let segments = segment_all(data, config);
        if segments.len() > 2 {
            for segment in &segments[1..segments.len() - 1] {
                proptest::prop_assert!(segment.len() as u64 > config.minsegsize());
            }
        }
    }

    /// Determinism: re-segmenting the same bytes with the same config
    /// produces the same segmentation.
    #[test]
    fn determinism_holds(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let config = ChunkerConfig::for_bits(8);
        let first = segment_all(data.clone(), config);
        let second = segment_all(data, config);
        proptest::prop_assert_eq!(first, second);
    }
}

fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill(&mut data[..]);
    data
}

/// Insertion locality: inserting a handful of bytes in the middle of a long
/// stream perturbs only a bounded span of segments, not everything after
/// the insertion point (spec section 8, "Insertion locality").
#[test]
fn insertion_locality_perturbs_only_a_bounded_span() {
    let config = ChunkerConfig::for_bits(8); // MINSEGSIZE=256, W=128
    let minsegsize = config.minsegsize() as usize;

    let original = random_bytes(0xC0FFEE, 32 * minsegsize);

    let insert_at = 12 * minsegsize;
    let inserted_bytes = random_bytes(0xFACE, 16);
    let mut edited = original[..insert_at].to_vec();
    edited.extend_from_slice(&inserted_bytes);
    edited.extend_from_slice(&original[insert_at..]);

    let original_segments = segment_all(original, config);
    let edited_segments = segment_all(edited, config);

    // Shared prefix: segments that are bit-identical from the start.
    let shared_prefix = original_segments
        .iter()
        .zip(edited_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let prefix_bytes: usize = original_segments[..shared_prefix]
        .iter()
        .map(Vec::len)
        .sum();
    assert!(
        prefix_bytes >= 10 * minsegsize,
        "expected shared prefix covering at least 10*MINSEGSIZE bytes, got {prefix_bytes}"
    );

    // Shared suffix: segments that are bit-identical counting from the end.
    let shared_suffix = original_segments
        .iter()
        .rev()
        .zip(edited_segments.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let suffix_bytes: usize = original_segments[original_segments.len() - shared_suffix..]
        .iter()
        .map(Vec::len)
        .sum();
    assert!(
        suffix_bytes >= 16 * minsegsize,
        "expected shared suffix covering at least 16*MINSEGSIZE bytes, got {suffix_bytes}"
    );

    // The differing middle spans at most 3 consecutive segments on each side.
    let differing_original = original_segments.len() - shared_prefix - shared_suffix;
    let differing_edited = edited_segments.len() - shared_prefix - shared_suffix;
    assert!(
        differing_original <= 3,
        "original side of the diff spans {differing_original} segments, expected <= 3"
    );
    assert!(
        differing_edited <= 3,
        "edited side of the diff spans {differing_edited} segments, expected <= 3"
    );
}

/// A `tempfile`-backed byte source behaves identically to an in-memory one,
/// exercising the `Read` bound against a real file handle (grounded in
/// `rdiff-rust::file_ops`'s use of `std::fs::File`).
#[test]
fn segmenting_a_real_file_matches_segmenting_the_same_bytes_in_memory() {
    use std::io::Write;

    let config = ChunkerConfig::for_bits(8);
    let data = random_bytes(0xD00D, 40 * config.minsegsize() as usize);

    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(&data).expect("write temp file");
    file.flush().expect("flush temp file");

    let file_handle = std::fs::File::open(file.path()).expect("reopen temp file");
    let mut from_file = Segmenter::with_config(file_handle, config).unwrap();
    let mut file_segments = Vec::new();
    while let Some(segment) = from_file.read_segment().unwrap() {
        file_segments.push(segment.into_bytes());
    }

    let memory_segments = segment_all(data, config);
    assert_eq!(file_segments, memory_segments);
}
