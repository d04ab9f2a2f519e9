//! Property-based tests for line framing

use companion_host::worker::LineFramer;
use proptest::prelude::*;

/// Split `data` at the given cut points
fn chunked(data: &[u8], mut cuts: Vec<usize>) -> Vec<&[u8]> {
    cuts.iter_mut().for_each(|c| *c %= data.len() + 1);
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(&data[start..cut]);
        start = cut;
    }
    chunks.push(&data[start..]);
    chunks
}

proptest! {
    #[test]
    fn test_framing_is_chunk_boundary_invariant(
        data in prop::collection::vec(prop_oneof![Just(b'\n'), any::<u8>()], 0..512),
        cuts in prop::collection::vec(any::<usize>(), 0..16),
    ) {
        let mut whole = LineFramer::new();
        let expected = whole.push(&data);

        let mut framer = LineFramer::new();
        let mut lines = Vec::new();
        for chunk in chunked(&data, cuts) {
            lines.extend(framer.push(chunk));
        }

        prop_assert_eq!(lines, expected);
        prop_assert_eq!(framer.pending(), whole.pending());
    }

    #[test]
    fn test_fragment_never_contains_newline(
        chunks in prop::collection::vec("[a-z\\n]{0,40}", 0..20),
    ) {
        let mut framer = LineFramer::new();
        for chunk in &chunks {
            framer.push(chunk.as_bytes());
            prop_assert!(!framer.pending().contains(&b'\n'));
        }
    }

    #[test]
    fn test_lines_match_split(text in "[a-z \\n]{0,200}") {
        let mut framer = LineFramer::new();
        let lines = framer.push(text.as_bytes());

        let mut pieces: Vec<&str> = text.split('\n').collect();
        let last = pieces.pop().unwrap_or("");

        prop_assert_eq!(lines, pieces);
        prop_assert_eq!(framer.pending(), last.as_bytes());
    }
}
