//! Unit Tests for Line Framing
//!
//! Reassembly of worker stream chunks into complete lines.

use companion_host::worker::{is_blank, LineFramer};

fn feed(framer: &mut LineFramer, chunks: &[&str]) -> Vec<String> {
    chunks
        .iter()
        .flat_map(|chunk| framer.push(chunk.as_bytes()))
        .collect()
}

#[test]
fn test_lines_split_across_chunks() {
    let mut framer = LineFramer::new();
    let lines = feed(&mut framer, &["foo\nb", "ar\n", "baz"]);
    assert_eq!(lines, vec!["foo", "bar"]);
    assert_eq!(framer.pending(), b"baz");
}

#[test]
fn test_empty_chunk_is_noop() {
    let mut framer = LineFramer::new();
    framer.push(b"half");
    assert!(framer.push(b"").is_empty());
    assert_eq!(framer.pending(), b"half");
}

#[test]
fn test_many_lines_in_one_chunk() {
    let mut framer = LineFramer::new();
    let lines = framer.push(b"one\ntwo\nthree\n");
    assert_eq!(lines, vec!["one", "two", "three"]);
    assert!(framer.pending().is_empty());
    assert_eq!(framer.lines_emitted(), 3);
}

#[test]
fn test_blank_lines_still_consume_state() {
    let mut framer = LineFramer::new();
    let lines = feed(&mut framer, &["\n  \n", "x\n"]);
    assert_eq!(lines, vec!["", "  ", "x"]);
    let visible: Vec<_> = lines.iter().filter(|l| !is_blank(l)).collect();
    assert_eq!(visible, vec!["x"]);
}

#[test]
fn test_carriage_return_kept() {
    let mut framer = LineFramer::new();
    assert_eq!(framer.push(b"{\"a\":1}\r\n"), vec!["{\"a\":1}\r"]);
    assert!(!is_blank("{\"a\":1}\r"));
    assert!(is_blank("\r"));
}

#[test]
fn test_split_multibyte_character() {
    let mut framer = LineFramer::new();
    let text = "caf\u{e9}\n".as_bytes();
    assert!(framer.push(&text[..4]).is_empty());
    assert_eq!(framer.push(&text[4..]), vec!["caf\u{e9}"]);
}

#[test]
fn test_residual_fragment_discarded_on_finish() {
    let mut framer = LineFramer::new();
    assert_eq!(framer.push(b"done\npartial"), vec!["done"]);
    assert_eq!(framer.finish(), "partial".len());
}

#[test]
fn test_reset_clears_fragment() {
    let mut framer = LineFramer::new();
    framer.push(b"stale");
    framer.reset();
    assert_eq!(framer.push(b"fresh\n"), vec!["fresh"]);
}
