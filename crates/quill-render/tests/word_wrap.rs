//! Integration tests for line breaking at the width boundary.

use quill_core::document::Frame;
use quill_core::types::{FontStyle, FontWeight};
use quill_render::prelude::*;

fn lines(text: &str, width: f32) -> Vec<String> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let frame = Frame::from_text(text);
    let metrics = MonospaceMetrics::new(10.0);
    let tree = generate_render_tree(&frame, Size::new(width, 400.0), &metrics).unwrap();
    tree.blocks[0]
        .lines
        .iter()
        .map(|line| line.runs.iter().map(|run| run.text.as_str()).collect())
        .collect()
}

#[test]
fn test_exact_width_fits_on_one_line() {
    for n in 1..12 {
        let text = "x".repeat(n);
        assert_eq!(lines(&text, n as f32 * 10.0), vec![text.clone()], "n = {n}");
    }
}

#[test]
fn test_one_more_char_wraps() {
    for n in 1..12 {
        let text = "x".repeat(n + 1);
        let result = lines(&text, n as f32 * 10.0);
        assert_eq!(result.len(), 2, "n = {n}");
        assert_eq!(result[1], "x");
    }
}

#[test]
fn test_wrap_prefers_space() {
    assert_eq!(lines("aa bb cc", 60.0), vec!["aa bb ", "cc"]);
    assert_eq!(lines("aaaa bbbb", 60.0), vec!["aaaa ", "bbbb"]);
}

#[test]
fn test_no_empty_lines_when_viewport_too_narrow() {
    let result = lines("abc", 5.0);
    assert_eq!(result, vec!["a", "b", "c"]);
}

#[test]
fn test_every_character_laid_out_once() {
    let text = "The quick brown fox jumps over the lazy dog";
    for width in [30.0, 55.0, 90.0, 200.0] {
        assert_eq!(lines(text, width).concat(), text, "width = {width}");
    }
}

#[test]
fn test_closure_metrics_drive_wrapping() {
    let narrow_i =
        |ch: char, _: f32, _: &str, _: FontWeight, _: FontStyle| if ch == 'i' { 2.0 } else { 10.0 };
    let frame = Frame::from_text("iiiiiab");
    let tree = generate_render_tree(&frame, Size::new(20.0, 100.0), &narrow_i).unwrap();
    let texts: Vec<&str> = tree.blocks[0].lines.iter().map(|l| l.runs[0].text.as_str()).collect();
    assert_eq!(texts, vec!["iiiiia", "b"]);
}

#[test]
fn test_line_count_spans_blocks() {
    let frame = Frame::from_text("aa bb cc\n\nxyz");
    let tree =
        generate_render_tree(&frame, Size::new(60.0, 400.0), &MonospaceMetrics::new(10.0)).unwrap();
    assert_eq!(tree.line_count(), 4);
}
