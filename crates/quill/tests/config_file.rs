//! Sessions configured from a TOML file on disk.

use quill::prelude::*;
use quill_core::style::resolve_run_style;
use quill_core::types::Color;

const CONFIG: &str = r##"
multiline = false
caret_width = 3.0

[theme]
caret = "#FF0000"

[keymap]
"control-w" = "style:warning"
"control-b" = "none"

[styles.warning]
color = "#CC0000"
font-size = "20"
"##;

fn setup(text: &str) -> (tempfile::TempDir, EditorSession) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quill.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let config = EditorConfig::from_file(&path).unwrap();
    let metrics = MonospaceMetrics::new(10.0);
    let session = EditorSession::new(Frame::from_text(text), Size::new(300.0, 200.0), metrics)
        .unwrap()
        .with_config(config)
        .unwrap();
    (dir, session)
}

#[test]
fn test_configured_style_binding() {
    let (_dir, mut session) = setup("look out");
    session.process_key_event(&KeyEvent::named("end")).unwrap();
    session.process_key_event(&KeyEvent::char('w').with_control()).unwrap();

    let frame = session.frame();
    let spans = frame.block(frame.blocks()[0]).unwrap().spans().to_vec();
    let texts: Vec<&str> = spans.iter().map(|s| frame.span(*s).unwrap().text()).collect();
    assert_eq!(texts, vec!["look ", "out"]);

    let warning = resolve_run_style(frame, spans[1]).unwrap();
    assert_eq!(warning.color, Color::from_rgb8(0xCC, 0, 0));
    assert_eq!(warning.font_size, 20.0);
    frame.check_invariants().unwrap();
}

#[test]
fn test_unbound_default_is_ignored() {
    let (_dir, mut session) = setup("plain");
    session.process_key_event(&KeyEvent::named("end")).unwrap();
    let effect = session.process_key_event(&KeyEvent::char('b').with_control()).unwrap();
    assert_eq!(effect, Effect::None);
    assert_eq!(session.frame().block(session.frame().blocks()[0]).unwrap().spans().len(), 1);
}

#[test]
fn test_single_line_enter_keeps_one_block() {
    let (_dir, mut session) = setup("one line");
    session.process_key_event(&KeyEvent::named("enter")).unwrap();
    assert_eq!(session.frame().block_count(), 1);
    assert_eq!(session.plain_text(), "one line");
}

#[test]
fn test_theme_reaches_the_painter() {
    let (_dir, mut session) = setup("caret");
    let red = Color::from_rgb8(255, 0, 0);
    assert_eq!(session.theme().caret, red);

    let mut renderer = RecordingRenderer::new();
    session.paint(&mut renderer).unwrap();
    let carets = renderer.filled_with(red);
    assert_eq!(carets.len(), 1);
    assert_eq!(carets[0].width(), 3.0);
}
