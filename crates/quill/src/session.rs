//! The editing session: one frame, its layout, and the caret.

use quill_core::document::{Bias, Frame, Selection, Spot};
use quill_core::logging::{span_names, targets};
use quill_core::DocumentError;
use quill_render::layout::generate_render_tree;
use quill_render::metrics::CharMetrics;
use quill_render::painter::{draw_render_tree, Caret, PaintState, PopupView, Theme};
use quill_render::renderer::Renderer;
use quill_render::tree::{RenderPath, RenderTree};
use quill_render::types::{Point, Size};

use crate::command::{Axis, Command, Effect};
use crate::config::EditorConfig;
use crate::cursor::paths::bias_for;
use crate::cursor::{
    block_path_to_render_path, find_box_with_xy, render_path_to_block_path, render_path_to_xy,
    track_selection, Cursor,
};
use crate::edit;
use crate::error::Result;
use crate::input::KeyEvent;
use crate::keymap::Keymap;
use crate::popup::{CompletionSource, PopupState};

/// Host hook for scheduling a repaint.
///
/// The session calls [`request_frame`](Self::request_frame) whenever its
/// visible state changes. The host decides when to call
/// [`EditorSession::paint`]. Any `FnMut()` is a `FrameScheduler`.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

impl<F> FrameScheduler for F
where
    F: FnMut(),
{
    fn request_frame(&mut self) {
        self()
    }
}

type EnterAction = Box<dyn FnMut(&mut Frame)>;

/// An editable frame with its render tree, caret, and popup.
///
/// All work happens synchronously on the caller's thread. Structural edits
/// relayout before returning, so navigation never runs against a stale
/// tree.
pub struct EditorSession {
    frame: Frame,
    cursor: Cursor,
    popup: PopupState,
    tree: RenderTree,
    viewport: Size,
    config: EditorConfig,
    keymap: Keymap,
    theme: Theme,
    metrics: Box<dyn CharMetrics>,
    completions: Option<Box<dyn CompletionSource>>,
    scheduler: Option<Box<dyn FrameScheduler>>,
    enter_action: Option<EnterAction>,
    paint_pending: bool,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("cursor", &self.cursor)
            .field("popup", &self.popup)
            .field("viewport", &self.viewport)
            .field("blocks", &self.frame.block_count())
            .field("paint_pending", &self.paint_pending)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Create a session over `frame` with the default configuration.
    ///
    /// A frame with no blocks gets one empty block. The caret starts at the
    /// beginning of the document and the frame is laid out immediately.
    pub fn new(frame: Frame, viewport: Size, metrics: impl CharMetrics + 'static) -> Result<Self> {
        let mut frame = frame;
        ensure_content(&mut frame)?;
        let cursor = Cursor::at_start(&frame)
            .ok_or(DocumentError::IndexOutOfBounds { index: 0, len: 0 })?;
        let mut session = Self {
            frame,
            cursor,
            popup: PopupState::default(),
            tree: RenderTree::default(),
            viewport,
            config: EditorConfig::default(),
            keymap: Keymap::default(),
            theme: Theme::default(),
            metrics: Box::new(metrics),
            completions: None,
            scheduler: None,
            enter_action: None,
            paint_pending: false,
        };
        session.relayout()?;
        Ok(session)
    }

    /// Apply a configuration: keymap, theme, and named styles.
    pub fn with_config(mut self, config: EditorConfig) -> Result<Self> {
        self.keymap = config.keymap()?;
        self.theme = config.theme()?;
        config.apply_styles(&mut self.frame)?;
        self.config = config;
        self.relayout()?;
        Ok(self)
    }

    pub fn with_completion_source(mut self, source: impl CompletionSource + 'static) -> Self {
        self.completions = Some(Box::new(source));
        self
    }

    pub fn with_scheduler(mut self, scheduler: impl FrameScheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    /// Callback run by enter in a single-line session.
    pub fn with_enter_action(mut self, action: impl FnMut(&mut Frame) + 'static) -> Self {
        self.enter_action = Some(Box::new(action));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Mutable access to the document.
    ///
    /// Changes are picked up by the next command or paint, which relayout a
    /// dirty frame first. A caret left on a removed span moves to the
    /// document start.
    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Place the caret, dropping any selection.
    pub fn set_cursor(&mut self, cursor: Cursor) -> Result<()> {
        self.frame.validate_spot(cursor.spot)?;
        self.cursor = cursor;
        self.frame.clear_selection();
        Ok(())
    }

    pub fn render_tree(&self) -> &RenderTree {
        &self.tree
    }

    pub fn popup(&self) -> &PopupState {
        &self.popup
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Whether a repaint was requested and not yet performed.
    pub fn is_paint_pending(&self) -> bool {
        self.paint_pending
    }

    /// Document text with no block separators.
    pub fn plain_text(&self) -> String {
        self.frame.plain_text()
    }

    /// Text of the active selection, with `'\n'` between blocks.
    pub fn selected_text(&self) -> Result<Option<String>> {
        match self.frame.selection() {
            Some(selection) => Ok(Some(self.frame.text_in(&selection)?)),
            None => Ok(None),
        }
    }

    /// Surface position of the caret's top-left corner.
    pub fn caret_xy(&mut self) -> Result<Point> {
        self.ensure_layout()?;
        Ok(self.cursor.xy(&self.frame, &self.tree, self.metrics.as_ref())?)
    }

    // =========================================================================
    // Layout and paint
    // =========================================================================

    /// Rebuild the render tree from the frame.
    pub fn relayout(&mut self) -> Result<()> {
        ensure_content(&mut self.frame)?;
        if self.frame.validate_spot(self.cursor.spot).is_err() {
            tracing::debug!(target: targets::CURSOR, "caret was stale, moved to start");
            self.cursor = Cursor::at_start(&self.frame)
                .ok_or(DocumentError::IndexOutOfBounds { index: 0, len: 0 })?;
        }
        if let Some(selection) = self.frame.selection() {
            let stale = self.frame.validate_spot(selection.start).is_err()
                || self.frame.validate_spot(selection.end).is_err();
            if stale {
                self.frame.clear_selection();
            }
        }
        self.tree = generate_render_tree(&self.frame, self.viewport, self.metrics.as_ref())?;
        self.frame.clear_dirty();
        Ok(())
    }

    /// Change the viewport and relayout.
    pub fn set_viewport(&mut self, viewport: Size) -> Result<()> {
        self.viewport = viewport;
        self.relayout()?;
        self.redraw();
        Ok(())
    }

    /// Ask the host for a repaint.
    pub fn redraw(&mut self) {
        self.paint_pending = true;
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.request_frame();
        }
    }

    /// Paint the tree, selection, caret, and popup.
    pub fn paint<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<()> {
        self.ensure_layout()?;
        let path = self.cursor.render_path(&self.frame, &self.tree)?;
        let selection = self.selection_paths()?;
        let popup = self.popup.visible.then(|| PopupView {
            xy: self.popup.xy,
            lines: &self.popup.lines,
            selected_index: self.popup.selected_index,
        });
        let state = PaintState {
            current_line: Some(path.line_key()),
            selection,
            caret: Some(Caret {
                path,
                width: self.config.caret_width,
            }),
            popup,
            theme: &self.theme,
            metrics: self.metrics.as_ref(),
        };
        draw_render_tree(renderer, &self.tree, &state);
        self.paint_pending = false;
        Ok(())
    }

    fn selection_paths(&self) -> Result<Option<(RenderPath, RenderPath)>> {
        let Some(selection) = self.frame.selection() else {
            return Ok(None);
        };
        if selection.is_collapsed(&self.frame)? {
            return Ok(None);
        }
        let (start, end) = selection.ordered(&self.frame)?;
        Ok(Some((
            block_path_to_render_path(&self.frame, &self.tree, start, Bias::Right)?,
            block_path_to_render_path(&self.frame, &self.tree, end, Bias::Left)?,
        )))
    }

    fn ensure_layout(&mut self) -> Result<()> {
        if self.frame.is_dirty() {
            self.relayout()?;
        }
        Ok(())
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Handle one key event.
    ///
    /// Printable characters without control or meta insert text. Other
    /// events go through the keymap; unbound and unrecognized events are
    /// ignored.
    pub fn process_key_event(&mut self, event: &KeyEvent) -> Result<Effect> {
        let _span = tracing::debug_span!(span_names::KEY_EVENT).entered();
        if !event.recognized {
            tracing::trace!(target: targets::DISPATCH, "ignored unrecognized key event");
            return Ok(Effect::None);
        }
        if event.inserts_text() {
            if let Some(ch) = event.ch {
                return self.apply(Command::InsertChar(ch));
            }
        }
        match self.keymap.resolve(event, self.popup.visible) {
            Some(command) => self.apply(command),
            None => {
                tracing::trace!(target: targets::DISPATCH, combo = ?event.combo(), "no binding");
                Ok(Effect::None)
            }
        }
    }

    /// Move the caret to the character boundary nearest `point`.
    ///
    /// With `extend`, the selection grows from its anchor (or the previous
    /// caret) to the new position.
    pub fn pointer_down(&mut self, point: Point, extend: bool) -> Result<Effect> {
        self.ensure_layout()?;
        self.popup.hide();
        let from = self.cursor.spot;
        if !self.place_caret_at(point)? {
            return Ok(Effect::None);
        }
        track_selection(&mut self.frame, from, self.cursor.spot, extend)?;
        self.redraw();
        Ok(Effect::Redraw)
    }

    /// Extend the selection to `point` while the pointer is held.
    pub fn pointer_drag(&mut self, point: Point) -> Result<Effect> {
        self.ensure_layout()?;
        let from = self.cursor.spot;
        if !self.place_caret_at(point)? {
            return Ok(Effect::None);
        }
        track_selection(&mut self.frame, from, self.cursor.spot, true)?;
        self.redraw();
        Ok(Effect::Redraw)
    }

    fn place_caret_at(&mut self, point: Point) -> Result<bool> {
        let Some(path) = find_box_with_xy(&self.tree, point, self.metrics.as_ref()) else {
            return Ok(false);
        };
        let spot = render_path_to_block_path(&self.tree, &path)?;
        self.cursor = Cursor::with_bias(spot, bias_for(&self.tree, &path));
        Ok(true)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Execute one command and request a repaint if anything changed.
    pub fn apply(&mut self, command: Command) -> Result<Effect> {
        self.ensure_layout()?;

        let keeps_popup = matches!(
            command,
            Command::Autocomplete
                | Command::PopupMove(_)
                | Command::PopupAccept
                | Command::PopupDismiss
                | Command::InsertChar(_)
                | Command::InsertText(_)
        );
        let mut effect = Effect::None;
        if self.popup.visible && !keeps_popup {
            self.popup.hide();
            effect = Effect::Redraw;
        }

        effect = effect.max(self.execute(&command)?);
        tracing::debug!(target: targets::DISPATCH, ?command, ?effect, "applied command");
        if effect.needs_redraw() {
            self.redraw();
        }
        Ok(effect)
    }

    fn execute(&mut self, command: &Command) -> Result<Effect> {
        match command {
            Command::MoveCursor { axis, delta, extend } => {
                let (axis, delta) = (*axis, *delta);
                self.navigate(*extend, |cursor, frame, tree| match axis {
                    Axis::Horizontal => cursor.move_h(frame, tree, delta),
                    Axis::Vertical => cursor.move_v(frame, tree, delta),
                })
            }
            Command::MoveWord { delta, extend } => {
                let delta = *delta;
                self.navigate(*extend, |cursor, frame, _| cursor.move_word(frame, delta))
            }
            Command::MoveLineEdge { edge, extend } => {
                let edge = *edge;
                self.navigate(*extend, |cursor, frame, tree| {
                    cursor.move_line_edge(frame, tree, edge)
                })
            }
            Command::MoveDocumentEdge { edge, extend } => {
                let edge = *edge;
                self.navigate(*extend, |cursor, frame, _| cursor.move_document_edge(frame, edge))
            }
            Command::SelectAll => Ok(if self.cursor.select_all(&mut self.frame)? {
                Effect::Redraw
            } else {
                Effect::None
            }),
            Command::ClearSelection => {
                if self.frame.selection().is_none() {
                    return Ok(Effect::None);
                }
                self.frame.clear_selection();
                Ok(Effect::Redraw)
            }
            Command::InsertChar(ch) => {
                let mut buf = [0u8; 4];
                self.insert(ch.encode_utf8(&mut buf))
            }
            Command::InsertText(text) => self.insert(text),
            Command::DeleteBackward => self.delete(edit::delete_backward),
            Command::DeleteForward => self.delete(edit::delete_forward),
            Command::Enter => self.enter(),
            Command::SplitBlock => self.split_block(),
            Command::ApplyStyle { name } => self.apply_style(name.as_deref()),
            Command::Autocomplete => self.show_completions(),
            Command::PopupMove(delta) => {
                if !self.popup.visible {
                    return Ok(Effect::None);
                }
                self.popup.move_selection(*delta);
                Ok(Effect::Redraw)
            }
            Command::PopupAccept => self.accept_completion(),
            Command::PopupDismiss => {
                if !self.popup.visible {
                    return Ok(Effect::None);
                }
                self.popup.hide();
                Ok(Effect::Redraw)
            }
        }
    }

    fn navigate<F>(&mut self, extend: bool, motion: F) -> Result<Effect>
    where
        F: FnOnce(&mut Cursor, &Frame, &RenderTree) -> Result<bool>,
    {
        let before = (self.cursor, self.frame.selection());
        let from = self.cursor.spot;
        motion(&mut self.cursor, &self.frame, &self.tree)?;
        track_selection(&mut self.frame, from, self.cursor.spot, extend)?;
        let changed = before != (self.cursor, self.frame.selection());
        Ok(if changed { Effect::Redraw } else { Effect::None })
    }

    /// Remove a non-empty selection and put the caret at its start.
    fn replace_selection(&mut self) -> Result<bool> {
        let Some(selection) = self.frame.selection() else {
            return Ok(false);
        };
        if selection.is_collapsed(&self.frame)? {
            self.frame.clear_selection();
            return Ok(false);
        }
        let spot = edit::remove_selection(&mut self.frame, selection)?;
        self.cursor = Cursor::new(spot);
        Ok(true)
    }

    fn insert(&mut self, text: &str) -> Result<Effect> {
        if !self.config.multiline && text.contains(['\n', '\r']) {
            if matches!(text, "\n" | "\r" | "\r\n") {
                return self.enter();
            }
            // Single-line sessions never split blocks; line breaks are dropped.
            let line: String = text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
            if line.is_empty() {
                return Ok(Effect::None);
            }
            return self.insert(&line);
        }
        self.replace_selection()?;
        let spot = edit::insert_text(&mut self.frame, self.cursor.spot, text)?;
        self.cursor = Cursor::with_bias(spot, Bias::Left);
        self.relayout()?;
        if self.popup.visible {
            self.show_completions()?;
        }
        Ok(Effect::Relayout)
    }

    fn delete(&mut self, op: fn(&mut Frame, Spot) -> Result<Option<Spot>>) -> Result<Effect> {
        if self.replace_selection()? {
            self.relayout()?;
            return Ok(Effect::Relayout);
        }
        match op(&mut self.frame, self.cursor.spot)? {
            Some(spot) => {
                self.cursor = Cursor::new(spot);
                self.relayout()?;
                Ok(Effect::Relayout)
            }
            None => Ok(Effect::None),
        }
    }

    fn enter(&mut self) -> Result<Effect> {
        if self.config.multiline {
            return self.split_block();
        }
        let Some(action) = self.enter_action.as_mut() else {
            tracing::trace!(target: targets::DISPATCH, "enter ignored in single-line session");
            return Ok(Effect::None);
        };
        action(&mut self.frame);
        if self.frame.is_dirty() {
            self.relayout()?;
            return Ok(Effect::Relayout);
        }
        Ok(Effect::None)
    }

    fn split_block(&mut self) -> Result<Effect> {
        self.replace_selection()?;
        let spot = edit::split_block(&mut self.frame, self.cursor.spot)?;
        self.cursor = Cursor::new(spot);
        self.relayout()?;
        Ok(Effect::Relayout)
    }

    fn apply_style(&mut self, name: Option<&str>) -> Result<Effect> {
        match self.frame.selection() {
            Some(selection) if !selection.is_collapsed(&self.frame)? => {
                let backward = self.frame.compare_spots(selection.start, selection.end)?.is_gt();
                let carved = edit::apply_style(&mut self.frame, selection, name)?;
                if backward {
                    self.frame.set_selection(Selection::new(carved.end, carved.start))?;
                    self.cursor = Cursor::new(carved.start);
                } else {
                    self.cursor = Cursor::with_bias(carved.end, Bias::Left);
                }
            }
            _ => {
                self.frame.clear_selection();
                let spot = edit::style_word_before(&mut self.frame, self.cursor.spot, name)?;
                self.cursor = Cursor::with_bias(spot, Bias::Left);
            }
        }
        self.relayout()?;
        Ok(Effect::Relayout)
    }

    /// Query the completion source with the text before the caret and show
    /// the popup below the caret line.
    fn show_completions(&mut self) -> Result<Effect> {
        let was_visible = self.popup.visible;
        let Some(source) = self.completions.as_ref() else {
            tracing::trace!(target: targets::DISPATCH, "no completion source");
            return Ok(Effect::None);
        };

        let spot = self.cursor.spot;
        let span = self.frame.span(spot.span)?;
        let from = spot.inset.saturating_sub(self.config.autocomplete_lookback);
        let candidates = source.completions(span.slice(from, spot.inset));

        let path = self.cursor.render_path(&self.frame, &self.tree)?;
        let caret = render_path_to_xy(&self.tree, &path, self.metrics.as_ref())?;
        let height = self.tree.run(&path)?.bounds.height();
        self.popup.show(Point::new(caret.x, caret.y + height), candidates);

        Ok(if self.popup.visible || was_visible {
            Effect::Redraw
        } else {
            Effect::None
        })
    }

    /// Insert the highlighted candidate at the caret.
    ///
    /// When the candidate extends the word being typed (ignoring case), it
    /// replaces that word.
    fn accept_completion(&mut self) -> Result<Effect> {
        let Some(candidate) = self.popup.accept() else {
            return Ok(Effect::None);
        };
        self.replace_selection()?;

        let spot = self.cursor.spot;
        let before: Vec<char> = self.frame.span(spot.span)?.slice(0, spot.inset).chars().collect();
        let word_start = before
            .iter()
            .rposition(|ch| ch.is_whitespace())
            .map_or(0, |i| i + 1);
        let typed: String = before[word_start..].iter().collect();

        let replaces_typed =
            !typed.is_empty() && candidate.to_lowercase().starts_with(&typed.to_lowercase());
        let at = if replaces_typed {
            self.frame.remove_range(spot.span, word_start..spot.inset)?;
            spot.with_inset(word_start)
        } else {
            spot
        };
        let end = edit::insert_text(&mut self.frame, at, &candidate)?;
        self.cursor = Cursor::with_bias(end, Bias::Left);
        self.relayout()?;
        Ok(Effect::Relayout)
    }
}

/// Give a frame at least one block, and every block at least one span.
fn ensure_content(frame: &mut Frame) -> Result<()> {
    if frame.block_count() == 0 {
        frame.insert_block("");
    }
    for block in frame.blocks().to_vec() {
        if frame.first_span(block)?.is_none() {
            frame.insert_span(block, "")?;
        }
    }
    Ok(())
}
