// ── Application lifecycle & top-level state ────────────────────────────────────
//
// A single `App` is created on startup and owned by `WindowState` for the
// lifetime of the main window.  All mutations happen on the UI thread and
// there is no global mutable state; the theme travels in `EditorConfig`.

use std::{
    cell::{Cell, Ref, RefCell},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use tempfile::NamedTempFile;

use crate::{
    buffer::{Buffer, TextBuffer, Viewport},
    config::EditorConfig,
    editor::{
        auto_indent, ChangeNotifier, KeyOutcome, KeywordTagger, LineGutter, StatusIndicator,
        SubscriptionId,
    },
    error::{NexusError, Result},
    search,
    theme::Theme,
    ui::{commands::EditKey, tabs::Tabs},
};

const APP_NAME: &str = "Nexus";
const UNTITLED: &str = "Untitled";

// ── Document ──────────────────────────────────────────────────────────────────

/// One open tab: its buffer and the UI state kept in sync with it.
pub(crate) struct Document {
    title: String,
    /// Where the text was last opened from or saved to.
    path: Option<PathBuf>,
    /// Set by any text edit; cleared on open and save.
    dirty: Rc<Cell<bool>>,
    notifier: ChangeNotifier<TextBuffer>,
    gutter: Rc<RefCell<LineGutter>>,
    status: Rc<RefCell<StatusIndicator>>,
    subscriptions: Vec<SubscriptionId>,
}

impl Document {
    /// An empty document whose gutter, status and dirty flag follow every
    /// buffer change.
    pub(crate) fn new(title: impl Into<String>) -> Self {
        let mut notifier = ChangeNotifier::new(TextBuffer::new());
        let gutter: Rc<RefCell<LineGutter>> = Rc::default();
        let status: Rc<RefCell<StatusIndicator>> = Rc::default();
        let dirty = Rc::new(Cell::new(false));

        let sync = {
            let gutter = Rc::clone(&gutter);
            let status = Rc::clone(&status);
            notifier.subscribe(move |_, buffer| {
                gutter.borrow_mut().redraw(buffer);
                status.borrow_mut().update(buffer.cursor_position());
            })
        };
        let edits = {
            let dirty = Rc::clone(&dirty);
            notifier.subscribe(move |kind, _| {
                if kind.is_edit() {
                    dirty.set(true);
                }
            })
        };

        gutter.borrow_mut().redraw(notifier.buffer());
        Self {
            title: title.into(),
            path: None,
            dirty,
            notifier,
            gutter,
            status,
            subscriptions: vec![sync, edits],
        }
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Record that the text now matches `path` on disk.
    fn mark_saved(&mut self, path: PathBuf) {
        self.title = base_name(&path);
        self.path = Some(path);
        self.dirty.set(false);
    }

    pub(crate) fn text(&self) -> &str {
        self.notifier.buffer().as_str()
    }

    pub(crate) fn buffer(&self) -> &TextBuffer {
        self.notifier.buffer()
    }

    pub(crate) fn notifier_mut(&mut self) -> &mut ChangeNotifier<TextBuffer> {
        &mut self.notifier
    }

    pub(crate) fn gutter(&self) -> Ref<'_, LineGutter> {
        self.gutter.borrow()
    }

    pub(crate) fn status_text(&self) -> String {
        self.status.borrow().text().to_owned()
    }

    /// Detach every subscription and drop the buffer.
    pub(crate) fn close(mut self) {
        self.detach();
        tracing::debug!(title = %self.title, "document closed");
    }

    fn detach(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.notifier.unsubscribe(id);
        }
    }

    /// Move the view so the cursor's display row is visible.
    ///
    /// Scrolls up to the cursor's line, or down by the fewest source lines
    /// that bring its row into view.  Wrapped lines count as several rows.
    fn scroll_to_cursor(&mut self) {
        let buffer = self.notifier.buffer();
        let cursor = buffer.cursor();
        let view = buffer.viewport();
        if view.rows == 0 || buffer.display_line(cursor).is_some() {
            return;
        }
        let line = buffer.line_of(cursor);
        if line < view.top_line {
            self.notifier.scroll_to_line(line);
            return;
        }
        let cursor_row = match view.wrap_columns.filter(|&w| w > 0) {
            Some(width) => ((cursor - buffer.line_start(line)) / width).min(rows_of(buffer, line) - 1),
            None => 0,
        };
        let mut top = view.top_line;
        let mut used: usize = (top..line).map(|l| rows_of(buffer, l)).sum::<usize>() + cursor_row + 1;
        while used > view.rows && top < line {
            used -= rows_of(buffer, top);
            top += 1;
        }
        if top != view.top_line {
            self.notifier.scroll_to_line(top);
        }
    }
}

/// Display rows taken by source `line` under the buffer's wrap width.
fn rows_of(buffer: &impl Buffer, line: usize) -> usize {
    match buffer.viewport().wrap_columns.filter(|&w| w > 0) {
        Some(width) => (buffer.line_end(line) - buffer.line_start(line)).div_ceil(width).max(1),
        None => 1,
    }
}

/// Write `text` to a temporary file beside `path`, then rename it over
/// `path`.  A failed write leaves any existing file untouched.
fn write_atomically(path: &Path, text: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// The file-name component of `path`, or the whole path if it has none.
fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Top-level application state.
///
/// Passed by mutable reference through WndProc handlers so that all
/// application logic sees a single, explicit state root rather than a
/// collection of disconnected globals.
pub(crate) struct App {
    config: EditorConfig,
    tabs: Tabs,
    keywords: KeywordTagger,
    /// Most recent non-empty search, used to pre-fill the Find dialog.
    last_query: String,
}

impl App {
    pub(crate) fn new(config: EditorConfig) -> Result<Self> {
        Ok(Self {
            config,
            tabs: Tabs::default(),
            keywords: KeywordTagger::standard()?,
            last_query: String::new(),
        })
    }

    pub(crate) fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub(crate) fn tabs(&self) -> &Tabs {
        &self.tabs
    }

    pub(crate) fn active(&self) -> Option<&Document> {
        self.tabs.active()
    }

    pub(crate) fn last_query(&self) -> &str {
        &self.last_query
    }

    /// Compute the title string for the main window.
    ///
    /// | State | Title |
    /// |---|---|
    /// | No tabs | `"Nexus"` |
    /// | Clean tab | `"title \u{2014} Nexus"` |
    /// | Dirty tab | `"*title \u{2014} Nexus"` |
    pub(crate) fn window_title(&self) -> String {
        match self.tabs.active() {
            None => APP_NAME.to_owned(),
            Some(doc) => {
                let dirty = if doc.is_dirty() { "*" } else { "" };
                format!("{dirty}{} \u{2014} {APP_NAME}", doc.title())
            }
        }
    }

    // ── Tabs ──────────────────────────────────────────────────────────────────

    /// Open a new tab holding `content` and make it active.
    ///
    /// Non-empty content is keyword-tagged right away.  Returns the tab index.
    pub(crate) fn add_new_tab(&mut self, content: &str, title: Option<&str>) -> usize {
        let mut doc = Document::new(title.unwrap_or(UNTITLED));
        doc.notifier.set_viewport(self.current_viewport());
        if !content.is_empty() {
            doc.notifier.insert(0, content);
            doc.notifier.set_cursor(0);
            self.keywords.retag(&mut doc.notifier);
        }
        doc.dirty.set(false);
        self.tabs.push(doc)
    }

    pub(crate) fn select_tab(&mut self, index: usize) -> bool {
        self.tabs.select(index)
    }

    pub(crate) fn close_tab(&mut self, index: usize) -> bool {
        self.tabs.close(index)
    }

    /// New documents inherit the active document's viewport geometry.
    fn current_viewport(&self) -> Viewport {
        self.tabs
            .active()
            .map(|d| Viewport {
                top_line: 0,
                ..d.buffer().viewport()
            })
            .unwrap_or_default()
    }

    // ── Files ─────────────────────────────────────────────────────────────────

    /// Read `path` into a new, active tab titled with its base name.
    ///
    /// On failure no tab is created.
    pub(crate) fn open_file(&mut self, path: &Path) -> Result<usize> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!(path = %path.display(), %source, "open failed");
            NexusError::FileRead {
                path: path.to_owned(),
                source,
            }
        })?;
        let index = self.add_new_tab(&content, Some(&base_name(path)));
        if let Some(doc) = self.tabs.active_mut() {
            doc.path = Some(path.to_owned());
        }
        tracing::info!(path = %path.display(), bytes = content.len(), "opened");
        Ok(index)
    }

    /// Write the active document's full text to `path`, overwriting it.
    ///
    /// On success the tab takes the file's base name.  On failure the
    /// document is left exactly as it was.
    pub(crate) fn save_active(&mut self, path: &Path) -> Result<()> {
        let Some(doc) = self.tabs.active_mut() else {
            return Ok(());
        };
        write_atomically(path, doc.text()).map_err(|source| {
            tracing::warn!(path = %path.display(), %source, "save failed");
            NexusError::FileWrite {
                path: path.to_owned(),
                source,
            }
        })?;
        doc.mark_saved(path.to_owned());
        tracing::info!(path = %path.display(), "saved");
        Ok(())
    }

    // ── Search ────────────────────────────────────────────────────────────────

    /// Highlight every occurrence of `query` in the active document.
    ///
    /// An empty query does nothing.  Returns the match count.
    pub(crate) fn find(&mut self, query: &str) -> Result<usize> {
        if query.is_empty() {
            return Ok(0);
        }
        self.last_query = query.to_owned();
        match self.tabs.active_mut() {
            Some(doc) => Ok(search::highlight(&mut doc.notifier, query)?.len()),
            None => Ok(0),
        }
    }

    /// Replace every occurrence of `query` in the active document.
    pub(crate) fn replace_all(&mut self, query: &str, replacement: &str) -> Result<usize> {
        if query.is_empty() {
            return Ok(0);
        }
        self.last_query = query.to_owned();
        let Some(doc) = self.tabs.active_mut() else {
            return Ok(0);
        };
        let count = search::replace_all(&mut doc.notifier, query, replacement)?;
        self.keywords.retag(&mut doc.notifier);
        Ok(count)
    }

    pub(crate) fn clear_highlights(&mut self) {
        if let Some(doc) = self.tabs.active_mut() {
            search::clear(&mut doc.notifier);
        }
    }

    // ── Theme ─────────────────────────────────────────────────────────────────

    /// Switch between light and dark, re-tagging every document so no range
    /// keeps a colour from the old theme.
    pub(crate) fn toggle_theme(&mut self) -> Theme {
        self.config.theme = self.config.theme.toggled();
        for doc in self.tabs.iter_mut() {
            self.keywords.retag(&mut doc.notifier);
        }
        tracing::info!(dark = self.config.theme.is_dark(), "theme changed");
        self.config.theme
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    /// Key release: rescan the active document for keywords.
    pub(crate) fn key_release(&mut self) {
        if let Some(doc) = self.tabs.active_mut() {
            self.keywords.retag(&mut doc.notifier);
        }
    }

    /// Return: auto-indent in place of the default newline.
    pub(crate) fn key_return(&mut self) -> KeyOutcome {
        let width = self.config.indent_width;
        match self.tabs.active_mut() {
            Some(doc) => {
                let outcome = auto_indent(&mut doc.notifier, width);
                doc.scroll_to_cursor();
                outcome
            }
            None => KeyOutcome::Default,
        }
    }

    /// Insert a typed character at the cursor.
    pub(crate) fn type_char(&mut self, c: char) {
        let Some(doc) = self.tabs.active_mut() else {
            return;
        };
        let cursor = doc.buffer().cursor();
        let mut utf8 = [0u8; 4];
        doc.notifier.insert(cursor, c.encode_utf8(&mut utf8));
        doc.scroll_to_cursor();
    }

    /// Cursor movement, paging and deletion.
    pub(crate) fn edit_key(&mut self, key: EditKey) {
        let Some(doc) = self.tabs.active_mut() else {
            return;
        };
        let b = doc.buffer();
        let cursor = b.cursor();
        let line = b.line_of(cursor);
        let column = cursor - b.line_start(line);
        let page = b.viewport().rows.max(1);
        let last_line = b.line_count() - 1;
        // Same column on another line, clamped to that line's length.
        let on_line = |target: usize| {
            let start = b.line_start(target);
            (start + column).min(b.line_end(target))
        };

        match key {
            EditKey::Left => doc.notifier.set_cursor(cursor.saturating_sub(1)),
            EditKey::Right => doc.notifier.set_cursor(cursor + 1),
            EditKey::Up if line > 0 => {
                let target = on_line(line - 1);
                doc.notifier.set_cursor(target);
            }
            EditKey::Down if line < last_line => {
                let target = on_line(line + 1);
                doc.notifier.set_cursor(target);
            }
            EditKey::Up | EditKey::Down => {}
            EditKey::Home => {
                let target = b.line_start(line);
                doc.notifier.set_cursor(target);
            }
            EditKey::End => {
                let target = b.line_end(line);
                doc.notifier.set_cursor(target);
            }
            EditKey::PageUp => {
                let target = on_line(line.saturating_sub(page));
                doc.notifier.set_cursor(target);
            }
            EditKey::PageDown => {
                let target = on_line((line + page).min(last_line));
                doc.notifier.set_cursor(target);
            }
            EditKey::Backspace if cursor > 0 => {
                doc.notifier.delete(cursor - 1..cursor);
            }
            EditKey::Delete if cursor < b.len_chars() => {
                doc.notifier.delete(cursor..cursor + 1);
            }
            EditKey::Backspace | EditKey::Delete => {}
        }
        doc.scroll_to_cursor();
    }

    /// Scroll the active document by `lines` (negative scrolls up).
    pub(crate) fn scroll_by(&mut self, lines: isize) {
        if let Some(doc) = self.tabs.active_mut() {
            let top = doc.buffer().viewport().top_line;
            doc.notifier.scroll_to_line(top.saturating_add_signed(lines));
        }
    }

    /// Place the cursor at display `row`, `column` of the active view.
    pub(crate) fn click(&mut self, row: usize, column: usize) {
        let Some(doc) = self.tabs.active_mut() else {
            return;
        };
        let b = doc.buffer();
        let view = b.viewport();
        let wrap = view.wrap_columns.filter(|&w| w > 0);
        let target_y = row as i32 * view.row_height;
        // The last visible line whose first row starts at or above the click.
        let mut index = b.top_left_index();
        let mut hit = (index, 0);
        while let Some(dl) = b.display_line(index) {
            if dl.y > target_y {
                break;
            }
            hit = (index, dl.y);
            match b.next_line_start(index) {
                Some(next) => index = next,
                None => break,
            }
        }
        let (start, y) = hit;
        let rows_down = ((target_y - y) / view.row_height.max(1)) as usize;
        let offset = match wrap {
            Some(w) => rows_down * w + column,
            None => column,
        };
        let target = (start + offset).min(b.line_end(b.line_of(start)));
        doc.notifier.set_cursor(target);
    }

    /// Apply new text-area geometry to every document.
    pub(crate) fn resize(&mut self, rows: usize, row_height: i32, columns: usize) {
        let wrap_columns = self.config.word_wrap.then_some(columns.max(1));
        for doc in self.tabs.iter_mut() {
            let view = Viewport {
                rows,
                row_height,
                wrap_columns,
                ..doc.buffer().viewport()
            };
            doc.notifier.set_viewport(view);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
