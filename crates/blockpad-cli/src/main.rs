use anyhow::{Context, Result};
use blockpad_config::Config;
use blockpad_engine::{Caret, Cmd, DocumentStore, EditError, Key, Patch};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthChar;

use std::{
    fs::OpenOptions,
    io::{Stdout, stdout},
    process,
};

struct App {
    doc: DocumentStore,
    /// Inner area of the blocks panel as of the last draw, for mouse hits
    blocks_area: Rect,
    /// Index of the first block on screen
    scroll: usize,
    /// Display columns hidden to the left of the active block
    column_scroll: usize,
    status: String,
}

impl App {
    fn new(doc: DocumentStore) -> Self {
        Self {
            doc,
            blocks_area: Rect::default(),
            scroll: 0,
            column_scroll: 0,
            status: String::new(),
        }
    }

    /// Handle one key press; returns true when the user asked to quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('z') => self.run(Cmd::Undo),
                KeyCode::Char('y') => self.run(Cmd::Redo),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Esc => return true,
            // Alt chords are not text
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::ALT) => {}
            KeyCode::Char(c) => self.type_char(c),
            KeyCode::Enter => self.press(Key::Enter),
            KeyCode::Up => self.press(Key::ArrowUp),
            KeyCode::Down => self.press(Key::ArrowDown),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_caret(|offset| offset.saturating_sub(1)),
            KeyCode::Right => self.move_caret(|offset| offset + 1),
            KeyCode::Home => self.move_caret(|_| 0),
            KeyCode::End => self.move_caret(|_| usize::MAX),
            _ => {}
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        self.click(mouse.column, mouse.row);
    }

    /// A click on a block focuses it at the character under the pointer; a
    /// click in the panel below the last block appends a new one
    fn click(&mut self, column: u16, row: u16) {
        let area = self.blocks_area;
        if !area.contains(Position::new(column, row)) {
            return;
        }

        let index = self.scroll + usize::from(row - area.y);
        let Some((id, text)) = self
            .doc
            .nodes()
            .get(index)
            .map(|node| (node.id(), node.text().to_string()))
        else {
            self.press(Key::ClickEmptyArea);
            return;
        };

        let mut column = usize::from(column - area.x);
        if self.doc.active() == Some(id) {
            column += self.column_scroll;
        }
        self.run(Cmd::Focus {
            id,
            at: offset_at_column(&text, column),
        });
    }

    fn type_char(&mut self, c: char) {
        let Some((Caret { id, offset }, text)) = self.caret_text() else {
            return;
        };
        let text = insert_char(&text, offset, c);
        let result = self
            .doc
            .apply(Cmd::UpdateText { id, text })
            .and_then(|_| self.doc.apply(Cmd::Focus { id, at: offset + 1 }));
        self.report("type", result.map(Some));
    }

    fn backspace(&mut self) {
        let caret = self.doc.caret();
        match self.doc.dispatch(Key::Backspace, caret) {
            Ok(Some(_)) => self.status.clear(),
            Ok(None) => {
                if let Some(Caret { offset, .. }) = caret
                    && offset > 0
                {
                    self.erase(offset - 1);
                }
            }
            Err(err) => self.fail("backspace", err),
        }
    }

    fn delete(&mut self) {
        let caret = self.doc.caret();
        match self.doc.dispatch(Key::Delete, caret) {
            Ok(Some(_)) => self.status.clear(),
            Ok(None) => {
                if let Some(Caret { offset, .. }) = caret {
                    self.erase(offset);
                }
            }
            Err(err) => self.fail("delete", err),
        }
    }

    /// Remove the character at `at` in the active block and leave the caret there
    fn erase(&mut self, at: usize) {
        let Some((Caret { id, .. }, text)) = self.caret_text() else {
            return;
        };
        let Some(text) = remove_char(&text, at) else {
            return;
        };
        let result = self
            .doc
            .apply(Cmd::UpdateText { id, text })
            .and_then(|_| self.doc.apply(Cmd::Focus { id, at }));
        self.report("erase", result.map(Some));
    }

    fn move_caret(&mut self, to: impl FnOnce(usize) -> usize) {
        if let Some(Caret { id, offset }) = self.doc.caret() {
            self.run(Cmd::Focus { id, at: to(offset) });
        }
    }

    fn press(&mut self, key: Key) {
        let caret = self.doc.caret();
        let result = self.doc.dispatch(key, caret);
        self.report("key", result);
    }

    fn run(&mut self, cmd: Cmd) {
        let name = cmd.name();
        let result = self.doc.apply(cmd);
        self.report(name, result.map(Some));
    }

    fn report(&mut self, action: &str, result: Result<Option<Patch>, EditError>) {
        match result {
            Ok(Some(patch)) => {
                log::trace!(
                    "{action}: {} changed, {} removed, version {}",
                    patch.changed.len(),
                    patch.removed.len(),
                    patch.version
                );
                self.status.clear();
            }
            Ok(None) => {}
            Err(err) => self.fail(action, err),
        }
    }

    fn fail(&mut self, action: &str, err: EditError) {
        log::debug!("{action} refused: {err}");
        self.status = err.to_string();
    }

    fn caret_text(&self) -> Option<(Caret, String)> {
        let caret = self.doc.caret()?;
        let text = self.doc.node(caret.id)?.text().to_string();
        Some((caret, text))
    }

    /// Keep the active block inside a viewport `height` rows tall
    fn scroll_to_active(&mut self, height: usize) {
        let Some(index) = self
            .doc
            .active()
            .and_then(|id| self.doc.state().position(id))
        else {
            return;
        };
        if index < self.scroll {
            self.scroll = index;
        } else if height > 0 && index >= self.scroll + height {
            self.scroll = index + 1 - height;
        }
    }

    /// Keep display column `caret` of the active block inside a row `width` cells wide
    fn scroll_to_caret(&mut self, caret: usize, width: usize) {
        if caret < width {
            self.column_scroll = 0;
        } else if caret < self.column_scroll {
            self.column_scroll = caret;
        } else if caret >= self.column_scroll + width {
            self.column_scroll = caret + 1 - width;
        }
    }
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Terminal cells taken by the first `offset` characters of `text`
fn display_column(text: &str, offset: usize) -> usize {
    text.chars().take(offset).map(char_width).sum()
}

/// Character offset of the cell at display column `column`; past the end is the end
fn offset_at_column(text: &str, column: usize) -> usize {
    let mut start = 0;
    for (offset, c) in text.chars().enumerate() {
        let end = start + char_width(c);
        if column < end {
            return offset;
        }
        start = end;
    }
    text.chars().count()
}

/// `text` with its first `from` display columns cut off; a wide character
/// split by the cut leaves blank cells
fn clip_columns(text: &str, from: usize) -> String {
    let mut clipped = String::new();
    let mut column = 0;
    for c in text.chars() {
        let width = char_width(c);
        if column >= from {
            clipped.push(c);
        } else if column + width > from {
            clipped.extend(std::iter::repeat_n(' ', column + width - from));
        }
        column += width;
    }
    clipped
}

fn insert_char(text: &str, offset: usize, c: char) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    chars.insert(offset.min(chars.len()), c);
    chars.into_iter().collect()
}

fn remove_char(text: &str, offset: usize) -> Option<String> {
    let mut chars: Vec<char> = text.chars().collect();
    if offset >= chars.len() {
        return None;
    }
    chars.remove(offset);
    Some(chars.into_iter().collect())
}

fn init_logging(config: &Config) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&config.log_level);
    // RUST_LOG still wins over the configured level
    builder.parse_env(env_logger::Env::default());

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };

    init_logging(&config)?;
    log::info!("starting with history limit {:?}", config.history_limit());

    let doc = match config.history_limit() {
        Some(limit) => DocumentStore::with_history_limit(limit),
        None => DocumentStore::new(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(doc);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) => {
                if app.handle_key(key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let snapshot = app.doc.snapshot();
    let panel = Block::default().borders(Borders::ALL).title(format!(
        "Blocks: {} | version {}",
        snapshot.blocks.len(),
        snapshot.version
    ));
    let inner = panel.inner(chunks[0]);
    app.blocks_area = inner;
    let height = usize::from(inner.height);
    let width = usize::from(inner.width);
    app.scroll_to_active(height);

    let caret_column = snapshot
        .active_block()
        .map(|block| display_column(&block.text, block.cursor_position));
    if let Some(caret) = caret_column {
        app.scroll_to_caret(caret, width);
    }

    let lines: Vec<Line> = snapshot
        .blocks
        .iter()
        .skip(app.scroll)
        .take(height)
        .map(|block| {
            let style = if block.active {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let text = if block.active {
                clip_columns(&block.text, app.column_scroll)
            } else {
                block.text.clone()
            };
            Line::from(vec![Span::styled(text, style)]).style(style)
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(panel), chunks[0]);

    // Terminal cursor sits at the active block's caret
    if let Some(index) = snapshot.blocks.iter().position(|block| block.active)
        && index >= app.scroll
        && index - app.scroll < height
        && let Some(caret) = caret_column
    {
        let column = u16::try_from(caret.saturating_sub(app.column_scroll))
            .unwrap_or(u16::MAX)
            .min(inner.width.saturating_sub(1));
        let row = u16::try_from(index - app.scroll).unwrap_or(0);
        f.set_cursor_position(Position::new(inner.x + column, inner.y + row));
    }

    // Instructions
    let mut help = vec![Span::raw(
        "Ctrl+Q/Esc: Quit | Ctrl+Z: Undo | Ctrl+Y: Redo | Enter: Split | click below: New block",
    )];
    if !app.status.is_empty() {
        help.push(Span::styled(
            format!(" | {}", app.status),
            Style::default().fg(Color::Red),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(help)), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;

    /// Draw `app` into a `width` x `height` test terminal; returns the terminal cursor
    fn draw(app: &mut App, width: u16, height: u16) -> (Terminal<TestBackend>, Position) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();
        (terminal, cursor)
    }

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) -> bool {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn texts(app: &App) -> Vec<&str> {
        app.doc.state().texts()
    }

    fn offset(app: &App) -> usize {
        app.doc.caret().map_or(0, |caret| caret.offset)
    }

    #[test]
    fn test_typing_moves_caret_in_characters() {
        let mut app = App::new(DocumentStore::new());

        type_str(&mut app, "héllo");

        assert_eq!(texts(&app), vec!["héllo"]);
        assert_eq!(offset(&app), 5);
    }

    #[test]
    fn test_enter_splits_and_backspace_joins() {
        let mut app = App::new(DocumentStore::new());
        type_str(&mut app, "hello world");
        press(&mut app, KeyCode::Home);
        for _ in 0..5 {
            press(&mut app, KeyCode::Right);
        }

        press(&mut app, KeyCode::Enter);
        assert_eq!(texts(&app), vec!["hello", " world"]);
        assert_eq!(offset(&app), 0);

        press(&mut app, KeyCode::Backspace);
        assert_eq!(texts(&app), vec!["hello world"]);
        assert_eq!(offset(&app), 5);
    }

    #[test]
    fn test_backspace_and_delete_inside_text_edit_characters() {
        let mut app = App::new(DocumentStore::new());
        type_str(&mut app, "abcd");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);

        press(&mut app, KeyCode::Backspace);
        assert_eq!(texts(&app), vec!["acd"]);
        assert_eq!(offset(&app), 1);

        press(&mut app, KeyCode::Delete);
        assert_eq!(texts(&app), vec!["ad"]);
        assert_eq!(offset(&app), 1);
    }

    #[test]
    fn test_delete_at_end_with_no_next_block_does_nothing() {
        let mut app = App::new(DocumentStore::new());
        type_str(&mut app, "end");
        let version = app.doc.version();

        press(&mut app, KeyCode::Delete);

        assert_eq!(texts(&app), vec!["end"]);
        assert_eq!(app.doc.version(), version);
        assert!(app.status.is_empty());
    }

    #[test]
    fn test_undo_and_redo_shortcuts() {
        let mut app = App::new(DocumentStore::new());
        type_str(&mut app, "ab");

        assert!(!ctrl(&mut app, 'z'));
        assert_eq!(texts(&app), vec!["a"]);

        assert!(!ctrl(&mut app, 'y'));
        assert_eq!(texts(&app), vec!["ab"]);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(DocumentStore::new());

        assert!(ctrl(&mut app, 'q'));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
    }

    #[test]
    fn test_click_below_blocks_appends_and_click_on_block_focuses() {
        let mut app = App::new(DocumentStore::new());
        type_str(&mut app, "first");
        app.blocks_area = Rect::new(1, 1, 40, 10);

        app.click(5, 6);
        assert_eq!(texts(&app), vec!["first", ""]);
        let appended = app.doc.nodes()[1].id();
        assert_eq!(app.doc.active(), Some(appended));

        app.click(3, 1);
        let first = app.doc.nodes()[0].id();
        assert_eq!(app.doc.caret(), Some(Caret::new(first, 2)));
    }

    #[test]
    fn test_click_outside_panel_is_ignored() {
        let mut app = App::new(DocumentStore::new());
        app.blocks_area = Rect::new(1, 1, 40, 10);

        app.click(0, 0);

        assert_eq!(app.doc.len(), 1);
    }

    #[test]
    fn test_scroll_follows_active_block() {
        let mut app = App::new(DocumentStore::new());
        for _ in 0..5 {
            press(&mut app, KeyCode::Enter);
        }

        app.scroll_to_active(3);
        assert_eq!(app.scroll, 3);

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        app.scroll_to_active(3);
        assert_eq!(app.scroll, 2);
    }

    #[test]
    fn test_char_helpers_clamp() {
        assert_eq!(insert_char("ab", 10, 'c'), "abc");
        assert_eq!(remove_char("ab", 2), None);
        assert_eq!(remove_char("🦀x", 0), Some("x".to_string()));
    }

    #[test]
    fn test_alt_chords_do_not_type() {
        let mut app = App::new(DocumentStore::new());

        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));

        assert_eq!(texts(&app), vec![""]);
        assert_eq!(app.doc.version(), 0);
    }

    #[test]
    fn test_caret_is_drawn_after_wide_characters() {
        let mut app = App::new(DocumentStore::new());
        type_str(&mut app, "世界");

        let (_, cursor) = draw(&mut app, 40, 10);

        // Two double-width characters fill cells 1..5 inside the border
        assert_eq!(offset(&app), 2);
        assert_eq!(cursor, Position::new(5, 1));
    }

    #[test]
    fn test_click_on_wide_character_lands_before_it() {
        let mut app = App::new(DocumentStore::new());
        type_str(&mut app, "世界");
        draw(&mut app, 40, 10);

        // Either cell of 界 puts the caret between the two characters
        app.click(3, 1);
        assert_eq!(offset(&app), 1);
        app.click(4, 1);
        assert_eq!(offset(&app), 1);

        app.click(2, 1);
        assert_eq!(offset(&app), 0);
        app.click(30, 1);
        assert_eq!(offset(&app), 2);
    }

    #[test]
    fn test_long_line_scrolls_to_keep_caret_visible() {
        let mut app = App::new(DocumentStore::new());
        type_str(&mut app, &"a".repeat(45));
        type_str(&mut app, "xyz");

        // Inner width is 38: the caret at column 48 shows in the last cell
        let (terminal, cursor) = draw(&mut app, 40, 10);
        assert_eq!(app.column_scroll, 11);
        assert_eq!(cursor, Position::new(38, 1));
        assert!(row_text(&terminal, 1).contains("axyz "));

        // Clicking the first visible cell maps through the scroll offset
        app.click(1, 1);
        assert_eq!(offset(&app), 11);

        press(&mut app, KeyCode::Home);
        let (_, cursor) = draw(&mut app, 40, 10);
        assert_eq!(app.column_scroll, 0);
        assert_eq!(cursor, Position::new(1, 1));
    }

    #[test]
    fn test_width_helpers() {
        assert_eq!(display_column("a世b", 2), 3);
        assert_eq!(offset_at_column("a世b", 2), 1);
        assert_eq!(offset_at_column("a世b", 3), 2);
        assert_eq!(clip_columns("a世b", 2), " b");
        assert_eq!(clip_columns("a世b", 1), "世b");
    }
}
