use crate::error::{CatalogError, Result};
use crate::loader::LoaderHandle;
use crate::source::CsvSource;
use crate::tui::search::SearchState;
use crate::tui::table::TableState;
use crate::tui::ui;
use crate::view::{Action, ViewState};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub struct App {
    // Data
    pub view: ViewState,

    // Sub-states
    pub search: SearchState,
    pub table: TableState,

    pub status_message: String,

    // Background fetches; dropped (and so cancelled) with the app
    loader: Option<LoaderHandle>,
    source: Option<Arc<dyn CsvSource>>,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(loader: LoaderHandle, source: Arc<dyn CsvSource>) -> Self {
        Self {
            loader: Some(loader),
            source: Some(source),
            ..Self::with_state(ViewState::default())
        }
    }

    /// App over a fixed state with no background loading
    pub fn with_state(view: ViewState) -> Self {
        let mut app = Self {
            view,
            search: SearchState::default(),
            table: TableState::default(),
            status_message: "Ready".to_string(),
            loader: None,
            source: None,
            should_quit: false,
        };
        app.table.select_first(app.view.page().rows.len());
        app
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal
                .draw(|frame| ui::draw(frame, self))
                .map_err(|e| CatalogError::Terminal(e.to_string()))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.process_messages();
                last_tick = Instant::now();
            }

            if self.should_quit {
                if let Some(loader) = self.loader.take() {
                    loader.cancel();
                }
                return Ok(());
            }
        }
    }

    /// Apply finished fetches
    fn process_messages(&mut self) {
        let actions = match &self.loader {
            Some(loader) => loader.try_actions(),
            None => return,
        };

        for action in actions {
            self.dispatch(action);
        }

        if !self.view.is_loading() {
            self.status_message = format!("{} documents", self.view.dataset.len());
        }
    }

    /// Run an action through the reducer and keep the selection on the page
    pub fn dispatch(&mut self, action: Action) {
        let page_changed = matches!(
            action,
            Action::SetQuery(_) | Action::SetPage(_) | Action::NextPage | Action::PreviousPage
        );

        let view = std::mem::take(&mut self.view);
        self.view = view.reduce(action);

        let rows = self.view.page().rows.len();
        if page_changed || self.table.selected.is_none() {
            self.table.select_first(rows);
        } else {
            self.table.clamp(rows);
        }
    }

    fn next_page(&mut self) {
        if self.view.page().has_next() {
            self.dispatch(Action::NextPage);
        }
    }

    fn previous_page(&mut self) {
        if self.view.page().has_previous() {
            self.dispatch(Action::PreviousPage);
        }
    }

    fn query_changed(&mut self) {
        self.dispatch(Action::SetQuery(self.search.query.clone()));
    }

    /// Link target of the selected row, resolved against the data source
    pub fn selected_link(&self) -> Option<String> {
        let page = self.view.page();
        let record = page.rows.get(self.table.selected?)?;
        if record.path.is_empty() {
            return None;
        }
        Some(match &self.source {
            Some(source) => source.locate(&record.path),
            None => record.path.clone(),
        })
    }

    fn open_selected(&mut self) {
        let Some(link) = self.selected_link() else {
            return;
        };

        match open::that_detached(&link) {
            Ok(()) => {
                info!(%link, "opened document");
                self.status_message = format!("Opened {}", link);
            }
            Err(e) => {
                warn!(%link, error = %e, "failed to open document");
                self.status_message = format!("Could not open {}", link);
            }
        }
    }

    fn copy_selected(&mut self) {
        let Some(link) = self.selected_link() else {
            return;
        };

        match copy_to_clipboard(&link) {
            Ok(()) => self.status_message = format!("Copied {}", link),
            Err(e) => {
                warn!(error = %e, "clipboard unavailable");
                self.status_message = e.to_string();
            }
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Global keys
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                if self.search.focused && self.search.clear() {
                    self.query_changed();
                } else if self.search.focused {
                    self.search.focused = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            KeyCode::PageDown => {
                self.next_page();
                return;
            }
            KeyCode::PageUp => {
                self.previous_page();
                return;
            }
            _ => {}
        }

        if self.search.focused {
            self.handle_search_key(key);
        } else {
            self.handle_table_key(key);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let changed = match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert(c)
            }
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Left => {
                self.search.move_left();
                false
            }
            KeyCode::Right => {
                self.search.move_right();
                false
            }
            KeyCode::Home => {
                self.search.home();
                false
            }
            KeyCode::End => {
                self.search.end();
                false
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
                self.search.focused = false;
                false
            }
            _ => false,
        };

        if changed {
            self.query_changed();
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        let rows = self.view.page().rows.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.select_prev(rows),
            KeyCode::Down | KeyCode::Char('j') => self.table.select_next(rows),
            KeyCode::Home => self.table.select_first(rows),
            KeyCode::End => self.table.select_last(rows),

            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('<') => self.previous_page(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('>') => self.next_page(),

            KeyCode::Enter | KeyCode::Char('o') => self.open_selected(),
            KeyCode::Char('y') => self.copy_selected(),

            KeyCode::Tab | KeyCode::Char('/') => {
                self.search.focused = true;
            }

            // Typing from the table starts a search
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.focused = true;
                self.search.end();
                self.search.insert(c);
                self.query_changed();
            }

            _ => {}
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| CatalogError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| CatalogError::Clipboard(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::view::DatasetKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_docs(n: usize) -> App {
        let records = (1..=n)
            .map(|i| Record::new(format!("Doc{}", i), format!("/pdf/doc{}.pdf", i), ""))
            .collect();
        let view = ViewState::default()
            .reduce(Action::DatasetLoaded {
                kind: DatasetKind::Initial,
                records: Arc::new(records),
            })
            .reduce(Action::LoadFailed {
                kind: DatasetKind::All,
            });
        App::with_state(view)
    }

    #[test]
    fn typing_filters_and_resets_page() {
        let mut app = app_with_docs(25);
        app.search.focused = false;
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.view.current_page, 3);

        app.handle_key(key(KeyCode::Char('/')));
        for c in "doc2".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.view.current_page, 1);
        assert_eq!(app.view.query, "doc2");
        // Doc2, Doc20..Doc25
        assert_eq!(app.view.page().total, 7);
    }

    #[test]
    fn next_is_ignored_on_last_page() {
        let mut app = app_with_docs(12);
        app.search.focused = false;
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.view.current_page, 2);

        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.view.current_page, 1);
    }

    #[test]
    fn esc_clears_query_then_unfocuses_then_quits() {
        let mut app = app_with_docs(3);
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.view.query, "x");

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.view.query, "");
        assert!(app.search.focused);

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.search.focused);
        assert!(!app.should_quit);

        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn selected_link_follows_selection() {
        let mut app = app_with_docs(3);
        app.search.focused = false;
        assert_eq!(app.selected_link().as_deref(), Some("/pdf/doc1.pdf"));

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_link().as_deref(), Some("/pdf/doc2.pdf"));
    }

    #[test]
    fn selection_cleared_on_empty_page() {
        let mut app = app_with_docs(3);
        for c in "nothing".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.table.selected, None);
        assert!(app.selected_link().is_none());
    }
}
