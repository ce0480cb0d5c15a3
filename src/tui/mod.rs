//! Interactive terminal view

pub mod app;
pub mod search;
pub mod table;
pub mod ui;

use crate::error::Result;
use crate::AppConfig;
use app::App;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use tracing::info;

/// Entry point: start both fetches and run the view until the user quits
pub fn run(config: &AppConfig) -> Result<()> {
    let source = config.source()?;
    let loader = config.loader_for(source.clone()).spawn()?;
    info!(location = ?config.location, "starting catalog view");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new(loader, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
