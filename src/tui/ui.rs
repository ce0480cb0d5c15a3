use crate::tui::app::App;
use crate::tui::search::PLACEHOLDER;
use crate::view::Page;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use unicode_width::UnicodeWidthStr;

const HEADER_BG: Color = Color::Rgb(0, 95, 135);

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Full-data loading notice
            Constraint::Length(1), // Pager
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let page = app.view.page();

    draw_search_bar(frame, app, chunks[0]);
    if app.view.loading {
        frame.render_widget(
            Paragraph::new(" Now Loading...").style(Style::default().fg(Color::Yellow)),
            chunks[1],
        );
    } else {
        draw_table(frame, app, &page, chunks[1]);
    }
    if app.view.loading_all_data {
        frame.render_widget(
            Paragraph::new(" Loading all data for search...")
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)),
            chunks[2],
        );
    }
    draw_pager(frame, &page, chunks[3]);
    draw_status_bar(frame, app, &page, chunks[4]);

    if app.search.focused {
        // border (1) + leading space (1)
        let cursor_x = chunks[0].x + 2 + app.search.cursor_width();
        let cursor_y = chunks[0].y + 1;
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search.focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");

    let paragraph = if app.search.query.is_empty() {
        Paragraph::new(format!(" {}", PLACEHOLDER))
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
    } else {
        Paragraph::new(format!(" {}", app.search.query)).style(Style::default().fg(Color::White))
    };

    frame.render_widget(paragraph.block(block), area);
}

fn draw_table(frame: &mut Frame, app: &App, page: &Page<'_>, area: Rect) {
    let header = Row::new(["タイトル", "更新日", "作成日"].map(|name| {
        Cell::from(name).style(
            Style::default()
                .fg(Color::White)
                .bg(HEADER_BG)
                .add_modifier(Modifier::BOLD),
        )
    }))
    .height(1);

    let rows: Vec<Row> = page
        .rows
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let is_selected = !app.search.focused && app.table.selected == Some(i);

            // Zebra striping
            let bg = if is_selected {
                Color::Rgb(60, 60, 80)
            } else if i % 2 == 1 {
                Color::Rgb(25, 25, 35)
            } else {
                Color::Reset
            };

            let title_style = if record.path.is_empty() {
                Style::default().fg(Color::White).bg(bg)
            } else {
                Style::default()
                    .fg(Color::LightBlue)
                    .bg(bg)
                    .add_modifier(Modifier::UNDERLINED)
            };
            let title_style = if is_selected {
                title_style.add_modifier(Modifier::BOLD)
            } else {
                title_style
            };

            Row::new(vec![
                Cell::from(record.title.as_str()).style(title_style),
                Cell::from(record.update_at.as_str()).style(Style::default().fg(Color::Gray).bg(bg)),
                Cell::from(record.create_at.as_str()).style(Style::default().fg(Color::Gray).bg(bg)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(20),
        Constraint::Length(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE));

    frame.render_widget(table, area);
}

fn draw_pager(frame: &mut Frame, page: &Page<'_>, area: Rect) {
    let button = |label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(label, style)
    };

    let line = Line::from(vec![
        Span::raw(" "),
        button(" [<] ", page.has_previous()),
        Span::raw("  "),
        button(" [>] ", page.has_next()),
        Span::raw("  "),
        Span::styled(
            format!("{}/{}", page.current_page, page.max_page()),
            Style::default().fg(Color::Cyan),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, page: &Page<'_>, area: Rect) {
    let left_text = format!(
        " {} matches | {} documents | {}",
        page.total,
        app.view.dataset.len(),
        app.status_message
    );

    let right_text = " Tab:Search  \u{2190}\u{2192}:Page  Enter:Open  y:Copy link  Esc:Quit ";

    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        // Key hints are dropped on narrow terminals
        left_text
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(HEADER_BG));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::view::{Action, DatasetKind, ViewState};
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn render(app: &App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|l| l.contains(needle))
    }

    #[test]
    fn shows_loading_until_initial_data_arrives() {
        let app = App::with_state(ViewState::default());
        let lines = render(&app);
        assert!(contains(&lines, "Now Loading..."));
        assert!(contains(&lines, "Loading all data for search..."));
    }

    #[test]
    fn renders_page_and_pager() {
        let records = (1..=12)
            .map(|i| Record::new(format!("Doc{}", i), format!("/doc{}.pdf", i), ""))
            .collect();
        let view = ViewState::default().reduce(Action::DatasetLoaded {
            kind: DatasetKind::Initial,
            records: Arc::new(records),
        });
        let app = App::with_state(view);
        let lines = render(&app);

        assert!(!contains(&lines, "Now Loading..."));
        assert!(contains(&lines, "Doc10"));
        assert!(!contains(&lines, "Doc11"));
        assert!(contains(&lines, "1/2"));
        assert!(contains(&lines, "Loading all data for search..."));
    }

    #[test]
    fn failed_loads_render_empty_table_without_error() {
        let view = ViewState::default()
            .reduce(Action::LoadFailed {
                kind: DatasetKind::Initial,
            })
            .reduce(Action::LoadFailed {
                kind: DatasetKind::All,
            });
        let app = App::with_state(view);
        let lines = render(&app);

        assert!(!contains(&lines, "Loading"));
        assert!(!contains(&lines, "rror"));
        assert!(contains(&lines, "0 matches"));
    }
}
