use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout as Split},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use std::io::{self, Stdout};

use stmtx_core::{Column, Layout, Transaction};
use stmtx_export::{Page, Paginator};

fn column_width(column: Column) -> Constraint {
    match column {
        Column::Date => Constraint::Length(10),
        Column::Time => Constraint::Length(5),
        Column::Currency => Constraint::Length(8),
        Column::Description => Constraint::Min(24),
        Column::ForexAmount => Constraint::Length(12),
        Column::ForexRate => Constraint::Length(10),
        Column::Amount => Constraint::Length(12),
        Column::Type => Constraint::Length(4),
    }
}

/// Credits in green, foreign-currency rows in cyan
fn row_style(txn: &Transaction) -> Style {
    if txn.is_credit() {
        Style::default().fg(Color::Green)
    } else if txn.is_forex() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Plain-text rendering of one page, for `--plain` and non-interactive use.
pub fn render_page(page: &Page<'_, Transaction>, layout: Layout) -> String {
    let columns = layout.columns();
    let cells: Vec<Vec<String>> = std::iter::once(columns.iter().map(|c| c.name().to_string()).collect())
        .chain(
            page.rows
                .iter()
                .map(|row| columns.iter().map(|c| row.field(*c)).collect()),
        )
        .collect();

    let widths: Vec<usize> = (0..columns.len())
        .map(|i| cells.iter().map(|r| r[i].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out.push_str(&page.summary());
    out.push('\n');
    out
}

pub fn run_preview(title: &str, rows: &[Transaction], layout: Layout, pager: Paginator) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = preview_loop(&mut terminal, title, rows, layout, pager);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn preview_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    title: &str,
    rows: &[Transaction],
    layout: Layout,
    pager: Paginator,
) -> Result<()> {
    let columns = layout.columns();
    let mut current = 1;

    loop {
        let page = pager.page(rows, current);

        terminal.draw(|f| {
            let chunks = Split::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Length(3)])
                .split(f.area());

            let header = Row::new(columns.iter().map(|c| Cell::from(c.name()))).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
            let body = page
                .rows
                .iter()
                .map(|txn| Row::new(columns.iter().map(|c| Cell::from(txn.field(*c)))).style(row_style(txn)));
            let table = Table::new(body, columns.iter().map(|c| column_width(*c)))
                .header(header)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("{title} ({} layout)", layout)),
                );
            f.render_widget(table, chunks[0]);

            let footer = Paragraph::new(Line::from(vec![
                Span::raw(page.summary()),
                Span::styled(
                    "   ←/p previous  →/n next  Home/End first/last  q quit",
                    Style::default().fg(Color::Gray),
                ),
            ]))
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(footer, chunks[1]);
        })?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Left | KeyCode::Char('p') => current = page.previous(),
                    KeyCode::Right | KeyCode::Char('n') => current = page.next(),
                    KeyCode::Home => current = 1,
                    KeyCode::End => current = page.total_pages,
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page_aligns_columns() {
        let mut txn = Transaction::new("02/01/2024", "SWIGGY");
        txn.amount = Some(1250.0);
        let rows = vec![txn];
        let page = Paginator::default().page(&rows, 1);

        let text = render_page(&page, Layout::Old);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date        currency  description"));
        assert!(lines[1].starts_with("02/01/2024  INR       SWIGGY"));
        assert!(lines[1].ends_with("1250    Dr"));
        assert_eq!(lines[2], "Page 1 of 1 (rows 1-1 of 1)");
    }

    #[test]
    fn test_row_style_marks_credits_and_forex() {
        let mut txn = Transaction::new("07/01/2024", "SPOTIFY");
        assert_eq!(row_style(&txn), Style::default());

        txn.forex_amount = Some(10.99);
        assert_eq!(row_style(&txn), Style::default().fg(Color::Cyan));

        txn.txn_type = stmtx_core::TxnType::Cr;
        assert_eq!(row_style(&txn), Style::default().fg(Color::Green));
    }
}
