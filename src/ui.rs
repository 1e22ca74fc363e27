use crate::app::{App, InputFocus, Message, MessageKind, Mode};
use crate::query::UPCOMING_WINDOW_DAYS;
use crate::task::{TaskRow, DATE_FORMAT};
use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

/// Blocking draw/read loop. All mutation happens through `App::handle_key`
/// on direct user input; there are no timers or background work.
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_table(f, app, chunks[0]);
    render_input_form(f, app, chunks[1]);
    render_footer(f, app, chunks[2]);

    if let Some(rows) = &app.upcoming {
        render_upcoming_popup(f, rows);
    }
    if let Some(message) = &app.message {
        render_message_popup(f, message);
    }
}

fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let today = Local::now().date_naive();

    let rows: Vec<Row> = app
        .store
        .rows_at(today)
        .into_iter()
        .map(|r| {
            let days_style = if r.days_left < 0 {
                Style::default().fg(Color::Red)
            } else if r.days_left <= UPCOMING_WINDOW_DAYS {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(r.description),
                Cell::from(r.due_date.format(DATE_FORMAT).to_string()),
                Cell::from(r.days_left.to_string()).style(days_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(55),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
        ],
    )
    .header(
        Row::new(vec!["Task", "Due Date", "Days Left"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .title("Deadline Reminder")
            .borders(Borders::ALL),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    state.select(app.selected);
    f.render_stateful_widget(table, area, &mut state);
}

fn render_input_form(f: &mut Frame, app: &App, area: Rect) {
    let fields = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let focus_style = Style::default().fg(Color::Cyan);
    let (description_style, date_style) = match app.mode {
        Mode::Editing(InputFocus::Description) => (focus_style, Style::default()),
        Mode::Editing(InputFocus::DueDate) => (Style::default(), focus_style),
        Mode::Normal => (Style::default(), Style::default()),
    };

    let description = Paragraph::new(app.description_input.as_str()).block(
        Block::default()
            .title("Task")
            .borders(Borders::ALL)
            .border_style(description_style),
    );
    let date = Paragraph::new(app.date_input.as_str()).block(
        Block::default()
            .title("Due Date (YYYY-MM-DD)")
            .borders(Borders::ALL)
            .border_style(date_style),
    );

    f.render_widget(description, fields[0]);
    f.render_widget(date, fields[1]);

    // Put the cursor in the focused field while editing.
    if let Mode::Editing(focus) = app.mode {
        let (field, input) = match focus {
            InputFocus::Description => (fields[0], &app.description_input),
            InputFocus::DueDate => (fields[1], &app.date_input),
        };
        f.set_cursor_position((field.x + input.len() as u16 + 1, field.y + 1));
    }
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints = match app.mode {
        Mode::Normal => "a add | d delete | s save | u upcoming | ↑/↓ select | q quit",
        Mode::Editing(_) => "Enter next/confirm | Tab switch field | Esc cancel",
    };
    f.render_widget(
        Paragraph::new(Line::from(hints)).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_message_popup(f: &mut Frame, message: &Message) {
    let (title, color) = match message.kind {
        MessageKind::Info => ("Info", Color::Green),
        MessageKind::Error => ("Error", Color::Red),
    };
    let area = centered_rect(60, 20, f.area());

    let popup = Paragraph::new(message.text.as_str())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn render_upcoming_popup(f: &mut Frame, rows: &[TaskRow]) {
    let area = centered_rect(70, 60, f.area());

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|r| {
            Row::new(vec![
                r.description.clone(),
                r.due_date.format(DATE_FORMAT).to_string(),
                r.days_left.to_string(),
            ])
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Percentage(55),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
        ],
    )
    .header(
        Row::new(vec!["Task", "Due Date", "Days Left"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .title("Upcoming Tasks (Next 7 Days)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(Clear, area);
    f.render_widget(table, area);
}

/// Centered popup rectangle, `percent_x` by `percent_y` of `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
