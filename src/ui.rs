use crossterm::event::{self, Event};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

use crate::app::{App, AppAction, Focus};
use crate::task::{Task, DUE_DATE_FORMAT};

const PENDING_COLOR: Color = Color::Rgb(0xFF, 0xA5, 0x00);
const COMPLETED_COLOR: Color = Color::Rgb(0x4C, 0xAF, 0x50);

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if app.handle_key(key) == AppAction::Quit {
                return Ok(());
            }
        }
    }
}

pub fn draw(f: &mut Frame<'_>, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(f.area());

    draw_left(f, columns[0], app);
    draw_right(f, columns[1], app);

    if let Some(message) = app.error() {
        draw_error_popup(f, message);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_left(f: &mut Frame<'_>, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Min(4),
        ])
        .split(area);

    let form = &app.form;
    draw_input(f, chunks[0], "Task Title", &form.title, "", app.focus() == Focus::Title);
    draw_input(
        f,
        chunks[1],
        "Task Description",
        &form.description,
        "",
        app.focus() == Focus::Description,
    );
    draw_input(
        f,
        chunks[2],
        "Due Date",
        &form.due_date,
        "YYYY-MM-DD",
        app.focus() == Focus::DueDate,
    );

    let priority = Paragraph::new(Line::from(vec![
        Span::raw("< "),
        Span::styled(form.priority.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" >"),
    ]))
    .block(
        Block::default()
            .title("Priority")
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus() == Focus::Priority)),
    );
    f.render_widget(priority, chunks[3]);

    let hint = if app.focus().is_form() {
        "Enter: Add Task  Tab: next field  Esc: quit"
    } else {
        "Enter/c: Complete  Up/Down: select  Tab: next  q: quit"
    };
    f.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        chunks[4],
    );

    let store = app.store();
    draw_task_list(
        f,
        chunks[5],
        "Pending Tasks",
        store.pending(),
        app.pending_selected(),
        app.focus() == Focus::Pending,
    );
    draw_task_list(
        f,
        chunks[6],
        "Completed Tasks",
        store.completed(),
        app.completed_selected(),
        app.focus() == Focus::Completed,
    );
}

fn draw_input(f: &mut Frame<'_>, area: Rect, title: &str, value: &str, placeholder: &str, focused: bool) {
    let text = if value.is_empty() {
        Span::styled(placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value)
    };
    let input = Paragraph::new(Line::from(text)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(focus_style(focused)),
    );
    f.render_widget(input, area);

    if focused {
        let width = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(width);
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn task_line(task: &Task) -> Line<'_> {
    let status_color = if task.is_pending() {
        PENDING_COLOR
    } else {
        COMPLETED_COLOR
    };
    Line::from(vec![
        Span::styled(&task.title, Style::default().fg(Color::White)),
        Span::raw(format!(
            " - Due: {} - Priority: {} ",
            task.due_date.format(DUE_DATE_FORMAT),
            task.priority
        )),
        Span::styled(
            format!("Status: {}", task.status()),
            Style::default().fg(status_color),
        ),
    ])
}

fn draw_task_list<'a>(
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    tasks: impl Iterator<Item = &'a Task>,
    selected: usize,
    focused: bool,
) {
    let items: Vec<ListItem<'_>> = tasks.map(|t| ListItem::new(task_line(t))).collect();
    let mut state = ListState::default();
    if focused && !items.is_empty() {
        state.select(Some(selected.min(items.len() - 1)));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(focus_style(focused)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_right(f: &mut Frame<'_>, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(8), Constraint::Length(1)])
        .split(area);

    let stats = app.store().statistics();
    let labels = Paragraph::new(vec![
        Line::from(format!("Total Tasks: {}", stats.total)),
        Line::from(format!("Pending Tasks: {}", stats.pending)),
        Line::from(format!("Completed Tasks: {}", stats.completed)),
    ])
    .block(Block::default().title("Statistics").borders(Borders::ALL));
    f.render_widget(labels, chunks[0]);

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title("Tasks by Priority and Status")
                .borders(Borders::ALL),
        )
        .bar_width(5)
        .bar_gap(1)
        .group_gap(3);
    for (priority, counts) in app.store().chart_counts().iter() {
        let bars = [
            Bar::default()
                .value(counts.pending as u64)
                .style(Style::default().fg(PENDING_COLOR)),
            Bar::default()
                .value(counts.completed as u64)
                .style(Style::default().fg(COMPLETED_COLOR)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(priority.as_str()))
                .bars(&bars),
        );
    }
    f.render_widget(chart, chunks[1]);

    let legend = Line::from(vec![
        Span::styled("■ Pending", Style::default().fg(PENDING_COLOR)),
        Span::raw("  "),
        Span::styled("■ Completed", Style::default().fg(COMPLETED_COLOR)),
        Span::styled("   y: Number of Tasks", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(legend), chunks[2]);
}

fn draw_error_popup(f: &mut Frame<'_>, message: &str) {
    let area = centered(f.area(), 50, 5);
    let popup = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title("Error")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
