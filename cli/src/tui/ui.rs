use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};
use taskdesk_core::{priority_option, HttpGateway, TaskFilter, TaskStatus};

use crate::tui::app::{App, InputMode, Pane, PendingDelete};

const TASKS_HELP: &str = "j/k: Move | s: Status | a: Add | m: Modify | d: Delete | f: Filter \
    | x: Remove from list | l: Lists | g: Global | r: Refresh | q: Quit";
const LISTS_HELP: &str =
    "j/k: Move | Enter: Open | n: New | e: Rename | d: Delete | r: Reload | Esc: Back | q: Quit";
const FILTER_HELP: &str =
    "st:<status> pri:<0-2|l|m|h> resp:<name> | empty clears | Enter: Apply | Esc: Cancel";
const EDIT_HELP: &str =
    "description pri:<l|m|h> st:<status> resp:<name> list:<id|none> | Enter: Save | Esc: Cancel";

fn color_named(name: &str) -> Color {
    match name {
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "red" => Color::Red,
        _ => Color::Reset,
    }
}

fn status_icon(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "☐",
        TaskStatus::InProgress => "◐",
        TaskStatus::Done => "✔",
    }
}

fn filter_label(filter: &TaskFilter) -> String {
    match filter {
        TaskFilter::Status(status) => format!("status {}", status.label()),
        TaskFilter::Priority(priority) => {
            format!("priority {}", priority_option(*priority).label)
        }
        TaskFilter::Responsible(name) => format!("responsible {}", name),
    }
}

fn rounded(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

pub fn draw<G: HttpGateway + 'static>(f: &mut Frame, app: &mut App<G>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Input / status
            Constraint::Length(1), // Help
        ])
        .split(size);

    let mut title = format!("TASKDESK · {}", app.scope_title());
    if let Some(filter) = &app.view.query().filter {
        title.push_str(&format!(" · filter: {}", filter_label(filter)));
    }
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(rounded(String::new()));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[1]);

    match app.pane {
        Pane::Tasks => {
            draw_task_table(f, app, content_chunks[0]);
            draw_detail_view(f, app, content_chunks[1]);
        }
        Pane::Lists => {
            draw_list_table(f, app, content_chunks[0]);
            draw_list_detail(f, app, content_chunks[1]);
        }
    }

    draw_input_line(f, app, main_chunks[2]);

    let help = match (app.input_mode, app.pane) {
        (InputMode::Normal, Pane::Tasks) => TASKS_HELP,
        (InputMode::Normal, Pane::Lists) => LISTS_HELP,
        (InputMode::Confirm(_), _) => "y: Confirm | any other key: Cancel",
        (InputMode::Filtering, _) => FILTER_HELP,
        _ => EDIT_HELP,
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_task_table<G: HttpGateway + 'static>(f: &mut Frame, app: &mut App<G>, area: Rect) {
    let rows: Vec<Row> = app
        .view
        .rows()
        .iter()
        .map(|task| {
            let option = priority_option(task.priority);
            Row::new(vec![
                Span::raw(status_icon(task.status)),
                Span::styled(option.label, Style::default().fg(color_named(option.color))),
                Span::raw(task.responsible.clone()),
                Span::raw(
                    task.task_list_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Span::styled(
                    task.description.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();

    let title = if app.view.is_loading() {
        " Tasks (loading…) ".to_string()
    } else {
        format!(" Tasks ({}) ", app.view.rows().len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Status
            Constraint::Length(7),  // Priority
            Constraint::Length(14), // Responsible
            Constraint::Length(5),  // List
            Constraint::Min(10),    // Description
        ],
    )
    .header(
        Row::new(vec!["St", "Pri", "Responsible", "List", "Task"])
            .style(Style::default().fg(Color::Yellow)),
    )
    .block(rounded(title))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    if let Some(err) = app.view.last_error() {
        let error = Paragraph::new(err.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(rounded(" Tasks (error) ".to_string()));
        f.render_widget(error, area);
    } else {
        f.render_stateful_widget(table, area, &mut app.task_state);
    }
}

fn draw_detail_view<G: HttpGateway + 'static>(f: &mut Frame, app: &App<G>, area: Rect) {
    let Some(task) = app.selected_task() else {
        f.render_widget(rounded(" Detail ".to_string()), area);
        return;
    };
    let option = priority_option(task.priority);
    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Blue));

    let detail_text = vec![
        Line::from(vec![
            label("Task: "),
            Span::styled(task.description.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("ID: ", Style::default().fg(Color::DarkGray)),
            Span::raw(task.id.map(|id| id.to_string()).unwrap_or_default()),
        ]),
        Line::from(vec![
            label("Status: "),
            Span::raw(format!("{} {}", status_icon(task.status), task.status.label())),
        ]),
        Line::from(vec![
            label("Priority: "),
            Span::styled(option.label, Style::default().fg(color_named(option.color))),
        ]),
        Line::from(vec![label("Responsible: "), Span::raw(task.responsible.as_str())]),
        Line::from(vec![
            label("List: "),
            Span::raw(
                task.task_list_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "none (global)".to_string()),
            ),
        ]),
    ];

    let detail_block = Paragraph::new(detail_text)
        .block(rounded(" Detail ".to_string()))
        .wrap(Wrap { trim: true });
    f.render_widget(detail_block, area);
}

fn draw_list_table<G: HttpGateway + 'static>(f: &mut Frame, app: &mut App<G>, area: Rect) {
    let rows: Vec<Row> = app
        .task_lists
        .iter()
        .map(|list| {
            Row::new(vec![
                list.id.to_string(),
                list.name.clone(),
                list.task_count().map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()),
            ])
        })
        .collect();

    let widths = [Constraint::Length(6), Constraint::Min(10), Constraint::Length(6)];
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Name", "Tasks"]).style(Style::default().fg(Color::Yellow)))
        .block(rounded(format!(" Task lists ({}) ", app.task_lists.len())))
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.list_state);
}

fn draw_list_detail<G: HttpGateway + 'static>(f: &mut Frame, app: &App<G>, area: Rect) {
    let lines: Vec<Line> = match app.selected_list() {
        Some(list) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    list.name.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            for task in list.tasks.iter().flatten() {
                let line = format!("{} {}", status_icon(task.status), task.description);
                lines.push(Line::from(line));
            }
            lines
        }
        None => Vec::new(),
    };
    let detail = Paragraph::new(lines)
        .block(rounded(" List ".to_string()))
        .wrap(Wrap { trim: true });
    f.render_widget(detail, area);
}

fn draw_input_line<G: HttpGateway + 'static>(f: &mut Frame, app: &App<G>, area: Rect) {
    let editing = Style::default().fg(Color::Yellow);
    let (title, text, style) = match app.input_mode {
        InputMode::Normal => (
            " Status ",
            app.message.clone().unwrap_or_default(),
            Style::default().fg(Color::Gray),
        ),
        InputMode::Confirm(PendingDelete::Task(id)) => (
            " Confirm ",
            format!("Delete task {}? (y/N)", id),
            Style::default().fg(Color::Red),
        ),
        InputMode::Confirm(PendingDelete::List(id)) => (
            " Confirm ",
            format!("Delete task list {} and the tasks it owns? (y/N)", id),
            Style::default().fg(Color::Red),
        ),
        InputMode::Adding => (" Add task ", app.input.clone(), editing),
        InputMode::Modifying => (" Modify task ", app.input.clone(), editing),
        InputMode::Filtering => (" Filter ", app.input.clone(), editing),
        InputMode::CreatingList => (" New list name ", app.input.clone(), editing),
        InputMode::RenamingList => (" Rename list ", app.input.clone(), editing),
    };

    let paragraph = Paragraph::new(text).style(style).block(rounded(title.to_string()));
    f.render_widget(paragraph, area);

    if !matches!(app.input_mode, InputMode::Normal | InputMode::Confirm(_)) {
        let offset: u16 = app
            .input
            .chars()
            .take(app.cursor_position)
            .map(|c| unicode_width::UnicodeWidthChar::width(c).unwrap_or(0) as u16)
            .sum();
        f.set_cursor_position((area.x + 1 + offset, area.y + 1));
    }
}
