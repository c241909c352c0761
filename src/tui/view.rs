use super::help::draw_help;
use super::state::{Focus, UiState};
use crate::orchestrator::{FormMode, NotificationKind};
use crate::text_summary::yes_no;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn draw(area: Rect, f: &mut Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Todos"), Line::from("Help")])
        .select(state.tab)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("todo-cli  {}", state.base_url)),
        )
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_todos(chunks[1], f, state),
        _ => draw_help(chunks[1], f),
    }
    draw_status(chunks[2], f, state);
}

fn draw_todos(area: Rect, f: &mut Frame, state: &UiState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(cols[0]);

    draw_form(left[0], f, state);
    draw_search(left[1], f, state);
    draw_list(cols[1], f, state);
}

fn panel(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

/// A labelled single-line input, with a cursor when focused.
fn input_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![
        Span::styled(format!("{label}: "), label_style),
        Span::raw(value.to_string()),
    ];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn key_hint(key: &'static str, text: &'static str) -> Vec<Span<'static>> {
    vec![
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(text),
    ]
}

fn draw_form(area: Rect, f: &mut Frame, state: &UiState) {
    let draft = &state.client.draft;
    let focus = state.focus;
    let (title, action) = match state.client.mode() {
        FormMode::Creating => ("Add Todo".to_string(), "Add"),
        FormMode::Editing(id) => (format!("Edit Todo #{id}"), "Update"),
    };

    let checkbox = if draft.completed { "[x]" } else { "[ ]" };
    let checkbox_style = if focus == Focus::Completed {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut hints = key_hint("Enter", ": ");
    hints.push(Span::raw(action));
    if matches!(state.client.mode(), FormMode::Editing(_)) {
        hints.push(Span::raw("  "));
        hints.extend(key_hint("Esc", ": Cancel"));
    }

    let lines = vec![
        input_line("Title", &draft.title, focus == Focus::Title),
        input_line("Description", &draft.description, focus == Focus::Description),
        Line::from(vec![
            Span::styled(format!("{checkbox} "), checkbox_style),
            Span::raw("Completed"),
        ]),
        Line::from(""),
        Line::from(hints),
    ];

    let focused = matches!(focus, Focus::Title | Focus::Description | Focus::Completed);
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel(title, focused));
    f.render_widget(p, area);
}

fn draw_search(area: Rect, f: &mut Frame, state: &UiState) {
    let focused = state.focus == Focus::Search;
    let mut lines = vec![input_line("ID", &state.client.search_id, focused)];
    lines.push(Line::from(""));

    if let Some(todo) = state.client.search_result.as_ref() {
        lines.push(Line::from(vec![
            Span::styled("ID: ", Style::default().fg(Color::Gray)),
            Span::raw(todo.id.to_string()),
        ]));
        lines.push(Line::from(Span::styled(
            todo.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if !todo.description.is_empty() {
            lines.push(Line::from(todo.description.clone()));
        }
        lines.push(Line::from(format!(
            "Completed: {}",
            yes_no(todo.completed)
        )));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel("Search Todo by ID".to_string(), focused));
    f.render_widget(p, area);
}

fn draw_list(area: Rect, f: &mut Frame, state: &UiState) {
    let focused = state.focus == Focus::List;
    let items: Vec<ListItem> = state
        .client
        .list
        .iter()
        .map(|todo| {
            let done_style = if todo.completed {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            };
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("#{} ", todo.id), Style::default().fg(Color::Cyan)),
                Span::styled(
                    todo.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])];
            if !todo.description.is_empty() {
                lines.push(Line::from(format!("  {}", todo.description)));
            }
            lines.push(Line::from(vec![
                Span::raw("  Completed: "),
                Span::styled(yes_no(todo.completed), done_style),
            ]));
            ListItem::new(lines)
        })
        .collect();

    let title = format!("All Todos ({})", state.client.list.len());
    if items.is_empty() {
        let p = Paragraph::new(Line::from(Span::styled(
            "No todos yet. Press n to add one.",
            Style::default().fg(Color::Gray),
        )))
        .block(panel(title, focused));
        f.render_widget(p, area);
        return;
    }

    let list = List::new(items)
        .block(panel(title, focused))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status(area: Rect, f: &mut Frame, state: &UiState) {
    let mut spans = Vec::new();
    let n = &state.client.notification;
    if n.visible {
        let color = match n.kind {
            NotificationKind::Success => Color::Green,
            NotificationKind::Failure => Color::Red,
            NotificationKind::Hint => Color::Yellow,
        };
        spans.push(Span::styled(n.message.clone(), Style::default().fg(color)));
        spans.push(Span::raw("   "));
    }
    if state.in_flight > 0 {
        spans.push(Span::styled(
            format!("Working… ({} in flight)", state.in_flight),
            Style::default().fg(Color::Magenta),
        ));
        spans.push(Span::raw("   "));
    }
    spans.push(Span::styled(
        match state.last_synced.as_deref() {
            Some(at) => format!("Synced {at}"),
            None => "Not synced".to_string(),
        },
        Style::default().fg(Color::Gray),
    ));
    spans.push(Span::raw("   "));
    spans.extend(key_hint("?", ": help"));

    let p = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, area);
}
