use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const KEY_WIDTH: usize = 12;

fn bind(key: &str, text: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("{key:<width$}", width = KEY_WIDTH),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw(text),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        bind("q / Ctrl-C", "Quit (q only from the list)"),
        bind("tab", "Next panel (shift-tab: previous)"),
        bind("?", "Show this help"),
        Line::from(""),
        Line::from("Todo list:"),
        bind("↑/↓ or j/k", "Navigate"),
        bind("e", "Edit selected"),
        bind("d", "Delete selected"),
        bind("r", "Refresh from server"),
        bind("n", "New todo"),
        bind("/", "Search by ID"),
        bind("Esc", "Cancel edit / dismiss message"),
        Line::from(""),
        Line::from("Form and search:"),
        bind("Enter", "Add / Update (search: Get)"),
        bind("space", "Toggle Completed"),
        bind("Esc", "Cancel edit and return to the list"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
