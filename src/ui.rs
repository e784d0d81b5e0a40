use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, Focus, Prompt, TextField};

const TITLE: &str = "BrowserSelector";

pub fn render(app: &App, f: &mut Frame) {
    let [menu, url, list, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_menu(f, menu);
    render_url(app, f, url);
    render_list(app, f, list);
    render_status(app, f, status);

    if let Some(prompt) = &app.prompt {
        render_prompt(prompt, f, f.area());
    }
}

fn key_hint(key: &str, label: &str) -> [Span<'static>; 2] {
    [
        Span::styled(format!(" {key}"), Style::new().fg(Color::Yellow).bold()),
        Span::styled(format!(" {label} "), Style::new().fg(Color::Gray)),
    ]
}

fn render_menu(f: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {TITLE} "),
        Style::new().fg(Color::Black).bg(Color::Cyan).bold(),
    )];
    for (key, label) in [
        ("F2", "Add Browser"),
        ("F8", "Remove"),
        ("F5", "Open Config Directory"),
        ("F6", "Set as Default Browser"),
        ("Esc", "Exit"),
    ] {
        spans.extend(key_hint(key, label));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::new().bg(Color::DarkGray)),
        area,
    );
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::new().fg(Color::DarkGray)
    }
}

fn render_url(app: &App, f: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Url && app.prompt.is_none();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" URL ")
        .title_bottom(Line::from(key_hint("Enter", "Go").to_vec()).right_aligned())
        .border_style(border_style(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);
    render_field(&app.url, f, inner, focused);
}

/// Draw a text field, scrolled so the cursor stays visible.
fn render_field(field: &TextField, f: &mut Frame, area: Rect, focused: bool) {
    let width = area.width.max(1) as usize;
    let offset = field.cursor().saturating_sub(width - 1);
    let visible: String = field.value().chars().skip(offset).take(width).collect();

    let style = if field.is_selected() {
        Style::new().reversed()
    } else {
        Style::new()
    };
    f.render_widget(Paragraph::new(Span::styled(visible, style)), area);

    if focused {
        let x = area.x + (field.cursor() - offset) as u16;
        f.set_cursor_position((x, area.y));
    }
}

fn render_list(app: &App, f: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::List && app.prompt.is_none();
    let items: Vec<ListItem> = app
        .config
        .browsers
        .iter()
        .map(|b| {
            ListItem::new(Line::from(vec![
                Span::raw(b.name.clone()),
                Span::styled(format!("  {}", b.path), Style::new().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Browsers ")
        .border_style(border_style(focused));

    if items.is_empty() {
        let hint = Paragraph::new(Line::from(vec![
            Span::styled("No browsers configured. Press ", Style::new().fg(Color::Gray)),
            Span::styled("F2", Style::new().fg(Color::Yellow).bold()),
            Span::styled(" to add one.", Style::new().fg(Color::Gray)),
        ]))
        .block(block);
        f.render_widget(hint, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::new().bg(Color::Blue).fg(Color::White).bold())
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(app.cursor);
    f.render_stateful_widget(list, area, &mut state);
}

fn render_status(app: &App, f: &mut Frame, area: Rect) {
    let line = match &app.status {
        Some(message) => Line::from(Span::styled(
            format!(" {message}"),
            Style::new().fg(Color::Yellow),
        )),
        None => {
            let mut spans = Vec::new();
            for (key, label) in [
                ("Tab", "switch focus"),
                ("↑↓", "select"),
                ("Ctrl-G", "go"),
                ("Ctrl-U", "clear URL"),
            ] {
                spans.extend(key_hint(key, label));
            }
            Line::from(spans)
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_prompt(prompt: &Prompt, f: &mut Frame, area: Rect) {
    let (title, label, field) = match prompt {
        Prompt::Path(field) => (" Select Browser ", "Executable path or command:", field),
        Prompt::Name { name, .. } => (" Browser Name ", "Browser name:", name),
    };

    let width = area.width.saturating_sub(4).min(70);
    let height = 5u16.min(area.height);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };
    f.render_widget(Clear, popup);

    let mut hints = key_hint("Enter", "OK").to_vec();
    hints.extend(key_hint("Esc", "Cancel"));
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(Line::from(hints).centered())
        .border_style(border_style(true));
    f.render_widget(block, popup);

    let inner = popup.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    let [label_area, field_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);
    f.render_widget(Paragraph::new(label).fg(Color::Gray), label_area);
    render_field(field, f, field_area, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BrowserEntry, Config};
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|f| render(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_url_and_browsers() {
        let config = Config {
            last_used: 0,
            browsers: vec![BrowserEntry {
                name: "Firefox".to_string(),
                path: "/usr/bin/firefox".to_string(),
                args: vec![],
            }],
        };
        let app = App::new(config, "config.json".into(), "https://example.org");
        let text = screen(&app);
        assert!(text.contains("https://example.org"));
        assert!(text.contains("Firefox"));
        assert!(text.contains(TITLE));
    }

    #[test]
    fn test_renders_empty_hint() {
        let app = App::new(Config::default(), "config.json".into(), "");
        assert!(screen(&app).contains("No browsers configured"));
    }
}
