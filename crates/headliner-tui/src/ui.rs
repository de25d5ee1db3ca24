// UI rendering logic
use crate::{App, InputMode, Tab};
use headliner_core::ListItemViewModel;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let screen_height = frame.area().height;

    // Search box only makes sense on the News tab
    let constraints = if app.tab == Tab::News {
        vec![
            Constraint::Length(3.min(screen_height / 6)), // Tabs
            Constraint::Length(3.min(screen_height / 8)), // Search input
            Constraint::Min(5),                           // Main content
            Constraint::Length(1),                        // Status bar
        ]
    } else {
        vec![
            Constraint::Length(3.min(screen_height / 6)),
            Constraint::Min(5),
            Constraint::Length(1),
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    let (content_area, status_area) = if app.tab == Tab::News {
        render_search_input(frame, app, chunks[1]);
        (chunks[2], chunks[3])
    } else {
        (chunks[1], chunks[2])
    };

    // Adaptive split: on narrow screens, give more space to the list
    let (list_pct, preview_pct) = if frame.area().width < 100 {
        (60, 40)
    } else {
        (50, 50)
    };

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(list_pct),
            Constraint::Percentage(preview_pct),
        ])
        .split(content_area);

    match app.tab {
        Tab::News => {
            render_news_list(frame, app, content_chunks[0]);
            let selected = app.selected_news().and_then(|i| app.news.list().get(i).cloned());
            let source = app
                .selected_news()
                .and_then(|i| app.news.list().article_at(i))
                .map(|a| (a.source_name.clone(), a.published_display()));
            render_preview(frame, selected.as_ref(), source, content_chunks[1]);
        }
        Tab::Favorites => {
            if app.favorites.show_placeholder() {
                render_favorites_placeholder(frame, content_area);
            } else {
                render_favorites_list(frame, app, content_chunks[0]);
                let selected = app.selected_favorite().and_then(|i| {
                    app.favorites.with_list(|list| list.get(i).cloned())
                });
                render_preview(frame, selected.as_ref(), None, content_chunks[1]);
            }
        }
    }

    render_status_bar(frame, app, status_area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec![
        Line::from(format!(" News ({}) ", app.news.list().len())),
        Line::from(format!(" Favorites ({}) ", app.favorites.len())),
    ];
    let selected = match app.tab {
        Tab::News => 0,
        Tab::Favorites => 1,
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Headliner "))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let input_style = match app.input_mode {
        InputMode::Searching => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default(),
    };

    let input = Paragraph::new(app.search_input.as_str())
        .style(input_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search for a topic (/ to search, ESC to cancel)")
                .border_style(input_style),
        );

    frame.render_widget(input, area);

    if app.input_mode == InputMode::Searching {
        frame.set_cursor_position((
            area.x + app.search_input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}

/// Two or three lines per row: title, subtitle, action hint
fn row_item(vm: &ListItemViewModel, max_len: usize) -> ListItem<'static> {
    let title = Line::from(Span::styled(
        truncate(&vm.title, max_len),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));

    let subtitle = Line::from(Span::styled(
        format!(
            "  {}",
            truncate(vm.subtitle.as_deref().unwrap_or("No description"), max_len)
        ),
        Style::default().fg(Color::Rgb(105, 105, 105)),
    ));

    let action_color = match vm.mode {
        headliner_core::DisplayMode::News => Color::Green,
        headliner_core::DisplayMode::Favorites => Color::Red,
    };
    let action = Line::from(Span::styled(
        format!("  [{}]", vm.action_label()),
        Style::default().fg(action_color),
    ));

    ListItem::new(vec![title, subtitle, action])
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn render_news_list(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.news.list().is_empty() && app.is_loading() {
        let loading = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Loading headlines...",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title(" News "))
        .alignment(Alignment::Center);

        frame.render_widget(loading, area);
        return;
    }

    let max_len = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = app
        .news
        .list()
        .view_models()
        .iter()
        .map(|vm| row_item(vm, max_len))
        .collect();

    let title = if app.is_loading() {
        format!(" News ({}) - refreshing ", items.len())
    } else {
        format!(" News ({}) ", items.len())
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    frame.render_stateful_widget(list, area, &mut app.news_state);
}

fn render_favorites_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let max_len = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = app.favorites.with_list(|list| {
        list.view_models()
            .iter()
            .map(|vm| row_item(vm, max_len))
            .collect()
    });

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Favorites ({}) ", app.favorites.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    frame.render_stateful_widget(list, area, &mut app.favorites_state);
}

fn render_favorites_placeholder(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "No favorites yet",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press f on a story in the News tab to keep it here",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Favorites "))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_preview(
    frame: &mut Frame,
    vm: Option<&ListItemViewModel>,
    source: Option<(String, String)>,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(" Preview ");

    let Some(vm) = vm else {
        frame.render_widget(Paragraph::new("Nothing selected").block(block), area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            vm.title.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some((name, published)) = source {
        lines.push(Line::from(vec![
            Span::styled(name, Style::default().fg(Color::Magenta)),
            Span::raw("  "),
            Span::styled(published, Style::default().fg(Color::DarkGray)),
        ]));
        lines.push(Line::from(""));
    }

    if let Some(subtitle) = &vm.subtitle {
        lines.push(Line::from(subtitle.clone()));
        lines.push(Line::from(""));
    }

    let image_line = match (&vm.image_data, &vm.image_url) {
        (Some(bytes), _) => format!("Image: {:.1} KB", bytes.len() as f64 / 1024.0),
        (None, Some(_)) => "Image: loading...".to_string(),
        (None, None) => "Image: none".to_string(),
    };
    lines.push(Line::from(Span::styled(image_line, Style::default().fg(Color::DarkGray))));

    if let Some(page) = &vm.page_url {
        lines.push(Line::from(Span::styled(
            page.clone(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = &app.error_message {
        Span::styled(error.clone(), Style::default().fg(Color::Red))
    } else {
        match (app.input_mode, app.tab) {
            (InputMode::Searching, _) => Span::styled(
                "SEARCH MODE | ENTER: search | ESC: back to top stories",
                Style::default().fg(Color::Yellow),
            ),
            (InputMode::Normal, Tab::News) => Span::raw(format!(
                "{} | j/k: navigate | /: search | r: refresh | f: favorite | ENTER: open | TAB: favorites | q: quit",
                app.status_message.as_deref().unwrap_or("News")
            )),
            (InputMode::Normal, Tab::Favorites) => Span::raw(format!(
                "{} | j/k: navigate | d: remove | ENTER: open | TAB: news | q: quit",
                app.status_message.as_deref().unwrap_or("Favorites")
            )),
        }
    };

    frame.render_widget(Paragraph::new(Line::from(status)), area);
}
