use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{MessageType, StatusMessage};
use super::layout::{AppLayout, overlay_area};
use crate::browser::{Browser, Overlay, QueryMode, Screen, View};
use crate::models::{Category, PromptSummary, SearchResult};
use crate::utils::{single_line, strip_ansi_codes, truncate_chars};

const TEXT: Color = Color::Rgb(250, 250, 250);
const MUTED: Color = Color::Rgb(113, 113, 122);
const ACCENT: Color = Color::Rgb(16, 185, 129);
const ERROR: Color = Color::Rgb(239, 68, 68);
const BAR: Color = Color::Rgb(24, 24, 27);

/// Longest list-row label before truncation
const ROW_LABEL_CHARS: usize = 60;

/// Everything the renderer reads from the app
pub struct RenderState<'a> {
    pub browser: &'a Browser,
    pub selected_idx: usize,
    pub status_message: Option<&'a StatusMessage>,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState<'_>) {
    let layout = AppLayout::new(frame.area());
    let screen = state.browser.screen();
    let selected = state.selected_idx.min(screen.len().saturating_sub(1));

    render_header(frame, layout.header_area, state.browser);
    render_list(frame, layout.list_area, &screen, selected);
    render_preview(frame, layout.preview_area, &screen, selected);
    render_status_bar(frame, layout.status_area, state, &screen, selected);

    if state.browser.overlay().is_open() {
        render_overlay(frame, overlay_area(frame.area()), state.browser.overlay());
    }
}

fn bordered(title: impl Into<Line<'static>>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED))
        .title(title)
}

fn render_header(frame: &mut Frame, area: Rect, browser: &Browser) {
    let breadcrumb = match browser.view() {
        View::Home => " Catalog ".to_string(),
        View::CategoryDetail(id) => {
            let name = browser.active_category().map_or(id.as_str(), |c| c.name.as_str());
            format!(" Catalog › {} ", single_line(name))
        }
    };

    let hint = match browser.query_mode() {
        QueryMode::Empty => "type to search",
        QueryMode::LocalFilter => "filtering categories",
        QueryMode::Content => "searching all prompts",
    };

    let line = Line::from(vec![
        Span::styled("Search: ", Style::default().fg(MUTED)),
        Span::styled(single_line(browser.query()), Style::default().fg(TEXT)),
        Span::styled("▏", Style::default().fg(ACCENT)),
        Span::styled(format!("  ({})", hint), Style::default().fg(MUTED)),
    ]);

    frame.render_widget(Paragraph::new(line).block(bordered(breadcrumb)), area);
}

fn category_label(category: &Category) -> String {
    let icon = if category.icon.is_empty() { "•".to_string() } else { single_line(&category.icon) };
    format!(
        "{} {} ({})",
        icon,
        truncate_chars(&single_line(&category.name), ROW_LABEL_CHARS),
        category.prompt_count
    )
}

fn prompt_label(prompt: &PromptSummary) -> String {
    truncate_chars(&single_line(&prompt.title), ROW_LABEL_CHARS)
}

fn search_label(result: &SearchResult) -> String {
    format!("{} · {}", prompt_label(&result.prompt), single_line(&result.category_name))
}

fn render_list(frame: &mut Frame, area: Rect, screen: &Screen<'_>, selected: usize) {
    let (title, labels): (&str, Vec<String>) = match screen {
        Screen::Categories(categories) => {
            (" Categories ", categories.iter().map(|c| category_label(c)).collect())
        }
        Screen::Prompts(prompts) => (" Prompts ", prompts.iter().map(prompt_label).collect()),
        Screen::SearchResults(results) => {
            (" Results ", results.iter().map(search_label).collect())
        }
        _ => {
            render_placeholder(frame, area, screen);
            return;
        }
    };

    let items: Vec<ListItem> = labels
        .into_iter()
        .map(|label| ListItem::new(label).style(Style::default().fg(MUTED)))
        .collect();

    let list = List::new(items).block(bordered(title)).highlight_style(
        Style::default()
            .fg(TEXT) // Bright text
            .bg(ACCENT) // Emerald background
            .add_modifier(Modifier::BOLD),
    );

    let mut list_state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Loading, searching, failure and empty states for the list pane
fn render_placeholder(frame: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let (text, style) = match screen {
        Screen::Loading => (Text::from("Loading…"), Style::default().fg(MUTED)),
        Screen::Searching(query) => {
            (Text::from(format!("Searching for \"{}\"…", single_line(query))), Style::default().fg(MUTED))
        }
        Screen::Failed(err) => (
            Text::from(vec![
                Line::from(single_line(&err.to_string())),
                Line::from(""),
                Line::from("Ctrl+R: retry"),
            ]),
            Style::default().fg(ERROR),
        ),
        Screen::Empty(empty) => (Text::from(empty.message()), Style::default().fg(MUTED)),
        _ => (Text::default(), Style::default()),
    };

    let paragraph =
        Paragraph::new(text).style(style).block(bordered(" Catalog ")).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![Span::styled(label, Style::default().fg(MUTED)), Span::raw(value)])
}

fn summary_lines(prompt: &PromptSummary) -> Vec<Line<'static>> {
    let mut lines = vec![field("Title: ", single_line(&prompt.title))];
    if !prompt.tags.is_empty() {
        let tags: Vec<String> = prompt.tags.iter().map(|t| format!("#{}", single_line(t))).collect();
        lines.push(field("Tags: ", tags.join(" ")));
    }
    lines.push(Line::from(""));
    lines.extend(strip_ansi_codes(&prompt.description).lines().map(|l| Line::from(l.to_string())));
    lines
}

fn render_preview(frame: &mut Frame, area: Rect, screen: &Screen<'_>, selected: usize) {
    let lines: Vec<Line> = match screen {
        Screen::Categories(categories) => match categories.get(selected) {
            Some(category) => {
                let mut lines = vec![
                    field("Category: ", single_line(&category.name)),
                    field("Prompts: ", category.prompt_count.to_string()),
                    Line::from(""),
                ];
                lines.extend(
                    strip_ansi_codes(&category.description).lines().map(|l| Line::from(l.to_string())),
                );
                lines
            }
            None => vec![],
        },
        Screen::Prompts(prompts) => prompts.get(selected).map(summary_lines).unwrap_or_default(),
        Screen::SearchResults(results) => match results.get(selected) {
            Some(result) => {
                let mut lines = vec![field("Category: ", single_line(&result.category_name))];
                lines.extend(summary_lines(&result.prompt));
                lines
            }
            None => vec![],
        },
        _ => vec![],
    };

    let content = if lines.is_empty() { Text::from("Nothing selected") } else { Text::from(lines) };
    let paragraph =
        Paragraph::new(content).block(bordered(" Preview ")).wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    state: &RenderState<'_>,
    screen: &Screen<'_>,
    selected: usize,
) {
    let normal = Style::default().fg(TEXT).bg(BAR);

    let (status_text, style) = if let Some(message) = state.status_message {
        let color = match message.message_type {
            MessageType::Success => ACCENT,
            MessageType::Error => ERROR,
        };
        (format!(" {} ", message.text), Style::default().fg(color).bg(BAR))
    } else if state.browser.overlay().is_open() {
        (" Ctrl+Y: copy | Esc: close | Ctrl+C: quit ".to_string(), normal)
    } else if let Screen::Failed(err) = screen {
        (
            format!(" [ERROR] {} | Ctrl+R: retry | Esc: back ", single_line(&err.to_string())),
            Style::default().fg(ERROR).bg(BAR),
        )
    } else {
        let mut parts = vec![];

        if !screen.is_empty() {
            parts.push(format!("item {}/{}", selected + 1, screen.len()));
            parts.push("Enter: open".to_string());
        }
        if !state.browser.query().is_empty() {
            parts.push("Ctrl+U: clear".to_string());
        }
        let esc = match state.browser.view() {
            View::CategoryDetail(_) => "Esc: back",
            View::Home if !state.browser.query().is_empty() => "Esc: clear",
            View::Home => "Esc: quit",
        };
        parts.push(esc.to_string());
        parts.push("Ctrl+C: quit".to_string());

        (format!(" {} ", parts.join(" | ")), normal)
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}

fn render_overlay(frame: &mut Frame, area: Rect, overlay: &Overlay) {
    let Some(summary) = overlay.summary() else {
        return;
    };

    let mut lines = summary_lines(summary);
    lines.push(Line::from(""));

    match overlay.detail() {
        Some(detail) => {
            lines.extend(
                strip_ansi_codes(&detail.full_description).lines().map(|l| Line::from(l.to_string())),
            );
            lines.push(Line::from(""));
            lines.push(Line::styled("── Content ──", Style::default().fg(ACCENT)));
            lines.extend(
                strip_ansi_codes(&detail.content).lines().map(|l| Line::from(l.to_string())),
            );
        }
        None => lines.push(Line::styled("Loading…", Style::default().fg(MUTED))),
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(format!(" {} ", single_line(&summary.title)))
        .title_bottom(" Ctrl+Y: copy | Esc: close ");

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
