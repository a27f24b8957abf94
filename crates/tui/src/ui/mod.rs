use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use suggest_core::{Element, Surface};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};
use crate::strings::{
    build_status_line, help_lines_ascii, history_row, DELETE_MARK, FOCUS_HISTORY, FOCUS_INPUT,
    INPUT_HINT, TITLE_HELP, TITLE_HISTORY, TITLE_SEARCH, TITLE_SUGGESTIONS,
};
use crate::theme::THEME;

pub fn draw(f: &mut Frame, app: &mut App) {
    let surface = app.widget.surface();
    let expanded =
        surface.attribute(Element::SuggestionsList, "aria-expanded").as_deref() == Some("true");
    let option_count = surface.children(Element::SuggestionsList).len() as u16;
    let suggestions_h = if expanded { option_count + 2 } else { 0 };
    let history_h = if surface.is_hidden(Element::HistoryPanel) {
        0
    } else {
        surface.children(Element::HistoryList).len() as u16 + 2
    };

    // Layout: search box, dropdown, live region, history, filler, status
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(suggestions_h),
            Constraint::Length(1),
            Constraint::Length(history_h),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    app.input_area = Some(chunks[0]);
    draw_input(f, chunks[0], app);

    if expanded {
        app.suggestions_area = Some(chunks[1]);
        draw_suggestions(f, chunks[1], app);
    } else {
        app.suggestions_area = None;
    }

    draw_live_region(f, chunks[2], app);

    if history_h > 0 {
        app.history_area = Some(chunks[3]);
        draw_history(f, chunks[3], app);
    } else {
        app.history_area = None;
    }

    draw_status(f, chunks[5], app);

    if app.show_help {
        draw_help(f, f.area());
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(THEME.border_focus)
    } else {
        Style::default().fg(THEME.border_inactive)
    }
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
    let focused = matches!(app.focus, Focus::Input);
    let block = Block::default()
        .title(TITLE_SEARCH)
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    let inner_w = area.width.saturating_sub(2) as usize;

    let graphemes: Vec<&str> = app.input.graphemes(true).collect();
    let upto = app.input_cursor.min(graphemes.len());
    let cursor_col = graphemes[..upto]
        .iter()
        .map(|g| UnicodeWidthStr::width(*g))
        .sum::<usize>();
    // keep the caret visible by scrolling long queries horizontally
    let offset_x = cursor_col.saturating_sub(inner_w.saturating_sub(1));

    let para = if app.input.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            INPUT_HINT,
            Style::default().fg(Color::DarkGray),
        )))
        .block(block)
    } else {
        Paragraph::new(app.input.clone())
            .block(block)
            .scroll((0, offset_x as u16))
    };
    f.render_widget(para, area);

    if focused && !app.show_help {
        let x = area.x + 1 + (cursor_col - offset_x) as u16;
        f.set_cursor_position(Position::new(x, area.y + 1));
    }
}

fn draw_suggestions(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(TITLE_SUGGESTIONS)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.suggestions_border));
    let lines: Vec<Line> = app
        .widget
        .surface()
        .children(Element::SuggestionsList)
        .iter()
        .map(|option| {
            let selected = option.get("aria-selected") == Some("true");
            let (prefix, style) = if selected {
                (
                    "> ",
                    Style::default()
                        .fg(THEME.selected_fg)
                        .bg(THEME.selected_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default())
            };
            Line::from(Span::styled(format!("{}{}", prefix, option.text), style))
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_live_region(f: &mut Frame, area: Rect, app: &App) {
    let text = app.widget.surface().text(Element::LiveRegion);
    let para = Paragraph::new(Span::styled(
        text,
        Style::default()
            .fg(THEME.announce_fg)
            .add_modifier(Modifier::ITALIC),
    ));
    f.render_widget(para, area);
}

fn draw_history(f: &mut Frame, area: Rect, app: &App) {
    let focused = matches!(app.focus, Focus::History);
    let block = Block::default()
        .title(Span::styled(
            TITLE_HISTORY,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    let inner_w = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for (i, item) in app
        .widget
        .surface()
        .children(Element::HistoryList)
        .iter()
        .enumerate()
    {
        let time = item.find("time").map(|n| n.text.as_str()).unwrap_or("");
        let title = item.find("h6").map(|n| n.text.as_str()).unwrap_or("");
        let row = history_row(time, title);
        let used = UnicodeWidthStr::width(row.as_str()) + DELETE_MARK.len();
        let pad = " ".repeat(inner_w.saturating_sub(used));
        let current = focused && i == app.history_current;
        let title_style = if current {
            Style::default()
                .fg(THEME.selected_fg)
                .bg(THEME.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(time.to_string(), Style::default().fg(THEME.timestamp_fg)),
            Span::raw("  "),
            Span::styled(title.to_string(), title_style),
            Span::raw(pad),
            Span::styled(DELETE_MARK, Style::default().fg(Color::Red)),
        ]));
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let focus = match app.focus {
        Focus::Input => FOCUS_INPUT,
        Focus::History => FOCUS_HISTORY,
    };
    let line = build_status_line(
        focus,
        app.widget.previous_query(),
        app.widget.history().len(),
        app.notice.as_deref(),
        area.width,
    );
    let style = if app.notice.is_some() {
        Style::default().fg(THEME.notice_fg)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    f.render_widget(Paragraph::new(Span::styled(line, style)), area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let w = area.width.saturating_sub(8).min(90);
    let h = (help_lines_ascii().len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    };
    let lines: Vec<Line> = help_lines_ascii()
        .iter()
        .map(|l| {
            if l.starts_with(' ') {
                Line::from(*l)
            } else {
                Line::from(Span::styled(
                    *l,
                    Style::default().add_modifier(Modifier::BOLD),
                ))
            }
        })
        .collect();
    let block = Block::default()
        .title(TITLE_HELP)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border_focus));
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}
