use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::validation::{FieldState, Validity};

use super::app::App;
use super::form::{EpisodeField, FormFocus, SeriesForm};
use super::models::{NoticeKind, Prompt, Screen};
use super::utils::centered_rect;

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(f.area());

    render_notice(f, chunks[0], app);

    match app.screen {
        Screen::Unauthenticated => render_unauthenticated(f, chunks[1], app),
        Screen::SeriesList => render_series_list(f, chunks[1], app),
        Screen::SeriesForm => render_series_form(f, chunks[1], app),
    }

    if let Some(prompt) = &app.prompt {
        render_prompt(f, prompt);
    }

    if app.show_help {
        render_help_popup(f, app);
    }
}

/// One-line banner at the top: green for success, red for failure.
fn render_notice(f: &mut Frame, area: Rect, app: &App) {
    let notice = match app.notices.current() {
        Some(notice) => notice,
        None => {
            f.render_widget(Paragraph::new(""), area);
            return;
        }
    };
    let style = match notice.kind {
        NoticeKind::Success => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        NoticeKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    let banner = Paragraph::new(notice.text.as_str())
        .style(style)
        .alignment(Alignment::Center);
    f.render_widget(banner, area);
}

fn render_unauthenticated(f: &mut Frame, area: Rect, app: &App) {
    let session_path = app.session_store.path().display().to_string();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "You are not signed in.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Provision a session file with your API token at:"),
        Line::from(Span::styled(
            session_path,
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(r#"  {"token": "<bearer token>", "username": "<name>"}"#),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to re-read the session file, q to quit",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Series Tracker")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_series_list(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    // Header
    let header = Paragraph::new("Series Tracker")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, chunks[0]);

    if !app.list_loaded {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Series"));
        f.render_widget(loading, chunks[1]);
    } else if app.series_list.is_empty() {
        let empty = Paragraph::new("There are no series yet. Press a to add a series!")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Series"));
        f.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = app
            .series_list
            .iter()
            .map(|series| {
                let line = Line::from(vec![
                    Span::styled(series.name.clone(), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("  ({})", series.airing_status.label()),
                        Style::default().fg(Color::Gray),
                    ),
                ]);
                ListItem::new(line)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Series")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("► ");
        f.render_stateful_widget(list, chunks[1], &mut app.list_state.clone());
    }

    let controls =
        Paragraph::new("↑/↓ move · Enter edit · a add · d delete · r refresh · h help · q quit")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(controls, chunks[2]);
}

fn render_series_form(f: &mut Frame, area: Rect, app: &App) {
    let Some(form) = &app.form else { return };

    let mut constraints = vec![
        Constraint::Length(3), // heading
        Constraint::Length(3), // name
        Constraint::Length(1), // name error
        Constraint::Length(3), // airing status
        Constraint::Length(3), // plot
        Constraint::Length(1), // plot error
        Constraint::Length(3), // submit
    ];
    if form.is_edit() {
        constraints.push(Constraint::Min(5)); // seasons
    }
    constraints.push(Constraint::Length(3)); // controls

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let header = Paragraph::new(form.heading.as_str())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, chunks[0]);

    render_text_field(
        f,
        chunks[1],
        "Name *",
        &form.name,
        form.focus == FormFocus::Name,
    );
    render_field_error(f, chunks[2], &form.name);

    // Airing status select
    let status_focused = form.focus == FormFocus::Status;
    let status = Paragraph::new(format!("< {} >", form.airing_status.label()))
        .style(text_style(status_focused))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Airing status")
                .border_style(if status_focused {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::Gray)
                }),
        );
    f.render_widget(status, chunks[3]);

    render_text_field(
        f,
        chunks[4],
        "Plot",
        &form.plot,
        form.focus == FormFocus::Plot,
    );
    render_field_error(f, chunks[5], &form.plot);

    let submit_label = if form.is_edit() { "Update" } else { "Add" };
    let submit_focused = form.focus == FormFocus::Submit;
    let submit = Paragraph::new(submit_label)
        .style(if submit_focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if submit_focused {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Gray)
                }),
        );
    f.render_widget(submit, chunks[6]);

    if form.is_edit() {
        render_seasons(f, chunks[7], form);
    }

    let controls = Paragraph::new("Tab/↓ next · Shift-Tab/↑ previous · Enter activate · Esc back")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(controls, chunks[chunks.len() - 1]);
}

fn text_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Border color tracks the field's validity; red always wins so an
/// error stays visible while the field is focused.
fn field_border(field: &FieldState, focused: bool) -> Style {
    match (&field.validity, focused) {
        (Validity::Invalid(_), _) => Style::default().fg(Color::Red),
        (_, true) => Style::default().fg(Color::Yellow),
        (Validity::Valid, false) => Style::default().fg(Color::Green),
        (Validity::Unchecked, false) => Style::default().fg(Color::Gray),
    }
}

fn render_text_field(f: &mut Frame, area: Rect, title: &str, field: &FieldState, focused: bool) {
    let paragraph = Paragraph::new(field.value.as_str())
        .style(text_style(focused))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(field_border(field, focused)),
        );
    f.render_widget(paragraph, area);
}

fn render_field_error(f: &mut Frame, area: Rect, field: &FieldState) {
    let message = field.error().unwrap_or_default();
    let error = Paragraph::new(format!(" {message}")).style(Style::default().fg(Color::Red));
    f.render_widget(error, area);
}

/// The nested season/episode editors as a scrollable block, kept
/// scrolled to the focused control.
fn render_seasons(f: &mut Frame, area: Rect, form: &SeriesForm) {
    let (lines, focused_line) = season_lines(form);

    let inner_height = area.height.saturating_sub(2) as usize;
    let offset = focused_line.saturating_sub(inner_height / 2) as u16;

    let seasons = Paragraph::new(lines).scroll((offset, 0)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Seasons")
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(seasons, area);
}

fn season_lines(form: &SeriesForm) -> (Vec<Line<'static>>, usize) {
    let mut lines: Vec<Line> = Vec::new();
    let mut focused_line = 0usize;
    let focus = form.focus;

    fn track(lines: &[Line], matches: bool, focused_line: &mut usize) {
        if matches {
            *focused_line = lines.len().saturating_sub(1);
        }
    }

    for (season_idx, season) in form.seasons.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("Season {}", season.number),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));

        for (episode_idx, episode) in season.episodes.iter().enumerate() {
            let is_focused = |field: EpisodeField| {
                focus
                    == FormFocus::Episode {
                        season: season_idx,
                        episode: episode_idx,
                        field,
                    }
            };

            let mut header = vec![Span::styled(
                format!("  Episode {}", episode.episode_number),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )];
            if !episode.is_saved() {
                header.push(Span::styled(
                    "  (draft)",
                    Style::default().fg(Color::Yellow),
                ));
            }
            lines.push(Line::from(header));

            lines.push(field_line(
                "    Name *: ",
                &episode.name,
                is_focused(EpisodeField::Name),
            ));
            track(&lines, is_focused(EpisodeField::Name), &mut focused_line);
            if let Some(message) = episode.name.error() {
                lines.push(error_line(message));
            }

            lines.push(field_line(
                "    Air date: ",
                &episode.air_date,
                is_focused(EpisodeField::AirDate),
            ));
            track(&lines, is_focused(EpisodeField::AirDate), &mut focused_line);
            if let Some(message) = episode.air_date.error() {
                lines.push(error_line(message));
            }

            let save_label = if episode.is_saved() {
                "[Update episode]"
            } else {
                "[Save episode]"
            };
            let mut actions = vec![
                Span::raw("    "),
                button_span(save_label, is_focused(EpisodeField::SaveButton)),
            ];
            if episode.is_saved() {
                actions.push(Span::raw("  "));
                actions.push(button_span(
                    "[Remove episode]",
                    is_focused(EpisodeField::RemoveButton),
                ));
            }
            lines.push(Line::from(actions));
            track(
                &lines,
                is_focused(EpisodeField::SaveButton) || is_focused(EpisodeField::RemoveButton),
                &mut focused_line,
            );
        }

        let add_focused = focus == FormFocus::AddEpisode { season: season_idx };
        lines.push(Line::from(vec![
            Span::raw("  "),
            button_span("[Add episode]", add_focused),
        ]));
        track(&lines, add_focused, &mut focused_line);
        lines.push(Line::from(""));
    }

    let add_season_focused = focus == FormFocus::AddSeason;
    lines.push(Line::from(button_span("[Add season]", add_season_focused)));
    track(&lines, add_season_focused, &mut focused_line);

    let delete_focused = focus == FormFocus::DeleteSeries;
    lines.push(Line::from(Span::styled(
        "[Delete series]",
        if delete_focused {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        },
    )));
    track(&lines, delete_focused, &mut focused_line);

    (lines, focused_line)
}

fn field_line(label: &str, field: &FieldState, focused: bool) -> Line<'static> {
    let value_style = match (&field.validity, focused) {
        (Validity::Invalid(_), _) => Style::default().fg(Color::Red),
        (_, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::White),
    };
    let mut spans = vec![
        Span::styled(label.to_string(), Style::default().fg(Color::Gray)),
        Span::styled(field.value.clone(), value_style),
    ];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("      {message}"),
        Style::default().fg(Color::Red),
    ))
}

fn button_span(label: &str, focused: bool) -> Span<'static> {
    Span::styled(
        label.to_string(),
        if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        },
    )
}

/// Two-choice confirmation popup. Yes is the only answer that
/// proceeds; No and the close key both just dismiss it.
fn render_prompt(f: &mut Frame, prompt: &Prompt) {
    let popup_area = centered_rect(60, 30, f.area());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            prompt.question(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "[Y]es",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("      "),
            Span::styled(
                "[N]o",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Esc closes this prompt",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title("Confirm")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}

fn render_help_popup(f: &mut Frame, _app: &App) {
    let popup_area = centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Series Tracker - Help",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Series list:"),
        Line::from("  ↑/k, ↓/j  - Move selection"),
        Line::from("  Enter/e   - Edit the selected series"),
        Line::from("  a         - Add a new series"),
        Line::from("  d         - Delete the selected series"),
        Line::from("  r         - Refresh the list"),
        Line::from(""),
        Line::from("Series form:"),
        Line::from("  Tab/↓       - Next field or control"),
        Line::from("  Shift-Tab/↑ - Previous field or control"),
        Line::from("  ←/→/Space   - Change airing status"),
        Line::from("  Enter       - Activate the focused control"),
        Line::from("  Esc         - Back to the series list"),
        Line::from(""),
        Line::from("Prompts:"),
        Line::from("  y         - Confirm"),
        Line::from("  n/Esc     - Cancel"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or h to close",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}
