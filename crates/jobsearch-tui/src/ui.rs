use jobsearch_core::{Job, LetterState, SearchState, Severity};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};

use crate::app::{App, FocusPane};

/// Collapsed cards show roughly three lines of description.
const COLLAPSED_DESCRIPTION_CHARS: usize = 240;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, resume panel, status, body, footer
    let [header_area, resume_area, status_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_resume_panel(app, frame, resume_area);
    render_status(app, frame, status_area);
    render_body(app, frame, body_area);
    render_footer(app, frame, footer_area);

    if app.picker.is_some() {
        render_file_picker(app, frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Job Search ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            "Upload your resume to find matching jobs.",
            Style::default().fg(Color::Gray),
        ),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_resume_panel(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Resume Upload ");

    let line = if app.loading_file {
        Line::from(Span::styled(
            format!("Loading resume{}", app.ellipsis()),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        match app.view.selected_file() {
            Some(file) => Line::from(vec![
                Span::styled(" ", Style::default()),
                Span::styled(file.name.clone(), Style::default().fg(Color::White).bold()),
                Span::styled(
                    format!("  ({} KB)  ", file.bytes.len().div_ceil(1024)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled("x", Style::default().fg(Color::Red).bold()),
                Span::styled(" remove", Style::default().fg(Color::DarkGray)),
            ]),
            None => Line::from(Span::styled(
                " No resume selected. Press o to choose a .pdf, .doc or .docx file",
                Style::default().fg(Color::DarkGray),
            )),
        }
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let (label, button_style) = if app.view.is_submitting() {
        (
            format!(" Searching{} ", app.ellipsis()),
            Style::default().bg(Color::Black).fg(Color::Yellow).bold(),
        )
    } else if app.view.can_submit() {
        (
            " Find Matching Jobs ".to_string(),
            Style::default().bg(Color::Blue).fg(Color::White).bold(),
        )
    } else {
        (
            " Find Matching Jobs ".to_string(),
            Style::default().bg(Color::Black).fg(Color::DarkGray),
        )
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(" Enter ", key_style),
        Span::styled(label, button_style),
    ];
    if let Some(error) = app.view.error() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(error.to_string(), Style::default().fg(Color::Red).bold()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(app: &mut App, frame: &mut Frame, area: Rect) {
    let placeholder = match app.view.search_state() {
        SearchState::Loaded(jobs) if !jobs.is_empty() => None,
        SearchState::Loaded(_) => Some((
            "No matching jobs found",
            "Try uploading a different resume or adjusting your search criteria.",
        )),
        SearchState::Loading => Some(("Searching for matching jobs...", "")),
        SearchState::Idle | SearchState::Failed(_) => Some((
            "",
            "Choose a resume with o, then press Enter to find matching jobs.",
        )),
    };

    if let Some((title, hint)) = placeholder {
        app.jobs_area = None;
        app.detail_area = None;
        render_message(frame, area, title, hint);
        return;
    }

    // Split into job list (left) and detail (right)
    let [jobs_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(area);

    // Store areas for mouse hit-testing
    app.jobs_area = Some(jobs_area);
    app.detail_area = Some(detail_area);

    render_job_list(app, frame, jobs_area);
    render_job_detail(app, frame, detail_area);
}

fn render_message(frame: &mut Frame, area: Rect, title: &str, hint: &str) {
    let [_, text_area, _] = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let text = Text::from(vec![
        Line::from(Span::styled(title.to_string(), Style::default().bold())),
        Line::default(),
        Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::DarkGray))),
    ]);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), text_area);
}

fn render_job_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Jobs;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" Matching Jobs ({}) ", app.view.jobs().len()));

    let items: Vec<ListItem> = app
        .view
        .jobs()
        .iter()
        .map(|job| {
            let marker = if app.view.is_expanded(&job.id) { "v " } else { "> " };
            let badge = match app.view.letter_state(&job.id) {
                LetterState::Generating { .. } => Span::styled(" ...", Style::default().fg(Color::Yellow)),
                LetterState::Ready(_) => Span::styled(" [letter]", Style::default().fg(Color::Green)),
                LetterState::NotGenerated => Span::raw(""),
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::DarkGray)),
                    Span::styled(job.title.clone(), Style::default().bold()),
                    badge,
                ]),
                Line::from(Span::styled(
                    format!("  {} - {}", job.company, job.location),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(list, area, &mut app.job_state);
}

fn job_detail_lines<'a>(app: &'a App, job: &'a Job) -> Vec<Line<'a>> {
    let expanded = app.view.is_expanded(&job.id);
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled(job.title.as_str(), Style::default().fg(Color::Cyan).bold())),
        Line::from(vec![Span::styled("Company:  ", label), Span::raw(job.company.as_str())]),
        Line::from(vec![Span::styled("Location: ", label), Span::raw(job.location.as_str())]),
    ];
    if let Some(degree) = &job.degree_requirements {
        lines.push(Line::from(Span::styled(
            format!("Required: {}", degree),
            Style::default().fg(Color::Blue),
        )));
    }
    lines.push(Line::default());

    if expanded || job.description.chars().count() <= COLLAPSED_DESCRIPTION_CHARS {
        lines.extend(job.description.lines().map(Line::raw));
    } else {
        let clamped: String = job.description.chars().take(COLLAPSED_DESCRIPTION_CHARS).collect();
        lines.push(Line::raw(format!("{}...", clamped.trim_end())));
        lines.push(Line::from(Span::styled("Space to expand", label)));
    }
    lines.push(Line::default());

    // Action buttons
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let generate_label = if app.view.is_generating(&job.id) {
        format!(" Generating{} ", app.ellipsis())
    } else if app.view.cover_letter(&job.id).is_some() {
        " Regenerate Cover Letter ".to_string()
    } else {
        " Generate Cover Letter ".to_string()
    };
    let mut buttons = vec![
        Span::styled(" g ", key_style),
        Span::styled(generate_label, Style::default().bg(Color::Black).fg(Color::White)),
    ];
    if app.view.cover_letter(&job.id).is_some() {
        let copied = app.view.copied_letter() == Some(&job.id);
        let (copy_label, copy_style) = if copied {
            (" Copied! ", Style::default().bg(Color::Green).fg(Color::Black))
        } else {
            (" Copy Cover Letter ", Style::default().bg(Color::Black).fg(Color::White))
        };
        buttons.push(Span::raw(" "));
        buttons.push(Span::styled(" c ", key_style));
        buttons.push(Span::styled(copy_label, copy_style));
    }
    lines.push(Line::from(buttons));

    // The letter is part of the expanded card only
    if expanded {
        if let Some(letter) = app.view.cover_letter(&job.id) {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("Cover Letter", Style::default().bold())));
            lines.extend(letter.lines().map(Line::raw));
        }
    }

    lines
}

/// Word wrap the way the detail paragraph does it. Words wider than the
/// pane are split across lines.
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        // Hard-break anything that cannot fit on a line of its own
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current_line));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word_len = word.len();
        if word_len == 0 {
            continue;
        }

        if current_len == 0 {
            current_line = word.into_iter().collect();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.extend(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.into_iter().collect();
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    lines
        .iter()
        .map(|line| {
            let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
            wrap_text_to_width(&text, width as usize).len() as u16
        })
        .fold(0u16, u16::saturating_add)
}

fn render_job_detail(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Detail;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Details ");

    let inner = block.inner(area);
    app.detail_height = inner.height;

    let Some(job) = app.selected_job() else {
        let placeholder = Paragraph::new("Select a job to view details")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let lines = job_detail_lines(app, job);
    let total_lines = wrapped_height(&lines, inner.width);
    let scroll = app.detail_scroll.min(total_lines.saturating_sub(inner.height));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);

    app.total_detail_lines = total_lines;
    app.detail_scroll = scroll;

    // Render scrollbar
    if app.total_detail_lines > app.detail_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state = ScrollbarState::new(app.total_detail_lines as usize)
            .position(app.detail_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(note) = app.view.notification() {
        let style = match note.severity {
            Severity::Info => Style::default().bg(Color::Green).fg(Color::Black),
            Severity::Error => Style::default().bg(Color::Red).fg(Color::White),
        };
        let footer = Paragraph::new(Line::from(Span::styled(format!(" {} ", note.message), style)));
        frame.render_widget(footer, area);
        return;
    }

    let (mode_text, mode_style) = if app.picker.is_some() {
        (" FILES ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else {
        match app.focus {
            FocusPane::Jobs => (" JOBS ", Style::default().bg(Color::Blue).fg(Color::White)),
            FocusPane::Detail => (" DETAIL ", Style::default().bg(Color::Blue).fg(Color::White)),
        }
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: &[(&str, &str)] = if app.picker.is_some() {
        &[("j/k", "nav"), ("Enter", "open"), ("Bksp", "up"), ("Esc", "cancel")]
    } else {
        &[
            ("o", "open"),
            ("Enter", "search"),
            ("j/k", "nav"),
            ("Space", "expand"),
            ("g", "letter"),
            ("c", "copy"),
            ("Tab", "focus"),
            ("q", "quit"),
        ]
    };

    let mut spans = vec![Span::styled(mode_text, mode_style)];
    for (key, label) in pairs {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!(" {} ", label), label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_file_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(picker) = app.picker.as_mut() else {
        return;
    };

    // Calculate popup size and position (centered)
    let popup_width = 70.min(area.width.saturating_sub(4));
    let popup_height = 20.min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let title = match &picker.error {
        Some(err) => format!(" {} ({}) ", picker.dir.display(), err),
        None => format!(" {} ", picker.dir.display()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .title_bottom(" .pdf .doc .docx ");

    let items: Vec<ListItem> = picker
        .entries
        .iter()
        .map(|entry| ListItem::new(format!(" {} ", entry.label())))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut picker.state);
}
