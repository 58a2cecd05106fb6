use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use jobsearch_core::{Config, CopyOutcome, Notification, ResumeFile, ValidationError};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{App, FocusPane};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent, tx: &UnboundedSender<AppEvent>) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key, tx),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(Instant::now()),
        AppEvent::ResumeLoaded(result) => {
            app.loading_file = false;
            match result {
                Ok(file) => {
                    app.view.select_file(file);
                    app.reset_job_selection();
                }
                Err(err) => {
                    tracing::warn!(error = %err, "could not load resume");
                    app.view
                        .notify(Notification::error(err.to_string(), Instant::now()));
                }
            }
        }
        AppEvent::SearchFinished { token, result } => {
            if app.view.complete_search(token, result) {
                app.reset_job_selection();
            }
        }
        AppEvent::LetterFinished {
            job_id,
            token,
            result,
        } => {
            app.view.complete_cover_letter(&job_id, token, result);
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.picker.is_some() {
        handle_picker(app, key, tx);
    } else {
        handle_normal(app, key, tx);
    }
}

fn handle_picker(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    let Some(picker) = app.picker.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_picker(),
        KeyCode::Char('j') | KeyCode::Down => picker.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => picker.nav_up(),
        KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => picker.go_parent(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if let Some(path) = picker.enter() {
                app.close_picker();
                remember_dir(app.picker_dir.clone());
                load_resume(app, path, tx);
            }
        }
        _ => {}
    }
}

fn handle_normal(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    match key.code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,

        // Resume
        KeyCode::Char('o') => app.open_picker(),
        KeyCode::Char('x') => {
            if app.view.selected_file().is_some() {
                app.remove_file();
            }
        }
        KeyCode::Enter | KeyCode::Char('s') => submit_search(app, tx),

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            FocusPane::Jobs => app.job_nav_down(),
            FocusPane::Detail => app.scroll_down(),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            FocusPane::Jobs => app.job_nav_up(),
            FocusPane::Detail => app.scroll_up(),
        },
        KeyCode::Home => app.job_nav_first(),
        KeyCode::End => app.job_nav_last(),
        KeyCode::Tab => {
            app.focus = match app.focus {
                FocusPane::Jobs => FocusPane::Detail,
                FocusPane::Detail => FocusPane::Jobs,
            };
        }

        // Job actions
        KeyCode::Char(' ') | KeyCode::Char('e') => app.toggle_selected(),
        KeyCode::Char('g') => generate_cover_letter(app, tx),
        KeyCode::Char('c') => copy_cover_letter(app),

        KeyCode::Esc => app.view.clear_error(),

        _ => {}
    }
}

fn load_resume(app: &mut App, path: std::path::PathBuf, tx: &UnboundedSender<AppEvent>) {
    app.loading_file = true;
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = ResumeFile::load(&path).await;
        let _ = tx.send(AppEvent::ResumeLoaded(result));
    });
}

fn remember_dir(dir: std::path::PathBuf) {
    if let Err(err) = Config::save_last_resume_dir(dir) {
        tracing::debug!(error = %err, "could not remember picker directory");
    }
}

fn submit_search(app: &mut App, tx: &UnboundedSender<AppEvent>) {
    let ticket = match app.view.begin_search() {
        Ok(ticket) => ticket,
        Err(ValidationError::NoResumeSelected) => return,
        Err(ValidationError::SearchInProgress) => return,
    };

    let client = app.client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.parse_and_search(&ticket.file).await;
        let _ = tx.send(AppEvent::SearchFinished {
            token: ticket.token,
            result,
        });
    });
}

fn generate_cover_letter(app: &mut App, tx: &UnboundedSender<AppEvent>) {
    let Some(job_id) = app.selected_job_id() else {
        return;
    };
    let Some(ticket) = app.view.begin_cover_letter(&job_id) else {
        return;
    };

    // The letter only shows on an expanded card
    if !app.view.is_expanded(&job_id) {
        app.view.toggle_expand(&job_id);
    }

    let client = app.client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.generate_cover_letter(&ticket.request).await;
        let _ = tx.send(AppEvent::LetterFinished {
            job_id: ticket.job_id,
            token: ticket.token,
            result,
        });
    });
}

fn copy_cover_letter(app: &mut App) {
    let Some(job_id) = app.selected_job_id() else {
        return;
    };
    let outcome = app
        .view
        .copy_cover_letter(&job_id, &mut app.clipboard, Instant::now());
    if outcome == CopyOutcome::NothingToCopy {
        tracing::debug!(job = %job_id, "no cover letter to copy");
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_area = |area: Option<Rect>| {
        area.is_some_and(|r| {
            mouse.column >= r.x
                && mouse.column < r.x + r.width
                && mouse.row >= r.y
                && mouse.row < r.y + r.height
        })
    };
    let in_jobs = in_area(app.jobs_area);
    let in_detail = in_area(app.detail_area);

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_jobs {
                app.job_nav_down();
            } else if in_detail {
                app.scroll_down();
                app.scroll_down();
                app.scroll_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if in_jobs {
                app.job_nav_up();
            } else if in_detail {
                app.scroll_up();
                app.scroll_up();
                app.scroll_up();
            }
        }
        _ => {}
    }
}
