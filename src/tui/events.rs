use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::session::SessionStore;

use super::app::App;
use super::form::{EpisodeField, FormFocus};
use super::models::Screen;
use super::rendering::ui;

pub async fn run_tui(config: AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let session_store = SessionStore::new(
        config
            .session_file
            .clone()
            .unwrap_or_else(SessionStore::default_path),
    );
    let mut app = App::new(ApiClient::new(config.api_url), session_store);

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    // The list is fetched once up front; afterwards only mutations
    // and explicit refreshes hit the backend.
    if app.session.is_some() {
        app.load_series_list().await;
    }

    loop {
        app.notices.tick();
        terminal.draw(|f| ui(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code).await;
                }
            }
        }
    }
}

async fn handle_key(app: &mut App, code: KeyCode) {
    // An open confirmation swallows every key: Yes proceeds, No and
    // the close key cancel, nothing else gets through.
    if app.prompt.is_some() {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_prompt().await,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.dismiss_prompt(),
            _ => {}
        }
        return;
    }

    if app.show_help {
        if matches!(code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::F(1)) {
            app.toggle_help();
        }
        return;
    }
    if code == KeyCode::F(1) {
        app.toggle_help();
        return;
    }

    match app.screen {
        Screen::Unauthenticated => match code {
            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
            KeyCode::Char('r') => {
                if app.reload_session() {
                    app.load_series_list().await;
                }
            }
            _ => {}
        },
        Screen::SeriesList => match code {
            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Char('a') => app.open_create_form(),
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(series) = app.selected_series() {
                    let series_id = series.id.clone();
                    app.open_edit_form(&series_id).await;
                }
            }
            KeyCode::Char('d') => app.open_delete_prompt_for_selected(),
            KeyCode::Char('r') => app.load_series_list().await,
            KeyCode::Char('h') => app.toggle_help(),
            _ => {}
        },
        Screen::SeriesForm => handle_form_key(app, code).await,
    }
}

async fn handle_form_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.form.as_mut() {
                form.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.form.as_mut() {
                form.focus_previous();
            }
        }
        KeyCode::Left => {
            if let Some(form) = app.form.as_mut() {
                form.cycle_status(false);
            }
        }
        KeyCode::Right => {
            if let Some(form) = app.form.as_mut() {
                form.cycle_status(true);
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.form.as_mut() {
                form.handle_backspace();
            }
        }
        KeyCode::Enter => activate_focused(app).await,
        KeyCode::Char(c) => {
            if let Some(form) = app.form.as_mut() {
                form.handle_char(c);
            }
        }
        _ => {}
    }
}

/// Enter on the focused control: advance out of text fields, fire the
/// buttons.
async fn activate_focused(app: &mut App) {
    let Some(focus) = app.form.as_ref().map(|form| form.focus) else {
        return;
    };

    match focus {
        FormFocus::Name | FormFocus::Status | FormFocus::Plot => {
            if let Some(form) = app.form.as_mut() {
                form.focus_next();
            }
        }
        FormFocus::Submit => app.submit_series_form().await,
        FormFocus::Episode {
            season,
            episode,
            field,
        } => match field {
            EpisodeField::Name | EpisodeField::AirDate => {
                if let Some(form) = app.form.as_mut() {
                    form.focus_next();
                }
            }
            EpisodeField::SaveButton => app.save_episode(season, episode).await,
            EpisodeField::RemoveButton => app.open_remove_episode_prompt(season, episode),
        },
        FormFocus::AddEpisode { season } => {
            if let Some(form) = app.form.as_mut() {
                if let Some(season_editor) = form.seasons.get_mut(season) {
                    season_editor.add_episode();
                }
            }
        }
        FormFocus::AddSeason => {
            if let Some(form) = app.form.as_mut() {
                form.add_season();
            }
        }
        FormFocus::DeleteSeries => app.open_delete_prompt_from_form(),
    }
}
