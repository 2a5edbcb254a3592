use ratatui::widgets::ListState;
use tracing::warn;

use crate::api::ApiClient;
use crate::models::Series;
use crate::session::{Session, SessionStore};

use super::form::SeriesForm;
use super::models::{Notices, Prompt, Screen};

/// Top-level application state. One instance lives for the whole
/// terminal session; the event loop mutates it and the renderer reads
/// it.
#[derive(Debug)]
pub struct App {
    pub api: ApiClient,
    pub session_store: SessionStore,
    pub session: Option<Session>,
    pub screen: Screen,
    pub series_list: Vec<Series>,
    pub list_state: ListState,
    pub list_loaded: bool,
    pub form: Option<SeriesForm>,
    pub notices: Notices,
    pub prompt: Option<Prompt>,
    pub show_help: bool,
    pub should_quit: bool,
    pub(crate) refresh_seq: u64,
}

impl App {
    pub fn new(api: ApiClient, session_store: SessionStore) -> Self {
        let session = session_store.load();
        let screen = if session.is_some() {
            Screen::SeriesList
        } else {
            Screen::Unauthenticated
        };

        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            api,
            session_store,
            session,
            screen,
            series_list: Vec::new(),
            list_state,
            list_loaded: false,
            form: None,
            notices: Notices::default(),
            prompt: None,
            show_help: false,
            should_quit: false,
            refresh_seq: 0,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// End the session: drop the stored record and fall back to the
    /// unauthenticated screen. Safe to call when already signed out.
    pub fn logout(&mut self) {
        if let Err(err) = self.session_store.clear() {
            warn!(%err, "failed to clear stored session");
        }
        self.session = None;
        self.screen = Screen::Unauthenticated;
        self.form = None;
        self.prompt = None;
    }

    /// Re-read the session file, used from the unauthenticated screen
    /// after the user provisioned it. Returns whether a session is now
    /// present; the caller triggers the initial list load.
    pub fn reload_session(&mut self) -> bool {
        self.session = self.session_store.load();
        if self.session.is_some() {
            self.screen = Screen::SeriesList;
            self.list_loaded = false;
            true
        } else {
            false
        }
    }

    pub fn selected_series(&self) -> Option<&Series> {
        self.series_list.get(self.list_state.selected()?)
    }

    pub fn next(&mut self) {
        if self.series_list.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.series_list.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.series_list.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.series_list.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Keep the list selection inside bounds after a refresh shrank
    /// the list.
    pub fn clamp_selection(&mut self) {
        if self.series_list.is_empty() {
            self.list_state.select(Some(0));
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        if selected >= self.series_list.len() {
            self.list_state.select(Some(self.series_list.len() - 1));
        }
    }

    pub fn open_create_form(&mut self) {
        self.form = Some(SeriesForm::create());
        self.screen = Screen::SeriesForm;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.screen = Screen::SeriesList;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Open the series-level confirmation for the list selection.
    pub fn open_delete_prompt_for_selected(&mut self) {
        if let Some(series) = self.selected_series() {
            self.prompt = Some(Prompt::DeleteSeries {
                series_id: series.id.clone(),
                series_name: series.name.clone(),
            });
        }
    }

    /// Open the series-level confirmation from the edit form.
    pub fn open_delete_prompt_from_form(&mut self) {
        if let Some(form) = &self.form {
            if let Some(series_id) = form.series_id() {
                self.prompt = Some(Prompt::DeleteSeries {
                    series_id: series_id.to_string(),
                    series_name: form.heading.clone(),
                });
            }
        }
    }

    /// Open the episode-level confirmation. Drafts have nothing to
    /// remove, so only saved episodes get a prompt.
    pub fn open_remove_episode_prompt(&mut self, season_idx: usize, episode_idx: usize) {
        let Some(form) = &self.form else { return };
        let Some(episode) = form.episode(season_idx, episode_idx) else {
            return;
        };
        if episode.is_saved() {
            self.prompt = Some(Prompt::RemoveEpisode {
                season_idx,
                episode_idx,
                episode_name: episode.name.value.clone(),
            });
        }
    }

    /// Close the prompt without side effects ("No" or the close
    /// control).
    pub fn dismiss_prompt(&mut self) {
        self.prompt = None;
    }

    /// Close the prompt and hand out what was confirmed, exactly once.
    /// The caller performs the single deletion call this unlocks.
    pub fn take_confirmed_prompt(&mut self) -> Option<Prompt> {
        self.prompt.take()
    }

    pub(crate) fn next_refresh_seq(&mut self) -> u64 {
        self.refresh_seq += 1;
        self.refresh_seq
    }

    /// A refresh response only applies while it is the newest one
    /// issued; anything older is discarded.
    pub(crate) fn is_current_refresh(&self, seq: u64) -> bool {
        seq == self.refresh_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AiringStatus;
    use tempfile::tempdir;

    fn test_app(dir: &std::path::Path, session: Option<&Session>) -> App {
        let store = SessionStore::new(dir.join("session.json"));
        if let Some(session) = session {
            store.save(session).unwrap();
        }
        App::new(ApiClient::new("http://localhost:4000"), store)
    }

    fn signed_in_session() -> Session {
        Session {
            token: "token".to_string(),
            username: "sofie".to_string(),
        }
    }

    fn series(id: &str, name: &str) -> Series {
        Series {
            id: id.to_string(),
            name: name.to_string(),
            plot: String::new(),
            airing_status: AiringStatus::Airing,
            seasons: Vec::new(),
        }
    }

    #[test]
    fn test_starts_unauthenticated_without_session() {
        let dir = tempdir().unwrap();
        let app = test_app(dir.path(), None);
        assert_eq!(app.screen, Screen::Unauthenticated);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_starts_on_list_with_session() {
        let dir = tempdir().unwrap();
        let app = test_app(dir.path(), Some(&signed_in_session()));
        assert_eq!(app.screen, Screen::SeriesList);
    }

    #[test]
    fn test_logout_clears_everything() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), Some(&signed_in_session()));
        app.open_create_form();

        app.logout();
        assert_eq!(app.screen, Screen::Unauthenticated);
        assert!(app.session.is_none());
        assert!(app.form.is_none());
        assert!(app.session_store.load().is_none());

        // Idempotent second call.
        app.logout();
        assert_eq!(app.screen, Screen::Unauthenticated);
    }

    #[test]
    fn test_confirmed_prompt_is_taken_exactly_once() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), Some(&signed_in_session()));
        app.series_list = vec![series("s1", "Firefly")];
        app.open_delete_prompt_for_selected();

        let prompt = app.take_confirmed_prompt();
        assert_eq!(
            prompt,
            Some(Prompt::DeleteSeries {
                series_id: "s1".to_string(),
                series_name: "Firefly".to_string(),
            })
        );
        // A second take yields nothing, so only one deletion can fire.
        assert!(app.take_confirmed_prompt().is_none());
    }

    #[test]
    fn test_dismissed_prompt_yields_no_deletion() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), Some(&signed_in_session()));
        app.series_list = vec![series("s1", "Firefly")];
        app.open_delete_prompt_for_selected();

        app.dismiss_prompt();
        assert!(app.take_confirmed_prompt().is_none());
    }

    #[test]
    fn test_stale_refresh_is_discarded() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), Some(&signed_in_session()));

        let first = app.next_refresh_seq();
        let second = app.next_refresh_seq();
        assert!(!app.is_current_refresh(first));
        assert!(app.is_current_refresh(second));
    }

    #[test]
    fn test_selection_clamps_after_shrink() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), Some(&signed_in_session()));
        app.series_list = vec![series("s1", "Firefly"), series("s2", "The Wire")];
        app.list_state.select(Some(1));

        app.series_list.pop();
        app.clamp_selection();
        assert_eq!(app.list_state.selected(), Some(0));
    }
}
