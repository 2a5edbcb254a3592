//! Network-backed flows: list loading, form submission, episode
//! save/update/remove and prompt confirmation.
//!
//! Every mutating flow runs mutate, then refresh, then notify, in
//! that order. The refresh happens even when the mutation failed so
//! the UI converges back to server truth, and a 401/403 anywhere
//! replaces normal error handling with an immediate logout.

use tracing::warn;

use crate::api::ApiError;

use super::app::App;
use super::form::{FormMode, Persistence, SeriesForm};
use super::models::{Prompt, Screen};

const SERIES_ADDED: &str = "The series was successfully added!";
const SERIES_EDITED: &str = "The series was successfully edited!";
const SERIES_DELETED: &str = "The series was successfully deleted!";
const EPISODE_SAVED: &str = "The episode was successfully saved!";
const EPISODE_UPDATED: &str = "The episode was successfully updated!";
const EPISODE_REMOVED: &str = "The episode was successfully removed!";

const LIST_FAILED: &str =
    "Something went wrong when getting list of series. Reload and try again.";
const GET_SERIES_FAILED: &str =
    "Something went wrong when getting a series from database. Reload and try again.";
const CREATE_SERIES_FAILED: &str =
    "Something went wrong when creating series. Reload and try again.";
const UPDATE_SERIES_FAILED: &str =
    "Something went wrong when updating series. Reload and try again.";
const DELETE_SERIES_FAILED: &str =
    "Something went wrong when deleting series. Reload and try again.";
const ADD_EPISODE_FAILED: &str =
    "Something went wrong when adding episode. Reload and try again.";
const UPDATE_EPISODE_FAILED: &str =
    "Something went wrong when updating episode. Reload and try again.";
const REMOVE_EPISODE_FAILED: &str =
    "Something went wrong when removing episode. Reload and try again.";

impl App {
    /// Fetch the series list. Responses are tagged with a generation
    /// counter so a stale one can never overwrite a newer list.
    pub async fn load_series_list(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let seq = self.next_refresh_seq();
        match self.api.list_series(&session).await {
            Ok(list) => {
                if self.is_current_refresh(seq) {
                    self.series_list = list;
                    self.clamp_selection();
                }
                self.list_loaded = true;
            }
            Err(ApiError::SessionExpired) => self.logout(),
            Err(err) => {
                warn!(%err, "failed to load series list");
                self.list_loaded = true;
                self.notices.error(LIST_FAILED);
            }
        }
    }

    /// Refetch canonical state after a mutation: the list always, the
    /// open series as well when editing.
    pub async fn refresh(&mut self) {
        self.load_series_list().await;
        if self.session.is_none() {
            return;
        }
        let open_series = self
            .form
            .as_ref()
            .and_then(|form| form.series_id().map(str::to_string));
        if let Some(series_id) = open_series {
            self.reload_open_series(&series_id).await;
        }
    }

    /// Rebuild the open edit form from the server's copy, keeping the
    /// focused control where possible.
    async fn reload_open_series(&mut self, series_id: &str) {
        let Some(session) = self.session.clone() else {
            return;
        };
        match self.api.get_series(&session, series_id).await {
            Ok(series) => {
                let focus = self.form.as_ref().map(|form| form.focus);
                let mut form = SeriesForm::edit(&series);
                if let Some(focus) = focus {
                    form.focus = focus;
                    form.clamp_focus();
                }
                self.form = Some(form);
            }
            Err(ApiError::SessionExpired) => self.logout(),
            Err(err) => {
                warn!(%err, series_id, "failed to reload series");
                self.notices.error(GET_SERIES_FAILED);
            }
        }
    }

    /// Fetch one series and enter its edit form.
    pub async fn open_edit_form(&mut self, series_id: &str) {
        let Some(session) = self.session.clone() else {
            return;
        };
        match self.api.get_series(&session, series_id).await {
            Ok(series) => {
                self.form = Some(SeriesForm::edit(&series));
                self.screen = Screen::SeriesForm;
            }
            Err(ApiError::SessionExpired) => self.logout(),
            Err(err) => {
                warn!(%err, series_id, "failed to open series");
                self.notices.error(GET_SERIES_FAILED);
            }
        }
    }

    /// Submit the general series fields. Validation failures surface
    /// on the fields and stop here; nothing reaches the network.
    pub async fn submit_series_form(&mut self) {
        let (mode, body) = {
            let Some(form) = self.form.as_mut() else { return };
            let Some(body) = form.prepare_submit() else { return };
            (form.mode.clone(), body)
        };
        let Some(session) = self.session.clone() else {
            return;
        };

        match mode {
            FormMode::Edit { series_id } => {
                match self.api.update_series(&session, &series_id, &body).await {
                    Ok(_) => {
                        self.refresh().await;
                        if self.session.is_some() {
                            self.notices.success(SERIES_EDITED);
                        }
                    }
                    Err(ApiError::SessionExpired) => self.logout(),
                    Err(err) => {
                        warn!(%err, "series update failed");
                        self.refresh().await;
                        if self.session.is_some() {
                            self.notices.error(UPDATE_SERIES_FAILED);
                        }
                    }
                }
            }
            FormMode::Create => match self.api.create_series(&session, &body).await {
                Ok(created) => {
                    self.refresh().await;
                    if self.session.is_some() {
                        self.notices.success(SERIES_ADDED);
                        // Swap the create form for the edit view of
                        // the new series, with no way back to it.
                        self.open_edit_form(&created.id).await;
                    }
                }
                Err(ApiError::SessionExpired) => self.logout(),
                Err(err) => {
                    warn!(%err, "series create failed");
                    self.refresh().await;
                    if self.session.is_some() {
                        self.notices.error(CREATE_SERIES_FAILED);
                    }
                }
            },
        }
    }

    /// Save (draft) or update (saved) the episode under the given
    /// indices.
    pub async fn save_episode(&mut self, season_idx: usize, episode_idx: usize) {
        let (series_id, body, persistence) = {
            let Some(form) = self.form.as_mut() else { return };
            let Some(series_id) = form.series_id().map(str::to_string) else {
                return;
            };
            let Some(body) = form.prepare_episode_save(season_idx, episode_idx) else {
                return;
            };
            let Some(episode) = form.episode(season_idx, episode_idx) else {
                return;
            };
            (series_id, body, episode.persistence.clone())
        };
        let Some(session) = self.session.clone() else {
            return;
        };

        match persistence {
            Persistence::Draft => match self.api.add_episode(&session, &series_id, &body).await {
                Ok(created) => {
                    // The returned identifier flips the slot to saved
                    // right away; the refresh below re-syncs the rest.
                    if let (Some(id), Some(form)) = (created.episode_id, self.form.as_mut()) {
                        form.mark_episode_saved(season_idx, episode_idx, id);
                    }
                    self.refresh().await;
                    if self.session.is_some() {
                        self.notices.success(EPISODE_SAVED);
                    }
                }
                Err(ApiError::SessionExpired) => self.logout(),
                Err(err) => {
                    warn!(%err, "episode add failed");
                    self.refresh().await;
                    if self.session.is_some() {
                        self.notices.error(ADD_EPISODE_FAILED);
                    }
                }
            },
            Persistence::Saved { id } => {
                match self
                    .api
                    .update_episode(&session, &series_id, &id, &body)
                    .await
                {
                    Ok(_) => {
                        self.refresh().await;
                        if self.session.is_some() {
                            self.notices.success(EPISODE_UPDATED);
                        }
                    }
                    Err(ApiError::SessionExpired) => self.logout(),
                    Err(err) => {
                        warn!(%err, "episode update failed");
                        self.refresh().await;
                        if self.session.is_some() {
                            self.notices.error(UPDATE_EPISODE_FAILED);
                        }
                    }
                }
            }
        }
    }

    /// "Yes" on the open confirmation: close it and run the single
    /// deletion it gates.
    pub async fn confirm_prompt(&mut self) {
        let Some(prompt) = self.take_confirmed_prompt() else {
            return;
        };
        match prompt {
            Prompt::RemoveEpisode {
                season_idx,
                episode_idx,
                ..
            } => self.remove_episode(season_idx, episode_idx).await,
            Prompt::DeleteSeries { series_id, .. } => self.delete_series(&series_id).await,
        }
    }

    async fn remove_episode(&mut self, season_idx: usize, episode_idx: usize) {
        let ids = self.form.as_ref().and_then(|form| {
            let series_id = form.series_id()?.to_string();
            let episode_id = form
                .episode(season_idx, episode_idx)?
                .saved_id()?
                .to_string();
            Some((series_id, episode_id))
        });
        let Some((series_id, episode_id)) = ids else {
            return;
        };
        let Some(session) = self.session.clone() else {
            return;
        };

        match self
            .api
            .remove_episode(&session, &series_id, &episode_id)
            .await
        {
            Ok(_) => {
                self.refresh().await;
                if self.session.is_some() {
                    self.notices.success(EPISODE_REMOVED);
                }
            }
            Err(ApiError::SessionExpired) => self.logout(),
            Err(err) => {
                warn!(%err, "episode remove failed");
                self.refresh().await;
                if self.session.is_some() {
                    self.notices.error(REMOVE_EPISODE_FAILED);
                }
            }
        }
    }

    async fn delete_series(&mut self, series_id: &str) {
        let Some(session) = self.session.clone() else {
            return;
        };
        match self.api.delete_series(&session, series_id).await {
            Ok(_) => {
                // Leave the edit view before refreshing so the
                // refresh does not chase the deleted series.
                self.close_form();
                self.refresh().await;
                if self.session.is_some() {
                    self.notices.success(SERIES_DELETED);
                }
            }
            Err(ApiError::SessionExpired) => self.logout(),
            Err(err) => {
                warn!(%err, series_id, "series delete failed");
                self.refresh().await;
                if self.session.is_some() {
                    self.notices.error(DELETE_SERIES_FAILED);
                }
            }
        }
    }
}
