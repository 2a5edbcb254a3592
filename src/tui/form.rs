//! The series form: general fields plus the nested season/episode
//! editors, with a focus machine that walks every editable control.
//!
//! Everything here is pure state manipulation. Preparing a submit or
//! an episode save validates first and only hands back a request body
//! when every check passes, so an invalid form never produces a
//! network call.

use chrono::NaiveDate;

use crate::models::{AiringStatus, Episode, EpisodeBody, Season, Series, SeriesBody};
use crate::validation::{AIR_DATE_FORMAT, FieldKind, FieldState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { series_id: String },
}

/// Whether an episode exists on the backend yet. A draft becomes
/// saved the moment the add response hands back an identifier, not as
/// a side effect of the following refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Draft,
    Saved { id: String },
}

#[derive(Debug, Clone)]
pub struct EpisodeEditor {
    pub persistence: Persistence,
    pub season_number: u32,
    pub episode_number: u32,
    pub name: FieldState,
    pub air_date: FieldState,
}

impl EpisodeEditor {
    pub fn draft(season_number: u32, episode_number: u32) -> Self {
        Self {
            persistence: Persistence::Draft,
            season_number,
            episode_number,
            name: FieldState::new(FieldKind::EpisodeName),
            air_date: FieldState::new(FieldKind::AirDate),
        }
    }

    pub fn from_episode(episode: &Episode) -> Self {
        let persistence = match &episode.episode_id {
            Some(id) => Persistence::Saved { id: id.clone() },
            None => Persistence::Draft,
        };
        let air_date = episode
            .original_air_date
            .map(|date| date.format(AIR_DATE_FORMAT).to_string())
            .unwrap_or_default();
        Self {
            persistence,
            season_number: episode.season_number,
            episode_number: episode.episode_number,
            name: FieldState::with_value(FieldKind::EpisodeName, episode.name.clone()),
            air_date: FieldState::with_value(FieldKind::AirDate, air_date),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self.persistence, Persistence::Saved { .. })
    }

    pub fn saved_id(&self) -> Option<&str> {
        match &self.persistence {
            Persistence::Saved { id } => Some(id),
            Persistence::Draft => None,
        }
    }

    pub fn mark_saved(&mut self, id: String) {
        self.persistence = Persistence::Saved { id };
    }

    pub fn parsed_air_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.air_date.value, AIR_DATE_FORMAT).ok()
    }
}

#[derive(Debug, Clone)]
pub struct SeasonEditor {
    pub number: u32,
    pub episodes: Vec<EpisodeEditor>,
}

impl SeasonEditor {
    pub fn from_season(season: &Season) -> Self {
        Self {
            number: season.number,
            episodes: season.episodes.iter().map(EpisodeEditor::from_episode).collect(),
        }
    }

    /// A brand new season starts with one empty draft episode.
    pub fn new_with_first_draft(number: u32) -> Self {
        Self {
            number,
            episodes: vec![EpisodeEditor::draft(number, 1)],
        }
    }

    /// Append an unsaved draft slot. Numbers follow list position and
    /// are never reassigned, so removing an episode mid-session does
    /// not renumber the rest.
    pub fn add_episode(&mut self) -> usize {
        let episode_number = self.episodes.len() as u32 + 1;
        self.episodes.push(EpisodeEditor::draft(self.number, episode_number));
        self.episodes.len() - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeField {
    Name,
    AirDate,
    /// Save for drafts, Update for saved episodes.
    SaveButton,
    RemoveButton,
}

/// Every focusable control on the form, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Name,
    Status,
    Plot,
    Submit,
    Episode {
        season: usize,
        episode: usize,
        field: EpisodeField,
    },
    AddEpisode {
        season: usize,
    },
    AddSeason,
    DeleteSeries,
}

#[derive(Debug, Clone)]
pub struct SeriesForm {
    pub mode: FormMode,
    /// Heading for the form screen: the persisted series name in edit
    /// mode, a fixed title otherwise.
    pub heading: String,
    pub name: FieldState,
    pub plot: FieldState,
    pub airing_status: AiringStatus,
    pub seasons: Vec<SeasonEditor>,
    pub focus: FormFocus,
}

impl SeriesForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            heading: "Add series".to_string(),
            name: FieldState::new(FieldKind::SeriesName),
            plot: FieldState::new(FieldKind::SeriesPlot),
            airing_status: AiringStatus::default(),
            seasons: Vec::new(),
            focus: FormFocus::Name,
        }
    }

    /// Copy a fetched series into editable draft state. Called again
    /// whenever the backing series changes, e.g. after a refresh.
    pub fn edit(series: &Series) -> Self {
        Self {
            mode: FormMode::Edit {
                series_id: series.id.clone(),
            },
            heading: series.name.clone(),
            name: FieldState::with_value(FieldKind::SeriesName, series.name.clone()),
            plot: FieldState::with_value(FieldKind::SeriesPlot, series.plot.clone()),
            airing_status: series.airing_status,
            seasons: series.seasons.iter().map(SeasonEditor::from_season).collect(),
            focus: FormFocus::Name,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn series_id(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Edit { series_id } => Some(series_id),
            FormMode::Create => None,
        }
    }

    pub fn episode(&self, season_idx: usize, episode_idx: usize) -> Option<&EpisodeEditor> {
        self.seasons.get(season_idx)?.episodes.get(episode_idx)
    }

    pub fn episode_mut(
        &mut self,
        season_idx: usize,
        episode_idx: usize,
    ) -> Option<&mut EpisodeEditor> {
        self.seasons.get_mut(season_idx)?.episodes.get_mut(episode_idx)
    }

    pub fn mark_episode_saved(&mut self, season_idx: usize, episode_idx: usize, id: String) {
        if let Some(episode) = self.episode_mut(season_idx, episode_idx) {
            episode.mark_saved(id);
        }
    }

    /// Flat traversal order of every focusable control. Seasons and
    /// episodes are only reachable in edit mode.
    pub fn focus_order(&self) -> Vec<FormFocus> {
        let mut order = vec![
            FormFocus::Name,
            FormFocus::Status,
            FormFocus::Plot,
            FormFocus::Submit,
        ];
        if self.is_edit() {
            for (season_idx, season) in self.seasons.iter().enumerate() {
                for (episode_idx, episode) in season.episodes.iter().enumerate() {
                    for field in [
                        EpisodeField::Name,
                        EpisodeField::AirDate,
                        EpisodeField::SaveButton,
                    ] {
                        order.push(FormFocus::Episode {
                            season: season_idx,
                            episode: episode_idx,
                            field,
                        });
                    }
                    if episode.is_saved() {
                        order.push(FormFocus::Episode {
                            season: season_idx,
                            episode: episode_idx,
                            field: EpisodeField::RemoveButton,
                        });
                    }
                }
                order.push(FormFocus::AddEpisode { season: season_idx });
            }
            order.push(FormFocus::AddSeason);
            order.push(FormFocus::DeleteSeries);
        }
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let next = match order.iter().position(|focus| *focus == self.focus) {
            Some(idx) => (idx + 1) % order.len(),
            None => 0,
        };
        self.focus = order[next];
    }

    pub fn focus_previous(&mut self) {
        let order = self.focus_order();
        let previous = match order.iter().position(|focus| *focus == self.focus) {
            Some(0) | None => order.len() - 1,
            Some(idx) => idx - 1,
        };
        self.focus = order[previous];
    }

    /// Snap focus back to the first control if the focused one no
    /// longer exists, e.g. after a refresh removed an episode.
    pub fn clamp_focus(&mut self) {
        if !self.focus_order().contains(&self.focus) {
            self.focus = FormFocus::Name;
        }
    }

    pub fn handle_char(&mut self, c: char) {
        match self.focus {
            FormFocus::Name => self.name.push(c),
            FormFocus::Plot => self.plot.push(c),
            FormFocus::Status => {
                if c == ' ' {
                    self.airing_status = self.airing_status.next();
                }
            }
            FormFocus::Episode {
                season,
                episode,
                field,
            } => {
                if let Some(editor) = self.episode_mut(season, episode) {
                    match field {
                        EpisodeField::Name => editor.name.push(c),
                        EpisodeField::AirDate => editor.air_date.push(c),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    pub fn handle_backspace(&mut self) {
        match self.focus {
            FormFocus::Name => self.name.pop(),
            FormFocus::Plot => self.plot.pop(),
            FormFocus::Episode {
                season,
                episode,
                field,
            } => {
                if let Some(editor) = self.episode_mut(season, episode) {
                    match field {
                        EpisodeField::Name => editor.name.pop(),
                        EpisodeField::AirDate => editor.air_date.pop(),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    /// Left/right on the airing status select.
    pub fn cycle_status(&mut self, forward: bool) {
        if self.focus == FormFocus::Status {
            self.airing_status = if forward {
                self.airing_status.next()
            } else {
                self.airing_status.previous()
            };
        }
    }

    /// Validate the general fields in order and build the request
    /// body. The name check runs first and aborts before the plot is
    /// even looked at; `None` means nothing may be sent.
    pub fn prepare_submit(&mut self) -> Option<SeriesBody> {
        if !self.name.check_for_submit() {
            return None;
        }
        if !self.plot.check_for_submit() {
            return None;
        }
        Some(SeriesBody {
            name: self.name.value.clone(),
            plot: self.plot.value.clone(),
            airing_status: self.airing_status,
        })
    }

    /// Append a season numbered after the current count, seeded with
    /// one draft episode. Local only; nothing is persisted until that
    /// episode's own save action fires.
    pub fn add_season(&mut self) -> Option<u32> {
        if !self.is_edit() {
            return None;
        }
        let number = self.seasons.len() as u32 + 1;
        self.seasons.push(SeasonEditor::new_with_first_draft(number));
        Some(number)
    }

    /// Validate one episode's fields and build its request body.
    pub fn prepare_episode_save(
        &mut self,
        season_idx: usize,
        episode_idx: usize,
    ) -> Option<EpisodeBody> {
        let episode = self.episode_mut(season_idx, episode_idx)?;
        if !episode.name.check_for_submit() {
            return None;
        }
        if !episode.air_date.check_for_submit() {
            return None;
        }
        Some(EpisodeBody {
            season_number: episode.season_number,
            episode_number: episode.episode_number,
            name: episode.name.value.clone(),
            original_air_date: episode.parsed_air_date(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validity;

    fn edit_form() -> SeriesForm {
        let series = Series {
            id: "s1".to_string(),
            name: "Firefly".to_string(),
            plot: "Space western".to_string(),
            airing_status: AiringStatus::Ended,
            seasons: vec![Season {
                number: 1,
                episodes: vec![Episode {
                    episode_id: Some("e1".to_string()),
                    season_number: 1,
                    episode_number: 1,
                    name: "Serenity".to_string(),
                    original_air_date: NaiveDate::from_ymd_opt(2002, 12, 20),
                }],
            }],
        };
        SeriesForm::edit(&series)
    }

    #[test]
    fn test_create_form_defaults() {
        let form = SeriesForm::create();
        assert_eq!(form.mode, FormMode::Create);
        assert_eq!(form.airing_status, AiringStatus::Airing);
        assert!(form.seasons.is_empty());
        // Seasons are unreachable outside edit mode.
        assert_eq!(
            form.focus_order(),
            vec![
                FormFocus::Name,
                FormFocus::Status,
                FormFocus::Plot,
                FormFocus::Submit
            ]
        );
    }

    #[test]
    fn test_edit_form_copies_series_into_draft_state() {
        let form = edit_form();
        assert_eq!(form.series_id(), Some("s1"));
        assert_eq!(form.name.value, "Firefly");
        assert_eq!(form.plot.value, "Space western");
        assert_eq!(form.airing_status, AiringStatus::Ended);
        assert_eq!(form.seasons.len(), 1);
        assert_eq!(form.episode(0, 0).unwrap().air_date.value, "2002-12-20");
        assert!(form.episode(0, 0).unwrap().is_saved());
    }

    #[test]
    fn test_invalid_name_blocks_submit_before_plot_is_checked() {
        let mut form = SeriesForm::create();
        form.plot = FieldState::with_value(FieldKind::SeriesPlot, "p".repeat(501));

        assert!(form.prepare_submit().is_none());
        assert!(form.name.is_invalid());
        // The plot check never ran.
        assert_eq!(form.plot.validity, Validity::Unchecked);
    }

    #[test]
    fn test_invalid_plot_blocks_submit() {
        let mut form = SeriesForm::create();
        form.name = FieldState::with_value(FieldKind::SeriesName, "Firefly");
        form.plot = FieldState::with_value(FieldKind::SeriesPlot, "p".repeat(501));

        assert!(form.prepare_submit().is_none());
        assert!(form.plot.is_invalid());
    }

    #[test]
    fn test_submit_body_for_new_series() {
        let mut form = SeriesForm::create();
        for c in "Firefly".chars() {
            form.handle_char(c);
        }
        let body = form.prepare_submit().unwrap();
        assert_eq!(
            body,
            SeriesBody {
                name: "Firefly".to_string(),
                plot: String::new(),
                airing_status: AiringStatus::Airing,
            }
        );
    }

    #[test]
    fn test_add_season_numbers_follow_count() {
        let mut form = edit_form();
        assert_eq!(form.add_season(), Some(2));
        assert_eq!(form.add_season(), Some(3));

        let season = &form.seasons[2];
        assert_eq!(season.number, 3);
        assert_eq!(season.episodes.len(), 1);
        assert_eq!(season.episodes[0].episode_number, 1);
        assert_eq!(season.episodes[0].season_number, 3);
        assert!(!season.episodes[0].is_saved());
    }

    #[test]
    fn test_add_season_refused_in_create_mode() {
        let mut form = SeriesForm::create();
        assert_eq!(form.add_season(), None);
        assert!(form.seasons.is_empty());
    }

    #[test]
    fn test_add_episode_appends_draft_slot() {
        let mut form = edit_form();
        let idx = form.seasons[0].add_episode();

        assert_eq!(idx, 1);
        let episode = form.episode(0, 1).unwrap();
        assert_eq!(episode.episode_number, 2);
        assert_eq!(episode.name.value, "");
        assert!(!episode.is_saved());
    }

    #[test]
    fn test_episode_save_blocked_on_empty_name() {
        let mut form = edit_form();
        form.seasons[0].add_episode();

        assert!(form.prepare_episode_save(0, 1).is_none());
        assert_eq!(
            form.episode(0, 1).unwrap().name.error(),
            Some("An episode name is required.")
        );
    }

    #[test]
    fn test_episode_save_body_with_parsed_date() {
        let mut form = edit_form();
        form.seasons[0].add_episode();
        {
            let episode = form.episode_mut(0, 1).unwrap();
            for c in "The Train Job".chars() {
                episode.name.push(c);
            }
            for c in "2002-09-27".chars() {
                episode.air_date.push(c);
            }
        }

        let body = form.prepare_episode_save(0, 1).unwrap();
        assert_eq!(
            body,
            EpisodeBody {
                season_number: 1,
                episode_number: 2,
                name: "The Train Job".to_string(),
                original_air_date: NaiveDate::from_ymd_opt(2002, 9, 27),
            }
        );
    }

    #[test]
    fn test_mark_saved_transitions_draft() {
        let mut form = edit_form();
        form.seasons[0].add_episode();
        assert!(!form.episode(0, 1).unwrap().is_saved());

        form.mark_episode_saved(0, 1, "e2".to_string());
        assert_eq!(form.episode(0, 1).unwrap().saved_id(), Some("e2"));
    }

    #[test]
    fn test_focus_traversal_covers_episodes_and_wraps() {
        let mut form = edit_form();
        let order = form.focus_order();

        // Saved episode exposes its remove button.
        assert!(order.contains(&FormFocus::Episode {
            season: 0,
            episode: 0,
            field: EpisodeField::RemoveButton,
        }));
        assert_eq!(order.last(), Some(&FormFocus::DeleteSeries));

        for _ in 0..order.len() {
            form.focus_next();
        }
        assert_eq!(form.focus, FormFocus::Name);

        form.focus_previous();
        assert_eq!(form.focus, FormFocus::DeleteSeries);
    }

    #[test]
    fn test_clamp_focus_after_episode_disappears() {
        let mut form = edit_form();
        form.seasons[0].add_episode();
        form.focus = FormFocus::Episode {
            season: 0,
            episode: 1,
            field: EpisodeField::Name,
        };

        form.seasons[0].episodes.pop();
        form.clamp_focus();
        assert_eq!(form.focus, FormFocus::Name);
    }

    #[test]
    fn test_status_cycles_with_space_and_arrows() {
        let mut form = SeriesForm::create();
        form.focus = FormFocus::Status;

        form.handle_char(' ');
        assert_eq!(form.airing_status, AiringStatus::Upcoming);
        form.cycle_status(true);
        assert_eq!(form.airing_status, AiringStatus::Ended);
        form.cycle_status(false);
        assert_eq!(form.airing_status, AiringStatus::Upcoming);
    }
}
