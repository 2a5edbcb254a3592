//! Domain types shared between the API client and the TUI, mirroring
//! the backend's JSON wire format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a series currently stands in its broadcast life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiringStatus {
    #[default]
    Airing,
    Upcoming,
    Ended,
}

impl AiringStatus {
    pub const ALL: [AiringStatus; 3] = [
        AiringStatus::Airing,
        AiringStatus::Upcoming,
        AiringStatus::Ended,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AiringStatus::Airing => "Airing",
            AiringStatus::Upcoming => "Upcoming",
            AiringStatus::Ended => "Ended",
        }
    }

    pub fn next(self) -> Self {
        match self {
            AiringStatus::Airing => AiringStatus::Upcoming,
            AiringStatus::Upcoming => AiringStatus::Ended,
            AiringStatus::Ended => AiringStatus::Airing,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            AiringStatus::Airing => AiringStatus::Ended,
            AiringStatus::Upcoming => AiringStatus::Airing,
            AiringStatus::Ended => AiringStatus::Upcoming,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub plot: String,
    #[serde(rename = "airingStatus", default)]
    pub airing_status: AiringStatus,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

/// A season only exists nested under a series; it is never persisted
/// on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub number: u32,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Absent until the backend has stored the episode.
    #[serde(rename = "episodeId", default, skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<String>,
    #[serde(rename = "seasonNumber")]
    pub season_number: u32,
    #[serde(rename = "episodeNumber")]
    pub episode_number: u32,
    pub name: String,
    #[serde(rename = "originalAirDate", default)]
    pub original_air_date: Option<NaiveDate>,
}

/// Request body for creating or updating a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesBody {
    pub name: String,
    pub plot: String,
    #[serde(rename = "airingStatus")]
    pub airing_status: AiringStatus,
}

/// Request body for adding or updating an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeBody {
    #[serde(rename = "seasonNumber")]
    pub season_number: u32,
    #[serde(rename = "episodeNumber")]
    pub episode_number: u32,
    pub name: String,
    #[serde(rename = "originalAirDate")]
    pub original_air_date: Option<NaiveDate>,
}
