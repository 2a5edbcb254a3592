use std::time::{Duration, Instant};

/// Which top-level view is showing, the terminal analog of the
/// original route set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// No usable session record; everything else is unreachable.
    Unauthenticated,
    SeriesList,
    SeriesForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One banner message with its display timestamp.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub(crate) shown_at: Instant,
}

/// Banner queue: one notice shows at a time and auto-dismisses after
/// three seconds, queued notices follow in order.
#[derive(Debug, Default)]
pub struct Notices {
    queue: Vec<Notice>,
}

impl Notices {
    pub const DISMISS_AFTER: Duration = Duration::from_secs(3);

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Success, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Error, text.into());
    }

    fn push(&mut self, kind: NoticeKind, text: String) {
        self.queue.push(Notice {
            kind,
            text,
            shown_at: Instant::now(),
        });
    }

    pub fn current(&self) -> Option<&Notice> {
        self.queue.first()
    }

    /// Drop the current notice once it has been visible long enough.
    /// The next one in the queue starts its timer from now.
    pub fn tick(&mut self) {
        let expired = self
            .queue
            .first()
            .is_some_and(|notice| notice.shown_at.elapsed() >= Self::DISMISS_AFTER);
        if expired {
            self.queue.remove(0);
            if let Some(next) = self.queue.first_mut() {
                next.shown_at = Instant::now();
            }
        }
    }

    pub fn dismiss(&mut self) {
        if !self.queue.is_empty() {
            self.queue.remove(0);
        }
    }
}

/// An open removal confirmation. Only ever constructed by the owning
/// Remove/Delete action, and the sole path to a deletion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    RemoveEpisode {
        season_idx: usize,
        episode_idx: usize,
        episode_name: String,
    },
    DeleteSeries {
        series_id: String,
        series_name: String,
    },
}

impl Prompt {
    pub fn question(&self) -> String {
        match self {
            Prompt::RemoveEpisode { episode_name, .. } => {
                format!("Are you sure you want to delete {episode_name}?")
            }
            Prompt::DeleteSeries { series_name, .. } => {
                format!("Are you sure you want to delete {series_name}?")
            }
        }
    }
}
