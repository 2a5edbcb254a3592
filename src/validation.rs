//! Field validation for the series form.
//!
//! Every editable field owns a [`FieldState`] holding its text buffer
//! and the outcome of the last check. Validation itself is a pure
//! function of the value, re-run on every edit so the rendered
//! valid/invalid marker can never disagree with the buffer.

use chrono::NaiveDate;

pub const NAME_MAX_CHARS: usize = 250;
pub const PLOT_MAX_CHARS: usize = 500;

pub const AIR_DATE_FORMAT: &str = "%Y-%m-%d";

/// What the field semantically holds, which decides its constraint set
/// and error wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    SeriesName,
    SeriesPlot,
    EpisodeName,
    AirDate,
}

/// Outcome of checking one field. `Invalid` carries the message to
/// show next to the field; a field is either valid or invalid, never
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Validity {
    /// Not checked yet; no marker is shown.
    #[default]
    Unchecked,
    Valid,
    Invalid(String),
}

/// Check a single value against the rules for its kind.
pub fn validate(kind: FieldKind, value: &str) -> Validity {
    match kind {
        FieldKind::SeriesName => {
            if value.is_empty() {
                Validity::Invalid("A series name is required.".to_string())
            } else if value.chars().count() > NAME_MAX_CHARS {
                Validity::Invalid(format!(
                    "The series name can have a maximum of {NAME_MAX_CHARS} characters."
                ))
            } else {
                Validity::Valid
            }
        }
        FieldKind::SeriesPlot => {
            // The plot is optional, only its length is constrained.
            if value.chars().count() > PLOT_MAX_CHARS {
                Validity::Invalid(format!(
                    "The series plot can have a maximum of {PLOT_MAX_CHARS} characters."
                ))
            } else {
                Validity::Valid
            }
        }
        FieldKind::EpisodeName => {
            if value.is_empty() {
                Validity::Invalid("An episode name is required.".to_string())
            } else if value.chars().count() > NAME_MAX_CHARS {
                Validity::Invalid(format!(
                    "The episode name can be a maximum of {NAME_MAX_CHARS} characters."
                ))
            } else {
                Validity::Valid
            }
        }
        FieldKind::AirDate => {
            if value.is_empty() || NaiveDate::parse_from_str(value, AIR_DATE_FORMAT).is_ok() {
                Validity::Valid
            } else {
                Validity::Invalid(
                    "The air date must be a date in YYYY-MM-DD format.".to_string(),
                )
            }
        }
    }
}

/// One editable field: its buffer plus the last validation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    pub kind: FieldKind,
    pub value: String,
    pub validity: Validity,
}

impl FieldState {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            value: String::new(),
            validity: Validity::Unchecked,
        }
    }

    pub fn with_value(kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            validity: Validity::Unchecked,
        }
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
        self.revalidate();
    }

    pub fn pop(&mut self) {
        self.value.pop();
        self.revalidate();
    }

    pub fn revalidate(&mut self) {
        self.validity = validate(self.kind, &self.value);
    }

    /// Validate now and report whether the value may be submitted.
    pub fn check_for_submit(&mut self) -> bool {
        self.revalidate();
        self.validity == Validity::Valid
    }

    pub fn error(&self) -> Option<&str> {
        match &self.validity {
            Validity::Invalid(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.validity, Validity::Invalid(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_name_required() {
        assert_eq!(
            validate(FieldKind::SeriesName, ""),
            Validity::Invalid("A series name is required.".to_string())
        );
    }

    #[test]
    fn test_series_name_length() {
        let long = "x".repeat(251);
        assert_eq!(
            validate(FieldKind::SeriesName, &long),
            Validity::Invalid(
                "The series name can have a maximum of 250 characters.".to_string()
            )
        );
        assert_eq!(validate(FieldKind::SeriesName, &"x".repeat(250)), Validity::Valid);
    }

    #[test]
    fn test_plot_is_never_required() {
        assert_eq!(validate(FieldKind::SeriesPlot, ""), Validity::Valid);
        assert_eq!(
            validate(FieldKind::SeriesPlot, &"p".repeat(501)),
            Validity::Invalid(
                "The series plot can have a maximum of 500 characters.".to_string()
            )
        );
        assert_eq!(validate(FieldKind::SeriesPlot, &"p".repeat(500)), Validity::Valid);
    }

    #[test]
    fn test_episode_name_messages() {
        assert_eq!(
            validate(FieldKind::EpisodeName, ""),
            Validity::Invalid("An episode name is required.".to_string())
        );
        assert_eq!(
            validate(FieldKind::EpisodeName, &"e".repeat(251)),
            Validity::Invalid(
                "The episode name can be a maximum of 250 characters.".to_string()
            )
        );
    }

    #[test]
    fn test_air_date_rules() {
        assert_eq!(validate(FieldKind::AirDate, ""), Validity::Valid);
        assert_eq!(validate(FieldKind::AirDate, "2002-09-20"), Validity::Valid);
        assert!(matches!(
            validate(FieldKind::AirDate, "09/20/2002"),
            Validity::Invalid(_)
        ));
        assert!(matches!(
            validate(FieldKind::AirDate, "2002-13-40"),
            Validity::Invalid(_)
        ));
    }

    #[test]
    fn test_field_state_revalidates_on_edit() {
        let mut field = FieldState::new(FieldKind::EpisodeName);
        assert_eq!(field.validity, Validity::Unchecked);

        field.push('S');
        assert_eq!(field.validity, Validity::Valid);

        field.pop();
        assert!(field.is_invalid());
        assert_eq!(field.error(), Some("An episode name is required."));

        // The invalid marker and message clear in one assignment.
        field.push('S');
        assert_eq!(field.validity, Validity::Valid);
        assert_eq!(field.error(), None);
    }
}
