//! crates/study_planner_core/src/domain.rs
//!
//! Defines the pure, core data structures for the study planner.
//! These structs are transient: they live for one request or one session and
//! are never written to storage.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Lowest and highest number of study hours per day the form accepts.
pub const MIN_HOURS_PER_DAY: u8 = 1;
pub const MAX_HOURS_PER_DAY: u8 = 10;
/// Value the hours slider starts at.
pub const DEFAULT_HOURS_PER_DAY: u8 = 2;

//=========================================================================================
// Skill Level
//=========================================================================================

/// The learner's self-reported skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SkillLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownLevel(trimmed.to_string()))
    }
}

//=========================================================================================
// Study Requests
//=========================================================================================

/// A validation failure on a submitted study form. Messages are shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("⚠️ Please enter a subject.")]
    EmptySubject,
    #[error("⚠️ Unknown skill level '{0}'. Choose Beginner, Intermediate or Advanced.")]
    UnknownLevel(String),
    #[error("⚠️ Please choose how many hours you can study per day.")]
    MissingHours,
    #[error("⚠️ Study hours per day must be between 1 and 10 (got {0}).")]
    HoursOutOfRange(i64),
    #[error("⚠️ The exam date {exam_date} is in the past (today is {today}).")]
    ExamDateInPast { exam_date: NaiveDate, today: NaiveDate },
    #[error("⚠️ Please select a valid exam date.")]
    InvalidDate,
}

/// The raw fields of a study form, exactly as submitted.
///
/// `None` marks a field that was missing or could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyDraft {
    pub subject: String,
    pub level: String,
    pub hours_per_day: Option<i64>,
    pub exam_date: Option<NaiveDate>,
}

/// A validated study request, consumed once to build the plan and notes prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyRequest {
    subject: String,
    level: SkillLevel,
    hours_per_day: u8,
    exam_date: NaiveDate,
}

impl StudyRequest {
    /// Validates a draft against today's date.
    ///
    /// The subject is checked first so that an empty subject always yields
    /// `EmptySubject`, whatever else is wrong with the draft.
    pub fn validate(draft: StudyDraft, today: NaiveDate) -> Result<Self, ValidationError> {
        let subject = draft.subject.trim();
        if subject.is_empty() {
            return Err(ValidationError::EmptySubject);
        }

        let level = draft.level.parse::<SkillLevel>()?;

        let hours = draft.hours_per_day.ok_or(ValidationError::MissingHours)?;
        let hours_per_day = u8::try_from(hours)
            .ok()
            .filter(|h| (MIN_HOURS_PER_DAY..=MAX_HOURS_PER_DAY).contains(h))
            .ok_or(ValidationError::HoursOutOfRange(hours))?;

        let exam_date = draft.exam_date.ok_or(ValidationError::InvalidDate)?;
        if exam_date < today {
            return Err(ValidationError::ExamDateInPast { exam_date, today });
        }

        Ok(Self {
            subject: subject.to_string(),
            level,
            hours_per_day,
            exam_date,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn level(&self) -> SkillLevel {
        self.level
    }

    pub fn hours_per_day(&self) -> u8 {
        self.hours_per_day
    }

    pub fn exam_date(&self) -> NaiveDate {
        self.exam_date
    }

    /// Whole calendar days from `today` until the exam.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.exam_date - today).num_days()
    }
}

//=========================================================================================
// Chat
//=========================================================================================

/// A single question-and-answer exchange from the sidebar chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

/// The append-only chat history of one session.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn and returns a reference to it.
    pub fn push(&mut self, turn: ChatTurn) -> &ChatTurn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns in the order they were asked.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    /// Turns with the most recent first, the order the sidebar shows them.
    pub fn newest_first(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter().rev()
    }
}

//=========================================================================================
// Generated Content
//=========================================================================================

/// The two texts produced for one successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedContent {
    pub plan: String,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn draft(subject: &str) -> StudyDraft {
        StudyDraft {
            subject: subject.to_string(),
            level: "Beginner".to_string(),
            hours_per_day: Some(2),
            exam_date: Some(today() + chrono::Duration::days(7)),
        }
    }

    #[test]
    fn blank_subjects_are_rejected() {
        for subject in ["", " ", "\t\n", "   \u{3000}"] {
            assert_eq!(
                StudyRequest::validate(draft(subject), today()),
                Err(ValidationError::EmptySubject),
                "subject {subject:?} should be rejected"
            );
        }
    }

    #[test]
    fn subject_is_trimmed() {
        let request = StudyRequest::validate(draft("  Chemistry \n"), today()).unwrap();
        assert_eq!(request.subject(), "Chemistry");
    }

    #[test]
    fn days_left_is_the_calendar_difference() {
        let request = StudyRequest::validate(draft("History"), today()).unwrap();
        assert_eq!(request.days_left(today()), 7);
    }

    #[test]
    fn days_left_crosses_month_and_leap_day() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let mut d = draft("Maths");
        d.exam_date = NaiveDate::from_ymd_opt(2024, 3, 2);
        let request = StudyRequest::validate(d, today).unwrap();
        assert_eq!(request.days_left(today), 4);
    }

    #[test]
    fn exam_today_is_allowed() {
        let mut d = draft("Biology");
        d.exam_date = Some(today());
        let request = StudyRequest::validate(d, today()).unwrap();
        assert_eq!(request.days_left(today()), 0);
    }

    #[test]
    fn past_exam_date_is_rejected() {
        let mut d = draft("Biology");
        d.exam_date = Some(today() - chrono::Duration::days(1));
        assert!(matches!(
            StudyRequest::validate(d, today()),
            Err(ValidationError::ExamDateInPast { .. })
        ));
    }

    #[test]
    fn hours_must_be_in_range() {
        for hours in [0, 11, -3, 300] {
            let mut d = draft("Physics");
            d.hours_per_day = Some(hours);
            assert_eq!(
                StudyRequest::validate(d, today()),
                Err(ValidationError::HoursOutOfRange(hours))
            );
        }
        for hours in [1, 10] {
            let mut d = draft("Physics");
            d.hours_per_day = Some(hours);
            assert!(StudyRequest::validate(d, today()).is_ok());
        }
    }

    #[test]
    fn unparsed_fields_are_reported() {
        let mut d = draft("Physics");
        d.hours_per_day = None;
        assert_eq!(StudyRequest::validate(d, today()), Err(ValidationError::MissingHours));

        let mut d = draft("Physics");
        d.exam_date = None;
        assert_eq!(StudyRequest::validate(d, today()), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn empty_subject_wins_over_other_errors() {
        let d = StudyDraft {
            subject: " ".to_string(),
            level: "Wizard".to_string(),
            hours_per_day: None,
            exam_date: None,
        };
        assert_eq!(StudyRequest::validate(d, today()), Err(ValidationError::EmptySubject));
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("advanced".parse::<SkillLevel>(), Ok(SkillLevel::Advanced));
        assert_eq!(" Intermediate ".parse::<SkillLevel>(), Ok(SkillLevel::Intermediate));
        assert_eq!(
            "Expert".parse::<SkillLevel>(),
            Err(ValidationError::UnknownLevel("Expert".to_string()))
        );
    }

    #[test]
    fn history_lists_newest_first() {
        let mut history = ChatHistory::new();
        for q in ["first", "second", "third"] {
            history.push(ChatTurn {
                question: q.to_string(),
                answer: format!("answer to {q}"),
            });
        }
        let order: Vec<_> = history.newest_first().map(|t| t.question.as_str()).collect();
        assert_eq!(order, ["third", "second", "first"]);
        assert_eq!(history.iter().next().unwrap().question, "first");
    }
}
