//! Condition questionnaire: document model, answer bookkeeping and the screen flow
//!
//! A questionnaire is an ordered list of screens, each holding questions with selectable
//! options. Only screens that contain at least one question take part in the flow.

use crate::api::models::Id;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod flow;
pub mod parse;
pub mod responses;
pub mod session;

pub use flow::{Advance, Back, FlowController, FlowState, LoadTicket, SubmissionTicket};
pub use parse::parse_document;
pub use responses::{ResponseSet, SelectionChange};
pub use session::{QuestionnaireSession, Step};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Id);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                $name(Id::Int(value))
            }
        }
    };
}

id_newtype!(ScreenId);
id_newtype!(QuestionId);
id_newtype!(OptionId);

/// How many options a question accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    /// `Radio`: one answer, a new pick replaces the old one
    SingleSelect,
    /// `CheckBox`: any number of answers, each toggled independently
    MultiSelect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOption {
    pub id: OptionId,
    pub name: String,
    pub short_description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub kind: QuestionType,
    pub required: bool,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option(&self, id: &OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| &o.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub id: ScreenId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

impl Screen {
    /// Screens without questions are skipped by the flow
    pub fn is_valid(&self) -> bool {
        !self.questions.is_empty()
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    pub fn required_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.required)
    }
}

/// Questionnaire as fetched for one model; never refetched during a flow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionnaireDocument {
    pub screens: Vec<Screen>,
}

impl QuestionnaireDocument {
    pub fn valid_screens(&self) -> impl Iterator<Item = &Screen> {
        self.screens.iter().filter(|s| s.is_valid())
    }

    pub fn into_valid_screens(self) -> Vec<Screen> {
        self.screens.into_iter().filter(Screen::is_valid).collect()
    }

    pub fn question_count(&self) -> usize {
        self.screens.iter().map(|s| s.questions.len()).sum()
    }
}

/// One recorded answer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "screenId")]
    pub screen_id: ScreenId,
    #[serde(rename = "questionId")]
    pub question_id: QuestionId,
    #[serde(rename = "optionId")]
    pub option_id: OptionId,
}
