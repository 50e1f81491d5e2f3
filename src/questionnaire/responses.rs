use super::{OptionId, Question, QuestionId, QuestionType, Response, ScreenId};

/// What a selection did to the response set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    /// Single-select answer replaced; carries the option that was dropped
    Replaced { previous: OptionId },
    /// Multi-select option toggled off
    Removed,
}

/// Answers accumulated over one questionnaire session, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseSet {
    entries: Vec<Response>,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a selection using the question's rule
    ///
    /// Single-select drops any prior answer for the (screen, question) pair and appends the
    /// new one, so a repeated pick moves to the end. Multi-select toggles the option.
    pub fn select(&mut self, screen: &ScreenId, question: &Question, option: &OptionId) -> SelectionChange {
        match question.kind {
            QuestionType::SingleSelect => {
                let previous = self
                    .position_of(screen, &question.id)
                    .map(|index| self.entries.remove(index).option_id);
                self.push(screen, &question.id, option);
                match previous {
                    Some(previous) => SelectionChange::Replaced { previous },
                    None => SelectionChange::Added,
                }
            }
            QuestionType::MultiSelect => {
                let existing = self.entries.iter().position(|r| {
                    &r.screen_id == screen && r.question_id == question.id && &r.option_id == option
                });
                match existing {
                    Some(index) => {
                        self.entries.remove(index);
                        SelectionChange::Removed
                    }
                    None => {
                        self.push(screen, &question.id, option);
                        SelectionChange::Added
                    }
                }
            }
        }
    }

    /// Drop every answer for the (screen, question) pair; returns how many were removed
    pub fn clear_answer(&mut self, screen: &ScreenId, question: &QuestionId) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|r| !(&r.screen_id == screen && &r.question_id == question));
        before - self.entries.len()
    }

    pub fn contains(&self, screen: &ScreenId, question: &QuestionId, option: &OptionId) -> bool {
        self.entries
            .iter()
            .any(|r| &r.screen_id == screen && &r.question_id == question && &r.option_id == option)
    }

    pub fn has_answer(&self, screen: &ScreenId, question: &QuestionId) -> bool {
        self.position_of(screen, question).is_some()
    }

    pub fn answers_for<'a>(
        &'a self,
        screen: &'a ScreenId,
        question: &'a QuestionId,
    ) -> impl Iterator<Item = &'a OptionId> + 'a {
        self.entries
            .iter()
            .filter(move |r| &r.screen_id == screen && &r.question_id == question)
            .map(|r| &r.option_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Response> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Response] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn into_vec(self) -> Vec<Response> {
        self.entries
    }

    fn position_of(&self, screen: &ScreenId, question: &QuestionId) -> Option<usize> {
        self.entries
            .iter()
            .position(|r| &r.screen_id == screen && &r.question_id == question)
    }

    fn push(&mut self, screen: &ScreenId, question: &QuestionId, option: &OptionId) {
        self.entries.push(Response {
            screen_id: screen.clone(),
            question_id: question.clone(),
            option_id: option.clone(),
        });
    }
}
