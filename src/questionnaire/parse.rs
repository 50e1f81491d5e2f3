//! Boundary validation: wire questionnaire -> typed document

use super::{AnswerOption, OptionId, Question, QuestionId, QuestionType, QuestionnaireDocument, Screen, ScreenId};
use crate::api::models::{QuestionnaireEnvelope, WireOption, WireQuestion, WireScreen};
use crate::error::FlowError;
use std::collections::HashSet;

/// Turn a fetched envelope into a document
///
/// `success: false` or a missing questionnaire means there is nothing for this model.
/// A questionnaire without `screens` is valid and simply has no questions.
pub fn parse_document(envelope: QuestionnaireEnvelope) -> Result<QuestionnaireDocument, FlowError> {
    if envelope.success == Some(false) {
        log::info!(
            "Questionnaire lookup rejected: {}",
            envelope.msg.as_deref().unwrap_or("no message")
        );
        return Err(FlowError::NotFound);
    }

    let questionnaire = envelope.questionnaire.ok_or(FlowError::NotFound)?;
    let screens = questionnaire
        .screens
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, screen)| parse_screen(index, screen))
        .collect::<Result<Vec<_>, _>>()?;

    let document = QuestionnaireDocument { screens };
    log::debug!(
        "Parsed questionnaire: {} screens ({} with questions), {} questions",
        document.screens.len(),
        document.valid_screens().count(),
        document.question_count()
    );
    Ok(document)
}

fn parse_screen(index: usize, screen: WireScreen) -> Result<Screen, FlowError> {
    let id = screen
        .screen_id
        .map(ScreenId)
        .ok_or_else(|| invalid(format!("screen #{} has no Screen_Id", index + 1)))?;

    let mut seen = HashSet::new();
    let mut questions = Vec::new();
    for wire in screen.questions.unwrap_or_default() {
        let question = parse_question(&id, wire)?;
        if !seen.insert(question.id.clone()) {
            return Err(invalid(format!("screen {} repeats question {}", id, question.id)));
        }
        questions.push(question);
    }

    Ok(Screen {
        id,
        title: non_blank(screen.title),
        description: non_blank(screen.description),
        questions,
    })
}

fn parse_question(screen: &ScreenId, question: WireQuestion) -> Result<Question, FlowError> {
    let id = question
        .question_id
        .map(QuestionId)
        .ok_or_else(|| invalid(format!("screen {} has a question without Question_Id", screen)))?;

    let kind = match question.question_type.as_deref().map(str::trim) {
        Some("Radio") => QuestionType::SingleSelect,
        Some("CheckBox") => QuestionType::MultiSelect,
        Some(other) => {
            return Err(invalid(format!("question {} has unknown Type '{}'", id, other)));
        }
        None => return Err(invalid(format!("question {} has no Type", id))),
    };

    let options = question
        .options
        .unwrap_or_default()
        .into_iter()
        .map(|option| parse_option(&id, option))
        .collect::<Result<Vec<_>, _>>()?;

    // A required question nobody can answer would block the screen for good
    let required = question.is_required.map(|f| f.0).unwrap_or(false);
    if required && options.is_empty() {
        return Err(invalid(format!("required question {} has no options", id)));
    }

    Ok(Question {
        id,
        text: question.question_name.unwrap_or_default(),
        kind,
        required,
        options,
    })
}

fn parse_option(question: &QuestionId, option: WireOption) -> Result<AnswerOption, FlowError> {
    let id = option
        .option_id
        .map(OptionId)
        .ok_or_else(|| invalid(format!("question {} has an option without Option_Id", question)))?;

    Ok(AnswerOption {
        id,
        name: option.option_name.unwrap_or_default(),
        short_description: non_blank(option.short_description),
        image: non_blank(option.image),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn invalid(message: String) -> FlowError {
    FlowError::InvalidQuestionnaire(message)
}
