//! Questionnaire flow controller
//!
//! A framework-independent state machine. The two network calls are split into a
//! `begin_*` step that hands out a ticket and a `complete_*` step that applies the result.
//! A completion is only applied when its ticket is the one the controller is waiting for,
//! so results arriving after `dispose()` (or for an abandoned attempt) are dropped.
//!
//! ```text
//! Loading -> Ready(0) -> .. select / advance / back .. -> Submitting -> Done
//!    |                                                       |
//!    +-> Failed (retry with begin_load)                      +-> Ready(last, last_error)
//! ```

use super::{OptionId, Question, QuestionId, QuestionnaireDocument, Response, ResponseSet, Screen, SelectionChange};
use crate::api::models::Id;
use crate::error::FlowError;
use crate::quote::{CompletedQuote, PricingRequest, ProductSelection, QuoteResult};

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    /// Waiting for the questionnaire document
    Loading,
    /// The fetch failed; `begin_load` again to retry
    Failed(FlowError),
    /// On a screen, `index` counts valid screens only
    Ready { index: usize, last_error: Option<FlowError> },
    /// The document had no screen with questions; pricing proceeds with no responses
    NoQuestions { last_error: Option<FlowError> },
    /// Price calculation in flight
    Submitting { index: usize },
    Done(CompletedQuote),
    Disposed,
}

/// Permission to run one questionnaire fetch
#[derive(Debug)]
pub struct LoadTicket {
    id: u64,
    model_id: Id,
}

impl LoadTicket {
    pub fn model_id(&self) -> &Id {
        &self.model_id
    }
}

/// Permission to run one price calculation, with the exact payload to send
#[derive(Debug)]
pub struct SubmissionTicket {
    id: u64,
    request: PricingRequest,
}

impl SubmissionTicket {
    pub fn request(&self) -> &PricingRequest {
        &self.request
    }
}

#[derive(Debug)]
pub enum Advance {
    Moved { index: usize },
    /// Last screen passed: send the ticket's request to the pricing service
    Submit(SubmissionTicket),
    /// A required question on this screen has no answer
    Blocked,
    /// A submission is already in flight
    Busy,
    /// Nothing to advance in the current state
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Back {
    Moved { index: usize },
    /// Already on the first screen: leave the flow. The controller is disposed.
    Exit,
    Busy,
    Unavailable,
}

#[derive(Debug)]
pub struct FlowController {
    model_id: Id,
    selection: ProductSelection,
    screens: Vec<Screen>,
    responses: ResponseSet,
    state: FlowState,
    next_ticket: u64,
    pending_load: Option<u64>,
    pending_submission: Option<u64>,
}

impl FlowController {
    pub fn new(model_id: Id, selection: ProductSelection) -> Self {
        Self {
            model_id,
            selection,
            screens: Vec::new(),
            responses: ResponseSet::new(),
            state: FlowState::Loading,
            next_ticket: 1,
            pending_load: None,
            pending_submission: None,
        }
    }

    pub fn model_id(&self) -> &Id {
        &self.model_id
    }

    pub fn selection(&self) -> &ProductSelection {
        &self.selection
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    // Loading

    /// Start (or retry) the questionnaire fetch
    ///
    /// Returns `None` while a fetch is already in flight or once the document is loaded.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        let can_start = matches!(self.state, FlowState::Loading | FlowState::Failed(_));
        if !can_start || self.pending_load.is_some() {
            return None;
        }

        let id = self.issue_ticket();
        self.pending_load = Some(id);
        self.state = FlowState::Loading;
        log::debug!("Questionnaire load started for model {} (ticket {})", self.model_id, id);

        Some(LoadTicket { id, model_id: self.model_id.clone() })
    }

    /// Apply a fetch result; returns whether it was applied
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<QuestionnaireDocument, FlowError>) -> bool {
        if self.pending_load != Some(ticket.id) {
            log::warn!("Ignoring stale questionnaire result (ticket {})", ticket.id);
            return false;
        }
        self.pending_load = None;

        match result {
            Ok(document) => {
                self.screens = document.into_valid_screens();
                self.responses.clear();
                self.state = if self.screens.is_empty() {
                    log::info!("Questionnaire for model {} has no questions", self.model_id);
                    FlowState::NoQuestions { last_error: None }
                } else {
                    log::info!(
                        "Questionnaire for model {} loaded with {} screens",
                        self.model_id,
                        self.screens.len()
                    );
                    FlowState::Ready { index: 0, last_error: None }
                };
            }
            Err(err) => {
                log::warn!("Questionnaire load for model {} failed: {}", self.model_id, err);
                self.state = FlowState::Failed(err);
            }
        }
        true
    }

    // Screens

    fn screen_index(&self) -> Option<usize> {
        match self.state {
            FlowState::Ready { index, .. } | FlowState::Submitting { index } if !self.screens.is_empty() => {
                Some(index.min(self.screens.len() - 1))
            }
            _ => None,
        }
    }

    /// The screen being shown, if the flow is on one
    pub fn current_screen(&self) -> Option<&Screen> {
        self.screen_index().map(|index| &self.screens[index])
    }

    /// `(current, total)`, 1-based
    pub fn position(&self) -> Option<(usize, usize)> {
        self.screen_index().map(|index| (index + 1, self.screens.len()))
    }

    /// Completion fraction for a progress indicator
    pub fn progress(&self) -> Option<f64> {
        self.position().map(|(current, total)| current as f64 / total as f64)
    }

    pub fn is_last_screen(&self) -> bool {
        match self.state {
            FlowState::NoQuestions { .. } => true,
            _ => self.position().is_some_and(|(current, total)| current == total),
        }
    }

    // Answers

    /// Record a selection on the current screen
    ///
    /// Returns `None` when the flow is not on a screen or the question/option is not part of it.
    pub fn select_option(&mut self, question: &QuestionId, option: &OptionId) -> Option<SelectionChange> {
        if !matches!(self.state, FlowState::Ready { .. }) {
            return None;
        }
        let index = self.screen_index()?;
        let screen = &self.screens[index];
        let question = screen.question(question)?;
        question.option(option)?;

        let change = self.responses.select(&screen.id, question, option);
        log::debug!(
            "Screen {} question {} option {}: {:?}",
            screen.id,
            question.id,
            option,
            change
        );
        Some(change)
    }

    /// Withdraw the answer to a question on the current screen
    ///
    /// Same preconditions as `select_option`; returns whether an answer was removed.
    pub fn clear_answer(&mut self, question: &QuestionId) -> bool {
        if !matches!(self.state, FlowState::Ready { .. }) {
            return false;
        }
        let Some(index) = self.screen_index() else {
            return false;
        };
        let screen = &self.screens[index];
        if screen.question(question).is_none() {
            return false;
        }

        let removed = self.responses.clear_answer(&screen.id, question);
        if removed > 0 {
            log::debug!("Screen {} question {}: cleared {} answer(s)", screen.id, question, removed);
        }
        removed > 0
    }

    pub fn is_option_selected(&self, question: &QuestionId, option: &OptionId) -> bool {
        self.current_screen()
            .is_some_and(|screen| self.responses.contains(&screen.id, question, option))
    }

    /// Required questions on the current screen that still have no answer
    pub fn missing_required(&self) -> Vec<&Question> {
        match self.current_screen() {
            Some(screen) => screen
                .required_questions()
                .filter(|q| !self.responses.has_answer(&screen.id, &q.id))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn can_advance(&self) -> bool {
        match self.state {
            FlowState::NoQuestions { .. } => true,
            FlowState::Ready { .. } => self.missing_required().is_empty(),
            _ => false,
        }
    }

    pub fn last_error(&self) -> Option<&FlowError> {
        match &self.state {
            FlowState::Ready { last_error, .. } | FlowState::NoQuestions { last_error } => last_error.as_ref(),
            FlowState::Failed(err) => Some(err),
            _ => None,
        }
    }

    // Navigation

    pub fn advance(&mut self) -> Advance {
        match self.state {
            FlowState::Submitting { .. } => Advance::Busy,
            FlowState::NoQuestions { .. } => self.start_submission(),
            FlowState::Ready { index, .. } => {
                if !self.can_advance() {
                    return Advance::Blocked;
                }
                if self.is_last_screen() {
                    return self.start_submission();
                }
                let index = index + 1;
                self.state = FlowState::Ready { index, last_error: None };
                Advance::Moved { index }
            }
            _ => Advance::Unavailable,
        }
    }

    /// Submit from the last screen; the user-initiated retry after a pricing failure
    pub fn submit_for_pricing(&mut self) -> Advance {
        match self.state {
            FlowState::Submitting { .. } => Advance::Busy,
            FlowState::NoQuestions { .. } => self.start_submission(),
            FlowState::Ready { .. } if self.is_last_screen() => {
                if self.can_advance() {
                    self.start_submission()
                } else {
                    Advance::Blocked
                }
            }
            _ => Advance::Unavailable,
        }
    }

    fn start_submission(&mut self) -> Advance {
        let index = self.screen_index().unwrap_or(0);
        let id = self.issue_ticket();
        self.pending_submission = Some(id);
        self.state = FlowState::Submitting { index };

        let request = PricingRequest {
            selected_product: self.selection.clone(),
            response: self.responses.as_slice().to_vec(),
        };
        log::info!(
            "Submitting {} responses for pricing of model {} (ticket {})",
            request.response.len(),
            self.model_id,
            id
        );

        Advance::Submit(SubmissionTicket { id, request })
    }

    /// Apply a pricing result; returns whether it was applied
    ///
    /// On failure the flow stays on the last screen with its answers untouched.
    pub fn complete_submission(&mut self, ticket: SubmissionTicket, result: Result<QuoteResult, FlowError>) -> bool {
        if self.pending_submission != Some(ticket.id) {
            log::warn!("Ignoring stale pricing result (ticket {})", ticket.id);
            return false;
        }
        self.pending_submission = None;

        let index = match self.state {
            FlowState::Submitting { index } => index,
            _ => 0,
        };

        match result {
            Ok(quote) => {
                log::info!("Quote for model {}: {}", self.model_id, quote.price);
                let responses: Vec<Response> = std::mem::take(&mut self.responses).into_vec();
                self.state = FlowState::Done(CompletedQuote {
                    quote,
                    selection: ticket.request.selected_product,
                    responses,
                });
            }
            Err(err) => {
                log::warn!("Pricing for model {} failed: {}", self.model_id, err);
                self.state = if self.screens.is_empty() {
                    FlowState::NoQuestions { last_error: Some(err) }
                } else {
                    FlowState::Ready { index, last_error: Some(err) }
                };
            }
        }
        true
    }

    pub fn go_back(&mut self) -> Back {
        match self.state {
            FlowState::Submitting { .. } => Back::Busy,
            FlowState::Ready { index, .. } if index > 0 => {
                let index = index.min(self.screens.len()) - 1;
                self.state = FlowState::Ready { index, last_error: None };
                Back::Moved { index }
            }
            FlowState::Ready { .. } | FlowState::NoQuestions { .. } | FlowState::Loading | FlowState::Failed(_) => {
                self.dispose();
                Back::Exit
            }
            FlowState::Done(_) | FlowState::Disposed => Back::Unavailable,
        }
    }

    /// Abandon the flow; pending results will be ignored
    pub fn dispose(&mut self) {
        if self.state != FlowState::Disposed {
            log::debug!("Questionnaire flow for model {} disposed", self.model_id);
        }
        self.pending_load = None;
        self.pending_submission = None;
        self.responses.clear();
        self.state = FlowState::Disposed;
    }

    pub fn completed(&self) -> Option<&CompletedQuote> {
        match &self.state {
            FlowState::Done(quote) => Some(quote),
            _ => None,
        }
    }

    pub fn into_completed(self) -> Option<CompletedQuote> {
        match self.state {
            FlowState::Done(quote) => Some(quote),
            _ => None,
        }
    }

    fn issue_ticket(&mut self) -> u64 {
        let id = self.next_ticket;
        self.next_ticket += 1;
        id
    }
}
