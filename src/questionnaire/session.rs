//! Async driver tying a [`FlowController`] to its remote services

use super::flow::{Advance, Back, FlowController, FlowState};
use super::{OptionId, QuestionId, SelectionChange};
use crate::api::models::Id;
use crate::error::FlowError;
use crate::quote::{CompletedQuote, ProductSelection, QuoteResult};
use crate::services::{PricingService, QuestionnaireService};

/// Outcome of a navigation request
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Now showing the screen at this index
    Screen(usize),
    /// Advance refused: required questions unanswered
    Blocked,
    /// Pricing succeeded; the flow is done
    Quoted(QuoteResult),
    /// Pricing failed; still on the last screen with answers intact
    PricingFailed(FlowError),
    /// Backed out of the first screen; the flow is over
    Exit,
    /// Request not applicable in the current state
    Ignored,
}

pub struct QuestionnaireSession<S> {
    services: S,
    controller: FlowController,
}

impl<S> QuestionnaireSession<S>
where
    S: QuestionnaireService + PricingService,
{
    pub fn new(services: S, model_id: Id, selection: ProductSelection) -> Self {
        Self {
            services,
            controller: FlowController::new(model_id, selection),
        }
    }

    pub fn controller(&self) -> &FlowController {
        &self.controller
    }

    pub fn state(&self) -> &FlowState {
        self.controller.state()
    }

    /// Fetch the questionnaire; call again after a failure to retry
    pub async fn load(&mut self) -> Result<(), FlowError> {
        let Some(ticket) = self.controller.begin_load() else {
            return Ok(());
        };

        let result = self.services.fetch_questionnaire(ticket.model_id()).await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        self.controller.complete_load(ticket, result);
        outcome
    }

    pub fn select_option(&mut self, question: &QuestionId, option: &OptionId) -> Option<SelectionChange> {
        self.controller.select_option(question, option)
    }

    pub fn clear_answer(&mut self, question: &QuestionId) -> bool {
        self.controller.clear_answer(question)
    }

    pub fn can_advance(&self) -> bool {
        self.controller.can_advance()
    }

    /// Move forward, submitting for pricing from the last screen
    pub async fn advance(&mut self) -> Step {
        let action = self.controller.advance();
        self.run(action).await
    }

    /// Retry pricing from the last screen
    pub async fn submit_for_pricing(&mut self) -> Step {
        let action = self.controller.submit_for_pricing();
        self.run(action).await
    }

    pub fn go_back(&mut self) -> Step {
        match self.controller.go_back() {
            Back::Moved { index } => Step::Screen(index),
            Back::Exit => Step::Exit,
            Back::Busy | Back::Unavailable => Step::Ignored,
        }
    }

    pub fn dispose(&mut self) {
        self.controller.dispose();
    }

    pub fn into_completed(self) -> Option<CompletedQuote> {
        self.controller.into_completed()
    }

    async fn run(&mut self, action: Advance) -> Step {
        match action {
            Advance::Moved { index } => Step::Screen(index),
            Advance::Blocked => Step::Blocked,
            Advance::Busy | Advance::Unavailable => Step::Ignored,
            Advance::Submit(ticket) => {
                let result = self.services.calculate_price(ticket.request()).await;
                let step = match &result {
                    Ok(quote) => Step::Quoted(*quote),
                    Err(err) => Step::PricingFailed(err.clone()),
                };
                if self.controller.complete_submission(ticket, result) {
                    step
                } else {
                    Step::Ignored
                }
            }
        }
    }
}
