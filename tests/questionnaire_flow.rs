//! End-to-end questionnaire scenarios against an in-memory backend
//!
//! Drives `QuestionnaireSession` the way the CLI does and checks screen sequencing,
//! answer rules, pricing and the failure paths.

mod common;

use common::*;
use resale_client::FlowError;
use resale_client::api::models::{Amount, Id};
use resale_client::questionnaire::{
    Advance, FlowController, FlowState, QuestionType, QuestionnaireDocument, QuestionnaireSession, Response,
    ScreenId, SelectionChange, Step,
};
use resale_client::quote::QuoteResult;

fn quote(price: f64) -> QuoteResult {
    QuoteResult { price: Amount(price) }
}

fn response(screen: i64, question: i64, option: i64) -> Response {
    Response {
        screen_id: ScreenId::from(screen),
        question_id: q(question),
        option_id: o(option),
    }
}

async fn loaded_session(backend: &FakeBackend) -> QuestionnaireSession<&FakeBackend> {
    let mut session = QuestionnaireSession::new(backend, Id::Int(101), selection());
    session.load().await.unwrap();
    session
}

/// Screens without questions are skipped and positions count valid screens only
#[tokio::test]
async fn test_empty_screen_is_skipped() {
    let backend = FakeBackend::new().with_document(Ok(three_screen_document()));
    let mut session = loaded_session(&backend).await;

    let controller = session.controller();
    assert_eq!(controller.screens().len(), 2);
    assert_eq!(controller.current_screen().unwrap().id, ScreenId::from(1));
    assert_eq!(controller.position(), Some((1, 2)));
    assert_eq!(controller.progress(), Some(0.5));

    session.select_option(&q(10), &o(100));
    assert_eq!(session.advance().await, Step::Screen(1));

    let controller = session.controller();
    assert_eq!(controller.current_screen().unwrap().id, ScreenId::from(3));
    assert_eq!(controller.position(), Some((2, 2)));
    assert!(controller.is_last_screen());
}

/// A single-select question keeps only the most recent answer
#[tokio::test]
async fn test_single_select_replaces() {
    let backend = FakeBackend::new().with_document(Ok(three_screen_document()));
    let mut session = loaded_session(&backend).await;

    assert_eq!(session.select_option(&q(10), &o(100)), Some(SelectionChange::Added));
    assert_eq!(
        session.select_option(&q(10), &o(101)),
        Some(SelectionChange::Replaced { previous: o(100) })
    );

    let answers: Vec<&Response> = session.controller().responses().iter().collect();
    assert_eq!(answers, vec![&response(1, 10, 101)]);
}

/// Toggling A, B, A on a multi-select question leaves only B
#[tokio::test]
async fn test_multi_select_toggles() {
    let backend = FakeBackend::new().with_document(Ok(three_screen_document()));
    let mut session = loaded_session(&backend).await;

    session.select_option(&q(11), &o(110));
    session.select_option(&q(11), &o(111));
    assert_eq!(session.select_option(&q(11), &o(110)), Some(SelectionChange::Removed));

    assert_eq!(session.controller().responses().as_slice(), &[response(1, 11, 111)]);
}

/// Required questions gate advancing; optional ones do not
#[tokio::test]
async fn test_required_question_gates_advance() {
    let backend = FakeBackend::new().with_document(Ok(three_screen_document()));
    let mut session = loaded_session(&backend).await;

    session.select_option(&q(11), &o(112));
    assert!(!session.can_advance());
    assert_eq!(session.advance().await, Step::Blocked);
    assert_eq!(session.controller().position(), Some((1, 2)));

    session.select_option(&q(10), &o(100));
    assert!(session.can_advance());
}

/// Going back and forward again keeps every answer
#[tokio::test]
async fn test_answers_survive_back_and_forth() {
    let backend = FakeBackend::new().with_document(Ok(three_screen_document()));
    let mut session = loaded_session(&backend).await;

    session.select_option(&q(10), &o(101));
    session.select_option(&q(11), &o(110));
    session.advance().await;
    session.select_option(&q(30), &o(300));
    let before = session.controller().responses().clone();

    assert_eq!(session.go_back(), Step::Screen(0));
    assert!(session.controller().is_option_selected(&q(10), &o(101)));
    assert_eq!(session.advance().await, Step::Screen(1));

    assert_eq!(session.controller().responses(), &before);
    assert!(session.can_advance());
}

/// A successful quote ends the flow with exactly the accumulated answers, in order
#[tokio::test]
async fn test_successful_pricing() {
    let backend = FakeBackend::new()
        .with_document(Ok(three_screen_document()))
        .with_price(Ok(quote(18500.0)));
    let mut session = loaded_session(&backend).await;

    session.select_option(&q(11), &o(112));
    session.select_option(&q(10), &o(100));
    session.advance().await;
    session.select_option(&q(30), &o(301));

    assert_eq!(session.advance().await, Step::Quoted(quote(18500.0)));

    let expected = vec![response(1, 11, 112), response(1, 10, 100), response(3, 30, 301)];
    let requests = backend.recorded();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].response, expected);
    assert_eq!(requests[0].selected_product, selection());

    let completed = session.into_completed().unwrap();
    assert_eq!(completed.quote.price, Amount(18500.0));
    assert_eq!(completed.responses, expected);
}

/// A withdrawn optional answer is not sent for pricing
#[tokio::test]
async fn test_cleared_answer_is_not_priced() {
    let backend = FakeBackend::new()
        .with_document(Ok(three_screen_document()))
        .with_price(Ok(quote(20000.0)));
    let mut session = loaded_session(&backend).await;

    session.select_option(&q(10), &o(100));
    session.select_option(&q(11), &o(110));
    session.select_option(&q(11), &o(112));
    assert!(session.clear_answer(&q(11)));
    assert!(!session.clear_answer(&q(11)));
    assert!(session.can_advance());

    session.advance().await;
    session.select_option(&q(30), &o(300));
    assert_eq!(session.advance().await, Step::Quoted(quote(20000.0)));

    let requests = backend.recorded();
    assert_eq!(requests[0].response, vec![response(1, 10, 100), response(3, 30, 300)]);
}

/// A rejected quote keeps the flow on the last screen with its answers intact
#[tokio::test]
async fn test_pricing_failure_keeps_answers() {
    let backend = FakeBackend::new()
        .with_document(Ok(three_screen_document()))
        .with_price(Err(FlowError::PricingService("price unavailable".into())))
        .with_price(Ok(quote(17000.0)));
    let mut session = loaded_session(&backend).await;

    session.select_option(&q(10), &o(100));
    session.advance().await;
    session.select_option(&q(30), &o(300));
    let before = session.controller().responses().clone();

    let step = session.advance().await;
    assert_eq!(step, Step::PricingFailed(FlowError::PricingService("price unavailable".into())));

    let controller = session.controller();
    assert_eq!(controller.position(), Some((2, 2)));
    assert!(controller.can_advance());
    assert_eq!(controller.responses(), &before);
    assert!(matches!(controller.last_error(), Some(FlowError::PricingService(_))));

    assert_eq!(session.submit_for_pricing().await, Step::Quoted(quote(17000.0)));
    let requests = backend.recorded();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].response, requests[1].response);
}

/// A questionnaire with no usable screens goes straight to pricing with no answers
#[tokio::test]
async fn test_no_questions_prices_directly() {
    let document = QuestionnaireDocument {
        screens: vec![screen(1, vec![]), screen(2, vec![])],
    };
    let backend = FakeBackend::new()
        .with_document(Ok(document))
        .with_price(Ok(quote(9000.0)));
    let mut session = loaded_session(&backend).await;

    assert!(matches!(session.state(), FlowState::NoQuestions { .. }));
    assert!(session.can_advance());
    assert!(session.controller().current_screen().is_none());

    assert_eq!(session.advance().await, Step::Quoted(quote(9000.0)));
    assert!(backend.recorded()[0].response.is_empty());
}

/// Load failures are reported and can be retried
#[tokio::test]
async fn test_load_failure_and_retry() {
    let backend = FakeBackend::new()
        .with_document(Err(FlowError::Network("connection refused".into())))
        .with_document(Ok(three_screen_document()));
    let mut session = QuestionnaireSession::new(&backend, Id::Int(101), selection());

    let err = session.load().await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(session.state(), FlowState::Failed(FlowError::Network(_))));
    assert_eq!(session.advance().await, Step::Ignored);

    session.load().await.unwrap();
    assert_eq!(session.controller().position(), Some((1, 2)));
}

/// A missing questionnaire is not retryable
#[tokio::test]
async fn test_missing_questionnaire() {
    let backend = FakeBackend::new().with_document(Err(FlowError::NotFound));
    let mut session = QuestionnaireSession::new(&backend, Id::Int(404), selection());

    assert_eq!(session.load().await, Err(FlowError::NotFound));
    assert!(!FlowError::NotFound.is_retryable());
    assert_eq!(session.go_back(), Step::Exit);
    assert_eq!(session.state(), &FlowState::Disposed);
}

/// Backing out of the first screen ends the flow and drops the answers
#[tokio::test]
async fn test_back_from_first_screen_exits() {
    let backend = FakeBackend::new().with_document(Ok(three_screen_document()));
    let mut session = loaded_session(&backend).await;

    session.select_option(&q(10), &o(100));
    assert_eq!(session.go_back(), Step::Exit);
    assert_eq!(session.state(), &FlowState::Disposed);
    assert!(session.controller().responses().is_empty());
    assert_eq!(session.go_back(), Step::Ignored);
}

/// Results arriving after the flow is abandoned are dropped
#[test]
fn test_results_after_dispose_are_ignored() {
    let mut flow = FlowController::new(Id::Int(101), selection());
    let ticket = flow.begin_load().unwrap();
    flow.dispose();

    assert!(!flow.complete_load(ticket, Ok(three_screen_document())));
    assert_eq!(flow.state(), &FlowState::Disposed);
    assert!(flow.screens().is_empty());
}

/// Only one price calculation can be in flight, and a stale one cannot land
#[test]
fn test_single_submission_in_flight() {
    let mut flow = FlowController::new(Id::Int(101), selection());
    let ticket = flow.begin_load().unwrap();
    let document = QuestionnaireDocument {
        screens: vec![screen(1, vec![question(10, QuestionType::SingleSelect, true, &[100])])],
    };
    assert!(flow.complete_load(ticket, Ok(document)));
    assert!(flow.begin_load().is_none());

    flow.select_option(&q(10), &o(100));
    let Advance::Submit(first) = flow.advance() else {
        panic!("expected a submission");
    };
    assert!(matches!(flow.advance(), Advance::Busy));
    assert!(flow.select_option(&q(10), &o(100)).is_none());

    assert!(flow.complete_submission(first, Err(FlowError::Network("timeout".into()))));
    let Advance::Submit(second) = flow.submit_for_pricing() else {
        panic!("expected a retry submission");
    };
    flow.dispose();
    assert!(!flow.complete_submission(second, Ok(quote(1.0))));
    assert!(flow.completed().is_none());
}
