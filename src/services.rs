//! Collaborator seams for the questionnaire flow
//!
//! The flow only needs two remote calls. They are traits so a session can run against the
//! HTTP client or an in-memory double.

use crate::api::ResaleClient;
use crate::api::models::Id;
use crate::error::FlowError;
use crate::questionnaire::{QuestionnaireDocument, parse_document};
use crate::quote::{PricingRequest, QuoteResult};
use async_trait::async_trait;

#[async_trait]
pub trait QuestionnaireService: Send + Sync {
    /// Fetch and validate the questionnaire for a model
    async fn fetch_questionnaire(&self, model_id: &Id) -> Result<QuestionnaireDocument, FlowError>;
}

#[async_trait]
pub trait PricingService: Send + Sync {
    async fn calculate_price(&self, request: &PricingRequest) -> Result<QuoteResult, FlowError>;
}

#[async_trait]
impl QuestionnaireService for ResaleClient {
    async fn fetch_questionnaire(&self, model_id: &Id) -> Result<QuestionnaireDocument, FlowError> {
        let envelope = self
            .questionnaire(model_id)
            .await
            .map_err(|e| e.into_questionnaire_error())?;
        parse_document(envelope)
    }
}

#[async_trait]
impl PricingService for ResaleClient {
    async fn calculate_price(&self, request: &PricingRequest) -> Result<QuoteResult, FlowError> {
        ResaleClient::calculate_price(self, request)
            .await
            .map_err(|e| e.into_pricing_error())
    }
}

#[async_trait]
impl<T: QuestionnaireService + ?Sized> QuestionnaireService for &T {
    async fn fetch_questionnaire(&self, model_id: &Id) -> Result<QuestionnaireDocument, FlowError> {
        (**self).fetch_questionnaire(model_id).await
    }
}

#[async_trait]
impl<T: PricingService + ?Sized> PricingService for &T {
    async fn calculate_price(&self, request: &PricingRequest) -> Result<QuoteResult, FlowError> {
        (**self).calculate_price(request).await
    }
}
