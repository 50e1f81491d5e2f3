//! Shared fixtures and an in-memory backend for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use resale_client::FlowError;
use resale_client::api::models::Id;
use resale_client::questionnaire::{
    AnswerOption, OptionId, Question, QuestionId, QuestionType, QuestionnaireDocument, Screen, ScreenId,
};
use resale_client::quote::{PricingRequest, ProductSelection, QuoteResult, SelectedVariant};
use resale_client::services::{PricingService, QuestionnaireService};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

pub fn selection() -> ProductSelection {
    ProductSelection {
        product_id: Id::Int(101),
        product_name: "Galaxy S21".into(),
        brand_name: "Samsung".into(),
        category_name: "Mobile".into(),
        product_image: None,
        unique_specifications: json!({ "display": "6.2 inch" }),
        lead_price: Some(json!(22000)),
        variant: SelectedVariant {
            variant_id: Id::Int(7),
            variant_name: "8GB / 128GB".into(),
            variant_price: Some(json!(21000)),
            specification: Some(json!({ "RAM": "8GB", "STORAGE": "128GB" })),
        },
    }
}

pub fn question(id: i64, kind: QuestionType, required: bool, options: &[i64]) -> Question {
    Question {
        id: QuestionId::from(id),
        text: format!("Question {}", id),
        kind,
        required,
        options: options
            .iter()
            .map(|&o| AnswerOption {
                id: OptionId::from(o),
                name: format!("Option {}", o),
                short_description: None,
                image: None,
            })
            .collect(),
    }
}

pub fn screen(id: i64, questions: Vec<Question>) -> Screen {
    Screen {
        id: ScreenId::from(id),
        title: Some(format!("Screen {}", id)),
        description: None,
        questions,
    }
}

/// Screen 1: required single-select Q10 (A=100, B=101) and optional multi-select Q11 (110-112).
/// Screen 2: no questions. Screen 3: required single-select Q30 (300, 301).
pub fn three_screen_document() -> QuestionnaireDocument {
    QuestionnaireDocument {
        screens: vec![
            screen(
                1,
                vec![
                    question(10, QuestionType::SingleSelect, true, &[100, 101]),
                    question(11, QuestionType::MultiSelect, false, &[110, 111, 112]),
                ],
            ),
            screen(2, vec![]),
            screen(3, vec![question(30, QuestionType::SingleSelect, true, &[300, 301])]),
        ],
    }
}

pub fn q(id: i64) -> QuestionId {
    QuestionId::from(id)
}

pub fn o(id: i64) -> OptionId {
    OptionId::from(id)
}

/// Scripted questionnaire and pricing answers, recording every pricing request
pub struct FakeBackend {
    document: Mutex<VecDeque<Result<QuestionnaireDocument, FlowError>>>,
    prices: Mutex<VecDeque<Result<QuoteResult, FlowError>>>,
    pub requests: Mutex<Vec<PricingRequest>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            document: Mutex::new(VecDeque::new()),
            prices: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_document(self, document: Result<QuestionnaireDocument, FlowError>) -> Self {
        self.document.lock().unwrap().push_back(document);
        self
    }

    pub fn with_price(self, price: Result<QuoteResult, FlowError>) -> Self {
        self.prices.lock().unwrap().push_back(price);
        self
    }

    pub fn recorded(&self) -> Vec<PricingRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuestionnaireService for FakeBackend {
    async fn fetch_questionnaire(&self, _model_id: &Id) -> Result<QuestionnaireDocument, FlowError> {
        self.document
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FlowError::NotFound))
    }
}

#[async_trait]
impl PricingService for FakeBackend {
    async fn calculate_price(&self, request: &PricingRequest) -> Result<QuoteResult, FlowError> {
        self.requests.lock().unwrap().push(request.clone());
        self.prices
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FlowError::PricingService("no scripted price".into())))
    }
}
