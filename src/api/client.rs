use super::constants::{self, headers};
use super::logging::{ApiLogger, MonitoringConfig, OperationContext};
use super::models::{
    Ack, Address, AddressUpdate, EmailRequest, Envelope, Id, LoginRequest, NewAddress, NewUser, Order, OrdersEnvelope,
    PriceEnvelope, ProfileUpdate, QuestionnaireEnvelope, UserProfile,
};
use crate::catalog::{Brand, Category, Model, ProductDetails};
use crate::checkout::LeadRequest;
use crate::config::ApiSettings;
use crate::error::ApiError;
use crate::quote::{PricingRequest, QuoteResult};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Longest response body kept in an error message
const MAX_ERROR_BODY: usize = 512;

/// REST client for the marketplace backend with connection pooling
#[derive(Debug, Clone)]
pub struct ResaleClient {
    base_url: String,
    http_client: reqwest::Client,
    api_logger: ApiLogger,
}

impl ResaleClient {
    pub fn new(settings: &ApiSettings, monitoring: MonitoringConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self::with_custom_client(&settings.base_url, http_client, monitoring))
    }

    /// Create a client around an existing HTTP client
    pub fn with_custom_client(base_url: &str, http_client: reqwest::Client, monitoring: MonitoringConfig) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            api_logger: ApiLogger::new(monitoring),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Catalog

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = constants::categories_endpoint(&self.base_url);
        let envelope: Envelope<Vec<Category>> = self.execute("categories", Method::GET, &url, None).await?;
        unwrap_data(envelope)
    }

    pub async fn brands(&self, category_id: &Id) -> Result<Vec<Brand>, ApiError> {
        let url = constants::brands_endpoint(&self.base_url, &category_id.to_string());
        let envelope: Envelope<Vec<Brand>> = self.execute("brands", Method::GET, &url, None).await?;
        unwrap_data(envelope)
    }

    pub async fn models(&self, brand_id: &Id, category_id: &Id) -> Result<Vec<Model>, ApiError> {
        let url = constants::models_endpoint(&self.base_url, &brand_id.to_string(), &category_id.to_string());
        let envelope: Envelope<Vec<Model>> = self.execute("models", Method::GET, &url, None).await?;
        unwrap_data(envelope)
    }

    pub async fn product_details(&self, model_id: &Id) -> Result<ProductDetails, ApiError> {
        let url = constants::product_details_endpoint(&self.base_url, &model_id.to_string());
        let envelope: Envelope<ProductDetails> = self.execute("product_details", Method::GET, &url, None).await?;
        unwrap_data(envelope)
    }

    // Questionnaire and pricing

    /// Raw questionnaire envelope; `questionnaire::parse_document` validates it
    pub async fn questionnaire(&self, model_id: &Id) -> Result<QuestionnaireEnvelope, ApiError> {
        let url = constants::questionnaire_endpoint(&self.base_url, &model_id.to_string());
        self.execute("questionnaire", Method::GET, &url, None).await
    }

    pub async fn calculate_price(&self, request: &PricingRequest) -> Result<QuoteResult, ApiError> {
        let url = constants::calculate_price_endpoint(&self.base_url);
        let envelope: PriceEnvelope = self
            .execute("calculate_price", Method::POST, &url, Some(to_body(request)?))
            .await?;

        if envelope.success == Some(false) {
            let message = envelope.msg.or(envelope.message);
            return Err(ApiError::Rejected(message.unwrap_or_else(|| "price calculation failed".to_string())));
        }
        envelope
            .product_price
            .map(|price| QuoteResult { price })
            .ok_or_else(|| ApiError::Decode("response has no product_price".to_string()))
    }

    // Accounts

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let url = constants::login_endpoint(&self.base_url);
        let body = to_body(&LoginRequest { email: email.to_string(), password: password.to_string() })?;
        let envelope: Envelope<UserProfile> = self.execute("login", Method::POST, &url, Some(body)).await?;
        unwrap_data(envelope)
    }

    /// Ask the backend to email a sign-up OTP
    pub async fn verify_new_email(&self, email: &str) -> Result<Ack, ApiError> {
        let url = constants::verify_new_email_endpoint(&self.base_url);
        let body = to_body(&EmailRequest { email: email.to_string() })?;
        let envelope: Envelope<Value> = self.execute("verify_new_email", Method::POST, &url, Some(body)).await?;
        acknowledge(envelope)
    }

    pub async fn add_user(&self, user: &NewUser) -> Result<Ack, ApiError> {
        let url = constants::add_user_endpoint(&self.base_url);
        let envelope: Envelope<Value> = self.execute("add_user", Method::POST, &url, Some(to_body(user)?)).await?;
        acknowledge(envelope)
    }

    pub async fn update_user(&self, user_id: &Id, profile: &ProfileUpdate) -> Result<Ack, ApiError> {
        let url = constants::update_user_endpoint(&self.base_url, &user_id.to_string());
        let envelope: Envelope<Value> = self.execute("update_user", Method::PUT, &url, Some(to_body(profile)?)).await?;
        acknowledge(envelope)
    }

    pub async fn orders(&self, email: &str) -> Result<Vec<Order>, ApiError> {
        let url = constants::orders_endpoint(&self.base_url, email);
        let envelope: OrdersEnvelope = self.execute("orders", Method::GET, &url, None).await?;
        Ok(envelope.orders.unwrap_or_default())
    }

    // Addresses

    pub async fn addresses(&self, user_id: &Id) -> Result<Vec<Address>, ApiError> {
        let url = constants::address_endpoint(&self.base_url, &user_id.to_string());
        let envelope: Envelope<Vec<Address>> = self.execute("addresses", Method::GET, &url, None).await?;
        if envelope.is_rejected() {
            return Err(rejection(&envelope));
        }
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn create_address(&self, address: &NewAddress) -> Result<Ack, ApiError> {
        let url = constants::addresses_endpoint(&self.base_url);
        let envelope: Envelope<Value> = self
            .execute("create_address", Method::POST, &url, Some(to_body(address)?))
            .await?;
        acknowledge(envelope)
    }

    pub async fn update_address(&self, address: &AddressUpdate) -> Result<Ack, ApiError> {
        let url = constants::addresses_endpoint(&self.base_url);
        let envelope: Envelope<Value> = self
            .execute("update_address", Method::PUT, &url, Some(to_body(address)?))
            .await?;
        acknowledge(envelope)
    }

    pub async fn set_default_address(&self, address_id: &Id) -> Result<Ack, ApiError> {
        let url = constants::default_address_endpoint(&self.base_url, &address_id.to_string());
        let envelope: Envelope<Value> = self.execute("set_default_address", Method::PUT, &url, None).await?;
        acknowledge(envelope)
    }

    pub async fn delete_address(&self, address_id: &Id) -> Result<Ack, ApiError> {
        let url = constants::address_endpoint(&self.base_url, &address_id.to_string());
        let envelope: Envelope<Value> = self.execute("delete_address", Method::DELETE, &url, None).await?;
        acknowledge(envelope)
    }

    // Leads

    /// Confirm the sale and book the pickup
    pub async fn submit_lead(&self, user_id: &Id, lead: &LeadRequest) -> Result<Ack, ApiError> {
        let url = constants::lead_endpoint(&self.base_url, &user_id.to_string());
        let envelope: Envelope<Value> = self.execute("submit_lead", Method::POST, &url, Some(to_body(lead)?)).await?;
        acknowledge(envelope)
    }

    /// Send one request with structured logging and decode the JSON body
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let context = self.api_logger.start_operation(operation);

        let mut request_headers = HashMap::new();
        request_headers.insert("Accept".to_string(), headers::CONTENT_TYPE_JSON.to_string());
        if body.is_some() {
            request_headers.insert("Content-Type".to_string(), headers::CONTENT_TYPE_JSON.to_string());
        }
        if !context.correlation_id.is_empty() {
            request_headers.insert(headers::X_CORRELATION_ID.to_string(), context.correlation_id.clone());
        }
        self.api_logger
            .log_request(&context, method.as_str(), url, &request_headers, body.as_ref());

        let mut request = self
            .http_client
            .request(method, url)
            .header("Accept", headers::CONTENT_TYPE_JSON);
        if !context.correlation_id.is_empty() {
            request = request.header(headers::X_CORRELATION_ID, &context.correlation_id);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let request_start = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                let err = ApiError::Network(err);
                self.finish(&context, None, Err(&err));
                return Err(err);
            }
        };

        let status_code = response.status().as_u16();
        self.api_logger.log_response(&context, status_code, request_start.elapsed());

        let result = read_json(response).await;
        self.finish(&context, Some(status_code), result.as_ref().map(|_| ()));
        result
    }

    fn finish(&self, context: &OperationContext, status_code: Option<u16>, result: Result<(), &ApiError>) {
        let outcome = context.outcome(result.is_ok(), status_code, result.err().map(|e| e.to_string()));
        self.api_logger.complete_operation(context, &outcome);
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Status { status: status.as_u16(), body: error_body(&text) });
    }

    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Prefer the server's message over the raw body
fn error_body(text: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<Envelope<Value>>(text) {
        if let Some(message) = envelope.server_message() {
            return message.to_string();
        }
    }
    if text.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    } else {
        text.to_string()
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(format!("could not encode request: {}", e)))
}

fn rejection<T>(envelope: &Envelope<T>) -> ApiError {
    ApiError::Rejected(envelope.server_message().unwrap_or("request rejected").to_string())
}

fn unwrap_data<T>(envelope: Envelope<T>) -> Result<T, ApiError> {
    if envelope.is_rejected() {
        return Err(rejection(&envelope));
    }
    envelope
        .data
        .ok_or_else(|| ApiError::Decode("response has no data".to_string()))
}

fn acknowledge(envelope: Envelope<Value>) -> Result<Ack, ApiError> {
    if envelope.is_rejected() {
        return Err(rejection(&envelope));
    }
    Ok(Ack { message: envelope.server_message().map(str::to_string) })
}
