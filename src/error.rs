//! Error types for the resale client
//!
//! Three families of errors live here:
//! - [`FlowError`]: the outcome kinds of the questionnaire/quote flow's two network calls
//! - [`ApiError`]: transport and envelope failures of every other REST call
//! - [`ValidationError`]: client-side form checks, carrying the message shown to the user
//!
//! Application plumbing (config, local store, CLI) uses `anyhow` on top of these.

use thiserror::Error;

/// Failure kinds surfaced by the questionnaire flow
///
/// All of them end the in-flight network call only; the response set held by the
/// flow is never touched by an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// No questionnaire exists for the requested model
    #[error("No questionnaire found for this model")]
    NotFound,

    /// Transport-level failure (connection, timeout, unexpected HTTP status)
    #[error("Network error: {0}")]
    Network(String),

    /// The pricing service answered but reported failure or an unusable body
    #[error("Pricing service error: {0}")]
    PricingService(String),

    /// The questionnaire document did not pass boundary validation
    #[error("Invalid questionnaire: {0}")]
    InvalidQuestionnaire(String),
}

impl FlowError {
    /// Whether the user can sensibly retry the same call
    pub fn is_retryable(&self) -> bool {
        matches!(self, FlowError::Network(_) | FlowError::PricingService(_))
    }
}

/// Errors from the REST collaborators outside the questionnaire flow
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status code
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered `success: false`
    #[error("{0}")]
    Rejected(String),

    /// The body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Classify a failed questionnaire fetch
    pub fn into_questionnaire_error(self) -> FlowError {
        match self {
            ApiError::Status { status: 404, .. } | ApiError::Rejected(_) => FlowError::NotFound,
            ApiError::Status { status, body } => {
                FlowError::Network(format!("unexpected status {}: {}", status, body))
            }
            ApiError::Network(e) => FlowError::Network(e.to_string()),
            ApiError::Decode(msg) => FlowError::InvalidQuestionnaire(msg),
        }
    }

    /// Classify a failed price calculation
    ///
    /// Any HTTP answer means the transport worked, so only a missing response is a
    /// network error.
    pub fn into_pricing_error(self) -> FlowError {
        match self {
            ApiError::Network(e) => FlowError::Network(e.to_string()),
            ApiError::Status { status, body } => {
                FlowError::PricingService(format!("status {}: {}", status, body))
            }
            ApiError::Rejected(msg) => FlowError::PricingService(msg),
            ApiError::Decode(msg) => FlowError::PricingService(msg),
        }
    }
}

/// Form validation failures; `Display` is the message shown to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all fields")]
    MissingFields,

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,

    #[error("Please enter a valid 6-digit pincode")]
    InvalidPincode,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter complete OTP")]
    IncompleteOtp,

    #[error("Please enter address")]
    EmptyAddress,

    #[error("User information not found. Please try again.")]
    MissingUser,

    #[error("Please select a valid pickup address.")]
    MissingPickupAddress,

    #[error("Pickup end time must be after the start time")]
    InvalidPickupWindow,

    #[error("Pickup date cannot be in the past")]
    PickupDateInPast,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
}
