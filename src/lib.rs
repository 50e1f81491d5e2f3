//! Client for a used-device buy-back marketplace
//!
//! The heart of the crate is [`questionnaire::FlowController`], which walks a seller through
//! the condition questionnaire for one device and turns their answers into a price quote.
//! Around it sit the REST client ([`api`]), the catalog and checkout payloads, form
//! validation, a local key-value store and the `resale-cli` front end.

pub mod api;
pub mod catalog;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod error;
pub mod questionnaire;
pub mod quote;
pub mod services;
pub mod session;
pub mod store;
pub mod validation;

pub use error::{ApiError, FlowError, ValidationError};
