//! REST access to the marketplace backend
//!
//! The client speaks the backend's loosely typed JSON; typed domain values are built from
//! it in the `catalog`, `questionnaire` and `quote` modules.

pub mod client;
pub mod constants;
pub mod logging;
pub mod models;

pub use client::ResaleClient;
pub use logging::{ApiLogger, LogLevel, MonitoringConfig, OperationContext, OperationOutcome};
pub use models::{Ack, Address, AddressType, Amount, Flag, Id, Order, OrderStage, UserProfile};
