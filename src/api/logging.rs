//! Structured logging with correlation tracking for backend calls
//!
//! Every request gets an [`OperationContext`] holding a correlation id that is also sent
//! to the server, so a single call can be followed through the log file.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use log::{debug, error, info, warn};

/// Monitoring and logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub correlation_ids: bool,
    pub request_logging: bool,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            correlation_ids: true,
            request_logging: true,
            log_level: LogLevel::Info,
        }
    }
}

impl MonitoringConfig {
    /// Everything off, for tests
    pub fn disabled() -> Self {
        Self {
            correlation_ids: false,
            request_logging: false,
            log_level: LogLevel::Error,
        }
    }
}

/// Structured logger for API operations
#[derive(Debug, Clone)]
pub struct ApiLogger {
    config: MonitoringConfig,
}

/// Context for a single API call
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub correlation_id: String,
    /// Logical operation name (`questionnaire`, `calculate_price`, ...)
    pub operation: String,
    pub start_time: Instant,
}

/// Outcome summary of one call
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    pub duration: Duration,
    pub success: bool,
    pub status_code: Option<u16>,
    pub error_message: Option<String>,
}

impl ApiLogger {
    pub fn new(config: MonitoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonitoringConfig {
        &self.config
    }

    /// Start tracking a new call
    pub fn start_operation(&self, operation: &str) -> OperationContext {
        let correlation_id = if self.config.correlation_ids {
            uuid::Uuid::new_v4().to_string()
        } else {
            String::new()
        };

        let context = OperationContext {
            correlation_id,
            operation: operation.to_string(),
            start_time: Instant::now(),
        };

        if self.config.request_logging && self.should_log(LogLevel::Info) {
            let log_data = json!({
                "event": "operation_started",
                "correlation_id": context.correlation_id,
                "operation": context.operation,
                "timestamp": chrono::Utc::now().to_rfc3339()
            });

            info!("API Operation Started: {}", log_data);
        }

        context
    }

    /// Log HTTP request details
    pub fn log_request(
        &self,
        context: &OperationContext,
        method: &str,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&Value>,
    ) {
        if !self.config.request_logging || !self.should_log(LogLevel::Debug) {
            return;
        }

        let log_data = json!({
            "event": "http_request",
            "correlation_id": context.correlation_id,
            "operation": context.operation,
            "method": method,
            "url": url,
            "headers": sanitize_headers(headers),
            "body": body.map(redact_body),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        debug!("HTTP Request: {}", log_data);
    }

    /// Log HTTP response details
    pub fn log_response(&self, context: &OperationContext, status_code: u16, duration: Duration) {
        if !self.config.request_logging || !self.should_log(LogLevel::Debug) {
            return;
        }

        let log_data = json!({
            "event": "http_response",
            "correlation_id": context.correlation_id,
            "operation": context.operation,
            "status_code": status_code,
            "duration_ms": duration.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if status_code >= 400 {
            warn!("HTTP Response (Error): {}", log_data);
        } else {
            debug!("HTTP Response: {}", log_data);
        }
    }

    /// Close the operation
    pub fn complete_operation(&self, context: &OperationContext, outcome: &OperationOutcome) {
        let level = if outcome.success { LogLevel::Info } else { LogLevel::Error };
        if !self.should_log(level) {
            return;
        }

        let log_data = json!({
            "event": if outcome.success { "operation_completed" } else { "operation_failed" },
            "correlation_id": context.correlation_id,
            "operation": context.operation,
            "duration_ms": outcome.duration.as_millis(),
            "success": outcome.success,
            "status_code": outcome.status_code,
            "error_message": outcome.error_message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if outcome.success {
            info!("API Operation Completed: {}", log_data);
        } else {
            error!("API Operation Failed: {}", log_data);
        }
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level <= self.config.log_level
    }
}

impl OperationContext {
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn outcome(&self, success: bool, status_code: Option<u16>, error_message: Option<String>) -> OperationOutcome {
        OperationOutcome {
            duration: self.elapsed(),
            success,
            status_code,
            error_message,
        }
    }
}

fn is_sensitive(key: &str) -> bool {
    let key = key.to_lowercase();
    key.contains("authorization") || key.contains("token") || key.contains("password") || key == "otp"
}

/// Remove credentials from headers before logging
fn sanitize_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(key, value)| {
            if is_sensitive(key) {
                (key.clone(), "[REDACTED]".to_string())
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}

/// Remove credentials from a JSON body before logging (top-level and nested objects)
fn redact_body(body: &Value) -> Value {
    match body {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    if is_sensitive(key) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact_body(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_body).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_context_creation() {
        let logger = ApiLogger::new(MonitoringConfig::default());
        let context = logger.start_operation("questionnaire");

        assert_eq!(context.operation, "questionnaire");
        assert_eq!(context.correlation_id.len(), 36);
    }

    #[test]
    fn test_correlation_ids_can_be_disabled() {
        let logger = ApiLogger::new(MonitoringConfig::disabled());
        let context = logger.start_operation("login");
        assert!(context.correlation_id.is_empty());
    }

    #[test]
    fn test_header_sanitization() {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), "Bearer secret".to_string());
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let sanitized = sanitize_headers(&headers);

        assert_eq!(sanitized.get("Authorization"), Some(&"[REDACTED]".to_string()));
        assert_eq!(sanitized.get("Content-Type"), Some(&"application/json".to_string()));
    }

    #[test]
    fn test_body_redaction() {
        let body = json!({
            "email": "a@b.co",
            "password": "hunter22",
            "user": { "otp": "123456", "name": "A" }
        });

        let redacted = redact_body(&body);
        assert_eq!(redacted["email"], "a@b.co");
        assert_eq!(redacted["password"], "[REDACTED]");
        assert_eq!(redacted["user"]["otp"], "[REDACTED]");
        assert_eq!(redacted["user"]["name"], "A");
    }

    #[test]
    fn test_log_level_filtering() {
        let logger = ApiLogger::new(MonitoringConfig {
            log_level: LogLevel::Warn,
            ..MonitoringConfig::default()
        });

        assert!(logger.should_log(LogLevel::Error));
        assert!(logger.should_log(LogLevel::Warn));
        assert!(!logger.should_log(LogLevel::Info));
        assert!(!logger.should_log(LogLevel::Trace));
    }
}
