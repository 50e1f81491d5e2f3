//! Sale confirmation: pickup scheduling and the lead payload

use crate::api::models::{Amount, Id, UserProfile};
use crate::error::ValidationError;
use crate::questionnaire::Response;
use crate::quote::{CompletedQuote, ProductSelection};
use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};
use std::fmt;

/// Where the device is collected from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickupAddress {
    Saved(Id),
    /// The device's current location; sent as `null`
    CurrentLocation,
}

impl Serialize for PickupAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PickupAddress::Saved(id) => id.serialize(serializer),
            PickupAddress::CurrentLocation => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    #[default]
    Card,
    Upi,
    Cash,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 3] = [PaymentMode::Card, PaymentMode::Upi, PaymentMode::Cash];

    pub fn label(self) -> &'static str {
        match self {
            PaymentMode::Card => "Card",
            PaymentMode::Upi => "UPI",
            PaymentMode::Cash => "Cash",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pickup day and time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupSchedule {
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl PickupSchedule {
    /// The date may not be before `today` and the window must not be empty
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime, today: NaiveDate) -> Result<Self, ValidationError> {
        if date < today {
            return Err(ValidationError::PickupDateInPast);
        }
        if end <= start {
            return Err(ValidationError::InvalidPickupWindow);
        }
        Ok(Self { date, start, end })
    }

    /// Build from user input (`YYYY-MM-DD`, `HH:MM`)
    pub fn parse(date: &str, start: &str, end: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        Self::new(parse_date(date)?, parse_time(start)?, parse_time(end)?, today)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn wire_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn wire_start(&self) -> String {
        self.start.format("%H:%M:00").to_string()
    }

    pub fn wire_end(&self) -> String {
        self.end.format("%H:%M:00").to_string()
    }

    /// e.g. `October 18, 2026, 10:00 AM - 12:30 PM`
    pub fn display(&self) -> String {
        format!(
            "{}, {} - {}",
            self.date.format("%B %-d, %Y"),
            self.start.format("%I:%M %p"),
            self.end.format("%I:%M %p")
        )
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(input.trim().to_string()))
}

pub fn parse_time(input: &str) -> Result<NaiveTime, ValidationError> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime(input.to_string()))
}

/// Body of the lead submission that confirms a sale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadRequest {
    pub user_id: Id,
    #[serde(rename = "pickupAddress")]
    pub pickup_address: PickupAddress,
    #[serde(rename = "pickupDate")]
    pub pickup_date: String,
    #[serde(rename = "pickupStartTime")]
    pub pickup_start_time: String,
    #[serde(rename = "pickupEndTime")]
    pub pickup_end_time: String,
    pub payment_mode: PaymentMode,
    #[serde(rename = "evaluatePrice")]
    pub evaluate_price: Amount,
    pub response: Vec<Response>,
    #[serde(rename = "selectedProduct")]
    pub selected_product: ProductSelection,
}

impl LeadRequest {
    pub fn build(
        user: Option<&UserProfile>,
        address: Option<PickupAddress>,
        schedule: &PickupSchedule,
        payment_mode: PaymentMode,
        quote: &CompletedQuote,
    ) -> Result<Self, ValidationError> {
        let user = user.ok_or(ValidationError::MissingUser)?;
        let pickup_address = address.ok_or(ValidationError::MissingPickupAddress)?;

        Ok(Self {
            user_id: user.id.clone(),
            pickup_address,
            pickup_date: schedule.wire_date(),
            pickup_start_time: schedule.wire_start(),
            pickup_end_time: schedule.wire_end(),
            payment_mode,
            evaluate_price: quote.quote.price,
            response: quote.responses.clone(),
            selected_product: quote.selection.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::{OptionId, QuestionId, ScreenId};
    use crate::quote::QuoteResult;
    use crate::quote::fixtures::selection;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn user() -> UserProfile {
        serde_json::from_value(json!({ "id": 42, "email": "asha@example.com" })).unwrap()
    }

    fn quote() -> CompletedQuote {
        CompletedQuote {
            quote: QuoteResult { price: Amount(18500.0) },
            selection: selection(),
            responses: vec![Response {
                screen_id: ScreenId::from(1),
                question_id: QuestionId::from(10),
                option_id: OptionId::from(100),
            }],
        }
    }

    #[test]
    fn test_schedule_formats() {
        let schedule = PickupSchedule::parse("2026-10-20", "9:05", "12:30", today()).unwrap();
        assert_eq!(schedule.wire_date(), "2026-10-20");
        assert_eq!(schedule.wire_start(), "09:05:00");
        assert_eq!(schedule.wire_end(), "12:30:00");
        assert_eq!(schedule.display(), "October 20, 2026, 09:05 AM - 12:30 PM");
    }

    #[test]
    fn test_schedule_rules() {
        assert_eq!(
            PickupSchedule::parse("2026-10-17", "10:00", "11:00", today()),
            Err(ValidationError::PickupDateInPast)
        );
        assert_eq!(
            PickupSchedule::parse("2026-10-18", "11:00", "11:00", today()),
            Err(ValidationError::InvalidPickupWindow)
        );
        assert_eq!(
            PickupSchedule::parse("20/10/2026", "10:00", "11:00", today()),
            Err(ValidationError::InvalidDate("20/10/2026".into()))
        );
        assert!(matches!(
            PickupSchedule::parse("2026-10-18", "noon", "13:00", today()),
            Err(ValidationError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_lead_payload() {
        let schedule = PickupSchedule::parse("2026-10-20", "10:00", "12:00", today()).unwrap();
        let lead = LeadRequest::build(
            Some(&user()),
            Some(PickupAddress::CurrentLocation),
            &schedule,
            PaymentMode::default(),
            &quote(),
        )
        .unwrap();

        let body = serde_json::to_value(&lead).unwrap();
        assert_eq!(body["user_id"], 42);
        assert_eq!(body["pickupAddress"], serde_json::Value::Null);
        assert_eq!(body["pickupDate"], "2026-10-20");
        assert_eq!(body["pickupStartTime"], "10:00:00");
        assert_eq!(body["payment_mode"], "card");
        assert_eq!(body["evaluatePrice"], 18500);
        assert_eq!(body["response"], json!([{ "screenId": 1, "questionId": 10, "optionId": 100 }]));
        assert_eq!(body["selectedProduct"]["leadPrice"], 22000);

        let saved = LeadRequest { pickup_address: PickupAddress::Saved(Id::Int(3)), ..lead };
        assert_eq!(serde_json::to_value(&saved).unwrap()["pickupAddress"], 3);
    }

    #[test]
    fn test_lead_requires_user_and_address() {
        let schedule = PickupSchedule::parse("2026-10-20", "10:00", "12:00", today()).unwrap();
        assert_eq!(
            LeadRequest::build(None, Some(PickupAddress::CurrentLocation), &schedule, PaymentMode::Upi, &quote()),
            Err(ValidationError::MissingUser)
        );
        assert_eq!(
            LeadRequest::build(Some(&user()), None, &schedule, PaymentMode::Upi, &quote()),
            Err(ValidationError::MissingPickupAddress)
        );
    }
}
