//! Wire types shared by the backend endpoints
//!
//! The backend is loosely typed: ids arrive as numbers or strings, prices as numbers or
//! numeric strings, flags as `0|1` or booleans. The helpers here accept each of those
//! shapes and re-emit what they received.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier as sent by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Text(String),
}

impl Id {
    /// Parse user input: digits become numeric ids, anything else stays text
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Id::Int(n),
            Err(_) => Id::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Int(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Text(value.to_string())
    }
}

/// Monetary amount; accepts numbers or numeric strings
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Amount(pub f64);

impl Amount {
    pub fn value(self) -> f64 {
        self.0
    }

    /// Read a price that is kept in its wire form; `None` unless it is a number or numeric string
    pub fn from_wire(value: &Value) -> Option<Amount> {
        match value {
            Value::Number(n) => n.as_f64().map(Amount),
            Value::String(s) => s.trim().parse::<f64>().ok().map(Amount),
            _ => None,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Whole amounts go out as integers, the way the app's JSON did
        if self.0.fract() == 0.0 && self.0.abs() < 9_007_199_254_740_992.0 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Amount(n)),
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Amount)
                .map_err(|_| de::Error::custom(format!("invalid amount '{}'", s))),
        }
    }
}

/// Boolean flag sent as `0|1` or `true|false`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag(pub bool);

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(self.0))
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Int(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(Flag(b)),
            Raw::Int(n) => Ok(Flag(n != 0)),
            Raw::Text(s) => match s.trim() {
                "1" | "true" => Ok(Flag(true)),
                "0" | "false" | "" => Ok(Flag(false)),
                other => Err(de::Error::custom(format!("invalid flag '{}'", other))),
            },
        }
    }
}

/// Deserialize an optional number-or-string field into a string
pub fn opt_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("expected string or number, got {}", other))),
    }
}

/// Keep a field exactly as received; with `#[serde(default)]` an absent field stays `None`
/// while an explicit `null` becomes `Some(Value::Null)`
pub fn verbatim<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Text of a scalar JSON value (`"8GB"` or `8`)
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Standard `{ success, data, msg }` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Server-provided message, if any
    pub fn server_message(&self) -> Option<&str> {
        self.msg.as_deref().or(self.message.as_deref())
    }

    pub fn is_rejected(&self) -> bool {
        self.success == Some(false)
    }
}

/// Result of a call whose only payload is an acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    pub message: Option<String>,
}

// Questionnaire document as sent over the wire. Every field is optional here; the
// questionnaire module decides what a valid document is.

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionnaireEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub questionnaire: Option<WireQuestionnaire>,
    #[serde(default)]
    pub msg: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireQuestionnaire {
    #[serde(default)]
    pub screens: Option<Vec<WireScreen>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireScreen {
    #[serde(rename = "Screen_Id", default)]
    pub screen_id: Option<Id>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Option<Vec<WireQuestion>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireQuestion {
    #[serde(rename = "Question_Id", default)]
    pub question_id: Option<Id>,
    #[serde(rename = "Question_Name", default)]
    pub question_name: Option<String>,
    #[serde(rename = "Type", default)]
    pub question_type: Option<String>,
    #[serde(rename = "isRequired", default)]
    pub is_required: Option<Flag>,
    #[serde(default)]
    pub options: Option<Vec<WireOption>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireOption {
    #[serde(rename = "Option_Id", default)]
    pub option_id: Option<Id>,
    #[serde(rename = "Option_Name", default)]
    pub option_name: Option<String>,
    #[serde(rename = "Option_Short_Description", default)]
    pub short_description: Option<String>,
    #[serde(rename = "Option_Image", default)]
    pub image: Option<String>,
}

/// Pricing answer
#[derive(Debug, Clone, Deserialize)]
pub struct PriceEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub product_price: Option<Amount>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// Accounts

/// Signed-in user as returned by login; unknown fields are kept and written back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Id,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(
        rename = "contactNumber",
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_number: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() { "User".to_string() } else { name }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Account creation payload (sign-up fields plus the emailed OTP)
///
/// Phone and pincode go out as entered; only profile updates send them as numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "contactNumber")]
    pub contact_number: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub password: String,
    #[serde(rename = "confirmpassword")]
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Profile update payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "contactNumber")]
    pub contact_number: u64,
    pub pincode: u32,
}

// Addresses

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Home,
    Work,
    #[default]
    #[serde(other)]
    Other,
}

impl AddressType {
    pub fn label(self) -> &'static str {
        match self {
            AddressType::Home => "Home",
            AddressType::Work => "Work",
            AddressType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: Id,
    #[serde(rename = "fullAddress")]
    pub full_address: String,
    #[serde(rename = "addressType", default)]
    pub address_type: AddressType,
    #[serde(rename = "isDefault", default)]
    pub is_default: Flag,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAddress {
    pub userid: Id,
    #[serde(rename = "fullAddress")]
    pub full_address: String,
    #[serde(rename = "addressType")]
    pub address_type: AddressType,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressUpdate {
    #[serde(rename = "addressId")]
    pub address_id: Id,
    #[serde(rename = "fullAddress")]
    pub full_address: String,
    #[serde(rename = "addressType")]
    pub address_type: AddressType,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
}

// Orders

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersEnvelope {
    #[serde(default)]
    pub orders: Option<Vec<Order>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    #[serde(rename = "Response_Id")]
    pub id: Id,
    #[serde(rename = "ProductName", default)]
    pub product_name: String,
    #[serde(rename = "CategoryName", default)]
    pub category_name: Option<String>,
    #[serde(rename = "latestStage", default)]
    pub latest_stage: i64,
    #[serde(rename = "Created_At", default)]
    pub created_at: Option<String>,
    #[serde(rename = "trackingHistory", default)]
    pub tracking_history: Vec<TrackingEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackingEntry {
    #[serde(default)]
    pub stage_date: Option<String>,
}

/// Progress of a sale order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStage {
    Pending,
    PickUp,
    Completed,
    Unknown,
}

impl OrderStage {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => OrderStage::Pending,
            2 => OrderStage::PickUp,
            3 => OrderStage::Completed,
            _ => OrderStage::Unknown,
        }
    }

    /// Short status badge shown in the order list
    pub fn label(self) -> &'static str {
        match self {
            OrderStage::Pending => "Pending",
            OrderStage::PickUp => "Pick-up",
            OrderStage::Completed => "Completed",
            OrderStage::Unknown => "Unknown",
        }
    }

    /// Title shown in the order detail view
    pub fn title(self) -> &'static str {
        match self {
            OrderStage::PickUp => "Ready for pickup",
            OrderStage::Completed => "Pickup completed",
            OrderStage::Pending | OrderStage::Unknown => "Order placed",
        }
    }
}

impl Order {
    pub fn stage(&self) -> OrderStage {
        OrderStage::from_code(self.latest_stage)
    }

    /// Date of the current stage: latest tracking entry, falling back to creation
    pub fn stage_date(&self) -> Option<&str> {
        let latest = self
            .tracking_history
            .last()
            .and_then(|entry| entry.stage_date.as_deref());
        match self.stage() {
            OrderStage::Unknown => self.created_at.as_deref(),
            _ => latest.or(self.created_at.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_accepts_numbers_and_strings() {
        let ids: Vec<Id> = serde_json::from_value(json!([7, "abc"])).unwrap();
        assert_eq!(ids, vec![Id::Int(7), Id::Text("abc".into())]);
        assert_eq!(serde_json::to_value(&ids).unwrap(), json!([7, "abc"]));
        assert_eq!(Id::parse(" 12 "), Id::Int(12));
        assert_eq!(Id::parse("x-1"), Id::Text("x-1".into()));
    }

    #[test]
    fn test_amount_shapes() {
        let a: Amount = serde_json::from_value(json!("15000")).unwrap();
        let b: Amount = serde_json::from_value(json!(15000)).unwrap();
        let c: Amount = serde_json::from_value(json!(99.5)).unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_value(a).unwrap(), json!(15000));
        assert_eq!(serde_json::to_value(c).unwrap(), json!(99.5));
        assert!(serde_json::from_value::<Amount>(json!("lots")).is_err());
        assert_eq!(c.to_string(), "99.50");
        assert_eq!(a.to_string(), "15000");
    }

    #[test]
    fn test_amount_from_wire() {
        assert_eq!(Amount::from_wire(&json!("22000.00")), Some(Amount(22000.0)));
        assert_eq!(Amount::from_wire(&json!(21000)), Some(Amount(21000.0)));
        assert_eq!(Amount::from_wire(&json!(null)), None);
        assert_eq!(Amount::from_wire(&json!("n/a")), None);
    }

    #[test]
    fn test_verbatim_keeps_null_apart_from_absent() {
        #[derive(Deserialize)]
        struct Priced {
            #[serde(default, deserialize_with = "verbatim")]
            price: Option<Value>,
        }

        let absent: Priced = serde_json::from_value(json!({})).unwrap();
        let null: Priced = serde_json::from_value(json!({ "price": null })).unwrap();
        let text: Priced = serde_json::from_value(json!({ "price": "22000.00" })).unwrap();
        assert_eq!(absent.price, None);
        assert_eq!(null.price, Some(Value::Null));
        assert_eq!(text.price, Some(json!("22000.00")));
    }

    #[test]
    fn test_flag_shapes() {
        let flags: Vec<Flag> = serde_json::from_value(json!([1, 0, true, "1", "false"])).unwrap();
        assert_eq!(flags, vec![Flag(true), Flag(false), Flag(true), Flag(true), Flag(false)]);
    }

    #[test]
    fn test_user_profile_keeps_unknown_fields() {
        let user: UserProfile = serde_json::from_value(json!({
            "id": 5,
            "email": "a@b.co",
            "first_name": "Asha",
            "contactNumber": 9876543210u64,
            "role": "customer"
        }))
        .unwrap();

        assert_eq!(user.contact_number.as_deref(), Some("9876543210"));
        assert_eq!(user.extra.get("role"), Some(&json!("customer")));
        assert_eq!(user.display_name(), "Asha");

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["role"], "customer");
    }

    #[test]
    fn test_address_type_falls_back_to_other() {
        let address: Address = serde_json::from_value(json!({
            "id": 3,
            "fullAddress": "12 MG Road",
            "addressType": "office",
            "isDefault": 1
        }))
        .unwrap();

        assert_eq!(address.address_type, AddressType::Other);
        assert!(address.is_default.0);
    }

    #[test]
    fn test_order_stage_dates() {
        let order: Order = serde_json::from_value(json!({
            "Response_Id": 11,
            "ProductName": "Phone X",
            "latestStage": 2,
            "Created_At": "2025-10-10",
            "trackingHistory": [{ "stage_date": "2025-10-10" }, { "stage_date": "2025-10-11" }]
        }))
        .unwrap();

        assert_eq!(order.stage(), OrderStage::PickUp);
        assert_eq!(order.stage().label(), "Pick-up");
        assert_eq!(order.stage_date(), Some("2025-10-11"));

        let unknown = Order { latest_stage: 9, ..order };
        assert_eq!(unknown.stage().title(), "Order placed");
        assert_eq!(unknown.stage_date(), Some("2025-10-10"));
    }
}
