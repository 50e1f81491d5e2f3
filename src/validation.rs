//! Client-side form checks
//!
//! Each form is checked in a fixed order and the first failing rule is reported, so the
//! user always sees one message at a time.

use crate::api::models::{LoginRequest, NewUser, ProfileUpdate, UserProfile};
use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub const PHONE_LENGTH: usize = 10;
pub const PINCODE_LENGTH: usize = 6;
pub const OTP_LENGTH: usize = 6;
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.trim().to_lowercase())
}

pub fn validate_phone(phone: &str) -> Result<String, ValidationError> {
    let phone = phone.trim();
    if !is_digits(phone, PHONE_LENGTH) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(phone.to_string())
}

pub fn validate_pincode(pincode: &str) -> Result<String, ValidationError> {
    let pincode = pincode.trim();
    if !is_digits(pincode, PINCODE_LENGTH) {
        return Err(ValidationError::InvalidPincode);
    }
    Ok(pincode.to_string())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// The emailed one-time code: exactly six digits
pub fn validate_otp(otp: &str) -> Result<String, ValidationError> {
    let otp = otp.trim();
    if !is_digits(otp, OTP_LENGTH) {
        return Err(ValidationError::IncompleteOtp);
    }
    Ok(otp.to_string())
}

pub fn validate_address(address: &str) -> Result<String, ValidationError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(ValidationError::EmptyAddress);
    }
    Ok(address.to_string())
}

fn require_filled(fields: &[&str]) -> Result<(), ValidationError> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(ValidationError::MissingFields);
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        require_filled(&[&self.email, &self.password])?;
        let email = validate_email(&self.email)?;
        validate_password(&self.password)?;

        Ok(LoginRequest { email, password: self.password.clone() })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// The account payload, still without its OTP
    pub fn validate(&self) -> Result<NewUser, ValidationError> {
        require_filled(&[
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.address,
            &self.city,
            &self.pincode,
            &self.password,
            &self.confirm_password,
        ])?;
        let email = validate_email(&self.email)?;
        let phone = validate_phone(&self.phone)?;
        let pincode = validate_pincode(&self.pincode)?;
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(NewUser {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            contact_number: phone,
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            pincode,
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
            otp: None,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub pincode: String,
}

impl ProfileForm {
    /// Pre-fill from the stored profile
    pub fn from_profile(user: &UserProfile) -> Self {
        Self {
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
            email: user.email.clone(),
            phone: user.contact_number.clone().unwrap_or_default(),
            pincode: user.pincode.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ProfileUpdate, ValidationError> {
        require_filled(&[&self.first_name, &self.last_name, &self.email, &self.phone, &self.pincode])?;
        let phone = validate_phone(&self.phone)?;
        let pincode = validate_pincode(&self.pincode)?;
        let email = validate_email(&self.email)?;

        Ok(ProfileUpdate {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            contact_number: phone.parse().map_err(|_| ValidationError::InvalidPhone)?,
            pincode: pincode.parse().map_err(|_| ValidationError::InvalidPincode)?,
        })
    }
}
