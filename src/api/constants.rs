//! Endpoint paths and request constants for the marketplace backend

/// Default backend used when neither the config file nor the environment names one
pub const DEFAULT_BASE_URL: &str = "https://api.cashify.in";

/// User agent sent with every request
pub const USER_AGENT: &str = "resale-cli/0.1";

/// Standard headers
pub mod headers {
    /// Content type for JSON requests
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// Correlation header attached to every request for log matching
    pub const X_CORRELATION_ID: &str = "X-Correlation-ID";
}

fn join(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

// Catalog

pub fn categories_endpoint(base_url: &str) -> String {
    join(base_url, "category/getAllCategory")
}

pub fn brands_endpoint(base_url: &str, category_id: &str) -> String {
    join(base_url, &format!("brand/getAllMobileBrand/{}", segment(category_id)))
}

pub fn models_endpoint(base_url: &str, brand_id: &str, category_id: &str) -> String {
    join(
        base_url,
        &format!("product/getProductByBrandIdByCatId/{}/{}", segment(brand_id), segment(category_id)),
    )
}

pub fn product_details_endpoint(base_url: &str, model_id: &str) -> String {
    join(base_url, &format!("product/get-product-details-with-variant/{}", segment(model_id)))
}

// Questionnaire and pricing

pub fn questionnaire_endpoint(base_url: &str, model_id: &str) -> String {
    join(base_url, &format!("questionares/getQuestionareByProductId/{}", segment(model_id)))
}

pub fn calculate_price_endpoint(base_url: &str) -> String {
    join(base_url, "pricerangewiseoptiondeduction/calculatePrice")
}

// Accounts

pub fn login_endpoint(base_url: &str) -> String {
    join(base_url, "user/login")
}

pub fn verify_new_email_endpoint(base_url: &str) -> String {
    join(base_url, "user/verifyNewEmail")
}

pub fn add_user_endpoint(base_url: &str) -> String {
    join(base_url, "user/addUser")
}

pub fn update_user_endpoint(base_url: &str, user_id: &str) -> String {
    join(base_url, &format!("user/updateUser/{}", segment(user_id)))
}

pub fn orders_endpoint(base_url: &str, email: &str) -> String {
    join(base_url, &format!("user/getAllOrders/{}", segment(email)))
}

// Addresses

/// Collection endpoint used for create and update (trailing slash is significant)
pub fn addresses_endpoint(base_url: &str) -> String {
    format!("{}/addresses/", base_url.trim_end_matches('/'))
}

/// Per-user listing, and per-address deletion; both share the same path shape
pub fn address_endpoint(base_url: &str, id: &str) -> String {
    join(base_url, &format!("addresses/{}", segment(id)))
}

pub fn default_address_endpoint(base_url: &str, address_id: &str) -> String {
    join(base_url, &format!("addresses/default/{}", segment(address_id)))
}

// Leads

pub fn lead_endpoint(base_url: &str, user_id: &str) -> String {
    join(base_url, &format!("lead/addLead/{}", segment(user_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_normalised() {
        assert_eq!(
            questionnaire_endpoint("https://api.example.com/", "42"),
            "https://api.example.com/questionares/getQuestionareByProductId/42"
        );
        assert_eq!(
            calculate_price_endpoint("https://api.example.com"),
            "https://api.example.com/pricerangewiseoptiondeduction/calculatePrice"
        );
    }

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(
            orders_endpoint("https://api.example.com", "jane doe@example.com"),
            "https://api.example.com/user/getAllOrders/jane%20doe%40example.com"
        );
    }

    #[test]
    fn test_address_collection_keeps_trailing_slash() {
        assert_eq!(addresses_endpoint("http://host/"), "http://host/addresses/");
        assert_eq!(address_endpoint("http://host", "7"), "http://host/addresses/7");
        assert_eq!(default_address_endpoint("http://host", "7"), "http://host/addresses/default/7");
    }
}
