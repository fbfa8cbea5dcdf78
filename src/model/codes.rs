//! Brand and product codes derived from a product management code such as `abc123`.

/// The code used when a management code has no brand prefix or no numeric part.
pub const UNKNOWN: &str = "unknown";

/// Extracts the brand code: the leading run of ASCII letters, lowercased. Returns `"unknown"` when
/// the management code does not start with a letter.
pub fn extract_brand_code(management_code: &str) -> String {
    let letters: String = management_code
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        UNKNOWN.to_string()
    } else {
        letters.to_ascii_lowercase()
    }
}

/// Extracts the product code: the first run of ASCII digits anywhere in the management code, or
/// `"unknown"` when there are none.
pub fn extract_product_code(management_code: &str) -> String {
    let digits: String = management_code
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        UNKNOWN.to_string()
    } else {
        digits
    }
}
