use serde::{Deserialize, Serialize};

/// Which reverse geocoding provider produced a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocodingSource {
    Nominatim,
    Google,
}

impl GeocodingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nominatim => "nominatim",
            Self::Google => "google",
        }
    }
}

/// Address components resolved from a coordinate.
///
/// `zipcode` is always digits only and never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub zipcode: String,
    pub address: Option<String>,
    pub neighbourhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub source: GeocodingSource,
}

/// Removes every character that is not an ASCII digit.
///
/// # Examples
///
/// ```
/// use estimo_market_data::models::strip_non_digits;
///
/// assert_eq!(strip_non_digits("01310-100"), "01310100");
/// ```
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_non_digits() {
        assert_eq!(strip_non_digits("01310-100"), "01310100");
        assert_eq!(strip_non_digits(" 22.071-000 "), "22071000");
        assert_eq!(strip_non_digits("CEP"), "");
    }

    #[test]
    fn test_source_serializes_lowercase() {
        let json = serde_json::to_string(&GeocodingSource::Nominatim).unwrap();
        assert_eq!(json, "\"nominatim\"");
    }
}
