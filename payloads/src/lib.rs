pub mod api_client;
pub mod auth;
pub mod cache;
pub mod debounce;
pub mod filters;
pub mod form;
pub mod pagination;
pub mod requests;
pub mod responses;
pub mod session;

pub use api_client::{APIClient, ClientError};
pub use filters::PropertyFilters;
pub use responses::{Page, ValidationErrors};
pub use session::SessionStore;

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct PropertyId(pub i64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ImageId(pub i64);

/// A property listing as stored by the backend.
///
/// `id` is absent until the record has been persisted; the server assigns it
/// on create.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PropertyId>,
    pub address: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub bedrooms: u32,
    /// Half steps are allowed, e.g. 1.5
    pub bathrooms: f64,
    pub square_footage: f64,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// An image attached to a property. `url` may be absolute or relative to the
/// server, see [`APIClient::image_url`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    pub file_name: String,
    pub content_type: String,
    pub url: String,
}

/// Format a price for display with thousands separators, e.g. `£1,250,000`.
pub fn format_price(price: f64) -> String {
    let negative = price < 0.0;
    let whole = price.abs().round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-£{grouped}")
    } else {
        format!("£{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_uses_camel_case_and_omits_missing_id() {
        let property = Property {
            address: "1 High Street".into(),
            price: 250000.0,
            bedrooms: 2,
            bathrooms: 1.5,
            square_footage: 800.0,
            ..Default::default()
        };
        let json = serde_json::to_value(&property).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["squareFootage"], 800.0);
        assert_eq!(json["bathrooms"], 1.5);
    }

    #[test]
    fn property_without_images_deserializes() {
        let property: Property = serde_json::from_str(
            r#"{"id":3,"address":"a","price":1,"bedrooms":1,
                "bathrooms":1,"squareFootage":1}"#,
        )
        .unwrap();
        assert_eq!(property.id, Some(PropertyId(3)));
        assert!(property.images.is_empty());
        assert_eq!(property.description, "");
    }

    #[test]
    fn prices_are_grouped_by_thousands() {
        assert_eq!(format_price(0.0), "£0");
        assert_eq!(format_price(999.0), "£999");
        assert_eq!(format_price(1000.0), "£1,000");
        assert_eq!(format_price(1250000.0), "£1,250,000");
    }
}
