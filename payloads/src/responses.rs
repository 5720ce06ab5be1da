use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::form::PropertyField;

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub is_admin: bool,
}

impl LoginResponse {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// The user half of an auth session, persisted as JSON next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub is_admin: bool,
}

/// A page of results with position and boundary metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Current page, zero-based
    pub number: u32,
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub size: u32,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    /// Wrap an unpaginated list as the only page.
    pub fn single(content: Vec<T>) -> Self {
        let len = content.len();
        Self {
            empty: len == 0,
            total_elements: len as u64,
            size: len as u32,
            content,
            number: 0,
            total_pages: 1,
            first: true,
            last: true,
        }
    }
}

/// Field-keyed validation messages, as returned in the body of a 400.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn for_field(&self, field: PropertyField) -> Option<&str> {
        self.get(field.key())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_of_nothing_is_empty() {
        let page: Page<u8> = Page::single(vec![]);
        assert!(page.empty && page.first && page.last);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn validation_errors_parse_from_flat_object() {
        let errors: ValidationErrors = serde_json::from_str(
            r#"{"price":"Price must be greater than 0","address":"Address is required"}"#,
        )
        .unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.for_field(PropertyField::Price),
            Some("Price must be greater than 0")
        );
        assert_eq!(
            errors.to_string(),
            "address: Address is required; price: Price must be greater than 0"
        );
    }

    #[test]
    fn page_envelope_tolerates_missing_counts() {
        let page: Page<u8> = serde_json::from_str(
            r#"{"content":[1,2],"number":1,"totalPages":3,
                "first":false,"last":false,"empty":false}"#,
        )
        .unwrap();
        assert_eq!(page.number, 1);
        assert_eq!(page.total_elements, 0);
    }
}
