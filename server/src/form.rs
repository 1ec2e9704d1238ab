//! Form field extraction for the form-encoded routes.
//!
//! # Design
//! Browsers submit forms as urlencoded or multipart bodies, and scripts often
//! put fields in the query string instead. `FormFields` gathers all of them
//! into one ordered list and `value` returns the first match, so a repeated
//! key resolves to its first occurrence. Urlencoded body fields come before
//! query fields; multipart fields come after them. File parts are skipped.
//!
//! A request with no content-type, or one that is not a form, contributes no
//! body fields. A form body that fails to decode is a `BadRequest`.

use axum::{
    extract::{FromRequest, Multipart, Query, Request},
    http::header::CONTENT_TYPE,
    Form,
};

use crate::error::ApiError;

const URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// Every form value in a request, in lookup order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self(fields)
    }

    /// First value for `key`, if any.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// First value for `key`, or the empty string.
    pub fn value_or_empty(&self, key: &str) -> String {
        self.value(key).unwrap_or_default().to_string()
    }
}

/// Media type without parameters, lowercased.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(essence);

        let mut fields = Vec::new();
        match content_type.as_deref() {
            Some(URLENCODED) => {
                let Form(body) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                fields.extend(body);
                fields.extend(query);
            }
            Some(MULTIPART) => {
                let mut multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                fields.extend(query);
                while let Some(field) = multipart
                    .next_field()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?
                {
                    if field.file_name().is_some() {
                        continue;
                    }
                    let Some(name) = field.name().map(str::to_owned) else {
                        continue;
                    };
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                    fields.push((name, value));
                }
            }
            _ => fields.extend(query),
        }

        Ok(Self(fields))
    }
}
