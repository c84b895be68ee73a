//! JSON body extractor that runs `validator` rules before the handler.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// Deserializes and validates a JSON payload.
///
/// Malformed JSON, missing fields and rule violations all become a 400
/// validation error.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(first_message(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Message of the first failing rule, taking fields in name order so the
/// reply does not depend on hash ordering.
fn first_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by_key(|(field, _)| **field);

    fields
        .into_iter()
        .find_map(|(field, errors)| {
            errors.first().map(|error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .unwrap_or_else(|| "Validation failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 6))]
        password: String,
    }

    #[test]
    fn test_first_message_is_stable() {
        let input = Signup {
            email: "nope".into(),
            password: "123".into(),
        };
        let errors = input.validate().unwrap_err();

        // "email" sorts before "password"
        assert_eq!(first_message(&errors), "Invalid email format");
    }

    #[test]
    fn test_rule_without_message_names_field() {
        let input = Signup {
            email: "john@example.com".into(),
            password: "123".into(),
        };
        let errors = input.validate().unwrap_err();

        assert_eq!(first_message(&errors), "password is invalid");
    }
}
