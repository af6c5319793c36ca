use std::fmt;

use serde_json::{Map, Value};
use validator::ValidateEmail;

use crate::errors::ValidationErrors;

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const EMAIL: &str = "email";
pub const PASSWORD: &str = "password";

const EXPECTED_FIELDS: [&str; 4] = [FIRST_NAME, LAST_NAME, EMAIL, PASSWORD];

const NAME_LENGTH: (usize, usize) = (2, 255);
const PASSWORD_LENGTH: (usize, usize) = (10, 255);

/// Turns an untrusted request body into a typed payload.
pub trait RequestValidator: Send + Sync {
    type Output;

    fn validate(&self, body: &Map<String, Value>) -> Result<Self::Output, ValidationErrors>;
}

/// The four checked values of a create/update request, exactly as submitted.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for UserPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPayload")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Rules for user create/update bodies.
///
/// Every rule runs; all violations of one body are reported together.
/// Values are never trimmed or case-folded.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRequestValidator;

impl RequestValidator for UserRequestValidator {
    type Output = UserPayload;

    fn validate(&self, body: &Map<String, Value>) -> Result<UserPayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let first_name = required_str(body, FIRST_NAME, &mut errors);
        if let Some(v) = first_name {
            check_length(FIRST_NAME, v, NAME_LENGTH, &mut errors);
        }

        let last_name = required_str(body, LAST_NAME, &mut errors);
        if let Some(v) = last_name {
            check_length(LAST_NAME, v, NAME_LENGTH, &mut errors);
        }

        let email = required_str(body, EMAIL, &mut errors);
        if let Some(v) = email {
            check_email(v, &mut errors);
        }

        let password = required_str(body, PASSWORD, &mut errors);
        if let Some(v) = password {
            check_length(PASSWORD, v, PASSWORD_LENGTH, &mut errors);
        }

        for key in body.keys().filter(|k| !EXPECTED_FIELDS.contains(&k.as_str())) {
            errors.push(format!("The field '{key}' was not expected."));
        }

        match (first_name, last_name, email, password) {
            (Some(first_name), Some(last_name), Some(email), Some(password)) if errors.is_empty() => Ok(UserPayload {
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                email: email.to_owned(),
                password: password.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

fn required_str<'a>(body: &'a Map<String, Value>, field: &str, errors: &mut ValidationErrors) -> Option<&'a str> {
    match body.get(field) {
        None => {
            errors.push(format!("The field '{field}' is missing."));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            errors.push(format!("The '{field}' field value should be of type string."));
            None
        }
    }
}

fn check_length(field: &str, value: &str, (min, max): (usize, usize), errors: &mut ValidationErrors) {
    let len = value.chars().count();
    if len < min {
        errors.push(format!("The '{field}' field value is too short. It should have {min} characters or more."));
    } else if len > max {
        errors.push(format!("The '{field}' field value is too long. It should have {max} characters or less."));
    }
}

fn check_email(value: &str, errors: &mut ValidationErrors) {
    if value.is_empty() {
        errors.push(format!("The '{EMAIL}' field value should not be blank."));
    } else if !value.validate_email() || !has_dotted_domain(value) {
        errors.push(format!("The '{EMAIL}' field value is not a valid email address."));
    }
}

// single-label domains such as `localhost` are not accepted
fn has_dotted_domain(value: &str) -> bool {
    value.rsplit_once('@').is_some_and(|(_, domain)| domain.contains('.'))
}
