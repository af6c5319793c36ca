use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

/// JSON body of every API response: `{"status", "data"?, "message"?, "errors"?}`.
#[derive(Serialize, Debug)]
pub struct Envelope<D: Serialize, E: Serialize = ()> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<D>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<E>,
}

impl<D: Serialize> Envelope<D> {
    pub fn data(data: D) -> Self {
        Self { status: Status::Success, data: Some(data), message: None, errors: None }
    }
}

impl Envelope<()> {
    pub fn success(message: impl Into<String>) -> Self {
        Self { status: Status::Success, data: None, message: Some(message.into()), errors: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { status: Status::Failure, data: None, message: Some(message.into()), errors: None }
    }
}

impl<E: Serialize> Envelope<(), E> {
    pub fn failure_with(message: impl Into<String>, errors: E) -> Self {
        Self { status: Status::Failure, data: None, message: Some(message.into()), errors: Some(errors) }
    }
}
