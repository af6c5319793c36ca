use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format used for `created` / `updated` in every serialized view.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC time at the precision the views can express.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

/// A user record.
///
/// The identifier and `created` are fixed by [`User::new`]; there is no setter
/// for the id. Field values are not checked here, that is the validator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    created: NaiveDateTime,
    updated: Option<NaiveDateTime>,
}

impl User {
    /// Fresh user with a random v4 id, `created` set to now and empty fields.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password_hash: String::new(),
            created: now(),
            updated: None,
        }
    }

    pub fn id(&self) -> &str { &self.id }

    pub fn first_name(&self) -> &str { &self.first_name }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn last_name(&self) -> &str { &self.last_name }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    pub fn email(&self) -> &str { &self.email }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn password_hash(&self) -> &str { &self.password_hash }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
    }

    pub fn created(&self) -> NaiveDateTime { self.created }

    pub fn updated(&self) -> Option<NaiveDateTime> { self.updated }

    pub fn set_updated(&mut self, updated: Option<NaiveDateTime>) {
        self.updated = updated;
    }

    /// Stamp `updated` with the current time.
    pub fn touch(&mut self) {
        self.updated = Some(now());
    }

    /// API-facing view; never carries the password hash.
    pub fn public_view(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            created: self.created,
            updated: self.updated,
        }
    }

    /// Complete record including the hash, for stores that persist whole documents.
    pub fn full_view(&self) -> UserRecord {
        UserRecord {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            created: self.created,
            updated: self.updated,
            password: self.password_hash.clone(),
        }
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild a user from a stored record, keeping its original id and timestamps.
impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            password_hash: r.password,
            created: r.created,
            updated: r.updated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(with = "datetime_format")]
    pub created: NaiveDateTime,
    #[serde(with = "option_datetime_format")]
    pub updated: Option<NaiveDateTime>,
}

/// Full view: the public fields plus `password` (the hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(with = "datetime_format")]
    pub created: NaiveDateTime,
    #[serde(default, with = "option_datetime_format")]
    pub updated: Option<NaiveDateTime>,
    pub password: String,
}

mod datetime_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATETIME_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&value.format(DATETIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

mod option_datetime_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATETIME_FORMAT;

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.collect_str(&v.format(DATETIME_FORMAT)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}
