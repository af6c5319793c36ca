//! Fixture users for local development.

use std::path::Path;

use sea_orm::DatabaseConnection;
use tracing::info;

use super::adapter::{JsonUserAdapter, SeaOrmUserAdapter, UserAdapter};
use super::domain::User;
use super::password::PasswordHasher;
use crate::errors::{ServiceError, StorageError};

pub const SEED_PASSWORD: &str = "Password123";

const SEED_USERS: [(&str, &str, &str); 3] = [
    ("John", "Doe", "john.doe@example.com"),
    ("Max", "Mustermann", "max.mustermann@example.com"),
    ("Biene", "Maja", "biene.maja@example.com"),
];

/// Replace the contents of both stores with the same three users.
///
/// The database table is emptied first; the JSON file is overwritten. Both
/// stores end up holding identical records, ids included.
pub async fn seed_test_data(
    db: &DatabaseConnection,
    json_path: &Path,
    hasher: &dyn PasswordHasher,
) -> Result<Vec<User>, ServiceError> {
    let users = SEED_USERS
        .iter()
        .map(|(first, last, email)| {
            let mut u = User::new();
            u.set_first_name(*first);
            u.set_last_name(*last);
            u.set_email(*email);
            u.set_password_hash(hasher.hash(SEED_PASSWORD)?);
            Ok(u)
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;

    let removed = models::user::delete_all(db).await.map_err(StorageError::from)?;
    info!(removed, "database users removed");

    let database = SeaOrmUserAdapter::new(db.clone());
    for u in &users {
        database.create(u).await?;
    }
    info!(count = users.len(), "database users seeded");

    JsonUserAdapter::new(json_path).replace_all(&users).await?;
    info!(count = users.len(), path = %json_path.display(), "json users seeded");

    Ok(users)
}
