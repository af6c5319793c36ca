use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};

use models::user::{self, Entity as Users};

use super::UserAdapter;
use crate::errors::StorageError;
use crate::user::domain::{User, UserRecord};

/// `users` table through sea-orm; one statement per operation.
pub struct SeaOrmUserAdapter {
    db: DatabaseConnection,
}

impl SeaOrmUserAdapter {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_user(m: user::Model) -> User {
    User::from(UserRecord {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        created: m.created,
        updated: m.updated,
        password: m.password,
    })
}

fn to_active(u: &User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id().to_owned()),
        first_name: Set(u.first_name().to_owned()),
        last_name: Set(u.last_name().to_owned()),
        email: Set(u.email().to_owned()),
        password: Set(u.password_hash().to_owned()),
        created: Set(u.created()),
        updated: Set(u.updated()),
    }
}

#[async_trait]
impl UserAdapter for SeaOrmUserAdapter {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StorageError> {
        Ok(Users::find_by_id(id.to_owned()).one(&self.db).await?.map(to_user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(user::find_by_email(&self.db, email).await?.map(to_user))
    }

    async fn find_all(&self) -> Result<Vec<User>, StorageError> {
        let rows = Users::find().order_by_asc(user::Column::Created).all(&self.db).await?;
        Ok(rows.into_iter().map(to_user).collect())
    }

    async fn create(&self, u: &User) -> Result<(), StorageError> {
        Users::insert(to_active(u)).exec_without_returning(&self.db).await?;
        Ok(())
    }

    async fn update(&self, u: &User) -> Result<(), StorageError> {
        match to_active(u).update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(StorageError::UnknownId(u.id().to_owned())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, u: &User) -> Result<(), StorageError> {
        Users::delete_by_id(u.id().to_owned()).exec(&self.db).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "database"
    }
}
