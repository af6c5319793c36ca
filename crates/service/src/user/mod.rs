//! User records: entity, request validation, persistence adapters and the manager.

pub mod adapter;
pub mod domain;
pub mod manager;
pub mod password;
pub mod seed;
pub mod validator;

pub use adapter::{build_adapter, UserAdapter};
pub use domain::{PublicUser, User, UserRecord};
pub use manager::UserManager;
pub use password::{Argon2Hasher, PasswordHasher};
