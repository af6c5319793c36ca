//! User service core: the business layer between the HTTP controller and storage.
//! - `user::UserManager` is the only component that mutates persisted users.
//! - Persistence goes through `user::UserAdapter`; the relational and JSON-file
//!   implementations are interchangeable and chosen by `user::build_adapter`.
//! - Errors are split into validation failures (caller's fault) and storage failures.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod user;
#[cfg(test)]
pub mod test_support;
