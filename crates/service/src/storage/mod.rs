//! Storage abstractions for service layer
//!
//! Reusable file-backed stores shared by the adapters that persist small
//! collections as JSON.

pub mod json_array_store;
