//! HTTP request handlers for the REST API.

pub mod account;
pub mod chat;
pub mod profile;
