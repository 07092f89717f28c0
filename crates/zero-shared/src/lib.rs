//! # Zero Shared
//!
//! Wire types of the todo API: request bodies with their boundary
//! validation, response bodies, and the RFC 7807 error document.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
