//! # Zero Core
//!
//! The domain layer of the todo service.
//! Entities, ports and the services that own the authentication and
//! ownership rules. This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
