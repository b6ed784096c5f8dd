//! Quickbite Core - Shared types library.
//!
//! This crate provides common types used across all Quickbite components:
//! - `storefront` - The customer-facing ordering app
//! - `integration-tests` - End-to-end tests against a mocked Account Service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
