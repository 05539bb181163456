//! Unified testing utilities for Vaultlink
//!
//! Consolidates the fixtures and builders the unit and integration suites
//! share, so every test provisions the same partner, credential, and
//! site-account data.
//!
//! - [`fixtures`] - Pre-provisioned stores, relays, and resolvers
//! - [`builders`] - Fluent builders for sessions and credentials

pub mod builders;
pub mod fixtures;

pub use builders::{LoginSessionBuilder, StoredCredentialBuilder};
pub use fixtures::TestFixtures;
