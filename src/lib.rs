#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the vaultlink application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod handlers;
pub mod models;
pub mod qr;
pub mod relay;
pub mod resolver;
pub mod settings;
pub mod store;
pub mod token;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use handlers::{health, initiate_login, poll_login_status};
pub use models::{LoginSession, SessionStatus, StoredCredential};
pub use relay::LoginRelay;
pub use resolver::{ScanOutcome, ScanResolver};
pub use settings::VaultlinkSettings;
pub use store::MemoryStore;
