//! `TrackerOps` - client core of the video review app
//!
//! # Features
//!
//! - **Accounts**: signup, login and logout against a json-server style REST backend
//! - **Session**: auth state persisted on device and restored at launch
//! - **Profile**: full-object updates, photos as base64 data URIs
//! - **Review**: strokes, comments and tasks pinned to video timestamps
//!
//! # Example
//!
//! ```rust,no_run
//! use trackerops::{ApiClient, AuthStore, Config, Credentials, FileStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let client = ApiClient::from_config(&config)?;
//!     let mut auth = AuthStore::new(client, FileStore::in_dir(&config.data_dir));
//!     auth.check_auth_state()?;
//!     if !auth.state().is_authenticated {
//!         let user = auth.login(&Credentials::new("ada@example.com", "secret1")).await?;
//!         println!("Signed in as {}", user.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod review;
pub mod storage;

pub use api::{ApiClient, MemoryBackend, UserBackend};
pub use auth::{is_valid_email, AuthState, AuthStore};
pub use config::Config;
pub use error::{ClientError, Result};
pub use models::{Credentials, ProfileUpdate, SessionUser, SignupRequest, User};
pub use navigation::{initial_route, Route, Tab};
pub use review::ReviewSession;
pub use storage::{FileStore, KeyValueStore, MemoryStore};

/// Version of trackerops
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
