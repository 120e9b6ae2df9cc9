//! coinforge server
//!
//! Server-authoritative token minting over HTTP: the server's payer key creates
//! the mint, funds the requesting wallet, pins and registers metadata and
//! optionally revokes authorities.

pub mod api;
pub mod config;
pub mod keys;
pub mod mint;
pub mod uploads;

pub use config::ServerConfig;
pub use mint::{MintOutcome, MintService};
pub use uploads::{StoredUpload, UploadStore};
