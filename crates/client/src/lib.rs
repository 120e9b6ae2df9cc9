//! coinforge client
//!
//! The pay-then-launch path: a wallet session pays the creation fee, the token
//! metadata is pinned and a third-party trading API creates the token.
//!
//! - [`wallet`]: wallet port, session and local keypair wallet
//! - [`connection`]: consent and connection state machine
//! - [`payment`]: fee transfer step
//! - [`trade`]: trading API client
//! - [`flow`]: the launch orchestration

pub mod config;
pub mod connection;
pub mod error;
pub mod flow;
pub mod payment;
pub mod preview;
pub mod trade;
pub mod wallet;

pub use config::LaunchConfig;
pub use connection::{ConnectionState, WalletConnector};
pub use error::{FlowError, FlowResult};
pub use flow::{FlowObserver, FlowStage, LaunchFlow, LaunchReceipt};
pub use trade::{HttpTradeClient, TradeApi, TradeParams, TradeRequest};
pub use wallet::{KeypairWallet, WalletError, WalletProvider, WalletSession};
