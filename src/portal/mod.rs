//! Campaign portal access seam.
//!
//! The portal issues a per-session API key after a signed login, tracks
//! referral binding and points, and hands out a pre-built claim
//! transaction when an account has an unclaimed reward. `PortalApi` is the
//! trait the driver talks to; the production client routes every request
//! through the account's proxy.

pub mod client;

use async_trait::async_trait;
use ethers::types::{Address, Bytes};
use thiserror::Error;

use crate::types::Account;

pub use client::PortalClient;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Portal request failed: {0}")]
    Connectivity(String),

    #[error("Portal rejected the request: HTTP {status} {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Unexpected portal response: {0}")]
    Decode(String),

    #[error("Login signing failed: {0}")]
    Signing(String),
}

/// An authenticated portal session for one account.
#[derive(Debug, Clone)]
pub struct Session {
    pub api_key: String,
    pub address: Address,
}

/// A claim transaction built by the portal, submitted verbatim.
#[derive(Debug, Clone)]
pub struct ClaimTransaction {
    pub to: Address,
    pub data: Bytes,
}

/// Reward claim state for an account.
#[derive(Debug, Clone)]
pub struct ClaimStatus {
    pub eligible: bool,
    /// Reward amount as reported by the portal, display only.
    pub reward: f64,
    pub tx: Option<ClaimTransaction>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// Confirm the proxy routes traffic and return the egress IP.
    async fn verify_egress(&self) -> Result<String, PortalError>;

    /// Signed-message login; returns the session API key.
    async fn login(&self, account: &Account) -> Result<Session, PortalError>;

    /// Referral binding state. `None` means the portal has no referral
    /// record for the account at all.
    async fn referral_status(&self, session: &Session) -> Result<Option<bool>, PortalError>;

    /// Bind the configured referral code; returns whether it took.
    async fn bind_referral(&self, session: &Session, code: &str) -> Result<bool, PortalError>;

    /// Current points total, informational.
    async fn points(&self, session: &Session) -> Result<f64, PortalError>;

    /// Season reward claim eligibility and, when eligible, the claim
    /// transaction to submit.
    async fn claim_status(&self, session: &Session) -> Result<ClaimStatus, PortalError>;
}
