//! On-chain access seam.
//!
//! `ChainClient` is the single trait the engine talks to for reads and
//! writes. The production implementation (`EvmClient`) signs and submits
//! real transactions; tests swap in an in-memory mock. Every write takes
//! the fixed `TxFees` chosen by the caller, so fee policy stays out of
//! this layer.

pub mod calldata;
pub mod evm;

use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256, U256};
use thiserror::Error;

use crate::types::{Account, PoolReserveSnapshot, TxFees};

pub use evm::EvmClient;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("Transaction reverted on-chain: {0:#x}")]
    Reverted(H256),

    #[error("Transaction not confirmed within {0}s")]
    ConfirmationTimeout(u64),

    #[error("Transaction dropped before inclusion")]
    Dropped,

    #[error("ABI encode/decode failed: {0}")]
    Abi(String),

    #[error("Wallet error: {0}")]
    Wallet(String),
}

/// A confirmed on-chain write.
#[derive(Debug, Clone, Copy)]
pub struct TxConfirmation {
    pub hash: H256,
}

/// Reads and writes against the campaign's fixed contract set.
///
/// All writes block until the transaction is confirmed (or classified as
/// failed); a returned `TxConfirmation` means status 1 in a mined receipt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn native_balance(&self, owner: Address) -> Result<U256, ChainError>;

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError>;

    /// Reserves plus token0 ordering for a UniswapV2-style pair.
    async fn pool_reserves(&self, pool: Address) -> Result<PoolReserveSnapshot, ChainError>;

    /// `coins(index)` of a curve-style pool.
    async fn pool_coin_at(&self, pool: Address, index: u64) -> Result<Address, ChainError>;

    async fn send_approval(
        &self,
        account: &Account,
        token: Address,
        spender: Address,
        amount: U256,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError>;

    async fn send_swap(
        &self,
        account: &Account,
        router: Address,
        amount_in: U256,
        min_out: U256,
        path: Vec<Address>,
        deadline: U256,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError>;

    /// Typed two-argument `stake(token, value)`.
    async fn send_stake(
        &self,
        account: &Account,
        contract: Address,
        token: Address,
        amount: U256,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError>;

    /// Router `addLiquidity` for a token pair. Amounts and minimums must
    /// already be in the pair's token0/token1 order.
    #[allow(clippy::too_many_arguments)]
    async fn send_add_liquidity(
        &self,
        account: &Account,
        router: Address,
        token_a: Address,
        token_b: Address,
        amounts: (U256, U256),
        minimums: (U256, U256),
        deadline: U256,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError>;

    /// Curve-style `add_liquidity(amounts, min_mint_amount, receiver)`.
    async fn send_pool_deposit(
        &self,
        account: &Account,
        pool: Address,
        amounts: Vec<U256>,
        min_mint: U256,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError>;

    /// Submit pre-built calldata to a contract whose ABI is not published.
    async fn send_opaque(
        &self,
        account: &Account,
        to: Address,
        data: Bytes,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError>;
}
