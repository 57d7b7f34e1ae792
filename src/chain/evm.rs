//! Ethers-backed `ChainClient` implementation.
//!
//! One HTTP provider is shared across the run; a signer middleware is
//! materialised per write from the account's key. All writes are EIP-1559
//! with the caller's fixed fee parameters, and block until a mined receipt
//! with status 1 or a classified failure.

use async_trait::async_trait;
use ethers::abi::{decode, ParamType, Token};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::Signer;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, Eip1559TransactionRequest, U256};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{calldata, ChainClient, ChainError, TxConfirmation};
use crate::types::{Account, PoolReserveSnapshot, TxFees};

pub struct EvmClient {
    provider: Provider<Http>,
    chain_id: u64,
    confirmation_timeout_secs: u64,
}

impl EvmClient {
    pub fn new(rpc_url: &str, chain_id: u64, confirmation_timeout_secs: u64) -> Result<Self, ChainError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ChainError::Rpc(format!("invalid RPC URL: {e}")))?;
        Ok(Self {
            provider,
            chain_id,
            confirmation_timeout_secs,
        })
    }

    /// Read-only contract call.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        let tx: TypedTransaction = Eip1559TransactionRequest::new()
            .to(to)
            .data(data)
            .into();
        self.provider
            .call(&tx, None)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    /// Sign, submit, and await one write.
    async fn submit(
        &self,
        account: &Account,
        to: Address,
        data: Bytes,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        let wallet = account
            .wallet()
            .map_err(|e| ChainError::Wallet(e.to_string()))?
            .with_chain_id(self.chain_id);
        let client = SignerMiddleware::new(self.provider.clone(), wallet);

        let tx = Eip1559TransactionRequest::new()
            .from(account.address)
            .to(to)
            .data(data)
            .gas(U256::from(fees.gas_limit))
            .max_fee_per_gas(fees.max_fee_per_gas)
            .max_priority_fee_per_gas(fees.max_priority_fee_per_gas)
            .chain_id(self.chain_id);

        let pending = client
            .send_transaction(tx, None)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;
        let hash = *pending;
        debug!(tx = %format!("{hash:#x}"), to = %format!("{to:#x}"), "Transaction submitted");

        let receipt = tokio::time::timeout(
            Duration::from_secs(self.confirmation_timeout_secs),
            pending,
        )
        .await
        .map_err(|_| ChainError::ConfirmationTimeout(self.confirmation_timeout_secs))?
        .map_err(|e| ChainError::Rpc(e.to_string()))?
        .ok_or(ChainError::Dropped)?;

        match receipt.status {
            Some(status) if status == 1.into() => {
                info!(
                    tx = %format!("{hash:#x}"),
                    block = receipt.block_number.map(|b| b.as_u64()).unwrap_or_default(),
                    "Transaction confirmed"
                );
                Ok(TxConfirmation { hash })
            }
            _ => {
                warn!(tx = %format!("{hash:#x}"), "Transaction reverted");
                Err(ChainError::Reverted(hash))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

fn decode_uint(raw: &[u8]) -> Result<U256, ChainError> {
    let tokens = decode(&[ParamType::Uint(256)], raw).map_err(|e| ChainError::Abi(e.to_string()))?;
    match tokens.first() {
        Some(Token::Uint(value)) => Ok(*value),
        _ => Err(ChainError::Abi("expected uint256".to_string())),
    }
}

fn decode_address(raw: &[u8]) -> Result<Address, ChainError> {
    let tokens = decode(&[ParamType::Address], raw).map_err(|e| ChainError::Abi(e.to_string()))?;
    match tokens.first() {
        Some(Token::Address(addr)) => Ok(*addr),
        _ => Err(ChainError::Abi("expected address".to_string())),
    }
}

/// `getReserves()` returns (uint112 reserve0, uint112 reserve1, uint32 ts).
fn decode_reserves(raw: &[u8]) -> Result<(U256, U256), ChainError> {
    let tokens = decode(
        &[ParamType::Uint(112), ParamType::Uint(112), ParamType::Uint(32)],
        raw,
    )
    .map_err(|e| ChainError::Abi(e.to_string()))?;
    match (tokens.first(), tokens.get(1)) {
        (Some(Token::Uint(r0)), Some(Token::Uint(r1))) => Ok((*r0, *r1)),
        _ => Err(ChainError::Abi("malformed getReserves response".to_string())),
    }
}

#[async_trait]
impl ChainClient for EvmClient {
    async fn native_balance(&self, owner: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(owner, None)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        let raw = self.call(token, calldata::balance_of(owner)).await?;
        decode_uint(&raw)
    }

    async fn pool_reserves(&self, pool: Address) -> Result<PoolReserveSnapshot, ChainError> {
        let reserves_raw = self.call(pool, calldata::get_reserves()).await?;
        let (reserve0, reserve1) = decode_reserves(&reserves_raw)?;
        let token0_raw = self.call(pool, calldata::token0()).await?;
        let token0 = decode_address(&token0_raw)?;
        Ok(PoolReserveSnapshot {
            reserve0,
            reserve1,
            token0,
        })
    }

    async fn pool_coin_at(&self, pool: Address, index: u64) -> Result<Address, ChainError> {
        let raw = self.call(pool, calldata::coins(index)).await?;
        decode_address(&raw)
    }

    async fn send_approval(
        &self,
        account: &Account,
        token: Address,
        spender: Address,
        amount: U256,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        self.submit(account, token, calldata::approve(spender, amount), fees)
            .await
    }

    async fn send_swap(
        &self,
        account: &Account,
        router: Address,
        amount_in: U256,
        min_out: U256,
        path: Vec<Address>,
        deadline: U256,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        let data = calldata::swap_exact_tokens_for_tokens(
            amount_in,
            min_out,
            &path,
            account.address,
            deadline,
        );
        self.submit(account, router, data, fees).await
    }

    async fn send_stake(
        &self,
        account: &Account,
        contract: Address,
        token: Address,
        amount: U256,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        self.submit(account, contract, calldata::stake(token, amount), fees)
            .await
    }

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
    ) -> Result<TxConfirmation, ChainError> {
        let data = calldata::add_liquidity(
            token_a,
            token_b,
            amounts.0,
            amounts.1,
            minimums.0,
            minimums.1,
            account.address,
            deadline,
        );
        self.submit(account, router, data, fees).await
    }

    async fn send_pool_deposit(
        &self,
        account: &Account,
        pool: Address,
        amounts: Vec<U256>,
        min_mint: U256,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        let data = calldata::pool_deposit(&amounts, min_mint, account.address);
        self.submit(account, pool, data, fees).await
    }

    async fn send_opaque(
        &self,
        account: &Account,
        to: Address,
        data: Bytes,
        fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        self.submit(account, to, data, fees).await
    }
}
