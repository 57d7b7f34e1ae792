//! Deterministic in-memory collaborators for pipeline testing.
//!
//! `MockChain` records every write and mutates balances the way the real
//! chain would (inputs leave the wallet when a call confirms), so any
//! code reusing a stale balance snapshot produces visibly wrong amounts.
//! `MockPortal` serves canned portal responses. All state is in-memory
//! and fully controllable from test code.

use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256, U256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tiller::chain::{ChainClient, ChainError, TxConfirmation};
use tiller::portal::{ClaimStatus, PortalApi, PortalError, Session};
use tiller::types::{Account, PoolReserveSnapshot, TxFees};

pub const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

pub fn test_account() -> Account {
    Account::from_key(TEST_KEY).unwrap()
}

/// One recorded write, in submission order.
#[derive(Debug, Clone)]
pub enum Write {
    Approval {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Swap {
        router: Address,
        amount_in: U256,
        min_out: U256,
        path: Vec<Address>,
    },
    Stake {
        contract: Address,
        token: Address,
        amount: U256,
    },
    AddLiquidity {
        router: Address,
        token_a: Address,
        token_b: Address,
        amounts: (U256, U256),
        minimums: (U256, U256),
    },
    PoolDeposit {
        pool: Address,
        amounts: Vec<U256>,
        min_mint: U256,
    },
    Opaque {
        to: Address,
        data: Bytes,
    },
}

#[derive(Default)]
pub struct MockChain {
    native: Mutex<HashMap<Address, U256>>,
    /// (token, owner) → balance
    tokens: Mutex<HashMap<(Address, Address), U256>>,
    reserves: Mutex<HashMap<Address, PoolReserveSnapshot>>,
    /// (pool, index) → coin address
    coins: Mutex<HashMap<(Address, u64), Address>>,
    writes: Arc<Mutex<Vec<Write>>>,
    /// If set, all operations return this error.
    force_error: Mutex<Option<String>>,
    next_hash: Mutex<u64>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_native(&self, owner: Address, amount: U256) {
        self.native.lock().unwrap().insert(owner, amount);
    }

    pub fn set_token(&self, token: Address, owner: Address, amount: U256) {
        self.tokens.lock().unwrap().insert((token, owner), amount);
    }

    pub fn set_reserves(&self, pool: Address, snapshot: PoolReserveSnapshot) {
        self.reserves.lock().unwrap().insert(pool, snapshot);
    }

    pub fn set_coin(&self, pool: Address, index: u64, token: Address) {
        self.coins.lock().unwrap().insert((pool, index), token);
    }

    /// Force all subsequent operations to return an error.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    fn check_error(&self) -> Result<(), ChainError> {
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(ChainError::Rpc(msg));
        }
        Ok(())
    }

    fn debit(&self, token: Address, owner: Address, amount: U256) {
        let mut tokens = self.tokens.lock().unwrap();
        let balance = tokens.entry((token, owner)).or_default();
        *balance = balance.saturating_sub(amount);
    }

    fn confirm(&self, write: Write) -> TxConfirmation {
        self.writes.lock().unwrap().push(write);
        let mut next = self.next_hash.lock().unwrap();
        *next += 1;
        TxConfirmation {
            hash: H256::from_low_u64_be(*next),
        }
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn native_balance(&self, owner: Address) -> Result<U256, ChainError> {
        self.check_error()?;
        Ok(self
            .native
            .lock()
            .unwrap()
            .get(&owner)
            .copied()
            .unwrap_or_default())
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        self.check_error()?;
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .get(&(token, owner))
            .copied()
            .unwrap_or_default())
    }

    async fn pool_reserves(&self, pool: Address) -> Result<PoolReserveSnapshot, ChainError> {
        self.check_error()?;
        self.reserves
            .lock()
            .unwrap()
            .get(&pool)
            .copied()
            .ok_or_else(|| ChainError::Rpc(format!("no pair at {pool:#x}")))
    }

    async fn pool_coin_at(&self, pool: Address, index: u64) -> Result<Address, ChainError> {
        self.check_error()?;
        self.coins
            .lock()
            .unwrap()
            .get(&(pool, index))
            .copied()
            .ok_or_else(|| ChainError::Rpc(format!("no coin {index} at {pool:#x}")))
    }

    async fn send_approval(
        &self,
        _account: &Account,
        token: Address,
        spender: Address,
        amount: U256,
        _fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        self.check_error()?;
        Ok(self.confirm(Write::Approval {
            token,
            spender,
            amount,
        }))
    }

    async fn send_swap(
        &self,
        account: &Account,
        router: Address,
        amount_in: U256,
        min_out: U256,
        path: Vec<Address>,
        _deadline: U256,
        _fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        self.check_error()?;
        if let Some(input) = path.first() {
            self.debit(*input, account.address, amount_in);
        }
        Ok(self.confirm(Write::Swap {
            router,
            amount_in,
            min_out,
            path,
        }))
    }

    async fn send_stake(
        &self,
        account: &Account,
        contract: Address,
        token: Address,
        amount: U256,
        _fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        self.check_error()?;
        self.debit(token, account.address, amount);
        Ok(self.confirm(Write::Stake {
            contract,
            token,
            amount,
        }))
    }

    async fn send_add_liquidity(
        &self,
        account: &Account,
        router: Address,
        token_a: Address,
        token_b: Address,
        amounts: (U256, U256),
        minimums: (U256, U256),
        _deadline: U256,
        _fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        self.check_error()?;
        self.debit(token_a, account.address, amounts.0);
        self.debit(token_b, account.address, amounts.1);
        Ok(self.confirm(Write::AddLiquidity {
            router,
            token_a,
            token_b,
            amounts,
            minimums,
        }))
    }

    async fn send_pool_deposit(
        &self,
        account: &Account,
        pool: Address,
        amounts: Vec<U256>,
        min_mint: U256,
        _fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        self.check_error()?;
        let coins = self.coins.lock().unwrap().clone();
        for (index, amount) in amounts.iter().enumerate() {
            if let Some(coin) = coins.get(&(pool, index as u64)) {
                self.debit(*coin, account.address, *amount);
            }
        }
        Ok(self.confirm(Write::PoolDeposit {
            pool,
            amounts,
            min_mint,
        }))
    }

    async fn send_opaque(
        &self,
        _account: &Account,
        to: Address,
        data: Bytes,
        _fees: TxFees,
    ) -> Result<TxConfirmation, ChainError> {
        self.check_error()?;
        Ok(self.confirm(Write::Opaque { to, data }))
    }
}

/// Canned portal responses, controllable per test.
pub struct MockPortal {
    pub claim: Mutex<ClaimStatus>,
    pub referral_bound: Mutex<Option<bool>>,
    pub fail_login: bool,
}

impl Default for MockPortal {
    fn default() -> Self {
        Self {
            claim: Mutex::new(ClaimStatus {
                eligible: false,
                reward: 0.0,
                tx: None,
            }),
            referral_bound: Mutex::new(Some(true)),
            fail_login: false,
        }
    }
}

impl MockPortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_claim(&self, status: ClaimStatus) {
        *self.claim.lock().unwrap() = status;
    }
}

#[async_trait]
impl PortalApi for MockPortal {
    async fn verify_egress(&self) -> Result<String, PortalError> {
        Ok("203.0.113.7".to_string())
    }

    async fn login(&self, account: &Account) -> Result<Session, PortalError> {
        if self.fail_login {
            return Err(PortalError::Rejected {
                status: 401,
                detail: "login rejected".to_string(),
            });
        }
        Ok(Session {
            api_key: "test-session-key".to_string(),
            address: account.address,
        })
    }

    async fn referral_status(&self, _session: &Session) -> Result<Option<bool>, PortalError> {
        Ok(*self.referral_bound.lock().unwrap())
    }

    async fn bind_referral(&self, _session: &Session, _code: &str) -> Result<bool, PortalError> {
        Ok(true)
    }

    async fn points(&self, _session: &Session) -> Result<f64, PortalError> {
        Ok(1234.0)
    }

    async fn claim_status(&self, _session: &Session) -> Result<ClaimStatus, PortalError> {
        Ok(self.claim.lock().unwrap().clone())
    }
}
