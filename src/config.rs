//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs, then
//! resolves the network's role bindings and gas schedule into an immutable
//! `CampaignConfig` that is handed to the orchestrator at construction.
//! Secrets never live in the config file; `.env` may override the RPC URL.

use anyhow::{Context, Result};
use ethers::types::{Address, U256};
use ethers::utils::{parse_ether, parse_units};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

use crate::types::{TxFees, TxKind};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub run: RunConfig,
    pub portal: PortalConfig,
    pub gas: GasConfig,
    pub strategy: StrategyConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    pub wallet_file: String,
    pub proxy_file: String,
    pub referral_code: String,
    /// [min, max] milliseconds slept after the proxy check, before login.
    pub pre_login_delay_ms: [u64; 2],
    /// [min, max] milliseconds slept between accounts.
    pub inter_account_delay_ms: [u64; 2],
}

#[derive(Debug, Deserialize, Clone)]
pub struct PortalConfig {
    pub base_url: String,
    /// Origin/Referer the portal expects on every request.
    pub origin: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GasConfig {
    /// Constant max fee, decimal gwei (e.g. "67.5").
    pub max_fee_gwei: String,
    /// Constant priority fee, decimal gwei.
    pub priority_fee_gwei: String,
    /// Native-unit safety margin added on top of the worst-case gas cost
    /// in the sufficiency check (e.g. "0.001").
    pub margin_eth: String,
    pub limits: GasLimits,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GasLimits {
    pub approve: u64,
    pub swap: u64,
    pub stake: u64,
    pub add_liquidity: u64,
    pub pool_deposit: u64,
    pub opaque: u64,
    pub claim: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StrategyConfig {
    /// Fraction of the primary-reward balance routed through each swap leg.
    pub disposal_bps: u64,
    /// Fraction of the stablecoin balance swapped into the synthetic.
    pub stable_swap_bps: u64,
    /// Fraction of the synthetic balance staked.
    pub synthetic_stake_bps: u64,
    /// Slippage tolerance applied to liquidity minimums.
    pub slippage_bps: u64,
    /// Whole-unit stablecoin floor for the mid-pipeline gate.
    pub min_stable_units: u64,
    /// Swap/liquidity call deadline window.
    pub swap_deadline_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
    pub chain_id: u64,
    pub native_symbol: String,
    /// Seconds to wait for a submitted transaction to confirm.
    pub tx_timeout_secs: u64,
    pub tokens: HashMap<String, TokenConfig>,
    pub roles: RoleBindings,
    pub contracts: ContractAddresses,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub address: Address,
    pub decimals: u32,
}

/// Which configured token symbol plays which role in the pipeline.
#[derive(Debug, Deserialize, Clone)]
pub struct RoleBindings {
    pub primary: String,
    pub stable: String,
    pub synthetic: String,
    pub synthetic_staked: String,
    pub btc: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContractAddresses {
    /// Swap + add-liquidity router.
    pub router: Address,
    pub pair_primary_stable: Address,
    pub pair_primary_synthetic: Address,
    /// Curve-style pool (and LP token) for stable/synthetic.
    pub pool_stable_synthetic: Address,
    /// Curve-style pool (and LP token) for synthetic/staked-synthetic.
    pub pool_synthetic_pair: Address,
    pub staking_btc: Address,
    pub staking_synthetic: Address,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;

        // Environment override for the RPC endpoint (useful per-deployment).
        if let Ok(rpc) = std::env::var("TILLER_RPC_URL") {
            config.network.rpc_url = rpc;
        }

        Ok(config)
    }

    /// Resolve role bindings, contracts, and the gas schedule into the
    /// immutable campaign config the orchestrator takes at construction.
    pub fn campaign(&self) -> Result<CampaignConfig> {
        let token = |symbol: &str| -> Result<TokenInfo> {
            let cfg = self
                .network
                .tokens
                .get(symbol)
                .with_context(|| format!("Role token not in [network.tokens]: {symbol}"))?;
            Ok(TokenInfo {
                symbol: symbol.to_string(),
                address: cfg.address,
                decimals: cfg.decimals,
            })
        };

        let roles = &self.network.roles;
        Ok(CampaignConfig {
            chain_id: self.network.chain_id,
            native_symbol: self.network.native_symbol.clone(),
            primary: token(&roles.primary)?,
            stable: token(&roles.stable)?,
            synthetic: token(&roles.synthetic)?,
            synthetic_staked: token(&roles.synthetic_staked)?,
            btc: token(&roles.btc)?,
            contracts: self.network.contracts.clone(),
            gas: self.gas.plan()?,
            disposal_bps: self.strategy.disposal_bps,
            stable_swap_bps: self.strategy.stable_swap_bps,
            synthetic_stake_bps: self.strategy.synthetic_stake_bps,
            slippage_bps: self.strategy.slippage_bps,
            min_stable_units: self.strategy.min_stable_units,
            swap_deadline_secs: self.strategy.swap_deadline_secs,
        })
    }
}

impl GasConfig {
    /// Parse the decimal-gwei fee constants once, up front.
    pub fn plan(&self) -> Result<GasPlan> {
        let max_fee: U256 = parse_units(&self.max_fee_gwei, "gwei")
            .context("Invalid max_fee_gwei")?
            .into();
        let priority: U256 = parse_units(&self.priority_fee_gwei, "gwei")
            .context("Invalid priority_fee_gwei")?
            .into();
        let margin = parse_ether(&self.margin_eth).context("Invalid margin_eth")?;

        Ok(GasPlan {
            max_fee_per_gas: max_fee,
            max_priority_fee_per_gas: priority,
            margin,
            limits: self.limits.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Resolved campaign configuration
// ---------------------------------------------------------------------------

/// A role-bound token: symbol for logging, address and decimals for calls.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub symbol: String,
    pub address: Address,
    pub decimals: u32,
}

/// Fixed fee schedule, pre-parsed from config.
#[derive(Debug, Clone)]
pub struct GasPlan {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub margin: U256,
    pub limits: GasLimits,
}

impl GasPlan {
    /// Fee parameters for one call type.
    pub fn fees(&self, kind: TxKind) -> TxFees {
        let gas_limit = match kind {
            TxKind::Approve => self.limits.approve,
            TxKind::Swap => self.limits.swap,
            TxKind::Stake => self.limits.stake,
            TxKind::AddLiquidity => self.limits.add_liquidity,
            TxKind::PoolDeposit => self.limits.pool_deposit,
            TxKind::Opaque => self.limits.opaque,
            TxKind::Claim => self.limits.claim,
        };
        TxFees {
            gas_limit,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
        }
    }

    /// Worst-case single-transaction cost plus the safety margin — the
    /// native balance an account needs before any step runs.
    pub fn required_native(&self) -> U256 {
        let worst = self
            .limits
            .approve
            .max(self.limits.swap)
            .max(self.limits.stake)
            .max(self.limits.add_liquidity)
            .max(self.limits.pool_deposit)
            .max(self.limits.opaque)
            .max(self.limits.claim);
        U256::from(worst) * self.max_fee_per_gas + self.margin
    }
}

/// Everything the orchestrator needs, resolved and immutable. Shared
/// read-only across all accounts in a run.
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    pub chain_id: u64,
    pub native_symbol: String,
    pub primary: TokenInfo,
    pub stable: TokenInfo,
    pub synthetic: TokenInfo,
    pub synthetic_staked: TokenInfo,
    pub btc: TokenInfo,
    pub contracts: ContractAddresses,
    pub gas: GasPlan,
    pub disposal_bps: u64,
    pub stable_swap_bps: u64,
    pub synthetic_stake_bps: u64,
    pub slippage_bps: u64,
    pub min_stable_units: u64,
    pub swap_deadline_secs: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
