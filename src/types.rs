//! Shared types for the TILLER runner.
//!
//! These types form the data model used across all modules: accounts,
//! balances, pool snapshots, gas policy, and the per-account step report.
//! They are designed to be stable so that chain, portal, and engine
//! modules can depend on them without circular references.

use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, H256, U256};
use ethers::utils::format_units;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// One wallet under the runner's control.
///
/// The signing key is held as a secret and only materialised into a
/// `LocalWallet` at the point of use. The key is never logged; the derived
/// address is the public identity used everywhere else.
pub struct Account {
    signing_key: SecretString,
    pub address: Address,
}

impl Account {
    /// Parse a raw hex private key (with or without `0x` prefix) and derive
    /// the wallet address. The key is validated here so later `wallet()`
    /// calls cannot fail on malformed input.
    pub fn from_key(raw: &str) -> anyhow::Result<Self> {
        let trimmed = raw.trim();
        let wallet: LocalWallet = trimmed
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid signing key: {e}"))?;
        Ok(Self {
            signing_key: SecretString::new(trimmed.to_string()),
            address: wallet.address(),
        })
    }

    /// Materialise the signer. Key validity was checked at construction.
    pub fn wallet(&self) -> anyhow::Result<LocalWallet> {
        self.signing_key
            .expose_secret()
            .parse()
            .map_err(|e| anyhow::anyhow!("signing key no longer parses: {e}"))
    }

    /// Sign an arbitrary login message, returning the `0x`-prefixed
    /// 65-byte signature in hex as the portal expects it.
    pub async fn sign_message(&self, message: &str) -> anyhow::Result<String> {
        let wallet = self.wallet()?;
        let signature = wallet.sign_message(message).await?;
        Ok(format!("0x{signature}"))
    }

    /// Short display form of the address for log lines.
    pub fn short(&self) -> String {
        let full = format!("{:#x}", self.address);
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl Clone for Account {
    fn clone(&self) -> Self {
        Self {
            signing_key: self.signing_key.clone(),
            address: self.address,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose the key, even in debug output.
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Balances
// ---------------------------------------------------------------------------

/// A token (or native) balance, freshly read from the chain.
///
/// Balances are never cached across steps: earlier writes mutate them, so
/// every decision point re-fetches before computing amounts.
#[derive(Debug, Clone)]
pub struct Balance {
    pub raw: U256,
    pub display: String,
}

impl Balance {
    pub fn new(raw: U256, decimals: u32) -> Self {
        let display = format_units(raw, decimals).unwrap_or_else(|_| raw.to_string());
        Self { raw, display }
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// One whole token unit (10^decimals) in raw representation.
pub fn one_unit(decimals: u32) -> U256 {
    U256::exp10(decimals as usize)
}

/// `amount * bps / 10_000`, the fraction helper used for every configured
/// percentage (disposal 25%, swap 70%, stake 30%, slippage floor 95%).
pub fn apply_bps(amount: U256, bps: u64) -> U256 {
    amount * U256::from(bps) / U256::from(10_000u64)
}

// ---------------------------------------------------------------------------
// Pool reserves
// ---------------------------------------------------------------------------

/// Reserves of a two-sided pool, captured immediately before a sizing
/// decision. `token0` records the pool's own ordering so callers can
/// orient the snapshot around the asset they care about.
#[derive(Debug, Clone, Copy)]
pub struct PoolReserveSnapshot {
    pub reserve0: U256,
    pub reserve1: U256,
    pub token0: Address,
}

impl PoolReserveSnapshot {
    /// Reserves as (reserve of `token`, reserve of the other side).
    pub fn oriented(&self, token: Address) -> (U256, U256) {
        if token == self.token0 {
            (self.reserve0, self.reserve1)
        } else {
            (self.reserve1, self.reserve0)
        }
    }

    /// True when the pool has no liquidity on either side yet.
    pub fn is_uninitialized(&self) -> bool {
        self.reserve0.is_zero() || self.reserve1.is_zero()
    }
}

// ---------------------------------------------------------------------------
// Gas policy
// ---------------------------------------------------------------------------

/// The kind of write operation, used to select a fixed gas limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxKind {
    Approve,
    Swap,
    Stake,
    AddLiquidity,
    PoolDeposit,
    Opaque,
    Claim,
}

/// Fee parameters attached to a single write. Constant per call type —
/// never estimated dynamically.
#[derive(Debug, Clone, Copy)]
pub struct TxFees {
    pub gas_limit: u64,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

impl TxFees {
    /// Worst-case native cost of a transaction under this policy.
    pub fn max_cost(&self) -> U256 {
        U256::from(self.gas_limit) * self.max_fee_per_gas
    }
}

// ---------------------------------------------------------------------------
// Step reporting
// ---------------------------------------------------------------------------

/// The ten orchestrator states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    GasCheck,
    RewardClaim,
    PrimaryDisposal,
    PairedLiquidity,
    StableGate,
    BtcStake,
    StableToSynthetic,
    SyntheticStake,
    SyntheticPairLiquidity,
    FinalLiquidity,
}

impl Step {
    /// All steps in pipeline order.
    pub const ALL: &'static [Step] = &[
        Step::GasCheck,
        Step::RewardClaim,
        Step::PrimaryDisposal,
        Step::PairedLiquidity,
        Step::StableGate,
        Step::BtcStake,
        Step::StableToSynthetic,
        Step::SyntheticStake,
        Step::SyntheticPairLiquidity,
        Step::FinalLiquidity,
    ];

    /// Whether a failed (or unmet) outcome of this step halts every later
    /// step for the account. Only the two sufficiency gates do; everything
    /// else fails forward to the next independent step.
    pub fn halts_account_on_failure(&self) -> bool {
        matches!(self, Step::GasCheck | Step::StableGate)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::GasCheck => "gas-check",
            Step::RewardClaim => "reward-claim",
            Step::PrimaryDisposal => "primary-disposal",
            Step::PairedLiquidity => "paired-liquidity",
            Step::StableGate => "stable-gate",
            Step::BtcStake => "btc-stake",
            Step::StableToSynthetic => "stable-to-synthetic",
            Step::SyntheticStake => "synthetic-stake",
            Step::SyntheticPairLiquidity => "synthetic-pair-liquidity",
            Step::FinalLiquidity => "final-liquidity",
        };
        write!(f, "{name}")
    }
}

/// Outcome of one step for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// At least one on-chain action of the step confirmed.
    Completed,
    /// The step's trigger condition was not met; nothing was attempted.
    Skipped,
    /// The step was attempted and every action of it failed.
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Completed => write!(f, "completed"),
            StepStatus::Skipped => write!(f, "skipped"),
            StepStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: Step,
    pub status: StepStatus,
    pub detail: String,
}

/// Full record of one account pass through the pipeline.
#[derive(Debug, Clone)]
pub struct AccountReport {
    pub address: Address,
    pub outcomes: Vec<StepOutcome>,
    /// Set when a halting gate stopped the pass early.
    pub halted_at: Option<Step>,
    /// Hashes of every confirmed on-chain write, in submission order.
    pub tx_hashes: Vec<H256>,
}

impl AccountReport {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            outcomes: Vec::new(),
            halted_at: None,
            tx_hashes: Vec::new(),
        }
    }

    pub fn record(&mut self, step: Step, status: StepStatus, detail: impl Into<String>) {
        self.outcomes.push(StepOutcome {
            step,
            status,
            detail: detail.into(),
        });
    }

    pub fn status_of(&self, step: Step) -> Option<StepStatus> {
        self.outcomes
            .iter()
            .find(|o| o.step == step)
            .map(|o| o.status)
    }

    pub fn completed_steps(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == StepStatus::Completed)
            .count()
    }
}

impl fmt::Display for AccountReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#x}: {} steps, {} completed, {} txs{}",
            self.address,
            self.outcomes.len(),
            self.completed_steps(),
            self.tx_hashes.len(),
            match self.halted_at {
                Some(step) => format!(", halted at {step}"),
                None => String::new(),
            },
        )
    }
}

/// Aggregate over a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub accounts_processed: usize,
    /// Accounts skipped before the pipeline (proxy, login, or referral
    /// preamble failure).
    pub accounts_skipped: usize,
    pub reports: Vec<AccountReport>,
}

impl RunSummary {
    pub fn total_transactions(&self) -> usize {
        self.reports.iter().map(|r| r.tx_hashes.len()).sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed={} skipped={} txs={}",
            self.accounts_processed,
            self.accounts_skipped,
            self.total_transactions(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_account_from_key_derives_address() {
        let account = Account::from_key(TEST_KEY).unwrap();
        assert_ne!(account.address, Address::zero());
        // Deterministic derivation
        let again = Account::from_key(TEST_KEY).unwrap();
        assert_eq!(account.address, again.address);
    }

    #[test]
    fn test_account_from_key_rejects_garbage() {
        assert!(Account::from_key("not-a-key").is_err());
        assert!(Account::from_key("").is_err());
    }

    #[test]
    fn test_account_debug_hides_key() {
        let account = Account::from_key(TEST_KEY).unwrap();
        let debug = format!("{account:?}");
        assert!(!debug.contains("4c0883a6"));
        assert!(debug.contains("address"));
    }

    #[test]
    fn test_account_short_form() {
        let account = Account::from_key(TEST_KEY).unwrap();
        let short = account.short();
        assert!(short.starts_with("0x"));
        assert!(short.contains('…'));
    }

    #[tokio::test]
    async fn test_sign_message_prefixed() {
        let account = Account::from_key(TEST_KEY).unwrap();
        let sig = account.sign_message("hello").await.unwrap();
        assert!(sig.starts_with("0x"));
        // 65 bytes → 130 hex chars + prefix
        assert_eq!(sig.len(), 132);
    }

    #[test]
    fn test_balance_display() {
        let bal = Balance::new(U256::from(1_500_000u64), 6);
        assert_eq!(bal.display, "1.500000");
        assert!(!bal.is_zero());
        assert!(Balance::new(U256::zero(), 6).is_zero());
    }

    #[test]
    fn test_one_unit() {
        assert_eq!(one_unit(6), U256::from(1_000_000u64));
        assert_eq!(one_unit(0), U256::one());
    }

    #[test]
    fn test_apply_bps() {
        let amount = U256::from(1000u64);
        assert_eq!(apply_bps(amount, 2_500), U256::from(250u64)); // 25%
        assert_eq!(apply_bps(amount, 7_000), U256::from(700u64)); // 70%
        assert_eq!(apply_bps(amount, 9_500), U256::from(950u64)); // 95%
        assert_eq!(apply_bps(U256::zero(), 2_500), U256::zero());
    }

    #[test]
    fn test_snapshot_orientation() {
        let a = Address::from_low_u64_be(1);
        let b = Address::from_low_u64_be(2);
        let snap = PoolReserveSnapshot {
            reserve0: U256::from(100u64),
            reserve1: U256::from(400u64),
            token0: a,
        };
        assert_eq!(snap.oriented(a), (U256::from(100u64), U256::from(400u64)));
        assert_eq!(snap.oriented(b), (U256::from(400u64), U256::from(100u64)));
        assert!(!snap.is_uninitialized());
    }

    #[test]
    fn test_snapshot_uninitialized() {
        let snap = PoolReserveSnapshot {
            reserve0: U256::zero(),
            reserve1: U256::from(10u64),
            token0: Address::zero(),
        };
        assert!(snap.is_uninitialized());
    }

    #[test]
    fn test_tx_fees_max_cost() {
        let fees = TxFees {
            gas_limit: 500_000,
            max_fee_per_gas: U256::from(67_500_000_000u64),
            max_priority_fee_per_gas: U256::from(260_000_000u64),
        };
        assert_eq!(
            fees.max_cost(),
            U256::from(500_000u64) * U256::from(67_500_000_000u64)
        );
    }

    #[test]
    fn test_step_order_and_gates() {
        assert_eq!(Step::ALL.len(), 10);
        assert_eq!(Step::ALL[0], Step::GasCheck);
        assert_eq!(Step::ALL[4], Step::StableGate);
        assert!(Step::GasCheck.halts_account_on_failure());
        assert!(Step::StableGate.halts_account_on_failure());
        assert!(!Step::RewardClaim.halts_account_on_failure());
        assert!(!Step::FinalLiquidity.halts_account_on_failure());
    }

    #[test]
    fn test_step_display() {
        assert_eq!(format!("{}", Step::GasCheck), "gas-check");
        assert_eq!(format!("{}", Step::SyntheticPairLiquidity), "synthetic-pair-liquidity");
    }

    #[test]
    fn test_account_report_record_and_query() {
        let mut report = AccountReport::new(Address::zero());
        report.record(Step::GasCheck, StepStatus::Completed, "ok");
        report.record(Step::RewardClaim, StepStatus::Skipped, "not eligible");
        assert_eq!(report.status_of(Step::GasCheck), Some(StepStatus::Completed));
        assert_eq!(report.status_of(Step::RewardClaim), Some(StepStatus::Skipped));
        assert_eq!(report.status_of(Step::BtcStake), None);
        assert_eq!(report.completed_steps(), 1);
    }

    #[test]
    fn test_run_summary_totals() {
        let mut summary = RunSummary::default();
        let mut r = AccountReport::new(Address::zero());
        r.tx_hashes.push(H256::zero());
        r.tx_hashes.push(H256::zero());
        summary.reports.push(r);
        summary.accounts_processed = 1;
        assert_eq!(summary.total_transactions(), 2);
        assert!(format!("{summary}").contains("txs=2"));
    }
}
