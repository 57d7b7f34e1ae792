//! The per-account step pipeline.
//!
//! Ten states in fixed order, each gating entry into the next. Two of them
//! (the native-gas check and the stablecoin floor) halt the whole account
//! when unmet; every other failure is caught at the step boundary, logged,
//! and the pipeline moves to the next independent step. Balances and pool
//! reserves are always re-read immediately before use, since earlier
//! steps mutate them.

use chrono::Utc;
use ethers::types::{Address, H256, U256};
use ethers::utils::format_ether;
use thiserror::Error;
use tracing::{info, warn};

use crate::chain::{calldata, ChainClient, ChainError};
use crate::config::{CampaignConfig, TokenInfo};
use crate::engine::approval::ApprovalGate;
use crate::engine::sizing::{size_liquidity_pair, SizingError};
use crate::portal::{PortalApi, PortalError, Session};
use crate::types::{
    apply_bps, one_unit, Account, AccountReport, Balance, Step, StepStatus, TxKind,
};

/// Step-boundary failure, classified for the log line. Never escapes the
/// account pass.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("connectivity: {0}")]
    Connectivity(String),

    #[error("authorization: {0}")]
    Authorization(String),

    #[error("insufficient balance: {0}")]
    InsufficientBalance(String),

    #[error("on-chain revert: {0}")]
    OnChainRevert(String),

    #[error("unsizable pair: {0}")]
    UnsizablePair(String),
}

impl From<ChainError> for StepError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Reverted(_) | ChainError::ConfirmationTimeout(_) | ChainError::Dropped => {
                StepError::OnChainRevert(err.to_string())
            }
            ChainError::Wallet(msg) => StepError::Authorization(msg),
            ChainError::Rpc(_) | ChainError::Abi(_) => StepError::Connectivity(err.to_string()),
        }
    }
}

impl From<PortalError> for StepError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Rejected { .. } | PortalError::Signing(_) => {
                StepError::Authorization(err.to_string())
            }
            PortalError::Connectivity(_) | PortalError::Decode(_) => {
                StepError::Connectivity(err.to_string())
            }
        }
    }
}

impl From<SizingError> for StepError {
    fn from(err: SizingError) -> Self {
        StepError::UnsizablePair(err.to_string())
    }
}

/// Result of one executed step: outcome, human detail, confirmed hashes.
struct StepRun {
    status: StepStatus,
    detail: String,
    txs: Vec<H256>,
}

impl StepRun {
    fn completed(detail: impl Into<String>, txs: Vec<H256>) -> Self {
        Self {
            status: StepStatus::Completed,
            detail: detail.into(),
            txs,
        }
    }

    fn skipped(detail: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Skipped,
            detail: detail.into(),
            txs: Vec::new(),
        }
    }

    fn failed(detail: impl Into<String>, txs: Vec<H256>) -> Self {
        Self {
            status: StepStatus::Failed,
            detail: detail.into(),
            txs,
        }
    }
}

pub struct AccountOrchestrator<'a> {
    chain: &'a dyn ChainClient,
    portal: &'a dyn PortalApi,
    config: &'a CampaignConfig,
}

impl<'a> AccountOrchestrator<'a> {
    pub fn new(
        chain: &'a dyn ChainClient,
        portal: &'a dyn PortalApi,
        config: &'a CampaignConfig,
    ) -> Self {
        Self {
            chain,
            portal,
            config,
        }
    }

    /// Run the full pipeline for one account. Never fails; every error is
    /// absorbed into the report.
    pub async fn run(&self, account: &Account, session: &Session) -> AccountReport {
        let mut report = AccountReport::new(account.address);
        let mut gate = ApprovalGate::new();

        for &step in Step::ALL {
            if let Some(halted) = report.halted_at {
                report.record(step, StepStatus::Skipped, format!("halted at {halted}"));
                continue;
            }
            // Pair provisioning only makes sense over freshly swapped
            // assets.
            if step == Step::PairedLiquidity
                && report.status_of(Step::PrimaryDisposal) != Some(StepStatus::Completed)
            {
                report.record(step, StepStatus::Skipped, "primary disposal did not complete");
                continue;
            }

            let result = self.execute(step, account, session, &mut gate).await;
            match result {
                Ok(run) => {
                    info!(
                        account = %account.short(),
                        step = %step,
                        status = %run.status,
                        detail = %run.detail,
                        "Step finished"
                    );
                    report.tx_hashes.extend(&run.txs);
                    if run.status != StepStatus::Completed && step.halts_account_on_failure() {
                        report.halted_at = Some(step);
                    }
                    report.record(step, run.status, run.detail);
                }
                Err(err) => {
                    warn!(
                        account = %account.short(),
                        step = %step,
                        error = %err,
                        "Step failed"
                    );
                    if step.halts_account_on_failure() {
                        report.halted_at = Some(step);
                    }
                    report.record(step, StepStatus::Failed, err.to_string());
                }
            }
        }

        // The pool contracts double as their own LP tokens; report what
        // the pass accumulated.
        for pool in [
            self.config.contracts.pool_synthetic_pair,
            self.config.contracts.pool_stable_synthetic,
        ] {
            match self.chain.token_balance(pool, account.address).await {
                Ok(balance) => info!(
                    account = %account.short(),
                    pool = %format!("{pool:#x}"),
                    balance = %balance,
                    "LP token balance"
                ),
                Err(err) => warn!(
                    account = %account.short(),
                    pool = %format!("{pool:#x}"),
                    error = %err,
                    "LP balance read failed"
                ),
            }
        }

        report
    }

    async fn execute(
        &self,
        step: Step,
        account: &Account,
        session: &Session,
        gate: &mut ApprovalGate,
    ) -> Result<StepRun, StepError> {
        match step {
            Step::GasCheck => self.gas_check(account).await,
            Step::RewardClaim => self.reward_claim(account, session).await,
            Step::PrimaryDisposal => self.primary_disposal(account, gate).await,
            Step::PairedLiquidity => self.paired_liquidity(account, gate).await,
            Step::StableGate => self.stable_gate(account).await,
            Step::BtcStake => self.btc_stake(account, gate).await,
            Step::StableToSynthetic => self.stable_to_synthetic(account, gate).await,
            Step::SyntheticStake => self.synthetic_stake(account, gate).await,
            Step::SyntheticPairLiquidity => self.synthetic_pair_liquidity(account, gate).await,
            Step::FinalLiquidity => self.final_liquidity(account, gate).await,
        }
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    async fn balance_of(&self, token: &TokenInfo, owner: Address) -> Result<Balance, StepError> {
        let raw = self.chain.token_balance(token.address, owner).await?;
        Ok(Balance::new(raw, token.decimals))
    }

    fn deadline(&self) -> U256 {
        U256::from(Utc::now().timestamp() as u64 + self.config.swap_deadline_secs)
    }

    // -----------------------------------------------------------------------
    // Step 1: native balance must cover the worst-case transaction
    // -----------------------------------------------------------------------

    async fn gas_check(&self, account: &Account) -> Result<StepRun, StepError> {
        let balance = self.chain.native_balance(account.address).await?;
        let required = self.config.gas.required_native();
        if balance >= required {
            Ok(StepRun::completed(
                format!(
                    "{} {} available",
                    format_ether(balance),
                    self.config.native_symbol
                ),
                Vec::new(),
            ))
        } else {
            Ok(StepRun::skipped(format!(
                "{} {} below required {}",
                format_ether(balance),
                self.config.native_symbol,
                format_ether(required),
            )))
        }
    }

    // -----------------------------------------------------------------------
    // Step 2: submit the portal-built claim transaction when eligible
    // -----------------------------------------------------------------------

    async fn reward_claim(
        &self,
        account: &Account,
        session: &Session,
    ) -> Result<StepRun, StepError> {
        let status = self.portal.claim_status(session).await?;
        if !status.eligible {
            return Ok(StepRun::skipped("no unclaimed reward"));
        }
        let Some(claim) = status.tx else {
            return Ok(StepRun::skipped("eligible but portal sent no claim transaction"));
        };

        let confirmation = self
            .chain
            .send_opaque(account, claim.to, claim.data, self.config.gas.fees(TxKind::Claim))
            .await?;
        Ok(StepRun::completed(
            format!("claimed {} reward tokens", status.reward),
            vec![confirmation.hash],
        ))
    }

    // -----------------------------------------------------------------------
    // Step 3: route 25% of the primary balance through two swap legs
    // -----------------------------------------------------------------------

    async fn primary_disposal(
        &self,
        account: &Account,
        gate: &mut ApprovalGate,
    ) -> Result<StepRun, StepError> {
        let primary = &self.config.primary;
        let balance = self.balance_of(primary, account.address).await?;
        if balance.is_zero() {
            return Ok(StepRun::skipped(format!("{} balance is zero", primary.symbol)));
        }

        let amount = apply_bps(balance.raw, self.config.disposal_bps);
        let router = self.config.contracts.router;
        let legs = [&self.config.stable, &self.config.synthetic];
        let mut txs = Vec::new();
        let mut failures = Vec::new();

        for target in legs {
            match self.swap_leg(account, gate, router, amount, target).await {
                Ok(mut leg_txs) => txs.append(&mut leg_txs),
                Err(err) => {
                    warn!(
                        account = %account.short(),
                        target = %target.symbol,
                        error = %err,
                        "Disposal leg failed"
                    );
                    failures.push(format!("{}: {err}", target.symbol));
                }
            }
        }

        let detail = format!(
            "swapped {amount} raw {} per leg, {} of 2 legs confirmed",
            primary.symbol,
            2 - failures.len()
        );
        if txs.is_empty() {
            Ok(StepRun::failed(failures.join("; "), txs))
        } else {
            Ok(StepRun::completed(detail, txs))
        }
    }

    async fn swap_leg(
        &self,
        account: &Account,
        gate: &mut ApprovalGate,
        router: Address,
        amount: U256,
        target: &TokenInfo,
    ) -> Result<Vec<H256>, StepError> {
        let primary = self.config.primary.address;
        let mut txs = Vec::new();

        if let Some(hash) = gate
            .ensure(
                self.chain,
                account,
                primary,
                router,
                amount,
                self.config.gas.fees(TxKind::Approve),
            )
            .await?
        {
            txs.push(hash);
        }

        let confirmation = self
            .chain
            .send_swap(
                account,
                router,
                amount,
                U256::zero(),
                vec![primary, target.address],
                self.deadline(),
                self.config.gas.fees(TxKind::Swap),
            )
            .await?;
        gate.debit(primary, router, amount);
        txs.push(confirmation.hash);
        Ok(txs)
    }

    // -----------------------------------------------------------------------
    // Step 4: two-sided liquidity into both primary pairs
    // -----------------------------------------------------------------------

    async fn paired_liquidity(
        &self,
        account: &Account,
        gate: &mut ApprovalGate,
    ) -> Result<StepRun, StepError> {
        let primary = &self.config.primary;
        let stable = &self.config.stable;
        let synthetic = &self.config.synthetic;

        let primary_balance = self.balance_of(primary, account.address).await?;
        let stable_balance = self.balance_of(stable, account.address).await?;
        let synthetic_balance = self.balance_of(synthetic, account.address).await?;

        // The first pair commits a quarter of the primary balance; entry
        // needs enough left for the second pair plus one unit of each
        // counter-asset.
        if primary_balance.raw < one_unit(primary.decimals) * 2
            || stable_balance.raw < one_unit(stable.decimals)
            || synthetic_balance.raw < one_unit(synthetic.decimals)
        {
            return Ok(StepRun::skipped(format!(
                "balances below pair minimums ({}={}, {}={}, {}={})",
                primary.symbol,
                primary_balance,
                stable.symbol,
                stable_balance,
                synthetic.symbol,
                synthetic_balance,
            )));
        }

        let mut txs = Vec::new();
        let mut failures = Vec::new();

        let first = self
            .provision_pair(
                account,
                gate,
                self.config.contracts.pair_primary_stable,
                primary,
                stable,
                primary_balance.raw / 4,
                stable_balance.raw,
            )
            .await;
        match first {
            Ok(mut pair_txs) => txs.append(&mut pair_txs),
            Err(err) => {
                warn!(account = %account.short(), pair = "primary/stable", error = %err, "Pair failed");
                failures.push(format!("primary/stable: {err}"));
            }
        }

        // Re-read before the second pair; the first one moved both assets.
        let primary_after = self.balance_of(primary, account.address).await?;
        let synthetic_after = self.balance_of(synthetic, account.address).await?;
        if primary_after.raw < one_unit(primary.decimals)
            || synthetic_after.raw < one_unit(synthetic.decimals)
        {
            failures.push("primary/synthetic: balances below minimums after first pair".to_string());
        } else {
            let second = self
                .provision_pair(
                    account,
                    gate,
                    self.config.contracts.pair_primary_synthetic,
                    primary,
                    synthetic,
                    primary_after.raw,
                    synthetic_after.raw,
                )
                .await;
            match second {
                Ok(mut pair_txs) => txs.append(&mut pair_txs),
                Err(err) => {
                    warn!(account = %account.short(), pair = "primary/synthetic", error = %err, "Pair failed");
                    failures.push(format!("primary/synthetic: {err}"));
                }
            }
        }

        if txs.is_empty() {
            Ok(StepRun::failed(failures.join("; "), txs))
        } else {
            Ok(StepRun::completed(
                format!("{} transactions across both pairs", txs.len()),
                txs,
            ))
        }
    }

    /// Size, approve both legs, and submit one router add-liquidity call.
    #[allow(clippy::too_many_arguments)]
    async fn provision_pair(
        &self,
        account: &Account,
        gate: &mut ApprovalGate,
        pool: Address,
        token_x: &TokenInfo,
        token_y: &TokenInfo,
        desired_x: U256,
        available_y: U256,
    ) -> Result<Vec<H256>, StepError> {
        let snapshot = self.chain.pool_reserves(pool).await?;
        let (reserve_x, reserve_y) = snapshot.oriented(token_x.address);
        let sized = size_liquidity_pair(
            reserve_x,
            reserve_y,
            desired_x,
            available_y,
            self.config.slippage_bps,
        )?;
        if sized.first_liquidity {
            info!(pool = %format!("{pool:#x}"), "Pool has no reserves, seeding with held balances");
        }

        let router = self.config.contracts.router;
        let approve_fees = self.config.gas.fees(TxKind::Approve);
        let mut txs = Vec::new();
        if let Some(hash) = gate
            .ensure(self.chain, account, token_x.address, router, sized.amount_x, approve_fees)
            .await?
        {
            txs.push(hash);
        }
        if let Some(hash) = gate
            .ensure(self.chain, account, token_y.address, router, sized.amount_y, approve_fees)
            .await?
        {
            txs.push(hash);
        }

        // The router call takes arguments in the pair's own token order.
        let x_is_token0 = snapshot.token0 == token_x.address;
        let (tokens, amounts, minimums) = if x_is_token0 {
            (
                (token_x.address, token_y.address),
                (sized.amount_x, sized.amount_y),
                (sized.min_x, sized.min_y),
            )
        } else {
            (
                (token_y.address, token_x.address),
                (sized.amount_y, sized.amount_x),
                (sized.min_y, sized.min_x),
            )
        };

        let confirmation = self
            .chain
            .send_add_liquidity(
                account,
                router,
                tokens.0,
                tokens.1,
                amounts,
                minimums,
                self.deadline(),
                self.config.gas.fees(TxKind::AddLiquidity),
            )
            .await?;
        gate.debit(token_x.address, router, sized.amount_x);
        gate.debit(token_y.address, router, sized.amount_y);
        txs.push(confirmation.hash);
        Ok(txs)
    }

    // -----------------------------------------------------------------------
    // Step 5: stablecoin floor for everything downstream
    // -----------------------------------------------------------------------

    async fn stable_gate(&self, account: &Account) -> Result<StepRun, StepError> {
        let stable = &self.config.stable;
        let balance = self.balance_of(stable, account.address).await?;
        let required = one_unit(stable.decimals) * self.config.min_stable_units;
        if balance.raw >= required {
            Ok(StepRun::completed(
                format!("{} {} on hand", balance, stable.symbol),
                Vec::new(),
            ))
        } else {
            Ok(StepRun::skipped(format!(
                "{} {} below the {}-unit floor",
                balance, stable.symbol, self.config.min_stable_units,
            )))
        }
    }

    // -----------------------------------------------------------------------
    // Step 6: stake the full BTC-proxy balance
    // -----------------------------------------------------------------------

    async fn btc_stake(
        &self,
        account: &Account,
        gate: &mut ApprovalGate,
    ) -> Result<StepRun, StepError> {
        let btc = &self.config.btc;
        let balance = self.balance_of(btc, account.address).await?;
        if balance.is_zero() {
            return Ok(StepRun::skipped(format!("{} balance is zero", btc.symbol)));
        }

        let contract = self.config.contracts.staking_btc;
        let mut txs = Vec::new();
        if let Some(hash) = gate
            .ensure(
                self.chain,
                account,
                btc.address,
                contract,
                balance.raw,
                self.config.gas.fees(TxKind::Approve),
            )
            .await?
        {
            txs.push(hash);
        }

        let confirmation = self
            .chain
            .send_stake(
                account,
                contract,
                btc.address,
                balance.raw,
                self.config.gas.fees(TxKind::Stake),
            )
            .await?;
        gate.debit(btc.address, contract, balance.raw);
        txs.push(confirmation.hash);
        Ok(StepRun::completed(
            format!("staked {} {}", balance, btc.symbol),
            txs,
        ))
    }

    // -----------------------------------------------------------------------
    // Step 7: mint synthetic from 70% of the stablecoin balance
    // -----------------------------------------------------------------------

    async fn stable_to_synthetic(
        &self,
        account: &Account,
        gate: &mut ApprovalGate,
    ) -> Result<StepRun, StepError> {
        let stable = &self.config.stable;
        let synthetic = &self.config.synthetic;
        let balance = self.balance_of(stable, account.address).await?;
        if balance.is_zero() {
            return Ok(StepRun::skipped(format!("{} balance is zero", stable.symbol)));
        }

        let amount = apply_bps(balance.raw, self.config.stable_swap_bps);
        // The mint contract pulls the stablecoin itself, so it is the
        // spender even though the call goes through the opaque path.
        let mut txs = Vec::new();
        if let Some(hash) = gate
            .ensure(
                self.chain,
                account,
                stable.address,
                synthetic.address,
                amount,
                self.config.gas.fees(TxKind::Approve),
            )
            .await?
        {
            txs.push(hash);
        }

        let confirmation = self
            .chain
            .send_opaque(
                account,
                synthetic.address,
                calldata::opaque_mint(account.address, amount),
                self.config.gas.fees(TxKind::Opaque),
            )
            .await?;
        gate.debit(stable.address, synthetic.address, amount);
        txs.push(confirmation.hash);
        Ok(StepRun::completed(
            format!("minted {} from {amount} raw {}", synthetic.symbol, stable.symbol),
            txs,
        ))
    }

    // -----------------------------------------------------------------------
    // Step 8: stake 30% of the synthetic balance
    // -----------------------------------------------------------------------

    async fn synthetic_stake(
        &self,
        account: &Account,
        gate: &mut ApprovalGate,
    ) -> Result<StepRun, StepError> {
        let synthetic = &self.config.synthetic;
        let balance = self.balance_of(synthetic, account.address).await?;
        if balance.raw < one_unit(synthetic.decimals) {
            return Ok(StepRun::skipped(format!(
                "{} {} below one unit",
                balance, synthetic.symbol
            )));
        }

        let amount = apply_bps(balance.raw, self.config.synthetic_stake_bps);
        let contract = self.config.contracts.staking_synthetic;
        let mut txs = Vec::new();
        if let Some(hash) = gate
            .ensure(
                self.chain,
                account,
                synthetic.address,
                contract,
                amount,
                self.config.gas.fees(TxKind::Approve),
            )
            .await?
        {
            txs.push(hash);
        }

        let confirmation = self
            .chain
            .send_opaque(
                account,
                contract,
                calldata::opaque_stake(amount),
                self.config.gas.fees(TxKind::Opaque),
            )
            .await?;
        gate.debit(synthetic.address, contract, amount);
        txs.push(confirmation.hash);
        Ok(StepRun::completed(
            format!("staked {amount} raw {}", synthetic.symbol),
            txs,
        ))
    }

    // -----------------------------------------------------------------------
    // Step 9: symmetric deposit into the staked/synthetic pool
    // -----------------------------------------------------------------------

    async fn synthetic_pair_liquidity(
        &self,
        account: &Account,
        gate: &mut ApprovalGate,
    ) -> Result<StepRun, StepError> {
        let synthetic = &self.config.synthetic;
        let staked = &self.config.synthetic_staked;
        let synthetic_balance = self.balance_of(synthetic, account.address).await?;
        let staked_balance = self.balance_of(staked, account.address).await?;

        if staked_balance.raw < one_unit(staked.decimals)
            || synthetic_balance.raw < one_unit(synthetic.decimals)
        {
            return Ok(StepRun::skipped(format!(
                "{}={} or {}={} below one unit",
                staked.symbol, staked_balance, synthetic.symbol, synthetic_balance,
            )));
        }

        // Equal amounts on both sides, bounded by the smaller balance.
        let amount = staked_balance.raw.min(synthetic_balance.raw);
        let pool = self.config.contracts.pool_synthetic_pair;
        let approve_fees = self.config.gas.fees(TxKind::Approve);
        let mut txs = Vec::new();
        for token in [staked, synthetic] {
            if let Some(hash) = gate
                .ensure(self.chain, account, token.address, pool, amount, approve_fees)
                .await?
            {
                txs.push(hash);
            }
        }

        // Deposits are symmetric, so coin ordering cannot change the call.
        let confirmation = self
            .chain
            .send_pool_deposit(
                account,
                pool,
                vec![amount, amount],
                U256::zero(),
                self.config.gas.fees(TxKind::PoolDeposit),
            )
            .await?;
        gate.debit(staked.address, pool, amount);
        gate.debit(synthetic.address, pool, amount);
        txs.push(confirmation.hash);
        Ok(StepRun::completed(
            format!("deposited {amount} raw on each side"),
            txs,
        ))
    }

    // -----------------------------------------------------------------------
    // Step 10: reserve-proportional deposit into the stable/synthetic pool
    // -----------------------------------------------------------------------

    async fn final_liquidity(
        &self,
        account: &Account,
        gate: &mut ApprovalGate,
    ) -> Result<StepRun, StepError> {
        let stable = &self.config.stable;
        let synthetic = &self.config.synthetic;
        let stable_balance = self.balance_of(stable, account.address).await?;
        let synthetic_balance = self.balance_of(synthetic, account.address).await?;

        if stable_balance.raw < one_unit(stable.decimals)
            || synthetic_balance.raw < one_unit(synthetic.decimals)
        {
            return Ok(StepRun::skipped(format!(
                "{}={} or {}={} below one unit",
                stable.symbol, stable_balance, synthetic.symbol, synthetic_balance,
            )));
        }

        let pool = self.config.contracts.pool_stable_synthetic;
        // The pool exposes no reserve getter; its holdings are its
        // reserves.
        let reserve_stable = self.chain.token_balance(stable.address, pool).await?;
        let reserve_synthetic = self.chain.token_balance(synthetic.address, pool).await?;
        let sized = size_liquidity_pair(
            reserve_stable,
            reserve_synthetic,
            stable_balance.raw,
            synthetic_balance.raw,
            self.config.slippage_bps,
        )?;

        let approve_fees = self.config.gas.fees(TxKind::Approve);
        let mut txs = Vec::new();
        if let Some(hash) = gate
            .ensure(self.chain, account, stable.address, pool, sized.amount_x, approve_fees)
            .await?
        {
            txs.push(hash);
        }
        if let Some(hash) = gate
            .ensure(self.chain, account, synthetic.address, pool, sized.amount_y, approve_fees)
            .await?
        {
            txs.push(hash);
        }

        // Amounts must land at the index the pool assigns each coin.
        let coin0 = self.chain.pool_coin_at(pool, 0).await?;
        let amounts = if coin0 == stable.address {
            vec![sized.amount_x, sized.amount_y]
        } else {
            vec![sized.amount_y, sized.amount_x]
        };

        let confirmation = self
            .chain
            .send_pool_deposit(
                account,
                pool,
                amounts,
                U256::zero(),
                self.config.gas.fees(TxKind::PoolDeposit),
            )
            .await?;
        gate.debit(stable.address, pool, sized.amount_x);
        gate.debit(synthetic.address, pool, sized.amount_y);
        txs.push(confirmation.hash);
        Ok(StepRun::completed(
            format!(
                "deposited {} raw {} and {} raw {}",
                sized.amount_x, stable.symbol, sized.amount_y, synthetic.symbol
            ),
            txs,
        ))
    }
}
