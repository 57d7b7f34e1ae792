//! Allowance gating for token-moving calls.
//!
//! Every swap, stake, and liquidity call goes through `ensure` first. The
//! gate approves the exact requested amount and remembers, per (token,
//! spender), how much allowance is still standing; a second request the
//! remainder already covers sends nothing. After the moving call confirms
//! the caller debits the spent amount so the next request re-approves.
//! One gate instance lives for one account pass and never retries.

use ethers::types::{Address, H256, U256};
use std::collections::HashMap;
use tracing::debug;

use crate::chain::{ChainClient, ChainError};
use crate::types::{Account, TxFees};

#[derive(Default)]
pub struct ApprovalGate {
    /// Standing allowance still unspent, per (token, spender).
    granted: HashMap<(Address, Address), U256>,
}

impl ApprovalGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `spender` may move `amount` of `token`. Returns the
    /// approval transaction hash when one was sent, `None` when the
    /// standing allowance already covered the amount.
    pub async fn ensure(
        &mut self,
        chain: &dyn ChainClient,
        account: &Account,
        token: Address,
        spender: Address,
        amount: U256,
        fees: TxFees,
    ) -> Result<Option<H256>, ChainError> {
        let key = (token, spender);
        let standing = self.granted.get(&key).copied().unwrap_or_default();
        if standing >= amount {
            debug!(
                token = %format!("{token:#x}"),
                spender = %format!("{spender:#x}"),
                "Standing allowance covers amount, approval skipped"
            );
            return Ok(None);
        }

        let confirmation = chain
            .send_approval(account, token, spender, amount, fees)
            .await?;
        // approve() overwrites the allowance rather than adding to it
        self.granted.insert(key, amount);
        Ok(Some(confirmation.hash))
    }

    /// Record that a confirmed moving call spent `amount` of allowance.
    pub fn debit(&mut self, token: Address, spender: Address, amount: U256) {
        if let Some(standing) = self.granted.get_mut(&(token, spender)) {
            *standing = standing.saturating_sub(amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{MockChainClient, TxConfirmation};
    use crate::types::TxFees;

    const TEST_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn fees() -> TxFees {
        TxFees {
            gas_limit: 100_000,
            max_fee_per_gas: U256::from(67_500_000_000u64),
            max_priority_fee_per_gas: U256::from(260_000_000u64),
        }
    }

    fn account() -> Account {
        Account::from_key(TEST_KEY).unwrap()
    }

    #[tokio::test]
    async fn test_first_request_approves() {
        let mut chain = MockChainClient::new();
        chain
            .expect_send_approval()
            .times(1)
            .returning(|_, _, _, _, _| Ok(TxConfirmation { hash: H256::zero() }));

        let mut gate = ApprovalGate::new();
        let sent = gate
            .ensure(
                &chain,
                &account(),
                Address::from_low_u64_be(1),
                Address::from_low_u64_be(2),
                U256::from(100u64),
                fees(),
            )
            .await
            .unwrap();
        assert!(sent.is_some());
    }

    #[tokio::test]
    async fn test_covered_request_skips() {
        let mut chain = MockChainClient::new();
        chain
            .expect_send_approval()
            .times(1)
            .returning(|_, _, _, _, _| Ok(TxConfirmation { hash: H256::zero() }));

        let mut gate = ApprovalGate::new();
        let token = Address::from_low_u64_be(1);
        let spender = Address::from_low_u64_be(2);
        let acct = account();

        gate.ensure(&chain, &acct, token, spender, U256::from(100u64), fees())
            .await
            .unwrap();
        // Same amount again without a debit: standing allowance covers it.
        let second = gate
            .ensure(&chain, &acct, token, spender, U256::from(100u64), fees())
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_debit_forces_reapproval() {
        let mut chain = MockChainClient::new();
        chain
            .expect_send_approval()
            .times(2)
            .returning(|_, _, _, _, _| Ok(TxConfirmation { hash: H256::zero() }));

        let mut gate = ApprovalGate::new();
        let token = Address::from_low_u64_be(1);
        let spender = Address::from_low_u64_be(2);
        let acct = account();

        gate.ensure(&chain, &acct, token, spender, U256::from(100u64), fees())
            .await
            .unwrap();
        gate.debit(token, spender, U256::from(100u64));
        let second = gate
            .ensure(&chain, &acct, token, spender, U256::from(100u64), fees())
            .await
            .unwrap();
        assert!(second.is_some());
    }

    #[tokio::test]
    async fn test_distinct_spenders_tracked_separately() {
        let mut chain = MockChainClient::new();
        chain
            .expect_send_approval()
            .times(2)
            .returning(|_, _, _, _, _| Ok(TxConfirmation { hash: H256::zero() }));

        let mut gate = ApprovalGate::new();
        let token = Address::from_low_u64_be(1);
        let acct = account();

        gate.ensure(&chain, &acct, token, Address::from_low_u64_be(2), U256::from(10u64), fees())
            .await
            .unwrap();
        let other = gate
            .ensure(&chain, &acct, token, Address::from_low_u64_be(3), U256::from(10u64), fees())
            .await
            .unwrap();
        assert!(other.is_some());
    }

    #[tokio::test]
    async fn test_failure_is_not_memoized() {
        let mut chain = MockChainClient::new();
        chain
            .expect_send_approval()
            .times(2)
            .returning(|_, _, _, _, _| Err(ChainError::Reverted(H256::zero())));

        let mut gate = ApprovalGate::new();
        let token = Address::from_low_u64_be(1);
        let spender = Address::from_low_u64_be(2);
        let acct = account();

        assert!(gate
            .ensure(&chain, &acct, token, spender, U256::from(10u64), fees())
            .await
            .is_err());
        // A later caller attempts again; the failed approval left no
        // standing allowance behind.
        assert!(gate
            .ensure(&chain, &acct, token, spender, U256::from(10u64), fees())
            .await
            .is_err());
    }
}
