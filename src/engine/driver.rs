//! Sequential account walker.
//!
//! For each wallet/proxy pair: verify the proxy's egress, log in through
//! it, settle the referral binding, fetch points, then hand the account
//! to the orchestrator. Any preamble failure skips the account; nothing
//! short of the initial list load aborts the run. Randomized pauses
//! separate the phases so accounts do not hit the portal in lockstep.

use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::accounts::AccountEntry;
use crate::chain::ChainClient;
use crate::config::{CampaignConfig, RunConfig};
use crate::engine::orchestrator::AccountOrchestrator;
use crate::portal::{PortalApi, PortalError};
use crate::types::RunSummary;

pub struct RunDriver<'a, F>
where
    F: Fn(&str) -> Result<Box<dyn PortalApi>, PortalError>,
{
    chain: &'a dyn ChainClient,
    campaign: &'a CampaignConfig,
    run_config: &'a RunConfig,
    /// Builds a portal client bound to one account's proxy.
    portal_factory: F,
}

impl<'a, F> RunDriver<'a, F>
where
    F: Fn(&str) -> Result<Box<dyn PortalApi>, PortalError>,
{
    pub fn new(
        chain: &'a dyn ChainClient,
        campaign: &'a CampaignConfig,
        run_config: &'a RunConfig,
        portal_factory: F,
    ) -> Self {
        Self {
            chain,
            campaign,
            run_config,
            portal_factory,
        }
    }

    async fn pause(range: [u64; 2]) {
        let span: RangeInclusive<u64> = range[0]..=range[1];
        let millis = rand::thread_rng().gen_range(span);
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    /// Process every account in order. Returns the aggregate summary.
    pub async fn run(&self, entries: &[AccountEntry]) -> RunSummary {
        let mut summary = RunSummary::default();
        let total = entries.len();

        for (index, entry) in entries.iter().enumerate() {
            info!(
                account = %entry.account.short(),
                position = %format!("{}/{}", index + 1, total),
                "Starting account"
            );

            match self.process_account(entry).await {
                Ok(report) => {
                    info!(report = %report, "Account finished");
                    summary.reports.push(report);
                    summary.accounts_processed += 1;
                }
                Err(reason) => {
                    warn!(
                        account = %entry.account.short(),
                        reason = %reason,
                        "Account skipped"
                    );
                    summary.accounts_skipped += 1;
                }
            }

            if index + 1 < total {
                Self::pause(self.run_config.inter_account_delay_ms).await;
            }
        }

        summary
    }

    /// Preamble plus pipeline for one account. An `Err` means the account
    /// was skipped before any on-chain action.
    async fn process_account(
        &self,
        entry: &AccountEntry,
    ) -> Result<crate::types::AccountReport, String> {
        let portal = (self.portal_factory)(&entry.proxy_url)
            .map_err(|e| format!("portal client: {e}"))?;

        let egress_ip = portal
            .verify_egress()
            .await
            .map_err(|e| format!("proxy check: {e}"))?;
        info!(account = %entry.account.short(), egress = %egress_ip, "Proxy verified");

        Self::pause(self.run_config.pre_login_delay_ms).await;

        let session = portal
            .login(&entry.account)
            .await
            .map_err(|e| format!("login: {e}"))?;

        Self::pause(self.run_config.pre_login_delay_ms).await;

        match portal.referral_status(&session).await {
            Ok(Some(true)) => {}
            Ok(Some(false)) => {
                match portal
                    .bind_referral(&session, &self.run_config.referral_code)
                    .await
                {
                    Ok(true) => info!(account = %entry.account.short(), "Referral bound"),
                    Ok(false) => {
                        warn!(account = %entry.account.short(), "Referral bind rejected")
                    }
                    Err(e) => {
                        error!(account = %entry.account.short(), error = %e, "Referral bind failed")
                    }
                }
            }
            Ok(None) => return Err("portal has no referral record for this account".to_string()),
            Err(e) => return Err(format!("referral check: {e}")),
        }

        match portal.points(&session).await {
            Ok(points) => info!(account = %entry.account.short(), points, "Points fetched"),
            Err(e) => warn!(account = %entry.account.short(), error = %e, "Points fetch failed"),
        }

        let orchestrator = AccountOrchestrator::new(self.chain, portal.as_ref(), self.campaign);
        Ok(orchestrator.run(&entry.account, &session).await)
    }
}
