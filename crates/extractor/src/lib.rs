//! Lifeline Extractor: fetches `LifeVault` events over bounded block ranges.

use std::time::Duration;

use alloy::{
    primitives::Address,
    providers::{Provider, ProviderBuilder},
    rpc::{client::ClientBuilder, types::Filter},
    sol_types::SolEvent,
};
use alloy_rpc_types_eth::Log;
use chainio::{
    DefaultProvider,
    ILifeVault::{HeirNotification, InheritanceDistributed, WarningTriggered},
    LifeVault,
};
use derive_more::Debug;
use eyre::{Context, Result, eyre};
use tokio::time::timeout;
use tracing::error;
use url::Url;

/// A decoded `LifeVault` event.
///
/// Each variant is a self-contained fact; ordering across kinds within the
/// same block is not guaranteed by the chain and must not be relied upon.
#[derive(Debug, Clone)]
pub enum VaultEvent {
    /// A user crossed the warning threshold without checking in.
    Warning(WarningTriggered),
    /// A user's inheritance plan has executed.
    Distributed(InheritanceDistributed),
    /// An heir received a share of a distributed estate.
    HeirPayout(HeirNotification),
}

impl VaultEvent {
    /// Human-readable event kind, for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Warning(_) => "WarningTriggered",
            Self::Distributed(_) => "InheritanceDistributed",
            Self::HeirPayout(_) => "HeirNotification",
        }
    }
}

/// A [`VaultEvent`] together with its position in the log history.
#[derive(Debug, Clone)]
pub struct FetchedEvent {
    /// Block the event was emitted in.
    pub block_number: u64,
    /// Index of the log within its block.
    pub log_index: u64,
    /// The decoded event.
    pub event: VaultEvent,
}

/// Extractor client
#[derive(Debug, Clone)]
pub struct Extractor {
    #[debug(skip)]
    provider: DefaultProvider,
    vault: LifeVault,
    fetch_timeout: Duration,
}

impl Extractor {
    /// Create a new extractor over an HTTP provider.
    pub fn new(rpc_url: Url, vault_address: Address, fetch_timeout: Duration) -> Self {
        let client = ClientBuilder::default().http(rpc_url);
        let provider = ProviderBuilder::new().connect_client(client);
        let vault = LifeVault::new_readonly(vault_address, provider.clone());
        Self { provider, vault, fetch_timeout }
    }

    /// Current chain head block number.
    pub async fn head_block(&self) -> Result<u64> {
        timeout(self.fetch_timeout, self.provider.get_block_number())
            .await
            .map_err(|_| eyre!("head block query timed out after {:?}", self.fetch_timeout))?
            .wrap_err("failed to query chain head")
    }

    /// Read the `lastCheckIn` timestamp for a user, if the user exists.
    pub async fn last_check_in(&self, user: Address) -> Result<Option<u64>> {
        let record = timeout(self.fetch_timeout, self.vault.user(user))
            .await
            .map_err(|_| eyre!("user record query timed out after {:?}", self.fetch_timeout))?
            .wrap_err("failed to read user record")?;
        if !record.exists {
            return Ok(None);
        }
        Ok(Some(record.lastCheckIn.saturating_to::<u64>()))
    }

    /// Fetch all `LifeVault` events in the inclusive range `[from_block, to_block]`.
    ///
    /// The three event kinds are queried independently and concurrently; all
    /// three queries must succeed before anything is returned, so a provider
    /// fault leaves the whole window unconsumed. Results are merged and
    /// sorted by `(block_number, log_index)` for deterministic routing.
    pub async fn fetch_events(&self, from_block: u64, to_block: u64) -> Result<Vec<FetchedEvent>> {
        let (warnings, distributions, payouts) = tokio::try_join!(
            self.fetch_logs(self.vault.warning_triggered_filter(from_block, to_block)),
            self.fetch_logs(self.vault.inheritance_distributed_filter(from_block, to_block)),
            self.fetch_logs(self.vault.heir_notification_filter(from_block, to_block)),
        )?;

        let mut events = decode_events(&warnings, VaultEvent::Warning);
        events.extend(decode_events(&distributions, VaultEvent::Distributed));
        events.extend(decode_events(&payouts, VaultEvent::HeirPayout));
        events.sort_by_key(|e| (e.block_number, e.log_index));
        Ok(events)
    }

    async fn fetch_logs(&self, filter: Filter) -> Result<Vec<Log>> {
        timeout(self.fetch_timeout, self.provider.get_logs(&filter))
            .await
            .map_err(|_| eyre!("log fetch timed out after {:?}", self.fetch_timeout))?
            .wrap_err("failed to fetch logs")
    }
}

/// Decode every log into the given [`VaultEvent`] variant.
///
/// A log that matches a filter but fails to decode means the event signature
/// here disagrees with the deployed contract ABI. That is a configuration
/// fault, logged as an error; the log is skipped rather than aborting the
/// window.
fn decode_events<E: SolEvent + Clone>(
    logs: &[Log],
    wrap: impl Fn(E) -> VaultEvent,
) -> Vec<FetchedEvent> {
    logs.iter()
        .filter_map(|log| match log.log_decode::<E>() {
            Ok(decoded) => Some(FetchedEvent {
                block_number: log.block_number.unwrap_or(0),
                log_index: log.log_index.unwrap_or(0),
                event: wrap(decoded.data().clone()),
            }),
            Err(err) => {
                error!(
                    error = %err,
                    signature = E::SIGNATURE,
                    "Failed to decode log; event signature mismatch with the deployed contract?"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, Log as PrimitiveLog, U256};

    fn warning_log(block_number: u64, log_index: u64) -> Log {
        let event = WarningTriggered {
            userAddress: Address::ZERO,
            name: "Ann".into(),
            email: "friend@example.com".into(),
        };
        let primitive = PrimitiveLog { address: Address::ZERO, data: event };
        let encoded = WarningTriggered::encode_log(&primitive);
        Log {
            inner: encoded,
            block_number: Some(block_number),
            log_index: Some(log_index),
            ..Default::default()
        }
    }

    #[test]
    fn decode_warning_event() {
        let events = decode_events::<WarningTriggered>(&[warning_log(7, 0)], VaultEvent::Warning);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].block_number, 7);
        match &events[0].event {
            VaultEvent::Warning(w) => {
                assert_eq!(w.name, "Ann");
                assert_eq!(w.email, "friend@example.com");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn mismatched_signature_is_skipped() {
        // A WarningTriggered log does not decode as HeirNotification.
        let events =
            decode_events::<HeirNotification>(&[warning_log(7, 0)], VaultEvent::HeirPayout);
        assert!(events.is_empty());
    }

    #[test]
    fn heir_payout_amount_survives_decode() {
        let event = HeirNotification {
            fromUser: Address::ZERO,
            fromName: "Ann".into(),
            toHeir: Address::repeat_byte(1),
            heirEmail: "heir@example.com".into(),
            amount: U256::from(1_500_000u64),
        };
        let primitive = PrimitiveLog { address: Address::ZERO, data: event };
        let log = Log {
            inner: HeirNotification::encode_log(&primitive),
            block_number: Some(12),
            log_index: Some(3),
            ..Default::default()
        };

        let events = decode_events::<HeirNotification>(&[log], VaultEvent::HeirPayout);
        match &events[0].event {
            VaultEvent::HeirPayout(p) => assert_eq!(p.amount, U256::from(1_500_000u64)),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn merged_events_sort_by_block_then_index() {
        let mut events = decode_events::<WarningTriggered>(
            &[warning_log(9, 2), warning_log(7, 5), warning_log(9, 0)],
            VaultEvent::Warning,
        );
        events.sort_by_key(|e| (e.block_number, e.log_index));
        let order: Vec<_> = events.iter().map(|e| (e.block_number, e.log_index)).collect();
        assert_eq!(order, vec![(7, 5), (9, 0), (9, 2)]);
    }
}
