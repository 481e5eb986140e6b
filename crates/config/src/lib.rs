//! Lifeline configuration
use alloy_primitives::Address;
use clap::Parser;
use primitives::FreshnessPolicy;
use url::Url;

/// RPC endpoint configuration options
#[derive(Debug, Clone, Parser)]
pub struct RpcOpts {
    /// HTTP RPC URL of the target chain
    #[clap(long, env = "RPC_URL")]
    pub url: Url,
}

/// `LifeVault` contract configuration options
#[derive(Debug, Clone, Parser)]
pub struct VaultOpts {
    /// Address of the deployed LifeVault contract
    #[clap(long, env = "VAULT_ADDRESS")]
    pub address: Address,
}

/// Mail gateway configuration options
#[derive(Debug, Clone, Parser)]
pub struct MailOpts {
    /// Base URL of the HTTP mail gateway
    #[clap(long, env = "MAIL_API_URL")]
    pub api_url: Url,
    /// Mail gateway API key
    #[clap(long, env = "MAIL_API_KEY")]
    pub api_key: String,
    /// Sender address used for all outgoing notifications
    #[clap(long, env = "MAIL_FROM")]
    pub from: String,
    /// Per-send request timeout in seconds
    #[clap(long, env = "MAIL_SEND_TIMEOUT_SECS", default_value = "30")]
    pub send_timeout_secs: u64,
}

/// Event polling configuration options
#[derive(Debug, Clone, Parser)]
pub struct PollOpts {
    /// Poll interval in seconds
    #[clap(long, env = "POLL_INTERVAL_SECS", default_value = "10")]
    pub interval_secs: u64,
    /// Maximum number of blocks fetched in one poll window, to respect
    /// provider limits on `eth_getLogs` ranges
    #[clap(long, env = "MAX_BLOCKS_PER_POLL", default_value = "2000")]
    pub max_blocks_per_poll: u64,
    /// Per-fetch request timeout in seconds
    #[clap(long, env = "FETCH_TIMEOUT_SECS", default_value = "10")]
    pub fetch_timeout_secs: u64,
}

/// Check-in status watcher configuration options
#[derive(Debug, Clone, Parser)]
pub struct CheckinOpts {
    /// User address whose check-in freshness should be watched. The watcher
    /// is disabled when unset.
    #[clap(long, env = "WATCH_ADDRESS")]
    pub watch_address: Option<Address>,
    /// Freshness policy: "daily" or "window:<secs>"
    #[clap(long, env = "CHECKIN_POLICY", default_value = "daily")]
    pub policy: FreshnessPolicy,
    /// Re-evaluation cadence in seconds
    #[clap(long, env = "CHECKIN_RECHECK_SECS", default_value = "3600")]
    pub recheck_secs: u64,
}

/// CLI options for lifeline
#[derive(Debug, Clone, Parser)]
pub struct Opts {
    /// RPC endpoint configuration
    #[clap(flatten)]
    pub rpc: RpcOpts,

    /// LifeVault contract configuration
    #[clap(flatten)]
    pub vault: VaultOpts,

    /// Mail gateway configuration
    #[clap(flatten)]
    pub mail: MailOpts,

    /// Event polling configuration
    #[clap(flatten)]
    pub poll: PollOpts,

    /// Check-in status watcher configuration
    #[clap(flatten)]
    pub checkin: CheckinOpts,
}
