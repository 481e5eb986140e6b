//! `ChainIO` is a library for interacting with the `LifeVault` inheritance contract.

use ILifeVault::ILifeVaultInstance;

use alloy::{
    contract::Result as ContractResult,
    primitives::Address,
    providers::{RootProvider, fillers::FillProvider, utils::JoinedRecommendedFillers},
    rpc::types::Filter,
    sol,
};
use derive_more::derive::Deref;

/// Alias to the default provider with all recommended fillers (read-only).
pub type DefaultProvider = FillProvider<JoinedRecommendedFillers, RootProvider>;

/// A wrapper over a `ILifeVault` contract that exposes various utility methods.
#[derive(Debug, Clone, Deref)]
pub struct LifeVault(ILifeVaultInstance<DefaultProvider>);

impl LifeVault {
    /// Create a new `LifeVault` instance at the given contract address.
    pub const fn new_readonly(address: Address, provider: DefaultProvider) -> Self {
        Self(ILifeVaultInstance::new(address, provider))
    }

    /// Returns a log [`Filter`] for `WarningTriggered` events over an inclusive block range.
    pub fn warning_triggered_filter(&self, from_block: u64, to_block: u64) -> Filter {
        self.0.WarningTriggered_filter().filter.from_block(from_block).to_block(to_block)
    }

    /// Returns a log [`Filter`] for `InheritanceDistributed` events over an inclusive block range.
    pub fn inheritance_distributed_filter(&self, from_block: u64, to_block: u64) -> Filter {
        self.0.InheritanceDistributed_filter().filter.from_block(from_block).to_block(to_block)
    }

    /// Returns a log [`Filter`] for `HeirNotification` events over an inclusive block range.
    pub fn heir_notification_filter(&self, from_block: u64, to_block: u64) -> Filter {
        self.0.HeirNotification_filter().filter.from_block(from_block).to_block(to_block)
    }

    /// Read a user's profile record from contract storage.
    pub async fn user(&self, address: Address) -> ContractResult<ILifeVault::usersReturn> {
        self.0.users(address).call().await
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface ILifeVault {
        /// Emitted when a user crosses the warning threshold without checking
        /// in. `email` is the emergency contact to alert.
        #[derive(Default)]
        event WarningTriggered(address indexed userAddress, string name, string email);

        /// Emitted once the distribution threshold is crossed and the user's
        /// inheritance plan has executed on-chain.
        #[derive(Default)]
        event InheritanceDistributed(address indexed userAddress, string userName, string userEmail);

        /// Emitted once per heir when a share of the estate is transferred.
        /// `amount` is a fixed-point integer with 6 decimal places.
        #[derive(Default)]
        event HeirNotification(address indexed fromUser, string fromName, address indexed toHeir, string heirEmail, uint256 amount);

        /// Per-user record. `lastCheckIn` is a UNIX timestamp in seconds.
        function users(address user) external view returns (string memory name, string memory email, uint256 lastCheckIn, uint256 balance, bool exists);

        /// Record a liveness check-in for the caller.
        function checkIn() external;

        /// Set or update the caller's name and emergency contact email.
        function setProfile(string calldata name, string calldata email) external;

        /// Configure heirs, their shares and their notification emails.
        function setHeirs(address[] calldata heirs, uint256[] calldata shares, string[] calldata emails) external;

        /// Deposit USDT (6 decimals) into the caller's vault.
        function depositUSDT(uint256 amount) external;

        /// Withdraw USDT from the caller's vault.
        function withdraw(uint256 amount) external;

        /// Test-only: force the warning path regardless of elapsed time.
        function forceTriggerWarning() external;

        /// Test-only: force the distribution path regardless of elapsed time.
        function forceDistribute() external;
    }
}
