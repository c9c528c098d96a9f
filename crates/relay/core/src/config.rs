//! Configuration of a relay cycle.

use alloy_primitives::U256;
use alloy_signer_local::PrivateKeySigner;
use gastank_providers::{
    ChainClient, DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_GAS_LIMIT, DEFAULT_POLL_INTERVAL,
    TransactionDriver,
};
use std::{fmt, str::FromStr, time::Duration};
use thiserror::Error;

/// How the gas provider funds the source gas tank before a relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepositPolicy {
    /// Deposit whatever is missing to reach the gas tank's `MAX_DEPOSIT`.
    #[default]
    TopUpToCap,
    /// Top up towards the cap, but never deposit more than this amount in wei.
    Budget(U256),
    /// Never deposit.
    Skip,
}

impl DepositPolicy {
    /// Returns the amount to deposit for a gas provider holding `balance` in a tank capped at
    /// `cap`, or `None` if no deposit should be made.
    pub fn deposit_amount(&self, balance: U256, cap: U256) -> Option<U256> {
        let shortfall = cap.checked_sub(balance).filter(|shortfall| !shortfall.is_zero())?;
        match self {
            Self::TopUpToCap => Some(shortfall),
            Self::Budget(max) => Some(shortfall.min(*max)).filter(|amount| !amount.is_zero()),
            Self::Skip => None,
        }
    }
}

impl fmt::Display for DepositPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopUpToCap => f.write_str("top-up"),
            Self::Budget(max) => write!(f, "budget:{max}"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

/// An invalid [`DepositPolicy`] string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid deposit policy `{0}`, expected `top-up`, `budget:<wei>` or `skip`")]
pub struct DepositPolicyParseError(String);

impl FromStr for DepositPolicy {
    type Err = DepositPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-up" => Ok(Self::TopUpToCap),
            "skip" => Ok(Self::Skip),
            _ => s
                .strip_prefix("budget:")
                .filter(|max| !max.is_empty())
                .and_then(|max| U256::from_str(max).ok())
                .map(Self::Budget)
                .ok_or_else(|| DepositPolicyParseError(s.to_string())),
        }
    }
}

/// The accounts taking part in a relay cycle.
#[derive(Debug, Clone)]
pub struct Signers {
    /// Sends the message, authorizes the claim and funds the gas tank.
    pub gas_provider: PrivateKeySigner,
    /// Relays the message and claims the reimbursement.
    pub relayer: PrivateKeySigner,
}

/// Tunables shared by every relay cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    /// How the source gas tank is funded.
    pub deposit_policy: DepositPolicy,
    /// Gas limit of every transaction.
    pub gas_limit: u64,
    /// How long a transaction may stay unmined.
    pub confirmation_timeout: Duration,
    /// Interval between receipt polls.
    pub poll_interval: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            deposit_policy: DepositPolicy::default(),
            gas_limit: DEFAULT_GAS_LIMIT,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RelayConfig {
    /// Builds a [`TransactionDriver`] for `chain_id` honoring these limits.
    pub fn driver<C: ChainClient>(&self, client: C, chain_id: u64) -> TransactionDriver<C> {
        TransactionDriver::new(client, chain_id)
            .with_gas_limit(self.gas_limit)
            .with_confirmation_timeout(self.confirmation_timeout)
            .with_poll_interval(self.poll_interval)
    }
}
