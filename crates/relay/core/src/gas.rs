//! Reconciliation of the costs declared by the gas tank against the costs actually paid.
//!
//! The gas tank prices a leg as `gas * baseFee`. Dividing the declared cost by the base fee of
//! the block that included the leg recovers the gas the contract accounted for, which is then
//! compared with the gas the receipt reports.

use crate::StepError;
use alloy_primitives::U256;
use derive_more::Display;
use gastank_interop::TxReceipt;
use std::num::NonZeroU64;

/// One of the two reimbursed transactions of a relay cycle.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    /// The relay on the destination chain.
    #[display("relay")]
    Relay,
    /// The claim on the source chain.
    #[display("claim")]
    Claim,
}

/// Whether a leg was reimbursed above or below its actual cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The declared cost covered the actual cost, leaving this surplus in wei.
    Profit(U256),
    /// The actual cost exceeded the declared cost by this amount in wei.
    Loss(U256),
}

impl Settlement {
    /// Classifies `declared - actual`.
    pub fn new(declared: U256, actual: U256) -> Self {
        if declared >= actual {
            Self::Profit(declared - actual)
        } else {
            Self::Loss(actual - declared)
        }
    }

    /// Returns `true` if the leg was paid below its cost.
    pub const fn is_loss(&self) -> bool {
        matches!(self, Self::Loss(_))
    }
}

/// The accounting of a single leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegReport {
    /// The leg.
    pub leg: Leg,
    /// Gas consumed according to the receipt.
    pub gas_used: u64,
    /// Gas implied by the declared cost, `declared_cost / base_fee`.
    pub implied_gas: U256,
    /// `implied_gas - gas_used`. Positive when the contract over-accounts.
    pub gas_delta: i128,
    /// Base fee of the block that included the leg.
    pub base_fee: u64,
    /// What the sender actually paid, `gas_used * effective_gas_price`.
    pub actual_cost: U256,
    /// What the gas tank declared for the leg.
    pub declared_cost: U256,
    /// `declared_cost - actual_cost`, classified.
    pub settlement: Settlement,
}

impl LegReport {
    /// Reconciles `declared_cost` with the cost of `receipt`, mined at `base_fee`.
    pub fn new(
        leg: Leg,
        declared_cost: U256,
        base_fee: NonZeroU64,
        receipt: &TxReceipt,
    ) -> Result<Self, StepError> {
        Self::compute(leg, declared_cost, base_fee, receipt.gas_used, receipt.effective_gas_price)
    }

    /// Reconciles `declared_cost` with `gas_used` units paid at `effective_gas_price`.
    pub fn compute(
        leg: Leg,
        declared_cost: U256,
        base_fee: NonZeroU64,
        gas_used: u64,
        effective_gas_price: u128,
    ) -> Result<Self, StepError> {
        let implied_gas = declared_cost / U256::from(base_fee.get());
        let implied = i128::try_from(implied_gas).map_err(|_| StepError::GasOverflow(implied_gas))?;
        let gas_delta = implied - i128::from(gas_used);
        let actual_cost = U256::from(gas_used) * U256::from(effective_gas_price);

        Ok(Self {
            leg,
            gas_used,
            implied_gas,
            gas_delta,
            base_fee: base_fee.get(),
            actual_cost,
            declared_cost,
            settlement: Settlement::new(declared_cost, actual_cost),
        })
    }

    /// Logs the report. A loss is logged as a warning.
    pub fn log(&self) {
        info!(
            target: "gas",
            leg = %self.leg,
            gas_used = self.gas_used,
            implied_gas = %self.implied_gas,
            gas_delta = self.gas_delta,
            base_fee = self.base_fee,
            actual_cost = %self.actual_cost,
            declared_cost = %self.declared_cost,
            "Leg reconciled"
        );
        match self.settlement {
            Settlement::Profit(profit) => {
                info!(target: "gas", leg = %self.leg, %profit, "Profit");
            }
            Settlement::Loss(loss) => {
                warn!(target: "gas", leg = %self.leg, %loss, "Incurred a loss");
            }
        }
    }
}

/// Gas deltas of a completed relay cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GasDeltaResult {
    /// The gas delta of the relay leg.
    pub relay: i128,
    /// The gas delta of the claim leg.
    pub claim: i128,
}

impl GasDeltaResult {
    /// Collects the deltas of both legs.
    pub const fn new(relay: &LegReport, claim: &LegReport) -> Self {
        Self { relay: relay.gas_delta, claim: claim.gas_delta }
    }
}
