use std::time::Duration;
use crate::domain::MachineProfile;
use crate::purchase_flow::{PurchaseFlow, DEFAULT_INVENTORY, MAX_SELECTION, UNIT_PRICE};
use crate::session_actor::PhaseTimings;
use super::error::SystemError;

/// Settings for one purchase session.
///
/// `Default` gives the values the payment screen ships with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    pub initial_inventory: u32,
    pub max_selection: u32,
    pub unit_price: u32,
    pub processing_delay: Duration,
    pub confirmation_delay: Duration,
    /// Capacity of the session's request channel.
    pub buffer_size: usize,
    pub machine: MachineProfile,
}

impl Default for FlowConfig {
    fn default() -> Self {
        let timings = PhaseTimings::default();
        Self {
            initial_inventory: DEFAULT_INVENTORY,
            max_selection: MAX_SELECTION,
            unit_price: UNIT_PRICE,
            processing_delay: timings.processing,
            confirmation_delay: timings.confirmation,
            buffer_size: 32,
            machine: MachineProfile::default(),
        }
    }
}

impl FlowConfig {
    pub fn validate(&self) -> Result<(), SystemError> {
        if self.max_selection == 0 {
            return Err(SystemError::InvalidConfig("max_selection must be at least 1".to_string()));
        }
        if self.unit_price == 0 {
            return Err(SystemError::InvalidConfig("unit_price must be positive".to_string()));
        }
        if self.unit_price.checked_mul(self.max_selection).is_none() {
            return Err(SystemError::InvalidConfig(format!(
                "unit_price {} times max_selection {} overflows",
                self.unit_price, self.max_selection
            )));
        }
        if self.buffer_size == 0 {
            return Err(SystemError::InvalidConfig("buffer_size must be positive".to_string()));
        }
        Ok(())
    }

    pub fn build_flow(&self) -> PurchaseFlow {
        PurchaseFlow::new(self.initial_inventory, self.max_selection, self.unit_price)
    }

    pub fn timings(&self) -> PhaseTimings {
        PhaseTimings {
            processing: self.processing_delay,
            confirmation: self.confirmation_delay,
        }
    }
}
