use tracing::{debug, info, warn};
use crate::domain::{PurchasePhase, Receipt};
use super::error::PurchaseError;
use super::snapshot::FlowSnapshot;

/// Units a fresh session starts with.
pub const DEFAULT_INVENTORY: u32 = 12;
/// Most units a single purchase may select.
pub const MAX_SELECTION: u32 = 5;
/// Price of one unit in currency units.
pub const UNIT_PRICE: u32 = 5;

/// Quantity and price locked in when a purchase enters `Processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPurchase {
    pub quantity: u32,
    pub total: u32,
}

/// The purchase state machine.
///
/// Holds inventory, the selected quantity and the current phase. Every method
/// is a synchronous transition; the delays between `Processing`, `Confirmed`
/// and `Idle` are driven from outside by calling [`settle_payment`] and
/// [`dismiss_confirmation`].
///
/// Invariant: `1 <= selection <= max_selection`, and `selection <= inventory`
/// whenever `inventory >= 1`.
///
/// [`settle_payment`]: PurchaseFlow::settle_payment
/// [`dismiss_confirmation`]: PurchaseFlow::dismiss_confirmation
#[derive(Debug, Clone)]
pub struct PurchaseFlow {
    inventory: u32,
    selection: u32,
    phase: PurchasePhase,
    max_selection: u32,
    unit_price: u32,
    in_flight: Option<PendingPurchase>,
    next_receipt_id: u64,
}

impl Default for PurchaseFlow {
    fn default() -> Self {
        Self::new(DEFAULT_INVENTORY, MAX_SELECTION, UNIT_PRICE)
    }
}

impl PurchaseFlow {
    /// `max_selection` is expected to be at least 1; values below are raised to 1.
    pub fn new(inventory: u32, max_selection: u32, unit_price: u32) -> Self {
        Self {
            inventory,
            selection: 1,
            phase: PurchasePhase::Idle,
            max_selection: max_selection.max(1),
            unit_price,
            in_flight: None,
            next_receipt_id: 1,
        }
    }

    pub fn inventory(&self) -> u32 {
        self.inventory
    }

    pub fn selection(&self) -> u32 {
        self.selection
    }

    pub fn phase(&self) -> PurchasePhase {
        self.phase
    }

    pub fn unit_price(&self) -> u32 {
        self.unit_price
    }

    /// Saturates at `u32::MAX`; validated configs never get there.
    pub fn total_price(&self) -> u32 {
        self.selection.saturating_mul(self.unit_price)
    }

    /// Highest selection currently allowed: `min(max_selection, inventory)`.
    ///
    /// Can be 0 when inventory is empty; the selection itself never drops below 1.
    pub fn selection_ceiling(&self) -> u32 {
        self.max_selection.min(self.inventory)
    }

    pub fn can_increment(&self) -> bool {
        self.selection < self.selection_ceiling()
    }

    pub fn can_decrement(&self) -> bool {
        self.selection > 1
    }

    pub fn can_purchase(&self) -> bool {
        self.phase.is_idle()
    }

    /// Raises the selection by one unless it is at the ceiling.
    ///
    /// Returns whether the selection changed.
    pub fn increment_selection(&mut self) -> bool {
        if !self.can_increment() {
            debug!(selection = self.selection, ceiling = self.selection_ceiling(), "Increment ignored at ceiling");
            return false;
        }
        self.selection += 1;
        true
    }

    /// Lowers the selection by one unless it is already 1.
    ///
    /// Returns whether the selection changed.
    pub fn decrement_selection(&mut self) -> bool {
        if !self.can_decrement() {
            debug!(selection = self.selection, "Decrement ignored at floor");
            return false;
        }
        self.selection -= 1;
        true
    }

    /// Starts a purchase of the current selection.
    ///
    /// Only valid in `Idle`. Fails with `InsufficientInventory` when the
    /// selection exceeds inventory; state is untouched on any error.
    pub fn purchase(&mut self) -> Result<PendingPurchase, PurchaseError> {
        if !self.phase.is_idle() {
            warn!(phase = %self.phase, "Purchase rejected: another purchase is in flight");
            return Err(PurchaseError::PurchaseInProgress { phase: self.phase });
        }

        if self.inventory < self.selection {
            warn!(
                requested = self.selection,
                available = self.inventory,
                "Purchase rejected: insufficient inventory"
            );
            return Err(PurchaseError::InsufficientInventory {
                requested: self.selection,
                available: self.inventory,
            });
        }

        let pending = PendingPurchase {
            quantity: self.selection,
            total: self.total_price(),
        };
        self.in_flight = Some(pending);
        self.phase = PurchasePhase::Processing;
        info!(quantity = pending.quantity, total = pending.total, "Purchase processing");
        Ok(pending)
    }

    /// `Processing -> Confirmed`: dispenses the in-flight quantity.
    ///
    /// The selection is re-clamped to the new ceiling afterwards so it never
    /// exceeds what is left.
    pub fn settle_payment(&mut self) -> Result<Receipt, PurchaseError> {
        let pending = match (self.phase, self.in_flight) {
            (PurchasePhase::Processing, Some(pending)) => pending,
            _ => {
                return Err(PurchaseError::InvalidTransition {
                    phase: self.phase,
                    event: "settle payment",
                })
            }
        };

        // The guard in `purchase` keeps this from underflowing.
        self.inventory = self.inventory.saturating_sub(pending.quantity);
        self.in_flight = None;
        self.phase = PurchasePhase::Confirmed;
        self.clamp_selection();

        let receipt = Receipt::new(
            format!("purchase_{}", self.next_receipt_id),
            pending.quantity,
            pending.total,
            self.inventory,
        );
        self.next_receipt_id += 1;

        info!(
            receipt_id = %receipt.id,
            quantity = receipt.quantity,
            remaining = receipt.remaining,
            "Payment settled"
        );
        Ok(receipt)
    }

    /// `Confirmed -> Idle`.
    pub fn dismiss_confirmation(&mut self) -> Result<(), PurchaseError> {
        if self.phase != PurchasePhase::Confirmed {
            return Err(PurchaseError::InvalidTransition {
                phase: self.phase,
                event: "dismiss confirmation",
            });
        }
        self.phase = PurchasePhase::Idle;
        info!("Confirmation dismissed");
        Ok(())
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            inventory: self.inventory,
            selection: self.selection,
            phase: self.phase,
            unit_price: self.unit_price,
            total_price: self.total_price(),
            can_increment: self.can_increment(),
            can_decrement: self.can_decrement(),
            can_purchase: self.can_purchase(),
        }
    }

    fn clamp_selection(&mut self) {
        self.selection = self.selection.min(self.selection_ceiling()).max(1);
    }

    /// Places the flow in a state the clamps would never produce.
    #[cfg(test)]
    pub(crate) fn force_selection(&mut self, selection: u32) {
        self.selection = selection;
    }
}
