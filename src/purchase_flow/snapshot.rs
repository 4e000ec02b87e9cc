use crate::domain::PurchasePhase;

/// Read-only view of a [`PurchaseFlow`](super::PurchaseFlow) for renderers.
///
/// The `can_*` flags tell a renderer which controls to enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSnapshot {
    pub inventory: u32,
    pub selection: u32,
    pub phase: PurchasePhase,
    pub unit_price: u32,
    pub total_price: u32,
    pub can_increment: bool,
    pub can_decrement: bool,
    pub can_purchase: bool,
}

impl FlowSnapshot {
    /// Whether the busy indicator should be shown.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, PurchasePhase::Processing)
    }

    /// Whether the confirmation overlay should be shown.
    pub fn shows_confirmation(&self) -> bool {
        matches!(self.phase, PurchasePhase::Confirmed)
    }
}
