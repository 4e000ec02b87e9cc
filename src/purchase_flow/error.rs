use thiserror::Error;
use crate::domain::PurchasePhase;

/// Errors that can occur while driving a purchase.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("Insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory { requested: u32, available: u32 },
    #[error("A purchase is already in progress (phase: {phase})")]
    PurchaseInProgress { phase: PurchasePhase },
    #[error("Invalid transition: cannot {event} while {phase}")]
    InvalidTransition { phase: PurchasePhase, event: &'static str },
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
