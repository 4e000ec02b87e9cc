use tokio::sync::oneshot;
use crate::domain::Receipt;
use crate::purchase_flow::{FlowSnapshot, PendingPurchase, PurchaseError};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests accepted by the purchase session actor. Each variant carries a
/// oneshot channel for the response.
#[derive(Debug)]
pub enum SessionRequest {
    IncrementSelection {
        respond_to: ServiceResponse<FlowSnapshot, PurchaseError>,
    },
    DecrementSelection {
        respond_to: ServiceResponse<FlowSnapshot, PurchaseError>,
    },
    Purchase {
        respond_to: ServiceResponse<PendingPurchase, PurchaseError>,
    },
    Snapshot {
        respond_to: ServiceResponse<FlowSnapshot, PurchaseError>,
    },
    Receipts {
        respond_to: ServiceResponse<Vec<Receipt>, PurchaseError>,
    },
    Shutdown,
}
