use tokio::sync::mpsc;
use tracing::{debug, instrument};
use crate::domain::Receipt;
use crate::messages::SessionRequest;
use crate::purchase_flow::{FlowSnapshot, PendingPurchase, PurchaseError};

/// Handle to a running [`PurchaseSession`](crate::session_actor::PurchaseSession).
///
/// This is the surface a renderer binds its controls to. Cloning is cheap and
/// every clone talks to the same session.
#[derive(Clone)]
pub struct PurchaseClient {
    sender: mpsc::Sender<SessionRequest>,
}

impl PurchaseClient {
    pub fn new(sender: mpsc::Sender<SessionRequest>) -> Self {
        Self { sender }
    }

    /// Manual method for special cases (no response needed)
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), PurchaseError> {
        debug!("Sending shutdown request");
        self.sender
            .send(SessionRequest::Shutdown)
            .await
            .map_err(|_| PurchaseError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(PurchaseClient => fn increment_selection() -> FlowSnapshot as SessionRequest::IncrementSelection, Error = PurchaseError);
client_method!(PurchaseClient => fn decrement_selection() -> FlowSnapshot as SessionRequest::DecrementSelection, Error = PurchaseError);
client_method!(PurchaseClient => fn purchase() -> PendingPurchase as SessionRequest::Purchase, Error = PurchaseError);
client_method!(PurchaseClient => fn snapshot() -> FlowSnapshot as SessionRequest::Snapshot, Error = PurchaseError);
client_method!(PurchaseClient => fn receipts() -> Vec<Receipt> as SessionRequest::Receipts, Error = PurchaseError);
