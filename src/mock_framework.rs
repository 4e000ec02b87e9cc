//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_purchase`] or [`expect_snapshot`] to assert behavior.

use tokio::sync::mpsc;
use crate::clients::PurchaseClient;
use crate::messages::{ServiceResponse, SessionRequest};
use crate::purchase_flow::{FlowSnapshot, PendingPurchase, PurchaseError};

/// Creates a mock client and a receiver for asserting requests.
///
/// The test plays the session's part: it reads requests off `receiver` and
/// answers them, so success, failure and timing are fully under its control.
pub fn create_mock_client(buffer_size: usize) -> (PurchaseClient, mpsc::Receiver<SessionRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (PurchaseClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Purchase request
pub async fn expect_purchase(
    receiver: &mut mpsc::Receiver<SessionRequest>,
) -> Option<ServiceResponse<PendingPurchase, PurchaseError>> {
    match receiver.recv().await {
        Some(SessionRequest::Purchase { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a Snapshot request
pub async fn expect_snapshot(
    receiver: &mut mpsc::Receiver<SessionRequest>,
) -> Option<ServiceResponse<FlowSnapshot, PurchaseError>> {
    match receiver.recv().await {
        Some(SessionRequest::Snapshot { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an IncrementSelection request
pub async fn expect_increment(
    receiver: &mut mpsc::Receiver<SessionRequest>,
) -> Option<ServiceResponse<FlowSnapshot, PurchaseError>> {
    match receiver.recv().await {
        Some(SessionRequest::IncrementSelection { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a Shutdown request
pub async fn expect_shutdown(receiver: &mut mpsc::Receiver<SessionRequest>) -> bool {
    matches!(receiver.recv().await, Some(SessionRequest::Shutdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::purchase_flow::PurchaseFlow;

    #[tokio::test]
    async fn test_mock_client_purchase() {
        let (client, mut receiver) = create_mock_client(10);

        let purchase_task = tokio::spawn(async move { client.purchase().await });

        let responder = expect_purchase(&mut receiver).await.expect("Expected Purchase request");
        responder
            .send(Ok(PendingPurchase { quantity: 2, total: 10 }))
            .unwrap();

        let result = purchase_task.await.unwrap();
        assert_eq!(result, Ok(PendingPurchase { quantity: 2, total: 10 }));
    }

    #[tokio::test]
    async fn test_mock_client_forwards_domain_error() {
        let (client, mut receiver) = create_mock_client(10);

        let purchase_task = tokio::spawn(async move { client.purchase().await });

        let responder = expect_purchase(&mut receiver).await.expect("Expected Purchase request");
        responder
            .send(Err(PurchaseError::InsufficientInventory { requested: 3, available: 1 }))
            .unwrap();

        let result = purchase_task.await.unwrap();
        assert_eq!(
            result,
            Err(PurchaseError::InsufficientInventory { requested: 3, available: 1 })
        );
    }

    #[tokio::test]
    async fn test_mock_client_increment_then_snapshot() {
        let (client, mut receiver) = create_mock_client(10);
        let mut flow = PurchaseFlow::default();

        let task = tokio::spawn(async move {
            client.increment_selection().await?;
            client.snapshot().await
        });

        let responder = expect_increment(&mut receiver).await.expect("Expected IncrementSelection request");
        flow.increment_selection();
        responder.send(Ok(flow.snapshot())).unwrap();

        let responder = expect_snapshot(&mut receiver).await.expect("Expected Snapshot request");
        responder.send(Ok(flow.snapshot())).unwrap();

        let snapshot = task.await.unwrap().unwrap();
        assert_eq!(snapshot.selection, 2);
        assert_eq!(snapshot.total_price, 10);
    }

    #[tokio::test]
    async fn test_dropped_responder_maps_to_communication_error() {
        let (client, mut receiver) = create_mock_client(10);

        let task = tokio::spawn(async move { client.snapshot().await });

        let responder = expect_snapshot(&mut receiver).await.expect("Expected Snapshot request");
        drop(responder);

        let result = task.await.unwrap();
        assert_eq!(
            result,
            Err(PurchaseError::ActorCommunicationError("Actor dropped".to_string()))
        );
    }

    #[tokio::test]
    async fn test_closed_session_maps_to_communication_error() {
        let (client, receiver) = create_mock_client(10);
        drop(receiver);

        let result = client.purchase().await;
        assert_eq!(
            result,
            Err(PurchaseError::ActorCommunicationError("Actor closed".to_string()))
        );
    }

    #[tokio::test]
    async fn test_shutdown_sends_shutdown_request() {
        let (client, mut receiver) = create_mock_client(10);
        client.shutdown().await.unwrap();
        assert!(expect_shutdown(&mut receiver).await);
    }
}
