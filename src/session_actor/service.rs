use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use crate::clients::PurchaseClient;
use crate::domain::Receipt;
use crate::messages::{ServiceResponse, SessionRequest};
use crate::purchase_flow::{FlowSnapshot, Notice, PendingPurchase, PurchaseError, PurchaseFlow};
use super::schedule::{wait_for, PhaseTimings, ScheduledTransition, TimedTransition};

const NOTICE_CAPACITY: usize = 16;

/// Session actor owning the purchase state.
///
/// All mutations happen inside [`run`](PurchaseSession::run): requests arrive
/// over the channel, and the pending timed transition (if any) fires from the
/// same loop. Dropping the actor drops the pending transition with it.
pub struct PurchaseSession {
    receiver: mpsc::Receiver<SessionRequest>,
    flow: PurchaseFlow,
    timings: PhaseTimings,
    scheduled: Option<ScheduledTransition>,
    receipts: Vec<Receipt>,
    snapshots: watch::Sender<FlowSnapshot>,
    notices: broadcast::Sender<Notice>,
}

impl PurchaseSession {
    pub fn new(flow: PurchaseFlow, timings: PhaseTimings, buffer_size: usize) -> (Self, PurchaseClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (snapshots, _) = watch::channel(flow.snapshot());
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        let session = Self {
            receiver,
            flow,
            timings,
            scheduled: None,
            receipts: Vec::new(),
            snapshots,
            notices,
        };
        let client = PurchaseClient::new(sender);
        (session, client)
    }

    /// Receiver that always holds the latest snapshot.
    pub fn watch_snapshots(&self) -> watch::Receiver<FlowSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    #[instrument(name = "purchase_session", skip(self))]
    pub async fn run(mut self) {
        info!(
            inventory = self.flow.inventory(),
            unit_price = self.flow.unit_price(),
            "PurchaseSession starting"
        );

        loop {
            let deadline = self.scheduled.map(|scheduled| scheduled.at);
            // A due transition runs before requests queued in the same tick.
            tokio::select! {
                biased;
                _ = wait_for(deadline) => self.fire_scheduled(),
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else {
                        info!("All clients dropped");
                        break;
                    };
                    if !self.handle_request(msg) {
                        break;
                    }
                }
            }
        }

        if let Some(pending) = self.scheduled.take() {
            warn!(transition = ?pending.kind, "Discarding scheduled transition on teardown");
        }
        info!("PurchaseSession stopped");
    }

    /// Returns `false` once the session should stop.
    fn handle_request(&mut self, msg: SessionRequest) -> bool {
        match msg {
            SessionRequest::IncrementSelection { respond_to } => self.handle_increment(respond_to),
            SessionRequest::DecrementSelection { respond_to } => self.handle_decrement(respond_to),
            SessionRequest::Purchase { respond_to } => self.handle_purchase(respond_to),
            SessionRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.flow.snapshot()));
            }
            SessionRequest::Receipts { respond_to } => {
                debug!(receipt_count = self.receipts.len(), "Listing receipts");
                let _ = respond_to.send(Ok(self.receipts.clone()));
            }
            SessionRequest::Shutdown => {
                info!("PurchaseSession shutting down");
                return false;
            }
        }
        true
    }

    #[instrument(skip(self, respond_to))]
    fn handle_increment(&mut self, respond_to: ServiceResponse<FlowSnapshot, PurchaseError>) {
        debug!("Processing increment_selection request");
        if self.flow.increment_selection() {
            info!(selection = self.flow.selection(), "Selection increased");
            self.publish();
        }
        let _ = respond_to.send(Ok(self.flow.snapshot()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_decrement(&mut self, respond_to: ServiceResponse<FlowSnapshot, PurchaseError>) {
        debug!("Processing decrement_selection request");
        if self.flow.decrement_selection() {
            info!(selection = self.flow.selection(), "Selection decreased");
            self.publish();
        }
        let _ = respond_to.send(Ok(self.flow.snapshot()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_purchase(&mut self, respond_to: ServiceResponse<PendingPurchase, PurchaseError>) {
        debug!(
            selection = self.flow.selection(),
            inventory = self.flow.inventory(),
            "Processing purchase request"
        );

        let result = self.flow.purchase();
        match &result {
            Ok(_) => {
                self.scheduled = Some(ScheduledTransition::after(
                    Instant::now(),
                    self.timings.processing,
                    TimedTransition::SettlePayment,
                ));
                self.publish();
            }
            Err(PurchaseError::InsufficientInventory { requested, available }) => {
                self.notify(Notice::InsufficientInventory {
                    requested: *requested,
                    available: *available,
                });
            }
            Err(_) => {}
        }

        let _ = respond_to.send(result);
    }

    #[instrument(skip(self))]
    fn fire_scheduled(&mut self) {
        let Some(fired) = self.scheduled.take() else {
            return;
        };

        match fired.kind {
            TimedTransition::SettlePayment => match self.flow.settle_payment() {
                Ok(receipt) => {
                    self.receipts.push(receipt.clone());
                    self.notify(Notice::PurchaseConfirmed(receipt));
                    self.scheduled = Some(ScheduledTransition::after(
                        fired.at,
                        self.timings.confirmation,
                        TimedTransition::DismissConfirmation,
                    ));
                }
                Err(e) => error!(error = %e, "Scheduled settlement failed"),
            },
            TimedTransition::DismissConfirmation => {
                if let Err(e) = self.flow.dismiss_confirmation() {
                    error!(error = %e, "Scheduled dismissal failed");
                }
            }
        }

        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.flow.snapshot());
    }

    fn notify(&self, notice: Notice) {
        // No subscribers is fine; notices are transient.
        let _ = self.notices.send(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PurchasePhase;
    use std::time::Duration;

    fn spawn_session(inventory: u32) -> (PurchaseClient, watch::Receiver<FlowSnapshot>, tokio::task::JoinHandle<()>) {
        let flow = PurchaseFlow::new(inventory, 5, 5);
        let (session, client) = PurchaseSession::new(flow, PhaseTimings::default(), 10);
        let snapshots = session.watch_snapshots();
        let handle = tokio::spawn(session.run());
        (client, snapshots, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn test_purchase_advances_through_phases() -> Result<(), Box<dyn std::error::Error>> {
        let (client, _snapshots, handle) = spawn_session(12);

        let pending = client.purchase().await?;
        assert_eq!(pending.quantity, 1);
        assert_eq!(client.snapshot().await?.phase, PurchasePhase::Processing);

        tokio::time::sleep(Duration::from_millis(1050)).await;
        let snapshot = client.snapshot().await?;
        assert_eq!(snapshot.phase, PurchasePhase::Confirmed);
        assert_eq!(snapshot.inventory, 11);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(client.snapshot().await?.phase, PurchasePhase::Idle);

        client.shutdown().await?;
        handle.await?;
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_transitions_land_exactly_on_deadlines() -> Result<(), Box<dyn std::error::Error>> {
        let (client, _snapshots, handle) = spawn_session(12);

        client.purchase().await?;

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(client.snapshot().await?.phase, PurchasePhase::Processing);

        tokio::time::sleep(Duration::from_millis(1)).await;
        let snapshot = client.snapshot().await?;
        assert_eq!(snapshot.phase, PurchasePhase::Confirmed);
        assert_eq!(snapshot.inventory, 11);

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(client.snapshot().await?.phase, PurchasePhase::Confirmed);

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(client.snapshot().await?.phase, PurchasePhase::Idle);

        // A purchase sent on the dismissal tick is accepted.
        let pending = client.purchase().await?;
        assert_eq!(pending.quantity, 1);

        client.shutdown().await?;
        handle.await?;
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshots_are_published_on_change() -> Result<(), Box<dyn std::error::Error>> {
        let (client, mut snapshots, handle) = spawn_session(12);
        assert_eq!(snapshots.borrow_and_update().selection, 1);

        client.increment_selection().await?;
        snapshots.changed().await?;
        assert_eq!(snapshots.borrow_and_update().selection, 2);

        client.purchase().await?;
        let confirmed = snapshots.wait_for(|s| s.phase == PurchasePhase::Confirmed).await?;
        assert_eq!(confirmed.inventory, 10);
        drop(confirmed);

        client.shutdown().await?;
        handle.await?;
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_discards_pending_transition() -> Result<(), Box<dyn std::error::Error>> {
        let (client, snapshots, handle) = spawn_session(12);

        client.purchase().await?;
        client.shutdown().await?;
        handle.await?;

        // The settlement never ran.
        let last = *snapshots.borrow();
        assert_eq!(last.phase, PurchasePhase::Processing);
        assert_eq!(last.inventory, 12);
        Ok(())
    }

    #[tokio::test]
    async fn test_receipts_start_empty() -> Result<(), Box<dyn std::error::Error>> {
        let (client, _snapshots, handle) = spawn_session(12);
        assert!(client.receipts().await?.is_empty());
        client.shutdown().await?;
        handle.await?;
        Ok(())
    }
}
