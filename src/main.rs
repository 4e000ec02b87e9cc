mod domain;
mod messages;
mod clients;

mod app_system;

#[cfg(test)]
mod mock_framework;

mod purchase_flow;
mod session_actor;

use tracing::{error, info, warn, Instrument};
use crate::app_system::{setup_tracing, FlowConfig, VendSystem};
use crate::domain::PurchasePhase;
use crate::purchase_flow::PurchaseError;

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let system = VendSystem::with_config(FlowConfig::default()).map_err(|e| e.to_string())?;
    let machine = system.machine.clone();
    info!(
        name = %machine.name,
        tagline = %machine.tagline,
        location = %machine.location,
        machine_id = %machine.machine_id,
        "Payment screen ready"
    );

    // Console stand-in for the renderer: log every published snapshot.
    let mut snapshots = system.snapshots();
    let price_format = machine.clone();
    tokio::spawn(
        async move {
            while snapshots.changed().await.is_ok() {
                let snapshot = *snapshots.borrow_and_update();
                info!(
                    inventory = snapshot.inventory,
                    selection = snapshot.selection,
                    total = %price_format.format_price(snapshot.total_price),
                    phase = %snapshot.phase,
                    busy = snapshot.is_busy(),
                    thank_you = snapshot.shows_confirmation(),
                    "Screen updated"
                );
            }
        }
        .instrument(tracing::info_span!("renderer")),
    );

    let mut notices = system.notices();
    tokio::spawn(
        async move {
            while let Ok(notice) = notices.recv().await {
                info!(notice = ?notice, "{}", notice.message());
            }
        }
        .instrument(tracing::info_span!("notifications")),
    );

    let client = system.purchase_client.clone();
    let mut idle = system.snapshots();

    // Buy the largest allowed quantity until the machine runs dry.
    let span = tracing::info_span!("customer");
    let outcome = async {
        loop {
            while client.increment_selection().await?.can_increment {}

            match client.purchase().await {
                Ok(pending) => {
                    info!(
                        quantity = pending.quantity,
                        total = %machine.format_price(pending.total),
                        "Scan to pay"
                    );
                    idle.wait_for(|s| s.phase == PurchasePhase::Idle)
                        .await
                        .map_err(|e| PurchaseError::ActorCommunicationError(e.to_string()))?;
                }
                Err(e @ PurchaseError::InsufficientInventory { .. }) => {
                    warn!(error = %e, "Machine is out of stock");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        client.receipts().await
    }
    .instrument(span)
    .await;

    match outcome {
        Ok(receipts) => info!(purchases = receipts.len(), "Customer session finished"),
        Err(e) => error!(error = %e, "Customer session failed"),
    }

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}
