use tokio::sync::{broadcast, watch};
use tracing::{error, info, instrument};
use crate::clients::PurchaseClient;
use crate::domain::MachineProfile;
use crate::purchase_flow::{FlowSnapshot, Notice};
use crate::session_actor::PurchaseSession;
use super::config::FlowConfig;
use super::error::SystemError;

/// The application system that owns the purchase session.
///
/// Responsible for starting the session actor, handing out the client and
/// subscriptions a renderer needs, and shutting the session down.
pub struct VendSystem {
    pub purchase_client: PurchaseClient,
    pub machine: MachineProfile,
    snapshots: watch::Receiver<FlowSnapshot>,
    notices: broadcast::Receiver<Notice>,
    handle: tokio::task::JoinHandle<()>,
}

impl Default for VendSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VendSystem {
    /// Start a session with the default configuration.
    pub fn new() -> Self {
        Self::start(FlowConfig::default())
    }

    /// Validate `config` and start a session with it.
    pub fn with_config(config: FlowConfig) -> Result<Self, SystemError> {
        config.validate()?;
        Ok(Self::start(config))
    }

    #[instrument(name = "vend_system", skip(config), fields(machine_id = %config.machine.machine_id))]
    fn start(config: FlowConfig) -> Self {
        info!("Starting vend system");

        let (session, purchase_client) =
            PurchaseSession::new(config.build_flow(), config.timings(), config.buffer_size);
        let snapshots = session.watch_snapshots();
        let notices = session.subscribe_notices();
        let handle = tokio::spawn(session.run());

        info!("Vend system started successfully");

        Self {
            purchase_client,
            machine: config.machine,
            snapshots,
            notices,
            handle,
        }
    }

    /// Receiver for the renderer; always holds the latest snapshot.
    pub fn snapshots(&self) -> watch::Receiver<FlowSnapshot> {
        self.snapshots.clone()
    }

    /// Receiver for the notification collaborator. Only notices sent after
    /// this call are delivered.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.resubscribe()
    }

    /// Stop the session and wait for its task to finish.
    ///
    /// A purchase still in flight is abandoned along with its timers.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down vend system");

        // The session may already be gone; joining below reports real failures.
        let _ = self.purchase_client.shutdown().await;

        if let Err(e) = self.handle.await {
            error!(error = ?e, "Session shutdown error");
            return Err(SystemError::SessionTaskFailed(e.to_string()));
        }

        info!("Vend system shutdown complete");
        Ok(())
    }
}
