use std::fmt;

/// Stage of a purchase attempt.
///
/// `Idle` is the only phase that accepts a new purchase. `Processing` and
/// `Confirmed` advance on their own once their delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PurchasePhase {
    #[default]
    Idle,
    Processing,
    Confirmed,
}

impl PurchasePhase {
    pub fn name(&self) -> &'static str {
        match self {
            PurchasePhase::Idle => "Idle",
            PurchasePhase::Processing => "Processing",
            PurchasePhase::Confirmed => "Confirmed",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PurchasePhase::Idle)
    }
}

impl fmt::Display for PurchasePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
