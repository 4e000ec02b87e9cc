use crate::domain::Receipt;

/// Transient messages for the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A purchase was refused because the selection exceeds what is in stock.
    InsufficientInventory { requested: u32, available: u32 },
    /// A purchase settled and its units left inventory.
    PurchaseConfirmed(Receipt),
}

impl Notice {
    /// Text a renderer can show as-is.
    pub fn message(&self) -> String {
        match self {
            Notice::InsufficientInventory { .. } => "Not enough pads available".to_string(),
            Notice::PurchaseConfirmed(_) => "Thank You! Your purchase was successful".to_string(),
        }
    }
}
