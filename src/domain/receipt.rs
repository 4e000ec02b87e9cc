/// Record of a settled purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub id: String,
    pub quantity: u32,
    pub total: u32,
    /// Inventory left after this purchase was dispensed.
    pub remaining: u32,
}

impl Receipt {
    pub fn new(id: impl Into<String>, quantity: u32, total: u32, remaining: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
            total,
            remaining,
        }
    }
}
