/// Display data for the vending machine the session runs on.
///
/// None of these fields influence the purchase flow; they exist so a renderer
/// has everything the payment screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineProfile {
    pub name: String,
    pub tagline: String,
    pub location: String,
    pub machine_id: String,
    pub currency_symbol: String,
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self {
            name: "Smart Vend".to_string(),
            tagline: "Hygiene Products Dispenser".to_string(),
            location: "B block 123".to_string(),
            machine_id: "Gg234tyl9".to_string(),
            currency_symbol: "₹".to_string(),
        }
    }
}

impl MachineProfile {
    /// Formats an amount of currency units for display, e.g. `₹15`.
    pub fn format_price(&self, amount: u32) -> String {
        format!("{}{}", self.currency_symbol, amount)
    }
}
