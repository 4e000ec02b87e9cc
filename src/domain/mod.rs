pub mod machine;
pub mod phase;
pub mod receipt;

pub use machine::*;
pub use phase::*;
pub use receipt::*;
