pub mod aggregate;
pub mod catalog;
pub mod parser;

pub use aggregate::RosterTotals;
pub use catalog::{Catalog, Slot};
pub use parser::{parse_loadout, SlotDisplay};
