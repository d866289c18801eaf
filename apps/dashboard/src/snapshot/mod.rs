pub mod resolver;

pub use resolver::{latest_per_owner, latest_per_owner_where, Snapshot};
