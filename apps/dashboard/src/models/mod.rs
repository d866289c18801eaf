pub mod order;
pub mod snapshot;
pub mod squad;
pub mod user;
