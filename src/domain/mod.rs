pub mod anomaly;
pub mod events;
pub mod lifecycle;
pub mod summary;
