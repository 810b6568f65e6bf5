//! Domain layer: aggregates, value objects, and pure billing logic.

pub mod billing;
pub mod foundation;
