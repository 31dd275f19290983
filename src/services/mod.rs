//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.

pub mod gateway;
pub mod id_validator;
pub mod memory_ledger;
pub mod usage_ledger;
