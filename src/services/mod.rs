//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and complex operations.

pub mod report_service;
pub mod reservation_service;
pub mod session_service;
pub mod storage;
