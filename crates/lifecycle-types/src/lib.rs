//! Common types module for the marketplace lifecycle system.
//!
//! This module defines the core data types and structures shared by the
//! lifecycle components. It provides a centralized location for domain
//! types to ensure consistency across storage, configuration, and the
//! lifecycle manager itself.

/// Actor identity and role types for lifecycle commands.
pub mod actor;
/// Dispute sub-lifecycle types.
pub mod dispute;
/// Event types published after applied lifecycle commands.
pub mod events;
/// Order types including items, totals, and status history.
pub mod order;
/// Registry trait for self-registering backend implementations.
pub mod registry;
/// Return sub-lifecycle types including refund fields.
pub mod returns;
/// Storage key types for persistent data collections.
pub mod storage;
/// Configuration validation types for backend configuration tables.
pub mod validation;

// Re-export all types for convenient access
pub use actor::*;
pub use dispute::*;
pub use events::*;
pub use order::*;
pub use registry::*;
pub use returns::*;
pub use storage::*;
pub use validation::*;
