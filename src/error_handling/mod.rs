//! Error handling for the audit gateway.
//!
//! This module provides:
//! - Error type definitions for settings, initialization, audits, and uploads
//!
//! Error types are split by failure domain:
//! - **Settings/Initialization**: Failures that abort startup
//! - **Audit**: Per-request failures surfaced in the `error` response field
//! - **Drive**: Upload failures, logged but never fatal to an audit

mod types;

// Re-export public API
pub use types::{AuditError, DriveError, InitializationError, SettingsError};
