//! # sos-id
//!
//! Stable ID types, parsing, and validation for the SOS relief platform.
//!
//! ## Design Principles
//!
//! - IDs are stable and system-generated; names and emails are user-controlled
//! - All IDs have a canonical string representation with strict parsing
//! - IDs support roundtrip serialization (parse → format → parse)
//! - IDs are typed to prevent mixing different resource types
//!
//! ## ID Formats
//!
//! Server-generated resources (sessions, accounts, request correlation) use a
//! prefixed ULID format: `{prefix}_{ulid}`
//!
//! Examples:
//! - `sess_01HV4Z2WQXKJNM8GPQY6VBKC3D`
//! - `acct_01HV4Z3MXNKPQR9HSTZ7WCLD4E`
//!
//! Rows keyed by a Postgres `serial` column (users, reports, inventory items)
//! use plain integer IDs wrapped in a newtype so the different resource types
//! cannot be mixed up in code.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
