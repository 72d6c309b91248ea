//! Identity provider: credential verification and session issuance.
//!
//! The authorization core (guards, route gate) treats this module as a
//! collaborator: it only ever consumes the sessions issued here through the
//! session resolver. OAuth providers are configured at deployment time but
//! their handshake is not handled by this service.

pub mod password;
pub mod provider;
pub mod tokens;

pub use provider::{login, logout, register, IssuedSession};
