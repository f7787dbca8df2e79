//! Boundary with the identity service: token verification and role checks.
//! Tokens are issued elsewhere.

mod claims;
pub mod extractors;
pub mod jwt;

pub use extractors::{AdminUser, AuthUser, CoachUser};
