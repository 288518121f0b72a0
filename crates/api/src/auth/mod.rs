//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing, verification, strength checks
//!   and temporary password generation.
//! - [`session`] -- Signed session tokens carried in an HttpOnly cookie.

pub mod password;
pub mod session;
