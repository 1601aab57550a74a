//! Wire contracts between the Jockey studio front-end and its backend.
//!
//! Everything here is browser independent so it can be unit tested natively
//! and shared with any server that speaks the same protocol.

pub mod domain;
pub mod usecases;
