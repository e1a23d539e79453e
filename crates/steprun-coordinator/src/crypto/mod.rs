//! Cryptographic utilities for sessions and credentials.

mod token;

pub use token::{generate_token, hash_secret};
