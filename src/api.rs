//! Wire-level provider API implementations.

pub mod gemini;
