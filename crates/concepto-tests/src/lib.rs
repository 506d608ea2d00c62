//! Integration test crate for the Concepto sync engine.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the other concepto crates to verify they work
//! together: editing against the timeline model, persistence through
//! the gateway, waveform derivation, and full playback sessions.


#[cfg(test)]
mod timeline;

#[cfg(test)]
mod persistence;


#[cfg(test)]
mod playback;
