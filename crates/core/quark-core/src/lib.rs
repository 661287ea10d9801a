//! Core primitives for the quark firmware time service.
//!
//! This crate holds the pieces every other quark crate leans on but that have
//! nothing to do with time itself: a const-constructible spin lock usable
//! before any allocator or scheduler exists, and the bridge that routes
//! [`log`] records to whatever output sink the board brings up first.
//!
//! Everything here is host-testable with `cargo test`; the lock can also be
//! model-checked with loom (`RUSTFLAGS="--cfg loom"`).

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod log;
pub mod sync;
