//! # irrigator-domain
//!
//! Pure domain model for the irrigator system.
//!
//! ## Responsibilities
//! - Foundational types: relay indices, counter identifiers, error conventions
//! - Define the **Faucet** (a named water outlet bound to one relay) and its
//!   open/closed lifecycle
//! - Track solo-on-counter status and the flow samples of an open interval
//! - Compute the median flow of a finished interval
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! Relay hardware and flow counters are expressed as traits in the `app`
//! crate (ports).

pub mod counter;
pub mod error;
pub mod faucet;
pub mod flow;
pub mod relay;
