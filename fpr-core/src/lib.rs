//! # Rust FPR Core
//!
//! This library provides common abstractions and types for fingerprint recognition (FPR)
//! in Rust. All the crates in the fpr ecosystem that have or depend on fingerprint types
//! depend on this crate. This includes things like the minutia record, match pairs, and
//! angle arithmetic. The crate is designed to be very small so that it adds negligable
//! build time. The core concept is that all fpr crates can work together with each other
//! by using the abstractions and types specified in this crate.
//!
//! The crate is designed to work with `#![no_std]`, even without an allocator. `libm` is
//! used (indirectly through [`num-traits`]) for all math algorithms that aren't present
//! in `core`. Any code that doesn't need to be shared across all fpr crates should not
//! belong in this repository.
//!
//! ## Minutiae and triplets
//!
//! A minutia is a ridge ending or bifurcation on a fingerprint. It has a position on the
//! ridge image and the direction of the local ridge flow. Absolute positions and
//! directions are useless for comparing two prints of the same finger, because the
//! finger lands on the sensor with an arbitrary rotation and translation each time.
//! What does survive is the geometry of small neighborhoods of minutiae relative to
//! itself: the side lengths of the triangle through three minutiae, and each minutia
//! direction taken relative to a side of that triangle.
//!
//! - `a`, `b`, `c` the three minutiae of one triplet
//! - `-->` the ridge direction at each minutia
//!
//! ```text
//!             c -->
//!            / \
//!           /   \
//!          /     \
//!         /       \
//!    --> a---------b
//!                   \
//!                    v
//! ```
//!
//! Higher level crates triangulate the full minutia list, describe every triangle this
//! way, and compare two fingerprints triplet by triplet. The types in this crate are the
//! vocabulary those crates share.

#![no_std]

pub mod angle;
mod matches;
mod minutia;

pub use matches::*;
pub use minutia::*;
pub use nalgebra;
