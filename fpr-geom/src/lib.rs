//! This crate contains computational geometry algorithms for [Rust FPR](https://github.com/rust-fpr/).
//!
//! ## Triangulation
//!
//! In this problem we know the positions of the minutiae detected on a fingerprint and
//! we want a canonical set of local neighborhoods to describe and compare. The Delaunay
//! triangulation is that set: it tiles the convex hull of the minutiae with triangles,
//! every interior edge is shared by exactly two triangles, and no minutia lies inside
//! the circumcircle of any triangle. The same finger pressed onto a sensor twice yields
//! nearly the same triangulation, which is what makes triangles a usable unit of
//! comparison.
//!
//! - `o` a minutia
//! - the hull below is what the triangle set tiles exactly
//!
//! ```text
//!        o-------o
//!       / \     / \
//!      /   \   /   \
//!     o-----\ /-----o
//!      \     o     /
//!       \   / \   /
//!        \ /   \ /
//!         o-----o
//! ```
//!
//! Degenerate inputs (fewer than three minutiae, or all of them collinear) triangulate
//! to the empty set. That is an answer, not an error: downstream matching treats it as
//! the absence of local geometric evidence.

#![no_std]

extern crate alloc;

pub mod delaunay;
pub mod hull;
pub mod unique;
