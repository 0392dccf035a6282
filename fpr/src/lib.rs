//! # `fpr`
//!
//! Batteries-included pure-Rust fingerprint recognition crate
//!
//! This crate should only be used for documentation/reference and for quickly creating
//! and running a fingerprint recognition sample/routine. It stores the things useful
//! for fingerprint recognition in the Rust ecosystem in one place for discoverability.
//! If you are making a production application, import the dependencies from this crate
//! individually so that you don't have an explosive number of dependencies.
//!
//! All of the basic fingerprint types are included in the root of the crate. Modules
//! are created to store algorithms and data structures which may or may not be used.
//!
//! ## Modules
//! * [`geom`] - computational geometry algorithms used in fingerprint recognition
//! * [`feature`] - feature extraction, description, and similarity search

#![no_std]

pub use fpr_core::*;

/// Computational geometry
pub mod geom {
    #[cfg(feature = "fpr-geom")]
    pub use fpr_geom::*;
}

/// Feature extraction and description
pub mod feature {
    /// Minutia-triplet features and similarity search
    #[cfg(feature = "mtriplet")]
    pub mod mtriplet {
        pub use ::mtriplet::*;
    }
}
