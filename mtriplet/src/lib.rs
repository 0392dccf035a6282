//! Minutia-triplet features for fingerprint matching.
//!
//! A fingerprint is compared to another through small rigid neighborhoods of its
//! minutiae. This crate triangulates a fingerprint's minutia list (Delaunay, via
//! [`fpr_geom`]), describes every triangle by rotation- and translation-invariant
//! geometry (an [`MTriplet`]), deduplicates structurally identical triangles, and owns
//! the result as an immutable [`MTripletsFeature`] per fingerprint. At match time a
//! query triplet is scanned against every triplet of a template container, producing
//! locally compatible candidate pairs for a global matcher to aggregate.
//!
//! The pipeline end to end:
//!
//! ```text
//! minutiae -> Delaunay triangulation -> triangles -> MTriplet descriptors
//!          -> structural dedup -> MTripletsFeature  (one per fingerprint)
//! ```
//!
//! Extraction from an already-detected minutia list is pure and infallible;
//! degenerate lists (fewer than three minutiae, collinear minutiae) produce a feature
//! with an empty triplet list, which matching treats as the absence of evidence.
//! Extraction straight from a raster image additionally needs a [`MinutiaDetector`]
//! collaborator; requesting it without one configured is the only user-visible error
//! in the crate.

mod feature;
mod similarity;
mod triplet;

pub use feature::*;
pub use similarity::*;
pub use triplet::*;

use fpr_core::Minutia;
use fpr_geom::delaunay::DelaunayTriangulator;
use image::{DynamicImage, GenericImageView};
use log::*;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors produced by the extraction pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Raster extraction was requested but no minutia detector is configured.
    #[error("no minutia detector is configured for raster extraction")]
    UnconfiguredDetector,
    /// The configured minutia detector failed.
    #[error("minutia detection failed")]
    Detector(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The raster image could not be opened.
    #[error("failed to open the fingerprint image")]
    Image(#[from] image::ImageError),
}

/// Detects minutiae on a raster fingerprint image.
///
/// This is the boundary to the external image-processing stage: grayscale conversion,
/// ridge-orientation estimation, and minutia detection all happen behind this trait.
/// The triplet pipeline consumes only the resulting minutia list.
pub trait MinutiaDetector: Send + Sync {
    /// Detects the minutiae present in `image`.
    fn detect(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Minutia>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Extraction capability over an already-detected minutia list.
pub trait ExtractFromMinutiae {
    /// The feature type this extractor produces.
    type Feature;

    /// Builds the feature from a minutia list.
    fn extract_minutiae(&self, minutiae: Vec<Minutia>) -> Self::Feature;
}

/// Extraction capability over a raster image, delegating minutia detection to a
/// configured collaborator.
pub trait ExtractFromImage: ExtractFromMinutiae {
    /// Builds the feature from a raster fingerprint image.
    fn extract_image(&self, image: &DynamicImage) -> Result<Self::Feature, Error>;
}

/// Contains the configuration of m-triplet extraction.
///
/// [`TripletExtractor::extract`] is pure and always succeeds. Raster input requires a
/// [`MinutiaDetector`] configured through [`TripletExtractor::with_detector`]; without
/// one, [`TripletExtractor::extract_image`] fails with
/// [`Error::UnconfiguredDetector`] rather than masking the missing stage behind some
/// downstream failure.
///
/// ```
/// use fpr_core::Minutia;
/// use mtriplet::TripletExtractor;
///
/// let minutiae = vec![
///     Minutia::new(0.0, 0.0, 0.3),
///     Minutia::new(10.0, 0.0, 1.1),
///     Minutia::new(10.0, 10.0, 2.0),
///     Minutia::new(0.0, 10.0, -0.5),
/// ];
/// let feature = TripletExtractor::new().extract(minutiae);
/// assert_eq!(feature.triplets().len(), 2);
/// ```
#[derive(Default)]
pub struct TripletExtractor {
    /// Triangulation engine configuration.
    pub triangulator: DelaunayTriangulator,
    detector: Option<Box<dyn MinutiaDetector>>,
}

impl fmt::Debug for TripletExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripletExtractor")
            .field("triangulator", &self.triangulator)
            .field("detector", &self.detector.is_some())
            .finish()
    }
}

impl TripletExtractor {
    /// Creates a `TripletExtractor` with default values and no detector.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Configures the minutia detector used by raster extraction.
    #[must_use]
    pub fn with_detector(self, detector: Box<dyn MinutiaDetector>) -> Self {
        Self {
            detector: Some(detector),
            ..self
        }
    }

    /// Sets the triangulation engine configuration.
    #[must_use]
    pub fn triangulator(self, triangulator: DelaunayTriangulator) -> Self {
        Self {
            triangulator,
            ..self
        }
    }

    /// Extracts the m-triplet feature from an already-detected minutia list.
    ///
    /// The returned container owns `minutiae` exactly as passed, with the
    /// deduplicated triplets indexing into it.
    pub fn extract(&self, minutiae: Vec<Minutia>) -> MTripletsFeature {
        trace!("Triangulating {} minutiae.", minutiae.len());
        let triangles = self.triangulator.triangulate(&minutiae);
        trace!("Triangulation produced {} triangles.", triangles.len());
        let feature = MTripletsFeature::from_triangles(minutiae, &triangles);
        info!("Extracted {} m-triplets", feature.triplets().len());
        feature
    }

    /// Extracts the m-triplet feature from a raster fingerprint image.
    ///
    /// Fails with [`Error::UnconfiguredDetector`] when no detector has been
    /// configured; detector failures pass through as [`Error::Detector`].
    pub fn extract_image(&self, image: &DynamicImage) -> Result<MTripletsFeature, Error> {
        let detector = self.detector.as_ref().ok_or(Error::UnconfiguredDetector)?;
        debug!(
            "Detecting minutiae on a {}x{} image.",
            image.width(),
            image.height()
        );
        let minutiae = detector.detect(image).map_err(Error::Detector)?;
        Ok(self.extract(minutiae))
    }

    /// Extracts the m-triplet feature from a fingerprint image on disk.
    ///
    /// ```no_run
    /// let extractor = mtriplet::TripletExtractor::new();
    /// let feature = extractor.extract_path("print.png").unwrap();
    /// ```
    pub fn extract_path(&self, path: impl AsRef<Path>) -> Result<MTripletsFeature, Error> {
        self.extract_image(&image::open(path)?)
    }
}

impl ExtractFromMinutiae for TripletExtractor {
    type Feature = MTripletsFeature;

    fn extract_minutiae(&self, minutiae: Vec<Minutia>) -> Self::Feature {
        self.extract(minutiae)
    }
}

impl ExtractFromImage for TripletExtractor {
    fn extract_image(&self, image: &DynamicImage) -> Result<Self::Feature, Error> {
        TripletExtractor::extract_image(self, image)
    }
}
