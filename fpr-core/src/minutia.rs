use derive_more::{From, Into};
use nalgebra::{distance, distance_squared, Point2};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Allows the retrieval of the position a ridge feature was detected at.
///
/// Geometry in downstream crates is generic over this trait so that it can run directly
/// on minutia lists or on bare coordinates.
pub trait RidgePoint {
    /// Retrieves the position on the ridge image.
    fn ridge_point(&self) -> Point2<f64>;
}

/// A fingerprint minutia: a ridge ending or bifurcation with a position and a direction.
///
/// The position is in pixel coordinates in a coordinate system defined s.t. +x faces
/// right and +y faces toward the bottom of the image. The direction is the local ridge
/// flow angle in radians. Geometry only ever consumes the position; the direction
/// participates in triplet descriptors and matching.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Minutia {
    /// Position on the ridge image.
    pub position: Point2<f64>,
    /// Ridge flow direction in radians.
    pub direction: f64,
}

impl Minutia {
    /// Creates a minutia from pixel coordinates and a ridge direction in radians.
    pub fn new(x: f64, y: f64, direction: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            direction,
        }
    }

    /// Squared Euclidean distance to another minutia.
    pub fn distance_squared(&self, other: &Self) -> f64 {
        distance_squared(&self.position, &other.position)
    }

    /// Euclidean distance to another minutia.
    pub fn distance(&self, other: &Self) -> f64 {
        distance(&self.position, &other.position)
    }
}

impl RidgePoint for Minutia {
    fn ridge_point(&self) -> Point2<f64> {
        self.position
    }
}

impl RidgePoint for Point2<f64> {
    fn ridge_point(&self) -> Point2<f64> {
        *self
    }
}
