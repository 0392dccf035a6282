use crate::{MTriplet, SimilarityThresholds};
use fpr_core::{Minutia, TripletMatch};
use fpr_geom::unique::UniqueSet;
use log::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The m-triplet feature of one fingerprint: the deduplicated triplet list plus the
/// exact minutia list the triplets index into.
///
/// Built once during extraction and immutable afterward, so one template may be shared
/// across any number of concurrent searches without synchronization. Serializes as a
/// plain record of its fields for template caching.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MTripletsFeature {
    triplets: Vec<MTriplet>,
    minutiae: Vec<Minutia>,
}

impl MTripletsFeature {
    /// Builds the feature from a triangle list over `minutiae`.
    ///
    /// Structurally identical triangles collapse into one triplet: the first
    /// occurrence wins and first-seen order is preserved. A correct triangulation does
    /// not produce duplicates, but synthetic triangle lists can, and the container
    /// must not. Degenerate (zero-area) triangles are dropped for the same reason.
    /// Both owned lists are sized to their content.
    pub fn from_triangles(minutiae: Vec<Minutia>, triangles: &[[usize; 3]]) -> Self {
        let mut seen = UniqueSet::with_capacity(triangles.len());
        let mut triplets = Vec::with_capacity(triangles.len());
        for &triangle in triangles {
            let triplet = match MTriplet::from_triangle(&minutiae, triangle) {
                Some(triplet) => triplet,
                None => {
                    debug!("Dropping degenerate triangle {:?}.", triangle);
                    continue;
                }
            };
            if seen.insert(triplet.structural_key()) {
                triplets.push(triplet);
            } else {
                debug!("Dropping structurally duplicate triangle {:?}.", triangle);
            }
        }
        triplets.shrink_to_fit();
        let mut minutiae = minutiae;
        minutiae.shrink_to_fit();
        Self { triplets, minutiae }
    }

    /// The deduplicated triplets in first-seen order.
    pub fn triplets(&self) -> &[MTriplet] {
        &self.triplets
    }

    /// The minutia list the triplets index into.
    pub fn minutiae(&self) -> &[Minutia] {
        &self.minutiae
    }

    /// Scans every owned triplet for compatibility with `query`.
    ///
    /// Candidates come back in template-storage order, unsorted by score; ranking and
    /// selection are the caller's concern. `None` means no triplet scored strictly
    /// positive, so callers can short-circuit without inspecting a collection.
    pub fn find_similar(
        &self,
        query: &MTriplet,
        thresholds: &SimilarityThresholds,
    ) -> Option<Vec<TripletMatch>> {
        let candidates: Vec<TripletMatch> = self
            .triplets
            .iter()
            .enumerate()
            .filter_map(|(index, template)| {
                thresholds
                    .compare(query, template)
                    .map(|(score, correspondence)| TripletMatch {
                        template: index,
                        score,
                        correspondence,
                    })
            })
            .collect();
        if candidates.is_empty() {
            None
        } else {
            Some(candidates)
        }
    }
}
