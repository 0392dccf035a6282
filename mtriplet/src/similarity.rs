use crate::{MTriplet, MTripletsFeature};
use fpr_core::{angle, MinutiaMatch, TripletMatch};
use log::*;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// The tolerance window of triplet compatibility.
///
/// Two triplets are compatible when some orientation-preserving alignment of their
/// slots keeps every opposite-side difference within `side_tolerance` pixels and every
/// relative-direction difference within `angle_tolerance` radians. The comparison is
/// inherently invariant to global rotation and translation because both descriptors
/// already are; the window only absorbs sensor noise and skin elasticity. The defaults
/// suit pixel-scale minutia coordinates from 500 dpi captures.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SimilarityThresholds {
    /// Largest accepted per-slot difference between opposite side lengths, in pixels.
    pub side_tolerance: f64,
    /// Largest accepted per-slot difference between relative minutia directions, in
    /// radians.
    pub angle_tolerance: f64,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self {
            side_tolerance: 12.0,
            angle_tolerance: core::f64::consts::FRAC_PI_6,
        }
    }
}

impl SimilarityThresholds {
    /// Creates thresholds with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the side-length tolerance in pixels.
    ///
    /// Default is `12.0`.
    #[must_use]
    pub fn side_tolerance(self, side_tolerance: f64) -> Self {
        Self {
            side_tolerance,
            ..self
        }
    }

    /// Set the relative-direction tolerance in radians.
    ///
    /// Default is `π/6`.
    #[must_use]
    pub fn angle_tolerance(self, angle_tolerance: f64) -> Self {
        Self {
            angle_tolerance,
            ..self
        }
    }

    /// Scores `template` against `query`.
    ///
    /// Tries the three orientation-preserving cyclic alignments of the template's
    /// slots and keeps the best. The score of an alignment is `1 - max(normalized
    /// deltas)` over its six comparisons, in `(0, 1]`; a delta at or beyond tolerance
    /// disqualifies the alignment. `None` when every alignment is disqualified —
    /// incompatibility is an absent score, never an error.
    pub fn compare(&self, query: &MTriplet, template: &MTriplet) -> Option<(f64, [usize; 3])> {
        let mut best: Option<(f64, [usize; 3])> = None;
        for rotation in 0..3 {
            let mut worst = 0.0f64;
            let mut compatible = true;
            for slot in 0..3 {
                let other = (slot + rotation) % 3;
                let side_delta = (query.sides()[slot] - template.sides()[other]).abs()
                    / self.side_tolerance;
                let angle_delta = angle::difference(
                    query.relative_directions()[slot],
                    template.relative_directions()[other],
                ) / self.angle_tolerance;
                let delta = side_delta.max(angle_delta);
                if delta >= 1.0 {
                    compatible = false;
                    break;
                }
                worst = worst.max(delta);
            }
            if !compatible {
                continue;
            }
            let score = 1.0 - worst;
            if best.map_or(true, |(previous, _)| score > previous) {
                best = Some((score, [rotation, (1 + rotation) % 3, (2 + rotation) % 3]));
            }
        }
        best
    }
}

/// The minutia index pairs implied by a candidate, in query slot order.
///
/// This is the form the global matcher aggregates: each compatible triplet pair votes
/// for three minutia correspondences between the two fingerprints.
pub fn minutia_pairs(
    query: &MTriplet,
    template: &MTriplet,
    candidate: &TripletMatch,
) -> [MinutiaMatch<usize>; 3] {
    [0usize, 1, 2].map(|slot| {
        MinutiaMatch(
            query.minutia_indices()[slot],
            template.minutia_indices()[candidate.correspondence[slot]],
        )
    })
}

/// Compares every triplet of `query` against every triplet of `template`.
///
/// Returns `(query index, candidate)` pairs, in query order and template-storage order
/// within one query. Feature containers are immutable after construction, so with the
/// `rayon` feature the fan-out over query triplets runs in parallel with nothing more
/// than read sharing.
pub fn match_all(
    query: &MTripletsFeature,
    template: &MTripletsFeature,
    thresholds: &SimilarityThresholds,
) -> Vec<(usize, TripletMatch)> {
    trace!(
        "Matching {} query triplets against {} template triplets.",
        query.triplets().len(),
        template.triplets().len()
    );
    #[cfg(not(feature = "rayon"))]
    let pairs: Vec<(usize, TripletMatch)> = query
        .triplets()
        .iter()
        .enumerate()
        .filter_map(|(index, triplet)| {
            template
                .find_similar(triplet, thresholds)
                .map(|candidates| (index, candidates))
        })
        .flat_map(|(index, candidates)| {
            candidates.into_iter().map(move |candidate| (index, candidate))
        })
        .collect();
    #[cfg(feature = "rayon")]
    let pairs: Vec<(usize, TripletMatch)> = query
        .triplets()
        .par_iter()
        .enumerate()
        .filter_map(|(index, triplet)| {
            template
                .find_similar(triplet, thresholds)
                .map(|candidates| (index, candidates))
        })
        .flat_map_iter(|(index, candidates)| {
            candidates.into_iter().map(move |candidate| (index, candidate))
        })
        .collect();
    debug!("Collected {} compatible triplet pairs.", pairs.len());
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpr_core::Minutia;

    fn triplet(minutiae: &[Minutia]) -> MTriplet {
        MTriplet::from_triangle(minutiae, [0, 1, 2]).unwrap()
    }

    fn base() -> Vec<Minutia> {
        vec![
            Minutia::new(0.0, 0.0, 0.4),
            Minutia::new(30.0, 0.0, 1.3),
            Minutia::new(10.0, 20.0, -2.1),
        ]
    }

    /// Rigidly moves a print: rotate by `theta`, then translate.
    fn transformed(minutiae: &[Minutia], theta: f64, dx: f64, dy: f64) -> Vec<Minutia> {
        minutiae
            .iter()
            .map(|m| {
                let (sin, cos) = theta.sin_cos();
                let x = m.position.x * cos - m.position.y * sin + dx;
                let y = m.position.x * sin + m.position.y * cos + dy;
                Minutia::new(x, y, m.direction + theta)
            })
            .collect()
    }

    #[test]
    fn identical_triplets_score_one() {
        let minutiae = base();
        let q = triplet(&minutiae);
        let (score, correspondence) = SimilarityThresholds::new().compare(&q, &q).unwrap();
        assert!((score - 1.0).abs() < 1e-12);
        assert_eq!(correspondence, [0, 1, 2]);
    }

    #[test]
    fn rigid_motion_preserves_compatibility() {
        let minutiae = base();
        let moved = transformed(&minutiae, 0.7, 250.0, -40.0);
        let q = triplet(&minutiae);
        let t = triplet(&moved);
        let (score, _) = SimilarityThresholds::new().compare(&q, &t).unwrap();
        assert!(score > 0.95, "score {score} too low for a rigid motion");
    }

    #[test]
    fn dissimilar_triplets_are_an_absent_score() {
        let minutiae = base();
        let stretched = vec![
            Minutia::new(0.0, 0.0, 0.4),
            Minutia::new(90.0, 0.0, 1.3),
            Minutia::new(10.0, 60.0, -2.1),
        ];
        let q = triplet(&minutiae);
        let t = triplet(&stretched);
        assert!(SimilarityThresholds::new().compare(&q, &t).is_none());
    }

    #[test]
    fn tightened_tolerance_disqualifies_small_deltas() {
        let minutiae = base();
        let mut nudged = base();
        nudged[0] = Minutia::new(-1.0, 0.0, nudged[0].direction);
        let q = triplet(&minutiae);
        let t = triplet(&nudged);
        // The nudge passes the default window but not a sub-pixel one.
        assert!(SimilarityThresholds::new().compare(&q, &t).is_some());
        let tight = SimilarityThresholds::new().side_tolerance(0.1);
        assert!(tight.compare(&q, &t).is_none());
    }

    #[test]
    fn pairs_follow_the_correspondence() {
        let minutiae = base();
        let q = triplet(&minutiae);
        let (score, correspondence) = SimilarityThresholds::new().compare(&q, &q).unwrap();
        let candidate = TripletMatch {
            template: 0,
            score,
            correspondence,
        };
        let pairs = minutia_pairs(&q, &q, &candidate);
        for MinutiaMatch(a, b) in pairs {
            assert_eq!(a, b);
        }
    }
}
