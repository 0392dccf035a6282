#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A pair of corresponding features between two fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MinutiaMatch<M>(pub M, pub M);

/// A compatible query/template triplet pair produced by similarity search.
///
/// `correspondence[i]` is the template slot aligned with query slot `i`, so the
/// minutia-level pairs implied by this candidate are
/// `(query.minutia_indices()[i], template.minutia_indices()[correspondence[i]])`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TripletMatch {
    /// Index of the matched triplet in the template container's storage order.
    pub template: usize,
    /// Similarity score, strictly positive for any candidate that is returned.
    pub score: f64,
    /// Query slot to template slot alignment.
    pub correspondence: [usize; 3],
}
