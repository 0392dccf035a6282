use float_ord::FloatOrd;
use fpr_core::{angle, nalgebra::distance, Minutia};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Value-computed identity of a triplet's geometry.
///
/// The bit patterns of the six descriptor invariants, in canonical slot order. Two
/// triplets built from the same three minutiae produce the same key no matter what
/// order the triangle listed them in; the key never involves minutia indices or any
/// notion of object identity, so deduplication survives serialization and reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructuralKey([u64; 6]);

/// A minutia-triplet feature: one triangle of the triangulation described by
/// rotation- and translation-invariant geometry.
///
/// Slots are stored in canonical order, sorted by non-increasing opposite side length
/// with the minutia index as the tie-break. `sides()[i]` is the length of the side
/// opposite slot `i`, and `relative_directions()[i]` is the minutia direction at slot
/// `i` taken relative to the segment toward slot `(i + 1) % 3`. Both survive rotating
/// and translating the whole fingerprint, which is what makes triplets comparable
/// across captures.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MTriplet {
    minutiae: [usize; 3],
    sides: [f64; 3],
    relative_directions: [f64; 3],
}

impl MTriplet {
    /// Builds the triplet for `triangle`, whose entries index into `minutiae`.
    ///
    /// Returns `None` when the triangle has no area. A correct triangulation never
    /// emits such a triangle; the guard keeps synthetic triangle lists from producing
    /// nonsense descriptors.
    pub fn from_triangle(minutiae: &[Minutia], triangle: [usize; 3]) -> Option<Self> {
        let positions = triangle.map(|index| minutiae[index].position);
        let doubled_area = {
            let u = positions[1] - positions[0];
            let v = positions[2] - positions[0];
            u.x * v.y - u.y * v.x
        };
        if doubled_area.abs() <= f64::EPSILON {
            return None;
        }

        // Canonical slot order: non-increasing opposite side length, minutia index as
        // the deterministic tie-break for congruent sides.
        let opposite =
            |slot: usize| distance(&positions[(slot + 1) % 3], &positions[(slot + 2) % 3]);
        let mut slots = [0usize, 1, 2];
        slots.sort_by(|&p, &q| {
            FloatOrd(opposite(q))
                .cmp(&FloatOrd(opposite(p)))
                .then(triangle[p].cmp(&triangle[q]))
        });

        let ordered_minutiae = slots.map(|slot| triangle[slot]);
        let ordered_positions = slots.map(|slot| positions[slot]);
        let sides = [0usize, 1, 2].map(|slot| {
            distance(
                &ordered_positions[(slot + 1) % 3],
                &ordered_positions[(slot + 2) % 3],
            )
        });
        let relative_directions = [0usize, 1, 2].map(|slot| {
            let direction = minutiae[ordered_minutiae[slot]].direction;
            let toward_next = angle::of_segment(
                &ordered_positions[slot],
                &ordered_positions[(slot + 1) % 3],
            );
            angle::normalize(direction - toward_next)
        });

        Some(Self {
            minutiae: ordered_minutiae,
            sides,
            relative_directions,
        })
    }

    /// The three minutia indices in canonical slot order.
    pub fn minutia_indices(&self) -> [usize; 3] {
        self.minutiae
    }

    /// Length of the side opposite each slot, non-increasing.
    pub fn sides(&self) -> [f64; 3] {
        self.sides
    }

    /// Minutia direction per slot, relative to the segment toward the next slot.
    pub fn relative_directions(&self) -> [f64; 3] {
        self.relative_directions
    }

    /// The value-computed structural key used for deduplication and identity.
    pub fn structural_key(&self) -> StructuralKey {
        StructuralKey([
            self.sides[0].to_bits(),
            self.sides[1].to_bits(),
            self.sides[2].to_bits(),
            self.relative_directions[0].to_bits(),
            self.relative_directions[1].to_bits(),
            self.relative_directions[2].to_bits(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutiae() -> Vec<Minutia> {
        vec![
            Minutia::new(0.0, 0.0, 0.3),
            Minutia::new(30.0, 0.0, 1.1),
            Minutia::new(10.0, 20.0, 2.0),
            Minutia::new(100.0, 100.0, -0.5),
        ]
    }

    #[test]
    fn index_order_does_not_change_the_key() {
        let minutiae = minutiae();
        let reference = MTriplet::from_triangle(&minutiae, [0, 1, 2]).unwrap();
        for triangle in [[1, 2, 0], [2, 0, 1], [0, 2, 1], [2, 1, 0], [1, 0, 2]] {
            let permuted = MTriplet::from_triangle(&minutiae, triangle).unwrap();
            assert_eq!(permuted.structural_key(), reference.structural_key());
            assert_eq!(permuted.minutia_indices(), reference.minutia_indices());
        }
    }

    #[test]
    fn sides_come_out_sorted() {
        let minutiae = minutiae();
        let triplet = MTriplet::from_triangle(&minutiae, [2, 0, 1]).unwrap();
        let sides = triplet.sides();
        assert!(sides[0] >= sides[1] && sides[1] >= sides[2]);
    }

    #[test]
    fn distinct_triangles_have_distinct_keys() {
        let minutiae = minutiae();
        let one = MTriplet::from_triangle(&minutiae, [0, 1, 2]).unwrap();
        let other = MTriplet::from_triangle(&minutiae, [0, 1, 3]).unwrap();
        assert_ne!(one.structural_key(), other.structural_key());
    }

    #[test]
    fn degenerate_triangles_are_rejected() {
        let collinear = vec![
            Minutia::new(0.0, 0.0, 0.0),
            Minutia::new(5.0, 0.0, 0.0),
            Minutia::new(10.0, 0.0, 0.0),
        ];
        assert!(MTriplet::from_triangle(&collinear, [0, 1, 2]).is_none());
    }
}
