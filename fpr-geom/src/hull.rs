//! Convex hull maintenance for incremental triangulation.

use alloc::vec::Vec;
use fpr_core::nalgebra::{Point2, Vector2};

/// One vertex of the advancing hull.
///
/// Vertices live in an arena and are threaded into a counter-clockwise cycle through
/// `next`/`prev`. Replacing a run of edges is relinking, never shifting.
#[derive(Debug, Clone, Copy)]
pub struct HullVertex {
    /// Index of the source point in the input sequence.
    pub point: usize,
    /// Arena slot of the cyclic successor.
    pub next: usize,
    /// Arena slot of the cyclic predecessor.
    pub prev: usize,
    /// Slot of the triangle bordering the edge from this vertex toward `next`.
    pub triangle: usize,
}

/// The advancing convex hull: an arena of [`HullVertex`] entries linked into a
/// counter-clockwise cycle.
///
/// Slots superseded by an insertion are simply unlinked and left behind in the arena;
/// only the links define the cycle.
#[derive(Debug, Clone)]
pub struct Hull {
    verts: Vec<HullVertex>,
    start: usize,
}

impl Hull {
    /// Builds the initial three-vertex hull from a counter-clockwise seed triangle.
    ///
    /// `seed` holds indices into the point sequence and `triangle` is the slot of the
    /// seed triangle, which borders all three initial edges.
    pub fn from_seed(seed: [usize; 3], triangle: usize) -> Self {
        let verts = alloc::vec![
            HullVertex {
                point: seed[0],
                next: 1,
                prev: 2,
                triangle,
            },
            HullVertex {
                point: seed[1],
                next: 2,
                prev: 0,
                triangle,
            },
            HullVertex {
                point: seed[2],
                next: 0,
                prev: 1,
                triangle,
            },
        ];
        Self { verts, start: 0 }
    }

    /// A slot on the current cycle to start traversals from.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The vertex stored in `slot`.
    pub fn vertex(&self, slot: usize) -> &HullVertex {
        &self.verts[slot]
    }

    /// Slot of the cyclic successor of `slot`.
    pub fn next(&self, slot: usize) -> usize {
        self.verts[slot].next
    }

    /// Slot of the cyclic predecessor of `slot`.
    pub fn prev(&self, slot: usize) -> usize {
        self.verts[slot].prev
    }

    /// Number of arena entries, linked or not.
    pub fn arena_len(&self) -> usize {
        self.verts.len()
    }

    /// Records `triangle` as bordering the edge from `slot` toward its successor.
    pub fn set_triangle(&mut self, slot: usize, triangle: usize) {
        self.verts[slot].triangle = triangle;
    }

    /// The vector along the hull edge from `slot` to its cyclic successor.
    pub fn edge_vector(&self, slot: usize, points: &[Point2<f64>]) -> Vector2<f64> {
        let a = points[self.verts[slot].point];
        let b = points[self.verts[self.verts[slot].next].point];
        b - a
    }

    /// Whether the edge from `slot` to its successor is visible from `point`.
    ///
    /// With the hull wound counter-clockwise, a point strictly on the outward side of
    /// an edge sees it; every edge a new point sees must be retired when that point
    /// joins the hull. Points on the supporting line of the edge do not see it.
    pub fn is_edge_visible(
        &self,
        slot: usize,
        point: &Point2<f64>,
        points: &[Point2<f64>],
        epsilon: f64,
    ) -> bool {
        let a = points[self.verts[slot].point];
        let edge = self.edge_vector(slot, points);
        let to_point = point - a;
        edge.x * to_point.y - edge.y * to_point.x < -epsilon
    }

    /// Splices a new vertex for `point` over the visible run of edges whose origins go
    /// from `first` to `last` (inclusive).
    ///
    /// Interior run vertices fall out of the cycle in O(run length). The new slot is
    /// returned and the traversal start moves to `first`, which always survives the
    /// splice.
    pub fn replace_run(&mut self, first: usize, last: usize, point: usize) -> usize {
        let after = self.verts[last].next;
        let slot = self.verts.len();
        self.verts.push(HullVertex {
            point,
            next: after,
            prev: first,
            triangle: usize::MAX,
        });
        self.verts[first].next = slot;
        self.verts[after].prev = slot;
        self.start = first;
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> [Point2<f64>; 4] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn seed_cycle_is_linked() {
        let hull = Hull::from_seed([0, 1, 2], 0);
        let start = hull.start();
        assert_eq!(hull.next(hull.next(hull.next(start))), start);
        assert_eq!(hull.prev(hull.prev(hull.prev(start))), start);
    }

    #[test]
    fn visibility_is_strict_and_one_sided() {
        let points = square();
        // Seed triangle (0, 0), (10, 0), (10, 10) wound counter-clockwise.
        let hull = Hull::from_seed([0, 1, 2], 0);
        let outside = Point2::new(0.0, 10.0);
        // Only the edge (10, 10) -> (0, 0) faces the fourth corner.
        assert!(!hull.is_edge_visible(0, &outside, &points, 1e-10));
        assert!(!hull.is_edge_visible(1, &outside, &points, 1e-10));
        assert!(hull.is_edge_visible(2, &outside, &points, 1e-10));
        // A point on the supporting line of an edge does not see it.
        let on_line = Point2::new(20.0, 0.0);
        assert!(!hull.is_edge_visible(0, &on_line, &points, 1e-10));
    }

    #[test]
    fn replace_run_relinks_cycle() {
        let mut hull = Hull::from_seed([0, 1, 2], 0);
        // Insert point 3 over the single visible edge starting at slot 2.
        let slot = hull.replace_run(2, 2, 3);
        assert_eq!(hull.vertex(slot).point, 3);
        // Cycle is now 0 -> 1 -> 2 -> new -> 0.
        let mut cycle = alloc::vec::Vec::new();
        let start = hull.start();
        let mut e = start;
        loop {
            cycle.push(hull.vertex(e).point);
            e = hull.next(e);
            if e == start {
                break;
            }
        }
        assert_eq!(cycle.len(), 4);
        assert!(cycle.contains(&3));
    }

    #[test]
    fn edge_vector_follows_links() {
        let points = square();
        let hull = Hull::from_seed([0, 1, 2], 0);
        let v = hull.edge_vector(1, &points);
        assert_eq!((v.x, v.y), (0.0, 10.0));
    }
}
