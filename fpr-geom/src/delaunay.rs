//! Delaunay triangulation of minutia positions.

use alloc::vec::Vec;
use float_ord::FloatOrd;
use fpr_core::{
    nalgebra::{distance_squared, Point2},
    RidgePoint,
};

use crate::hull::Hull;
use crate::unique::UniqueSet;

/// Twice the signed area of the triangle `abc`; positive when `abc` winds
/// counter-clockwise.
pub fn signed_doubled_area(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    let u = b - a;
    let v = c - a;
    u.x * v.y - u.y * v.x
}

/// Circumcenter of the triangle `abc`, unless it is degenerate.
pub fn circumcenter(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Option<Point2<f64>> {
    let d = b - a;
    let e = c - a;
    let bl = d.norm_squared();
    let cl = e.norm_squared();
    let det = d.x * e.y - d.y * e.x;
    if det == 0.0 {
        return None;
    }
    let x = (e.y * bl - d.y * cl) * (0.5 / det);
    let y = (d.x * cl - e.x * bl) * (0.5 / det);
    Some(Point2::new(a.x + x, a.y + y))
}

/// Squared circumradius of the triangle `abc`, or `f64::MAX` when it is degenerate.
///
/// The degenerate value sorts after every real radius, which is exactly what seed
/// selection wants.
pub fn circumradius_squared(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    let d = b - a;
    let e = c - a;
    let bl = d.norm_squared();
    let cl = e.norm_squared();
    let det = d.x * e.y - d.y * e.x;
    if bl == 0.0 || cl == 0.0 || det == 0.0 {
        return f64::MAX;
    }
    let x = (e.y * bl - d.y * cl) * (0.5 / det);
    let y = (d.x * cl - e.x * bl) * (0.5 / det);
    x * x + y * y
}

/// Whether `p` lies strictly inside the circumcircle of the counter-clockwise
/// triangle `abc`.
pub fn in_circumcircle(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> bool {
    let d = a - p;
    let e = b - p;
    let f = c - p;
    let ap = d.norm_squared();
    let bp = e.norm_squared();
    let cp = f.norm_squared();
    let det = d.x * (e.y * cp - bp * f.y) - d.y * (e.x * cp - bp * f.x)
        + ap * (e.x * f.y - e.y * f.x);
    det > 0.0
}

/// Computes a Delaunay triangulation over 2d minutia positions by incremental hull
/// growth followed by flip refinement.
///
/// The triangle set tiles the convex hull of the input exactly: every triangle winds
/// counter-clockwise with positive area, every interior edge is shared by exactly two
/// triangles, and after refinement no vertex lies strictly inside the circumcircle of
/// any triangle.
///
/// Degenerate inputs (fewer than three points, or all points collinear) are not errors:
/// they produce an empty triangle list, which downstream stages treat as the absence of
/// geometric evidence. Duplicate points and points landing exactly on the hull boundary
/// are skipped rather than triangulated.
///
/// ```
/// use fpr_core::nalgebra::Point2;
/// use fpr_geom::delaunay::DelaunayTriangulator;
///
/// let square = [
///     Point2::new(0.0, 0.0),
///     Point2::new(10.0, 0.0),
///     Point2::new(10.0, 10.0),
///     Point2::new(0.0, 10.0),
/// ];
/// let triangles = DelaunayTriangulator::new().triangulate(&square);
/// assert_eq!(triangles.len(), 2);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct DelaunayTriangulator {
    collinearity_epsilon: f64,
    max_flip_sweeps: usize,
}

impl DelaunayTriangulator {
    /// Creates a `DelaunayTriangulator` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the tolerance below which cross products count as collinear.
    ///
    /// Default is `1e-10`.
    #[must_use]
    pub fn collinearity_epsilon(self, collinearity_epsilon: f64) -> Self {
        Self {
            collinearity_epsilon,
            ..self
        }
    }

    /// Set the bound on full refinement sweeps.
    ///
    /// Refinement terminates on its own for finite inputs; the bound caps the work done
    /// if numerical noise keeps toggling an edge. Default is `100`.
    #[must_use]
    pub fn max_flip_sweeps(self, max_flip_sweeps: usize) -> Self {
        Self {
            max_flip_sweeps,
            ..self
        }
    }

    /// Triangulates the positions of `points`, yielding triangles as index triples
    /// into the input sequence.
    pub fn triangulate<P: RidgePoint>(&self, points: &[P]) -> Vec<[usize; 3]> {
        let positions: Vec<Point2<f64>> = points.iter().map(RidgePoint::ridge_point).collect();
        self.triangulate_positions(&positions)
    }

    fn triangulate_positions(&self, points: &[Point2<f64>]) -> Vec<[usize; 3]> {
        if points.len() < 3 {
            return Vec::new();
        }
        let seed = match self.seed_triangle(points) {
            Some(seed) => seed,
            None => return Vec::new(),
        };
        let [i0, i1, i2] = seed;
        // The seed is not degenerate, so its circumcenter exists.
        let center = match circumcenter(&points[i0], &points[i1], &points[i2]) {
            Some(center) => center,
            None => return Vec::new(),
        };

        let mut triangles: Vec<[usize; 3]> = Vec::with_capacity(2 * points.len());
        triangles.push(seed);
        let mut hull = Hull::from_seed(seed, 0);

        // Insert points in order of distance from the seed circumcenter, which keeps
        // every insertion close to the hull and the visible runs short.
        let mut order: Vec<usize> = (0..points.len())
            .filter(|&i| i != i0 && i != i1 && i != i2)
            .collect();
        order.sort_by_key(|&i| FloatOrd(distance_squared(&points[i], &center)));

        let mut guard = UniqueSet::new();
        for ip in order {
            let point = points[ip];
            let (first, last, run) = match self.visible_run(&hull, &point, points, &mut guard) {
                Some(run) => run,
                // Inside the hull or on its boundary: a duplicate or a collinear tie.
                None => continue,
            };

            let first_triangle = triangles.len();
            let mut edge = first;
            for _ in 0..run {
                let a = hull.vertex(edge).point;
                let b = hull.vertex(hull.next(edge)).point;
                // The new point lies strictly outside edge (a, b), so (a, ip, b)
                // winds counter-clockwise.
                triangles.push([a, ip, b]);
                edge = hull.next(edge);
            }
            let last_triangle = triangles.len() - 1;

            let slot = hull.replace_run(first, last, ip);
            hull.set_triangle(first, first_triangle);
            hull.set_triangle(slot, last_triangle);
        }

        // Refinement may rewrite hull-adjacent triangles, so the per-edge triangle
        // bookkeeping is only guaranteed up to this point.
        debug_assert!(hull_triangles_consistent(&hull, &triangles));

        self.refine(&mut triangles, points);
        triangles
    }

    /// Picks a well-conditioned seed triangle: the point closest to the input
    /// centroid, its nearest neighbor, and the third point minimizing the
    /// circumradius, wound counter-clockwise. `None` when every choice is collinear.
    fn seed_triangle(&self, points: &[Point2<f64>]) -> Option<[usize; 3]> {
        let n = points.len();
        let centroid = {
            let mut x = 0.0;
            let mut y = 0.0;
            for p in points {
                x += p.x;
                y += p.y;
            }
            Point2::new(x / n as f64, y / n as f64)
        };
        let i0 = (0..n).min_by_key(|&i| FloatOrd(distance_squared(&points[i], &centroid)))?;
        // Duplicates of the first point would collapse the seed, so the nearest
        // neighbor must be at a strictly positive distance.
        let i1 = (0..n)
            .filter(|&i| i != i0 && distance_squared(&points[i], &points[i0]) > 0.0)
            .min_by_key(|&i| FloatOrd(distance_squared(&points[i], &points[i0])))?;
        let i2 = (0..n)
            .filter(|&i| i != i0 && i != i1)
            .min_by_key(|&i| FloatOrd(circumradius_squared(&points[i0], &points[i1], &points[i])))?;

        let area = signed_doubled_area(&points[i0], &points[i1], &points[i2]);
        if area.abs() <= self.collinearity_epsilon {
            // Even the best third point is collinear with the first two, so the whole
            // input lies on one line.
            return None;
        }
        if area > 0.0 {
            Some([i0, i1, i2])
        } else {
            Some([i0, i2, i1])
        }
    }

    /// Finds the contiguous run of hull edges visible from `point`, as the arena slots
    /// of the run's first and last edge origins plus the run length.
    ///
    /// `None` when no edge is strictly visible (the point is inside the hull or on its
    /// boundary). The guard set bounds every walk to one lap of the cycle, so a
    /// numerically inconsistent hull degrades into a skipped point instead of a hang.
    fn visible_run(
        &self,
        hull: &Hull,
        point: &Point2<f64>,
        points: &[Point2<f64>],
        guard: &mut UniqueSet<usize>,
    ) -> Option<(usize, usize, usize)> {
        let epsilon = self.collinearity_epsilon;
        guard.clear();

        // Probe for any visible edge.
        let mut probe = hull.start();
        loop {
            if !guard.insert(probe) {
                // One full lap without a visible edge.
                return None;
            }
            if hull.is_edge_visible(probe, point, points, epsilon) {
                break;
            }
            probe = hull.next(probe);
        }
        let probed = guard.mark();

        // Extend backward to the start of the run, then forward to its end. If either
        // walk laps onto an already-visited slot, every edge claims to be visible;
        // treat the point as unplaceable and restore the guard to the probe state.
        let mut first = probe;
        let mut run = 1;
        loop {
            let prev = hull.prev(first);
            if !hull.is_edge_visible(prev, point, points, epsilon) {
                break;
            }
            if !guard.insert(prev) {
                guard.rollback(probed);
                return None;
            }
            first = prev;
            run += 1;
        }
        let mut last = probe;
        loop {
            let next = hull.next(last);
            if !hull.is_edge_visible(next, point, points, epsilon) {
                break;
            }
            if !guard.insert(next) {
                guard.rollback(probed);
                return None;
            }
            last = next;
            run += 1;
        }
        Some((first, last, run))
    }

    /// Restores the Delaunay condition by edge flips.
    ///
    /// Sweeps the interior edges, rebuilding the edge-to-triangle adjacency each pass;
    /// an edge whose opposite vertex intrudes into the neighboring circumcircle is
    /// flipped, and triangles rewritten this sweep are skipped until the next one.
    /// Stops at the first sweep with no flips.
    fn refine(&self, triangles: &mut [[usize; 3]], points: &[Point2<f64>]) {
        if triangles.len() < 2 {
            return;
        }
        let mut dirty = UniqueSet::new();
        let mut edges: Vec<(usize, usize, usize, usize)> = Vec::with_capacity(triangles.len() * 3);
        for _ in 0..self.max_flip_sweeps {
            dirty.clear();
            edges.clear();
            for (t, tri) in triangles.iter().enumerate() {
                for k in 0..3 {
                    let a = tri[k];
                    let b = tri[(k + 1) % 3];
                    let opposite = tri[(k + 2) % 3];
                    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                    edges.push((lo, hi, t, opposite));
                }
            }
            edges.sort_unstable();

            let mut flipped = false;
            for pair in edges.windows(2) {
                let (a, b, t1, opp1) = pair[0];
                let (a2, b2, t2, opp2) = pair[1];
                if (a, b) != (a2, b2) {
                    continue;
                }
                if dirty.contains(&t1) || dirty.contains(&t2) {
                    continue;
                }
                if self.flip_if_illegal(triangles, points, (a, b), (t1, opp1), (t2, opp2)) {
                    dirty.insert(t1);
                    dirty.insert(t2);
                    flipped = true;
                }
            }
            if !flipped {
                break;
            }
        }
    }

    /// Flips the edge shared by `t1` and `t2` if it violates the Delaunay condition,
    /// replacing the shared edge with the diagonal between the opposite vertices.
    fn flip_if_illegal(
        &self,
        triangles: &mut [[usize; 3]],
        points: &[Point2<f64>],
        (a, b): (usize, usize),
        (t1, c): (usize, usize),
        (t2, d): (usize, usize),
    ) -> bool {
        let [x, y, z] = triangles[t1];
        if !in_circumcircle(&points[d], &points[x], &points[y], &points[z]) {
            return false;
        }
        // The flip is only planar if the shared endpoints straddle the new diagonal
        // between the opposite vertices.
        let area_a = signed_doubled_area(&points[c], &points[d], &points[a]);
        let area_b = signed_doubled_area(&points[c], &points[d], &points[b]);
        if area_a.abs() <= self.collinearity_epsilon
            || area_b.abs() <= self.collinearity_epsilon
            || (area_a > 0.0) == (area_b > 0.0)
        {
            return false;
        }
        triangles[t1] = if area_a > 0.0 { [c, d, a] } else { [d, c, a] };
        triangles[t2] = if area_b > 0.0 { [c, d, b] } else { [d, c, b] };
        true
    }
}

/// Every hull edge's recorded triangle must actually own both edge endpoints.
fn hull_triangles_consistent(hull: &Hull, triangles: &[[usize; 3]]) -> bool {
    let start = hull.start();
    let mut slot = start;
    loop {
        let vertex = hull.vertex(slot);
        let triangle = triangles[vertex.triangle];
        if !triangle.contains(&vertex.point)
            || !triangle.contains(&hull.vertex(vertex.next).point)
        {
            return false;
        }
        slot = vertex.next;
        if slot == start {
            break;
        }
    }
    true
}

impl Default for DelaunayTriangulator {
    fn default() -> Self {
        Self {
            collinearity_epsilon: 1e-10,
            max_flip_sweeps: 100,
        }
    }
}
