//! Closest points between two line segments

use glam::DVec3;

/// Squared length below which a segment is considered degenerate.
const DEGENERATE_LENGTH_SQ: f64 = 1e-24;
/// `sin^2` of the angle below which two segments are treated as parallel.
const PARALLEL_SIN_SQ: f64 = 1e-12;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub start: DVec3,
    pub end: DVec3,
}

impl Segment {
    #[must_use]
    pub const fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn direction(&self) -> DVec3 {
        self.end - self.start
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.start + self.direction() * t
    }

    /// Closest point on the segment to `p`.
    #[must_use]
    pub fn closest_point(&self, p: DVec3) -> DVec3 {
        let d = self.direction();
        let len_sq = d.length_squared();
        if len_sq <= DEGENERATE_LENGTH_SQ {
            return self.start;
        }
        let t = ((p - self.start).dot(d) / len_sq).clamp(0.0, 1.0);
        self.point_at(t)
    }
}

/// Pair of mutually closest points, one on each segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClosestPoints {
    pub on_first: DVec3,
    pub on_second: DVec3,
    pub distance: f64,
}

/// Computes the closest points between two segments.
///
/// Parallel segments whose projections overlap return the pair at the middle
/// of the shared interval, so the result lies on the common perpendicular.
/// Returns `None` for zero-length segments or a non-finite result.
#[must_use]
pub fn closest_points(first: &Segment, second: &Segment) -> Option<ClosestPoints> {
    let d1 = first.direction();
    let d2 = second.direction();
    let a = d1.length_squared();
    let e = d2.length_squared();
    if a <= DEGENERATE_LENGTH_SQ || e <= DEGENERATE_LENGTH_SQ {
        return None;
    }

    let r = first.start - second.start;
    let b = d1.dot(d2);
    let c = d1.dot(r);
    let f = d2.dot(r);
    let denom = a * e - b * b;

    let (p, q) = if denom <= PARALLEL_SIN_SQ * a * e {
        parallel_closest(first, second, a)
    } else {
        let mut s = ((b * f - c * e) / denom).clamp(0.0, 1.0);
        let mut t = (b * s + f) / e;
        if t < 0.0 {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else if t > 1.0 {
            t = 1.0;
            s = ((b - c) / a).clamp(0.0, 1.0);
        }
        (first.point_at(s), second.point_at(t))
    };

    let distance = p.distance(q);
    if !(p.is_finite() && q.is_finite() && distance.is_finite()) {
        return None;
    }
    Some(ClosestPoints {
        on_first: p,
        on_second: q,
        distance,
    })
}

fn parallel_closest(first: &Segment, second: &Segment, first_len_sq: f64) -> (DVec3, DVec3) {
    let d1 = first.direction();
    // parameters of the second segment's endpoints along the first
    let t0 = (second.start - first.start).dot(d1) / first_len_sq;
    let t1 = (second.end - first.start).dot(d1) / first_len_sq;
    let lo = t0.min(t1).max(0.0);
    let hi = t0.max(t1).min(1.0);

    let s = if lo <= hi {
        0.5 * (lo + hi)
    } else if t0.max(t1) < 0.0 {
        0.0
    } else {
        1.0
    };
    let q = second.closest_point(first.point_at(s));
    let p = first.closest_point(q);
    (p, q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(a: [f64; 3], b: [f64; 3]) -> Segment {
        Segment::new(DVec3::from_array(a), DVec3::from_array(b))
    }

    #[test]
    fn skew_segments_meet_on_common_perpendicular() {
        let first = seg([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let second = seg([0.0, -1.0, 2.0], [0.0, 1.0, 2.0]);
        let cp = closest_points(&first, &second).unwrap();
        assert_relative_eq!(cp.distance, 2.0, epsilon = 1e-12);
        assert_relative_eq!(cp.on_first.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(cp.on_second.z, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn skew_segments_clamp_to_endpoints() {
        let first = seg([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let second = seg([3.0, -1.0, 1.0], [3.0, 1.0, 1.0]);
        let cp = closest_points(&first, &second).unwrap();
        assert_relative_eq!(cp.on_first.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(cp.distance, 5.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn parallel_overlap_uses_middle_of_shared_interval() {
        let first = seg([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let second = seg([0.5, 0.0, 0.5], [0.5, 0.0, 2.0]);
        let cp = closest_points(&first, &second).unwrap();
        assert_relative_eq!(cp.distance, 0.5, epsilon = 1e-12);
        assert_relative_eq!(cp.on_first.z, 0.75, epsilon = 1e-12);
        assert_relative_eq!(cp.on_second.z, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn parallel_disjoint_uses_nearest_endpoints() {
        let first = seg([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let second = seg([0.0, 1.0, 3.0], [0.0, 1.0, 4.0]);
        let cp = closest_points(&first, &second).unwrap();
        assert_relative_eq!(cp.on_first.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(cp.on_second.z, 3.0, epsilon = 1e-12);
        assert_relative_eq!(cp.distance, 5.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_segment_has_no_result() {
        let point = seg([1.0, 1.0, 1.0], [1.0, 1.0, 1.0]);
        let line = seg([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert!(closest_points(&point, &line).is_none());
        assert!(closest_points(&line, &point).is_none());
    }

    #[test]
    fn non_finite_input_has_no_result() {
        let bad = seg([f64::NAN, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let line = seg([0.0, 1.0, 0.0], [0.0, 1.0, 1.0]);
        assert!(closest_points(&bad, &line).is_none());
    }
}
