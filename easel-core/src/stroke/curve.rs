//! Curve refinement used by the stroke smoother.

use crate::geom::Point;

/// Upper bound on corner-cutting passes. Each pass doubles the point count.
pub const MAX_CHAIKIN_ITERATIONS: u32 = 8;

/// Chaikin corner cutting. Each pass replaces every segment `a -> b` with the two points at
/// one quarter and three quarters along it. The endpoints are *not* kept.
///
/// Zero iterations returns the input unchanged. Iterations beyond [`MAX_CHAIKIN_ITERATIONS`] are clamped.
#[must_use]
pub fn chaikin(points: &[Point], iterations: u32) -> Vec<Point> {
    let mut current = points.to_vec();
    for _ in 0..iterations.min(MAX_CHAIKIN_ITERATIONS) {
        if current.len() < 2 {
            break;
        }
        current = current
            .windows(2)
            .flat_map(|pair| {
                let [a, b] = [pair[0], pair[1]];
                [a.lerp(b, 0.25), a.lerp(b, 0.75)]
            })
            .collect();
    }
    current
}

/// Knot spacing below this is treated as coincident points.
const KNOT_EPSILON: f32 = 1e-4;

/// A centripetal (for `alpha == 0.5`) Catmull-Rom span between the middle two of four control points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CatmullRomSpan {
    points: [Point; 4],
    knots: [f32; 4],
}
impl CatmullRomSpan {
    /// Parameterize the span `p[1] -> p[2]`. `alpha` is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(points: [Point; 4], alpha: f32) -> Self {
        let alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            0.5
        };
        let mut knots = [0.0; 4];
        for i in 1..4 {
            let mut interval = points[i - 1].distance(points[i]).powf(alpha);
            // Repeated control points would divide by zero below.
            if !interval.is_finite() || interval < KNOT_EPSILON {
                interval = 1.0;
            }
            knots[i] = knots[i - 1] + interval;
        }
        Self { points, knots }
    }
    /// Evaluate at a fraction `0..=1` of the way from `p[1]` to `p[2]`.
    #[must_use]
    pub fn at(&self, fraction: f32) -> Point {
        let [p0, p1, p2, p3] = self.points;
        let [t0, t1, t2, t3] = self.knots;
        let t = t1 + (t2 - t1) * fraction;
        // Barry and Goldman's pyramidal formulation.
        let a1 = p0.lerp(p1, (t - t0) / (t1 - t0));
        let a2 = p1.lerp(p2, (t - t1) / (t2 - t1));
        let a3 = p2.lerp(p3, (t - t2) / (t3 - t2));
        let b1 = a1.lerp(a2, (t - t0) / (t2 - t0));
        let b2 = a2.lerp(a3, (t - t1) / (t3 - t1));
        b1.lerp(b2, (t - t1) / (t2 - t1))
    }
    /// Sample the span at roughly `target_segment` spacing. Yields at least one point, the last being `p[2]`.
    /// `p[1]` itself is not yielded.
    pub fn samples(&self, target_segment: f32) -> impl Iterator<Item = Point> + '_ {
        let length = self.points[1].distance(self.points[2]);
        let target = if target_segment.is_finite() && target_segment > 0.0 {
            target_segment
        } else {
            1.0
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = ((length / target).ceil() as usize).max(1);
        (1..=steps).map(move |step| {
            if step == steps {
                // Exact, so consecutive spans join without a seam.
                self.points[2]
            } else {
                self.at(step as f32 / steps as f32)
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::{chaikin, CatmullRomSpan};
    use crate::geom::Point;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn chaikin_single_pass() {
        let out = chaikin(&[Point::new(0.0, 0.0), Point::new(4.0, 0.0)], 1);
        assert_eq!(out, vec![Point::new(1.0, 0.0), Point::new(3.0, 0.0)]);
    }
    #[test]
    fn chaikin_counts() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
        ];
        assert_eq!(chaikin(&pts, 0).len(), 3);
        assert_eq!(chaikin(&pts, 1).len(), 4);
        assert_eq!(chaikin(&pts, 2).len(), 6);
        assert_eq!(chaikin(&pts, 3).len(), 10);
        // Clamped, rather than exploding.
        assert_eq!(chaikin(&pts, 1000), chaikin(&pts, super::MAX_CHAIKIN_ITERATIONS));
    }
    #[test]
    fn chaikin_degenerate() {
        let single = [Point::new(1.0, 1.0)];
        assert_eq!(chaikin(&single, 2), single.to_vec());
        assert!(chaikin(&[], 2).is_empty());
    }
    #[test]
    fn catmull_rom_interpolates() {
        let span = CatmullRomSpan::new(
            [
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(20.0, 10.0),
                Point::new(30.0, 10.0),
            ],
            0.5,
        );
        assert!(close(span.at(0.0), Point::new(10.0, 0.0)));
        assert!(close(span.at(1.0), Point::new(20.0, 10.0)));
    }
    #[test]
    fn catmull_rom_collinear_stays_on_line() {
        let span = CatmullRomSpan::new(
            [
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(6.0, 0.0),
            ],
            0.5,
        );
        let samples: Vec<_> = span.samples(0.5).collect();
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|p| p.y.abs() < 1e-4));
        assert!(samples.windows(2).all(|w| w[0].x < w[1].x));
        assert_eq!(*samples.last().unwrap(), Point::new(4.0, 0.0));
    }
    #[test]
    fn catmull_rom_repeated_points() {
        // Coincident controls must not produce NaN.
        let p = Point::new(3.0, 3.0);
        let span = CatmullRomSpan::new([p, p, Point::new(5.0, 3.0), Point::new(5.0, 3.0)], 0.5);
        for sample in span.samples(0.25) {
            assert!(sample.x.is_finite() && sample.y.is_finite());
        }
        let zero = CatmullRomSpan::new([p; 4], 0.5);
        assert_eq!(zero.samples(1.0).collect::<Vec<_>>(), vec![p]);
    }
}
