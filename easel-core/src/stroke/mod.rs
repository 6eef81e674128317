//! # Strokes
//!
//! Freehand lines are built one input point at a time. Points too close to the previous accepted point
//! are dropped, and accepted points are smoothed as soon as enough context exists to do so. Every time
//! new geometry is produced, the builder returns it as a *delta*, a short path that can be painted on
//! its own without redrawing the rest of the stroke. The same vertices are appended to the persistent path,
//! which is what a full redraw of the line uses.

pub mod curve;

use smallvec::SmallVec;

use crate::geom::{Path, Point};
use crate::state::style::Smoothing;
use curve::CatmullRomSpan;

/// Outcome of offering a point to a [`StrokeBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub enum StrokeStep {
    /// Too close to the previous point. Nothing changed.
    Rejected,
    /// Accepted, but held until more context arrives.
    Buffered,
    /// Accepted, and this new geometry was appended to the persistent path.
    Drawn(Path),
}
impl StrokeStep {
    #[must_use]
    pub fn accepted(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeBuilder {
    path: Path,
    /// Accepted points not yet fully represented in the path, newest last. Never empty.
    ///
    /// Chaikin keeps at most two. Catmull-Rom keeps a sliding window of four, where the path already
    /// reaches the third.
    pending: SmallVec<[Point; 4]>,
    /// Catmull-Rom: the next span must first draw straight to its start.
    lead_in: bool,
}

impl StrokeBuilder {
    #[must_use]
    pub fn new(origin: Point) -> Self {
        Self {
            path: Path::starting_at(origin),
            pending: smallvec::smallvec![origin],
            lead_in: true,
        }
    }
    /// Everything drawn so far.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// The most recently accepted point.
    #[must_use]
    pub fn last_accepted(&self) -> Point {
        // Never empty.
        self.pending[self.pending.len() - 1]
    }
    /// Offer a new input point.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn push(&mut self, point: Point, min_distance: f32, smoothing: &Smoothing) -> StrokeStep {
        // Strictly greater, so a zero min distance still drops exact repeats. NaN is dropped too.
        if !(self.last_accepted().distance(point) > min_distance) {
            return StrokeStep::Rejected;
        }
        match *smoothing {
            Smoothing::Chaikin { iterations } => self.push_chaikin(point, iterations),
            Smoothing::CatmullRom {
                alpha,
                target_segment,
            } => self.push_catmull_rom(point, alpha, target_segment),
        }
    }
    fn push_chaikin(&mut self, point: Point, iterations: u32) -> StrokeStep {
        if self.pending.len() < 2 {
            self.pending.push(point);
            return StrokeStep::Buffered;
        }
        let triple = [self.pending[0], self.pending[1], point];
        self.pending.clear();
        self.pending.push(point);

        let mut delta = Path::starting_at(triple[0]);
        for vertex in curve::chaikin(&triple, iterations)
            .into_iter()
            .chain(std::iter::once(point))
        {
            delta.line_to(vertex);
            self.path.line_to(vertex);
        }
        StrokeStep::Drawn(delta)
    }
    fn push_catmull_rom(&mut self, point: Point, alpha: f32, target_segment: f32) -> StrokeStep {
        if self.pending.len() == 4 {
            self.pending.remove(0);
        }
        self.pending.push(point);
        let Ok(window) = <[Point; 4]>::try_from(self.pending.as_slice()) else {
            return StrokeStep::Buffered;
        };

        let span = CatmullRomSpan::new(window, alpha);
        let mut delta = if self.lead_in {
            // Nothing has been drawn towards the first span's start yet.
            self.lead_in = false;
            let mut delta = Path::starting_at(window[0]);
            delta.line_to(window[1]);
            self.path.line_to(window[1]);
            delta
        } else {
            Path::starting_at(window[1])
        };
        for vertex in span.samples(target_segment) {
            delta.line_to(vertex);
            self.path.line_to(vertex);
        }
        StrokeStep::Drawn(delta)
    }
    /// Switch smoothing in the middle of a stroke. Points held back for `previous` are flushed first,
    /// returning the geometry added, since the two kinds buffer differently.
    pub fn resmooth(&mut self, previous: &Smoothing, next: &Smoothing) -> Option<Path> {
        if std::mem::discriminant(previous) == std::mem::discriminant(next) {
            return None;
        }
        self.finish(previous)
    }
    /// Flush held points as straight segments, returning the geometry added, if any.
    ///
    /// The stroke may continue afterwards, starting fresh from the last point.
    pub fn finish(&mut self, smoothing: &Smoothing) -> Option<Path> {
        let last = self.last_accepted();
        let tail: SmallVec<[Point; 4]> = match smoothing {
            Smoothing::Chaikin { .. } => self.pending.iter().skip(1).copied().collect(),
            Smoothing::CatmullRom { .. } if self.lead_in => {
                self.pending.iter().skip(1).copied().collect()
            }
            // The path already reaches the second to last point.
            Smoothing::CatmullRom { .. } => smallvec::smallvec![last],
        };
        self.pending.clear();
        self.pending.push(last);
        self.lead_in = true;

        if tail.is_empty() {
            return None;
        }
        let mut delta = Path::starting_at(self.path.end());
        for vertex in tail {
            delta.line_to(vertex);
            self.path.line_to(vertex);
        }
        Some(delta)
    }
}

#[cfg(test)]
mod test {
    use super::{StrokeBuilder, StrokeStep};
    use crate::geom::Point;
    use crate::state::style::Smoothing;

    const CHAIKIN: Smoothing = Smoothing::Chaikin { iterations: 2 };
    const CATMULL_ROM: Smoothing = Smoothing::CatmullRom {
        alpha: 0.5,
        target_segment: 2.0,
    };

    #[test]
    fn chaikin_emits_every_second_point() {
        let mut stroke = StrokeBuilder::new(Point::new(0.0, 0.0));
        assert_eq!(
            stroke.push(Point::new(4.0, 0.0), 1.0, &CHAIKIN),
            StrokeStep::Buffered
        );
        let StrokeStep::Drawn(delta) = stroke.push(Point::new(4.0, 4.0), 1.0, &CHAIKIN) else {
            panic!("expected geometry")
        };
        // Move, six refined points, then the new point.
        assert_eq!(stroke.path().len(), 8);
        assert_eq!(delta.len(), 8);
        assert_eq!(delta.start(), Point::new(0.0, 0.0));
        assert_eq!(delta.end(), Point::new(4.0, 4.0));
        assert_eq!(stroke.last_accepted(), Point::new(4.0, 4.0));
    }
    #[test]
    fn close_points_rejected() {
        let mut stroke = StrokeBuilder::new(Point::new(0.0, 0.0));
        assert_eq!(
            stroke.push(Point::new(1.0, 0.0), 1.0, &CHAIKIN),
            StrokeStep::Rejected
        );
        assert_eq!(
            stroke.push(Point::new(0.0, 0.0), 0.0, &CHAIKIN),
            StrokeStep::Rejected
        );
        assert!(stroke.push(Point::new(1.5, 0.0), 1.0, &CHAIKIN).accepted());
        assert_eq!(
            stroke.push(Point::new(f32::NAN, 0.0), 1.0, &CHAIKIN),
            StrokeStep::Rejected
        );
    }
    #[test]
    fn catmull_rom_waits_for_four() {
        let mut stroke = StrokeBuilder::new(Point::new(0.0, 0.0));
        assert_eq!(
            stroke.push(Point::new(4.0, 0.0), 1.0, &CATMULL_ROM),
            StrokeStep::Buffered
        );
        assert_eq!(
            stroke.push(Point::new(4.0, 4.0), 1.0, &CATMULL_ROM),
            StrokeStep::Buffered
        );
        assert_eq!(stroke.path().len(), 1);

        let StrokeStep::Drawn(delta) = stroke.push(Point::new(0.0, 4.0), 1.0, &CATMULL_ROM) else {
            panic!("expected geometry")
        };
        // Lead in from the origin, then the span (4,0) -> (4,4).
        assert_eq!(delta.start(), Point::new(0.0, 0.0));
        assert_eq!(delta.vertices()[1], Point::new(4.0, 0.0));
        assert_eq!(delta.end(), Point::new(4.0, 4.0));
        assert_eq!(stroke.path().end(), Point::new(4.0, 4.0));

        let StrokeStep::Drawn(delta) = stroke.push(Point::new(0.0, 8.0), 1.0, &CATMULL_ROM) else {
            panic!("expected geometry")
        };
        // No lead in this time.
        assert_eq!(delta.start(), Point::new(4.0, 4.0));
        assert_eq!(delta.end(), Point::new(0.0, 4.0));
    }
    #[test]
    fn finish_flushes_tail() {
        let mut stroke = StrokeBuilder::new(Point::new(0.0, 0.0));
        stroke.push(Point::new(4.0, 0.0), 1.0, &CATMULL_ROM);
        stroke.push(Point::new(4.0, 4.0), 1.0, &CATMULL_ROM);
        let tail = stroke.finish(&CATMULL_ROM).unwrap();
        assert_eq!(tail.len(), 3);
        assert_eq!(stroke.path().len(), 3);
        assert_eq!(stroke.path().end(), Point::new(4.0, 4.0));
        // Nothing left to flush.
        assert_eq!(stroke.finish(&CATMULL_ROM), None);

        let mut stroke = StrokeBuilder::new(Point::new(0.0, 0.0));
        stroke.push(Point::new(4.0, 0.0), 1.0, &CHAIKIN);
        let tail = stroke.finish(&CHAIKIN).unwrap();
        assert_eq!(tail.vertices(), &[Point::new(0.0, 0.0), Point::new(4.0, 0.0)]);
        assert_eq!(stroke.finish(&CHAIKIN), None);
    }
    #[test]
    fn catmull_rom_finish_after_spans() {
        let mut stroke = StrokeBuilder::new(Point::new(0.0, 0.0));
        for p in [(4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 8.0)] {
            stroke.push(Point::from([p.0, p.1]), 1.0, &CATMULL_ROM);
        }
        let tail = stroke.finish(&CATMULL_ROM).unwrap();
        assert_eq!(tail.vertices(), &[Point::new(0.0, 4.0), Point::new(0.0, 8.0)]);
        // Resumes with a fresh lead in.
        for p in [(4.0, 8.0), (4.0, 12.0), (0.0, 12.0)] {
            stroke.push(Point::from([p.0, p.1]), 1.0, &CATMULL_ROM);
        }
        assert!(stroke
            .path()
            .vertices()
            .contains(&Point::new(4.0, 8.0)));
    }
    #[test]
    fn resmooth_keeps_path_forward() {
        let mut stroke = StrokeBuilder::new(Point::new(0.0, 0.0));
        for x in [10.0, 20.0, 30.0, 40.0] {
            stroke.push(Point::new(x, 0.0), 1.0, &CATMULL_ROM);
        }
        assert_eq!(stroke.path().end(), Point::new(30.0, 0.0));
        let tail = stroke.resmooth(&CATMULL_ROM, &CHAIKIN).unwrap();
        assert_eq!(tail.end(), Point::new(40.0, 0.0));
        for x in [50.0, 60.0] {
            stroke.push(Point::new(x, 0.0), 1.0, &CHAIKIN);
        }
        let xs: Vec<f32> = stroke.path().vertices().iter().map(|p| p.x).collect();
        assert!(xs.windows(2).all(|w| w[0] <= w[1]), "{xs:?}");
        assert!(xs.contains(&40.0));
        assert_eq!(stroke.path().end(), Point::new(60.0, 0.0));
        // Same kind, different settings: nothing to flush.
        assert_eq!(
            stroke.resmooth(&CHAIKIN, &Smoothing::Chaikin { iterations: 4 }),
            None
        );
    }
}
