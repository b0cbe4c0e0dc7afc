use crate::canvas::{Canvas, PathId, PathSeg, PathStyle};
use crate::noise::NoiseSource;
use crate::shade::Shade;
use std::io;

pub const ROOT_THICKNESS: f64 = 5.0;
pub const THICKNESS_DECAY: f64 = 0.8;
pub const MIN_THICKNESS: f64 = 1.0;

/// An immutable capture of a branch tip: a point, a direction and inherited
/// styling from which a new branch may grow next generation. Tips are cheap
/// values; nothing drawable is materialized until one is sprouted.
#[derive(Clone, Copy, Debug)]
pub struct BranchTip {
    pub x: f64,
    pub y: f64,
    /// Degrees, 0 = +x axis, -90 = straight up.
    pub heading: f64,
    pub shade: Shade,
    pub thickness: f64,
}

impl BranchTip {
    /// The seed tip a figure starts from: pointing up, full thickness,
    /// palette-corner shade.
    pub fn seed(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            heading: -90.0,
            shade: Shade::default(),
            thickness: ROOT_THICKNESS,
        }
    }
}

/// A drawable branch, live for a single generation. Holds the pen state and
/// the accumulated absolute path; once the generation's tips are harvested
/// the drawn path belongs to the canvas and the cursor is dropped.
pub struct BranchCursor {
    x: f64,
    y: f64,
    heading: f64,
    shade: Shade,
    thickness: f64,
    segs: Vec<PathSeg>,
    path: PathId,
}

impl BranchCursor {
    /// Grow a cursor out of a parent tip: the shade evolves, the thickness
    /// thins toward a floor of 1. Registers a zero-length styled path with
    /// the canvas so the branch exists on screen before it moves.
    pub fn sprout(
        canvas: &mut dyn Canvas,
        tip: &BranchTip,
        noise: &mut dyn NoiseSource,
    ) -> io::Result<Self> {
        let shade = tip.shade.evolve(noise);
        let thickness = (tip.thickness * THICKNESS_DECAY).max(MIN_THICKNESS);

        let segs = vec![PathSeg::MoveTo(tip.x, tip.y)];
        let path = canvas.create_path(&segs)?;
        canvas.set_style(
            path,
            PathStyle {
                stroke: shade,
                stroke_width: thickness,
            },
        )?;

        Ok(Self {
            x: tip.x,
            y: tip.y,
            heading: tip.heading,
            shade,
            thickness,
            segs,
            path,
        })
    }

    /// Capture the current pen state as a tip, optionally turned by
    /// `heading_delta`. Pure read; the cursor itself does not turn.
    pub fn snapshot(&self, heading_delta: f64) -> BranchTip {
        BranchTip {
            x: self.x,
            y: self.y,
            heading: self.heading + heading_delta,
            shade: self.shade,
            thickness: self.thickness,
        }
    }

    /// The sole drawing primitive: turn by `heading_delta`, move the pen
    /// `distance` along the new heading and stroke the segment. Returns the
    /// tip captured before moving, so callers can pop back to it later.
    pub fn advance(
        &mut self,
        canvas: &mut dyn Canvas,
        distance: f64,
        heading_delta: f64,
    ) -> io::Result<BranchTip> {
        let prior = self.snapshot(0.0);

        self.heading += heading_delta;
        let rad = self.heading.to_radians();
        self.x += rad.cos() * distance;
        self.y += rad.sin() * distance;

        self.segs.push(PathSeg::LineTo(self.x, self.y));
        canvas.set_path_data(self.path, &self.segs)?;

        Ok(prior)
    }

    /// Teleport pen and heading back to a tip without stroking a connector:
    /// the path continues as a disconnected subpath, so the figure shows a
    /// gap where the cursor popped back to spawn a sibling.
    pub fn rewind(&mut self, canvas: &mut dyn Canvas, tip: &BranchTip) -> io::Result<()> {
        self.x = tip.x;
        self.y = tip.y;
        self.heading = tip.heading;

        self.segs.push(PathSeg::MoveTo(self.x, self.y));
        canvas.set_path_data(self.path, &self.segs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, PathId, PathSeg, PathStyle};
    use crate::shade::{HUE_GROWTH, MAX_HUE};
    use std::io;

    struct Silent;

    impl NoiseSource for Silent {
        fn sample(&mut self, _divisor: f64) -> f64 {
            0.0
        }
    }

    /// Records every operation so tests can assert on the exact path data a
    /// cursor pushes.
    #[derive(Default)]
    struct RecordingCanvas {
        paths: Vec<Vec<PathSeg>>,
        styles: Vec<Option<PathStyle>>,
    }

    impl Canvas for RecordingCanvas {
        fn create_path(&mut self, segs: &[PathSeg]) -> io::Result<PathId> {
            self.paths.push(segs.to_vec());
            self.styles.push(None);
            Ok(self.paths.len() - 1)
        }

        fn set_path_data(&mut self, id: PathId, segs: &[PathSeg]) -> io::Result<()> {
            self.paths[id] = segs.to_vec();
            Ok(())
        }

        fn set_style(&mut self, id: PathId, style: PathStyle) -> io::Result<()> {
            self.styles[id] = Some(style);
            Ok(())
        }

        fn remove_path(&mut self, id: PathId) -> io::Result<()> {
            self.paths[id].clear();
            Ok(())
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sprout_thins_and_evolves() {
        let mut canvas = RecordingCanvas::default();
        let tip = BranchTip::seed(10.0, 20.0);
        let cursor = BranchCursor::sprout(&mut canvas, &tip, &mut Silent).unwrap();

        let snap = cursor.snapshot(0.0);
        assert!(close(snap.thickness, 4.0));
        assert!(close(snap.shade.hue, (0.15f64 * HUE_GROWTH).min(MAX_HUE)));

        // Registration: one zero-length path, styled, no stroke yet.
        assert_eq!(canvas.paths.len(), 1);
        assert_eq!(canvas.paths[0], vec![PathSeg::MoveTo(10.0, 20.0)]);
        let style = canvas.styles[0].unwrap();
        assert!(close(style.stroke_width, 4.0));
    }

    #[test]
    fn thickness_never_drops_below_floor() {
        let mut canvas = RecordingCanvas::default();
        let mut tip = BranchTip::seed(0.0, 0.0);
        for _ in 0..20 {
            let cursor = BranchCursor::sprout(&mut canvas, &tip, &mut Silent).unwrap();
            tip = cursor.snapshot(0.0);
        }
        assert!(close(tip.thickness, MIN_THICKNESS));
    }

    #[test]
    fn advance_moves_along_heading_and_returns_prior() {
        let mut canvas = RecordingCanvas::default();
        let tip = BranchTip::seed(100.0, 100.0);
        let mut cursor = BranchCursor::sprout(&mut canvas, &tip, &mut Silent).unwrap();

        let prior = cursor.advance(&mut canvas, 40.0, 0.0).unwrap();
        assert!(close(prior.x, 100.0) && close(prior.y, 100.0));
        assert!(close(prior.heading, -90.0));

        let now = cursor.snapshot(0.0);
        assert!(close(now.x, 100.0));
        assert!(close(now.y, 60.0), "heading -90 moves straight up");

        assert_eq!(
            canvas.paths[0].last(),
            Some(&PathSeg::LineTo(now.x, now.y))
        );
    }

    #[test]
    fn snapshot_is_a_pure_read() {
        let mut canvas = RecordingCanvas::default();
        let tip = BranchTip::seed(0.0, 0.0);
        let cursor = BranchCursor::sprout(&mut canvas, &tip, &mut Silent).unwrap();

        let turned = cursor.snapshot(25.0);
        assert!(close(turned.heading, -65.0));
        assert!(close(cursor.snapshot(0.0).heading, -90.0));
    }

    #[test]
    fn rewind_starts_a_disconnected_subpath() {
        let mut canvas = RecordingCanvas::default();
        let tip = BranchTip::seed(0.0, 0.0);
        let mut cursor = BranchCursor::sprout(&mut canvas, &tip, &mut Silent).unwrap();

        let prior = cursor.advance(&mut canvas, 10.0, 0.0).unwrap();
        cursor.advance(&mut canvas, 10.0, -25.0).unwrap();
        cursor.rewind(&mut canvas, &prior).unwrap();

        let back = cursor.snapshot(0.0);
        assert!(close(back.x, prior.x) && close(back.y, prior.y));
        assert!(close(back.heading, prior.heading));
        assert_eq!(
            canvas.paths[0].last(),
            Some(&PathSeg::MoveTo(prior.x, prior.y)),
            "rewind appends MoveTo, never a stroked segment"
        );
    }
}
