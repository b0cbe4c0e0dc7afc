use crate::branch::{BranchCursor, BranchTip};
use crate::canvas::Canvas;
use crate::noise::NoiseSource;
use std::io;

pub const DEFAULT_ANGLE: f64 = 25.0;
pub const STEP_DECAY: f64 = 0.75;

/// Owns the wavefront of pending branch tips and applies the fixed
/// four-child rewrite rule to all of them, once per generation. Tips
/// quadruple each generation while the step length shrinks geometrically,
/// so the figure converges instead of growing without bound.
pub struct GrowthEngine {
    wavefront: Vec<BranchTip>,
    step_length: f64,
    angle_delta: f64,
}

impl GrowthEngine {
    pub fn new(seed: BranchTip, step_length: f64, angle_delta: f64) -> Self {
        Self {
            wavefront: vec![seed],
            step_length,
            angle_delta,
        }
    }

    /// Seed a figure for a `width` x `height` surface: bottom-center start,
    /// step length an eighth of the smaller dimension.
    pub fn seeded(width: f64, height: f64, angle_delta: f64) -> Self {
        Self::new(
            BranchTip::seed(width / 2.0, height),
            width.min(height) / 8.0,
            angle_delta,
        )
    }

    pub fn wavefront(&self) -> &[BranchTip] {
        &self.wavefront
    }

    /// Apply the rewrite rule to every tip in the wavefront. Each tip grows a
    /// short curved branching unit and emits exactly four child tips; the
    /// wavefront is replaced wholesale with the emissions, in order. An empty
    /// wavefront is terminal and a no-op, not an error.
    pub fn grow_one_generation(
        &mut self,
        canvas: &mut dyn Canvas,
        noise: &mut dyn NoiseSource,
    ) -> io::Result<()> {
        if self.wavefront.is_empty() {
            return Ok(());
        }

        // This is the only place drawables come into being; pending tips
        // never cost the canvas anything until they actually grow.
        let mut cursors = self
            .wavefront
            .iter()
            .map(|tip| BranchCursor::sprout(canvas, tip, noise))
            .collect::<io::Result<Vec<_>>>()?;

        let step = self.step_length;
        let angle = self.angle_delta;
        let mut next = Vec::with_capacity(cursors.len() * 4);

        for cursor in &mut cursors {
            // Main stem forward, then a near-straight continuation and a
            // right-turned sibling at the stem tip.
            cursor.advance(canvas, step, 0.0)?;
            next.push(cursor.snapshot(noise.sample(10.0)));
            next.push(cursor.snapshot(-angle + noise.sample(0.75)));

            // Curve rightward twice; keep the point before the second bend.
            cursor.advance(canvas, step / 2.0, -angle)?;
            let prior = cursor.advance(canvas, step / 4.0, -angle)?;
            next.push(cursor.snapshot(noise.sample(10.0)));

            // Pop back (no connector drawn) and emit the left-turned sibling.
            cursor.rewind(canvas, &prior)?;
            next.push(cursor.snapshot(2.0 * angle + noise.sample(0.75)));
        }

        self.wavefront = next;
        self.step_length *= STEP_DECAY;
        Ok(())
    }
}
