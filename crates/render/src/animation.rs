//! Frame sequencing and per-frame parameter interpolation.
//!
//! A still image is a one-frame sequence built from the base configuration.
//! An animation of `n` frames maps frame `f` to position
//! `t = f / (n - 1)` (or `0` when `n == 1`) and interpolates the animated
//! parameters at `t`. Frames carry no state between them; they are rendered
//! and delivered strictly in index order.

use std::time::Instant;

use fractal_core::{Fractal, FractalParams, RenderConfig, RenderError, ViewTransform};
use serde_json::{json, Value};

use crate::frame::render_frame;
use crate::pixel::Raster;

/// Resolved parameters for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePlan {
    pub index: usize,
    /// Normalized position in [0, 1].
    pub position: f64,
    pub fractal: FractalParams,
    pub view: ViewTransform,
}

impl FramePlan {
    /// Summary used for logging and `--json` output.
    pub fn to_json(&self) -> Value {
        json!({
            "frame": self.index,
            "position": self.position,
            "fractal": self.fractal.name(),
            "params": self.fractal.params(),
            "scale": [self.view.scale.x, self.view.scale.y],
        })
    }
}

/// Drives the frame renderer across a frame sequence.
pub struct AnimationDriver<'a> {
    config: &'a RenderConfig,
}

impl<'a> AnimationDriver<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// 1 for a still image, otherwise the configured frame count.
    pub fn frame_count(&self) -> usize {
        self.config.frame_count()
    }

    /// Normalized position of `frame` in the sequence.
    pub fn position(&self, frame: usize) -> f64 {
        let n = self.frame_count();
        if n > 1 {
            frame as f64 / (n - 1) as f64
        } else {
            0.0
        }
    }

    /// Resolves the fractal and view for `frame`.
    ///
    /// `frame` should be below [`frame_count`](Self::frame_count); larger
    /// indices extrapolate past the end values.
    pub fn plan(&self, frame: usize) -> FramePlan {
        debug_assert!(frame < self.frame_count(), "frame {frame} out of range");
        let position = self.position(frame);
        let mut fractal = self.config.fractal;
        let mut view = self.config.view;

        if let Some(anim) = &self.config.animation {
            if let Some(range) = &anim.coordinates {
                fractal = fractal.with_c(range.at(position, anim.interpolation));
            }
            if let Some(range) = &anim.scale {
                view = view.with_scale(range.at(position, anim.interpolation));
            }
        }

        FramePlan {
            index: frame,
            position,
            fractal,
            view,
        }
    }

    /// Plans for every frame, in order.
    pub fn plans(&self) -> impl Iterator<Item = FramePlan> + '_ {
        (0..self.frame_count()).map(move |f| self.plan(f))
    }

    /// Renders the raster for a resolved plan.
    pub fn render_plan(&self, plan: &FramePlan) -> Result<Raster, RenderError> {
        render_frame(
            self.config.width,
            self.config.height,
            &plan.view,
            &plan.fractal,
            &self.config.limits,
            &self.config.color,
        )
    }

    /// Renders frame `frame`.
    pub fn render(&self, frame: usize) -> Result<Raster, RenderError> {
        self.render_plan(&self.plan(frame))
    }

    /// Renders every frame in order, handing ownership of each finished
    /// raster to `sink`.
    ///
    /// Stops at the first error; frames already delivered are unaffected.
    /// Returns the number of frames delivered.
    pub fn run<E, S>(&self, mut sink: S) -> Result<usize, E>
    where
        E: From<RenderError>,
        S: FnMut(&FramePlan, Raster) -> Result<(), E>,
    {
        let total = self.frame_count();
        let started = Instant::now();
        for plan in self.plans() {
            tracing::debug!(plan = %plan.to_json(), "rendering frame");
            let frame_started = Instant::now();
            let raster = self.render_plan(&plan)?;
            sink(&plan, raster)?;

            let done = plan.index + 1;
            let elapsed = started.elapsed().as_secs_f64();
            let eta = elapsed / done as f64 * (total - done) as f64;
            tracing::info!(
                frame = done,
                total,
                percent = %format!("{:.2}", done as f64 / total as f64 * 100.0),
                frame_secs = %format!("{:.3}", frame_started.elapsed().as_secs_f64()),
                eta_secs = %format!("{eta:.1}"),
                "frame complete"
            );
        }
        Ok(total)
    }

    /// Renders the whole sequence into memory.
    pub fn render_all(&self) -> Result<Vec<Raster>, RenderError> {
        let mut frames = Vec::with_capacity(self.frame_count());
        self.run(|_, raster: Raster| -> Result<(), RenderError> {
            frames.push(raster);
            Ok(())
        })?;
        Ok(frames)
    }
}
