use crate::{
    background::paint_background,
    config::ResizePolicy,
    foundation::{
        core::{Canvas, FrameIndex},
        error::KandinskyResult,
    },
    motif::{Easing, Motif, StepCtx, Steppable},
    render::{CpuRasterizer, DrawList, FrameRGBA, Surface},
    session::SessionState,
};

/// Owns every surface and assembles one frame per tick.
///
/// Stacking order: background, background ink, anchor markers, skeletons, ornaments,
/// foreground ink. Live animations are stepped after the frame is assembled, so a
/// fragment drawn on tick `n` shows from tick `n + 1`.
#[derive(Debug)]
pub struct FrameCompositor {
    raster: CpuRasterizer,
    background: Surface,
    ink: Surface,
    fg_ink: Surface,
    frame_surface: Surface,
    frame: FrameRGBA,
    frame_index: FrameIndex,
    shapes_dl: DrawList,
    ink_dl: DrawList,
    fg_dl: DrawList,
}

impl FrameCompositor {
    pub fn new(state: &SessionState) -> KandinskyResult<Self> {
        let canvas = state.canvas();
        let mut raster = CpuRasterizer::new();
        let background = paint_background(state.config().background, state.background_seed(), canvas, &mut raster)?;
        Ok(Self {
            raster,
            background,
            ink: Surface::new(canvas)?,
            fg_ink: Surface::new(canvas)?,
            frame_surface: Surface::new(canvas)?,
            frame: FrameRGBA::blank(canvas),
            frame_index: FrameIndex(0),
            shapes_dl: DrawList::new(),
            ink_dl: DrawList::new(),
            fg_dl: DrawList::new(),
        })
    }

    pub fn frame_index(&self) -> FrameIndex {
        self.frame_index
    }

    /// Last assembled frame.
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    pub fn background(&self) -> &Surface {
        &self.background
    }

    pub fn ink(&self) -> &Surface {
        &self.ink
    }

    pub fn foreground_ink(&self) -> &Surface {
        &self.fg_ink
    }

    /// Assemble a frame from `state`, then advance and prune its live animations.
    ///
    /// A finished composition is still drawn but nothing advances any more.
    #[tracing::instrument(skip_all, fields(frame = self.frame_index.0 + 1))]
    pub fn tick(&mut self, state: &mut SessionState) -> KandinskyResult<&FrameRGBA> {
        self.frame_index = self.frame_index.next();
        let ctx = StepCtx::new(self.frame_index, state.load());
        let running = !state.is_finished();

        self.frame_surface.copy_from(&self.background)?;
        self.frame_surface.over(&self.ink)?;

        self.shapes_dl.clear();
        state
            .anchors
            .draw_markers(&mut self.shapes_dl, state.config.anchor_marker_radius);
        for shape in state.skeletons.iter_mut().chain(state.ornaments.iter_mut()) {
            if running {
                shape.advance(&ctx);
            }
            shape.draw(&mut self.shapes_dl);
        }
        self.raster.render(&self.shapes_dl, &mut self.frame_surface)?;
        self.frame_surface.over(&self.fg_ink)?;

        if running {
            self.ink_dl.clear();
            self.fg_dl.clear();
            step_and_prune(&mut state.line_anims, &ctx, &mut self.ink_dl);
            let completed = step_and_prune(&mut state.lattice_anims, &ctx, &mut self.ink_dl);
            step_and_prune(&mut state.foreground_anims, &ctx, &mut self.fg_dl);
            if completed > 0 {
                state.counters.lattices_completed += completed;
                tracing::debug!(total = state.counters.lattices_completed, "lattice completed");
            }
            self.raster.render(&self.ink_dl, &mut self.ink)?;
            self.raster.render(&self.fg_dl, &mut self.fg_ink)?;
            state.check_lifecycle();
        }

        self.frame_surface.write_frame(&mut self.frame);
        Ok(&self.frame)
    }

    /// Follow a session reset: clear the ink layers and repaint the backdrop.
    pub fn reset(&mut self, state: &SessionState) -> KandinskyResult<()> {
        let canvas = state.canvas();
        if canvas != self.background.canvas() {
            self.ink = Surface::new(canvas)?;
            self.fg_ink = Surface::new(canvas)?;
            self.frame_surface = Surface::new(canvas)?;
        } else {
            self.ink.clear();
            self.fg_ink.clear();
        }
        self.background = self.repaint_background(state, canvas)?;
        self.frame = FrameRGBA::blank(canvas);
        self.frame_index = FrameIndex(0);
        Ok(())
    }

    /// Follow a session resize. Ink is rescaled or dropped according to the policy, and
    /// the backdrop is regenerated from the session's background seed.
    pub fn resize(&mut self, state: &SessionState) -> KandinskyResult<()> {
        let canvas = state.canvas();
        match state.config().resize {
            ResizePolicy::Preserve => {
                self.ink = self.ink.resampled(canvas)?;
                self.fg_ink = self.fg_ink.resampled(canvas)?;
            }
            ResizePolicy::Reset => {
                self.ink = Surface::new(canvas)?;
                self.fg_ink = Surface::new(canvas)?;
                self.frame_index = FrameIndex(0);
            }
        }
        self.frame_surface = Surface::new(canvas)?;
        self.background = self.repaint_background(state, canvas)?;
        self.frame = FrameRGBA::blank(canvas);
        Ok(())
    }

    fn repaint_background(&mut self, state: &SessionState, canvas: Canvas) -> KandinskyResult<Surface> {
        paint_background(state.config().background, state.background_seed(), canvas, &mut self.raster)
    }
}

/// Step every motif in reverse order, removing those that finish. Returns how many finished.
pub fn step_and_prune(list: &mut Vec<Motif>, ctx: &StepCtx, dl: &mut DrawList) -> u32 {
    let mut finished = 0;
    for i in (0..list.len()).rev() {
        if !list[i].step(ctx, dl) {
            list.remove(i);
            finished += 1;
        }
    }
    finished
}

#[cfg(test)]
#[path = "../tests/unit/compositor.rs"]
mod tests;
