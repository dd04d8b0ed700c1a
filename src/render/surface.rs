use image::imageops::FilterType;

use crate::{
    foundation::{
        core::{Canvas, Rgba8Premul},
        error::{KandinskyError, KandinskyResult},
    },
    render::composite,
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are premultiplied alpha; the flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn blank(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.pixel_len() * 4],
            premultiplied: true,
        }
    }

    /// Straight-alpha copy of the pixels, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            composite::unpremultiply_in_place(&mut out);
        }
        out
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Owned premultiplied RGBA8 raster.
pub struct Surface {
    canvas: Canvas,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl Surface {
    pub fn new(canvas: Canvas) -> KandinskyResult<Self> {
        let (w, h) = extent_u16(canvas)?;
        Ok(Self {
            canvas,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub fn clear(&mut self) {
        self.fill(Rgba8Premul::transparent());
    }

    pub fn fill(&mut self, color: Rgba8Premul) {
        let rgba = color.to_array();
        for px in self.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn copy_from(&mut self, src: &Surface) -> KandinskyResult<()> {
        if src.canvas != self.canvas {
            return Err(KandinskyError::render("copy_from expects equal surface extents"));
        }
        self.data_mut().copy_from_slice(src.data());
        Ok(())
    }

    pub fn over(&mut self, src: &Surface) -> KandinskyResult<()> {
        composite::premul_over_in_place(self.data_mut(), src.data())
    }

    pub fn multiply(&mut self, src: &Surface) -> KandinskyResult<()> {
        composite::premul_multiply_in_place(self.data_mut(), src.data())
    }

    /// Nearest-neighbour copy of this surface at a new extent.
    pub fn resampled(&self, canvas: Canvas) -> KandinskyResult<Surface> {
        let mut out = Surface::new(canvas)?;
        let src = image::RgbaImage::from_raw(
            self.canvas.width,
            self.canvas.height,
            self.data().to_vec(),
        )
        .ok_or_else(|| KandinskyError::render("surface buffer does not match its extent"))?;
        let scaled =
            image::imageops::resize(&src, canvas.width, canvas.height, FilterType::Nearest);
        out.data_mut().copy_from_slice(scaled.as_raw());
        Ok(out)
    }

    pub fn write_frame(&self, frame: &mut FrameRGBA) {
        frame.width = self.canvas.width;
        frame.height = self.canvas.height;
        frame.premultiplied = true;
        frame.data.clear();
        frame.data.extend_from_slice(self.data());
    }

    pub fn to_frame(&self) -> FrameRGBA {
        let mut frame = FrameRGBA::blank(self.canvas);
        self.write_frame(&mut frame);
        frame
    }
}

pub(crate) fn extent_u16(canvas: Canvas) -> KandinskyResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| KandinskyError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| KandinskyError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
