//! Renders one frame: every pixel of the integral plane is mapped to
//! the complex plane, iterated, scored and colored.  Pixels don't
//! depend on one another, so the threaded version just hands each
//! worker its own band of rows to fill in.
use image::{Rgba, RgbaImage};
use itertools::iproduct;
use log::{debug, info};

use crate::errors::RenderError;
use crate::escape::Escape;
use crate::palette::{ColorMapper, Palette};
use crate::planes::{Pixel, PlaneMapper};

/// A fully rendered grid of pixels, stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<P> {
    /// Pixels per row.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// `width * height` pixels; `(x, y)` lives at `y * width + x`.
    pub pixels: Vec<P>,
}

impl<P: Copy> Frame<P> {
    /// The pixel at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<P> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }
}

impl Frame<Rgba<u8>> {
    /// Copy the frame into an image buffer the encoders understand.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            self.pixels[y as usize * self.width + x as usize]
        })
    }
}

impl Frame<u8> {
    /// Expand palette indices back into colors.
    pub fn to_image(&self, palette: &Palette) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            palette.lookup(self.pixels[y as usize * self.width + x as usize])
        })
    }
}

/// Fill `band`, which holds whole rows starting at `first_row`.
fn render_band<M: ColorMapper>(
    plane: &PlaneMapper,
    escape: &Escape,
    mapper: &M,
    first_row: usize,
    band: &mut [M::Pixel],
) {
    let width = plane.width();
    for (offset, pixel) in band.iter_mut().enumerate() {
        let point = plane.pixel_to_point(&Pixel(offset % width, first_row + offset / width));
        *pixel = mapper.color(escape.score(point));
    }
}

/// Render a whole frame on the calling thread.
pub fn render_single<M: ColorMapper>(
    plane: &PlaneMapper,
    escape: &Escape,
    mapper: &M,
) -> Frame<M::Pixel> {
    let mut pixels = Vec::with_capacity(plane.len());
    for (row, column) in iproduct!(0..plane.height(), 0..plane.width()) {
        let point = plane.pixel_to_point(&Pixel(column, row));
        pixels.push(mapper.color(escape.score(point)));
    }
    Frame {
        width: plane.width(),
        height: plane.height(),
        pixels,
    }
}

/// Render a whole frame, splitting the rows into at most `threads`
/// contiguous bands, one scoped worker each.  The result is identical
/// to `render_single` whatever the thread count.
pub fn render<M: ColorMapper>(
    plane: &PlaneMapper,
    escape: &Escape,
    mapper: &M,
    threads: usize,
) -> Result<Frame<M::Pixel>, RenderError> {
    info!(
        "rendering {}x{} of {} with {} thread(s)",
        plane.width(),
        plane.height(),
        escape.function(),
        threads
    );

    if threads <= 1 || plane.height() <= 1 {
        return Ok(render_single(plane, escape, mapper));
    }

    let width = plane.width();
    let rows_per_band = (plane.height() + threads - 1) / threads;
    let mut pixels = vec![mapper.color(0.0); plane.len()];

    crossbeam::scope(|spawner| {
        for (index, band) in pixels.chunks_mut(rows_per_band * width).enumerate() {
            let first_row = index * rows_per_band;
            debug!("band {} starts at row {}", index, first_row);
            spawner.spawn(move |_| render_band(plane, escape, mapper, first_row, band));
        }
    })
    .map_err(|_| RenderError::WorkerPanicked)?;

    Ok(Frame {
        width,
        height: plane.height(),
        pixels,
    })
}
