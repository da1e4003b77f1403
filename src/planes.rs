//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane whose left-lower corner sits
//! at pixel 0,0.  Only the width of the integral plane is chosen; the
//! height falls out of the aspect ratio of the complex rectangle, so
//! a pixel is always square.
use num::Complex;

use crate::errors::RenderError;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.  For that reason,
/// the lower-left-hand corner is not included.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// Describes the x, y of a point in a region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The region of the complex plane to draw, and how many pixels wide
/// the drawing should be.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real-min, imaginary-min.
    pub leftlower: Complex<f64>,
    /// Real-max, imaginary-max.
    pub rightupper: Complex<f64>,
    /// Width of the output image in pixels.
    pub width: usize,
}

impl Viewport {
    /// The classic square view of the whole set, -2-2i to 2+2i.
    pub fn square(width: usize) -> Self {
        Viewport {
            leftlower: Complex::new(-2.0, -2.0),
            rightupper: Complex::new(2.0, 2.0),
            width,
        }
    }
}

/// Maps pixels on an integral plane to points on the complex plane
/// and back again.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneMapper {
    /// The right-upper hand corner of the integral cartesian plane.
    /// The left-lower is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the complex cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
    // Pixels per unit of the complex plane, on both axes.
    scale: f64,
}

impl PlaneMapper {
    /// Validates the viewport and derives the height of the integral
    /// plane from it.
    pub fn new(viewport: &Viewport) -> Result<PlaneMapper, RenderError> {
        let Viewport {
            leftlower,
            rightupper,
            width,
        } = *viewport;

        // Written as negations so that NaN corners are refused too.
        if !(rightupper.re > leftlower.re) {
            return Err(RenderError::InvalidViewport(
                "the left lower corner is not to the left of the right upper corner".to_string(),
            ));
        }

        if !(rightupper.im > leftlower.im) {
            return Err(RenderError::InvalidViewport(
                "the left lower corner is not lower than the right upper corner".to_string(),
            ));
        }

        if width == 0 {
            return Err(RenderError::InvalidViewport(
                "the image must be at least one pixel wide".to_string(),
            ));
        }

        let scale = (width as f64) / (rightupper.re - leftlower.re);
        let height = (scale * (rightupper.im - leftlower.im)).round();
        if !scale.is_finite() || !height.is_finite() || height < 1.0 {
            return Err(RenderError::InvalidViewport(format!(
                "a {} pixel wide image of this region has no usable height",
                width
            )));
        }

        // Image buffers address pixels with u32 on each side.
        let limit = u32::MAX as f64;
        if width as f64 > limit || height > limit {
            return Err(RenderError::InvalidViewport(format!(
                "a {}x{} image is larger than an image buffer can hold",
                width, height
            )));
        }
        let height = height as usize;
        if width.checked_mul(height).is_none() {
            return Err(RenderError::InvalidViewport(format!(
                "{}x{} pixels do not fit in memory",
                width, height
            )));
        }

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane: ComplexPlane(leftlower, rightupper),
            scale,
        })
    }

    /// Width of the integral plane.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Derived height of the integral plane.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a complex number corresponding to a location on the
    /// complex cartesian plane, map that as closely as possible to a
    /// point on the integral cartesian plane.  Offsets are truncated.
    /// Points outside the rectangle spanned by the viewport's corners
    /// have no pixel; the corners themselves do.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let left = (point.re - self.complex_plane.0.re) * self.scale;
        let top = (point.im - self.complex_plane.0.im) * self.scale;
        let inside = |offset: f64, extent: usize| offset >= 0.0 && offset <= extent as f64;
        if inside(left, self.width()) && inside(top, self.height()) {
            Some(Pixel(left as usize, top as usize))
        } else {
            None
        }
    }

    /// Given a pixel on the integral cartesian plane, map that as
    /// closely as possible to a point on the complex cartesian plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            (pixel.0 as f64) / self.scale + self.complex_plane.0.re,
            (pixel.1 as f64) / self.scale + self.complex_plane.0.im,
        )
    }
}
