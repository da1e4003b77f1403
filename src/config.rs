//! Render settings.  Everything a render needs travels in one
//! immutable value instead of living in globals, so several renders
//! with different settings can run side by side.
use num::Complex;

use crate::errors::RenderError;
use crate::escape::{Escape, EscapeFunction};
use crate::palette::{LinearScale, Palette, PRIMARIES};
use crate::planes::{PlaneMapper, Viewport};

/// Default width of the still image.
pub const STILL_WIDTH: usize = 750;
/// Default iteration budget of the still image.
pub const STILL_ITERATIONS: usize = 100;
/// Default file name of the still image.
pub const STILL_OUTPUT: &str = "Mandelbrot.png";

/// Default width of the animation.  Every frame is kept in memory
/// until the GIF is written, so this is smaller than the still.
pub const ANIMATION_WIDTH: usize = 250;
/// Default iteration budget of each animation frame.
pub const ANIMATION_ITERATIONS: usize = 200;
/// Default file name of the animation.
pub const ANIMATION_OUTPUT: &str = "mandelbrot-complex-polynomial-2.gif";

/// Where to look, how hard, how to color it, and how many threads to
/// spend doing it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// The region of the complex plane and the image width.
    pub viewport: Viewport,
    /// Iteration budget per point.
    pub max_iterations: usize,
    /// Color at a score of 1.0.
    pub scale: LinearScale,
    /// Worker threads; 1 renders on the calling thread.
    pub threads: usize,
}

impl RenderConfig {
    /// The single PNG: 750 pixels over -2-2i..2+2i, 100 iterations.
    pub fn still() -> Self {
        RenderConfig {
            viewport: Viewport::square(STILL_WIDTH),
            max_iterations: STILL_ITERATIONS,
            scale: LinearScale::default(),
            threads: 1,
        }
    }

    /// The animated GIF: 250 pixels over -2-2i..2+2i, 200 iterations.
    pub fn animation() -> Self {
        RenderConfig {
            viewport: Viewport::square(ANIMATION_WIDTH),
            max_iterations: ANIMATION_ITERATIONS,
            ..RenderConfig::still()
        }
    }

    /// Same settings, different corners of the plane.
    pub fn with_corners(self, leftlower: Complex<f64>, rightupper: Complex<f64>) -> Self {
        RenderConfig {
            viewport: Viewport {
                leftlower,
                rightupper,
                ..self.viewport
            },
            ..self
        }
    }

    /// Validate the viewport and build the mapper for it.
    pub fn plane(&self) -> Result<PlaneMapper, RenderError> {
        if self.max_iterations == 0 {
            return Err(RenderError::InvalidIterations);
        }
        PlaneMapper::new(&self.viewport)
    }

    /// The escape parameters for a given recurrence.
    pub fn escape(&self, function: EscapeFunction) -> Result<Escape, RenderError> {
        Escape::new(function, self.max_iterations)
    }

    /// The eight-color palette, quantizing this configuration's tint.
    pub fn palette(&self) -> Palette {
        Palette::new(&PRIMARIES, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_matches_the_classic_render() {
        let config = RenderConfig::still();
        let plane = config.plane().unwrap();
        assert_eq!((plane.width(), plane.height()), (750, 750));
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.scale, LinearScale::default());
        assert_eq!(config.threads, 1);
    }

    #[test]
    fn animation_keeps_the_still_tint() {
        let config = RenderConfig::animation();
        assert_eq!(config.max_iterations, 200);
        assert_eq!(config.viewport.width, 250);
        assert_eq!(config.scale, RenderConfig::still().scale);
        assert_eq!(config.palette(), Palette::default());
    }

    #[test]
    fn zero_iterations_are_refused() {
        let config = RenderConfig {
            max_iterations: 0,
            ..RenderConfig::still()
        };
        assert!(config.plane().is_err());
        assert!(config.escape(EscapeFunction::default()).is_err());
    }

    #[test]
    fn corners_can_be_moved() {
        let config = RenderConfig::still()
            .with_corners(Complex::new(-2.5, -1.0), Complex::new(1.0, 1.0));
        assert_eq!(config.viewport.width, 750);
        let plane = config.plane().unwrap();
        assert_eq!(plane.height(), 429);
        let inverted = RenderConfig::still()
            .with_corners(Complex::new(1.0, 1.0), Complex::new(-2.5, -1.0));
        assert!(inverted.plane().is_err());
    }

    #[test]
    fn configurations_do_not_share_state() {
        let a = RenderConfig::still();
        let b = RenderConfig {
            threads: 4,
            ..RenderConfig::still()
        };
        assert_eq!(a.threads, 1);
        assert_eq!(b.threads, 4);
        assert_eq!(
            a.escape(EscapeFunction::default()).unwrap(),
            Escape::new(EscapeFunction::default(), 100).unwrap()
        );
    }
}
