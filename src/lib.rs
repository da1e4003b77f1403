#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time renderer
//!
//! Every pixel of the image is mapped to a point `c` on the complex
//! plane, and `c` is iterated through some recurrence, starting from
//! `z = c`, until the orbit leaves the disk of radius 2 or runs out of
//! iterations.  How many iterations it survived becomes a score
//! between 0 and 1, and the score becomes a color.
//!
//! Two recurrences are provided.  The still image iterates `z^p + c`
//! with the odd fixed exponent `p = -2 - 1.234i`, and is colored by a
//! linear tint.  The animation iterates `z^(n+1) + n*z^2 + c`,
//! sweeping `n` from 0 to 10, one paletted frame per value.

pub mod config;
pub mod errors;
pub mod escape;
pub mod palette;
pub mod planes;
pub mod render;
pub mod sequence;
pub mod sink;

pub use config::RenderConfig;
pub use errors::RenderError;
pub use escape::{Escape, EscapeFunction};
pub use palette::{ColorMapper, LinearScale, Palette};
pub use planes::{Pixel, PlaneMapper, Viewport};
pub use render::{render, render_single, Frame};
pub use sequence::{render_sequence, Sequence, Sweep};
