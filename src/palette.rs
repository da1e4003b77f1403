//! Turning a score into a pixel.  The still renderer scales a fixed
//! tint linearly by the score; the animation renderer does the same
//! and then snaps the result to the closest of eight primary colors,
//! so that every frame of the GIF shares one small palette.
use image::{Rgb, Rgba};
use num::clamp;

/// Anything that can color a pixel given its escape score.  The
/// renderer is generic over this, and hands it out to several worker
/// threads at once.
pub trait ColorMapper: Sync {
    /// What ends up in the frame buffer.
    type Pixel: Copy + Send + Sync;

    /// Color one pixel.  `score` lies in `[0, 1]`.
    fn color(&self, score: f64) -> Self::Pixel;
}

/// Per-channel maxima; a pixel is the score times these, truncated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearScale {
    /// Red at a score of 1.0.
    pub red: f64,
    /// Green at a score of 1.0.
    pub green: f64,
    /// Blue at a score of 1.0.
    pub blue: f64,
}

impl Default for LinearScale {
    fn default() -> Self {
        LinearScale {
            red: 230.0,
            green: 235.0,
            blue: 255.0,
        }
    }
}

impl LinearScale {
    /// The opaque color for a score.
    pub fn rgba(&self, score: f64) -> Rgba<u8> {
        let channel = |max: f64| clamp(max * score, 0.0, 255.0) as u8;
        Rgba([
            channel(self.red),
            channel(self.green),
            channel(self.blue),
            255,
        ])
    }
}

impl ColorMapper for LinearScale {
    type Pixel = Rgba<u8>;

    fn color(&self, score: f64) -> Rgba<u8> {
        self.rgba(score)
    }
}

/// Black, blue, green, cyan, red, magenta, yellow, white.
pub const PRIMARIES: [Rgb<u8>; 8] = [
    Rgb([0, 0, 0]),
    Rgb([0, 0, 255]),
    Rgb([0, 255, 0]),
    Rgb([0, 255, 255]),
    Rgb([255, 0, 0]),
    Rgb([255, 0, 255]),
    Rgb([255, 255, 0]),
    Rgb([255, 255, 255]),
];

/// A small fixed palette.  Scores are colored with a `LinearScale`
/// and then quantized to the entry with the smallest squared
/// Euclidean distance in RGB.  Ties go to the earlier entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb<u8>>,
    scale: LinearScale,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::new(&PRIMARIES, LinearScale::default())
    }
}

impl Palette {
    /// Build a palette.  Only the first 256 colors can be indexed; an
    /// empty list falls back to the primaries.
    pub fn new(colors: &[Rgb<u8>], scale: LinearScale) -> Self {
        let colors = if colors.is_empty() {
            PRIMARIES.to_vec()
        } else {
            colors.iter().take(256).cloned().collect()
        };
        Palette { colors, scale }
    }

    /// The entries, in index order.
    pub fn colors(&self) -> &[Rgb<u8>] {
        &self.colors
    }

    /// The index of the entry closest to `color`.  Alpha is ignored.
    pub fn nearest(&self, color: Rgba<u8>) -> u8 {
        let distance = |entry: &Rgb<u8>| -> u32 {
            entry
                .0
                .iter()
                .zip(color.0.iter())
                .map(|(&a, &b)| {
                    let d = i32::from(a) - i32::from(b);
                    (d * d) as u32
                })
                .sum()
        };

        let mut best = 0;
        let mut best_distance = u32::MAX;
        for (index, entry) in self.colors.iter().enumerate() {
            let d = distance(entry);
            if d < best_distance {
                best = index;
                best_distance = d;
            }
        }
        best as u8
    }

    /// The opaque color stored at `index`.  Out-of-range indices read
    /// as the first entry.
    pub fn lookup(&self, index: u8) -> Rgba<u8> {
        let Rgb([r, g, b]) = self
            .colors
            .get(index as usize)
            .cloned()
            .unwrap_or(self.colors[0]);
        Rgba([r, g, b, 255])
    }
}

impl ColorMapper for Palette {
    type Pixel = u8;

    fn color(&self, score: f64) -> u8 {
        self.nearest(self.scale.rgba(score))
    }
}
