//! Writes rendered frames to disk.  Images are encoded into memory
//! first and written out in one go, so a failed encode never leaves a
//! half-written file behind.
use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::png::PngEncoder;
use image::{Delay, ExtendedColorType, ImageEncoder, ImageError, Rgba};
use log::info;
use std::fs;
use std::path::Path;

use crate::errors::RenderError;
use crate::palette::Palette;
use crate::render::Frame;
use crate::sequence::Sequence;

fn encode_error(path: &Path) -> impl FnOnce(ImageError) -> RenderError + '_ {
    move |cause| RenderError::Encode {
        path: path.display().to_string(),
        cause,
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    fs::write(path, bytes).map_err(|cause| RenderError::Io {
        path: path.display().to_string(),
        cause,
    })?;
    info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Encode a single frame as a PNG.
pub fn encode_png(frame: &Frame<Rgba<u8>>) -> Result<Vec<u8>, ImageError> {
    let image = frame.to_image();
    let mut bytes = vec![];
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Encode a paletted sequence as an endlessly looping GIF.  Frames are
/// expanded back into palette colors one at a time as they are
/// written.
pub fn encode_gif(sequence: &Sequence<u8>, palette: &Palette) -> Result<Vec<u8>, ImageError> {
    let mut bytes = vec![];
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        encoder.set_repeat(Repeat::Infinite)?;
        for frame in &sequence.frames {
            encoder.encode_frame(image::Frame::from_parts(
                frame.to_image(palette),
                0,
                0,
                Delay::from_numer_denom_ms(sequence.delay_ms, 1),
            ))?;
        }
    }
    Ok(bytes)
}

/// Encode `frame` as a PNG and write it to `path`.
pub fn write_png(path: &Path, frame: &Frame<Rgba<u8>>) -> Result<(), RenderError> {
    let bytes = encode_png(frame).map_err(encode_error(path))?;
    write_bytes(path, &bytes)
}

/// Encode `sequence` as an animated GIF and write it to `path`.
pub fn write_gif(path: &Path, sequence: &Sequence<u8>, palette: &Palette) -> Result<(), RenderError> {
    let bytes = encode_gif(sequence, palette).map_err(encode_error(path))?;
    write_bytes(path, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::{Escape, EscapeFunction};
    use crate::palette::LinearScale;
    use crate::planes::{PlaneMapper, Viewport};
    use crate::render::render_single;
    use crate::sequence::{render_sequence, Sweep};
    use image::codecs::gif::GifDecoder;
    use image::AnimationDecoder;
    use std::io::Cursor;

    fn still() -> Frame<Rgba<u8>> {
        let plane = PlaneMapper::new(&Viewport::square(6)).unwrap();
        let escape = Escape::new(EscapeFunction::default(), 100).unwrap();
        render_single(&plane, &escape, &LinearScale::default())
    }

    #[test]
    fn png_decodes_to_the_same_pixels() {
        let frame = still();
        let bytes = encode_png(&frame).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (6, 6));
        assert_eq!(decoded.into_raw(), frame.to_image().into_raw());
    }

    #[test]
    fn gif_holds_every_frame() {
        let plane = PlaneMapper::new(&Viewport::square(5)).unwrap();
        let palette = Palette::default();
        let sweep = Sweep::new(0.0, 0.3, 0.1).unwrap();
        let sequence = render_sequence(&plane, 20, &palette, &sweep, 1, |_| {}).unwrap();
        let bytes = encode_gif(&sequence, &palette).unwrap();
        let frames = GifDecoder::new(Cursor::new(bytes))
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].buffer().dimensions(), (5, 5));
    }

    #[test]
    fn png_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("still.png");
        write_png(&path, &still()).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (6, 6));
    }

    #[test]
    fn unwritable_paths_report_and_leave_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("still.png");
        match write_png(&path, &still()) {
            Err(RenderError::Io { path: reported, .. }) => {
                assert!(reported.ends_with("still.png"))
            }
            other => panic!("expected an I/O error, got {:?}", other),
        }
        assert!(!path.exists());
    }
}
