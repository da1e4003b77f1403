//! The failure modes of a render.  Only the sinks touch the outside
//! world; everything else fails only on a bad configuration.
use failure::Fail;

/// Everything that can go wrong between a configuration and a file on
/// disk.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The viewport describes an empty or inverted region of the plane.
    #[fail(display = "invalid viewport: {}", _0)]
    InvalidViewport(String),

    /// An iteration budget of zero would make every score undefined.
    #[fail(display = "the iteration budget must be at least 1")]
    InvalidIterations,

    /// The parameter sweep cannot produce an ascending sequence.
    #[fail(display = "invalid sweep: {}", _0)]
    InvalidSweep(String),

    /// One of the scoped worker threads panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// The image library refused the frame or frames.
    #[fail(display = "could not encode {}: {}", path, cause)]
    Encode {
        /// Where the image was headed.
        path: String,
        /// What the encoder reported.
        #[cause]
        cause: image::ImageError,
    },

    /// The encoded image could not be written out.
    #[fail(display = "could not write {}: {}", path, cause)]
    Io {
        /// Where the image was headed.
        path: String,
        /// What the filesystem reported.
        #[cause]
        cause: std::io::Error,
    },
}
