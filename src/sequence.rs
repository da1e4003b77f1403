//! Sweeps the parameter of the polynomial escape function across a
//! range and renders one frame per value.  The frames are what the
//! animated GIF is built from.
use log::{debug, info};
use std::sync::{Arc, Mutex};

use crossbeam::thread::ScopedJoinHandle;

use crate::errors::RenderError;
use crate::escape::{Escape, EscapeFunction};
use crate::palette::ColorMapper;
use crate::planes::PlaneMapper;
use crate::render::{render_single, Frame};

/// Longest sweep `Sweep::new` accepts.  Every frame is held in memory
/// until the animation is encoded.
pub const MAX_FRAMES: usize = 1_000_000;

/// An inclusive, evenly stepped range of parameter values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sweep {
    /// First value.
    pub start: f64,
    /// Last value, included when the step lands on it.
    pub end: f64,
    /// Distance between consecutive values.
    pub step: f64,
}

impl Default for Sweep {
    /// 0.00 to 10.00 in hundredths: 1001 values.
    fn default() -> Self {
        Sweep {
            start: 0.0,
            end: 10.0,
            step: 0.01,
        }
    }
}

impl Sweep {
    /// A validated sweep.
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self, RenderError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(RenderError::InvalidSweep(
                "both ends of the sweep must be finite".to_string(),
            ));
        }
        if !(step > 0.0) || !step.is_finite() {
            return Err(RenderError::InvalidSweep(
                "the step must be a positive number".to_string(),
            ));
        }
        if end < start {
            return Err(RenderError::InvalidSweep(format!(
                "the sweep ends at {} before it starts at {}",
                end, start
            )));
        }
        let sweep = Sweep { start, end, step };
        let steps = sweep.steps();
        if !(steps < MAX_FRAMES as f64) {
            return Err(RenderError::InvalidSweep(format!(
                "stepping from {} to {} by {} takes more than {} frames",
                start, end, step, MAX_FRAMES
            )));
        }
        Ok(sweep)
    }

    // Whole steps that fit between start and end.  The slack keeps
    // 0.0..=10.0 by 0.01 from being cut short by representation error.
    fn steps(&self) -> f64 {
        let steps = (self.end - self.start) / self.step;
        (steps + steps.abs().max(1.0) * 1e-9).floor()
    }

    /// The number of values in the sweep: every whole step that fits,
    /// plus the start.  Never more than `MAX_FRAMES`.
    pub fn len(&self) -> usize {
        let steps = self.steps();
        if steps.is_nan() || steps < 0.0 {
            return 1;
        }
        steps.min((MAX_FRAMES - 1) as f64) as usize + 1
    }

    /// A sweep always holds at least its start.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every value, ascending and never past `end`.  Each is computed
    /// from its index rather than by accumulation.
    pub fn values(&self) -> Vec<f64> {
        (0..self.len())
            .map(|k| (self.start + (k as f64) * self.step).min(self.end))
            .collect()
    }
}

/// The rendered animation: frames in parameter order, the parameter
/// each came from, and the display delay shared by all of them.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence<P> {
    /// One frame per parameter value.
    pub frames: Vec<Frame<P>>,
    /// The parameter of each frame.
    pub parameters: Vec<f64>,
    /// Milliseconds each frame stays up.  Always zero: frames advance
    /// as fast as the viewer allows.
    pub delay_ms: u32,
}

impl<P> Sequence<P> {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when there is nothing to animate.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

type WorkQueue = Arc<Mutex<std::iter::Enumerate<std::vec::IntoIter<Escape>>>>;

/// Render one frame of `z^(n+1) + n*z^2 + c` per value of the sweep.
/// `progress` is told about each escape function as its frame starts.
/// With more than one thread the frames are pulled from a shared queue
/// and put back in order afterwards, so the result never depends on
/// the thread count; only the order of the progress calls does.
pub fn render_sequence<M, F>(
    plane: &PlaneMapper,
    max_iterations: usize,
    mapper: &M,
    sweep: &Sweep,
    threads: usize,
    progress: F,
) -> Result<Sequence<M::Pixel>, RenderError>
where
    M: ColorMapper,
    F: Fn(&EscapeFunction) + Sync,
{
    let parameters = sweep.values();
    let escapes = parameters
        .iter()
        .map(|&n| Escape::new(EscapeFunction::Polynomial(n), max_iterations))
        .collect::<Result<Vec<Escape>, RenderError>>()?;
    info!(
        "rendering {} frames of {}x{} with {} thread(s)",
        parameters.len(),
        plane.width(),
        plane.height(),
        threads
    );

    let frame_for = |escape: Escape| {
        progress(&escape.function());
        render_single(plane, &escape, mapper)
    };

    let frames: Vec<Frame<M::Pixel>> = if threads <= 1 {
        escapes.into_iter().map(frame_for).collect()
    } else {
        let queue: WorkQueue = Arc::new(Mutex::new(escapes.into_iter().enumerate()));
        let frame_for = &frame_for;
        let mut rendered: Vec<(usize, Frame<M::Pixel>)> = Vec::with_capacity(parameters.len());

        crossbeam::scope(|spawner| -> Result<(), RenderError> {
            let handles: Vec<ScopedJoinHandle<Result<Vec<(usize, Frame<M::Pixel>)>, RenderError>>> =
                (0..threads)
                    .map(|worker| {
                        let queue = queue.clone();
                        spawner.spawn(move |_| -> Result<Vec<(usize, Frame<M::Pixel>)>, RenderError> {
                            let mut frames = vec![];
                            loop {
                                let next = {
                                    queue
                                        .lock()
                                        .map_err(|_| RenderError::WorkerPanicked)?
                                        .next()
                                };
                                match next {
                                    Some((index, escape)) => {
                                        debug!("worker {} takes frame {}", worker, index);
                                        frames.push((index, frame_for(escape)));
                                    }
                                    None => {
                                        break;
                                    }
                                }
                            }
                            Ok(frames)
                        })
                    })
                    .collect();

            for handle in handles {
                let frames = handle.join().map_err(|_| RenderError::WorkerPanicked)??;
                rendered.extend(frames);
            }
            Ok(())
        })
        .map_err(|_| RenderError::WorkerPanicked)??;

        rendered.sort_by_key(|&(index, _)| index);
        rendered.into_iter().map(|(_, frame)| frame).collect()
    };

    Ok(Sequence {
        frames,
        parameters,
        delay_ms: 0,
    })
}
