// Resynchronization strategies: where to look for the next mid-bit crossing
// and which sample becomes the new anchor.

use serde::Serialize;
use std::ops::Range;

use crate::config::ResyncConfig;

/// Why the bit decoder stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// The next search position ran past the last sample
    EndOfData,
    /// Two consecutive samples read exactly zero: the line went idle
    QuietPeriod,
    /// A full search found no usable sign change
    CrossingNotFound,
}

impl Termination {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EndOfData => "end of data",
            Self::QuietPeriod => "quiet period",
            Self::CrossingNotFound => "crossing not found",
        }
    }
}

/// A resolved mid-bit transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    /// First sample on the far side of the transition
    pub index: usize,
    pub bit: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Crossing(Crossing),
    Stop {
        termination: Termination,
        offset: usize,
    },
}

impl Step {
    fn stop(termination: Termination, offset: usize) -> Self {
        Step::Stop {
            termination,
            offset,
        }
    }
}

/// What a pair of adjacent samples says about the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairClass {
    Quiet,
    Bit(u8),
    Steady,
}

/// Classify `(prev, cur)`.
///
/// Quiet wins over everything. A zero `cur` completes whichever transition
/// enters it; a zero `prev` never starts one.
pub fn classify(prev: f32, cur: f32) -> PairClass {
    if prev == 0.0 && cur == 0.0 {
        PairClass::Quiet
    } else if prev < 0.0 && cur >= 0.0 {
        PairClass::Bit(1)
    } else if prev > 0.0 && cur <= 0.0 {
        PairClass::Bit(0)
    } else {
        PairClass::Steady
    }
}

pub trait ResyncStrategy {
    fn name(&self) -> &'static str;

    /// Smallest possible distance between two accepted crossings
    fn min_spacing(&self) -> usize;

    /// Resolve the crossing of the bit after the one anchored at `pos`
    fn next_crossing(&self, samples: &[f32], pos: usize) -> Step;
}

/// Earliest crossing whose far sample lies in `window`; `window.start` must be >= 1
fn scan_window(samples: &[f32], window: Range<usize>) -> Step {
    if window.start >= samples.len() {
        return Step::stop(Termination::EndOfData, samples.len());
    }
    let last = window.end.saturating_sub(1);
    for i in window {
        if i >= samples.len() {
            return Step::stop(Termination::EndOfData, samples.len());
        }
        match classify(samples[i - 1], samples[i]) {
            PairClass::Quiet => return Step::stop(Termination::QuietPeriod, i - 1),
            PairClass::Bit(bit) => return Step::Crossing(Crossing { index: i, bit }),
            PairClass::Steady => {}
        }
    }
    Step::stop(Termination::CrossingNotFound, last)
}

/// ± `window` samples around the nominal bit spacing
pub struct FixedWindow {
    spacing: usize,
    window: usize,
}

impl FixedWindow {
    pub fn new(samples_per_bit: f32, window: usize) -> Self {
        Self {
            spacing: samples_per_bit.round() as usize,
            window,
        }
    }
}

impl ResyncStrategy for FixedWindow {
    fn name(&self) -> &'static str {
        "fixed-window"
    }

    fn min_spacing(&self) -> usize {
        self.spacing - self.window
    }

    fn next_crossing(&self, samples: &[f32], pos: usize) -> Step {
        let start = pos.saturating_add(self.min_spacing());
        scan_window(samples, start..start.saturating_add(2 * self.window))
    }
}

/// Crossing must fall between two fractions of the nominal spacing
pub struct IdealPosition {
    min: usize,
    max: usize,
}

impl IdealPosition {
    pub fn new(samples_per_bit: f32, min_spacing: f32, max_spacing: f32) -> Self {
        Self {
            min: (samples_per_bit * min_spacing).floor() as usize,
            max: (samples_per_bit * max_spacing).ceil() as usize,
        }
    }
}

impl ResyncStrategy for IdealPosition {
    fn name(&self) -> &'static str {
        "ideal-position"
    }

    fn min_spacing(&self) -> usize {
        self.min
    }

    fn next_crossing(&self, samples: &[f32], pos: usize) -> Step {
        let end = pos.saturating_add(self.max).saturating_add(1);
        scan_window(samples, pos.saturating_add(self.min)..end)
    }
}

/// Jump a whole bit, read the slope, then walk onto the transition sample
pub struct DriftTracking {
    step: usize,
    max_walk: usize,
}

impl DriftTracking {
    pub fn new(samples_per_bit: f32, max_walk: Option<usize>) -> Self {
        let step = samples_per_bit.trunc() as usize;
        Self {
            step,
            max_walk: max_walk.unwrap_or(step / 2),
        }
    }
}

impl ResyncStrategy for DriftTracking {
    fn name(&self) -> &'static str {
        "drift-tracking"
    }

    fn min_spacing(&self) -> usize {
        self.step - self.max_walk
    }

    fn next_crossing(&self, samples: &[f32], pos: usize) -> Step {
        let mut q = pos.saturating_add(self.step);
        if q >= samples.len() {
            return Step::stop(Termination::EndOfData, samples.len());
        }
        if samples[q - 1] == 0.0 && samples[q] == 0.0 {
            return Step::stop(Termination::QuietPeriod, q - 1);
        }

        // Three-sample slope tolerates the crossing landing exactly on q
        let bit = if samples[q] > samples[q - 2] {
            1
        } else if samples[q] < samples[q - 2] {
            0
        } else {
            return Step::stop(Termination::CrossingNotFound, q);
        };
        let past = |v: f32| if bit == 1 { v >= 0.0 } else { v <= 0.0 };

        let mut steps = 0;
        if past(samples[q]) {
            while past(samples[q - 1]) {
                if steps == self.max_walk {
                    return Step::stop(Termination::CrossingNotFound, q);
                }
                q -= 1;
                steps += 1;
            }
        } else {
            while !past(samples[q]) {
                if steps == self.max_walk {
                    return Step::stop(Termination::CrossingNotFound, q);
                }
                q += 1;
                steps += 1;
                if q >= samples.len() {
                    return Step::stop(Termination::EndOfData, samples.len());
                }
            }
        }

        Step::Crossing(Crossing { index: q, bit })
    }
}

impl ResyncConfig {
    pub fn create(&self, samples_per_bit: f32) -> Box<dyn ResyncStrategy> {
        match *self {
            ResyncConfig::FixedWindow { window } => {
                Box::new(FixedWindow::new(samples_per_bit, window))
            }
            ResyncConfig::IdealPosition {
                min_spacing,
                max_spacing,
            } => Box::new(IdealPosition::new(samples_per_bit, min_spacing, max_spacing)),
            ResyncConfig::DriftTracking { max_walk } => {
                Box::new(DriftTracking::new(samples_per_bit, max_walk))
            }
        }
    }
}
