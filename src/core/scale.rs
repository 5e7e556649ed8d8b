use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};

const E10: f64 = 7.071_067_811_865_475; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Tick count used when rounding a domain to nice bounds.
pub const NICE_TICK_COUNT: usize = 10;

/// Continuous domain -> pixel range mapping.
///
/// The range may be inverted (`range_start > range_end`), which is how value
/// axes map larger values to smaller y-pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> VizResult<Self> {
        let (domain_start, domain_end) = domain;
        let (range_start, range_end) = range;
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(VizError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(VizError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Extends the domain to round bounds so that ticks land on 1/2/5 x 10^k
    /// multiples. The extended domain always contains the original one.
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let mut start = self.domain_start;
        let mut stop = self.domain_end;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut previous_step = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if previous_step == Some(step) {
                break;
            }
            let (nice_start, nice_stop) = match step {
                TickIncrement::Multiple(step) => {
                    ((start / step).floor() * step, (stop / step).ceil() * step)
                }
                TickIncrement::Fraction(inverse) => (
                    (start * inverse).floor() / inverse,
                    (stop * inverse).ceil() / inverse,
                ),
                TickIncrement::Degenerate => break,
            };
            // Rounding outward can overflow near f64::MAX; keep the raw bound.
            if !nice_start.is_finite() || !nice_stop.is_finite() {
                if nice_start.is_finite() {
                    start = nice_start;
                }
                if nice_stop.is_finite() {
                    stop = nice_stop;
                }
                break;
            }
            start = nice_start;
            stop = nice_stop;
            previous_step = Some(step);
        }

        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        Self {
            domain_start: start,
            domain_end: stop,
            ..self
        }
    }

    /// Round tick values inside the domain, in ascending order.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let (start, stop) = if self.domain_start <= self.domain_end {
            (self.domain_start, self.domain_end)
        } else {
            (self.domain_end, self.domain_start)
        };

        match tick_increment(start, stop, count) {
            TickIncrement::Multiple(step) => {
                let mut first = (start / step).round();
                let mut last = (stop / step).round();
                if first * step < start {
                    first += 1.0;
                }
                if last * step > stop {
                    last -= 1.0;
                }
                steps_between(first, last).map(|i| i * step).collect()
            }
            TickIncrement::Fraction(inverse) => {
                let mut first = (start * inverse).round();
                let mut last = (stop * inverse).round();
                if first / inverse < start {
                    first += 1.0;
                }
                if last / inverse > stop {
                    last -= 1.0;
                }
                steps_between(first, last).map(|i| i / inverse).collect()
            }
            TickIncrement::Degenerate => Vec::new(),
        }
    }
}

fn steps_between(first: f64, last: f64) -> impl Iterator<Item = f64> {
    let count = if last >= first {
        (last - first) as usize + 1
    } else {
        0
    };
    (0..count).map(move |i| first + i as f64)
}

/// Tick spacing. Sub-unit steps are kept as their inverse to avoid
/// accumulating float error (`0.1 * 3 != 0.3`).
#[derive(Debug, Clone, Copy, PartialEq)]
enum TickIncrement {
    Multiple(f64),
    Fraction(f64),
    Degenerate,
}

fn tick_increment(start: f64, stop: f64, count: usize) -> TickIncrement {
    if count == 0 || !(stop > start) {
        return TickIncrement::Degenerate;
    }
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    if power >= 0.0 {
        TickIncrement::Multiple(factor * 10f64.powf(power))
    } else {
        TickIncrement::Fraction(10f64.powf(-power) / factor)
    }
}

/// Equal-width bands for categorical positions.
///
/// `inner_padding` is the fraction of each step left empty between bands and
/// `outer_padding` the fraction of a step kept before the first and after the
/// last band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    count: usize,
    range_start: f64,
    range_end: f64,
    inner_padding: f64,
    outer_padding: f64,
}

impl BandScale {
    pub fn new(
        count: usize,
        range: (f64, f64),
        inner_padding: f64,
        outer_padding: f64,
    ) -> VizResult<Self> {
        let (range_start, range_end) = range;
        if !range_start.is_finite() || !range_end.is_finite() || range_end <= range_start {
            return Err(VizError::InvalidData(
                "band range must be finite and increasing".to_owned(),
            ));
        }
        if !inner_padding.is_finite() || !(0.0..1.0).contains(&inner_padding) {
            return Err(VizError::InvalidData(
                "band inner padding must be in [0, 1)".to_owned(),
            ));
        }
        if !outer_padding.is_finite() || outer_padding < 0.0 {
            return Err(VizError::InvalidData(
                "band outer padding must be finite and >= 0".to_owned(),
            ));
        }
        Ok(Self {
            count,
            range_start,
            range_end,
            inner_padding,
            outer_padding,
        })
    }

    /// Bands with outer padding of half the inner padding, so the steps tile
    /// the whole range.
    pub fn tiled(count: usize, range: (f64, f64), padding: f64) -> VizResult<Self> {
        Self::new(count, range, padding, padding / 2.0)
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Distance between the starts of two adjacent bands.
    #[must_use]
    pub fn step(self) -> f64 {
        let slots =
            (self.count as f64 - self.inner_padding + 2.0 * self.outer_padding).max(1.0);
        (self.range_end - self.range_start) / slots
    }

    #[must_use]
    pub fn bandwidth(self) -> f64 {
        self.step() * (1.0 - self.inner_padding)
    }

    /// Left edge of band `index`, `None` when out of range.
    #[must_use]
    pub fn band_start(self, index: usize) -> Option<f64> {
        if index >= self.count {
            return None;
        }
        let step = self.step();
        let used = step * (self.count as f64 - self.inner_padding);
        let offset = (self.range_end - self.range_start - used) / 2.0;
        Some(self.range_start + offset + step * index as f64)
    }

    #[must_use]
    pub fn band_center(self, index: usize) -> Option<f64> {
        self.band_start(index)
            .map(|start| start + self.bandwidth() / 2.0)
    }

    /// Index of the band containing `x`, ignoring padding gaps.
    #[must_use]
    pub fn index_at(self, x: f64) -> Option<usize> {
        let bandwidth = self.bandwidth();
        (0..self.count).find(|&index| {
            self.band_start(index)
                .is_some_and(|start| x >= start && x <= start + bandwidth)
        })
    }
}
