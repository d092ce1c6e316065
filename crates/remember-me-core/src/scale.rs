use serde::{Deserialize, Serialize};

/// A d3-style continuous linear scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        let t = (v - d0) / (d1 - d0);
        r0 + t * (r1 - r0)
    }

    /// Roughly `count` evenly spaced, human-friendly tick values inside the domain.
    ///
    /// Mirrors `d3.ticks`: the step is 1, 2 or 5 times a power of ten.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut start, mut stop) = self.domain;
        if !(start.is_finite() && stop.is_finite()) || count == 0 {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }

        let inc = tick_increment(start, stop, count as f64);
        let mut out = Vec::new();
        if inc > 0.0 {
            let i0 = (start / inc).ceil() as i64;
            let i1 = (stop / inc).floor() as i64;
            for i in i0..=i1 {
                out.push(i as f64 * inc);
            }
        } else if inc < 0.0 {
            let inv = -inc;
            let i0 = (start * inv).ceil() as i64;
            let i1 = (stop * inv).floor() as i64;
            for i in i0..=i1 {
                out.push(i as f64 / inv);
            }
        }
        if reverse {
            out.reverse();
        }
        out
    }
}

/// Positive values are a step; negative values are the reciprocal of a fractional step.
fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count.max(1.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_onto_range() {
        let s = LinearScale::new((1770.0, 1815.0), (0.0, 1400.0));
        assert_eq!(s.apply(1770.0), 0.0);
        assert_eq!(s.apply(1815.0), 1400.0);
        assert!((s.apply(1792.5) - 700.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_domain_maps_to_range_start() {
        let s = LinearScale::new((1800.0, 1800.0), (10.0, 20.0));
        assert_eq!(s.apply(1800.0), 10.0);
    }

    #[test]
    fn year_ticks_step_by_five() {
        let s = LinearScale::new((1770.0, 1815.0), (0.0, 1400.0));
        let ticks = s.ticks(10);
        assert_eq!(ticks.first().copied(), Some(1770.0));
        assert_eq!(ticks.last().copied(), Some(1815.0));
        assert_eq!(ticks.len(), 10);
        assert!(ticks.windows(2).all(|w| w[1] - w[0] == 5.0));
    }

    #[test]
    fn fractional_ticks() {
        let s = LinearScale::new((0.0, 1.0), (0.0, 100.0));
        let ticks = s.ticks(5);
        assert_eq!(ticks, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }
}
