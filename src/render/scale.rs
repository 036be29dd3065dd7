//! Continuous scales mapping data domains to pixel ranges.
//!
//! Both scales interpolate linearly. A zero-width domain maps everything to the
//! middle of the range; a NaN domain maps everything to NaN.

use chrono::{Datelike, NaiveDate};

const DAYS_PER_YEAR: f64 = 365.2425;

/// Linear numeric scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn scale(&self, v: f64) -> f64 {
        let [r0, r1] = self.range;
        r0 + normalize(self.domain, v) * (r1 - r0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let [d0, d1] = self.domain;
        d0 + normalize(self.range, px) * (d1 - d0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain[0], self.domain[1], count)
    }
}

/// Calendar-date scale. Dates are interpolated as day numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl TimeScale {
    pub fn new(start: NaiveDate, end: NaiveDate, range: [f64; 2]) -> Self {
        Self {
            domain: [day_number(start), day_number(end)],
            range,
        }
    }

    /// A scale with no usable domain; every position is NaN.
    pub fn undefined(range: [f64; 2]) -> Self {
        Self {
            domain: [f64::NAN, f64::NAN],
            range,
        }
    }

    pub fn domain(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((from_day_number(self.domain[0])?, from_day_number(self.domain[1])?))
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn scale(&self, date: NaiveDate) -> f64 {
        let [r0, r1] = self.range;
        r0 + normalize(self.domain, day_number(date)) * (r1 - r0)
    }

    /// Position of an optional date; absent dates map to NaN.
    pub fn scale_opt(&self, date: Option<NaiveDate>) -> f64 {
        date.map(|d| self.scale(d)).unwrap_or(f64::NAN)
    }

    pub fn invert(&self, px: f64) -> Option<NaiveDate> {
        let [d0, d1] = self.domain;
        from_day_number(d0 + normalize(self.range, px) * (d1 - d0))
    }

    /// Tick dates across the domain, aiming for roughly `count` ticks.
    ///
    /// Spans of several years tick on January 1st of every 1/2/5/10... years;
    /// shorter spans fall back to month starts, then to fixed day steps.
    pub fn ticks(&self, count: usize) -> Vec<NaiveDate> {
        let Some((a, b)) = self.domain() else {
            return Vec::new();
        };
        if count == 0 {
            return Vec::new();
        }
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if lo == hi {
            return vec![lo];
        }

        let span_days = (hi - lo).num_days() as f64;
        let target = span_days / count as f64;

        let mut out = if target >= DAYS_PER_YEAR {
            year_ticks(lo, hi, count)
        } else if target >= 28.0 {
            month_ticks(lo, hi, count)
        } else {
            day_ticks(lo, hi, count)
        };

        if a > b {
            out.reverse();
        }
        out
    }
}

fn year_ticks(lo: NaiveDate, hi: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let y0 = year_fraction(lo);
    let y1 = year_fraction(hi);
    let step = tick_increment(y0, y1, count as f64).max(1.0) as i32;

    (lo.year()..=hi.year())
        .filter(|y| y.rem_euclid(step) == 0)
        .filter_map(|y| NaiveDate::from_ymd_opt(y, 1, 1))
        .filter(|d| *d >= lo && *d <= hi)
        .collect()
}

fn month_ticks(lo: NaiveDate, hi: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let month_index = |d: NaiveDate| d.year() * 12 + d.month0() as i32;
    let span = (month_index(hi) - month_index(lo)).max(1);
    let step = [1, 3, 6]
        .into_iter()
        .find(|s| span / s <= count as i32)
        .unwrap_or(12);

    (month_index(lo)..=month_index(hi))
        .filter(|m| m.rem_euclid(step) == 0)
        .filter_map(|m| NaiveDate::from_ymd_opt(m.div_euclid(12), m.rem_euclid(12) as u32 + 1, 1))
        .filter(|d| *d >= lo && *d <= hi)
        .collect()
}

fn day_ticks(lo: NaiveDate, hi: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let span = (hi - lo).num_days();
    let step = [1, 2, 7, 14]
        .into_iter()
        .find(|s| span / s <= count as i64)
        .unwrap_or(28);

    lo.iter_days()
        .step_by(step as usize)
        .take_while(|d| *d <= hi)
        .collect()
}

fn normalize(domain: [f64; 2], v: f64) -> f64 {
    let [a, b] = domain;
    let width = b - a;
    if width.is_nan() {
        return f64::NAN;
    }
    if width == 0.0 {
        return 0.5;
    }
    (v - a) / width
}

fn day_number(d: NaiveDate) -> f64 {
    d.num_days_from_ce() as f64
}

fn from_day_number(days: f64) -> Option<NaiveDate> {
    if !days.is_finite() || days.abs() > i32::MAX as f64 {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(days.round() as i32)
}

fn year_fraction(d: NaiveDate) -> f64 {
    d.year() as f64 + d.ordinal0() as f64 / DAYS_PER_YEAR
}

/// Evenly spaced "nice" values (multiples of 1, 2 or 5 times a power of ten)
/// covering `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Tick step for `[start, stop]`; negative values mean "1 / -inc".
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let m = 10f64.powf(-power) / factor;
        i1 = (start * m).round();
        i2 = (stop * m).round();
        if i1 / m < start {
            i1 += 1.0;
        }
        if i2 / m > stop {
            i2 -= 1.0;
        }
        inc = -m;
    } else {
        let m = 10f64.powf(power) * factor;
        i1 = (start / m).round();
        i2 = (stop / m).round();
        if i1 * m < start {
            i1 += 1.0;
        }
        if i2 * m > stop {
            i2 -= 1.0;
        }
        inc = m;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn linear_scale_maps_and_inverts() {
        let s = LinearScale::new([0.0, 100.0], [440.0, 60.0]);
        assert_eq!(s.scale(0.0), 440.0);
        assert_eq!(s.scale(100.0), 60.0);
        assert_eq!(s.scale(50.0), 250.0);
        assert!((s.invert(250.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_domains() {
        let flat = LinearScale::new([5.0, 5.0], [0.0, 10.0]);
        assert_eq!(flat.scale(5.0), 5.0);

        let nan = LinearScale::new([0.0, f64::NAN], [0.0, 10.0]);
        assert!(nan.scale(1.0).is_nan());
        assert!(nan.ticks(10).is_empty());
    }

    #[test]
    fn linear_ticks_use_nice_steps() {
        assert_eq!(ticks(0.0, 10.0, 10), (0..=10).map(f64::from).collect::<Vec<_>>());
        assert_eq!(
            ticks(0.0, 18064.7, 10),
            (0..=9).map(|i| f64::from(i) * 2000.0).collect::<Vec<_>>()
        );
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(10.0, 0.0, 2), vec![10.0, 5.0, 0.0]);
        assert_eq!(ticks(3.0, 3.0, 10), vec![3.0]);
    }

    #[test]
    fn time_scale_maps_domain_edges() {
        let s = TimeScale::new(ymd(1947, 1, 1), ymd(2015, 7, 1), [80.0, 860.0]);
        assert_eq!(s.scale(ymd(1947, 1, 1)), 80.0);
        assert_eq!(s.scale(ymd(2015, 7, 1)), 860.0);
        assert_eq!(s.invert(80.0), Some(ymd(1947, 1, 1)));
        assert!(s.scale_opt(None).is_nan());
    }

    #[test]
    fn time_ticks_over_decades_use_five_year_steps() {
        let s = TimeScale::new(ymd(1947, 1, 1), ymd(2015, 7, 1), [0.0, 1.0]);
        let years: Vec<i32> = s.ticks(10).iter().map(|d| d.year()).collect();
        assert_eq!(years, (1950..=2015).step_by(5).collect::<Vec<_>>());
        assert!(s.ticks(10).iter().all(|d| d.month() == 1 && d.day() == 1));
    }

    #[test]
    fn time_ticks_for_short_spans() {
        let months = TimeScale::new(ymd(2000, 1, 15), ymd(2002, 1, 1), [0.0, 1.0]).ticks(10);
        assert!(months.iter().all(|d| d.day() == 1 && d.month0() % 3 == 0));
        assert_eq!(months.first(), Some(&ymd(2000, 4, 1)));

        let days = TimeScale::new(ymd(1947, 1, 1), ymd(1947, 4, 1), [0.0, 1.0]).ticks(10);
        assert_eq!(days.first(), Some(&ymd(1947, 1, 1)));
        assert_eq!(days[1], ymd(1947, 1, 15));

        let undefined = TimeScale::undefined([0.0, 1.0]);
        assert!(undefined.ticks(10).is_empty());
        assert!(undefined.scale(ymd(2000, 1, 1)).is_nan());
    }
}
