//! Piecewise-linear thermal histories

use crate::core_types::Celsius;
use crate::error::{KineticsError, Result};
use serde::Serialize;

/// Upper bound on resampling density
pub const MAX_SAMPLES: usize = 10_000_000;

/// Thermal history `T(t)` sampled at strictly increasing times
///
/// Temperatures between samples are linearly interpolated. Nothing requires
/// the path to be monotone in temperature: reheating and isothermal holds are
/// valid inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoolingPath {
    times: Vec<f64>,
    temperatures: Vec<Celsius>,
}

impl CoolingPath {
    /// # Errors
    /// [`KineticsError::InvalidCoolingPath`] for fewer than two samples,
    /// mismatched lengths, non-finite values, temperatures below absolute zero,
    /// or times that are not strictly increasing.
    pub fn new(times: Vec<f64>, temperatures: Vec<f64>) -> Result<Self> {
        if times.len() != temperatures.len() {
            return Err(KineticsError::invalid_path(format!(
                "{} times but {} temperatures",
                times.len(),
                temperatures.len()
            )));
        }
        if times.len() < 2 {
            return Err(KineticsError::invalid_path(format!(
                "need at least 2 samples, got {}",
                times.len()
            )));
        }
        if let Some(i) = times.iter().position(|t| !t.is_finite()) {
            return Err(KineticsError::invalid_path(format!(
                "time at sample {i} is not finite"
            )));
        }
        if let Some(i) = temperatures
            .iter()
            .position(|t| !t.is_finite() || *t < *Celsius::ABSOLUTE_ZERO)
        {
            return Err(KineticsError::invalid_path(format!(
                "temperature at sample {i} is {}",
                temperatures[i]
            )));
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(KineticsError::invalid_path(format!(
                "time must be strictly increasing ({} -> {} at sample {})",
                times[i],
                times[i + 1],
                i + 1
            )));
        }

        Ok(Self {
            times,
            temperatures: temperatures.into_iter().map(Celsius::from).collect(),
        })
    }

    /// Build from `(time, temperature)` pairs
    pub fn from_points<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (times, temperatures) = points.into_iter().unzip();
        Self::new(times, temperatures)
    }

    /// Linear cooling from `start` to `end` at `rate` (°C/s, positive)
    pub fn constant_rate(start: Celsius, end: Celsius, rate: f64) -> Result<Self> {
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(KineticsError::invalid_path(format!(
                "cooling rate must be positive, got {rate}"
            )));
        }
        if end >= start {
            return Err(KineticsError::invalid_path(format!(
                "end temperature {end} must be below start {start}"
            )));
        }
        let duration = (start - end).value() / rate;
        Self::new(vec![0.0, duration], vec![*start, *end])
    }

    /// Hold at `temperature` for `duration` seconds
    pub fn isothermal(temperature: Celsius, duration: f64) -> Result<Self> {
        Self::new(vec![0.0, duration], vec![*temperature, *temperature])
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false; a valid path has at least two samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn temperatures(&self) -> &[Celsius] {
        &self.temperatures
    }

    pub fn start_time(&self) -> f64 {
        self.times[0]
    }

    pub fn end_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    pub fn start_temperature(&self) -> Celsius {
        self.temperatures[0]
    }

    pub fn end_temperature(&self) -> Celsius {
        self.temperatures[self.temperatures.len() - 1]
    }

    /// Mean cooling rate over the whole path (°C/s, positive when cooling)
    pub fn mean_cooling_rate(&self) -> f64 {
        (self.start_temperature() - self.end_temperature()).value() / self.duration()
    }

    /// Interpolated temperature; clamps to the end samples outside the path
    pub fn temperature_at(&self, time: f64) -> Celsius {
        if time <= self.start_time() {
            return self.start_temperature();
        }
        if time >= self.end_time() {
            return self.end_temperature();
        }

        // First sample strictly after `time`
        let upper = self.times.partition_point(|t| *t <= time);
        let lower = upper - 1;
        let (t0, t1) = (self.times[lower], self.times[upper]);
        let (y0, y1) = (*self.temperatures[lower], *self.temperatures[upper]);
        Celsius::from(y0 + (y1 - y0) * (time - t0) / (t1 - t0))
    }

    /// Resample onto `samples` uniformly spaced times spanning the path
    ///
    /// # Errors
    /// [`KineticsError::InvalidParameter`] when `samples` is below 2 or above
    /// [`MAX_SAMPLES`].
    pub fn resample(&self, samples: usize) -> Result<Self> {
        if !(2..=MAX_SAMPLES).contains(&samples) {
            return Err(KineticsError::invalid_parameter(
                "samples",
                format!("need 2..={MAX_SAMPLES} samples, got {samples}"),
            ));
        }
        let start = self.start_time();
        let dt = self.duration() / (samples - 1) as f64;

        let times: Vec<f64> = (0..samples)
            .map(|i| {
                if i == samples - 1 {
                    self.end_time()
                } else {
                    start + i as f64 * dt
                }
            })
            .collect();
        let temperatures = times.iter().map(|t| self.temperature_at(*t)).collect();

        Ok(Self {
            times,
            temperatures,
        })
    }
}
