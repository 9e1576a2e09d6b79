use crate::error::CurveError;
use crate::math::TOLERANCE;

/// Height step of one curve sample when none is given: one centimeter.
pub const DEFAULT_STEP_M: f64 = 0.01;

/// Cumulative filled volume sampled at each height level.
///
/// Sample `i` is the volume in whole liters when the tank is filled to
/// height `i * step_m`. Samples never decrease.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FillCurve {
    samples: Vec<u64>,
    step_m: f64,
}

impl FillCurve {
    /// Creates a curve with the default one-centimeter step.
    #[must_use]
    pub fn new(samples: Vec<u64>) -> Self {
        Self::with_step(samples, DEFAULT_STEP_M)
    }

    /// Creates a curve whose samples are `step_m` meters apart.
    #[must_use]
    pub fn with_step(samples: Vec<u64>, step_m: f64) -> Self {
        Self { samples, step_m }
    }

    #[must_use]
    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    /// Distance between two samples in meters.
    #[must_use]
    pub fn step_m(&self) -> f64 {
        self.step_m
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Volume at the maximum modelled height.
    #[must_use]
    pub fn last(&self) -> Option<u64> {
        self.samples.last().copied()
    }

    /// Maximum modelled height in meters.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn max_height_m(&self) -> f64 {
        self.samples.len().saturating_sub(1) as f64 * self.step_m
    }

    /// Volume at a fill height, rounding the height down to a sample.
    ///
    /// Heights above the modelled range return the full volume; negative or
    /// non-finite heights return `None`.
    #[must_use]
    pub fn volume_at(&self, height_m: f64) -> Option<u64> {
        if !height_m.is_finite() || height_m < 0.0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = ((height_m + TOLERANCE) / self.step_m).floor() as usize;
        self.samples
            .get(index)
            .or_else(|| self.samples.last())
            .copied()
    }

    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.samples.windows(2).all(|w| w[0] <= w[1])
    }

    /// Returns `true` if both curves sample at the same height step.
    #[must_use]
    pub fn same_step(&self, other: &Self) -> bool {
        (self.step_m - other.step_m).abs() < TOLERANCE
    }

    /// Every sample multiplied by a repeat count.
    #[must_use]
    pub fn repeated(&self, count: u32) -> Self {
        let samples = self
            .samples
            .iter()
            .map(|&s| s.saturating_mul(u64::from(count)))
            .collect();
        Self::with_step(samples, self.step_m)
    }

    /// Extends the curve to `len` samples by repeating its last value.
    ///
    /// A part that is already full keeps its volume while taller parts keep
    /// filling. Curves already at least `len` long are unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve is empty and must grow.
    pub fn extend_to(&mut self, len: usize) -> Result<(), CurveError> {
        if self.samples.len() >= len {
            return Ok(());
        }
        let plateau = self.last().ok_or(CurveError::Empty)?;
        self.samples.resize(len, plateau);
        Ok(())
    }

    /// Liters per height step, the derivative of the curve.
    ///
    /// Central differences inside, one-sided differences at both ends.
    #[must_use]
    pub fn gradient(&self) -> Vec<f64> {
        #[allow(clippy::cast_precision_loss)]
        let s: Vec<f64> = self.samples.iter().map(|&v| v as f64).collect();
        match s.len() {
            0 => Vec::new(),
            1 => vec![0.0],
            n => (0..n)
                .map(|i| {
                    if i == 0 {
                        s[1] - s[0]
                    } else if i == n - 1 {
                        s[n - 1] - s[n - 2]
                    } else {
                        (s[i + 1] - s[i - 1]) / 2.0
                    }
                })
                .collect(),
        }
    }
}
