use crate::curve::FillCurve;
use crate::error::{CurveError, Result};

/// Combines per-part fill curves into the curve of an assembled tank.
///
/// Each curve is multiplied by its repeat count and the results are summed
/// sample by sample. A shorter operand is extended with its last value
/// first: that part is already full while taller parts keep filling.
#[derive(Default)]
pub struct ComposeCurves<'a> {
    parts: Vec<(&'a FillCurve, u32)>,
}

impl<'a> ComposeCurves<'a> {
    /// Creates a new, empty `ComposeCurves` operation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a part used `count` times.
    #[must_use]
    pub fn with_part(mut self, curve: &'a FillCurve, count: u32) -> Self {
        self.parts.push((curve, count));
        self
    }

    /// Executes the composition.
    ///
    /// A single part used once is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no parts, a count is zero, a curve is
    /// empty, or the curves use different height steps.
    pub fn execute(&self) -> Result<FillCurve> {
        let Some(&(first, first_count)) = self.parts.first() else {
            return Err(CurveError::NoParts.into());
        };
        for &(curve, count) in &self.parts {
            if count == 0 {
                return Err(CurveError::ZeroRepeatCount.into());
            }
            if curve.is_empty() {
                return Err(CurveError::Empty.into());
            }
            if !curve.same_step(first) {
                return Err(CurveError::StepMismatch {
                    left: first.step_m(),
                    right: curve.step_m(),
                }
                .into());
            }
        }

        if self.parts.len() == 1 && first_count == 1 {
            return Ok(first.clone());
        }

        let mut acc = first.repeated(first_count);
        for &(curve, count) in &self.parts[1..] {
            let mut part = curve.repeated(count);
            let len = acc.len().max(part.len());
            acc.extend_to(len)?;
            part.extend_to(len)?;
            let samples = acc
                .samples()
                .iter()
                .zip(part.samples())
                .map(|(a, b)| a.saturating_add(*b))
                .collect();
            acc = FillCurve::with_step(samples, first.step_m());
        }
        Ok(acc)
    }
}

/// Rescales a curve so its last sample equals a nominal volume.
///
/// Every sample is multiplied by `target / last` and truncated to whole
/// liters. Corrects the systematic voxelization bias (walls without
/// thickness, finite cell size) against the manufacturer's declared volume.
pub struct ScaleToVolume<'a> {
    curve: &'a FillCurve,
    target_l: u32,
}

impl<'a> ScaleToVolume<'a> {
    /// Creates a new `ScaleToVolume` operation.
    #[must_use]
    pub fn new(curve: &'a FillCurve, target_l: u32) -> Self {
        Self { curve, target_l }
    }

    /// Executes the rescaling.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::DegenerateScale`] if the curve is empty or ends
    /// at zero.
    pub fn execute(&self) -> Result<FillCurve> {
        let last = self
            .curve
            .last()
            .filter(|&v| v > 0)
            .ok_or(CurveError::DegenerateScale {
                target: self.target_l,
            })?;

        let target = u128::from(self.target_l);
        let samples = self
            .curve
            .samples()
            .iter()
            .map(|&s| {
                let scaled = u128::from(s) * target / u128::from(last);
                u64::try_from(scaled).unwrap_or(u64::MAX)
            })
            .collect();
        Ok(FillCurve::with_step(samples, self.curve.step_m()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TankfillError;

    fn curve(samples: &[u64]) -> FillCurve {
        FillCurve::new(samples.to_vec())
    }

    #[test]
    fn single_part_is_unchanged() {
        let a = curve(&[1, 2, 3]);
        let out = ComposeCurves::new().with_part(&a, 1).execute().unwrap();
        assert_eq!(out, a);
    }

    #[test]
    fn repeat_count_scales() {
        let a = curve(&[1, 2, 3]);
        let out = ComposeCurves::new().with_part(&a, 3).execute().unwrap();
        assert_eq!(out.samples(), &[3, 6, 9]);
    }

    #[test]
    fn shorter_curve_keeps_its_plateau() {
        let a = curve(&[1, 2, 3]);
        let b = curve(&[1, 2, 3, 4, 5]);
        let out = ComposeCurves::new()
            .with_part(&a, 1)
            .with_part(&b, 1)
            .execute()
            .unwrap();
        assert_eq!(out.samples(), &[2, 4, 6, 7, 8]);

        // order does not matter
        let out = ComposeCurves::new()
            .with_part(&b, 1)
            .with_part(&a, 1)
            .execute()
            .unwrap();
        assert_eq!(out.samples(), &[2, 4, 6, 7, 8]);
    }

    #[test]
    fn end_caps_and_middles() {
        let cap = curve(&[0, 10, 20, 30]);
        let middle = curve(&[0, 5, 10]);
        let out = ComposeCurves::new()
            .with_part(&cap, 2)
            .with_part(&middle, 4)
            .execute()
            .unwrap();
        assert_eq!(out.samples(), &[0, 40, 80, 100]);
    }

    #[test]
    fn composition_errors() {
        let a = curve(&[1, 2]);
        let empty = curve(&[]);
        let other_step = FillCurve::with_step(vec![1, 2], 0.1);

        assert!(matches!(
            ComposeCurves::new().execute(),
            Err(TankfillError::Curve(CurveError::NoParts))
        ));
        assert!(matches!(
            ComposeCurves::new().with_part(&a, 0).execute(),
            Err(TankfillError::Curve(CurveError::ZeroRepeatCount))
        ));
        assert!(matches!(
            ComposeCurves::new().with_part(&a, 1).with_part(&empty, 1).execute(),
            Err(TankfillError::Curve(CurveError::Empty))
        ));
        assert!(matches!(
            ComposeCurves::new().with_part(&a, 1).with_part(&other_step, 1).execute(),
            Err(TankfillError::Curve(CurveError::StepMismatch { .. }))
        ));
    }

    #[test]
    fn scale_to_nominal_volume() {
        let raw = curve(&[10, 20, 30]);
        let out = ScaleToVolume::new(&raw, 60).execute().unwrap();
        assert_eq!(out.samples(), &[20, 40, 60]);
    }

    #[test]
    fn scale_truncates() {
        let raw = curve(&[0, 1, 2, 3]);
        let out = ScaleToVolume::new(&raw, 10).execute().unwrap();
        assert_eq!(out.samples(), &[0, 3, 6, 10]);
    }

    #[test]
    fn scale_of_zero_curve_is_fatal() {
        let raw = curve(&[0, 0, 0]);
        assert!(matches!(
            ScaleToVolume::new(&raw, 100).execute(),
            Err(TankfillError::Curve(CurveError::DegenerateScale { target: 100 }))
        ));
        assert!(ScaleToVolume::new(&curve(&[]), 100).execute().is_err());
    }
}
