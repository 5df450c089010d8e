use rand::Rng;

use crate::canvas::Canvas;
use crate::error::{PlasmaError, Result};

// Defaults of the per-level attenuated variant
pub const DEFAULT_INITIAL_MAX: f32 = 0.75;
pub const DEFAULT_ATTENUATION: f32 = 0.5;

// Random perturbation for the midpoint of a cell.
// `magnitude_basis` is half width + half height of the cell being split, so
// the amplitude shrinks with the cell and stays proportional to the canvas.
// Result lies in [-0.5 * scale, +0.5 * scale).
pub fn displacement<R: Rng + ?Sized>(
    rng: &mut R,
    magnitude_basis: f32,
    canvas_width: u32,
    canvas_height: u32,
) -> f32 {
    let scale = magnitude_basis / (canvas_width as f32 + canvas_height as f32) * 3.0;
    (rng.random::<f32>() - 0.5) * scale
}

// How much the midpoint of each cell gets pushed around
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DisplacementModel {
    // Amplitude proportional to cell size over canvas size
    #[default]
    SizeScaled,
    // Amplitude starts at `initial_max` and is multiplied by `attenuation`
    // every level, uniform in [-amplitude, amplitude)
    Attenuated { initial_max: f32, attenuation: f32 },
    // No displacement at all, the result is a smooth bilinear gradient
    Flat,
}

impl DisplacementModel {
    pub fn attenuated() -> Self {
        DisplacementModel::Attenuated {
            initial_max: DEFAULT_INITIAL_MAX,
            attenuation: DEFAULT_ATTENUATION,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let DisplacementModel::Attenuated {
            initial_max,
            attenuation,
        } = *self
        {
            if !initial_max.is_finite() || initial_max < 0.0 {
                return Err(PlasmaError::InvalidDisplacement(format!(
                    "initial_max must be finite and >= 0, got {initial_max}"
                )));
            }
            if !attenuation.is_finite() || attenuation < 0.0 {
                return Err(PlasmaError::InvalidDisplacement(format!(
                    "attenuation must be finite and >= 0, got {attenuation}"
                )));
            }
        }
        Ok(())
    }

    // Draw the displacement for a cell of the given half extents at `depth`.
    // `Flat` draws nothing from the rng.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        half_width: f64,
        half_height: f64,
        canvas: Canvas,
        depth: u32,
    ) -> f32 {
        match *self {
            DisplacementModel::SizeScaled => displacement(
                rng,
                (half_width + half_height) as f32,
                canvas.width(),
                canvas.height(),
            ),
            DisplacementModel::Attenuated {
                initial_max,
                attenuation,
            } => {
                let amplitude = initial_max * attenuation.powi(depth as i32);
                2.0 * amplitude * (rng.random::<f32>() - 0.5)
            }
            DisplacementModel::Flat => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplacementModel, displacement};
    use crate::Canvas;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn displacement_within_scale() {
        let mut rng = StdRng::seed_from_u64(7);
        // basis 300 on a 200x100 canvas => scale 3.0
        for _ in 0..10_000 {
            let d = displacement(&mut rng, 300.0, 200, 100);
            assert!(d >= -1.5 && d < 1.5, "displacement {} out of range", d);
        }
    }

    #[test]
    fn displacement_shrinks_with_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let big = (0..1000)
            .map(|_| displacement(&mut rng, 256.0, 512, 512).abs())
            .fold(0.0f32, f32::max);
        let small = (0..1000)
            .map(|_| displacement(&mut rng, 2.0, 512, 512).abs())
            .fold(0.0f32, f32::max);
        assert!(small < big);
        assert!(small <= 0.5 * 2.0 / 1024.0 * 3.0);
    }

    #[test]
    fn displacement_determinism() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..32 {
            assert_eq!(
                displacement(&mut a, 10.0, 64, 64),
                displacement(&mut b, 10.0, 64, 64)
            );
        }
    }

    #[test]
    fn attenuated_amplitude_halves() {
        let canvas = Canvas::new(64, 64).unwrap();
        let model = DisplacementModel::attenuated();
        let mut rng = StdRng::seed_from_u64(3);
        for depth in 0..6 {
            let bound = 0.75 * 0.5f32.powi(depth as i32);
            for _ in 0..500 {
                let d = model.sample(&mut rng, 8.0, 8.0, canvas, depth);
                assert!(d >= -bound && d < bound);
            }
        }
    }

    #[test]
    fn size_scaled_sample_matches_displacement() {
        let canvas = Canvas::new(96, 40).unwrap();
        let mut a = StdRng::seed_from_u64(21);
        let mut b = a.clone();
        for (hw, hh) in [(48.0, 20.0), (6.0, 2.5), (0.75, 0.3125)] {
            let sampled = DisplacementModel::SizeScaled.sample(&mut a, hw, hh, canvas, 4);
            let direct = displacement(&mut b, (hw + hh) as f32, 96, 40);
            assert_eq!(sampled, direct);
        }
    }

    #[test]
    fn default_model_is_size_scaled() {
        assert_eq!(DisplacementModel::default(), DisplacementModel::SizeScaled);
    }

    #[test]
    fn flat_is_zero() {
        let canvas = Canvas::new(16, 16).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            DisplacementModel::Flat.sample(&mut rng, 8.0, 8.0, canvas, 0),
            0.0
        );
    }

    #[test]
    fn attenuated_validation() {
        let bad = DisplacementModel::Attenuated {
            initial_max: f32::NAN,
            attenuation: 0.5,
        };
        assert!(bad.validate().is_err());
        let bad = DisplacementModel::Attenuated {
            initial_max: 0.5,
            attenuation: -1.0,
        };
        assert!(bad.validate().is_err());
        assert!(DisplacementModel::attenuated().validate().is_ok());
        assert!(DisplacementModel::SizeScaled.validate().is_ok());
    }
}
