//! Surface response weights used by the shader.

use crate::ConfigError;
use lumen_math::Vec3;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// How a surface splits incoming light between absorption, mirror
/// reflection, diffuse scattering and its own ambient color.
///
/// The four weights always sum to 1. `fuzz` in `[0, 1]` roughens the
/// reflected direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    absorption: f64,
    reflection: f64,
    diffusion: f64,
    ambient: f64,
    color: Color,
    fuzz: f64,
}

impl Material {
    /// Create a material from raw weights, normalized by their sum.
    ///
    /// Fails if any weight is negative or not finite, if they sum to zero,
    /// or if `color` has a negative or non-finite component.
    pub fn new(
        absorption: f64,
        reflection: f64,
        diffusion: f64,
        ambient: f64,
        color: Color,
    ) -> Result<Self, ConfigError> {
        for (name, value) in [
            ("absorption", absorption),
            ("reflection", reflection),
            ("diffusion", diffusion),
            ("ambient", ambient),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidMaterialWeight { name, value });
            }
        }
        check_color(color)?;

        let sum = absorption + reflection + diffusion + ambient;
        if sum <= 0.0 {
            return Err(ConfigError::DegenerateMaterial);
        }

        Ok(Self {
            absorption: absorption / sum,
            reflection: reflection / sum,
            diffusion: diffusion / sum,
            ambient: ambient / sum,
            color,
            fuzz: 0.0,
        })
    }

    /// A surface that only shows its own color, unaffected by the scene.
    pub fn emissive(color: Color) -> Result<Self, ConfigError> {
        Self::new(0.0, 0.0, 0.0, 1.0, color)
    }

    /// Builder form of [`Material::set_fuzz`].
    pub fn with_fuzz(mut self, fuzz: f64) -> Self {
        self.set_fuzz(fuzz);
        self
    }

    /// Set the reflection roughness, clamped to `[0, 1]`.
    pub fn set_fuzz(&mut self, fuzz: f64) {
        self.fuzz = if fuzz.is_nan() { 0.0 } else { fuzz.clamp(0.0, 1.0) };
    }

    pub fn set_color(&mut self, color: Color) -> Result<(), ConfigError> {
        check_color(color)?;
        self.color = color;
        Ok(())
    }

    /// Scale the base color. Negative or NaN factors give black.
    pub fn multiply_color(&mut self, factor: f64) {
        let factor = if factor.is_finite() { factor.max(0.0) } else { 0.0 };
        self.color *= factor;
    }

    pub fn absorption(&self) -> f64 {
        self.absorption
    }

    pub fn reflection(&self) -> f64 {
        self.reflection
    }

    pub fn diffusion(&self) -> f64 {
        self.diffusion
    }

    pub fn ambient(&self) -> f64 {
        self.ambient
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            absorption: 0.2,
            reflection: 0.0,
            diffusion: 0.3,
            ambient: 0.5,
            color: Color::ONE,
            fuzz: 0.0,
        }
    }
}

pub(crate) fn check_color(color: Color) -> Result<(), ConfigError> {
    if color.is_finite() && color.min_element() >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidColor(color.x, color.y, color.z))
    }
}
