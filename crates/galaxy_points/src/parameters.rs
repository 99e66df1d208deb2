use crate::GalaxyError;
use bevy::color::{ColorToComponents, LinearRgba, Srgba};

/// How the per-axis positional jitter relates to the `randomness` field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterScaling {
    /// Jitter magnitude is governed by `randomness_power` alone and `randomness` is ignored.
    /// This reproduces the classic three.js galaxy output.
    #[default]
    Unscaled,
    /// Jitter is multiplied by `randomness` before it is applied.
    ByRandomness,
}

/// Inputs of one generation pass. Plain values only, nothing is cached here.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSet {
    pub count: usize,
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
    pub spin: f32, // radians per unit radius
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Srgba,
    pub outside_color: Srgba,
    pub jitter_scaling: JitterScaling,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            count: 25_000,
            size: 0.02,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 2.5,
            inside_color: Srgba::rgb_u8(0x78, 0xc1, 0xdd),
            outside_color: Srgba::rgb_u8(0x00, 0x69, 0x92),
            jitter_scaling: JitterScaling::Unscaled,
        }
    }
}

impl ParameterSet {
    /// Lower bounds used by the debug panel sliders.
    pub const MIN: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 1,
        spin: -5.0,
        randomness: 0.0,
        randomness_power: 1.0,
        inside_color: Srgba::BLACK,
        outside_color: Srgba::BLACK,
        jitter_scaling: JitterScaling::Unscaled,
    };
    /// Upper bounds used by the debug panel sliders.
    pub const MAX: Self = Self {
        count: 100_000,
        size: 0.1,
        radius: 20.0,
        branches: 20,
        spin: 5.0,
        randomness: 2.0,
        randomness_power: 10.0,
        inside_color: Srgba::WHITE,
        outside_color: Srgba::WHITE,
        jitter_scaling: JitterScaling::ByRandomness,
    };

    /// Checks every field against its valid range.
    ///
    /// Values are rejected, never clamped, so a bad edit cannot silently
    /// turn into a different galaxy.
    pub fn validate(&self) -> Result<(), GalaxyError> {
        if self.count == 0 {
            return Err(GalaxyError::invalid("count", "must be at least 1"));
        }
        positive_finite("size", self.size)?;
        positive_finite("radius", self.radius)?;
        if self.branches == 0 {
            return Err(GalaxyError::invalid("branches", "must be at least 1"));
        }
        if !self.spin.is_finite() {
            return Err(GalaxyError::invalid("spin", format!("must be finite, got {}", self.spin)));
        }
        if !(self.randomness.is_finite() && self.randomness >= 0.0) {
            return Err(GalaxyError::invalid(
                "randomness",
                format!("must be non-negative, got {}", self.randomness),
            ));
        }
        if !(self.randomness_power.is_finite() && self.randomness_power >= 1.0) {
            return Err(GalaxyError::invalid(
                "randomness_power",
                format!("must be at least 1, got {}", self.randomness_power),
            ));
        }
        Ok(())
    }
}

fn positive_finite(name: &'static str, value: f32) -> Result<(), GalaxyError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GalaxyError::invalid(name, format!("must be positive, got {}", value)))
    }
}

/// Parses a CSS style hex color such as `#78c1dd` or `fff`.
pub fn parse_hex_color(hex: &str) -> Result<Srgba, GalaxyError> {
    Srgba::hex(hex.trim()).map_err(|err| GalaxyError::invalid("color", format!("{hex:?}: {err}")))
}

/// Linear blend between the inside and outside colors.
///
/// Endpoints are converted to linear RGB first, which is the space the
/// renderer expects vertex colors in.
#[derive(Clone, Copy, Debug)]
pub struct ColorGradient {
    inside: [f32; 3],
    outside: [f32; 3],
}

impl ColorGradient {
    pub fn new(params: &ParameterSet) -> Self {
        Self {
            inside: LinearRgba::from(params.inside_color).to_vec3().to_array(),
            outside: LinearRgba::from(params.outside_color).to_vec3().to_array(),
        }
    }

    /// `t` is clamped to `[0, 1]`.
    pub fn sample(&self, t: f32) -> [f32; 3] {
        let t = t.clamp(0.0, 1.0);
        std::array::from_fn(|c| self.inside[c] * (1.0 - t) + self.outside[c] * t)
    }

    pub fn inside(&self) -> [f32; 3] {
        self.inside
    }

    pub fn outside(&self) -> [f32; 3] {
        self.outside
    }
}
