use crate::color::Color;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound on `particle_count`. Connection lines check every pair each
/// frame, so cost grows with the square of the count.
pub const MAX_PARTICLES: usize = 1000;

/// What happens to a particle that leaves the surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Teleport to the opposite edge.
    Wrap,
    /// Bounce by inverting the velocity component on that axis.
    Reflect,
}

/// Faint lines drawn between particles closer than `distance`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkStyle {
    pub distance: f64,
    /// Opacity of a link between two coincident particles.
    pub opacity: f64,
    pub width: f64,
}

impl Default for LinkStyle {
    fn default() -> Self {
        LinkStyle {
            distance: 100.0,
            opacity: 0.1,
            width: 0.5,
        }
    }
}

/// Soft push away from the mouse for particles within `radius`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repulsion {
    pub radius: f64,
    pub strength: f64,
}

impl Default for Repulsion {
    fn default() -> Self {
        Repulsion {
            radius: 100.0,
            strength: 0.01,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub boundary: BoundaryPolicy,
    /// Each velocity component is drawn from `[-speed, speed)`.
    pub speed: f64,
    pub radius: (f64, f64),
    pub opacity: (f64, f64),
    pub color: Color,
    pub links: Option<LinkStyle>,
    pub repulsion: Option<Repulsion>,
    pub respawn_on_resize: bool,
}

impl FieldConfig {
    /// Slow wrapping drift joined by proximity lines, no pointer interaction.
    pub fn drifting() -> Self {
        FieldConfig {
            particle_count: 100,
            boundary: BoundaryPolicy::Wrap,
            speed: 0.25,
            radius: (0.5, 2.5),
            opacity: (0.2, 0.7),
            color: Color::CYAN,
            links: Some(LinkStyle::default()),
            repulsion: None,
            respawn_on_resize: false,
        }
    }

    /// Fewer, larger particles bouncing off the edges and shying away from
    /// the mouse.
    pub fn interactive() -> Self {
        FieldConfig {
            particle_count: 50,
            boundary: BoundaryPolicy::Reflect,
            radius: (1.0, 3.0),
            links: None,
            repulsion: Some(Repulsion::default()),
            ..FieldConfig::drifting()
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "drifting" => Some(FieldConfig::drifting()),
            "interactive" => Some(FieldConfig::interactive()),
            _ => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, crate::Error> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count > MAX_PARTICLES {
            return Err(ConfigError::TooManyParticles {
                requested: self.particle_count,
                max: MAX_PARTICLES,
            });
        }
        non_negative("speed", self.speed)?;
        range("radius", self.radius)?;
        non_negative("radius", self.radius.0)?;
        range("opacity", self.opacity)?;
        if self.opacity.0 < 0.0 || self.opacity.1 > 1.0 {
            return Err(ConfigError::InvalidRange {
                field: "opacity",
                min: self.opacity.0,
                max: self.opacity.1,
            });
        }
        unit("color.a", self.color.a)?;
        if let Some(links) = &self.links {
            if !(links.distance > 0.0) || !links.distance.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field: "links.distance",
                    value: links.distance,
                });
            }
            unit("links.opacity", links.opacity)?;
            non_negative("links.width", links.width)?;
        }
        if let Some(repulsion) = &self.repulsion {
            non_negative("repulsion.radius", repulsion.radius)?;
            if !repulsion.strength.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field: "repulsion.strength",
                    value: repulsion.strength,
                });
            }
        }
        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig::drifting()
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

fn unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

fn range(field: &'static str, (min, max): (f64, f64)) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { field, min, max })
    }
}
