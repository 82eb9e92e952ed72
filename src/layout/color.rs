//! Planet colour encoding.
//!
//! Hues are spread evenly over the surviving repositories; saturation and
//! lightness are drawn per session. `Hsl` is what the layout stores,
//! `Rgba` is what the painter consumes.

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };
    /// Sun body.
    pub const GOLD: Self = Self { r: 255, g: 215, b: 0, a: 255 };
    /// Sun glow and emissive tint.
    pub const ORANGE: Self = Self { r: 255, g: 165, b: 0, a: 255 };
    /// Moons.
    pub const MOON_GRAY: Self = Self { r: 170, g: 170, b: 170, a: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Linear blend toward `other`, `t` in [0, 1].
    pub fn mix(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: lerp(self.a, other.a),
        }
    }

    /// Scale the RGB channels by `factor` (simple diffuse shading).
    pub fn shade(self, factor: f64) -> Self {
        let f = factor.max(0.0);
        let scale = |c: u8| (c as f64 * f).round().min(255.0) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }
}

/// Hue in degrees [0, 360), saturation and lightness in percent [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    pub fn to_rgba(self) -> Rgba {
        let h = self.hue.rem_euclid(360.0) / 360.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = to_byte(l);
            return Rgba::rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgba::rgb(
            to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
            to_byte(hue_to_channel(p, q, h)),
            to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
        )
    }
}

impl std::fmt::Display for Hsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hsl({:.0}, {:.1}%, {:.1}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[inline]
fn to_byte(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(Hsl::new(0.0, 100.0, 50.0).to_rgba(), Rgba::rgb(255, 0, 0));
        assert_eq!(Hsl::new(120.0, 100.0, 50.0).to_rgba(), Rgba::rgb(0, 255, 0));
        assert_eq!(Hsl::new(240.0, 100.0, 50.0).to_rgba(), Rgba::rgb(0, 0, 255));
        assert_eq!(Hsl::new(360.0, 100.0, 50.0).to_rgba(), Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn grayscale_when_unsaturated() {
        assert_eq!(Hsl::new(200.0, 0.0, 50.0).to_rgba(), Rgba::rgb(128, 128, 128));
        assert_eq!(Hsl::new(10.0, 80.0, 100.0).to_rgba(), Rgba::WHITE);
    }

    #[test]
    fn mix_and_shade() {
        let black = Rgba::rgb(0, 0, 0);
        let c = Rgba::rgb(100, 200, 50);
        assert_eq!(black.mix(c, 0.5), Rgba::rgb(50, 100, 25));
        assert_eq!(c.shade(0.5), Rgba::rgb(50, 100, 25));
        assert_eq!(c.shade(3.0), Rgba::rgb(255, 255, 150));
    }

    #[test]
    fn display_matches_css_notation() {
        let hsl = Hsl::new(90.0, 70.0, 52.5);
        assert_eq!(hsl.to_string(), "hsl(90, 70.0%, 52.5%)");
    }
}
