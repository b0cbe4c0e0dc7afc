use crate::noise::NoiseSource;
use crossterm::style::Color;

// Palette bounds and per-generation drift factors, as HSL fractions.
pub const MIN_HUE: f64 = 0.15;
pub const MAX_HUE: f64 = 0.35;
pub const HUE_GROWTH: f64 = 1.2;

pub const MIN_SAT: f64 = 0.4;
pub const MAX_SAT: f64 = 0.75;
pub const SAT_GROWTH: f64 = 1.1;

pub const MIN_LIGHT: f64 = 0.2;
pub const MAX_LIGHT: f64 = 0.4;
pub const LIGHT_DECAY: f64 = 0.95;

/// Per-branch color state. Each branch owns one shade; `evolve` derives the
/// next generation's shade without ever mutating the parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shade {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Default for Shade {
    fn default() -> Self {
        Self {
            hue: MIN_HUE,
            saturation: MIN_SAT,
            lightness: MAX_LIGHT,
        }
    }
}

impl Shade {
    /// Drift the shade for the next generation. Each channel is clamped
    /// toward its bound before jitter is added, so jitter can land slightly
    /// outside the nominal range.
    ///
    /// Only the evolved hue is carried to the child; saturation and lightness
    /// stay at the parent's values. The saturation/lightness drift is still
    /// sampled (it keeps the jitter stream moving) but deliberately unused —
    /// changing this would change every rendered figure.
    pub fn evolve(&self, noise: &mut dyn NoiseSource) -> Shade {
        let hue = (self.hue * HUE_GROWTH).min(MAX_HUE) + noise.sample(18.0);
        let _sat = (self.saturation * SAT_GROWTH).min(MAX_SAT) + noise.sample(8.0);
        let _light = (self.lightness * LIGHT_DECAY).max(MIN_LIGHT) + noise.sample(2.0);
        Shade {
            hue,
            saturation: self.saturation,
            lightness: self.lightness,
        }
    }

    /// CSS-style stroke expression with every channel rendered as a
    /// percentage, hue included.
    pub fn to_style_string(&self) -> String {
        format!(
            "hsl({}%, {}%, {}%)",
            self.hue * 100.0,
            self.saturation * 100.0,
            self.lightness * 100.0
        )
    }

    /// Nearest terminal color. Channels are clamped to [0,1] here only; the
    /// stored values keep any jitter overshoot.
    pub fn terminal_color(&self) -> Color {
        let (r, g, b) = hsl_to_rgb(
            self.hue.rem_euclid(1.0),
            self.saturation.clamp(0.0, 1.0),
            self.lightness.clamp(0.0, 1.0),
        );
        Color::Rgb { r, g, b }
    }
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let channel = |t: f64| -> u8 {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round() as u8
    };

    (channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseSource;

    /// Stub that behaves like a fixed uniform draw: `base / divisor`.
    struct Fixed(f64);

    impl NoiseSource for Fixed {
        fn sample(&mut self, divisor: f64) -> f64 {
            self.0 / divisor
        }
    }

    #[test]
    fn default_starts_at_palette_corners() {
        let shade = Shade::default();
        assert_eq!(shade.hue, MIN_HUE);
        assert_eq!(shade.saturation, MIN_SAT);
        assert_eq!(shade.lightness, MAX_LIGHT);
    }

    #[test]
    fn evolve_grows_hue_and_keeps_parent_sat_light() {
        let parent = Shade::default();
        let child = parent.evolve(&mut Fixed(0.0));
        assert!((child.hue - MIN_HUE * HUE_GROWTH).abs() < 1e-12);
        assert_eq!(child.saturation, parent.saturation);
        assert_eq!(child.lightness, parent.lightness);
    }

    #[test]
    fn hue_clamps_before_jitter() {
        // At the upper bound the clamp lands on MAX_HUE and jitter is added
        // afterwards, so the result can overshoot by at most 0.5/18.
        let at_bound = Shade {
            hue: MAX_HUE,
            ..Shade::default()
        };
        let high = at_bound.evolve(&mut Fixed(0.5));
        let low = at_bound.evolve(&mut Fixed(-0.5));
        assert!((high.hue - (MAX_HUE + 0.5 / 18.0)).abs() < 1e-12);
        assert!((low.hue - (MAX_HUE - 0.5 / 18.0)).abs() < 1e-12);
    }

    #[test]
    fn repeated_evolution_saturates_at_max_hue() {
        let mut shade = Shade::default();
        for _ in 0..20 {
            shade = shade.evolve(&mut Fixed(0.0));
        }
        assert!((shade.hue - MAX_HUE).abs() < 1e-12);
    }

    #[test]
    fn style_string_uses_percent_channels() {
        let shade = Shade {
            hue: 0.25,
            saturation: 0.5,
            lightness: 0.25,
        };
        assert_eq!(shade.to_style_string(), "hsl(25%, 50%, 25%)");
    }

    #[test]
    fn terminal_color_is_rgb() {
        // The default hue fraction 0.15 is 54 degrees: an olive yellow,
        // red and green close together and blue trailing well behind.
        match Shade::default().terminal_color() {
            Color::Rgb { r, g, b } => {
                assert!(r >= g && g > b, "expected olive rgb ({r},{g},{b})");
            }
            other => panic!("expected Color::Rgb, got {other:?}"),
        }
    }

    #[test]
    fn green_hue_maps_to_green_dominant_rgb() {
        let shade = Shade {
            hue: 1.0 / 3.0,
            saturation: 0.5,
            lightness: 0.4,
        };
        match shade.terminal_color() {
            Color::Rgb { r, g, b } => {
                assert!(g > r && g > b, "expected green-dominant rgb ({r},{g},{b})");
            }
            other => panic!("expected Color::Rgb, got {other:?}"),
        }
    }

    #[test]
    fn grey_when_unsaturated() {
        let shade = Shade {
            hue: 0.3,
            saturation: 0.0,
            lightness: 0.5,
        };
        match shade.terminal_color() {
            Color::Rgb { r, g, b } => {
                assert_eq!(r, g);
                assert_eq!(g, b);
            }
            other => panic!("expected Color::Rgb, got {other:?}"),
        }
    }
}
