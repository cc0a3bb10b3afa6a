use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Hex parsing
// ---------------------------------------------------------------------------

/// Parse `#RRGGBB` (or `RRGGBB`) into a [`Color32`].
pub fn hex_color(hex: &str) -> Option<Color32> {
    let rgb = Srgb::<u8>::from_str(hex.trim()).ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

// ---------------------------------------------------------------------------
// Chart palette
// ---------------------------------------------------------------------------

/// Colours shared by every chart on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPalette {
    /// Highlighted bar.
    pub accent: Color32,
    /// All other bars.
    pub muted: Color32,
    /// Scatter points of the regression plots (accent at half opacity).
    pub scatter: Color32,
    /// Regression line.
    pub fit_line: Color32,
}

impl Default for ChartPalette {
    fn default() -> Self {
        let accent = hex_color("#72BCD4").unwrap_or(Color32::LIGHT_BLUE);
        ChartPalette {
            accent,
            muted: hex_color("#D3D3D3").unwrap_or(Color32::LIGHT_GRAY),
            scatter: Color32::from_rgba_unmultiplied(accent.r(), accent.g(), accent.b(), 128),
            fit_line: Color32::RED,
        }
    }
}

impl ChartPalette {
    /// One colour per bar: the largest value gets the accent, the rest are muted.
    /// Ties highlight the first maximum.
    pub fn highlight_max(&self, values: &[f64]) -> Vec<Color32> {
        let max_idx = values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })
            .map(|(i, _)| i);

        values
            .iter()
            .enumerate()
            .map(|(i, _)| if Some(i) == max_idx { self.accent } else { self.muted })
            .collect()
    }

    /// A darker shade of the accent for lines drawn on top of bars or points.
    pub fn accent_dark(&self) -> Color32 {
        let rgb = Srgb::new(
            self.accent.r() as f32 / 255.0,
            self.accent.g() as f32 / 255.0,
            self.accent.b() as f32 / 255.0,
        );
        let mut hsl: Hsl = rgb.into_color();
        hsl.lightness *= 0.6;
        let out: Srgb = hsl.into_color();
        Color32::from_rgb(
            (out.red * 255.0) as u8,
            (out.green * 255.0) as u8,
            (out.blue * 255.0) as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(hex_color("#72BCD4"), Some(Color32::from_rgb(0x72, 0xBC, 0xD4)));
        assert_eq!(hex_color("D3D3D3"), Some(Color32::from_rgb(0xD3, 0xD3, 0xD3)));
        assert_eq!(hex_color("not a colour"), None);
    }

    #[test]
    fn highlights_only_the_largest_bar() {
        let p = ChartPalette::default();
        let colors = p.highlight_max(&[10.0, 40.0, 40.0, 5.0]);
        assert_eq!(colors, vec![p.muted, p.accent, p.muted, p.muted]);
        assert!(p.highlight_max(&[]).is_empty());
    }

    #[test]
    fn accent_dark_is_darker() {
        let p = ChartPalette::default();
        let dark = p.accent_dark();
        let sum = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(sum(dark) < sum(p.accent));
    }
}
