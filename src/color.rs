use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::analysis::aggregate::{Difficulty, Standing};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Fixed chart colours
// ---------------------------------------------------------------------------

pub const HISTOGRAM_FILL: Color32 = Color32::from_rgb(135, 206, 235);
pub const COHORT_FILL: Color32 = Color32::from_rgb(240, 128, 128);
pub const MEAN_LINE: Color32 = Color32::from_rgb(220, 40, 40);

pub fn difficulty_color(difficulty: Difficulty) -> Color32 {
    match difficulty {
        Difficulty::Easy => Color32::from_rgb(46, 160, 67),
        Difficulty::Moderate => Color32::from_rgb(245, 166, 35),
        Difficulty::Hard => Color32::from_rgb(214, 48, 49),
    }
}

pub fn standing_color(standing: Standing) -> Color32 {
    match standing {
        Standing::Favorable => difficulty_color(Difficulty::Easy),
        Standing::Unfavorable => difficulty_color(Difficulty::Hard),
    }
}

// ---------------------------------------------------------------------------
// Color mapping: exam variant → Color32
// ---------------------------------------------------------------------------

/// Maps exam variant labels to distinct colours.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map for the given labels, in the given order.
    pub fn new(labels: &[String]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
    }

    #[test]
    fn unknown_label_falls_back_to_gray() {
        let map = ColorMap::new(&["A".to_string(), "B".to_string()]);
        assert_ne!(map.color_for("A"), map.color_for("B"));
        assert_eq!(map.color_for("Z"), Color32::GRAY);
    }
}
