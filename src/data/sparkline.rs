//! Sparkline geometry.
//!
//! Turns a series of percentages into drawable shapes: polyline points and
//! SVG paths for exports, 8-level buckets for block-character sparklines,
//! and integer bars for the ratatui `Sparkline` widget.

use std::fmt::Write;

/// Block characters for 8 levels of height.
pub const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A value series plus the vertical domain it is drawn against.
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkline {
    values: Vec<f64>,
    domain: Option<(f64, f64)>,
}

impl Sparkline {
    /// Build a sparkline, dropping non-finite values.
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            values: values.into_iter().filter(|v| v.is_finite()).collect(),
            domain: None,
        }
    }

    /// Draw against a fixed domain instead of the data's min..max.
    pub fn with_domain(mut self, lo: f64, hi: f64) -> Self {
        self.domain = Some((lo.min(hi), lo.max(hi)));
        self
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The (min, max) the series is scaled against.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if let Some(domain) = self.domain {
            return Some(domain);
        }
        let min = self.values.iter().copied().reduce(f64::min)?;
        let max = self.values.iter().copied().reduce(f64::max)?;
        Some((min, max))
    }

    /// Scaler from a value to its position within the bounds, `0.0..=1.0`.
    ///
    /// The bounds are resolved once; a flat series (zero range) maps to the
    /// middle.
    fn scaler(&self) -> impl Fn(f64) -> f64 {
        let bounds = self.bounds();
        move |value| match bounds {
            Some((lo, hi)) if hi > lo => ((value - lo) / (hi - lo)).clamp(0.0, 1.0),
            _ => 0.5,
        }
    }

    /// Polyline points inside a `width` x `height` box with `padding` on
    /// every side. Screen coordinates: y grows downward, so larger values
    /// get smaller y.
    pub fn points(&self, width: f64, height: f64, padding: f64) -> Vec<(f64, f64)> {
        let n = self.values.len();
        if n == 0 {
            return Vec::new();
        }

        let inner_w = (width - 2.0 * padding).max(0.0);
        let inner_h = (height - 2.0 * padding).max(0.0);
        let step = if n > 1 { inner_w / (n - 1) as f64 } else { 0.0 };
        let fraction = self.scaler();

        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let x = if n > 1 {
                    padding + step * i as f64
                } else {
                    width / 2.0
                };
                let y = padding + (1.0 - fraction(v)) * inner_h;
                (x, y)
            })
            .collect()
    }

    /// SVG path data (`M x y L x y ...`) with two decimals.
    pub fn svg_path(&self, width: f64, height: f64, padding: f64) -> String {
        let mut path = String::new();
        for (i, (x, y)) in self.points(width, height, padding).into_iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                path.push(' ');
            }
            let _ = write!(path, "{} {:.2} {:.2}", command, x, y);
        }
        path
    }

    /// The last `n` values bucketed into levels `0..=7`.
    pub fn levels(&self, n: usize) -> Vec<u8> {
        let skip = self.values.len().saturating_sub(n);
        let fraction = self.scaler();
        self.values[skip..]
            .iter()
            .map(|&v| ((fraction(v) * 7.0).round() as u8).min(7))
            .collect()
    }

    /// Block-character rendering of the last `n` values, right-aligned and
    /// padded with spaces to exactly `n` characters.
    pub fn render_blocks(&self, n: usize) -> String {
        let levels = self.levels(n);
        let mut out = " ".repeat(n - levels.len());
        out.extend(levels.iter().map(|&l| SPARKLINE_CHARS[l as usize]));
        out
    }

    /// Values as integers for bar widgets, multiplied by `scale`.
    pub fn bars(&self, scale: f64) -> Vec<u64> {
        self.values.iter().map(|v| (v * scale).max(0.0).round() as u64).collect()
    }
}
