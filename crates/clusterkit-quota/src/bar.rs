//! Usage bar rendering.
//!
//! The bar is cropped: usage below `crop` of the limit renders as an empty
//! bar, and the full width covers the range from `crop` up to the limit.
//! Usage past the limit spills over the closing bracket.

use crate::parse::QuotaError;
use crate::theme::{BarStyle, Painter};

const FILLED: &str = "=";
const EMPTY: &str = "-";
const OVERFLOW: &str = "#";

/// Usage fraction above which a style applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub above: f64,
    pub style: BarStyle,
}

/// Bar geometry and color policy.
#[derive(Debug, Clone, PartialEq)]
pub struct BarConfig {
    /// Width between the brackets
    pub width: usize,
    /// Fraction of the limit collapsed to zero width
    pub crop: f64,
    /// Checked top-down; the first threshold below the usage fraction wins
    pub thresholds: Vec<Threshold>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 80,
            crop: 0.75,
            thresholds: vec![
                Threshold {
                    above: 0.98,
                    style: BarStyle::Alert,
                },
                Threshold {
                    above: 0.95,
                    style: BarStyle::Warning,
                },
            ],
        }
    }
}

impl BarConfig {
    pub fn validate(&self) -> Result<(), QuotaError> {
        if !(0.0..1.0).contains(&self.crop) {
            return Err(QuotaError::InvalidCrop(self.crop));
        }
        Ok(())
    }

    /// Style for the filled segment at usage fraction `frac`.
    pub fn style_for(&self, frac: f64) -> BarStyle {
        self.thresholds
            .iter()
            .find(|t| frac > t.above)
            .map(|t| t.style)
            .unwrap_or(BarStyle::Normal)
    }
}

/// Segment sizes for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    /// used / limit
    pub frac: f64,
    /// Fraction of the width to fill after cropping
    pub display_frac: f64,
    /// Units filled, including uncapped overflow
    pub filled: usize,
    /// Units filled inside the brackets
    pub normal: usize,
    /// Units past the closing bracket, at most `width`
    pub overflow: usize,
    pub style: BarStyle,
}

impl BarLayout {
    /// Lay out a bar; None when the limit is zero.
    pub fn compute(used_gb: u64, limit_gb: u64, config: &BarConfig) -> Option<Self> {
        if limit_gb == 0 {
            return None;
        }
        let frac = used_gb as f64 / limit_gb as f64;
        let display_frac = ((frac - config.crop) / (1.0 - config.crop)).max(0.0);
        // No epsilon before ceil: 90% of a 20-wide bar fills 13 units, not 12
        let filled = (display_frac * config.width as f64).ceil() as usize;
        let normal = filled.min(config.width);
        let overflow = (filled - normal).min(config.width);

        Some(Self {
            frac,
            display_frac,
            filled,
            normal,
            overflow,
            style: config.style_for(frac),
        })
    }
}

/// Render `[====----]## 4.9 of 5.0 TB`.
///
/// Sizes are in GB and shown divided by 1000. A zero limit renders `[n/a]`.
pub fn render_bar(used_gb: u64, limit_gb: u64, config: &BarConfig, painter: &dyn Painter) -> String {
    let annotation = format!(
        "{:.1} of {:.1} TB",
        used_gb as f64 / 1000.0,
        limit_gb as f64 / 1000.0
    );
    let Some(layout) = BarLayout::compute(used_gb, limit_gb, config) else {
        return format!("[n/a] {}", annotation);
    };

    let mut line = String::from("[");
    line.push_str(&painter.paint(&FILLED.repeat(layout.normal), layout.style));
    line.push_str(&painter.paint(
        &EMPTY.repeat(config.width - layout.normal),
        BarStyle::Empty,
    ));
    line.push(']');
    line.push_str(&painter.paint(&OVERFLOW.repeat(layout.overflow), BarStyle::Overflow));
    line.push(' ');
    line.push_str(&annotation);
    if used_gb > limit_gb {
        line.push_str(&format!(" <-- {} GB over!", used_gb - limit_gb));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Plain;
    use std::cell::RefCell;

    /// Records every painted segment.
    #[derive(Default)]
    struct Recorder {
        segments: RefCell<Vec<(String, BarStyle)>>,
    }

    impl Painter for Recorder {
        fn paint(&self, text: &str, style: BarStyle) -> String {
            self.segments.borrow_mut().push((text.to_string(), style));
            text.to_string()
        }
    }

    impl Recorder {
        fn style_of(&self, glyph: char) -> Option<BarStyle> {
            self.segments
                .borrow()
                .iter()
                .find(|(text, _)| text.starts_with(glyph))
                .map(|(_, style)| *style)
        }
    }

    fn config(width: usize) -> BarConfig {
        BarConfig {
            width,
            ..BarConfig::default()
        }
    }

    #[test]
    fn test_layout_below_crop_is_empty() {
        let layout = BarLayout::compute(50, 100, &config(80)).unwrap();
        assert_eq!(layout.display_frac, 0.0);
        assert_eq!(layout.filled, 0);
        assert_eq!(layout.style, BarStyle::Normal);
    }

    #[test]
    fn test_layout_warning_band() {
        let layout = BarLayout::compute(96, 100, &config(80)).unwrap();
        assert_eq!(layout.style, BarStyle::Warning);
        assert!((layout.display_frac - 0.84).abs() < 1e-9);
        assert_eq!(layout.filled, 68);
        assert_eq!(layout.overflow, 0);
    }

    #[test]
    fn test_layout_over_limit() {
        let layout = BarLayout::compute(120, 100, &config(80)).unwrap();
        assert_eq!(layout.style, BarStyle::Alert);
        assert_eq!(layout.normal, 80);
        assert!(layout.overflow > 0);
    }

    #[test]
    fn test_layout_zero_limit() {
        assert!(BarLayout::compute(10, 0, &config(80)).is_none());
    }

    #[test]
    fn test_style_thresholds() {
        let config = BarConfig::default();
        assert_eq!(config.style_for(0.5), BarStyle::Normal);
        assert_eq!(config.style_for(0.95), BarStyle::Normal);
        assert_eq!(config.style_for(0.96), BarStyle::Warning);
        assert_eq!(config.style_for(0.98), BarStyle::Warning);
        assert_eq!(config.style_for(0.99), BarStyle::Alert);
        assert_eq!(config.style_for(1.5), BarStyle::Alert);
    }

    #[test]
    fn test_custom_threshold_table() {
        let config = BarConfig {
            thresholds: vec![Threshold {
                above: 0.5,
                style: BarStyle::Alert,
            }],
            ..BarConfig::default()
        };
        assert_eq!(config.style_for(0.6), BarStyle::Alert);
        assert_eq!(config.style_for(0.4), BarStyle::Normal);
    }

    #[test]
    fn test_render_bar_paints_warning_band() {
        let painter = Recorder::default();
        render_bar(96, 100, &config(80), &painter);
        assert_eq!(painter.style_of('='), Some(BarStyle::Warning));
        assert_eq!(painter.style_of('-'), Some(BarStyle::Empty));
        assert_eq!(painter.style_of('#'), None);
    }

    #[test]
    fn test_render_bar_paints_overflow_separately() {
        let painter = Recorder::default();
        render_bar(120, 100, &config(80), &painter);
        assert_eq!(painter.style_of('='), Some(BarStyle::Alert));
        assert_eq!(painter.style_of('#'), Some(BarStyle::Overflow));
    }

    #[test]
    fn test_render_bar_overflow_below_alert_threshold() {
        // A custom table can leave the filled segment normal past the limit;
        // the overflow keeps its own style.
        let config = BarConfig {
            width: 20,
            thresholds: vec![],
            ..BarConfig::default()
        };
        let painter = Recorder::default();
        render_bar(5100, 5000, &config, &painter);
        assert_eq!(painter.style_of('='), Some(BarStyle::Normal));
        assert_eq!(painter.style_of('#'), Some(BarStyle::Overflow));
    }

    #[test]
    fn test_layout_overflow_capped_at_width() {
        let layout = BarLayout::compute(u64::MAX, 1, &config(20)).unwrap();
        assert_eq!(layout.normal, 20);
        assert_eq!(layout.overflow, 20);
        let line = render_bar(1_000_000, 1, &config(20), &Plain);
        assert_eq!(line.matches('#').count(), 20);
    }

    #[test]
    fn test_layout_ceil_keeps_float_noise() {
        // 0.9 usage crops to 0.6000000000000001, so 20 * that ceils to 13
        let layout = BarLayout::compute(4500, 5000, &config(20)).unwrap();
        assert_eq!(layout.filled, 13);
    }

    #[test]
    fn test_render_bar_plain() {
        let line = render_bar(4500, 5000, &config(20), &Plain);
        assert_eq!(line, "[=============-------] 4.5 of 5.0 TB");
    }

    #[test]
    fn test_render_bar_empty() {
        let line = render_bar(1000, 5000, &config(10), &Plain);
        assert_eq!(line, "[----------] 1.0 of 5.0 TB");
    }

    #[test]
    fn test_render_bar_overflow() {
        let line = render_bar(5100, 5000, &config(20), &Plain);
        assert_eq!(
            line,
            "[====================]## 5.1 of 5.0 TB <-- 100 GB over!"
        );
    }

    #[test]
    fn test_render_bar_zero_limit() {
        assert_eq!(render_bar(0, 0, &config(20), &Plain), "[n/a] 0.0 of 0.0 TB");
    }

    #[test]
    fn test_validate_crop() {
        assert!(BarConfig::default().validate().is_ok());
        let config = BarConfig {
            crop: 1.0,
            ..BarConfig::default()
        };
        assert!(matches!(config.validate(), Err(QuotaError::InvalidCrop(_))));
    }
}
