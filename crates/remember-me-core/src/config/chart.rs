use super::EssayConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Constants of the two-bucket categorical layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalConfig {
    /// Gap between the axis and the first dot of either bucket.
    pub start_offset: f64,
    /// Space reserved above the tallest upper bucket.
    pub top_padding: f64,
    pub min_bottom_space: f64,
    /// Extra room kept below the tallest lower bucket.
    pub bottom_margin: f64,
    pub label_distance: f64,
    pub label_x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipConfig {
    pub thumbnail_size: f64,
    pub edge_padding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub dot_fill: String,
    pub accent_fill: String,
    pub divider_stroke: String,
    pub font_family: String,
    pub axis_font_size: f64,
    pub label_font_size: f64,
}

/// Resolved, validated chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub margin: Margin,
    pub min_year: i32,
    pub max_year: i32,
    pub dot_radius: f64,
    /// Radius of dots in the highlighted year.
    pub highlight_radius: f64,
    pub dot_spacing: f64,
    pub baseline_inset: f64,
    pub categorical: CategoricalConfig,
    pub transition_duration_ms: u64,
    pub tooltip: TooltipConfig,
    pub theme: ThemeConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        // The bundled defaults always resolve.
        Self::from_essay_config(&super::default_essay_config())
            .expect("bundled default config resolves")
    }
}

fn required_f64(cfg: &EssayConfig, path: &str) -> Result<f64> {
    let v = cfg.get_f64(path).ok_or_else(|| Error::InvalidConfig {
        message: format!("missing or non-numeric `{path}`"),
    })?;
    if !v.is_finite() {
        return Err(Error::InvalidConfig {
            message: format!("`{path}` must be finite"),
        });
    }
    Ok(v)
}

fn required_year(cfg: &EssayConfig, path: &str) -> Result<i32> {
    let v = cfg.get_i64(path).ok_or_else(|| Error::InvalidConfig {
        message: format!("missing or non-integer `{path}`"),
    })?;
    i32::try_from(v).map_err(|_| Error::InvalidConfig {
        message: format!("`{path}` is out of range: {v}"),
    })
}

fn string_or(cfg: &EssayConfig, path: &str, fallback: &str) -> String {
    cfg.get_str(path).unwrap_or(fallback).to_string()
}

impl ChartConfig {
    /// Resolves `cfg` (usually defaults merged with user overrides).
    pub fn from_essay_config(cfg: &EssayConfig) -> Result<Self> {
        let out = Self {
            viewport_width: required_f64(cfg, "viewport.width")?,
            viewport_height: required_f64(cfg, "viewport.height")?,
            margin: Margin {
                top: required_f64(cfg, "margin.top")?,
                right: required_f64(cfg, "margin.right")?,
                bottom: required_f64(cfg, "margin.bottom")?,
                left: required_f64(cfg, "margin.left")?,
            },
            min_year: required_year(cfg, "timeline.minYear")?,
            max_year: required_year(cfg, "timeline.maxYear")?,
            dot_radius: required_f64(cfg, "timeline.dotRadius")?,
            highlight_radius: required_f64(cfg, "timeline.highlightRadius")?,
            dot_spacing: required_f64(cfg, "timeline.dotSpacing")?,
            baseline_inset: required_f64(cfg, "timeline.baselineInset")?,
            categorical: CategoricalConfig {
                start_offset: required_f64(cfg, "categorical.startOffset")?,
                top_padding: required_f64(cfg, "categorical.topPadding")?,
                min_bottom_space: required_f64(cfg, "categorical.minBottomSpace")?,
                bottom_margin: required_f64(cfg, "categorical.bottomMargin")?,
                label_distance: required_f64(cfg, "categorical.labelDistance")?,
                label_x: required_f64(cfg, "categorical.labelX")?,
            },
            transition_duration_ms: required_f64(cfg, "animation.transitionDuration")?.max(0.0)
                as u64,
            tooltip: TooltipConfig {
                thumbnail_size: required_f64(cfg, "tooltip.thumbnailSize")?,
                edge_padding: required_f64(cfg, "tooltip.edgePadding")?,
            },
            theme: ThemeConfig {
                dot_fill: string_or(cfg, "theme.dotFill", "#000"),
                accent_fill: string_or(cfg, "theme.accentFill", "#0000FF"),
                divider_stroke: string_or(cfg, "theme.dividerStroke", "#ddd"),
                font_family: string_or(
                    cfg,
                    "theme.fontFamily",
                    "Gill Sans, Gill Sans MT, sans-serif",
                ),
                axis_font_size: cfg.get_f64("theme.axisFontSize").unwrap_or(21.0),
                label_font_size: cfg.get_f64("theme.labelFontSize").unwrap_or(21.0),
            },
        };
        out.validate()?;
        Ok(out)
    }

    fn validate(&self) -> Result<()> {
        if self.min_year > self.max_year {
            return Err(Error::InvalidConfig {
                message: format!(
                    "year range is inverted: {}..={}",
                    self.min_year, self.max_year
                ),
            });
        }
        if self.dot_spacing <= 0.0 {
            return Err(Error::InvalidConfig {
                message: "`timeline.dotSpacing` must be positive".to_string(),
            });
        }
        let (width, height) = (self.chart_width(), self.chart_height());
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(Error::InvalidConfig {
                message: format!(
                    "viewport {}x{} leaves no usable chart area after margins",
                    self.viewport_width, self.viewport_height
                ),
            });
        }
        Ok(())
    }

    /// Plot area width (viewport minus horizontal margins).
    pub fn chart_width(&self) -> f64 {
        self.viewport_width - self.margin.left - self.margin.right
    }

    /// Plot area height (viewport minus vertical margins).
    pub fn chart_height(&self) -> f64 {
        self.viewport_height - self.margin.top - self.margin.bottom
    }

    pub fn year_range(&self) -> std::ops::RangeInclusive<i32> {
        self.min_year..=self.max_year
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn default_chart_area_subtracts_margins() {
        let cfg = ChartConfig::default();
        assert_eq!(cfg.chart_width(), 1400.0);
        assert_eq!(cfg.chart_height(), 570.0);
        assert_eq!(cfg.transition_duration(), Duration::from_millis(250));
        assert_eq!(cfg.categorical.top_padding, 180.0);
        assert_eq!(cfg.highlight_radius, 6.0);
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let mut overrides = EssayConfig::empty_object();
        overrides.set_value("timeline.minYear", json!(1900));
        let err = ChartConfig::from_essay_config(&EssayConfig::with_overrides(&overrides))
            .unwrap_err();
        assert!(err.to_string().contains("inverted"), "{err}");
    }

    fn resolve_viewport(width: Value, height: Value) -> Result<ChartConfig> {
        let mut overrides = EssayConfig::empty_object();
        overrides.set_value("viewport.width", width);
        overrides.set_value("viewport.height", height);
        ChartConfig::from_essay_config(&EssayConfig::with_overrides(&overrides))
    }

    #[test]
    fn tiny_viewport_is_rejected() {
        let err = resolve_viewport(json!(300), json!(300)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn non_finite_viewport_is_rejected() {
        // serde_json stores non-finite floats as null.
        for (w, h) in [
            (f64::NAN, 1200.0),
            (1600.0, f64::NAN),
            (f64::INFINITY, 1200.0),
        ] {
            let err = resolve_viewport(Value::from(w), Value::from(h)).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig { .. }), "{w}x{h}: {err}");
        }

        let mut overrides = EssayConfig::empty_object();
        overrides.set_value("viewport.width", json!(1e308));
        overrides.set_value("margin.left", json!(-1e308));
        let err = ChartConfig::from_essay_config(&EssayConfig::with_overrides(&overrides))
            .unwrap_err();
        assert!(err.to_string().contains("no usable chart area"), "{err}");
    }

    #[test]
    fn viewport_override_resizes_the_chart_area() {
        let cfg = resolve_viewport(json!(1000), json!(1200)).unwrap();
        assert_eq!(cfg.chart_width(), 800.0);
        assert_eq!(cfg.chart_height(), 570.0);
    }

    #[test]
    fn non_positive_spacing_is_rejected() {
        let mut overrides = EssayConfig::empty_object();
        overrides.set_value("timeline.dotSpacing", json!(0));
        assert!(ChartConfig::from_essay_config(&EssayConfig::with_overrides(&overrides)).is_err());
    }
}
