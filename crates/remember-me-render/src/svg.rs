//! Standalone SVG output for a [`SceneRenderer`].
//!
//! Static attributes always carry the *final* state of the running transition, so rasterizers
//! that ignore SMIL (resvg) draw the end frame. Browsers play the `<animate>` elements from the
//! previous state.

use crate::scene::{AxisState, Dot, SceneRenderer};
use crate::{Error, Result};
use std::fmt::Write as _;

/// SMIL approximation of a cubic in-out ease.
const CUBIC_IN_OUT_SPLINE: &str = "0.645 0.045 0.355 1";
/// Decorations fade in halfway through the transition, over this many milliseconds.
const DECORATION_FADE_MS: f64 = 400.0;
const TICK_SIZE: f64 = 6.0;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root `id`; also scopes the embedded CSS.
    pub diagram_id: Option<String>,
    /// Emit SMIL animations for the running transition.
    pub animate: bool,
    /// CSS background color of the root element.
    pub background: Option<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            animate: true,
            background: Some("white".to_string()),
        }
    }
}

fn fmt(v: f64) -> String {
    let mut v = if v.is_finite() { v } else { 0.0 };
    if v.abs() < 1e-9 {
        v = 0.0;
    }
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == 0.0 {
        // Avoid `-0`.
        v = 0.0;
    }
    format!("{v}")
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

struct Timing {
    dur_ms: f64,
}

impl Timing {
    fn write_animate(&self, out: &mut String, attribute: &str, from: &str, to: &str) {
        let _ = write!(
            out,
            r#"<animate attributeName="{attribute}" from="{from}" to="{to}" begin="0s" dur="{dur}ms" fill="freeze" calcMode="spline" keyTimes="0;1" keySplines="{CUBIC_IN_OUT_SPLINE}"/>"#,
            from = escape_xml(from),
            to = escape_xml(to),
            dur = fmt(self.dur_ms),
        );
    }

    fn write_translate(&self, out: &mut String, from_y: f64, to_y: f64) {
        let _ = write!(
            out,
            r#"<animateTransform attributeName="transform" type="translate" from="0 {from}" to="0 {to}" begin="0s" dur="{dur}ms" fill="freeze" calcMode="spline" keyTimes="0;1" keySplines="{CUBIC_IN_OUT_SPLINE}"/>"#,
            from = fmt(from_y),
            to = fmt(to_y),
            dur = fmt(self.dur_ms),
        );
    }

    /// Hidden for the first half of the transition, then faded in.
    fn write_delayed_fade_in(&self, out: &mut String, opacity: f64) {
        let delay = self.dur_ms / 2.0;
        let total = delay + DECORATION_FADE_MS;
        let _ = write!(
            out,
            r#"<animate attributeName="opacity" values="0;0;{op}" keyTimes="0;{mid};1" begin="0s" dur="{total}ms" fill="freeze"/>"#,
            op = fmt(opacity),
            mid = fmt((delay / total * 1000.0).round() / 1000.0),
            total = fmt(total),
        );
    }
}

fn css(id: &str, scene: &SceneRenderer) -> String {
    let theme = &scene.config().theme;
    let font = escape_xml(&theme.font_family);
    let cursor = if scene.interactions_armed() {
        "pointer"
    } else {
        "default"
    };
    format!(
        "#{id}{{font-family:{font};}}\
#{id} .x-axis text{{font-size:{axis}px;font-family:{font};}}\
#{id} .category-label{{font-size:{label}px;font-weight:500;}}\
#{id} .portrait-dot{{stroke:none;cursor:{cursor};}}",
        axis = fmt(theme.axis_font_size),
        label = fmt(theme.label_font_size),
    )
}

fn render_axis(
    out: &mut String,
    scene: &SceneRenderer,
    axis: &AxisState,
    timing: Option<&Timing>,
) {
    let width = scene.config().chart_width();
    let _ = write!(
        out,
        r#"<g class="x-axis" transform="translate(0, {y})" fill="none" text-anchor="middle">"#,
        y = fmt(axis.y),
    );
    if let Some(timing) = timing {
        if axis.from_y != axis.y {
            timing.write_translate(out, axis.from_y, axis.y);
        }
    }
    let _ = write!(
        out,
        r#"<path class="domain" stroke="currentColor" d="M0,{t}V0H{w}V{t}"/>"#,
        t = fmt(TICK_SIZE),
        w = fmt(width),
    );

    let label_opacity = |visible: bool| if visible { "1" } else { "0" };
    for (year, x) in scene.ticks() {
        let _ = write!(
            out,
            r#"<g class="tick" opacity="1" transform="translate({x},0)"><line stroke="currentColor" y2="{t}"/>"#,
            x = fmt(*x),
            t = fmt(TICK_SIZE),
        );
        let _ = write!(
            out,
            r#"<text fill="currentColor" y="{y}" dy="0.71em" opacity="{op}">"#,
            y = fmt(axis.label_y),
            op = label_opacity(axis.labels_visible),
        );
        if let Some(timing) = timing {
            if axis.from_label_y != axis.label_y {
                timing.write_animate(out, "y", &fmt(axis.from_label_y), &fmt(axis.label_y));
            }
            if axis.labels_were_visible != axis.labels_visible {
                timing.write_animate(
                    out,
                    "opacity",
                    label_opacity(axis.labels_were_visible),
                    label_opacity(axis.labels_visible),
                );
            }
        }
        let _ = write!(out, "{year}</text></g>");
    }
    out.push_str("</g>");
}

fn render_decorations(out: &mut String, scene: &SceneRenderer, timing: Option<&Timing>) {
    if let Some(divider) = scene.divider() {
        let _ = write!(
            out,
            r#"<line class="divider-line" x1="{x1}" x2="{x2}" y1="{y}" y2="{y}" stroke="{stroke}" stroke-width="1" opacity="{op}">"#,
            x1 = fmt(divider.x1),
            x2 = fmt(divider.x2),
            y = fmt(divider.y),
            stroke = escape_xml(&divider.stroke),
            op = fmt(divider.opacity),
        );
        if let Some(timing) = timing {
            timing.write_delayed_fade_in(out, divider.opacity);
        }
        out.push_str("</line>");
    }

    let accent = escape_xml(&scene.config().theme.accent_fill);
    for label in scene.category_labels() {
        let _ = write!(
            out,
            r#"<text class="category-label" x="{x}" y="{y}" text-anchor="middle" transform="rotate(-90, {x}, {y})" fill="{accent}" opacity="1">"#,
            x = fmt(label.x),
            y = fmt(label.y),
        );
        if let Some(timing) = timing {
            timing.write_delayed_fade_in(out, 1.0);
        }
        let _ = write!(out, "{}</text>", escape_xml(&label.text));
    }
}

fn render_dot(out: &mut String, dot: &Dot, with_tooltip: bool, timing: Option<&Timing>) {
    let _ = write!(
        out,
        r#"<circle class="portrait-dot" data-record-id="{id}" data-year="{year}" cx="{cx}" cy="{cy}" r="{r}" fill="{fill}" opacity="{op}""#,
        id = dot.record_id,
        year = dot.year,
        cx = fmt(dot.to.0),
        cy = fmt(dot.to.1),
        r = fmt(dot.style.radius),
        fill = escape_xml(&dot.style.fill),
        op = fmt(dot.style.opacity),
    );
    if with_tooltip {
        if let Some(url) = &dot.tooltip.thumbnail_url {
            let _ = write!(out, r#" data-thumbnail="{}""#, escape_xml(url));
        }
    }
    out.push('>');

    if let Some(timing) = timing {
        if dot.from.0 != dot.to.0 {
            timing.write_animate(out, "cx", &fmt(dot.from.0), &fmt(dot.to.0));
        }
        if dot.from.1 != dot.to.1 {
            timing.write_animate(out, "cy", &fmt(dot.from.1), &fmt(dot.to.1));
        }
        let (from, to) = (&dot.from_style, &dot.style);
        if from.radius != to.radius {
            timing.write_animate(out, "r", &fmt(from.radius), &fmt(to.radius));
        }
        if from.fill != to.fill {
            timing.write_animate(out, "fill", &from.fill, &to.fill);
        }
        if from.opacity != to.opacity {
            timing.write_animate(out, "opacity", &fmt(from.opacity), &fmt(to.opacity));
        }
    }
    if with_tooltip {
        let _ = write!(
            out,
            "<title>{}</title>",
            escape_xml(&dot.tooltip.to_plain_text())
        );
    }
    out.push_str("</circle>");
}

/// Renders the scene's current transition as a standalone SVG document.
pub fn render_scene_svg(scene: &SceneRenderer, options: &SvgRenderOptions) -> Result<String> {
    let Some(axis) = scene.axis() else {
        return Err(Error::EmptyScene);
    };
    let config = scene.config();
    let timing = (options.animate && !scene.duration().is_zero()).then(|| Timing {
        dur_ms: scene.duration().as_secs_f64() * 1000.0,
    });
    let timing = timing.as_ref();

    let diagram_id = options.diagram_id.as_deref().unwrap_or("remember-me");
    let diagram_id_esc = escape_xml(diagram_id);
    let background = options
        .background
        .as_deref()
        .map(|bg| format!(" background-color: {};", escape_xml(bg)))
        .unwrap_or_default();

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{diagram_id_esc}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" style="max-width: {w}px;{background}" role="graphics-document document" aria-roledescription="portraitTimeline" data-mode="{mode}">"#,
        w = fmt(config.viewport_width),
        h = fmt(config.viewport_height),
        mode = scene.mode(),
    );
    let _ = write!(&mut out, "<style>{}</style>", css(&diagram_id_esc, scene));

    let _ = write!(
        &mut out,
        r#"<g id="main" transform="translate({left}, {top})">"#,
        left = fmt(config.margin.left),
        top = fmt(config.margin.top),
    );
    render_axis(&mut out, scene, axis, timing);
    render_decorations(&mut out, scene, timing);

    out.push_str(r#"<g class="portrait-dots">"#);
    let with_tooltip = scene.interactions_armed();
    for dot in scene.dots() {
        render_dot(&mut out, dot, with_tooltip, timing);
    }
    out.push_str("</g></g></svg>\n");

    tracing::debug!(
        dots = scene.dots().len(),
        animated = timing.is_some(),
        bytes = out.len(),
        "rendered scene svg"
    );
    Ok(out)
}
