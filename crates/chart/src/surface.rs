use std::fmt::Write as _;

/// Stroke style of a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
    pub dashed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_svg(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// A drawing backend. One surface belongs to exactly one chart instance.
///
/// Calls made after `begin_frame` are painted in call order, so later calls sit
/// on top of earlier ones.
pub trait Surface {
    fn begin_frame(&mut self, width: f64, height: f64, background: &str);
    /// Fills the region between two polylines sharing the same x positions.
    fn fill_band(&mut self, upper: &[(f64, f64)], lower: &[(f64, f64)], color: &str, opacity: f64);
    fn draw_polyline(&mut self, points: &[(f64, f64)], stroke: Stroke<'_>);
    fn draw_text(&mut self, x: f64, y: f64, text: &str, anchor: TextAnchor);
    /// Replaces the plot with an explanatory message.
    fn draw_placeholder(&mut self, message: &str);
}

/// Renders frames into a standalone SVG document.
#[derive(Debug, Default, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last frame as a complete SVG document.
    pub fn to_svg(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#666}}</style>{body}</svg>"#,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Surface for SvgSurface {
    fn begin_frame(&mut self, width: f64, height: f64, background: &str) {
        self.width = width;
        self.height = height;
        self.body.clear();
        let _ = write!(
            self.body,
            r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{background}" />"#
        );
    }

    fn fill_band(&mut self, upper: &[(f64, f64)], lower: &[(f64, f64)], color: &str, opacity: f64) {
        if upper.len() < 2 || lower.len() < 2 {
            return;
        }
        let outline: Vec<(f64, f64)> = upper.iter().chain(lower.iter().rev()).copied().collect();
        let _ = write!(
            self.body,
            r#"<polygon fill="{color}" fill-opacity="{opacity:.2}" stroke="none" points="{points}" />"#,
            points = points_attr(&outline)
        );
    }

    fn draw_polyline(&mut self, points: &[(f64, f64)], stroke: Stroke<'_>) {
        if points.len() < 2 {
            return;
        }
        let _ = write!(
            self.body,
            r#"<polyline fill="none" stroke="{color}" stroke-width="{width}" stroke-dasharray="{dash}" points="{points}" />"#,
            color = stroke.color,
            width = stroke.width,
            dash = if stroke.dashed { "6 4" } else { "0" },
            points = points_attr(points)
        );
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, anchor: TextAnchor) {
        let _ = write!(
            self.body,
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="{anchor}">{text}</text>"#,
            anchor = anchor.as_svg(),
            text = escape(text)
        );
    }

    fn draw_placeholder(&mut self, message: &str) {
        let _ = write!(
            self.body,
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" class="empty-state">{text}</text>"#,
            x = self.width / 2.0,
            y = self.height / 2.0,
            text = escape(message)
        );
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Frame { width: f64, height: f64 },
    Band { color: String, points: usize },
    Polyline {
        color: String,
        width: f64,
        dashed: bool,
        points: Vec<(f64, f64)>,
    },
    Text(String),
    Placeholder(String),
}

/// Records the calls of the last frame instead of drawing them.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    pub frames: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polylines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Polyline { .. }))
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Placeholder(message) => Some(message.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn begin_frame(&mut self, width: f64, height: f64, _background: &str) {
        self.ops.clear();
        self.frames += 1;
        self.ops.push(DrawOp::Frame { width, height });
    }

    fn fill_band(&mut self, upper: &[(f64, f64)], lower: &[(f64, f64)], color: &str, _opacity: f64) {
        self.ops.push(DrawOp::Band {
            color: color.to_string(),
            points: upper.len() + lower.len(),
        });
    }

    fn draw_polyline(&mut self, points: &[(f64, f64)], stroke: Stroke<'_>) {
        self.ops.push(DrawOp::Polyline {
            color: stroke.color.to_string(),
            width: stroke.width,
            dashed: stroke.dashed,
            points: points.to_vec(),
        });
    }

    fn draw_text(&mut self, _x: f64, _y: f64, text: &str, _anchor: TextAnchor) {
        self.ops.push(DrawOp::Text(text.to_string()));
    }

    fn draw_placeholder(&mut self, message: &str) {
        self.ops.push(DrawOp::Placeholder(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_frame_replaces_previous_content() {
        let mut svg = SvgSurface::new();
        svg.begin_frame(100.0, 50.0, "#fff");
        svg.draw_text(1.0, 2.0, "first", TextAnchor::Start);
        svg.begin_frame(100.0, 50.0, "#fff");
        svg.draw_polyline(
            &[(0.0, 0.0), (10.0, 10.0)],
            Stroke { color: "#000", width: 1.0, dashed: true },
        );
        let doc = svg.to_svg();
        assert!(!doc.contains("first"));
        assert!(doc.contains(r#"stroke-dasharray="6 4""#));
        assert!(doc.starts_with("<svg"));
    }

    #[test]
    fn svg_text_is_escaped() {
        let mut svg = SvgSurface::new();
        svg.begin_frame(10.0, 10.0, "#fff");
        svg.draw_placeholder("<none> & more");
        assert!(svg.to_svg().contains("&lt;none&gt; &amp; more"));
    }

    #[test]
    fn degenerate_shapes_are_skipped() {
        let mut svg = SvgSurface::new();
        svg.begin_frame(10.0, 10.0, "#fff");
        svg.draw_polyline(&[(1.0, 1.0)], Stroke { color: "#000", width: 1.0, dashed: false });
        svg.fill_band(&[(1.0, 1.0)], &[(1.0, 2.0)], "#ccc", 0.5);
        assert!(!svg.to_svg().contains("polyline"));
        assert!(!svg.to_svg().contains("polygon"));
    }
}
