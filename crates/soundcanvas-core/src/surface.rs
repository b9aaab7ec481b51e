//! Drawing-surface contract and the guarded painter the renderers draw through.
//!
//! [`Surface`] mirrors the subset of a 2D canvas context the modes need. The
//! host implements it over a real canvas; [`DrawRecorder`] implements it in
//! memory for tests and headless use. Renderers never touch a `Surface`
//! directly: they go through [`Painter`], which drops any call carrying a
//! non-finite number (or a negative radius) instead of forwarding it.

use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Composite {
    SourceOver,
    Lighter,
}

impl Composite {
    pub fn as_str(self) -> &'static str {
        match self {
            Composite::SourceOver => "source-over",
            Composite::Lighter => "lighter",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: String,
}

pub type Stops = SmallVec<[ColorStop; 4]>;

#[derive(Clone, Debug, PartialEq)]
pub enum GradientShape {
    Linear {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    },
    Radial {
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub shape: GradientShape,
    pub stops: Stops,
}

impl Gradient {
    pub fn linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            shape: GradientShape::Linear { x0, y0, x1, y1 },
            stops: Stops::new(),
        }
    }

    /// Concentric radial gradient from `r0` to `r1` around (x, y).
    pub fn radial(x: f32, y: f32, r0: f32, r1: f32) -> Self {
        Self {
            shape: GradientShape::Radial {
                x0: x,
                y0: y,
                r0,
                x1: x,
                y1: y,
                r1,
            },
            stops: Stops::new(),
        }
    }

    pub fn stop(mut self, offset: f32, color: impl Into<String>) -> Self {
        self.stops.push(ColorStop {
            offset: offset.clamp(0.0, 1.0),
            color: color.into(),
        });
        self
    }

    fn is_drawable(&self) -> bool {
        let geometry_ok = match self.shape {
            GradientShape::Linear { x0, y0, x1, y1 } => all_finite(&[x0, y0, x1, y1]),
            GradientShape::Radial {
                x0,
                y0,
                r0,
                x1,
                y1,
                r1,
            } => all_finite(&[x0, y0, r0, x1, y1, r1]) && r0 >= 0.0 && r1 >= 0.0,
        };
        geometry_ok && self.stops.iter().all(|s| s.offset.is_finite())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Color(String),
    Gradient(Gradient),
}

impl From<String> for Paint {
    fn from(color: String) -> Self {
        Paint::Color(color)
    }
}

impl From<&str> for Paint {
    fn from(color: &str) -> Self {
        Paint::Color(color.to_string())
    }
}

impl From<Gradient> for Paint {
    fn from(gradient: Gradient) -> Self {
        Paint::Gradient(gradient)
    }
}

/// Canvas-style immediate-mode drawing target.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, x: f32, y: f32);

    fn set_fill(&mut self, paint: &Paint);
    fn set_stroke(&mut self, paint: &Paint);
    fn set_line_width(&mut self, width: f32);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_composite(&mut self, op: Composite);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32);
    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
}

#[inline]
fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Finite-checking front for a [`Surface`].
pub struct Painter<'a> {
    surface: &'a mut dyn Surface,
    skipped: usize,
}

impl<'a> Painter<'a> {
    pub fn new(surface: &'a mut dyn Surface) -> Self {
        Self {
            surface,
            skipped: 0,
        }
    }

    /// Draw calls dropped so far for non-finite or invalid arguments.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn width(&self) -> f32 {
        self.surface.width()
    }

    pub fn height(&self) -> f32 {
        self.surface.height()
    }

    #[inline]
    fn guard(&mut self, values: &[f32]) -> bool {
        if all_finite(values) {
            true
        } else {
            self.skipped += 1;
            false
        }
    }

    pub fn save(&mut self) {
        self.surface.save();
    }

    pub fn restore(&mut self) {
        self.surface.restore();
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        if self.guard(&[x, y]) {
            self.surface.translate(x, y);
        }
    }

    pub fn rotate(&mut self, radians: f32) {
        if self.guard(&[radians]) {
            self.surface.rotate(radians);
        }
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        if self.guard(&[x, y]) {
            self.surface.scale(x, y);
        }
    }

    pub fn set_fill(&mut self, paint: impl Into<Paint>) {
        let paint = paint.into();
        if self.paint_ok(&paint) {
            self.surface.set_fill(&paint);
        }
    }

    pub fn set_stroke(&mut self, paint: impl Into<Paint>) {
        let paint = paint.into();
        if self.paint_ok(&paint) {
            self.surface.set_stroke(&paint);
        }
    }

    fn paint_ok(&mut self, paint: &Paint) -> bool {
        match paint {
            Paint::Color(_) => true,
            Paint::Gradient(g) if g.is_drawable() => true,
            Paint::Gradient(_) => {
                self.skipped += 1;
                false
            }
        }
    }

    pub fn set_line_width(&mut self, width: f32) {
        if self.guard(&[width]) {
            self.surface.set_line_width(width.max(0.0));
        }
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.surface.set_line_cap(cap);
    }

    pub fn set_composite(&mut self, op: Composite) {
        self.surface.set_composite(op);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if self.guard(&[x, y, w, h]) {
            self.surface.fill_rect(x, y, w, h);
        }
    }

    pub fn begin_path(&mut self) {
        self.surface.begin_path();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        if self.guard(&[x, y]) {
            self.surface.move_to(x, y);
        }
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        if self.guard(&[x, y]) {
            self.surface.line_to(x, y);
        }
    }

    pub fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32) {
        if self.guard(&[cp1x, cp1y, cp2x, cp2y, x, y]) {
            self.surface.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
        }
    }

    pub fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        if self.guard(&[x, y, radius, start, end]) {
            if radius < 0.0 {
                self.skipped += 1;
                return;
            }
            self.surface.arc(x, y, radius, start, end);
        }
    }

    pub fn close_path(&mut self) {
        self.surface.close_path();
    }

    pub fn fill(&mut self) {
        self.surface.fill();
    }

    pub fn stroke(&mut self) {
        self.surface.stroke();
    }

    /// Filled full circle as its own path.
    ///
    /// Nothing reaches the surface when the geometry or the paint is rejected.
    pub fn fill_circle(&mut self, x: f32, y: f32, radius: f32, paint: impl Into<Paint>) {
        let paint = paint.into();
        if !self.guard(&[x, y, radius]) || !self.paint_ok(&paint) {
            return;
        }
        if radius < 0.0 {
            self.skipped += 1;
            return;
        }
        self.surface.set_fill(&paint);
        self.surface.begin_path();
        self.surface.arc(x, y, radius, 0.0, std::f32::consts::TAU);
        self.surface.fill();
    }

    /// Single stroked segment as its own path.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, paint: impl Into<Paint>) {
        let paint = paint.into();
        if !self.guard(&[from.0, from.1, to.0, to.1, width]) || !self.paint_ok(&paint) {
            return;
        }
        self.surface.set_stroke(&paint);
        self.surface.set_line_width(width.max(0.0));
        self.surface.begin_path();
        self.surface.move_to(from.0, from.1);
        self.surface.line_to(to.0, to.1);
        self.surface.stroke();
    }
}

/// One recorded primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    Scale(f32, f32),
    SetFill(Paint),
    SetStroke(Paint),
    SetLineWidth(f32),
    SetLineCap(LineCap),
    SetComposite(Composite),
    FillRect(f32, f32, f32, f32),
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    BezierCurveTo(f32, f32, f32, f32, f32, f32),
    Arc(f32, f32, f32, f32, f32),
    ClosePath,
    Fill,
    Stroke,
}

impl DrawCall {
    /// Every numeric argument, including gradient geometry.
    pub fn numbers(&self) -> SmallVec<[f32; 8]> {
        let mut out = SmallVec::new();
        match self {
            DrawCall::Translate(a, b) | DrawCall::Scale(a, b) => out.extend([*a, *b]),
            DrawCall::MoveTo(a, b) | DrawCall::LineTo(a, b) => out.extend([*a, *b]),
            DrawCall::Rotate(a) | DrawCall::SetLineWidth(a) => out.push(*a),
            DrawCall::FillRect(a, b, c, d) => out.extend([*a, *b, *c, *d]),
            DrawCall::BezierCurveTo(a, b, c, d, e, f) => out.extend([*a, *b, *c, *d, *e, *f]),
            DrawCall::Arc(a, b, c, d, e) => out.extend([*a, *b, *c, *d, *e]),
            DrawCall::SetFill(Paint::Gradient(g)) | DrawCall::SetStroke(Paint::Gradient(g)) => {
                match g.shape {
                    GradientShape::Linear { x0, y0, x1, y1 } => out.extend([x0, y0, x1, y1]),
                    GradientShape::Radial {
                        x0,
                        y0,
                        r0,
                        x1,
                        y1,
                        r1,
                    } => out.extend([x0, y0, r0, x1, y1, r1]),
                }
                out.extend(g.stops.iter().map(|s| s.offset));
            }
            _ => {}
        }
        out
    }
}

/// In-memory [`Surface`] that records every call.
#[derive(Clone, Debug)]
pub struct DrawRecorder {
    width: f32,
    height: f32,
    pub calls: Vec<DrawCall>,
}

impl DrawRecorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    pub fn count(&self, pred: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn all_finite(&self) -> bool {
        self.calls.iter().all(|c| all_finite(&c.numbers()))
    }
}

impl Surface for DrawRecorder {
    fn width(&self) -> f32 {
        self.width
    }
    fn height(&self) -> f32 {
        self.height
    }
    fn save(&mut self) {
        self.calls.push(DrawCall::Save);
    }
    fn restore(&mut self) {
        self.calls.push(DrawCall::Restore);
    }
    fn translate(&mut self, x: f32, y: f32) {
        self.calls.push(DrawCall::Translate(x, y));
    }
    fn rotate(&mut self, radians: f32) {
        self.calls.push(DrawCall::Rotate(radians));
    }
    fn scale(&mut self, x: f32, y: f32) {
        self.calls.push(DrawCall::Scale(x, y));
    }
    fn set_fill(&mut self, paint: &Paint) {
        self.calls.push(DrawCall::SetFill(paint.clone()));
    }
    fn set_stroke(&mut self, paint: &Paint) {
        self.calls.push(DrawCall::SetStroke(paint.clone()));
    }
    fn set_line_width(&mut self, width: f32) {
        self.calls.push(DrawCall::SetLineWidth(width));
    }
    fn set_line_cap(&mut self, cap: LineCap) {
        self.calls.push(DrawCall::SetLineCap(cap));
    }
    fn set_composite(&mut self, op: Composite) {
        self.calls.push(DrawCall::SetComposite(op));
    }
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.calls.push(DrawCall::FillRect(x, y, w, h));
    }
    fn begin_path(&mut self) {
        self.calls.push(DrawCall::BeginPath);
    }
    fn move_to(&mut self, x: f32, y: f32) {
        self.calls.push(DrawCall::MoveTo(x, y));
    }
    fn line_to(&mut self, x: f32, y: f32) {
        self.calls.push(DrawCall::LineTo(x, y));
    }
    fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32) {
        self.calls
            .push(DrawCall::BezierCurveTo(cp1x, cp1y, cp2x, cp2y, x, y));
    }
    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        self.calls.push(DrawCall::Arc(x, y, radius, start, end));
    }
    fn close_path(&mut self) {
        self.calls.push(DrawCall::ClosePath);
    }
    fn fill(&mut self) {
        self.calls.push(DrawCall::Fill);
    }
    fn stroke(&mut self) {
        self.calls.push(DrawCall::Stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn painter_drops_non_finite_calls() {
        let mut rec = DrawRecorder::new(100.0, 100.0);
        let skipped = {
            let mut p = Painter::new(&mut rec);
            p.fill_rect(0.0, 0.0, f32::NAN, 10.0);
            p.arc(10.0, 10.0, -1.0, 0.0, 1.0);
            p.set_fill(Gradient::radial(0.0, 0.0, 0.0, f32::INFINITY).stop(0.0, "#fff"));
            p.move_to(1.0, 2.0);
            p.skipped()
        };
        assert_eq!(skipped, 3);
        assert_eq!(rec.calls, vec![DrawCall::MoveTo(1.0, 2.0)]);
    }

    #[test]
    fn rejected_paint_skips_the_whole_shape() {
        let mut rec = DrawRecorder::new(100.0, 100.0);
        let skipped = {
            let mut p = Painter::new(&mut rec);
            p.set_fill("#ff0000");
            p.set_stroke("#00ff00");
            p.fill_circle(10.0, 10.0, 5.0, Gradient::radial(10.0, 10.0, 0.0, f32::NAN));
            p.line((0.0, 0.0), (5.0, 5.0), 1.0, Gradient::linear(0.0, f32::NAN, 1.0, 1.0));
            p.fill_circle(10.0, 10.0, -2.0, "#0000ff");
            p.skipped()
        };
        assert_eq!(skipped, 3);
        assert_eq!(
            rec.calls,
            vec![
                DrawCall::SetFill(Paint::from("#ff0000")),
                DrawCall::SetStroke(Paint::from("#00ff00")),
            ]
        );
    }

    #[test]
    fn valid_circle_is_one_path() {
        let mut rec = DrawRecorder::new(100.0, 100.0);
        Painter::new(&mut rec).fill_circle(10.0, 10.0, 5.0, "#fff");
        assert_eq!(rec.count(|c| matches!(c, DrawCall::Arc(..))), 1);
        assert_eq!(rec.count(|c| matches!(c, DrawCall::Fill)), 1);
        assert_eq!(rec.calls[0], DrawCall::SetFill(Paint::from("#fff")));
    }
}
