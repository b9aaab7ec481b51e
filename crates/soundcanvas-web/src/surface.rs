use soundcanvas_core::surface::{Composite, GradientShape, LineCap};
use soundcanvas_core::{Gradient, Paint, Surface};
use web_sys as web;

/// [`Surface`] over a browser 2D context. Sizes are backing-store pixels.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement, ctx: web::CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    fn gradient(&self, gradient: &Gradient) -> Option<web::CanvasGradient> {
        let g = match gradient.shape {
            GradientShape::Linear { x0, y0, x1, y1 } => {
                self.ctx
                    .create_linear_gradient(x0 as f64, y0 as f64, x1 as f64, y1 as f64)
            }
            GradientShape::Radial {
                x0,
                y0,
                r0,
                x1,
                y1,
                r1,
            } => self
                .ctx
                .create_radial_gradient(
                    x0 as f64, y0 as f64, r0 as f64, x1 as f64, y1 as f64, r1 as f64,
                )
                .map_err(|e| log::warn!("[canvas] radial gradient: {:?}", e))
                .ok()?,
        };
        for stop in &gradient.stops {
            if let Err(e) = g.add_color_stop(stop.offset, &stop.color) {
                log::warn!("[canvas] color stop {:?}: {:?}", stop.color, e);
            }
        }
        Some(g)
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        let _ = self.ctx.translate(x as f64, y as f64);
    }

    fn rotate(&mut self, radians: f32) {
        let _ = self.ctx.rotate(radians as f64);
    }

    fn scale(&mut self, x: f32, y: f32) {
        let _ = self.ctx.scale(x as f64, y as f64);
    }

    fn set_fill(&mut self, paint: &Paint) {
        match paint {
            Paint::Color(c) => self.ctx.set_fill_style_str(c),
            Paint::Gradient(g) => {
                if let Some(g) = self.gradient(g) {
                    self.ctx.set_fill_style_canvas_gradient(&g);
                }
            }
        }
    }

    fn set_stroke(&mut self, paint: &Paint) {
        match paint {
            Paint::Color(c) => self.ctx.set_stroke_style_str(c),
            Paint::Gradient(g) => {
                if let Some(g) = self.gradient(g) {
                    self.ctx.set_stroke_style_canvas_gradient(&g);
                }
            }
        }
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.as_str());
    }

    fn set_composite(&mut self, op: Composite) {
        let _ = self.ctx.set_global_composite_operation(op.as_str());
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(x as f64, y as f64);
    }

    fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32) {
        self.ctx.bezier_curve_to(
            cp1x as f64,
            cp1y as f64,
            cp2x as f64,
            cp2y as f64,
            x as f64,
            y as f64,
        );
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        let _ = self
            .ctx
            .arc(x as f64, y as f64, radius as f64, start as f64, end as f64);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }
}
