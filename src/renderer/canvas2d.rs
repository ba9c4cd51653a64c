//! `Canvas` backed by the browser's 2D context

use glam::Vec2;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use super::canvas::{Canvas, Color, GradientStop, Paint, css};

pub struct Canvas2d {
    ctx: CanvasRenderingContext2d,
    width: f32,
    height: f32,
}

impl Canvas2d {
    pub fn new(canvas: &HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            width: canvas.width() as f32,
            height: canvas.height() as f32,
        }
    }

    fn add_stops(gradient: &CanvasGradient, stops: &[GradientStop]) {
        for stop in stops {
            if let Err(e) = gradient.add_color_stop(stop.offset.clamp(0.0, 1.0), &css(stop.color)) {
                log::warn!("Bad gradient stop: {:?}", e);
            }
        }
    }

    fn apply_fill(&self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&css(*color)),
            Paint::Linear(g) => {
                let gradient = self.ctx.create_linear_gradient(
                    g.from.x as f64,
                    g.from.y as f64,
                    g.to.x as f64,
                    g.to.y as f64,
                );
                Self::add_stops(&gradient, &g.stops);
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
            Paint::Radial(g) => {
                match self.ctx.create_radial_gradient(
                    g.inner_center.x as f64,
                    g.inner_center.y as f64,
                    g.inner_radius as f64,
                    g.outer_center.x as f64,
                    g.outer_center.y as f64,
                    g.outer_radius as f64,
                ) {
                    Ok(gradient) => {
                        Self::add_stops(&gradient, &g.stops);
                        self.ctx.set_fill_style_canvas_gradient(&gradient);
                    }
                    Err(e) => {
                        log::warn!("Radial gradient failed: {:?}", e);
                        if let Some(stop) = g.stops.first() {
                            self.ctx.set_fill_style_str(&css(stop.color));
                        }
                    }
                }
            }
        }
    }
}

impl Canvas for Canvas2d {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: &Paint) {
        self.apply_fill(paint);
        self.ctx
            .fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        self.apply_fill(paint);
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.ctx.set_stroke_style_str(&css(color));
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }
}
