//! Drawing primitives the renderer needs from a backend

use glam::Vec2;

/// RGBA color, components in [0, 1]
pub type Color = [f32; 4];

/// Build an opaque color from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Same color with a different alpha
pub const fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}

/// CSS `rgba()` string for canvas backends
pub fn css(color: Color) -> String {
    format!(
        "rgba({},{},{},{})",
        (color[0].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[1].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[2].clamp(0.0, 1.0) * 255.0).round() as u8,
        color[3].clamp(0.0, 1.0)
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub from: Vec2,
    pub to: Vec2,
    pub stops: Vec<GradientStop>,
}

/// Two-circle radial gradient, as in the 2D canvas API
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub inner_center: Vec2,
    pub inner_radius: f32,
    pub outer_center: Vec2,
    pub outer_radius: f32,
    pub stops: Vec<GradientStop>,
}

/// Fill style
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

/// A 2D surface. Coordinates are canvas pixels, y down.
pub trait Canvas {
    fn size(&self) -> (f32, f32);
    /// Multiplier applied to every following draw until changed
    fn set_alpha(&mut self, alpha: f32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: &Paint);
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        paint: Paint,
        alpha: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        paint: Paint,
        alpha: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
        alpha: f32,
    },
}

/// Canvas that records calls instead of drawing (headless runs, tests)
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub width: f32,
    pub height: f32,
    pub calls: Vec<DrawCall>,
    alpha: f32,
}

impl Recorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
            alpha: 1.0,
        }
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.alpha = 1.0;
    }
}

impl Canvas for Recorder {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: &Paint) {
        self.calls.push(DrawCall::Rect {
            x,
            y,
            width,
            height,
            paint: paint.clone(),
            alpha: self.alpha,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            paint: paint.clone(),
            alpha: self.alpha,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            width,
            color,
            alpha: self.alpha,
        });
    }
}
