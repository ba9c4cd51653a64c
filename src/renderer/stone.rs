//! Stone-material scene renderer
//!
//! Directional light from the upper left. Reads the simulation through
//! shared references only.

use glam::{Vec2, Vec3};

use super::canvas::{
    Canvas, Color, GradientStop, LinearGradient, Paint, RadialGradient, rgb, with_alpha,
};
use super::texture::GraniteTexture;
use crate::sim::{Ball, Particle, ParticleColor, Platform, SimulationController};

/// Colors for scene elements
pub mod colors {
    use super::super::canvas::{Color, rgb};

    pub const GRANITE_BASE: Color = rgb(0x6a6a6a);
    pub const GRANITE_LIGHT: Color = rgb(0x8a8a8a);
    pub const GRANITE_DARK: Color = rgb(0x4a4a4a);
    pub const SPECKLE_LIGHT: Color = rgb(0x9a9a9a);
    pub const SPECKLE_DARK: Color = rgb(0x3a3a3a);
    pub const QUARTZ: Color = rgb(0xf2f2ee);
    pub const SHADOW: Color = [0.0, 0.0, 0.0, 0.95];

    pub const PLATFORM_TOP: Color = rgb(0x7a7a7a);
    pub const PLATFORM_BOTTOM: Color = rgb(0x3c3c3c);
    pub const PLATFORM_EDGE: Color = rgb(0xb8c4d0);

    pub const PARTICLE_STONE: Color = rgb(0x666666);
    pub const PARTICLE_DEBRIS: Color = rgb(0x555555);

    pub const BACKGROUND_CENTER: Color = rgb(0x2a2a30);
    pub const BACKGROUND_EDGE: Color = rgb(0x050507);
    pub const FLOOR_LINE: Color = rgb(0x303036);
}

/// Directional light; z points toward the viewer
#[derive(Debug, Clone, Copy)]
pub struct LightSource {
    pub direction: Vec3,
    pub color: Color,
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.4, -0.6, 0.8),
            color: rgb(0xfffcf8),
        }
    }
}

impl LightSource {
    /// Offset of a cast shadow below a body of the given radius
    pub fn shadow_offset(&self, radius: f32) -> Vec2 {
        Vec2::new(-self.direction.x * 8.0, -self.direction.y * 6.0 + radius + 10.0)
    }

    /// Where the specular highlight sits on a sphere of the given radius
    pub fn highlight_offset(&self, radius: f32) -> Vec2 {
        Vec2::new(self.direction.x, self.direction.y) * radius * 0.45
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub trails: bool,
    pub textured_ball: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            trails: true,
            textured_ball: true,
        }
    }
}

pub struct StoneRenderer {
    light: LightSource,
    options: RenderOptions,
    texture: GraniteTexture,
}

impl StoneRenderer {
    pub fn new(ball_radius: f32, options: RenderOptions) -> Self {
        Self {
            light: LightSource::default(),
            options,
            texture: GraniteTexture::generate(ball_radius),
        }
    }

    /// Draw a full frame
    pub fn draw<C: Canvas>(&mut self, sim: &SimulationController, canvas: &mut C) {
        let ball = sim.ball();
        if (self.texture.radius - ball.radius()).abs() > f32::EPSILON {
            self.texture = GraniteTexture::generate(ball.radius());
        }

        canvas.set_alpha(1.0);
        self.draw_background(canvas, sim.arena().floor_y());
        for platform in sim.platforms().iter().filter(|p| !p.broken) {
            self.draw_platform(canvas, platform);
        }
        for particle in sim.particles() {
            self.draw_particle(canvas, particle);
        }
        self.draw_ball(canvas, ball);
        canvas.set_alpha(1.0);
    }

    fn draw_background<C: Canvas>(&self, canvas: &mut C, floor_y: f32) {
        let (width, height) = canvas.size();
        let center = Vec2::new(width * 0.5, height * 0.35);
        canvas.fill_rect(
            0.0,
            0.0,
            width,
            height,
            &Paint::Radial(RadialGradient {
                inner_center: center,
                inner_radius: 0.0,
                outer_center: center,
                outer_radius: width.max(height) * 0.8,
                stops: vec![
                    GradientStop::new(0.0, colors::BACKGROUND_CENTER),
                    GradientStop::new(1.0, colors::BACKGROUND_EDGE),
                ],
            }),
        );
        canvas.line(
            Vec2::new(0.0, floor_y),
            Vec2::new(width, floor_y),
            1.0,
            colors::FLOOR_LINE,
        );
    }

    fn draw_platform<C: Canvas>(&self, canvas: &mut C, platform: &Platform) {
        let shadow = self.light.shadow_offset(0.0) * 0.5;
        let top = platform.y;
        let bottom = platform.y + platform.height;

        canvas.fill_rect(
            platform.x + shadow.x,
            top + shadow.y,
            platform.width,
            18.0,
            &Paint::Linear(LinearGradient {
                from: Vec2::new(0.0, top + shadow.y),
                to: Vec2::new(0.0, top + shadow.y + 18.0),
                stops: vec![
                    GradientStop::new(0.0, [0.0, 0.0, 0.0, 0.6]),
                    GradientStop::new(1.0, [0.0, 0.0, 0.0, 0.0]),
                ],
            }),
        );

        canvas.fill_rect(
            platform.x,
            top,
            platform.width,
            platform.height,
            &Paint::Linear(LinearGradient {
                from: Vec2::new(0.0, top),
                to: Vec2::new(0.0, bottom),
                stops: vec![
                    GradientStop::new(0.0, colors::PLATFORM_TOP),
                    GradientStop::new(0.5, colors::GRANITE_BASE),
                    GradientStop::new(1.0, colors::PLATFORM_BOTTOM),
                ],
            }),
        );

        canvas.fill_rect(
            platform.x,
            top,
            platform.width,
            4.0,
            &Paint::Linear(LinearGradient {
                from: Vec2::new(0.0, top),
                to: Vec2::new(0.0, top + 4.0),
                stops: vec![
                    GradientStop::new(0.0, with_alpha(self.light.color, 0.35)),
                    GradientStop::new(1.0, with_alpha(self.light.color, 0.0)),
                ],
            }),
        );

        canvas.fill_rect(
            platform.x,
            top - 3.0,
            platform.width,
            6.0,
            &Paint::Linear(LinearGradient {
                from: Vec2::new(0.0, top - 3.0),
                to: Vec2::new(0.0, top + 3.0),
                stops: vec![
                    GradientStop::new(0.0, with_alpha(colors::PLATFORM_EDGE, 0.0)),
                    GradientStop::new(0.5, with_alpha(colors::PLATFORM_EDGE, 0.25)),
                    GradientStop::new(1.0, with_alpha(colors::PLATFORM_EDGE, 0.0)),
                ],
            }),
        );

        canvas.fill_rect(
            platform.x,
            bottom - 2.0,
            platform.width,
            2.0,
            &Paint::Solid([0.0, 0.0, 0.0, 0.5]),
        );
    }

    fn draw_particle<C: Canvas>(&self, canvas: &mut C, particle: &Particle) {
        let color = match particle.color {
            ParticleColor::Stone => colors::PARTICLE_STONE,
            ParticleColor::Debris => colors::PARTICLE_DEBRIS,
        };
        canvas.set_alpha(particle.alpha());
        canvas.fill_circle(particle.pos, particle.size, &Paint::Solid(color));
        // Lit chip edge, rotated with the particle
        let facet = Vec2::from_angle(particle.rotation) * particle.size * 0.6;
        canvas.line(
            particle.pos - facet,
            particle.pos + facet,
            0.5,
            with_alpha(colors::SPECKLE_LIGHT, 0.8),
        );
        canvas.set_alpha(1.0);
    }

    fn draw_ball<C: Canvas>(&self, canvas: &mut C, ball: &Ball) {
        if !ball.active {
            return;
        }

        if self.options.trails && ball.trail.len() > 1 {
            // Skip the newest point, it is the ball itself
            for point in &ball.trail[..ball.trail.len() - 1] {
                canvas.set_alpha(point.alpha * 0.4);
                self.draw_stone(canvas, point.pos, ball.radius(), false);
            }
        }

        canvas.set_alpha(1.0);
        self.draw_stone(canvas, ball.pos, ball.radius(), true);
    }

    fn draw_stone<C: Canvas>(&self, canvas: &mut C, center: Vec2, radius: f32, detailed: bool) {
        if detailed {
            let shadow_center = center + self.light.shadow_offset(radius);
            canvas.fill_circle(
                shadow_center,
                radius * 2.2,
                &Paint::Radial(RadialGradient {
                    inner_center: shadow_center,
                    inner_radius: 0.0,
                    outer_center: shadow_center,
                    outer_radius: radius * 2.2,
                    stops: vec![
                        GradientStop::new(0.0, colors::SHADOW),
                        GradientStop::new(0.4, [0.0, 0.0, 0.0, 0.5]),
                        GradientStop::new(1.0, [0.0, 0.0, 0.0, 0.0]),
                    ],
                }),
            );
        }

        let highlight = center + self.light.highlight_offset(radius);
        canvas.fill_circle(
            center,
            radius,
            &Paint::Radial(RadialGradient {
                inner_center: highlight,
                inner_radius: 0.0,
                outer_center: center,
                outer_radius: radius,
                stops: vec![
                    GradientStop::new(0.0, colors::GRANITE_LIGHT),
                    GradientStop::new(0.6, colors::GRANITE_BASE),
                    GradientStop::new(1.0, colors::GRANITE_DARK),
                ],
            }),
        );

        if !detailed {
            return;
        }

        if self.options.textured_ball {
            self.draw_granite(canvas, center);
        }

        canvas.fill_circle(
            center,
            radius,
            &Paint::Radial(RadialGradient {
                inner_center: highlight,
                inner_radius: 0.0,
                outer_center: highlight,
                outer_radius: radius * 0.6,
                stops: vec![
                    GradientStop::new(0.0, with_alpha(self.light.color, 0.35)),
                    GradientStop::new(1.0, with_alpha(self.light.color, 0.0)),
                ],
            }),
        );
        canvas.fill_circle(
            center,
            radius,
            &Paint::Radial(RadialGradient {
                inner_center: center,
                inner_radius: radius * 0.75,
                outer_center: center,
                outer_radius: radius,
                stops: vec![
                    GradientStop::new(0.0, [0.0, 0.0, 0.0, 0.0]),
                    GradientStop::new(1.0, [0.0, 0.0, 0.0, 0.45]),
                ],
            }),
        );
    }

    fn draw_granite<C: Canvas>(&self, canvas: &mut C, center: Vec2) {
        let light_dir = Vec2::new(self.light.direction.x, self.light.direction.y);

        for mica in &self.texture.mica {
            let color: Color = with_alpha(colors::SPECKLE_DARK, mica.darkness);
            canvas.fill_circle(center + mica.offset, mica.size * 0.5, &Paint::Solid(color));
        }

        for vein in &self.texture.veins {
            canvas.line(
                center + vein.start,
                center + vein.end,
                vein.width,
                with_alpha(colors::QUARTZ, vein.brightness * 0.5),
            );
        }

        for speckle in &self.texture.speckles {
            // Grains facing the light read brighter
            let facing = speckle.offset.normalize_or_zero().dot(light_dir).max(0.0);
            let base = if speckle.mineral % 2 == 0 {
                colors::SPECKLE_LIGHT
            } else {
                colors::SPECKLE_DARK
            };
            let alpha = (speckle.contrast * (0.5 + facing * 0.5)).min(1.0);
            canvas.fill_circle(
                center + speckle.offset,
                speckle.size,
                &Paint::Solid(with_alpha(base, alpha)),
            );
        }
    }
}
