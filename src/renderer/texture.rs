//! Precomputed granite surface pattern
//!
//! Generated once per ball radius from closed-form sequences, so every frame
//! (and every run) draws the same stone.

use glam::Vec2;
use std::f32::consts::TAU;

/// Fine mineral grain
#[derive(Debug, Clone, Copy)]
pub struct Speckle {
    pub offset: Vec2,
    pub size: f32,
    /// 0 = quartz, 1 = feldspar, 2 = mica, 3 = biotite
    pub mineral: u8,
    pub contrast: f32,
}

/// Dark mica flake
#[derive(Debug, Clone, Copy)]
pub struct MicaCluster {
    pub offset: Vec2,
    pub size: f32,
    pub darkness: f32,
}

/// Bright quartz streak
#[derive(Debug, Clone, Copy)]
pub struct QuartzVein {
    pub start: Vec2,
    pub end: Vec2,
    pub width: f32,
    pub brightness: f32,
}

#[derive(Debug, Clone)]
pub struct GraniteTexture {
    pub radius: f32,
    pub speckles: Vec<Speckle>,
    pub mica: Vec<MicaCluster>,
    pub veins: Vec<QuartzVein>,
}

const SPECKLE_COUNT: usize = 180;
const MICA_COUNT: usize = 25;
const VEIN_COUNT: usize = 12;

fn polar(angle: f32, distance: f32) -> Vec2 {
    Vec2::new(angle.cos() * distance, angle.sin() * distance)
}

impl GraniteTexture {
    pub fn generate(radius: f32) -> Self {
        let speckles = (0..SPECKLE_COUNT)
            .map(|i| {
                let f = i as f32;
                let angle = (f * 2.2 + (f * 0.07).sin() * 0.9) % TAU;
                let distance = (f * 0.18 + (f * 0.2).sin() * 10.0).rem_euclid(radius * 0.92);
                Speckle {
                    offset: polar(angle, distance),
                    size: (i % 6) as f32 * 0.2 + 0.4,
                    mineral: (i % 4) as u8,
                    contrast: 0.7 + (i % 3) as f32 * 0.3,
                }
            })
            .collect();

        let mica = (0..MICA_COUNT)
            .map(|i| {
                let f = i as f32;
                MicaCluster {
                    offset: polar(f * 2.1 * TAU, (f * 0.3) % (radius * 0.75)),
                    size: (i % 6) as f32 + 3.0,
                    darkness: 0.8 + (i % 2) as f32 * 0.2,
                }
            })
            .collect();

        let veins = (0..VEIN_COUNT)
            .map(|i| {
                let f = i as f32;
                let start_angle = (f * 0.8 + (f * 0.4).sin() * 2.0) * TAU;
                let start_distance = (f * 0.15) % (radius * 0.3);
                let end_angle = start_angle + ((f * 0.6).sin() * 0.8 + 0.4);
                let end_distance = (start_distance + (i % 4) as f32 * 8.0 + 15.0).min(radius * 0.85);
                QuartzVein {
                    start: polar(start_angle, start_distance),
                    end: polar(end_angle, end_distance),
                    width: 1.5 + (i % 3) as f32 * 0.8,
                    brightness: 0.8 + (i % 2) as f32 * 0.2,
                }
            })
            .collect();

        Self {
            radius,
            speckles,
            mica,
            veins,
        }
    }
}
