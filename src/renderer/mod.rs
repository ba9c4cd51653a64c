//! 2D rendering
//!
//! The renderer only ever borrows the simulation immutably. Drawing goes
//! through the [`Canvas`] trait so the shading can run against the browser
//! canvas or a recorder.

pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod stone;
pub mod texture;

pub use canvas::{Canvas, Color, DrawCall, GradientStop, LinearGradient, Paint, RadialGradient, Recorder};
#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2d;
pub use stone::{LightSource, RenderOptions, StoneRenderer};
pub use texture::GraniteTexture;
