//! # Easel
//! A retained-mode 2D drawing surface. Callers place persistent lines, shapes, media, text, and eraser
//! strokes, then move, restyle, transform, undo, and redo them. The surface works out what each change
//! damaged and redraws only that, through a host-provided [`Renderer`].

pub mod blend;
pub mod color;
pub mod config;
pub mod damage;
pub mod geom;
pub mod id;
pub mod media;
pub mod render;
pub mod schedule;
pub mod shared;
pub mod state;
pub mod stroke;
pub mod surface;
pub mod util;

#[cfg(test)]
mod testing;

pub use config::SurfaceConfig;
pub use id::{Handle, ObjectId};
pub use media::{MediaHandle, MediaSource};
pub use render::Renderer;
pub use shared::SharedSurface;
pub use surface::{Frame, Surface, SurfaceError, Writer};
