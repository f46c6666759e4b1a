//! Hooks into the embedding environment.
//!
//! This module provides:
//! - The drawing surface whose size bounds the layout ([`RenderingSurface`])
//! - The render tick context and its deferred task queue ([`TickQueue`])

mod surface;
mod tick;

pub use surface::{FixedSurface, RenderingSurface};
#[cfg(target_arch = "wasm32")]
pub(crate) use surface::floor_px;
pub use tick::{FrameContext, TickQueue};

#[cfg(target_arch = "wasm32")]
pub use surface::CanvasSurface;
