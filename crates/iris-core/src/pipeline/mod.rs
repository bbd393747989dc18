//! Orchestration: one synchronous compositor plus a latest-wins scheduler
//! for running it off the interactive thread.

pub mod render;
pub mod scheduler;

pub use render::{
    RenderError, active_mask_layers, composite, mask_overlay, render, render_bytes,
    render_or_source,
};
pub use scheduler::{Frame, RenderScheduler, RenderTicket};
