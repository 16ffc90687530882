//! Rendering pipeline: raw text in, paginated document out.

mod cancel;
mod options;
mod pipeline;

pub use cancel::CancelToken;
pub use options::{RenderConfig, RenderOptions};
pub use pipeline::{render, render_batch, Renderer};
