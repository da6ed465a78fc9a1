//! Live preview rendering.
//!
//! Edits arrive faster than the layout engine can keep up with. Each request
//! takes a token from a per-pipeline counter; a render may only touch the
//! preview if its token is still the latest one when it finishes.

mod pipeline;

pub use pipeline::{
    EMPTY_PREVIEW_MESSAGE, PreviewState, RENDER_FAILED_MESSAGE, RenderPipeline,
    RenderStatusListener,
};
