//! PDF Rendering Adapters

mod typst_renderer;

pub use typst_renderer::TypstBookRenderer;
