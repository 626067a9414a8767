pub mod render;
pub mod text;

pub use ab_glyph::FontVec;
pub use render::SceneRenderer;
pub use text::render_text_pixmap;
