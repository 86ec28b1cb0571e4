mod canvas;
mod font;
mod icons;
mod renderer;

pub use font::text_size;
pub use renderer::Renderer;
