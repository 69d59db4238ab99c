pub mod overlay;

pub use overlay::render_overlay;
