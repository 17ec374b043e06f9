pub mod canvas;
pub mod panels;
pub mod style;

pub use canvas::{Canvas, PanZoomArea};
pub use style::GraphStyle;
