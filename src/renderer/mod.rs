pub mod surface;
pub mod viewport;
pub mod draw;
pub mod raster;
pub mod recording;
pub mod screenshot;

pub use surface::{DrawSurface, GradientStop, Rect, Rgba};
pub use viewport::{clamp_pixel_ratio, Viewport};
pub use draw::render;
pub use raster::PixelSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use screenshot::{frame_file_name, save_screenshot};
