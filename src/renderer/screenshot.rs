use std::path::Path;

use crate::error::FxResult;
use crate::renderer::PixelSurface;

/// Save the current contents of a pixel surface as a PNG file
pub fn save_screenshot(surface: &PixelSurface, path: impl AsRef<Path>) -> FxResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    surface.image().save(path)?;
    log::debug!("Saved frame to {}", path.display());
    Ok(())
}

/// File name for the `index`-th captured frame
pub fn frame_file_name(prefix: &str, index: u64) -> String {
    format!("{}_{:05}.png", prefix, index)
}
