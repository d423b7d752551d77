//! PNG export of rendered frames.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::foundation::core::Side;
use crate::foundation::error::{KitError, KitResult};
use crate::render::surface::Frame;

/// Encode `frame` as a straight-alpha RGBA PNG.
pub fn encode_png(frame: &Frame) -> KitResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_rgba())
        .ok_or_else(|| KitError::export("frame buffer does not match its dimensions"))?;
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| KitError::export(format!("encode png: {e}")))?;
    Ok(out.into_inner())
}

/// Download-style file name: `jersey-<side>-<unix millis>.png`.
pub fn export_filename(side: Side, unix_ms: u128) -> String {
    format!("jersey-{side}-{unix_ms}.png")
}

/// Write `frame` into `dir` under [`export_filename`] and return the full path.
///
/// The PNG is written to a temporary sibling first and renamed into place, so a failed export
/// leaves no partial file behind.
pub fn export_png(frame: &Frame, side: Side, dir: &Path) -> KitResult<PathBuf> {
    let unix_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let name = export_filename(side, unix_ms);
    let bytes = encode_png(frame)?;

    std::fs::create_dir_all(dir)
        .map_err(|e| KitError::export(format!("create '{}': {e}", dir.display())))?;
    let path = dir.join(&name);
    let tmp = dir.join(format!(".{name}.tmp"));
    if let Err(e) = std::fs::write(&tmp, &bytes) {
        let _ = std::fs::remove_file(&tmp);
        return Err(KitError::export(format!("write '{}': {e}", tmp.display())));
    }
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(KitError::export(format!(
            "rename to '{}': {e}",
            path.display()
        )));
    }
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "exported frame");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
