use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use usvg::fontdb;

use crate::foundation::error::KitResult;

/// Family requested when nothing else is configured.
pub const DEFAULT_FONT_FAMILY: &str = "Barlow";

/// Where lettering and placeholder labels get their font from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FontSource {
    /// Query installed fonts (plus `fonts/` under the asset base) for a family, bold weight.
    System {
        /// Preferred family; sans-serif is used when it is not installed.
        family: String,
    },
    /// Use a specific font file.
    File {
        /// Path to a TTF/OTF file.
        path: PathBuf,
    },
    /// Draw no text at all.
    Disabled,
}

impl Default for FontSource {
    fn default() -> Self {
        Self::System {
            family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

/// Font bytes selected for text drawing.
#[derive(Clone)]
pub struct ResolvedFont {
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside `bytes` (non-zero for collections).
    pub index: u32,
    /// Family name reported by the font.
    pub family: String,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .finish()
    }
}

/// Resolve `source` to font bytes. `Ok(None)` means text will not be drawn.
pub fn resolve_font(source: &FontSource, assets_base: &Path) -> KitResult<Option<ResolvedFont>> {
    match source {
        FontSource::Disabled => Ok(None),
        FontSource::File { path } => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read font file '{}'", path.display()))?;
            let mut db = fontdb::Database::new();
            db.load_font_data(bytes.clone());
            let family = db
                .faces()
                .next()
                .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
                .unwrap_or_else(|| "unknown".to_string());
            Ok(Some(ResolvedFont {
                bytes: Arc::new(bytes),
                index: 0,
                family,
            }))
        }
        FontSource::System { family } => {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            load_fonts_from_dir(&mut db, &assets_base.join("fonts"));
            Ok(query_font(&db, family))
        }
    }
}

fn query_font(db: &fontdb::Database, family: &str) -> Option<ResolvedFont> {
    let families = [fontdb::Family::Name(family), fontdb::Family::SansSerif];
    let query = fontdb::Query {
        families: &families,
        weight: fontdb::Weight::BOLD,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };

    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))?;
    let name = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "unknown".to_string());
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    tracing::debug!(requested = family, resolved = %name, "resolved lettering font");
    Some(ResolvedFont {
        bytes: Arc::new(bytes),
        index,
        family: name,
    })
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font file");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
