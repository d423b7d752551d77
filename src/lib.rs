//! kitsmith renders customizable garment previews.
//!
//! A garment silhouette is fitted into the frame, tinted, color-filtered and overlaid with a
//! pattern swatch, all masked to the silhouette's alpha. Side-specific decorations follow: a logo
//! on the front, player name and number on the back. The public API is session-oriented:
//!
//! - Build a [`RenderSession`] from [`SessionOpts`] inside a tokio runtime
//! - [`RenderSession::start`] to load the silhouettes
//! - Mutate the design with [`Command`]s; every change re-renders [`RenderSession::frame`]
//! - [`RenderSession::export_png`] to write the result
//!
//! The compositing stages are usable on their own through [`Compositor`] and
//! [`OverlayRenderer`].
#![forbid(unsafe_code)]

mod assets;
mod design;
mod foundation;
mod render;
mod session;

pub use crate::foundation::core::{
    Affine, Canvas, MAX_FRAME_WIDTH, Point, Rect, Rgba8Premul, Side, Vec2,
};
pub use crate::foundation::error::{KitError, KitResult};

pub use crate::assets::color::HexColor;
pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::fonts::{DEFAULT_FONT_FAMILY, FontSource, ResolvedFont, resolve_font};
pub use crate::assets::loader::{
    AssetEvent, AssetLoader, AssetPaths, AssetRequest, AssetSource, DEFAULT_LOAD_TIMEOUT_MS,
    FsSource, LoaderOpts, PATTERN_CATALOG_LEN, PatternId, load_image_file,
};
pub use crate::assets::placeholder::{
    LOADING_LABEL, PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH, placeholder_image,
};
pub use crate::assets::set::{
    AssetKey, AssetOrigin, AssetSet, AssetSlot, LoadedAsset, PatternCache,
};
pub use crate::design::command::Command;
pub use crate::design::config::RenderConfig;
pub use crate::render::blend::{BlendMode, alpha_intersect, composite};
pub use crate::render::compositor::{Compositor, fit_rect, pattern_transform};
pub use crate::render::export::{encode_png, export_filename, export_png};
pub use crate::render::filter::ColorFilter;
pub use crate::render::overlay::OverlayRenderer;
pub use crate::render::surface::Frame;
pub use crate::session::render_session::{RenderSession, SessionOpts};
