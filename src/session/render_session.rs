use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::assets::decode::PreparedImage;
use crate::assets::fonts::{FontSource, resolve_font};
use crate::assets::loader::{
    AssetEvent, AssetLoader, AssetPaths, AssetRequest, AssetSource, FsSource, LoaderOpts,
    PatternId,
};
use crate::assets::placeholder::loading_frame;
use crate::assets::set::{AssetKey, AssetOrigin, AssetSet, LoadedAsset, PatternCache};
use crate::design::command::Command;
use crate::design::config::RenderConfig;
use crate::foundation::core::{Canvas, Side};
use crate::foundation::error::{KitError, KitResult};
use crate::render::compositor::Compositor;
use crate::render::export::{encode_png, export_png};
use crate::render::overlay::OverlayRenderer;
use crate::render::surface::Frame;

/// Options for constructing a [`RenderSession`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    /// Output frame size.
    pub canvas: Canvas,
    /// Asset directory layout.
    pub assets: AssetPaths,
    /// Loader timeout.
    pub loader: LoaderOpts,
    /// Font for lettering and placeholder labels.
    pub font: FontSource,
}

/// Owns the design configuration and asset state, and turns them into one frame per render.
///
/// Rendering is synchronous and happens on the caller's thread. Asset loads run as tokio tasks
/// and report back through a channel that only the session drains ([`RenderSession::poll_assets`],
/// [`RenderSession::settle`]), so config and asset state have a single writer.
pub struct RenderSession {
    config: RenderConfig,
    canvas: Canvas,

    assets: AssetSet,
    patterns: PatternCache,
    loader: AssetLoader,
    events: mpsc::UnboundedReceiver<AssetEvent>,
    in_flight: Vec<JoinHandle<()>>,

    compositor: Compositor,
    overlay: OverlayRenderer,
    frame: Frame,
    renders: u64,
}

impl RenderSession {
    /// Create a session reading assets from the filesystem.
    ///
    /// Must be called from within a tokio runtime. The initial frame is the loading frame; call
    /// [`RenderSession::start`] to load the silhouettes.
    pub fn new(opts: SessionOpts) -> KitResult<Self> {
        Self::with_source(opts, Arc::new(FsSource))
    }

    /// Create a session fetching asset bytes from `source`.
    pub fn with_source(opts: SessionOpts, source: Arc<dyn AssetSource>) -> KitResult<Self> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(KitError::validation(
                "RenderSession must be created inside a tokio runtime",
            ));
        }
        let canvas = Canvas::new(opts.canvas.width, opts.canvas.height)?;

        let font = match resolve_font(&opts.font, &opts.assets.base) {
            Ok(Some(font)) => Some(font),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "font unavailable; text will not be drawn");
                None
            }
        };
        if font.is_none() && opts.font != FontSource::Disabled {
            tracing::warn!("no usable font found; text will not be drawn");
        }

        let overlay = OverlayRenderer::new(font.as_ref());
        let (loader, events) = AssetLoader::new(source, opts.assets, opts.loader, font);

        let mut session = Self {
            config: RenderConfig::default(),
            canvas,
            assets: AssetSet::new(),
            patterns: PatternCache::new(),
            loader,
            events,
            in_flight: Vec::new(),
            compositor: Compositor::new(),
            overlay,
            frame: Frame::transparent(canvas),
            renders: 0,
        };
        session.render()?;
        Ok(session)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn assets(&self) -> &AssetSet {
        &self.assets
    }

    pub fn patterns(&self) -> &PatternCache {
        &self.patterns
    }

    /// Number of renders performed so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Whether any background load has not been applied yet.
    pub fn has_pending_loads(&self) -> bool {
        self.in_flight.iter().any(|h| !h.is_finished()) || !self.events.is_empty()
    }

    /// Load both silhouettes, wait for both, then render.
    pub async fn start(&mut self) -> KitResult<()> {
        self.load_silhouettes(false).await
    }

    /// Forget both silhouettes and load them again, bypassing cached bytes, then render.
    pub async fn reload_silhouettes(&mut self) -> KitResult<()> {
        for side in Side::ALL {
            self.assets.clear(AssetKey::Silhouette(side));
        }
        self.render()?;
        self.load_silhouettes(true).await
    }

    async fn load_silhouettes(&mut self, reload: bool) -> KitResult<()> {
        // Slots resolved before the load started (provided images) keep their image.
        let tickets = Side::ALL.map(|side| {
            let key = AssetKey::Silhouette(side);
            (!self.assets.is_resolved(key)).then(|| self.assets.begin(key))
        });
        let loaded = self.loader.load_silhouettes(reload).await;
        for ((side, asset), ticket) in loaded.into_iter().zip(tickets) {
            let key = AssetKey::Silhouette(side);
            match ticket {
                Some(ticket) => {
                    self.assets.resolve(key, Some(ticket), asset);
                }
                None => tracing::debug!(%key, "silhouette already resolved; discarding load"),
            }
        }
        self.render()?;
        Ok(())
    }

    /// Render the current configuration into [`RenderSession::frame`].
    ///
    /// Rendering the same configuration and assets twice gives identical frames. While the
    /// active silhouette is unresolved the loading frame is shown; a selected pattern that is not
    /// cached yet is requested and left out of this frame.
    #[tracing::instrument(
        skip_all,
        fields(side = %self.config.side, w = self.canvas.width, h = self.canvas.height)
    )]
    pub fn render(&mut self) -> KitResult<&Frame> {
        let pattern = self.pattern_for_render();
        let silhouette = self
            .assets
            .get(AssetKey::Silhouette(self.config.side))
            .map(|a| a.image.clone());

        let mut frame = match silhouette {
            Some(silhouette) => self.compositor.composite(
                &silhouette,
                pattern.as_ref(),
                &self.config,
                self.canvas,
            )?,
            None => loading_frame(self.canvas, self.overlay.painter_mut()),
        };
        self.overlay.draw(&mut frame, &self.config)?;

        self.frame = frame;
        self.renders += 1;
        tracing::debug!(render = self.renders, "frame rendered");
        Ok(&self.frame)
    }

    fn pattern_for_render(&mut self) -> Option<PreparedImage> {
        let id = self.config.pattern?;
        if let Some(image) = self.patterns.get(id) {
            return Some(image.clone());
        }
        if self.patterns.begin(id) {
            let request = self.loader.pattern_request(id);
            let handle = self.loader.spawn(AssetKey::Pattern(id), None, request);
            self.in_flight.push(handle);
        }
        None
    }

    /// Apply one configuration change; re-renders only when something changed.
    pub fn apply(&mut self, command: Command) -> KitResult<bool> {
        let changed = self.apply_one(command);
        if changed {
            self.render()?;
        }
        Ok(changed)
    }

    /// Apply several changes and render at most once.
    pub fn apply_all(&mut self, commands: impl IntoIterator<Item = Command>) -> KitResult<bool> {
        let mut changed = false;
        for command in commands {
            changed |= self.apply_one(command);
        }
        if changed {
            self.render()?;
        }
        Ok(changed)
    }

    fn apply_one(&mut self, command: Command) -> bool {
        if matches!(command, Command::ClearLogo) {
            // Drops the pending ticket, so an in-flight logo load cannot bring it back.
            self.assets.clear(AssetKey::Logo);
        }
        command.apply_to(&mut self.config)
    }

    /// Swap in a whole configuration. The current logo is kept when `config` carries none.
    pub fn replace_config(&mut self, mut config: RenderConfig) -> KitResult<bool> {
        if config.logo.is_none() {
            config.logo = self.config.logo.clone();
        }
        if config == self.config {
            return Ok(false);
        }
        self.config = config;
        self.render()?;
        Ok(true)
    }

    /// Start loading a logo from `path`. A newer request or [`RenderSession::set_logo`]
    /// supersedes it.
    pub fn request_logo(&mut self, path: impl Into<PathBuf>) {
        let ticket = self.assets.begin(AssetKey::Logo);
        let handle = self
            .loader
            .spawn(AssetKey::Logo, Some(ticket), AssetRequest::new(path));
        self.in_flight.push(handle);
    }

    /// Use an already decoded logo.
    pub fn set_logo(&mut self, image: PreparedImage) -> KitResult<()> {
        self.assets.clear(AssetKey::Logo);
        self.assets.resolve(
            AssetKey::Logo,
            None,
            LoadedAsset {
                image: image.clone(),
                origin: AssetOrigin::Provided,
            },
        );
        self.config.logo = Some(image);
        self.render()?;
        Ok(())
    }

    /// Resolve a silhouette slot with a decoded image. Ignored if the slot is already resolved.
    pub fn provide_silhouette(&mut self, side: Side, image: PreparedImage) -> KitResult<bool> {
        let applied = self.assets.resolve(
            AssetKey::Silhouette(side),
            None,
            LoadedAsset {
                image,
                origin: AssetOrigin::Provided,
            },
        );
        if applied && side == self.config.side {
            self.render()?;
        }
        Ok(applied)
    }

    /// Seed the pattern cache. Ignored if `id` is already cached.
    pub fn provide_pattern(&mut self, id: PatternId, image: PreparedImage) -> KitResult<bool> {
        let applied = self.patterns.insert(id, image);
        if applied && self.config.pattern == Some(id) {
            self.render()?;
        }
        Ok(applied)
    }

    /// Apply every load that has finished, without waiting. Renders once if any applied.
    pub fn poll_assets(&mut self) -> KitResult<usize> {
        self.in_flight.retain(|h| !h.is_finished());
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            if self.apply_event(event) {
                applied += 1;
            }
        }
        if applied > 0 {
            self.render()?;
        }
        Ok(applied)
    }

    /// Wait for every in-flight load, applying results as they arrive.
    pub async fn settle(&mut self) -> KitResult<()> {
        loop {
            let handles = std::mem::take(&mut self.in_flight);
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::warn!(error = %e, "asset load task ended abnormally");
                }
            }
            // Rendering may request a pattern, which lands in `in_flight` for the next round.
            self.poll_assets()?;
        }
        self.poll_assets()?;
        Ok(())
    }

    fn apply_event(&mut self, event: AssetEvent) -> bool {
        let AssetEvent { key, ticket, asset } = event;
        match key {
            AssetKey::Pattern(id) => self.patterns.insert(id, asset.image),
            AssetKey::Silhouette(_) => self.assets.resolve(key, ticket, asset),
            AssetKey::Logo => {
                let image = asset.image.clone();
                let placeholder = asset.origin.is_placeholder();
                if !self.assets.resolve(key, ticket, asset) {
                    return false;
                }
                if placeholder {
                    tracing::warn!("logo could not be loaded; keeping previous logo");
                    return false;
                }
                self.config.logo = Some(image);
                true
            }
        }
    }

    /// Change the frame size, re-rendering if it differs.
    pub fn resize(&mut self, canvas: Canvas) -> KitResult<bool> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        if canvas == self.canvas {
            return Ok(false);
        }
        self.canvas = canvas;
        self.render()?;
        Ok(true)
    }

    /// Restore every option to its default, including side and logo, then render.
    pub fn reset(&mut self) -> KitResult<()> {
        self.config = RenderConfig::default();
        self.assets.clear(AssetKey::Logo);
        self.render()?;
        Ok(())
    }

    /// Encode the current frame as PNG.
    pub fn encode_png(&self) -> KitResult<Vec<u8>> {
        encode_png(&self.frame)
    }

    /// Write the current frame to `dir` as `jersey-<side>-<unix ms>.png`.
    pub fn export_png(&self, dir: &Path) -> KitResult<PathBuf> {
        export_png(&self.frame, self.config.side, dir)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
