//! Asynchronous asset loading with timeout and placeholder substitution.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::assets::fonts::ResolvedFont;
use crate::assets::placeholder::placeholder_image;
use crate::assets::set::{AssetKey, AssetOrigin, LoadedAsset};
use crate::foundation::core::Side;
use crate::foundation::error::{KitError, KitResult};

/// Number of swatches in the standard pattern catalog.
pub const PATTERN_CATALOG_LEN: u32 = 27;

/// Default time a single load may take before a placeholder is substituted.
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 5_000;

/// Pattern swatch identifier; the standard catalog is `1..=27`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(pub u32);

impl PatternId {
    /// Every id in the standard catalog, in order.
    pub fn catalog() -> impl Iterator<Item = PatternId> {
        (1..=PATTERN_CATALOG_LEN).map(PatternId)
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pattern {}", self.0)
    }
}

/// Where assets live on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// Root directory holding `canvas/`, `patterns/` and optionally `fonts/`.
    pub base: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            base: PathBuf::from("assets"),
        }
    }
}

impl AssetPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn silhouette(&self, side: Side) -> PathBuf {
        let file = match side {
            Side::Front => "front_jersey.png",
            Side::Back => "back_side.png",
        };
        self.base.join("canvas").join(file)
    }

    pub fn pattern(&self, id: PatternId) -> PathBuf {
        self.base
            .join("patterns")
            .join(format!("Canvas ({}).jfif", id.0))
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.base.join("fonts")
    }
}

/// One fetch. A `nonce` makes the request distinct from earlier ones for the same path, so a
/// caching source has to go back to the origin.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    pub path: PathBuf,
    pub nonce: Option<u64>,
}

impl AssetRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            nonce: None,
        }
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// The path, plus `?t=<nonce>` when cache-busted.
    pub fn identity(&self) -> String {
        match self.nonce {
            Some(n) => format!("{}?t={n}", self.path.display()),
            None => self.path.display().to_string(),
        }
    }
}

/// Blocking byte source for asset requests.
pub trait AssetSource: Send + Sync + 'static {
    fn fetch(&self, request: &AssetRequest) -> KitResult<Vec<u8>>;
}

/// Reads requested paths from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSource;

impl AssetSource for FsSource {
    fn fetch(&self, request: &AssetRequest) -> KitResult<Vec<u8>> {
        let bytes = std::fs::read(&request.path)
            .with_context(|| format!("read asset '{}'", request.path.display()))?;
        Ok(bytes)
    }
}

/// Loader tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOpts {
    /// Per-load timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for LoaderOpts {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_LOAD_TIMEOUT_MS,
        }
    }
}

impl LoaderOpts {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// A finished background load, delivered on the session's channel.
#[derive(Clone, Debug)]
pub struct AssetEvent {
    pub key: AssetKey,
    /// Ticket of the pending slot this load was started for.
    pub ticket: Option<u64>,
    pub asset: LoadedAsset,
}

/// Resolves asset requests into decoded images. Every load resolves: errors and timeouts turn
/// into labelled placeholders.
///
/// The loader holds no bytes itself; decoded patterns are kept by the session's pattern cache.
/// Cloning is cheap; clones share the nonce clock and event channel.
#[derive(Clone)]
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    paths: AssetPaths,
    opts: LoaderOpts,
    font: Option<ResolvedFont>,
    last_nonce: Arc<AtomicU64>,
    events: mpsc::UnboundedSender<AssetEvent>,
}

impl AssetLoader {
    /// Build a loader plus the receiving end of its event channel.
    pub fn new(
        source: Arc<dyn AssetSource>,
        paths: AssetPaths,
        opts: LoaderOpts,
        font: Option<ResolvedFont>,
    ) -> (Self, mpsc::UnboundedReceiver<AssetEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            source,
            paths,
            opts,
            font,
            last_nonce: Arc::new(AtomicU64::new(0)),
            events: tx,
        };
        (loader, rx)
    }

    pub fn paths(&self) -> &AssetPaths {
        &self.paths
    }

    pub fn opts(&self) -> LoaderOpts {
        self.opts
    }

    /// Millisecond timestamp, bumped when needed so every nonce is larger than the previous one.
    pub fn fresh_nonce(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut prev = self.last_nonce.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self.last_nonce.compare_exchange_weak(
                prev,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    /// Request for the silhouette of `side`, cache-busted when `reload` is set.
    pub fn silhouette_request(&self, side: Side, reload: bool) -> AssetRequest {
        let req = AssetRequest::new(self.paths.silhouette(side));
        if reload {
            req.with_nonce(self.fresh_nonce())
        } else {
            req
        }
    }

    pub fn pattern_request(&self, id: PatternId) -> AssetRequest {
        AssetRequest::new(self.paths.pattern(id))
    }

    /// Fetch and decode `request`, substituting a placeholder on error or timeout.
    ///
    /// The fetch runs on the blocking pool. When the timeout wins, the blocking work keeps
    /// running and its result is dropped.
    #[tracing::instrument(skip(self), fields(identity = %request.identity()))]
    pub async fn load(&self, key: AssetKey, request: AssetRequest) -> LoadedAsset {
        let source = Arc::clone(&self.source);
        let work = tokio::task::spawn_blocking(move || fetch_and_decode(&*source, &request));

        match tokio::time::timeout(self.opts.timeout(), work).await {
            Ok(Ok(Ok(image))) => {
                tracing::debug!(%key, w = image.width, h = image.height, "asset decoded");
                LoadedAsset {
                    image,
                    origin: AssetOrigin::Decoded,
                }
            }
            Ok(Ok(Err(e))) => {
                tracing::warn!(%key, error = %e, "asset load failed; using placeholder");
                self.placeholder(key, AssetOrigin::Failed)
            }
            Ok(Err(e)) => {
                tracing::warn!(%key, error = %e, "asset load task failed; using placeholder");
                self.placeholder(key, AssetOrigin::Failed)
            }
            Err(_) => {
                tracing::warn!(
                    %key,
                    timeout_ms = self.opts.timeout_ms,
                    "asset load timed out; using placeholder"
                );
                self.placeholder(key, AssetOrigin::TimedOut)
            }
        }
    }

    /// Load both silhouettes concurrently and wait for both.
    pub async fn load_silhouettes(&self, reload: bool) -> [(Side, LoadedAsset); 2] {
        let front = self.load(
            AssetKey::Silhouette(Side::Front),
            self.silhouette_request(Side::Front, reload),
        );
        let back = self.load(
            AssetKey::Silhouette(Side::Back),
            self.silhouette_request(Side::Back, reload),
        );
        let (front, back) = tokio::join!(front, back);
        [(Side::Front, front), (Side::Back, back)]
    }

    /// Run [`AssetLoader::load`] as its own task and post the result as an [`AssetEvent`].
    pub fn spawn(
        &self,
        key: AssetKey,
        ticket: Option<u64>,
        request: AssetRequest,
    ) -> JoinHandle<()> {
        let loader = self.clone();
        tokio::spawn(async move {
            let asset = loader.load(key, request).await;
            if loader
                .events
                .send(AssetEvent { key, ticket, asset })
                .is_err()
            {
                tracing::debug!(%key, "asset event dropped; session is gone");
            }
        })
    }

    fn placeholder(&self, key: AssetKey, origin: AssetOrigin) -> LoadedAsset {
        let label = match origin {
            AssetOrigin::TimedOut => format!("Timeout: {key}"),
            _ => format!("Failed: {key}"),
        };
        LoadedAsset {
            image: placeholder_image(&label, self.font.as_ref()),
            origin,
        }
    }
}

fn fetch_and_decode(
    source: &dyn AssetSource,
    request: &AssetRequest,
) -> KitResult<PreparedImage> {
    let bytes = source.fetch(request)?;
    decode_image(&bytes)
        .map_err(|e| KitError::asset(format!("decode '{}': {e}", request.path.display())))
}

/// Load a single image file synchronously (CLI logo argument, tests).
pub fn load_image_file(path: &Path) -> KitResult<PreparedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
