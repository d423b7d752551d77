use super::*;
use std::sync::atomic::AtomicUsize;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Serves one PNG for every request and counts fetches.
struct CountingSource {
    png: Vec<u8>,
    fetches: AtomicUsize,
    delay: Duration,
}

impl CountingSource {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            png: png_bytes(4, 6, [255, 0, 0, 255]),
            fetches: AtomicUsize::new(0),
            delay,
        })
    }
}

impl AssetSource for CountingSource {
    fn fetch(&self, _request: &AssetRequest) -> KitResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(self.png.clone())
    }
}

struct BrokenSource;

impl AssetSource for BrokenSource {
    fn fetch(&self, _request: &AssetRequest) -> KitResult<Vec<u8>> {
        Ok(b"definitely not an image".to_vec())
    }
}

fn loader_with(source: Arc<dyn AssetSource>, timeout_ms: u64) -> AssetLoader {
    let (loader, _rx) = AssetLoader::new(
        source,
        AssetPaths::new("/kit"),
        LoaderOpts { timeout_ms },
        None,
    );
    loader
}

#[test]
fn request_identity_carries_nonce() {
    let req = AssetRequest::new("/kit/canvas/front_jersey.png");
    assert_eq!(req.identity(), "/kit/canvas/front_jersey.png");
    assert_eq!(
        req.with_nonce(1700000000123).identity(),
        "/kit/canvas/front_jersey.png?t=1700000000123"
    );
}

#[test]
fn asset_paths_follow_catalog_layout() {
    let p = AssetPaths::new("/kit");
    assert_eq!(
        p.silhouette(Side::Front),
        PathBuf::from("/kit/canvas/front_jersey.png")
    );
    assert_eq!(
        p.silhouette(Side::Back),
        PathBuf::from("/kit/canvas/back_side.png")
    );
    assert_eq!(
        p.pattern(PatternId(12)),
        PathBuf::from("/kit/patterns/Canvas (12).jfif")
    );
    assert_eq!(p.fonts_dir(), PathBuf::from("/kit/fonts"));
}

#[test]
fn catalog_is_one_through_twenty_seven() {
    let ids: Vec<_> = PatternId::catalog().collect();
    assert_eq!(ids.len(), 27);
    assert_eq!(ids.first(), Some(&PatternId(1)));
    assert_eq!(ids.last(), Some(&PatternId(27)));
}

#[test]
fn loader_opts_default_timeout_is_five_seconds() {
    assert_eq!(LoaderOpts::default().timeout(), Duration::from_secs(5));
    let opts: LoaderOpts = serde_json::from_str("{}").unwrap();
    assert_eq!(opts, LoaderOpts::default());
}

#[test]
fn nonces_strictly_increase() {
    let loader = loader_with(CountingSource::new(Duration::ZERO), 1000);
    let mut prev = 0;
    for _ in 0..100 {
        let n = loader.fresh_nonce();
        assert!(n > prev);
        prev = n;
    }
    let req = loader.silhouette_request(Side::Back, true);
    assert!(req.nonce.unwrap() > prev);
    assert_eq!(loader.silhouette_request(Side::Back, false).nonce, None);
}

#[tokio::test]
async fn every_load_goes_back_to_the_source() {
    let source = CountingSource::new(Duration::ZERO);
    let loader = loader_with(source.clone(), 1000);

    let req = AssetRequest::new("/kit/canvas/front_jersey.png");
    let a = loader
        .load(AssetKey::Silhouette(Side::Front), req.clone())
        .await;
    assert_eq!(a.origin, AssetOrigin::Decoded);
    assert_eq!((a.image.width, a.image.height), (4, 6));
    assert_eq!(a.image.pixel(0, 0), [255, 0, 0, 255]);

    let _ = loader.load(AssetKey::Logo, req.clone()).await;
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);

    let busted = req.with_nonce(loader.fresh_nonce());
    let b = loader.load(AssetKey::Silhouette(Side::Front), busted).await;
    assert_eq!(b.origin, AssetOrigin::Decoded);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn missing_file_resolves_to_failed_placeholder() {
    let loader = loader_with(Arc::new(FsSource), 1000);
    let got = loader
        .load(
            AssetKey::Silhouette(Side::Back),
            AssetRequest::new("/definitely/not/here.png"),
        )
        .await;
    assert_eq!(got.origin, AssetOrigin::Failed);
    assert_eq!((got.image.width, got.image.height), (200, 240));
    assert_eq!(got.image.pixel(0, 0), [0xe0, 0xe0, 0xe0, 0xff]);
}

#[tokio::test]
async fn undecodable_bytes_resolve_to_failed_placeholder() {
    let loader = loader_with(Arc::new(BrokenSource), 1000);
    let got = loader
        .load(AssetKey::Logo, AssetRequest::new("logo.png"))
        .await;
    assert_eq!(got.origin, AssetOrigin::Failed);
}

#[tokio::test]
async fn slow_load_resolves_to_timeout_placeholder_within_timeout() {
    let loader = loader_with(CountingSource::new(Duration::from_millis(1500)), 50);
    let started = std::time::Instant::now();
    let got = loader
        .load(
            AssetKey::Silhouette(Side::Front),
            AssetRequest::new("slow.png"),
        )
        .await;
    assert!(started.elapsed() < Duration::from_millis(1000));
    assert_eq!(got.origin, AssetOrigin::TimedOut);
    assert_eq!((got.image.width, got.image.height), (200, 240));
}

#[tokio::test]
async fn spawned_load_posts_event_with_ticket() {
    let (loader, mut rx) = AssetLoader::new(
        CountingSource::new(Duration::ZERO),
        AssetPaths::new("/kit"),
        LoaderOpts::default(),
        None,
    );
    let handle = loader.spawn(
        AssetKey::Pattern(PatternId(5)),
        Some(9),
        loader.pattern_request(PatternId(5)),
    );
    handle.await.unwrap();
    let ev = rx.try_recv().unwrap();
    assert_eq!(ev.key, AssetKey::Pattern(PatternId(5)));
    assert_eq!(ev.ticket, Some(9));
    assert_eq!(ev.asset.origin, AssetOrigin::Decoded);
}

#[tokio::test]
async fn silhouettes_load_jointly() {
    let loader = loader_with(CountingSource::new(Duration::ZERO), 1000);
    let [(s0, a0), (s1, a1)] = loader.load_silhouettes(false).await;
    assert_eq!((s0, s1), (Side::Front, Side::Back));
    assert_eq!(a0.origin, AssetOrigin::Decoded);
    assert_eq!(a1.origin, AssetOrigin::Decoded);
}
