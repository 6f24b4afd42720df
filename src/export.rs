//! # Export Pipeline
//!
//! The capture boundary: a [`Capture`] implementation turns a projected
//! receipt view into a PNG, and the [`Exporter`] wraps it with the
//! at-most-one-in-flight guard and the download filename derivation.
//!
//! Capture failure is always recoverable: the busy flag is released,
//! nothing else changes, and the caller may retry immediately. There is
//! no cancellation and no timeout.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ViniloError;
use crate::receipt::ReceiptView;
use crate::render::{self, BackgroundSpec};
use crate::theme::{self, Rgb, Theme, WHITE};

/// Capture configuration, mirroring the collaborator contract:
/// 2x scale, white page, logging off, tainted/cross-origin content
/// permitted.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Resolution multiplier over native pixel size.
    pub scale: u32,
    /// Page color behind the background treatment.
    pub background: Rgb,
    /// Emit capture diagnostics to stdout.
    pub logging: bool,
    /// Permit image content the origin check would reject.
    pub allow_taint: bool,
    /// Fetch remote image themes with CORS semantics.
    pub use_cors: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2,
            background: WHITE,
            logging: false,
            allow_taint: true,
            use_cors: true,
        }
    }
}

/// A captured bitmap, PNG-encoded.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CapturedImage {
    /// The PNG as a `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(&self.png))
    }
}

/// The bitmap-capture capability consumed by the exporter.
#[async_trait]
pub trait Capture: Send + Sync {
    async fn capture(
        &self,
        view: &ReceiptView,
        options: &CaptureOptions,
    ) -> Result<CapturedImage, ViniloError>;
}

/// Production capture: resolves the view's theme into a paintable
/// background (fetching remote images when the options permit) and
/// rasterizes on a blocking worker.
pub struct RasterCapture {
    http: reqwest::Client,
}

impl RasterCapture {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Resolve the theme into a [`BackgroundSpec`].
    ///
    /// Malformed payloads (bad color tokens, bad gradients, undecodable
    /// data URIs) resolve to plain white. Only a denied or failed remote
    /// fetch is an error.
    async fn resolve_background(
        &self,
        theme: &Theme,
        options: &CaptureOptions,
    ) -> Result<BackgroundSpec, ViniloError> {
        match theme {
            Theme::Paper => Ok(BackgroundSpec::Paper),
            Theme::Solid(token) => Ok(BackgroundSpec::Solid(
                theme::parse_color(token).unwrap_or(WHITE),
            )),
            Theme::Gradient(descriptor) => Ok(theme::parse_gradient(descriptor)
                .map(BackgroundSpec::Gradient)
                .unwrap_or(BackgroundSpec::Solid(WHITE))),
            Theme::Image(value) => self.resolve_image(value, options).await,
        }
    }

    async fn resolve_image(
        &self,
        value: &str,
        options: &CaptureOptions,
    ) -> Result<BackgroundSpec, ViniloError> {
        if let Some((_mime, bytes)) = theme::parse_data_uri(value) {
            return Ok(match image::load_from_memory(&bytes) {
                Ok(img) => BackgroundSpec::Image(img),
                Err(_) => BackgroundSpec::Solid(WHITE),
            });
        }

        if value.starts_with("http://") || value.starts_with("https://") {
            if !(options.use_cors || options.allow_taint) {
                return Err(ViniloError::Theme(
                    "cross-origin image content is not permitted".to_string(),
                ));
            }
            let response = self
                .http
                .get(value)
                .send()
                .await
                .map_err(|e| ViniloError::Http(format!("Failed to fetch theme image: {e}")))?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ViniloError::Http(format!("Failed to read theme image: {e}")))?;
            let img = image::load_from_memory(&bytes)
                .map_err(|e| ViniloError::Image(format!("Failed to decode theme image: {e}")))?;
            return Ok(BackgroundSpec::Image(img));
        }

        // Unknown payload shape: fall back rather than fail.
        Ok(BackgroundSpec::Solid(WHITE))
    }
}

impl Default for RasterCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capture for RasterCapture {
    async fn capture(
        &self,
        view: &ReceiptView,
        options: &CaptureOptions,
    ) -> Result<CapturedImage, ViniloError> {
        let spec = self.resolve_background(&view.theme, options).await?;

        let view = view.clone();
        let scale = options.scale.max(1);
        let page = options.background;
        let canvas =
            tokio::task::spawn_blocking(move || render::render_view(&view, &spec, scale, page))
                .await
                .map_err(|e| ViniloError::Capture(format!("Render task failed: {e}")))?;

        if options.logging {
            println!("[capture] rendered {}x{} at {scale}x", canvas.width(), canvas.height());
        }

        let (width, height) = (canvas.width(), canvas.height());
        let png = render::encode_png(&canvas)?;
        Ok(CapturedImage { png, width, height })
    }
}

/// A finished export ready for download delivery.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub image: CapturedImage,
}

/// Busy-guarded front of the capture collaborator.
pub struct Exporter {
    capture: Box<dyn Capture>,
    options: CaptureOptions,
    busy: AtomicBool,
}

impl Exporter {
    pub fn new(capture: Box<dyn Capture>, options: CaptureOptions) -> Self {
        Self {
            capture,
            options,
            busy: AtomicBool::new(false),
        }
    }

    /// Production exporter: raster capture with default options.
    pub fn raster() -> Self {
        Self::new(Box::new(RasterCapture::new()), CaptureOptions::default())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Capture the view and derive the download filename.
    ///
    /// Returns `Ok(None)` when a capture is already in flight — the
    /// trigger is ignored, not queued. The busy flag is released on
    /// success and failure alike.
    pub async fn export(
        &self,
        view: &ReceiptView,
        stem: &str,
    ) -> Result<Option<ExportedFile>, ViniloError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(None);
        }
        let _guard = BusyGuard(&self.busy);

        let image = self.capture.capture(view, &self.options).await?;
        Ok(Some(ExportedFile {
            filename: export_filename(stem),
            image,
        }))
    }
}

/// Clears the busy flag when the capture attempt ends, whichever way.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Download filename: stem lowercased, whitespace runs collapsed to a
/// single hyphen, `.png` appended.
pub fn export_filename(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len() + 4);
    let mut in_space = false;
    for ch in stem.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
                in_space = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    out.push_str(".png");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ReceiptForm;
    use crate::receipt::{self, DecorativeCode};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct StubCode;

    impl DecorativeCode for StubCode {
        fn groups(&self) -> Vec<String> {
            vec!["10".into(), "20".into(), "30000".into(), "4000".into()]
        }
    }

    fn sample_view() -> ReceiptView {
        receipt::project(&ReceiptForm::demo(), &StubCode)
    }

    /// Capture stub that counts invocations and sleeps while "in flight".
    struct SlowCapture {
        calls: Arc<AtomicUsize>,
        delay: Duration,
    }

    #[async_trait]
    impl Capture for SlowCapture {
        async fn capture(
            &self,
            _view: &ReceiptView,
            _options: &CaptureOptions,
        ) -> Result<CapturedImage, ViniloError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(CapturedImage { png: vec![1, 2, 3], width: 1, height: 1 })
        }
    }

    struct FailingCapture;

    #[async_trait]
    impl Capture for FailingCapture {
        async fn capture(
            &self,
            _view: &ReceiptView,
            _options: &CaptureOptions,
        ) -> Result<CapturedImage, ViniloError> {
            Err(ViniloError::Capture("boom".into()))
        }
    }

    #[test]
    fn filename_lowercases_and_hyphenates() {
        assert_eq!(export_filename("MY ALBUM-receipt"), "my-album-receipt.png");
        assert_eq!(export_filename("album-receipt"), "album-receipt.png");
        assert_eq!(export_filename("Two  Words   Here"), "two-words-here.png");
        assert_eq!(export_filename(""), ".png");
    }

    #[test]
    fn default_options_match_the_contract() {
        let opts = CaptureOptions::default();
        assert_eq!(opts.scale, 2);
        assert_eq!(opts.background, WHITE);
        assert!(!opts.logging);
        assert!(opts.allow_taint);
        assert!(opts.use_cors);
    }

    #[test]
    fn captured_image_data_uri_prefix() {
        let img = CapturedImage { png: vec![0x89, 0x50], width: 1, height: 1 };
        assert!(img.to_data_uri().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn rapid_double_trigger_runs_exactly_one_capture() {
        let calls = Arc::new(AtomicUsize::new(0));
        let exporter = Exporter::new(
            Box::new(SlowCapture {
                calls: calls.clone(),
                delay: Duration::from_millis(50),
            }),
            CaptureOptions::default(),
        );
        let view = sample_view();

        let (first, second) = tokio::join!(
            exporter.export(&view, "album-receipt"),
            async {
                // Give the first trigger a head start.
                tokio::time::sleep(Duration::from_millis(5)).await;
                exporter.export(&view, "album-receipt").await
            }
        );

        let first = first.unwrap();
        let second = second.unwrap();
        assert!(first.is_some());
        assert!(second.is_none(), "second trigger should be ignored");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_releases_the_busy_flag() {
        let exporter = Exporter::new(Box::new(FailingCapture), CaptureOptions::default());
        let view = sample_view();

        assert!(exporter.export(&view, "x").await.is_err());
        assert!(!exporter.is_busy());

        // The same exporter accepts the next trigger immediately.
        assert!(exporter.export(&view, "x").await.is_err());
        assert!(!exporter.is_busy());
    }

    #[tokio::test]
    async fn export_completes_and_clears_busy() {
        let exporter = Exporter::new(
            Box::new(SlowCapture {
                calls: Arc::new(AtomicUsize::new(0)),
                delay: Duration::from_millis(1),
            }),
            CaptureOptions::default(),
        );
        let view = sample_view();
        let file = exporter.export(&view, "MY ALBUM-receipt").await.unwrap().unwrap();
        assert_eq!(file.filename, "my-album-receipt.png");
        assert!(!exporter.is_busy());
    }

    #[tokio::test]
    async fn raster_capture_scales_output() {
        let capture = RasterCapture::new();
        let view = sample_view();

        let one = capture
            .capture(&view, &CaptureOptions { scale: 1, ..Default::default() })
            .await
            .unwrap();
        let two = capture
            .capture(&view, &CaptureOptions { scale: 2, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(two.width, one.width * 2);
        assert_eq!(two.height, one.height * 2);
    }

    #[tokio::test]
    async fn bad_solid_token_falls_back_to_white() {
        let capture = RasterCapture::new();
        let spec = capture
            .resolve_background(&Theme::Solid("banana".into()), &CaptureOptions::default())
            .await
            .unwrap();
        match spec {
            BackgroundSpec::Solid(c) => assert_eq!(c, WHITE),
            other => panic!("expected solid fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn remote_image_denied_without_cors_or_taint() {
        let capture = RasterCapture::new();
        let options = CaptureOptions {
            use_cors: false,
            allow_taint: false,
            ..Default::default()
        };
        let err = capture
            .resolve_background(&Theme::Image("https://example.com/a.png".into()), &options)
            .await
            .unwrap_err();
        assert!(matches!(err, ViniloError::Theme(_)));
    }

    #[tokio::test]
    async fn undecodable_data_uri_falls_back_to_white() {
        let capture = RasterCapture::new();
        let uri = theme::encode_data_uri("image/png", b"not a png");
        let spec = capture
            .resolve_background(&Theme::Image(uri), &CaptureOptions::default())
            .await
            .unwrap();
        assert!(matches!(spec, BackgroundSpec::Solid(WHITE)));
    }
}
