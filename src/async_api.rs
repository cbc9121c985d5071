use crate::render::{ImageRenderer, PixelDimension, RenderedImage};
use crate::vcard::VCardText;
use crate::{Error, GeneratorConfig, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Render(VCardText, PixelDimension, oneshot::Sender<Result<RenderedImage>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async image client backed by a dedicated worker thread.
///
/// The worker thread owns a blocking [`ImageRenderer`] and executes requests
/// sent from async tasks in the order they were issued, so callers never
/// block the executor while the image is fetched.
#[derive(Clone)]
pub struct ImageClient {
    cmd_tx: Sender<Command>,
    size: PixelDimension,
    requests: Arc<AtomicU64>,
}

impl ImageClient {
    /// Create a client for the hosted QR service described by `config`.
    #[cfg(feature = "remote")]
    pub async fn new(config: GeneratorConfig) -> Result<Self> {
        let size = config.size;
        Self::with_renderer(size, move || crate::qrserver::QrServerRenderer::new(config)).await
    }

    /// Create a client around a custom renderer.
    ///
    /// `make` runs on the worker thread, so the renderer itself does not
    /// have to be `Send`.
    pub async fn with_renderer<R, F>(size: PixelDimension, make: F) -> Result<Self>
    where
        R: ImageRenderer + 'static,
        F: FnOnce() -> Result<R> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            let renderer = match make() {
                Ok(r) => r,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Render(payload, size, resp) => {
                        let res = renderer.render(&payload, size);
                        if let Err(ref e) = res {
                            log::warn!("QR image generation failed: {}", e);
                        }
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
        });

        let init_res = init_rx
            .await
            .map_err(|e| Error::GenerationError(format!("Renderer init canceled: {}", e)))?;
        init_res?;

        Ok(Self {
            cmd_tx,
            size,
            requests: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Default image size used by [`crate::Session::generate`].
    pub fn size(&self) -> PixelDimension {
        self.size
    }

    /// Number of render requests handed to the worker so far.
    pub fn requests_sent(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Fetch the QR image for `payload`.
    ///
    /// A `None` payload means the record was not ready; this reports a
    /// validation failure without issuing any request.
    pub async fn acquire_image(
        &self,
        payload: Option<&VCardText>,
        size: PixelDimension,
    ) -> Result<RenderedImage> {
        let payload = payload.ok_or_else(|| Error::ValidationError(required_labels()))?;

        let (tx, rx) = oneshot::channel();
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.cmd_tx
            .send(Command::Render(payload.clone(), size, tx))
            .map_err(|_| Error::GenerationError("Renderer worker is gone".into()))?;
        rx.await
            .map_err(|e| Error::GenerationError(format!("Render canceled: {}", e)))?
    }

    /// Shut down the worker thread.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::GenerationError(format!("Close canceled: {}", e)))?
    }
}

fn required_labels() -> Vec<&'static str> {
    crate::Field::REQUIRED.iter().map(|f| f.label()).collect()
}
