//! Backend driving an in-process libtesseract interpreter.

use std::{sync::Mutex, thread};

use async_trait::async_trait;
use tesseract::Tesseract;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::{
    ocr::{
        OcrError,
        backend::{EMBEDDED_BACKEND_NAME, OcrBackend},
    },
    prelude::*,
};

/// One recognition request for the interpreter thread.
struct Request {
    image: PathBuf,
    lang: String,
    reply: oneshot::Sender<Result<String>>,
}

/// Backend sharing a single interpreter instance across calls.
///
/// The raw libtesseract handle is not `Send` and mutates on every call
/// (load image, extract, reload), so it lives on a dedicated worker thread
/// and requests are serialized through a channel. That makes this type safe
/// to share, but every queued image still runs one at a time; the engine
/// never fans out to this backend.
pub struct EmbeddedBackend {
    sender: Mutex<Option<mpsc::Sender<Request>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl EmbeddedBackend {
    /// Create a backend reading model data from `data_dir`.
    ///
    /// The interpreter itself is created lazily, on the worker thread, the
    /// first time an image comes in for a given language.
    pub fn new(data_dir: &Path) -> EmbeddedBackend {
        let (sender, receiver) = mpsc::channel::<Request>(1);
        let data_dir = data_dir.to_owned();
        let worker = thread::Builder::new()
            .name("docr-embedded".to_owned())
            .spawn(move || interpreter_loop(&data_dir, receiver))
            .expect("failed to spawn interpreter thread");
        EmbeddedBackend {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        }
    }
}

#[async_trait]
impl OcrBackend for EmbeddedBackend {
    fn name(&self) -> &'static str {
        EMBEDDED_BACKEND_NAME
    }

    fn is_available(&self) -> bool {
        // Compiled in, so always usable.
        true
    }

    #[instrument(level = "debug", skip_all, fields(image = %image.display()))]
    async fn process_image(
        &self,
        token: &CancellationToken,
        image: &Path,
        lang: &str,
    ) -> Result<String> {
        let sender = self
            .sender
            .lock()
            .expect("interpreter sender lock poisoned")
            .clone()
            .ok_or_else(|| anyhow!("embedded backend is closed"))?;

        let (reply, response) = oneshot::channel();
        sender
            .send(Request {
                image: image.to_owned(),
                lang: lang.to_owned(),
                reply,
            })
            .await
            .map_err(|_| anyhow!("interpreter thread has exited"))?;

        // The interpreter can't be interrupted mid-recognition, but a
        // cancelled caller shouldn't have to wait for its answer.
        tokio::select! {
            result = response => {
                result.map_err(|_| anyhow!("interpreter thread dropped our request"))?
            }
            _ = token.cancelled() => Err(OcrError::Cancelled.into()),
        }
    }

    async fn close(&self) -> Result<()> {
        // Dropping the sender ends the interpreter loop.
        self.sender
            .lock()
            .expect("interpreter sender lock poisoned")
            .take();
        let worker = self
            .worker
            .lock()
            .expect("interpreter worker lock poisoned")
            .take();
        if let Some(worker) = worker {
            tokio::task::spawn_blocking(move || worker.join())
                .await
                .context("could not join interpreter thread")?
                .map_err(|_| anyhow!("interpreter thread panicked"))?;
        }
        Ok(())
    }
}

/// The worker thread: owns the interpreter, handles one request at a time.
fn interpreter_loop(data_dir: &Path, mut receiver: mpsc::Receiver<Request>) {
    let mut interpreter: Option<Tesseract> = None;
    let mut current_lang = String::new();

    while let Some(request) = receiver.blocking_recv() {
        // (Re)create the interpreter on first use or on a language change.
        if interpreter.is_none() || current_lang != request.lang {
            match Tesseract::new(
                Some(&data_dir.to_string_lossy()),
                Some(&request.lang),
            ) {
                Ok(instance) => {
                    interpreter = Some(instance);
                    current_lang = request.lang.clone();
                }
                Err(err) => {
                    let _ = request.reply.send(Err(anyhow!(
                        "cannot initialize embedded interpreter for {:?}: {}",
                        request.lang,
                        err
                    )));
                    continue;
                }
            }
        }

        // `set_image` consumes the instance; on failure it is gone and the
        // next request recreates it.
        let result = recognize(interpreter.take().expect("interpreter set above"), &request);
        match result {
            Ok((instance, text)) => {
                interpreter = Some(instance);
                let _ = request.reply.send(Ok(text));
            }
            Err(err) => {
                let _ = request.reply.send(Err(err));
            }
        }
    }
    // Sender dropped: release the interpreter and exit.
    drop(interpreter);
}

/// Load one image into the interpreter and extract its text.
fn recognize(instance: Tesseract, request: &Request) -> Result<(Tesseract, String)> {
    let mut instance = instance
        .set_image(&request.image.to_string_lossy())
        .with_context(|| format!("cannot load image {:?}", request.image))?;
    let text = instance
        .get_text()
        .with_context(|| format!("cannot recognize {:?}", request.image))?;
    Ok((instance, text.trim().to_owned()))
}
