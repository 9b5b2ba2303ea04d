use std::thread::JoinHandle;
use anyhow::{Context, Result};
use tokio::sync::oneshot;
use crate::classifier::Classifier;
use crate::common::{ClassificationResult, PixelImage, Sentinel};
use crate::data::send_channels::{self, ClassificationState, ClassifyRequest, SendState, WorkerMessage};

/// Owns a [`Classifier`] on a dedicated thread and serializes every request through a queue.
///
/// Cloning the sender side is cheap, so callers on any thread (or task) can share one worker.
#[derive(Debug)]
pub struct ClassifierWorker {
    send: SendState,
    handle: Option<JoinHandle<()>>,
}

impl ClassifierWorker {
    pub fn spawn(classifier: Classifier) -> Result<Self> {
        let (send, state) = send_channels::channel();
        let handle = std::thread::Builder::new()
            .name("bvr-classifier".to_string())
            .spawn(move || run_worker(classifier, state))
            .context("Failed to spawn classifier thread")?;

        Ok(Self { send, handle: Some(handle) })
    }

    /// A handle for queueing requests from elsewhere.
    pub fn sender(&self) -> SendState {
        self.send.clone()
    }

    /// Blocks until the worker has answered. Must not be called from inside an async runtime.
    pub fn classify(&self, image: PixelImage) -> Vec<ClassificationResult> {
        match self.enqueue(image) {
            Some(rx) => rx.blocking_recv().unwrap_or_else(|_| worker_gone()),
            None => worker_gone(),
        }
    }

    pub async fn classify_async(&self, image: PixelImage) -> Vec<ClassificationResult> {
        match self.enqueue(image) {
            Some(rx) => rx.await.unwrap_or_else(|_| worker_gone()),
            None => worker_gone(),
        }
    }

    fn enqueue(&self, image: PixelImage) -> Option<oneshot::Receiver<Vec<ClassificationResult>>> {
        let (reply, rx) = oneshot::channel();
        let request = ClassifyRequest { image: Box::new(image), reply };
        self.send.req_tx.send(WorkerMessage::Classify(request)).ok()?;
        Some(rx)
    }

    /// Closes the classifier and waits for the thread. Requests already queued are answered first.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.send.req_tx.send(WorkerMessage::Close);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Classifier thread panicked");
            }
        }
    }
}

impl Drop for ClassifierWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_gone() -> Vec<ClassificationResult> {
    log::warn!("Classifier worker is not running");
    vec![ClassificationResult::sentinel(Sentinel::ModelNotLoaded)]
}

fn run_worker(mut classifier: Classifier, state: ClassificationState) {
    log::debug!("Classifier worker started ({})", classifier.state());
    let mut n = 0usize;

    while let Ok(msg) = state.req_rx.recv() {
        match msg {
            WorkerMessage::Classify(ClassifyRequest { image, reply }) => {
                let results = classifier.classify(&image);
                n += 1;
                if reply.send(results).is_err() {
                    log::debug!("Caller dropped before request {} was answered", n);
                }
            }
            WorkerMessage::Close => break,
        }
    }

    classifier.close();
    log::debug!("Classifier worker stopped after {} requests", n);
}
