use tokio::sync::oneshot;
use crate::common::{ClassificationResult, PixelImage};

/// One queued classification and the slot its answer goes to.
#[derive(Debug)]
pub struct ClassifyRequest {
    pub image: Box<PixelImage>,
    pub reply: oneshot::Sender<Vec<ClassificationResult>>,
}

#[derive(Debug)]
pub enum WorkerMessage {
    Classify(ClassifyRequest),
    Close,
}

/// Worker side of the queue.
#[derive(Debug)]
pub struct ClassificationState {
    pub req_rx: crossbeam_channel::Receiver<WorkerMessage>,
}

/// Caller side of the queue.
#[derive(Debug, Clone)]
pub struct SendState {
    pub req_tx: crossbeam_channel::Sender<WorkerMessage>,
}

pub fn channel() -> (SendState, ClassificationState) {
    let (req_tx, req_rx) = crossbeam_channel::unbounded();
    (SendState { req_tx }, ClassificationState { req_rx })
}
