mod utils;
mod asset_loader;
mod classifier;
mod error;
mod worker;
pub mod data;
pub mod classification_runners;
pub mod common;
pub mod extern_c_api;

use std::time::Instant;
pub use crate::asset_loader::AssetLoader;
pub use crate::classifier::Classifier;
pub use crate::common::{ClassificationResult, ClassifierState, ModelConfig, PixelImage, Sentinel};
pub use crate::error::ClassifierError;
pub use crate::worker::ClassifierWorker;

pub type Result<T, E = ClassifierError> = std::result::Result<T, E>;

pub fn init_classifier(model_details: &ModelConfig) -> Classifier {
    log::info!("Initializing classifier: {}", model_details.to_string());
    let classifier = Classifier::from_config(model_details);
    if let Some(reason) = classifier.degraded_reason() {
        log::warn!("{} Classifier degraded: {}", crate::data::CROSS_MARK, reason);
    }
    classifier
}

pub fn run_classification(classifier: &mut Classifier, image: &PixelImage) -> Vec<ClassificationResult> {
    let now = Instant::now();

    let results = classifier.classify(image);

    log::debug!("Processing time: {:?}", now.elapsed());

    results
}
