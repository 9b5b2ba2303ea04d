use crate::classification_runners::OrtEngine;
use crate::data::{AssetSource, ConfigOrt, LabelSet};
use crate::error::ClassifierError;
use crate::utils::human_bytes;

/// Turns named assets into a model and a label set. Never substitutes defaults itself.
pub struct AssetLoader<'a, S: AssetSource + ?Sized> {
    source: &'a S,
    ort: ConfigOrt,
}

impl<'a, S: AssetSource + ?Sized> AssetLoader<'a, S> {
    pub fn new(source: &'a S, ort: ConfigOrt) -> Self {
        Self { source, ort }
    }

    pub fn load_model(&self, name: &str) -> Result<OrtEngine, ClassifierError> {
        log::debug!("Loading model asset: {}", name);
        let bytes = self
            .source
            .read(name)
            .map_err(|e| ClassifierError::asset_read(name, e))?;
        log::debug!("Model asset size: {}", human_bytes(bytes.len() as f64));

        OrtEngine::from_memory(&self.ort, &bytes)
            .map_err(|e| ClassifierError::asset_read(name, format!("{e:#}")))
    }

    pub fn load_labels(&self, name: &str) -> Result<LabelSet, ClassifierError> {
        let bytes = self
            .source
            .read(name)
            .map_err(|e| ClassifierError::asset_read(name, e))?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| ClassifierError::asset_read(name, format!("not UTF-8: {e}")))?;

        let labels = LabelSet::parse(text);
        if labels.is_empty() {
            return Err(ClassifierError::asset_read(name, "label file is empty"));
        }
        log::info!("Loaded {} labels from {}", labels.len(), name);
        Ok(labels)
    }
}
