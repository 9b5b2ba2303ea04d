use crate::asset_loader::AssetLoader;
use crate::classification_runners::{ClassificationPipeline, ModelEngine};
use crate::common::{ClassificationResult, ClassifierState, ModelConfig, PixelImage};
use crate::data::{AssetSource, ConfigOrt, DirAssets, InputShape, LabelSet};
use crate::error::ClassifierError;

#[derive(Debug)]
enum Inner {
    Ready(ClassificationPipeline),
    Degraded { labels: LabelSet, reason: String },
    Closed(LabelSet),
}

/// Garbage classifier over a bundled model and label set.
///
/// Construction never fails: if the assets cannot be loaded the classifier is
/// [`ClassifierState::Degraded`] and every [`Classifier::classify`] call answers with a
/// sentinel. `classify` and `close` take `&mut self`, so one instance is only ever used
/// by one caller at a time; see [`crate::ClassifierWorker`] for sharing one across threads.
///
/// ```no_run
/// use bvr_classify::{Classifier, ModelConfig, PixelImage};
/// use bvr_classify::data::DirAssets;
///
/// let mut classifier = Classifier::new(&DirAssets::new("assets"), &ModelConfig::default());
/// let image = PixelImage::from(image::open("bottle.jpg").unwrap());
/// for result in classifier.classify(&image) {
///     println!("{}", result);
/// }
/// classifier.close();
/// ```
#[derive(Debug)]
pub struct Classifier {
    inner: Inner,
}

impl Classifier {
    pub fn new<S: AssetSource + ?Sized>(assets: &S, config: &ModelConfig) -> Self {
        let loader = AssetLoader::new(assets, ConfigOrt::from(config));
        match Self::load(&loader, config) {
            Ok(pipeline) => {
                log::info!("Classifier ready: input {} | {} labels", pipeline.input_shape(), pipeline.labels().len());
                Self { inner: Inner::Ready(pipeline) }
            }
            Err(err) => {
                log::error!("Failed to initialize classifier: {err}. Using default labels.");
                Self::degraded(err.to_string())
            }
        }
    }

    /// Loads from `config.asset_dir`, or from the per-user cache directory when unset.
    pub fn from_config(config: &ModelConfig) -> Self {
        let assets = match &config.asset_dir {
            Some(dir) => DirAssets::new(dir),
            None => match DirAssets::default_location() {
                Ok(assets) => assets,
                Err(err) => {
                    log::error!("No asset directory available: {err:#}");
                    return Self::degraded(format!("{err:#}"));
                }
            },
        };
        Self::new(&assets, config)
    }

    /// A ready classifier around an already loaded engine.
    pub fn with_engine(engine: Box<dyn ModelEngine>, labels: LabelSet, config: &ModelConfig) -> Self {
        Self {
            inner: Inner::Ready(ClassificationPipeline::new(engine, labels, config)),
        }
    }

    /// A classifier that only answers with sentinels.
    pub fn degraded(reason: String) -> Self {
        Self {
            inner: Inner::Degraded { labels: LabelSet::default(), reason },
        }
    }

    fn load<S: AssetSource + ?Sized>(
        loader: &AssetLoader<'_, S>,
        config: &ModelConfig,
    ) -> Result<ClassificationPipeline, ClassifierError> {
        let engine = loader.load_model(&config.model_asset)?;
        let labels = loader.load_labels(&config.labels_asset)?;

        Ok(ClassificationPipeline::new(Box::new(engine), labels, config))
    }

    pub fn state(&self) -> ClassifierState {
        match self.inner {
            Inner::Ready(_) => ClassifierState::Ready,
            Inner::Degraded { .. } => ClassifierState::Degraded,
            Inner::Closed(_) => ClassifierState::Closed,
        }
    }

    /// Why loading failed, for a degraded classifier.
    pub fn degraded_reason(&self) -> Option<&str> {
        match &self.inner {
            Inner::Degraded { reason, .. } => Some(reason.as_str()),
            _ => None,
        }
    }

    pub fn labels(&self) -> &LabelSet {
        match &self.inner {
            Inner::Ready(pipeline) => pipeline.labels(),
            Inner::Degraded { labels, .. } => labels,
            Inner::Closed(labels) => labels,
        }
    }

    pub fn input_shape(&self) -> Option<InputShape> {
        match &self.inner {
            Inner::Ready(pipeline) => Some(pipeline.input_shape()),
            _ => None,
        }
    }

    /// Ranked predictions, or the typed reason there are none.
    pub fn try_classify(&mut self, image: &PixelImage) -> Result<Vec<ClassificationResult>, ClassifierError> {
        match &mut self.inner {
            Inner::Ready(pipeline) => pipeline.classify(image),
            Inner::Degraded { .. } | Inner::Closed(_) => Err(ClassifierError::ModelNotLoaded),
        }
    }

    /// Ranked predictions, highest confidence first, never empty.
    ///
    /// Failures come back as a single [`crate::common::Sentinel`] result with confidence 1.0.
    pub fn classify(&mut self, image: &PixelImage) -> Vec<ClassificationResult> {
        match self.try_classify(image) {
            Ok(results) => results,
            Err(err) => {
                match err {
                    ClassifierError::ModelNotLoaded => log::error!("Model not loaded, cannot classify image"),
                    ref err => log::error!("Failed to classify image: {err}"),
                }
                vec![ClassificationResult::sentinel(err.sentinel())]
            }
        }
    }

    /// Releases the model. Safe to call more than once.
    pub fn close(&mut self) {
        let inner = std::mem::replace(&mut self.inner, Inner::Closed(LabelSet::default()));
        self.inner = match inner {
            Inner::Ready(mut pipeline) => {
                pipeline.release();
                log::info!("Classifier closed");
                Inner::Closed(pipeline.into_labels())
            }
            Inner::Degraded { labels, .. } => Inner::Closed(labels),
            closed @ Inner::Closed(_) => closed,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryAssets;

    #[test]
    fn missing_assets_degrade() {
        let mut classifier = Classifier::new(&MemoryAssets::new(), &ModelConfig::default());
        assert_eq!(classifier.state(), ClassifierState::Degraded);
        assert!(classifier.labels().is_default());
        assert!(classifier.degraded_reason().unwrap().contains("garbage_classification_model_quantized.onnx"));
        assert!(classifier.input_shape().is_none());

        let results = classifier.classify(&PixelImage::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].confidence, 1.0);
        assert!(results[0].is_sentinel());
    }

    #[test]
    fn unparseable_model_degrades() {
        let assets = MemoryAssets::new()
            .with_static(crate::common::DEFAULT_MODEL_ASSET, b"definitely not an onnx model")
            .with_static(crate::common::DEFAULT_LABELS_ASSET, b"Glass\nPaper\n");
        let config = ModelConfig::new(None, "/nonexistent/libonnxruntime.so".into());
        let mut classifier = Classifier::new(&assets, &config);

        assert_eq!(classifier.state(), ClassifierState::Degraded);
        assert!(classifier.labels().is_default());
        assert!(matches!(
            classifier.try_classify(&PixelImage::default()),
            Err(ClassifierError::ModelNotLoaded)
        ));
    }

    #[test]
    fn degraded_close_is_terminal() {
        let mut classifier = Classifier::degraded("test".into());
        classifier.close();
        classifier.close();
        assert_eq!(classifier.state(), ClassifierState::Closed);
        assert!(matches!(
            classifier.try_classify(&PixelImage::default()),
            Err(ClassifierError::ModelNotLoaded)
        ));
    }
}
