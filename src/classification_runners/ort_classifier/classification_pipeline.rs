use anyhow::Result;
use crate::classification_runners::inference_process::InferenceProcess;
use crate::classification_runners::ort_classifier::{image_ops, top_k, ModelEngine};
use crate::common::{ClassificationResult, ModelConfig, PixelImage};
use crate::data::{InputShape, LabelSet, TimeCalc, X};
use crate::error::ClassifierError;

/// The work a ready classifier does per image: encode, run, rank.
pub struct ClassificationPipeline {
    engine: Box<dyn ModelEngine>,
    shape: InputShape,
    labels: LabelSet,
    conf_threshold: f32,
    max_results: usize,
    profile: bool,
    ts: TimeCalc,
}

impl std::fmt::Debug for ClassificationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationPipeline")
            .field("shape", &self.shape)
            .field("labels", &self.labels.len())
            .field("conf_threshold", &self.conf_threshold)
            .field("max_results", &self.max_results)
            .field("released", &self.engine.is_released())
            .finish()
    }
}

impl ClassificationPipeline {
    pub fn new(engine: Box<dyn ModelEngine>, labels: LabelSet, config: &ModelConfig) -> Self {
        let shape = engine.input_shape();
        if let Some(n) = engine.output_len() {
            if n != labels.len() {
                log::warn!("Model scores {} classes but {} labels are loaded; ranking the first {}",
                    n, labels.len(), n.min(labels.len()));
            }
        }

        Self {
            engine,
            shape,
            labels,
            conf_threshold: config.conf_threshold,
            max_results: config.max_results.max(1),
            profile: config.profile,
            ts: TimeCalc::default(),
        }
    }

    pub fn classify(&mut self, image: &PixelImage) -> Result<Vec<ClassificationResult>, ClassifierError> {
        let profile = self.profile;
        self.forward(image, profile).map_err(ClassifierError::from_anyhow)
    }

    pub fn release(&mut self) {
        self.engine.release();
    }

    pub fn input_shape(&self) -> InputShape {
        self.shape
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn into_labels(self) -> LabelSet {
        self.labels
    }
}

impl InferenceProcess for ClassificationPipeline {
    type Input = PixelImage;
    type Output = Vec<ClassificationResult>;

    fn preprocess(&self, image: &PixelImage) -> Result<X> {
        match image_ops::encode(image, self.shape) {
            Ok(x) => Ok(x),
            Err(err) => {
                log::warn!("{err}; feeding an all-zero {} tensor", self.shape);
                Ok(X::zeros(&self.shape.nhwc()))
            }
        }
    }

    fn inference(&mut self, x: X) -> Result<X> {
        self.engine.run(x)
    }

    fn postprocess(&self, y: X) -> Result<Vec<ClassificationResult>> {
        let scores = y.to_flat_vec();
        if scores.len() != self.labels.len() {
            log::debug!("Output has {} scores for {} labels", scores.len(), self.labels.len());
        }

        let results = top_k(&scores, &self.labels, self.max_results, self.conf_threshold);
        if results.is_empty() {
            return Err(ClassifierError::EmptyOutput.into());
        }
        Ok(results)
    }

    fn timings(&mut self) -> &mut TimeCalc {
        &mut self.ts
    }
}
