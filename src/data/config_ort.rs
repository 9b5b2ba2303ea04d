//! Options for building the ONNX Runtime session.

use crate::common::ModelConfig;
use crate::data::InputShape;

#[derive(Debug, Clone)]
pub struct ConfigOrt {
    pub ort_lib_path: String,
    pub intra_threads: usize,
    pub default_shape: InputShape,
}

impl Default for ConfigOrt {
    fn default() -> Self {
        Self {
            ort_lib_path: String::new(),
            intra_threads: crate::common::DEFAULT_NUM_THREADS,
            default_shape: InputShape::default(),
        }
    }
}

impl From<&ModelConfig> for ConfigOrt {
    fn from(config: &ModelConfig) -> Self {
        ConfigOrt::new()
            .with_ort_lib_path(&config.ort_lib_path)
            .with_intra_threads(config.num_threads)
            .with_default_shape(InputShape::new(config.height, config.width, config.channels))
    }
}

impl ConfigOrt {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_ort_lib_path(mut self, ort_lib_path: &str) -> Self {
        self.ort_lib_path = ort_lib_path.to_string();
        self
    }

    pub fn with_intra_threads(mut self, n: usize) -> Self {
        self.intra_threads = n;
        self
    }

    pub fn with_default_shape(mut self, shape: InputShape) -> Self {
        self.default_shape = shape;
        self
    }
}
