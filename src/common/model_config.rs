use std::path::Path;
use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_ASSET: &str = "garbage_classification_model_quantized.onnx";
pub const DEFAULT_LABELS_ASSET: &str = "class_names.txt";
pub const DEFAULT_NUM_THREADS: usize = 4;
pub const DEFAULT_INPUT_WIDTH: u32 = 224;
pub const DEFAULT_INPUT_HEIGHT: u32 = 224;
pub const DEFAULT_INPUT_CHANNELS: u32 = 3;
pub const DEFAULT_CONF_THRESHOLD: f32 = 0.1;
pub const DEFAULT_MAX_RESULTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory holding the bundled assets. `None` means the per-user cache location.
    pub asset_dir: Option<String>,
    pub model_asset: String,
    pub labels_asset: String,
    /// Path to the onnxruntime shared library. Empty means `ORT_DYLIB_PATH` or the system default.
    pub ort_lib_path: String,
    pub num_threads: usize,
    /// Input size used when the model does not declare one.
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub conf_threshold: f32,
    pub max_results: usize,
    pub profile: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            asset_dir: None,
            model_asset: DEFAULT_MODEL_ASSET.to_string(),
            labels_asset: DEFAULT_LABELS_ASSET.to_string(),
            ort_lib_path: String::new(),
            num_threads: DEFAULT_NUM_THREADS,
            width: DEFAULT_INPUT_WIDTH,
            height: DEFAULT_INPUT_HEIGHT,
            channels: DEFAULT_INPUT_CHANNELS,
            conf_threshold: DEFAULT_CONF_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
            profile: false,
        }
    }
}

impl ModelConfig {
    pub fn new(asset_dir: Option<String>, ort_lib_path: String) -> Self {
        Self {
            asset_dir,
            ort_lib_path,
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Invalid classifier configuration")
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn to_string(&self) -> String {
        format!("Asset Directory: {}\n\
        Model Asset: {}\n\
        Labels Asset: {}\n\
        OnnxRuntime Lib Path: {}\n\
        Intra-op Threads: {}\n\
        Default Input Resolution: {}x{}x{}\n\
        Confidence Threshold: {}\n\
        Max Results: {}",
                self.asset_dir.as_deref().unwrap_or("<default>"), self.model_asset, self.labels_asset,
                self.ort_lib_path, self.num_threads,
                self.width, self.height, self.channels,
                self.conf_threshold, self.max_results)
    }
}
