use serde::{Deserialize, Serialize};

/// Error placeholders delivered through the normal result channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentinel {
    ModelNotLoaded,
    RuntimeUnavailable,
    NoResult,
    RecognitionFailed,
}

impl Sentinel {
    pub fn label(&self) -> &'static str {
        match self {
            Sentinel::ModelNotLoaded => "Error: model not loaded",
            Sentinel::RuntimeUnavailable => "Error: model unavailable, runtime error",
            Sentinel::NoResult => "Error: no result",
            Sentinel::RecognitionFailed => "Error: recognition failed",
        }
    }
}

impl std::fmt::Display for Sentinel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Index into the label set. `None` for sentinels.
    pub class_id: Option<usize>,
    pub label: String,
    /// Raw model output; not guaranteed to be normalized.
    pub confidence: f32,
    pub sentinel: Option<Sentinel>,
}

impl ClassificationResult {
    pub fn new(class_id: usize, label: &str, confidence: f32) -> Self {
        Self {
            class_id: Some(class_id),
            label: label.to_string(),
            confidence,
            sentinel: None,
        }
    }

    /// A placeholder carrying the sentinel's label and a confidence of exactly 1.0.
    pub fn sentinel(sentinel: Sentinel) -> Self {
        Self {
            class_id: None,
            label: sentinel.label().to_string(),
            confidence: 1.0,
            sentinel: Some(sentinel),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.sentinel.is_some()
    }

    pub fn get_label(&self) -> &str {
        self.label.as_str()
    }
}

impl std::fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.2}%)", self.label, self.confidence * 100.)
    }
}
