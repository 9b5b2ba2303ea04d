mod classification_pipeline;
mod model_engine;
mod ort_engine;
mod top_k;
pub mod image_ops;
pub mod input_wrapper;

pub use classification_pipeline::*;
pub use model_engine::*;
pub use ort_engine::*;
pub use top_k::top_k;
