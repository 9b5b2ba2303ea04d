
mod classification_result;
mod classifier_state;
mod model_config;
mod pixel_image;

pub use classification_result::*;
pub use classifier_state::*;
pub use model_config::*;
pub use pixel_image::*;
