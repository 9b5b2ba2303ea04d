mod asset_store;
mod config_ort;
mod filesystem_access;
mod input_shape;
mod label_set;
mod time_calc;
pub mod send_channels;

pub use asset_store::*;
pub use config_ort::ConfigOrt;
pub use filesystem_access::FsAccess;
pub use input_shape::InputShape;
pub use label_set::{LabelSet, DEFAULT_LABELS};
pub use time_calc::TimeCalc;

pub use crate::classification_runners::ort_classifier::input_wrapper::X;

pub(crate) const CROSS_MARK: &str = "❌";
