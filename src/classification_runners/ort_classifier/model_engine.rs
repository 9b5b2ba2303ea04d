use anyhow::Result;
use crate::data::{InputShape, X};

/// A loaded network with one image input and one score output.
///
/// Calls are not reentrant; the owner serializes them.
pub trait ModelEngine: Send {
    /// Declared input, fixed once the model is loaded.
    fn input_shape(&self) -> InputShape;

    /// Declared length of the score vector, when the model states it.
    fn output_len(&self) -> Option<usize> {
        None
    }

    /// Runs one `[1, h, w, c]` tensor through the model and returns its raw scores.
    /// Fails with [`crate::ClassifierError::InferenceUnavailable`] after [`ModelEngine::release`].
    fn run(&mut self, x: X) -> Result<X>;

    /// Frees the underlying model. Calling it again is a no-op.
    fn release(&mut self);

    fn is_released(&self) -> bool;
}
