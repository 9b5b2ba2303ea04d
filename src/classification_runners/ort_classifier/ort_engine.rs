use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;
use anyhow::{Context, Result};
use half::{bf16, f16};
use ndarray::{Array, IxDyn};
use ort::{
    execution_providers::{CPUExecutionProvider, ExecutionProvider},
    session::builder::{GraphOptimizationLevel, SessionBuilder},
    session::{Session, SessionInputValue},
    tensor::TensorElementType,
    value::{DynValue, Tensor, ValueType},
};
use crate::classification_runners::ort_classifier::ModelEngine;
use crate::data::{ConfigOrt, InputShape, X, CROSS_MARK};
use crate::error::ClassifierError;
use crate::utils::human_bytes;

/// Set once an ORT environment has been committed. Failed attempts are not recorded.
static ORT_ENV: OnceLock<()> = OnceLock::new();

/// ONNX Runtime tensor attributes: names, data types and declared dimensions.
#[derive(Debug, Clone, Default)]
pub struct OrtTensorAttr {
    pub names: Vec<String>,
    pub dtypes: Vec<TensorElementType>,
    /// `-1` marks a dynamic axis.
    pub dimss: Vec<Vec<i64>>,
}

impl OrtTensorAttr {
    fn from_value_types<'a>(values: impl Iterator<Item = (&'a str, &'a ValueType)>) -> Self {
        let mut attrs = Self::default();
        for (name, value_type) in values {
            let (dtype, dims) = match value_type {
                ValueType::Tensor { ty, dimensions, .. } => (*ty, dimensions.clone()),
                other => {
                    log::warn!("Skipping non-tensor model value `{}`: {:?}", name, other);
                    continue;
                }
            };
            attrs.names.push(name.to_string());
            attrs.dtypes.push(dtype);
            attrs.dimss.push(dims);
        }
        attrs
    }
}

/// ONNXRuntime backend holding one CPU session.
#[derive(Debug)]
pub struct OrtEngine {
    session: Option<Session>,
    inputs_attrs: OrtTensorAttr,
    outputs_attrs: OrtTensorAttr,
    input_shape: InputShape,
}

impl OrtEngine {
    /// Builds a CPU-only session from serialized model bytes.
    ///
    /// A missing or unloadable onnxruntime library is reported as an error, never as a panic.
    pub fn from_memory(config: &ConfigOrt, model: &[u8]) -> Result<Self> {
        if model.is_empty() {
            anyhow::bail!("{CROSS_MARK} Model is empty");
        }

        // with `load-dynamic`, ort panics when the shared library cannot be opened
        let session = catch_unwind(AssertUnwindSafe(|| Self::build_session(config, model)))
            .unwrap_or_else(|panic| {
                Err(anyhow::anyhow!("{CROSS_MARK} onnxruntime panicked: {}", panic_message(panic.as_ref())))
            })?;

        let inputs_attrs = OrtTensorAttr::from_value_types(
            session.inputs.iter().map(|x| (x.name.as_str(), &x.input_type)),
        );
        let outputs_attrs = OrtTensorAttr::from_value_types(
            session.outputs.iter().map(|x| (x.name.as_str(), &x.output_type)),
        );
        if inputs_attrs.names.is_empty() || outputs_attrs.names.is_empty() {
            anyhow::bail!(
                "{CROSS_MARK} Model needs one tensor input and one tensor output, found {} and {}",
                inputs_attrs.names.len(),
                outputs_attrs.names.len()
            );
        }
        if inputs_attrs.names.len() > 1 || outputs_attrs.names.len() > 1 {
            log::warn!(
                "Model has {} inputs and {} outputs; only the first of each is used",
                inputs_attrs.names.len(),
                outputs_attrs.names.len()
            );
        }

        let input_shape = InputShape::from_dims(&inputs_attrs.dimss[0], config.default_shape);

        log::info!(
            "Backend: ONNXRuntime | Device: CPU | Threads: {} | Input: {} {:?} | Output: {:?} | Model size: {}",
            config.intra_threads,
            input_shape,
            inputs_attrs.dtypes[0],
            outputs_attrs.dimss[0],
            human_bytes(model.len() as f64),
        );

        Ok(Self {
            session: Some(session),
            inputs_attrs,
            outputs_attrs,
            input_shape,
        })
    }

    fn build_session(config: &ConfigOrt, model: &[u8]) -> Result<Session> {
        Self::init_runtime(&config.ort_lib_path)?;

        let mut builder = Session::builder()?;
        if config.intra_threads > 0 {
            builder = builder.with_intra_threads(config.intra_threads)?;
        }
        Self::build_cpu(&mut builder)?;

        builder
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_memory(model)
            .context("Failed to parse model")
    }

    /// Commits the process-wide ORT environment. A failed commit is retried on the next load.
    ///
    /// onnxruntime binds the first library path the process tries; a later `ort_lib_path`
    /// does not replace a library that was already opened or that failed to open.
    fn init_runtime(ort_lib_path: &str) -> Result<()> {
        if ORT_ENV.get().is_some() {
            return Ok(());
        }

        let ort_init = if ort_lib_path.is_empty() {
            ort::init()
        } else {
            ort::init_from(ort_lib_path)
        };

        match ort_init.with_name("bvr_classify").commit() {
            Ok(_) => {
                let _ = ORT_ENV.set(());
                Ok(())
            }
            Err(e) => anyhow::bail!("{CROSS_MARK} Failed to commit ORT: {:?}", e),
        }
    }

    // CPU only.
    fn build_cpu(builder: &mut SessionBuilder) -> Result<()> {
        let ep = CPUExecutionProvider::default();
        if ep.is_available()? {
            match ep.register(builder) {
                Ok(_) => { }
                Err(err) => { anyhow::bail!("{CROSS_MARK} CPU initialization failed: {:?}", err) }
            }
            Ok(())
        } else {
            anyhow::bail!("{CROSS_MARK} CPU execution provider not available")
        }
    }

    fn tensor_preprocess(x: &X, dtype: &TensorElementType) -> Result<DynValue> {
        let x = match dtype {
            TensorElementType::Float32 => Tensor::from_array(x.0.clone())?.into_dyn(),
            TensorElementType::Float16 => Tensor::from_array(x.mapv(f16::from_f32))?.into_dyn(),
            TensorElementType::Bfloat16 => Tensor::from_array(x.mapv(bf16::from_f32))?.into_dyn(),
            TensorElementType::Float64 => Tensor::from_array(x.mapv(|x_| x_ as f64))?.into_dyn(),
            TensorElementType::Uint8 => Tensor::from_array(x.mapv(quantize))?.into_dyn(),
            _ => anyhow::bail!("Unsupported model input type: {:?}", dtype),
        };
        Ok(x)
    }

    fn tensor_postprocess(x: &DynValue, dtype: &TensorElementType) -> Result<Array<f32, IxDyn>> {
        fn _extract_and_convert<T>(x: &DynValue, map_fn: impl Fn(T) -> f32) -> Result<Array<f32, IxDyn>>
        where
            T: Clone + 'static + ort::tensor::PrimitiveTensorElementType,
        {
            let view = x.try_extract_tensor::<T>()?;
            Ok(view.mapv(map_fn))
        }
        let x = match dtype {
            TensorElementType::Float32 => _extract_and_convert::<f32>(x, |x| x)?,
            TensorElementType::Float16 => _extract_and_convert::<f16>(x, f16::to_f32)?,
            TensorElementType::Bfloat16 => _extract_and_convert::<bf16>(x, bf16::to_f32)?,
            TensorElementType::Float64 => _extract_and_convert::<f64>(x, |x| x as f32)?,
            TensorElementType::Uint8 => _extract_and_convert::<u8>(x, dequantize)?,
            _ => anyhow::bail!("Unsupported model output type: {:?}", dtype),
        };

        Ok(x)
    }
}

impl ModelEngine for OrtEngine {
    fn input_shape(&self) -> InputShape {
        self.input_shape
    }

    fn output_len(&self) -> Option<usize> {
        declared_len(self.outputs_attrs.dimss.first()?)
    }

    fn run(&mut self, x: X) -> Result<X> {
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return Err(ClassifierError::InferenceUnavailable.into()),
        };

        let in_dtype = self.inputs_attrs.dtypes[0];
        let xs_ = vec![Into::<SessionInputValue<'_>>::into(Self::tensor_preprocess(&x, &in_dtype)?)];

        let outputs = session.run(&xs_[..])?;

        let out_name = self.outputs_attrs.names[0].as_str();
        let y = Self::tensor_postprocess(&outputs[out_name], &self.outputs_attrs.dtypes[0])
            .with_context(|| format!("Failed to read model output `{}`", out_name))?;

        Ok(X::from(y))
    }

    fn release(&mut self) {
        if self.session.take().is_some() {
            log::debug!("ORT session released");
        }
    }

    fn is_released(&self) -> bool {
        self.session.is_none()
    }
}

/// Quantized inputs take raw pixel values.
fn quantize(v: f32) -> u8 {
    (v * 255.).round().clamp(0., 255.) as u8
}

/// Quantized scores: 255 == certain.
fn dequantize(v: u8) -> f32 {
    v as f32 / 255.
}

/// Score count from the last declared output axis, if it is static.
fn declared_len(dims: &[i64]) -> Option<usize> {
    match dims.last() {
        Some(&n) if n > 0 => Some(n as usize),
        _ => None,
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
