//! Disease classifier adapter
//!
//! Wraps a pre-trained leaf-classification model exported to ONNX. The
//! model is loaded once at startup; each call decodes the image, runs
//! inference, and returns the label of the highest-probability class.
//! No thresholding, no multi-label support, no confidence reported to the
//! caller.

use image::imageops::FilterType;
use std::path::Path;
use thiserror::Error;
use tract_onnx::prelude::*;

/// Model input edge length (classification export, square input)
const INPUT_SIZE: u32 = 224;

/// Classifier errors
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Model file missing or not loadable as ONNX
    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    /// Image file not found at path
    #[error("Image file not found: {0}")]
    FileNotFound(String),

    /// Uploaded payload could not be decoded as an image
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// Inference failed inside the model runtime
    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Seam between the entry points and the model runtime.
///
/// The HTTP handler and the console flow only need "image path in, label
/// out"; tests substitute a stub implementation here.
pub trait DiseaseClassifier: Send + Sync {
    /// Predict the disease label for the image at `image_path`
    fn classify(&self, image_path: &Path) -> Result<String, ClassifierError>;
}

type OnnxModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX-backed classifier
pub struct OnnxClassifier {
    model: OnnxModel,
    labels: Vec<String>,
}

impl OnnxClassifier {
    /// Load the exported classification model and bind the class labels.
    ///
    /// `labels` must be in the model's class-index order.
    pub fn load(model_path: &Path, labels: Vec<String>) -> Result<Self, ClassifierError> {
        if labels.is_empty() {
            return Err(ClassifierError::ModelLoad(
                "Class label list is empty".to_string(),
            ));
        }

        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .map_err(|e| ClassifierError::ModelLoad(e.to_string()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize),
                ),
            )
            .map_err(|e| ClassifierError::ModelLoad(e.to_string()))?
            .into_optimized()
            .map_err(|e| ClassifierError::ModelLoad(e.to_string()))?
            .into_runnable()
            .map_err(|e| ClassifierError::ModelLoad(e.to_string()))?;

        tracing::info!(
            model = %model_path.display(),
            classes = labels.len(),
            "Loaded classification model"
        );

        Ok(Self { model, labels })
    }
}

impl DiseaseClassifier for OnnxClassifier {
    fn classify(&self, image_path: &Path) -> Result<String, ClassifierError> {
        if !image_path.exists() {
            return Err(ClassifierError::FileNotFound(
                image_path.display().to_string(),
            ));
        }

        let img = image::open(image_path)
            .map_err(|e| ClassifierError::ImageDecode(e.to_string()))?;

        let tensor = image_to_tensor(&img);

        let result = self
            .model
            .run(tvec!(tensor.into()))
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let output = result[0]
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;
        let probs = output
            .as_slice()
            .ok_or_else(|| ClassifierError::Inference("Non-contiguous output".to_string()))?;

        let best = argmax(probs)
            .ok_or_else(|| ClassifierError::Inference("Empty output vector".to_string()))?;

        let label = self.labels.get(best).ok_or_else(|| {
            ClassifierError::Inference(format!(
                "Class index {} outside label list (len {})",
                best,
                self.labels.len()
            ))
        })?;

        tracing::debug!(image = %image_path.display(), label = %label, "Predicted disease");

        Ok(label.clone())
    }
}

/// Decode + preprocess: resize to the model input size, RGB, scale 0..1,
/// NCHW layout (matches the classification export's preprocessing).
fn image_to_tensor(img: &image::DynamicImage) -> Tensor {
    let resized = img.resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let n = INPUT_SIZE as usize;
    let mut data = vec![0.0f32; 3 * n * n];
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for c in 0..3 {
            data[c * n * n + y * n + x] = pixel.0[c] as f32 / 255.0;
        }
    }

    tract_ndarray::Array4::from_shape_vec((1, 3, n, n), data)
        .expect("shape matches buffer length")
        .into_tensor()
}

/// Index of the maximum probability, None for an empty vector
fn argmax(probs: &[f32]) -> Option<usize> {
    probs
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}
