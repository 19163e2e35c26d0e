//! Blocking ONNX inference for sentence embeddings.
//!
//! Mean pooling over the attention mask followed by L2 normalization, the
//! recipe used by sentence-transformers models such as all-MiniLM-L6-v2.

use std::path::Path;

use hf_hub::api::sync::ApiBuilder;
use ort::inputs;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::errors::Error;

/// Longest token sequence fed to the model; longer input is truncated.
const MAX_SEQUENCE_LENGTH: usize = 512;

/// Loaded ONNX session plus tokenizer for one model.
///
/// All methods block; async callers run them on `spawn_blocking`.
pub struct EmbeddingEngine {
    session: Session,
    tokenizer: Tokenizer,
    dimensions: usize,
    requires_token_type_ids: bool,
}

impl EmbeddingEngine {
    /// Load model and tokenizer from the HF cache, downloading them on first use.
    ///
    /// `cache_dir` overrides the default HuggingFace cache location.
    pub fn new(model_id: &str, dimensions: usize, cache_dir: Option<&Path>) -> Result<Self, Error> {
        if dimensions == 0 {
            return Err(Error::Config("Embedding dimensions must be positive".into()));
        }

        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(dir) = cache_dir {
            builder = builder.with_cache_dir(dir.to_path_buf());
        }
        let api = builder.build()?;
        let repo = api.model(model_id.to_string());

        let model_path = repo
            .get("onnx/model.onnx")
            .or_else(|_| repo.get("model.onnx"))?;
        let tokenizer_path = repo.get("tokenizer.json")?;
        debug!(model = %model_id, path = %model_path.display(), "resolved model file");

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)?;
        tokenizer
            .with_padding(None)
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level1)
            .map_err(ort::Error::from)?
            .commit_from_file(&model_path)?;

        let requires_token_type_ids = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        info!(model = %model_id, dimensions, "embedding model loaded");

        Ok(EmbeddingEngine {
            session,
            tokenizer,
            dimensions,
            requires_token_type_ids,
        })
    }

    /// Configured output length.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed a single text.
    ///
    /// Every input, the empty string included, runs through the model; special
    /// tokens keep the sequence non-empty.
    pub fn embed(&mut self, text: &str) -> Result<Vec<f32>, Error> {
        let encoding = self.tokenizer.encode(text, true)?;
        let input_ids = encoding.get_ids();
        let attention_mask = encoding.get_attention_mask();

        let seq_len = input_ids.len();

        let input_ids_vec: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
        let attention_mask_vec: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();

        let input_ids_tensor = Tensor::from_array(([1usize, seq_len], input_ids_vec))?;
        let attention_mask_tensor = Tensor::from_array(([1usize, seq_len], attention_mask_vec))?;

        let outputs = if self.requires_token_type_ids {
            let token_type_ids_tensor = Tensor::from_array(([1usize, seq_len], vec![0i64; seq_len]))?;
            self.session.run(inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            ])?
        } else {
            self.session.run(inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor
            ])?
        };

        let (shape, data) = outputs
            .get("last_hidden_state")
            .or_else(|| outputs.get("token_embeddings"))
            .ok_or_else(|| {
                Error::Inference(
                    "Output tensor 'last_hidden_state' or 'token_embeddings' not found".to_string(),
                )
            })?
            .try_extract_tensor::<f32>()?;

        if shape.len() != 3 {
            return Err(Error::Inference(format!(
                "Expected 3D output (batch, seq_len, hidden), got {:?}",
                shape
            )));
        }

        let batch_size = shape[0] as usize;
        let hidden_dim = shape[2] as usize;
        if batch_size != 1 || hidden_dim != self.dimensions {
            return Err(Error::Inference(format!(
                "Unexpected output shape: {:?}, batch=1, hidden={} expected",
                shape, self.dimensions
            )));
        }

        Ok(mean_pool(data, attention_mask, hidden_dim, seq_len))
    }
}

/// Attention-masked mean over token vectors, then L2-normalized.
fn mean_pool(data: &[f32], attention_mask: &[u32], hidden_dim: usize, seq_len: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; hidden_dim];

    for (token_idx, chunk) in data.chunks(hidden_dim).take(seq_len).enumerate() {
        let mask_value = attention_mask.get(token_idx).copied().unwrap_or(0) as f32;
        for (pooled_value, value) in pooled.iter_mut().zip(chunk) {
            *pooled_value += value * mask_value;
        }
    }

    let mask_sum: f32 = attention_mask
        .iter()
        .take(seq_len)
        .map(|&m| m as f32)
        .sum::<f32>()
        .max(1e-9);

    for value in pooled.iter_mut() {
        *value /= mask_sum;
    }

    l2_normalize(&pooled)
}

fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    let norm = norm.max(1e-9);

    vec.iter().map(|&x| x / norm).collect()
}
