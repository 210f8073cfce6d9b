//! Pre-trained sequence-classification risk model on ONNX Runtime.
//!
//! The model directory must contain `model.onnx` and `tokenizer.json`. The
//! model's single output is a `[1, 3]` logit tensor in `[low, medium, high]`
//! order.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::{info, warn};

use clausewise_core::RiskLevel;

use crate::classifier::{ModelOpinion, RiskScorer};
use crate::seed_model::SeedModel;

const NUM_LABELS: usize = 3;

pub struct OnnxScorer {
    // `Session::run` needs `&mut`; scorers are shared across worker threads.
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    fallback: SeedModel,
}

impl OnnxScorer {
    pub fn load(model_dir: &Path, max_length: usize) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let session = Session::builder()?.commit_from_file(&model_path)?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;

        info!(max_length, model = %model_path.display(), "loaded risk model");
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            fallback: SeedModel::train(),
        })
    }

    /// Class probabilities in `[low, medium, high]` order.
    pub fn probabilities(&self, text: &str) -> anyhow::Result<[f32; NUM_LABELS]> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let to_i64 = |v: &[u32]| v.iter().map(|&x| x as i64).collect::<Vec<i64>>();
        let input_ids = to_i64(encoding.get_ids());
        let attention_mask = to_i64(encoding.get_attention_mask());
        let token_type_ids = to_i64(encoding.get_type_ids());

        let shape = [1i64, input_ids.len() as i64];
        let ids_tensor = Tensor::from_array((shape, input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.into_boxed_slice()))?;
        let type_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("risk model session poisoned"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
            "token_type_ids" => type_tensor,
        ])?;

        let (output_shape, logits) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 2 && dims[1] as usize == NUM_LABELS,
            "unexpected output shape: {dims:?}, expected [1, {NUM_LABELS}]"
        );

        Ok(softmax([logits[0], logits[1], logits[2]]))
    }
}

impl RiskScorer for OnnxScorer {
    fn name(&self) -> &'static str {
        "onnx"
    }

    fn score(&self, text: &str) -> ModelOpinion {
        match self.probabilities(text) {
            Ok(proba) => {
                let mut best = 0;
                for c in 1..NUM_LABELS {
                    if proba[c] > proba[best] {
                        best = c;
                    }
                }
                ModelOpinion {
                    level: RiskLevel::ALL[best],
                    confidence: proba[best],
                }
            }
            Err(e) => {
                warn!(error = %e, "risk model inference failed, using seed model");
                self.fallback.score(text)
            }
        }
    }
}

fn softmax(logits: [f32; NUM_LABELS]) -> [f32; NUM_LABELS] {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp = logits.map(|l| (l - max).exp());
    let sum: f32 = exp.iter().sum();
    exp.map(|e| e / sum)
}
