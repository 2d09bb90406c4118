//! The inference seam.
//!
//! The pipeline needs exactly one capability from a runtime: take the
//! preprocessed input tensor, hand back one raw score per class. Model
//! loading and graph optimization stay behind [`Network`] so deployments
//! can swap runtimes without touching preprocessing or ranking.

use std::path::Path;

use tensorflow::{Graph, SavedModelBundle, Session, SessionOptions, SessionRunArgs, Tensor};

use crate::error::Result;
use crate::preprocess::{CHANNELS, INPUT_DIM};

/// Name of the model's input tensor binding.
pub const INPUT_NAME: &str = "data";

/// Name of the model's output tensor binding.
pub const OUTPUT_NAME: &str = "resnetv17_dense0_fwd";

/// Capability interface to the neural-network runtime.
pub trait Network: Send + Sync {
    /// Run the network on a flat (C, H, W) input tensor, returning one raw
    /// score per class.
    fn infer(&self, input: &[f32]) -> Result<Vec<f32>>;
}

/// ResNet graph executed through the TensorFlow runtime.
pub struct SavedModelNetwork {
    graph: Graph,
    session: Session,
}

impl SavedModelNetwork {
    /// Load a saved model from `export_dir`.
    pub fn load(export_dir: &Path) -> Result<Self> {
        let mut graph = Graph::new();
        let session =
            SavedModelBundle::load(&SessionOptions::new(), &["serve"], &mut graph, export_dir)?
                .session;

        Ok(SavedModelNetwork { graph, session })
    }
}

impl Network for SavedModelNetwork {
    fn infer(&self, input: &[f32]) -> Result<Vec<f32>> {
        let dim = u64::from(INPUT_DIM);
        let tensor = Tensor::new(&[1, CHANNELS as u64, dim, dim]).with_values(input)?;

        let mut args = SessionRunArgs::new();
        args.add_feed(
            &self.graph.operation_by_name_required(INPUT_NAME)?,
            0,
            &tensor,
        );
        let fetch = args.request_fetch(&self.graph.operation_by_name_required(OUTPUT_NAME)?, 0);

        self.session.run(&mut args)?;

        let output: Tensor<f32> = args.fetch(fetch)?;
        Ok(output.to_vec())
    }
}
