//! URL-driven image classification on top of an external inference runtime.
//!
//! The pipeline is strictly linear: fetch bytes, decode, preprocess into a
//! channel-major float tensor, run the network, softmax the scores and rank
//! the top-N labels. Every invocation is independent; the classifier holds
//! no mutable state.

mod error;
mod labels;
mod network;
mod preprocess;
mod rank;
mod timer;

pub use crate::error::{ClassifyError, Result};
pub use crate::labels::load_labels;
pub use crate::network::{Network, SavedModelNetwork, INPUT_NAME, OUTPUT_NAME};
pub use crate::preprocess::{image_to_tensor, INPUT_DIM, RESIZE_DIM, TENSOR_LEN};
pub use crate::rank::{softmax, top_classes, Classification};
pub use crate::timer::Timer;

use std::path::Path;

use image::DynamicImage;
use log::debug;

/// Number of classes reported when the caller does not ask for a specific N.
pub const DEFAULT_TOP_N: usize = 5;

/// Classifies images fetched from URLs or passed in as raw bytes.
pub struct ImageClassifier {
    network: Box<dyn Network>,
    labels: Vec<String>,
}

impl ImageClassifier {
    /// Load the network from a saved model directory and the class labels
    /// from a text file, once, at construction.
    pub fn new(export_dir: &Path, labels_path: &Path) -> Result<Self> {
        let mut t = Timer::new_start("Loading network");
        let network = SavedModelNetwork::load(export_dir)?;
        t.stop();

        let labels = load_labels(labels_path)?;
        debug!("Loaded {} class labels", labels.len());

        Ok(ImageClassifier {
            network: Box::new(network),
            labels,
        })
    }

    /// Build a classifier around any inference backend.
    pub fn with_network(network: Box<dyn Network>, labels: Vec<String>) -> Self {
        ImageClassifier { network, labels }
    }

    /// The class labels, index-aligned with the network's scores.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Classify a decoded image, returning the `n` most probable classes.
    pub fn classify(&self, image: &DynamicImage, n: usize) -> Result<Vec<Classification>> {
        let mut t = Timer::new_start("Preprocessing image");
        let input = image_to_tensor(image);
        t.stop();

        let mut t = Timer::new_start("Running network");
        let scores = self.network.infer(&input)?;
        t.stop();

        let probs = softmax(&scores);
        top_classes(n, &probs, &self.labels)
    }

    /// Decode an in-memory image and classify it.
    pub fn classify_from_raw(&self, data: &[u8], n: usize) -> Result<Vec<Classification>> {
        let mut t = Timer::new_start("Loading image from memory");
        let image = image::load_from_memory(data)?;
        t.stop();

        self.classify(&image, n)
    }

    /// Fetch an image over HTTP and classify it.
    pub fn classify_from_url(&self, url: &str, n: usize) -> Result<Vec<Classification>> {
        let mut t = Timer::new_start(&format!("Fetching image from {}", url));
        let body = reqwest::blocking::get(url)?.error_for_status()?.bytes()?;
        t.stop();

        self.classify_from_raw(&body, n)
    }
}
