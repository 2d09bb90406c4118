use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use lambda_runtime::{handler_fn, Context};
use log::debug;
use serde::Deserialize;

use resnet_serve::{Classification, ClassifyError, ImageClassifier, DEFAULT_TOP_N};

type Error = Box<dyn std::error::Error + Sync + Send + 'static>;

/// Invocation payload. One of `image_url` or `image_b64` must be set.
#[derive(Deserialize)]
struct Request {
    image_url: Option<String>,
    image_b64: Option<String>,
    top_n: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let export_dir =
        PathBuf::from(env::var("MODEL_DIR").unwrap_or_else(|_| "/mnt/models/resnet50".to_owned()));
    let labels_path = PathBuf::from(
        env::var("LABELS_PATH").unwrap_or_else(|_| "/mnt/models/resnet50/synset.txt".to_owned()),
    );

    let classifier = Arc::new(ImageClassifier::new(&export_dir, &labels_path)?);

    debug!("Loaded model in memory");

    let func = handler_fn(move |event: Request, ctx: Context| {
        let classifier = Arc::clone(&classifier);
        // The pipeline blocks on the image fetch, so keep it off the
        // runtime's reactor threads.
        async move { tokio::task::spawn_blocking(move || handle(event, ctx, &classifier)).await? }
    });

    lambda_runtime::run(func).await?;

    Ok(())
}

fn handle(
    event: Request,
    _ctx: Context,
    classifier: &ImageClassifier,
) -> Result<Vec<Classification>, Error> {
    let n = event.top_n.unwrap_or(DEFAULT_TOP_N);

    let results = match (event.image_url, event.image_b64) {
        (_, Some(b64)) => {
            let raw = base64::decode(&b64)
                .map_err(|e| ClassifyError::InvalidArgument(format!("bad image_b64: {}", e)))?;
            classifier.classify_from_raw(&raw, n)?
        }
        (Some(url), None) => classifier.classify_from_url(&url, n)?,
        (None, None) => {
            return Err(ClassifyError::InvalidArgument(
                "event carries neither image_url nor image_b64".to_owned(),
            )
            .into())
        }
    };

    Ok(results)
}
