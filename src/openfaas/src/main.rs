use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::{body, Body, Request, Response, Server};
use std::convert::Infallible;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use log::error;
use resnet_serve::{ImageClassifier, DEFAULT_TOP_N};

async fn handle(
    req: Request<Body>,
    classifier: Arc<ImageClassifier>,
) -> Result<Response<Body>, Infallible> {
    let raw = match body::to_bytes(req.into_body()).await {
        Ok(raw) => raw,
        Err(err) => {
            let resp = Response::builder()
                .status(400)
                .body(Body::from(format!("Could not read request body: '{}'", err)))
                .unwrap();
            return Ok(resp);
        }
    };

    // The classifier is CPU-bound; keep it off the reactor threads.
    let result =
        tokio::task::spawn_blocking(move || classifier.classify_from_raw(&raw, DEFAULT_TOP_N))
            .await;

    let response = match result {
        Ok(Ok(results)) => Response::builder()
            .status(200)
            .body(Body::from(serde_json::to_string(&results).unwrap())),
        Ok(Err(err)) => Response::builder()
            .status(400)
            .body(Body::from(format!("Classification failure: '{}'", err))),
        Err(err) => {
            error!("classification task panicked: {}", err);
            Response::builder().status(500).body(Body::empty())
        }
    };

    Ok(response.unwrap())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let export_dir =
        PathBuf::from(env::var("MODEL_DIR").unwrap_or_else(|_| "/opt/resnet50".to_owned()));
    let labels_path = PathBuf::from(
        env::var("LABELS_PATH").unwrap_or_else(|_| "/opt/resnet50/synset.txt".to_owned()),
    );

    let classifier = Arc::new(
        ImageClassifier::new(&export_dir, &labels_path).expect("could not load classifier"),
    );

    // A `MakeService` that produces a `Service` to handle each connection.
    let make_service = make_service_fn(move |_conn: &AddrStream| {
        let class = Arc::clone(&classifier);

        let service = service_fn(move |req| handle(req, class.clone()));

        async move { Ok::<_, Infallible>(service) }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));

    let server = Server::bind(&addr).serve(make_service);

    if let Err(e) = server.await {
        eprintln!("server error: {}", e);
    }
}
