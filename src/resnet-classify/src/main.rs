use std::error::Error;
use std::path::PathBuf;
use structopt::StructOpt;

use log::debug;
use resnet_serve::ImageClassifier;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "resnet-classify",
    about = "CLI app to classify an image fetched from a URL"
)]
struct CmdArgs {
    #[structopt(help = "Export directory of the saved ResNet model")]
    export_dir: String,

    #[structopt(help = "Path to the class labels file")]
    labels_path: String,

    #[structopt(help = "URL to fetch image from")]
    image_url: String,

    #[structopt(
        short = "n",
        long = "top-n",
        default_value = "5",
        help = "How many classes to report"
    )]
    top_n: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = CmdArgs::from_args();

    let export_dir = PathBuf::from(args.export_dir);
    let labels_path = PathBuf::from(args.labels_path);

    let classifier = ImageClassifier::new(&export_dir, &labels_path)?;
    debug!("Classifier ready, {} classes", classifier.labels().len());

    let results = classifier.classify_from_url(&args.image_url, args.top_n)?;

    println!("{}", serde_json::to_string(&results)?);

    Ok(())
}
