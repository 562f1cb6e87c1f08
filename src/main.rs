//! pdf-convert - command line entry point
//!
//! Thin shell over the conversion engine: one operation, its inputs, and an
//! output path per invocation.

use clap::Parser;
use pdf_convert::{ConversionJob, Dispatcher, Operation};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pdf-convert", version, about = "Document conversion engine")]
struct Args {
    /// Conversion to run (e.g. merge, compress, pdf-to-images, word-to-pdf)
    operation: Operation,

    /// Ordered input files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (or folder, for pdf-to-images)
    #[arg(short, long)]
    output: PathBuf,

    /// Rendering resolution for raster pipelines
    #[arg(long)]
    dpi: Option<u32>,

    /// Print the result as JSON instead of a plain message
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_convert=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut job = ConversionJob::new(args.operation, args.inputs, args.output);
    if let Some(dpi) = args.dpi {
        job = job.with_dpi(dpi);
    }

    let result = Dispatcher::new().dispatch(job).await;

    if args.json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}", result.message);
    }

    if result.ok {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
