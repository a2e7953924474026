use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use earthstack::{LabelVocabulary, RetryPolicy, S3Config, SplitMaterializer, StoreProvider};

#[derive(Parser, Debug)]
#[command(name = "preprocess", about = "Encode raw patches into an object store, split by split")]
struct Args {
    /// Root folder holding one directory per patch
    #[arg(long, default_value = "BigEarthNet-v1.0")]
    root: PathBuf,

    /// Folder with <split>.csv patch lists; <split>_s3.csv indexes land next to them
    #[arg(long, default_value = "splits")]
    splits_dir: PathBuf,

    /// Splits to materialize, in order
    #[arg(
        long = "split",
        default_values_t = ["train".to_string(), "val".to_string(), "test".to_string()]
    )]
    splits: Vec<String>,

    /// S3-compatible endpoint
    #[arg(long, default_value = "http://localhost:9000")]
    endpoint: String,

    /// Bucket receiving the encoded examples
    #[arg(long, default_value = "bigearthnet-processed")]
    bucket: String,

    /// Write attempts per patch before the run aborts
    #[arg(long, default_value_t = 3)]
    put_attempts: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();
    let args = Args::parse();

    let config = S3Config {
        endpoint: args.endpoint,
        bucket: args.bucket,
        ..S3Config::default()
    };
    let materializer = SplitMaterializer::new(config.connect()?, LabelVocabulary::corine())
        .with_retry(RetryPolicy {
            attempts: args.put_attempts,
            ..RetryPolicy::default()
        });

    let progress = ProgressBar::new(args.splits.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );
    for split in &args.splits {
        progress.set_message(split.clone());
        let list = args.splits_dir.join(format!("{split}.csv"));
        let index = args.splits_dir.join(format!("{split}_s3.csv"));
        let count = materializer.materialize(&args.root, split, &list, &index)?;
        info!("split {split}: {count} patches materialized");
        progress.inc(1);
    }
    progress.finish_with_message("done");
    Ok(())
}
