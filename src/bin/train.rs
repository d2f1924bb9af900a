//! Command line tool to train a TF-IDF + logistic regression classifier

use std::path::PathBuf;

use anyhow::anyhow;
use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use pico_args::Arguments;
use text_clf::{config::Config, pipelines::text_classification};

const HELP: &str = "\
Usage: train [OPTIONS]

Options:
  -h, --help           Print help
  -c, --config         The path to the experiment config (defaults to 'config.yaml')
";

#[derive(Debug)]
struct Args {
    config: PathBuf,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            config: pargs
                .opt_value_from_str(["-c", "--config"])?
                .unwrap_or_else(|| PathBuf::from("config.yaml")),
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(anyhow!("Unexpected arguments: {:?}", remaining));
        }

        Ok(Some(args))
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let config = Config::load(&args.config)
        .map_err(|e| anyhow!("Unable to load config {}: {}", args.config.display(), e))?;

    let device = NdArrayDevice::default();
    let output = text_classification::run::<Autodiff<NdArray>>(&config, &device)?;

    log::info!(
        "Accuracy {:.4}, model written to {}",
        output.report.accuracy,
        output.artifact_path.display()
    );

    Ok(())
}
