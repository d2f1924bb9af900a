//! Command line tool to recompute the precision-recall or ROC curve of a saved model

use std::{io, path::PathBuf};

use anyhow::anyhow;
use burn::backend::{ndarray::NdArrayDevice, NdArray};
use pico_args::Arguments;
use text_clf::diagnostics::{self, PrecisionRecallDisplay, RocCurveDisplay};

const HELP: &str = "\
Usage: curves MODEL_DIR [OPTIONS]

Arguments:
  MODEL_DIR            The saved model directory (model.json, target_names.json, one *.yaml)

Options:
  -h, --help           Print help
  --roc                Compute the ROC curve instead of the precision-recall curve
  --csv                Print the curve coordinates and thresholds as CSV instead of a chart
";

#[derive(Debug)]
struct Args {
    model_dir: PathBuf,
    roc: bool,
    csv: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            roc: pargs.contains("--roc"),
            csv: pargs.contains("--csv"),
            model_dir: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => anyhow!("Missing required argument: MODEL_DIR"),
                _ => anyhow!("{}", e),
            })?,
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

    let device = NdArrayDevice::default();

    if args.roc {
        let roc = diagnostics::get_roc_curve::<NdArray>(&args.model_dir, &device)?;
        let display = RocCurveDisplay::from(&roc);

        if args.csv {
            display.write_csv(io::stdout().lock())?;
        } else {
            print!("{display}");
        }
    } else {
        let pr = diagnostics::get_precision_recall_curve::<NdArray>(&args.model_dir, &device)?;
        let display = PrecisionRecallDisplay::from(&pr);

        if args.csv {
            display.write_csv(io::stdout().lock())?;
        } else {
            print!("{display}");
        }
    }

    Ok(())
}
