//! LUT fitting command.

use aliaslab_config::ExperimentConfig;
use aliaslab_core::TapMatrix;
use aliaslab_lut::{LOSS_SAMPLE_INTERVAL, LutWithMemory, Trainer};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct TrainArgs {
    /// Experiment file (TOML); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of epochs
    #[arg(short, long)]
    epochs: Option<usize>,

    /// Write the sampled loss history to a JSON file
    #[arg(long)]
    loss_json: Option<PathBuf>,
}

/// Loss history export.
#[derive(Serialize)]
struct LossReport<'a> {
    epochs: usize,
    sample_interval: usize,
    loss_history: &'a [f64],
    max_eval_error: f64,
}

pub fn run(args: TrainArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            println!("Loading experiment {}", path.display());
            ExperimentConfig::load(path)?
        }
        None => ExperimentConfig::default(),
    };
    if let Some(epochs) = args.epochs {
        config = config.with_epochs(epochs);
    }
    config.validate()?;

    let lut_config = config.lut_config();
    let taps = lut_config.taps();
    let model = LutWithMemory::new(&lut_config)?;

    let xs = config.training_inputs();
    let ys: Vec<f64> = xs.iter().map(|v| v.tanh()).collect();
    let x = TapMatrix::repeat(&xs, taps)?;

    let epochs = config.trainer.num_epochs;
    println!(
        "Fitting {} x {} table(s) on {} samples for {epochs} epochs",
        taps,
        lut_config.bins_num,
        xs.len()
    );

    let mut trainer = Trainer::with_criterion(model, config.optimizer(), config.criterion());

    let pb = ProgressBar::new(epochs as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} loss {msg}")?
            .progress_chars("##-"),
    );
    trainer.train_with_progress(&x, &ys, epochs, |epoch, loss| {
        if epoch % LOSS_SAMPLE_INTERVAL == 0 {
            pb.set_message(format!("{loss:.3e}"));
        }
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    let x_eval = config.eval_inputs();
    let y_pred = trainer.predict(&TapMatrix::repeat(&x_eval, taps)?)?;
    let max_eval_error = x_eval
        .iter()
        .zip(&y_pred)
        .map(|(x, y)| (x.tanh() - y).abs())
        .fold(0.0f64, f64::max);

    let history = trainer.loss_history();
    let final_loss = history.last().copied().unwrap_or(f64::NAN);
    println!("Final loss:      {final_loss:.3e}");
    println!("Max eval error:  {max_eval_error:.3e} over {} points", x_eval.len());

    if let Some(path) = &args.loss_json {
        let report = LossReport {
            epochs,
            sample_interval: LOSS_SAMPLE_INTERVAL,
            loss_history: history,
            max_eval_error,
        };
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("Loss history written to {}", path.display());
    }
    Ok(())
}
