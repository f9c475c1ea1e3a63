//! Antialiasing comparison command.

use super::common::{ToneArgs, bin_centered_tone, format_db};
use aliaslab_analysis::{AliasingReport, Spectrum, oversampled};
use aliaslab_core::{AntialiasOrder, TapMatrix, has_degenerate_output};
use clap::Args;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct AdaaArgs {
    #[command(flatten)]
    tone: ToneArgs,

    /// Antialiasing order to compare against naive tanh (0-3); all when omitted
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=3))]
    order: Option<u32>,

    /// Run every method at this multiple of the sample rate
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=64))]
    oversample: u32,

    /// Write the output spectra (dB per method) to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

pub fn run(args: AdaaArgs) -> anyhow::Result<()> {
    let (tone, bin) = bin_centered_tone(&args.tone)?;
    let x = tone.matrix()?;

    let orders: Vec<AntialiasOrder> = match args.order {
        None => AntialiasOrder::ALL.to_vec(),
        Some(0) => vec![AntialiasOrder::None],
        Some(n) => vec![AntialiasOrder::None, AntialiasOrder::try_from(n)?],
    };

    println!(
        "Tone: bin {bin} of {} (f = {:.6}), magnitude {}",
        tone.samples(),
        tone.freq(),
        args.tone.mag
    );
    if args.oversample > 1 {
        println!("Oversampling: {}x", args.oversample);
    }
    println!();
    println!("{:<8} {:>12}", "Method", "Aliasing");

    let mut outputs = Vec::with_capacity(orders.len());
    for order in orders {
        let y = process(order, &x, args.oversample as usize)?;
        if has_degenerate_output(&y) {
            tracing::warn!(%order, "output contains NaN or Inf; repeated tap values?");
        }
        let report = AliasingReport::measure(&y, bin)?;
        tracing::debug!(
            %order,
            harmonic = report.harmonic_power,
            alias = report.alias_power,
            "aliasing measured"
        );
        println!("{:<8} {:>12}", order.to_string(), format_db(report.ratio_db()));
        outputs.push((order, y));
    }

    if let Some(path) = &args.csv {
        write_csv(path, &outputs)?;
        println!();
        println!("Spectra written to {}", path.display());
    }
    Ok(())
}

fn process(order: AntialiasOrder, x: &TapMatrix, factor: usize) -> anyhow::Result<Vec<f64>> {
    let transform = oversampled(factor, move |m: &TapMatrix| order.apply(m));
    Ok(transform(x)?)
}

fn write_csv(path: &Path, outputs: &[(AntialiasOrder, Vec<f64>)]) -> anyhow::Result<()> {
    let spectra: Vec<(Vec<f64>, Vec<f64>)> = outputs
        .iter()
        .map(|(_, y)| {
            let s = Spectrum::of(y, 1.0);
            (s.freqs().to_vec(), s.magnitude_db())
        })
        .collect();

    let mut csv = String::from("frequency");
    for (order, _) in outputs {
        write!(csv, ",{order}")?;
    }
    csv.push('\n');

    let Some((freqs, _)) = spectra.first() else {
        anyhow::bail!("no spectra to write");
    };
    for (k, f) in freqs.iter().enumerate() {
        write!(csv, "{f:.6}")?;
        for (_, db) in &spectra {
            write!(csv, ",{:.2}", db[k])?;
        }
        csv.push('\n');
    }

    std::fs::write(path, csv)?;
    Ok(())
}
