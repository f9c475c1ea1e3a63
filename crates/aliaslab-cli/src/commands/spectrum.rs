//! Spectral peak listing command.

use super::common::{ToneArgs, bin_centered_tone};
use aliaslab_analysis::Spectrum;
use aliaslab_core::AntialiasOrder;
use clap::Args;

#[derive(Args)]
pub struct SpectrumArgs {
    #[command(flatten)]
    tone: ToneArgs,

    /// Antialiasing order applied before the FFT (0 = naive tanh)
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=3))]
    order: u32,

    /// Number of peaks to list
    #[arg(long, default_value = "10")]
    peaks: usize,
}

pub fn run(args: SpectrumArgs) -> anyhow::Result<()> {
    let (tone, bin) = bin_centered_tone(&args.tone)?;
    let order = AntialiasOrder::try_from(args.order)?;
    let y = order.apply(&tone.matrix()?)?;

    let spectrum = Spectrum::of(&y, 1.0);
    let n = tone.samples() as f64;

    println!("Spectrum of {order} tanh, fundamental at bin {bin}");
    println!();
    println!("{:>4} {:>10} {:>10}  Kind", "Peak", "Frequency", "Level");
    for (i, (freq, db)) in spectrum.peaks(args.peaks).into_iter().enumerate() {
        let k = (freq * n).round() as usize;
        let kind = if k % bin == 0 {
            format!("harmonic {}", k / bin)
        } else {
            "alias".to_string()
        };
        println!("{:>4} {freq:>10.6} {db:>7.2} dB  {kind}", i + 1);
    }
    Ok(())
}
