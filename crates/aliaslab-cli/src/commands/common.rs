//! Arguments and helpers shared by the tone-based commands.

use aliaslab_analysis::{DelayedSine, nearest_bin};
use clap::Args;

/// Taps needed by the highest antialiasing order.
pub const MAX_TAPS: usize = 4;

/// A bin-centered sine test tone.
#[derive(Args, Debug, Clone)]
pub struct ToneArgs {
    /// Tone frequency in cycles per sample (snapped to the nearest FFT bin)
    #[arg(long)]
    pub freq: f64,

    /// Tone amplitude before the nonlinearity
    #[arg(long)]
    pub mag: f64,

    /// Samples per period (odd lengths avoid repeated tap values)
    #[arg(long, default_value = "4095")]
    pub samples: usize,
}

/// The tone with enough history for every antialiasing order, and the bin
/// its fundamental occupies.
pub fn bin_centered_tone(args: &ToneArgs) -> anyhow::Result<(DelayedSine, usize)> {
    if args.samples < MAX_TAPS {
        anyhow::bail!("--samples must be at least {MAX_TAPS}, got {}", args.samples);
    }
    let bin = nearest_bin(args.freq, args.samples);
    let nyquist = args.samples / 2;
    if bin == 0 || bin > nyquist {
        anyhow::bail!(
            "--freq {} rounds to bin {bin}, outside 1..={nyquist} for {} samples",
            args.freq,
            args.samples
        );
    }

    let freq = bin as f64 / args.samples as f64;
    if (freq - args.freq.abs()).abs() > f64::EPSILON {
        tracing::info!(requested = args.freq, used = freq, bin, "frequency snapped to FFT bin");
    }

    let tone = DelayedSine::new(args.samples, freq, args.mag).with_history(MAX_TAPS - 1);
    Ok((tone, bin))
}

/// Format a ratio in dB with a fixed width.
pub fn format_db(db: f64) -> String {
    format!("{db:>9.2} dB")
}
