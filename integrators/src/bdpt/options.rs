//! BDPT Options

use clap::Args;
use transport_core::light_distrib::*;
use transport_core::pbrt::*;

/// Maximum depth allowed when strategy or weight visualization is enabled.
pub const MAX_VISUALIZATION_DEPTH: usize = 5;

/// Bidirectional path tracer parameters. These can be flattened into an
/// application's command line.
#[derive(Args, Clone, Debug, PartialEq)]
pub struct BDPTOptions {
    /// Maximum length of a light-carrying path.
    #[arg(long = "maxdepth", default_value_t = 5)]
    pub max_depth: usize,

    /// Accumulate the unweighted contribution of each strategy into its own film.
    #[arg(long = "visualizestrategies")]
    pub visualize_strategies: bool,

    /// Accumulate the MIS weighted contribution of each strategy into its own film.
    #[arg(long = "visualizeweights")]
    pub visualize_weights: bool,

    /// Strategy used to choose the light that starts a light subpath.
    #[arg(long = "lightsamplestrategy", value_enum, default_value_t = LightSampleStrategy::Power)]
    pub light_sample_strategy: LightSampleStrategy,

    /// Throughput below which subpaths are terminated by Russian roulette.
    #[arg(long = "rrthreshold", default_value_t = 1.0, allow_negative_numbers = true)]
    pub rr_threshold: Float,
}

impl Default for BDPTOptions {
    fn default() -> Self {
        Self {
            max_depth: 5,
            visualize_strategies: false,
            visualize_weights: false,
            light_sample_strategy: LightSampleStrategy::Power,
            rr_threshold: 1.0,
        }
    }
}

impl BDPTOptions {
    /// Returns a copy with out-of-range values corrected.
    pub fn validated(&self) -> Self {
        let mut options = self.clone();

        if (options.visualize_strategies || options.visualize_weights) && options.max_depth > MAX_VISUALIZATION_DEPTH
        {
            warn!(
                "visualizestrategies/visualizeweights was enabled, limiting maxdepth to {}",
                MAX_VISUALIZATION_DEPTH
            );
            options.max_depth = MAX_VISUALIZATION_DEPTH;
        }

        if options.rr_threshold < 0.0 {
            warn!("rrthreshold {} is negative, using 0", options.rr_threshold);
            options.rr_threshold = 0.0;
        }

        options
    }

    /// Returns true if any per-strategy film is requested.
    pub fn visualize(&self) -> bool {
        self.visualize_strategies || self.visualize_weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        bdpt: BDPTOptions,
    }

    fn parse(args: &[&str]) -> BDPTOptions {
        let argv = std::iter::once("render").chain(args.iter().copied());
        Cli::parse_from(argv).bdpt
    }

    #[test]
    fn defaults_match_hand_written_defaults() {
        assert_eq!(parse(&[]), BDPTOptions::default());
    }

    #[test]
    fn parses_long_names() {
        let options = parse(&[
            "--maxdepth",
            "9",
            "--visualizeweights",
            "--lightsamplestrategy",
            "uniform",
            "--rrthreshold",
            "0.25",
        ]);
        assert_eq!(options.max_depth, 9);
        assert!(options.visualize_weights);
        assert!(!options.visualize_strategies);
        assert_eq!(options.light_sample_strategy, LightSampleStrategy::Uniform);
        assert_eq!(options.rr_threshold, 0.25);
    }

    #[test]
    fn unknown_strategy_is_rejected_by_parser() {
        let argv = ["render", "--lightsamplestrategy", "spatial"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn visualization_limits_depth() {
        let options = parse(&["--maxdepth", "12", "--visualizestrategies"]).validated();
        assert_eq!(options.max_depth, MAX_VISUALIZATION_DEPTH);

        let options = parse(&["--maxdepth", "12"]).validated();
        assert_eq!(options.max_depth, 12);
    }

    #[test]
    fn negative_roulette_threshold_is_clamped() {
        let options = parse(&["--rrthreshold=-0.5"]);
        assert_eq!(options.rr_threshold, -0.5);
        assert_eq!(options.validated().rr_threshold, 0.0);
    }
}
