use ab_significance::cli::{Cli, OutputFormat};
use ab_significance::json_output::JsonOutput;
use ab_significance::request::compute_significance;
use ab_significance::sample_size::SampleSizeRecommendation;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Print a sample size recommendation instead of comparing variants
fn run_sample_size(baseline: f64, format: OutputFormat) -> Result<()> {
    let recommendation = SampleSizeRecommendation::for_baseline(baseline)?;

    match format {
        OutputFormat::Text => print!("{}", recommendation.to_report_string()),
        OutputFormat::Json => {
            let mut output = JsonOutput::new();
            output.set_sample_size(recommendation);
            println!("{}", output.to_json()?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    if let Some(baseline) = args.sample_size {
        return run_sample_size(baseline, args.format);
    }

    let request = args.to_request()?;
    tracing::debug!(?request, "parsed request");

    let result = compute_significance(&request)?;

    match args.format {
        OutputFormat::Text => print!("{}", result.to_report_string()),
        OutputFormat::Json => {
            let mut output = JsonOutput::new();
            output.set_result(request.result_kind, result);
            println!("{}", output.to_json()?);
        }
    }

    Ok(())
}
