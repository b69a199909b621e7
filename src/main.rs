use std::process::ExitCode;

use prover_power_calculator::app;
use prover_power_calculator::cli::{Cli, MISSING_INPUTS_MESSAGE};
use prover_power_calculator::config::Settings;
use prover_power_calculator::logging;
use tracing::error;

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let cli = Cli::parse_normalized();
    logging::init_logger(&cli.log_level, cli.log_file.as_deref());

    let Some(inputs) = cli.required_inputs() else {
        println!("{}", MISSING_INPUTS_MESSAGE);
        println!("{}", Cli::usage());
        return ExitCode::SUCCESS;
    };

    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(out) = &cli.output {
        settings.output_path = out.display().to_string();
    }

    // Save failures are logged inside `run` and do not change the exit status.
    match app::run(&settings, inputs) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
