use clap::Parser;
use placement_matcher::utils::error::{ErrorSeverity, MatchError};
use placement_matcher::utils::{logger, validation::Validate};
use placement_matcher::{CliConfig, LocalStorage, MatchRunner, MatchSettings, RosterPipeline};

fn exit_with(e: &MatchError) -> ! {
    tracing::error!(
        "❌ Placement matching failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn load_settings(config: &CliConfig) -> Result<MatchSettings, MatchError> {
    let settings = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading matching settings from: {}", path);
            MatchSettings::from_file(path)?
        }
        None => MatchSettings::default(),
    };
    settings.validate()?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting placement-matcher CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let settings = match load_settings(&config) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    let source = LocalStorage::current_dir();
    let sink = LocalStorage::new(config.output_path.clone());
    let dry_run = config.dry_run;
    let pipeline = match RosterPipeline::new(source, sink, config, settings) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(&e),
    };

    let runner = MatchRunner::new(pipeline);
    let outcome = if dry_run {
        runner.dry_run().await
    } else {
        runner.run().await
    };

    match outcome {
        Ok(result) => {
            if let Some(output_path) = &result.output_path {
                println!("Assignments written to {}", output_path);
            }
            for line in &result.summary_lines {
                println!("{}", line);
            }
            if result.rejected_rows > 0 {
                println!(
                    "{} roster rows were skipped (see log for details)",
                    result.rejected_rows
                );
            }
            tracing::info!(
                "✅ Done: {} assigned, {} need manual review",
                result.assigned,
                result.unassigned
            );
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
