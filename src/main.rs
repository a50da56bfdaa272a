use clap::Parser;
use parcel_availability::utils::{logger, validation::Validate};
use parcel_availability::{CliConfig, FieldEdit, HttpParcelService, Severity, SubmitWorkflow};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(2);
        }
    };

    let verbose = cli.verbose_with(&config);
    if cli.json_logs_with(&config) {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting parcel-availability");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(2);
    }

    let service = HttpParcelService::new(&config)?;
    let mut workflow = SubmitWorkflow::new(service.clone(), service);

    workflow.edit(FieldEdit::ParcelCode(cli.barcode.clone()));
    workflow.edit(FieldEdit::Phone(cli.phone.clone()));
    workflow.edit(FieldEdit::StartTime(cli.from.clone()));
    workflow.edit(FieldEdit::EndTime(cli.to.clone()));

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no request will be sent");
        return match workflow.check_locally() {
            Ok(request) => {
                println!(
                    "✅ Ready to submit {} / {} ({} → {})",
                    request.parcel_code(),
                    request.phone(),
                    request.start_time(),
                    request.end_time()
                );
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ {}", e.user_message());
                std::process::exit(1);
            }
        };
    }

    let Some(outcome) = workflow.submit().await else {
        anyhow::bail!("a submission is already in progress");
    };

    match outcome.severity {
        Severity::Success => {
            println!("✅ {}", outcome.message);
            Ok(())
        }
        Severity::Error => {
            if let Some(error) = &outcome.error {
                tracing::error!("❌ Submit failed: {}", error);
            }
            eprintln!("❌ {}", outcome.message);
            std::process::exit(1);
        }
    }
}
