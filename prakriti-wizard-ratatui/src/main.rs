use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use prakriti::wire::EXPORT_FILENAME;
use prakriti_wizard_ratatui::{HttpGateway, RatatuiWizard};

#[derive(Debug, Parser)]
#[command(name = "prakriti-wizard", version, about = "Take the prakriti questionnaire in the terminal")]
struct Cli {
    /// Base url of the prakriti server.
    #[arg(long, default_value = "http://127.0.0.1:3000", env = "PRAKRITI_SERVER")]
    server: String,
    /// Title shown at the top of the wizard.
    #[arg(long, default_value = "Prakriti")]
    title: String,
    /// File the result screen saves the CSV export of all responses to.
    #[arg(long, default_value = EXPORT_FILENAME, env = "PRAKRITI_EXPORT")]
    export: PathBuf,
}

/// The terminal belongs to the wizard, so logs only go to a file when asked.
fn init_logging() -> anyhow::Result<()> {
    let Ok(path) = std::env::var("PRAKRITI_WIZARD_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "prakriti_wizard_ratatui=debug,prakriti=debug,info".to_string()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let gateway = HttpGateway::new(cli.server)?;
    tracing::info!(server = gateway.base_url(), "starting wizard");

    let wizard = RatatuiWizard::new()
        .with_title(cli.title)
        .with_export_path(cli.export);
    match wizard.run(&gateway) {
        Ok(result) => {
            println!("{}", result.result);
            println!("{}", result.description);
            println!(
                "Vata: {}, Pitta: {}, Kapha: {}",
                result.counts.vata, result.counts.pitta, result.counts.kapha
            );
            println!("All responses: {}", gateway.export_url());
            Ok(())
        }
        Err(err) if err.is_cancelled() => {
            println!("Survey cancelled.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
