mod cli;

use clap::Parser;

use cli::{Cli, Command};
use vcardqr::logging::{init_logging, Verbosity};
use vcardqr::{GeneratorConfig, ImageClient, Session};

fn load_config(cli: &Cli) -> anyhow::Result<GeneratorConfig> {
    match &cli.config {
        Some(path) => Ok(GeneratorConfig::from_json_file(path)?),
        None => Ok(GeneratorConfig::default()),
    }
}

/// Print the user notice for a failed action and hand back the exit code.
fn report(err: &vcardqr::Error) -> i32 {
    eprintln!("{}", err.user_notice());
    log::info!("details: {}", err);
    match err.kind() {
        vcardqr::ErrorKind::Validation => 2,
        vcardqr::ErrorKind::Generation => 3,
        vcardqr::ErrorKind::Export => 4,
        vcardqr::ErrorKind::Other => 1,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose));
    let config = load_config(&cli)?;

    match cli.command {
        Command::Preview(contact) => {
            let session = Session::with_record(contact.into_record()?);
            println!("{}", session.preview());
        }
        Command::Url { contact, render } => {
            let config = render.apply(config)?;
            let session = Session::with_record(contact.into_record()?);
            match session.vcard() {
                Ok(payload) => {
                    let url = vcardqr::qrserver::request_url(&config, &payload, config.size)?;
                    println!("{}", url);
                }
                Err(not_ready) => std::process::exit(report(&not_ready.into())),
            }
        }
        Command::Generate { contact, render, out_dir } => {
            let config = render.apply(config)?;
            let mut session = Session::with_record(contact.into_record()?);
            if !cli.quiet {
                println!("{}\n", session.preview());
            }

            let client = ImageClient::new(config).await?;
            if let Err(e) = session.generate(&client).await {
                std::process::exit(report(&e));
            }
            match session.download(&out_dir) {
                Ok(path) => println!("{}", path.display()),
                Err(e) => std::process::exit(report(&e)),
            }
            client.close().await?;
        }
    }
    Ok(())
}
