mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is for command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        return commands::version::run();
    }

    let session = Session::load(cli.store)?;

    match cli.command {
        Commands::Add {
            content,
            category,
            date,
            images,
        } => commands::entries::add(&session, content, category, date, &images).await,
        Commands::List { range, category } => {
            commands::entries::list(&session, category, &range).await
        }
        Commands::Show { id } => commands::entries::show(&session, &id).await,
        Commands::Edit {
            id,
            content,
            date,
            category,
        } => commands::entries::edit(&session, &id, content, date, category).await,
        Commands::Remove { id, index } => {
            commands::entries::remove(&session, id.as_deref(), index).await
        }
        Commands::Attach { id, images } => {
            commands::images::attach(&session, &id, &images).await
        }
        Commands::Detach { id, image } => commands::images::detach(&session, &id, image).await,
        Commands::Report(args) => commands::report::run(&session, &args).await,
        Commands::Config => commands::config::run(&session),
        Commands::Version => commands::version::run(),
    }
}
