mod cmd;
mod core;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "taxflow", version, about = "US federal income tax estimator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate tax, refund or amount owed
    Summary(cmd::summary::SummaryCommand),
    /// Show a year's brackets, deductions and thresholds
    Rates(cmd::rates::RatesCommand),
    /// Import a prior-year export into the draft
    Import(cmd::import::ImportCommand),
    /// Inspect and edit the saved draft
    Draft(cmd::draft::DraftCommand),
    /// Print the filer input format
    Schema(cmd::schema::SchemaCommand),
    /// List or open official IRS documents
    Links(cmd::links::LinksCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Summary(summary) => summary.exec(),
        Command::Rates(rates) => rates.exec(),
        Command::Import(import) => import.exec(),
        Command::Draft(draft) => draft.exec(),
        Command::Schema(schema) => schema.exec(),
        Command::Links(links) => links.exec(),
    }
}
