//! Import command - load a prior-year export into the saved draft

use crate::cmd::{read_text, DEFAULT_STORE};
use crate::core::{import_prior_year, DraftStore};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ImportCommand {
    /// JSON export from a previous year ("-" for stdin)
    #[arg(short, long)]
    file: PathBuf,

    /// Draft file to import into
    #[arg(long, env = "TAXFLOW_STORE", default_value = DEFAULT_STORE)]
    store: PathBuf,
}

impl ImportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let text = read_text(&self.file)?;
        let outcome = match import_prior_year(&text) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::debug!("Import failed: {}", err);
                anyhow::bail!(
                    "Could not read file. Make sure it is a valid JSON export from TaxFlow. ({})",
                    err
                );
            }
        };

        let store = DraftStore::new(&self.store);
        let mut draft = store.load();
        draft.data = outcome.input;
        store.save(&mut draft)?;

        println!("Prior-year data imported successfully. Review each step before filing.");
        if !outcome.discarded.is_empty() {
            println!("Ignored unknown fields: {}", outcome.discarded.join(", "));
        }
        Ok(())
    }
}
