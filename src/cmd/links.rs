//! Links command - official IRS instructions and filing sites

use crate::core::DocumentLink;
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct LinksCommand {
    /// Document key, e.g. form1040 or fbar; lists every document when omitted
    key: Option<String>,

    /// Open the document in the default browser
    #[arg(long, requires = "key")]
    open: bool,
}

#[derive(Debug, Tabled)]
struct LinkRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Document")]
    title: &'static str,
    #[tabled(rename = "URL")]
    url: &'static str,
}

impl LinksCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let Some(key) = &self.key else {
            let rows = DocumentLink::ALL.iter().map(|link| LinkRow {
                key: link.key(),
                title: link.title(),
                url: link.url(),
            });
            println!("{}", Table::new(rows).with(Style::rounded()));
            return Ok(());
        };

        let Some(link) = DocumentLink::from_key(key) else {
            let keys: Vec<_> = DocumentLink::ALL.iter().map(|l| l.key()).collect();
            anyhow::bail!("Unknown document '{}' (known: {})", key, keys.join(", "));
        };

        if self.open {
            log::info!("Opening {}", link.url());
            opener::open(link.url())?;
        } else {
            println!("{}: {}", link.title(), link.url());
        }
        Ok(())
    }
}
