//! `list` command implementation.

use clap::Args;
use lightcms_document::Document;
use lightcms_site::{ListOptions, Listing, SortKey};

use super::StoreArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Group articles by the value of this tag.
    #[arg(short, long)]
    group_by: Option<String>,

    /// Show at most this many articles.
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Sort order: `date`, `tag:NAME` or `none`.
    #[arg(long, default_value = "date")]
    sort: SortKey,
}

impl ListArgs {
    /// Execute the list command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the cache cannot be
    /// opened or the source directory cannot be read.
    pub(crate) fn execute(self, store_args: &StoreArgs, output: &Output) -> Result<(), CliError> {
        let store = store_args.open_store()?;

        let mut options = ListOptions::default().sort(self.sort);
        if let Some(tag) = self.group_by {
            options = options.group_by(tag);
        }
        if let Some(limit) = self.limit {
            options = options.limit(limit);
        }

        let listing = store.list_documents(&options)?;
        if listing.is_empty() {
            output.warning(&format!(
                "No articles found in {}",
                store.source().root().display()
            ));
            return Ok(());
        }

        match listing {
            Listing::Flat(docs) => {
                for doc in &docs {
                    output.print(&summary_line(doc));
                }
            }
            Listing::Grouped(groups) => {
                for (value, docs) in &groups {
                    let heading = if value.is_empty() { "(none)" } else { value };
                    output.heading(heading);
                    for doc in docs {
                        output.detail(&summary_line(doc));
                    }
                }
            }
        }

        Ok(())
    }
}

fn summary_line(doc: &Document) -> String {
    format!("{}  {:<20}  {}", doc.sort_date(), doc.filename(), doc.title())
}
