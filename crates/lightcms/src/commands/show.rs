//! `show` command implementation.

use clap::Args;

use super::StoreArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Document file name inside the source directory.
    name: String,

    /// Render through this template instead of printing raw HTML.
    #[arg(short, long)]
    template: Option<String>,

    /// Also print the table of contents.
    #[arg(long, conflicts_with = "template")]
    toc: bool,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing or invalid, or the
    /// template cannot be rendered.
    pub(crate) fn execute(self, store_args: &StoreArgs, output: &Output) -> Result<(), CliError> {
        let store = store_args.open_store()?;
        let fetched = store.fetch(&self.name)?;
        tracing::info!(
            name = %self.name,
            origin = ?fetched.origin,
            digest = %fetched.digest,
            "Fetched document"
        );
        let doc = fetched.document;

        if let Some(template) = &self.template {
            output.print(&store.render_to_template(&doc, template)?);
            return Ok(());
        }

        output.heading(&format!("{} ({})", doc.title(), doc.date()));
        output.detail(&format!("by {}", doc.author()));
        if self.toc {
            if let Some(toc) = doc.table_of_contents() {
                output.print(toc);
            }
        }
        if let Some(content) = doc.content() {
            output.print(content);
        }

        Ok(())
    }
}
