//! Rendering documents through minijinja templates.
//!
//! Templates only ever receive data: the document's flat
//! [`template_context`](Document::template_context) mapping. Tag names and
//! values are never interpreted as template source.

use std::path::{Path, PathBuf};

use lightcms_document::Document;
use minijinja::{Environment, ErrorKind, path_loader};

use crate::TemplateError;

/// Templates loaded lazily from a directory.
pub struct Templates {
    dir: PathBuf,
    env: Environment<'static>,
}

impl Templates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut env = Environment::new();
        env.set_loader(path_loader(&dir));
        Self { dir, env }
    }

    /// Template directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Render `template` with the document's tags, `Filename`,
    /// `OriginalDate`, `Content` and `TableOfContents` as variables.
    ///
    /// Autoescaping follows the template's extension, so HTML templates should
    /// mark `Content` and `TableOfContents` as `safe`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if the template does not exist and
    /// [`TemplateError::Render`] for syntax or evaluation errors.
    pub fn render(&self, template: &str, document: &Document) -> Result<String, TemplateError> {
        let tmpl = self.env.get_template(template).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                TemplateError::NotFound(template.to_owned())
            } else {
                TemplateError::Render(e)
            }
        })?;
        tmpl.render(document.template_context())
            .map_err(TemplateError::Render)
    }
}

impl std::fmt::Debug for Templates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Templates").field("dir", &self.dir).finish_non_exhaustive()
    }
}
