//! Outline renderer for lightcms documents.
//!
//! Document bodies use a small outline markup:
//!
//! ```text
//! *Intro
//! Some prose.
//! **Background
//! More prose, with a forced\\break.
//! *Methods
//! ```
//!
//! [`OutlineRenderer`] turns it into numbered `<h2>`/`<h3>` sections with
//! paragraphs, plus a nested table of contents. Documents tagged
//! `{Filetype}{markdown}` bypass the outline and go through [`render_markdown`].
//!
//! # Example
//!
//! ```
//! use lightcms_renderer::OutlineRenderer;
//!
//! let output = OutlineRenderer::new().render(["*Intro", "Hello world."]).unwrap();
//! assert_eq!(output.html, "<h2 id='1'>1 - Intro</h2><p>Hello world.</p>");
//! assert_eq!(output.toc, "<ul><li><a href='#1'>1 - Intro</a></li></ul>");
//! ```

mod error;
mod html;
mod markdown;
mod outline;
mod renderer;

pub use error::RenderError;
pub use markdown::render_markdown;
pub use outline::{Outline, SectionLabel};
pub use renderer::{OutlineRenderer, ProseSeparator, RenderOutput};
