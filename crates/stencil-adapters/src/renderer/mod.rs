//! Template renderers.

mod text_template;

pub use text_template::TextTemplateRenderer;
