//! # inx-renderer
//!
//! Tera-based template engine that turns a validated
//! [`inx_core::ExtensionConfig`] into the files of an Inkscape extension.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use inx_renderer::{Catalog, Renderer};
//! use inx_core::config;
//!
//! fn render(path: &std::path::Path) {
//!     if let Ok(cfg) = config::load(path) {
//!         if let Ok(set) = Catalog::resolve(cfg.category, cfg.template_dir.as_deref()) {
//!             if let Ok(files) = Renderer::render(&cfg, &set) {
//!                 for file in files {
//!                     println!("{}: {} bytes", file.path.display(), file.contents.len());
//!                 }
//!             }
//!         }
//!     }
//! }
//! ```

pub mod catalog;
pub mod context;
pub mod engine;
pub mod error;
pub mod markup;

pub use catalog::{Catalog, CategoryInfo, TemplateFile, TemplateSet, TemplateSource};
pub use context::TemplateContext;
pub use engine::{RenderedFile, Renderer, TemplateEngine};
pub use error::{RenderError, TemplateError};
