//! Report assembly and export.
//!
//! The composer builds one structured report; the same structure is
//! returned as JSON and handed to the `DocumentRenderer` for the PDF
//! export.

pub mod handlers;
pub mod renderer;
pub mod services;

pub use renderer::{DocumentRenderer, PdfRenderer, RenderError};
pub use services::{Report, ReportError, ReportService};

mod plugin;
pub use plugin::ReportsPlugin;
