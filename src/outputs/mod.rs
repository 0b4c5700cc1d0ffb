//! Output generation for finished reports.
//!
//! # Submodules
//!
//! - [`html`]: Renders a [`Report`](crate::models::Report) to a standalone HTML
//!   page, writes it to the output directory and optionally copies it to a
//!   publish directory
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── {report_name}_{YYYY-MM-DD}.html
//!
//! publish_dir/               # only with --publish-dir
//! └── {report_name}_{YYYY-MM-DD}.html
//! ```

pub mod html;
