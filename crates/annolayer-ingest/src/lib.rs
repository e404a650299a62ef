//! Input discovery for annotation batches.
//!
//! Finds the annotation files in a folder and orders them the way a person
//! would read them: `img1.xml`, `img2.xml`, `img10.xml`.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use annolayer_ingest::list_annotation_files;
//!
//! let files = list_annotation_files(Path::new("slides"), "xml")?;
//! ```

mod discovery;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::{ensure_output_dir, list_annotation_files, natural_cmp};
