//! Data model for annotation layer ordering.
//!
//! A file is read into a [`RecordSequence`] of named [`Record`]s. A
//! [`SchemaSpec`] describes the positional layout every file should end up
//! with: one [`SchemaSlot`] per position, each accepting one or more alias
//! names compared through a [`NameNormalizer`].
//!
//! # Example
//!
//! ```
//! use annolayer_model::{NameNormalizer, SchemaSlot, SchemaSpec};
//!
//! let schema = SchemaSpec::new(
//!     vec![
//!         SchemaSlot::new(["islet", "islets"]),
//!         SchemaSlot::new(["duct", "ducts", "normal duct"]),
//!     ],
//!     NameNormalizer::case_insensitive(),
//! )
//! .unwrap();
//!
//! assert_eq!(schema.len(), 2);
//! assert!(schema.slot(0).unwrap().accepts("Islets"));
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod ids;
pub mod normalize;
pub mod record;
pub mod schema;

pub use config::{SchemaConfig, SlotConfig};
pub use error::{ModelError, Result, SchemaError};
pub use ids::LayerId;
pub use normalize::{NameNormalizer, normalize};
pub use record::{Record, RecordSequence};
pub use schema::{SchemaSlot, SchemaSpec};
