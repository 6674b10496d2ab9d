//! BANTU Core - sealed account document generator
//!
//! For every account the engine produces three artifacts:
//! a JSON record, a one-page PDF certificate and a PNG QR code of the
//! account address. Batch runs also write a manifest of per-row outcomes and
//! a shell script of storage upload commands.

pub mod account;
pub mod batch;
pub mod document;
pub mod error;
pub mod hashing;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod pdf;
pub mod pipeline;
pub mod qr;
pub mod record;
pub mod slug;
pub mod upload;
pub mod validation;

pub use account::{AccountRecord, AccountStatus, AccountType, ArtifactPaths, OutputLayout};
pub use batch::{BatchOptions, BatchOrchestrator, BatchReport, IdSequence, Manifest, RowOutcome};
pub use error::{GeneratorError, Result};
pub use hashing::{hash_address, sha256_hex};
pub use pipeline::{generate_single, DocumentGenerator, SingleOutcome, SingleRequest};
pub use slug::slugify;
pub use upload::UploadTarget;
pub use validation::{CsvRow, RowValidator};
