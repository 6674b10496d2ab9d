//! Generation Pipeline - one record in, three artifacts out
//!
//! Both orchestrators funnel through [`DocumentGenerator::generate`]:
//! build record, render QR, persist JSON, render PDF. Any failure aborts.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

use crate::account::{AccountRecord, AccountStatus, AccountType, OutputLayout};
use crate::document::render_document;
use crate::error::{GeneratorError, Result};
use crate::layout::PageLayout;
use crate::qr::{write_qr_png, QR_SIZE_PX};
use crate::record::{build_record, write_record_json, AccountFields, OFFICIAL_NOTES};
use crate::upload::{upload_commands, UploadTarget};
use crate::validation::is_valid_address;

/// Produces the JSON, PDF and PNG artifacts for validated account fields.
pub struct DocumentGenerator {
    layout: OutputLayout,
    page: PageLayout,
    signature: Option<PathBuf>,
    qr_size_px: u32,
}

impl DocumentGenerator {
    pub fn new(layout: OutputLayout) -> Self {
        Self {
            layout,
            page: PageLayout::default(),
            signature: None,
            qr_size_px: QR_SIZE_PX,
        }
    }

    pub fn with_signature(mut self, signature: Option<PathBuf>) -> Self {
        self.signature = signature;
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Generate every artifact for `fields`, stamped with `now`.
    pub fn generate(&self, fields: &AccountFields, now: DateTime<Utc>) -> Result<AccountRecord> {
        let record = build_record(fields, &self.layout, now);
        let paths = record.artifact_paths();

        for path in [&paths.json, &paths.pdf, &paths.qrcode] {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
        }

        write_qr_png(&record.endereco_evm, &paths.qrcode, self.qr_size_px)?;
        write_record_json(&record, &paths.json)?;
        render_document(
            &record,
            &paths.qrcode,
            self.signature.as_deref(),
            &self.page,
            &paths.pdf,
        )?;

        tracing::info!(
            id = %record.id_conta,
            tipo = %record.tipo_conta,
            pdf = %paths.pdf.display(),
            "account documents generated"
        );
        Ok(record)
    }
}

/// Fully specified input for single-record generation.
#[derive(Debug, Clone)]
pub struct SingleRequest {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    pub address: String,
    pub status: AccountStatus,
    pub notes: Option<String>,
    pub out_dir: PathBuf,
    pub signature: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SingleOutcome {
    pub record: AccountRecord,
    pub upload_commands: Vec<String>,
}

/// Single-Record Orchestrator: no manifest, no row validation.
///
/// The address format is still checked at this boundary so a malformed
/// address fails before any artifact is written.
pub fn generate_single(request: &SingleRequest, target: &UploadTarget) -> Result<SingleOutcome> {
    if !is_valid_address(request.address.trim()) {
        return Err(GeneratorError::InvalidAddress(request.address.clone()));
    }

    let fields = AccountFields {
        id: request.id.clone(),
        name: request.name.clone(),
        account_type: request.account_type,
        address: request.address.trim().to_string(),
        status: request.status,
        notes: Some(request.notes.clone().unwrap_or_else(|| OFFICIAL_NOTES.to_string())),
    };

    let generator = DocumentGenerator::new(OutputLayout::new(&request.out_dir))
        .with_signature(request.signature.clone());
    let record = generator.generate(&fields, Utc::now())?;
    let upload_commands = upload_commands(target, record.tipo_conta, &record.artifact_paths());

    Ok(SingleOutcome { record, upload_commands })
}
