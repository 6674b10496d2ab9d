//! Batch Orchestrator - CSV rows in, artifacts plus manifest out
//!
//! Rows are processed strictly in input order. Each row is validated, given
//! an identifier and rendered, or recorded as rejected with its reasons.
//! Rendering and I/O errors are not caught per row: they abort the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::account::{AccountStatus, AccountType, ArtifactPaths, OutputLayout};
use crate::error::{GeneratorError, Result};
use crate::pipeline::DocumentGenerator;
use crate::record::AccountFields;
use crate::upload::{render_upload_script, write_upload_script, UploadTarget};
use crate::validation::{CsvRow, RowValidator, ValidatedRow};

const RUN_STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Run-level settings for a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub default_status: AccountStatus,
    pub id_prefix: String,
    pub start: u64,
    pub pad: usize,
    /// Use a row's non-empty `id_conta` instead of a generated identifier.
    pub prefer_source_ids: bool,
    pub signature: Option<PathBuf>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            default_status: AccountStatus::Public,
            id_prefix: "BANTU-".to_string(),
            start: 1,
            pad: 4,
            prefer_source_ids: false,
            signature: None,
        }
    }
}

/// Run-scoped identifier counter. Owned by a single run, never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
    prefix: String,
    pad: usize,
}

impl IdSequence {
    pub fn new(prefix: impl Into<String>, start: u64, pad: usize) -> Self {
        Self { next: start, prefix: prefix.into(), pad }
    }

    pub fn from_options(options: &BatchOptions) -> Self {
        Self::new(options.id_prefix.clone(), options.start, options.pad)
    }

    /// Format the current value and advance.
    pub fn issue(&mut self) -> String {
        let id = format!("{}{:0width$}", self.prefix, self.next, width = self.pad);
        self.next += 1;
        id
    }

    /// Value the next generated identifier will carry.
    pub fn next_value(&self) -> u64 {
        self.next
    }
}

/// Pick the row's identifier. Only generated identifiers consume a slot.
pub fn assign_id(row: &ValidatedRow, prefer_source: bool, seq: &mut IdSequence) -> String {
    match row.source_id.as_deref() {
        Some(id) if prefer_source => id.to_string(),
        _ => seq.issue(),
    }
}

/// Per-row manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum RowOutcome {
    #[serde(rename = "OK")]
    Generated {
        row: usize,
        id_conta: String,
        nome: String,
        tipo: AccountType,
        json: PathBuf,
        pdf: PathBuf,
        qrcode: PathBuf,
    },
    #[serde(rename = "ERRO")]
    Rejected {
        row: usize,
        nome: String,
        tipo: String,
        endereco_evm: String,
        errors: Vec<String>,
    },
}

impl RowOutcome {
    pub fn row(&self) -> usize {
        match self {
            RowOutcome::Generated { row, .. } | RowOutcome::Rejected { row, .. } => *row,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, RowOutcome::Generated { .. })
    }

    /// Account type and artifact paths of a generated row.
    pub fn artifacts(&self) -> Option<(AccountType, ArtifactPaths)> {
        match self {
            RowOutcome::Generated { tipo, json, pdf, qrcode, .. } => Some((
                *tipo,
                ArtifactPaths { json: json.clone(), pdf: pdf.clone(), qrcode: qrcode.clone() },
            )),
            RowOutcome::Rejected { .. } => None,
        }
    }
}

/// Ordered log of one batch run. One entry per input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub timestamp_utc: String,
    pub csv_source: PathBuf,
    pub results: Vec<RowOutcome>,
}

impl Manifest {
    pub fn new(started_at: DateTime<Utc>, csv_source: &Path) -> Self {
        Self {
            timestamp_utc: started_at.format(RUN_STAMP_FORMAT).to_string(),
            csv_source: csv_source.to_path_buf(),
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: RowOutcome) {
        self.results.push(outcome);
    }

    pub fn ok_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn error_count(&self) -> usize {
        self.results.len() - self.ok_count()
    }

    pub fn file_name(&self) -> String {
        format!("manifest_{}.json", self.timestamp_utc)
    }

    pub fn upload_script_name(&self) -> String {
        format!("s3_upload_{}.sh", self.timestamp_utc)
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct BatchReport {
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
    pub upload_script_path: PathBuf,
}

pub struct BatchOrchestrator {
    generator: DocumentGenerator,
    validator: RowValidator,
    options: BatchOptions,
    target: UploadTarget,
}

impl BatchOrchestrator {
    pub fn new(out_dir: impl Into<PathBuf>, options: BatchOptions, target: UploadTarget) -> Self {
        let generator = DocumentGenerator::new(OutputLayout::new(out_dir))
            .with_signature(options.signature.clone());
        Self {
            generator,
            validator: RowValidator::new(options.default_status),
            options,
            target,
        }
    }

    pub fn out_dir(&self) -> &Path {
        self.generator.layout().base()
    }

    /// Run the batch over the CSV at `csv_path`.
    ///
    /// Fails before producing anything if the file does not exist.
    pub fn run(&self, csv_path: &Path) -> Result<BatchReport> {
        if !csv_path.exists() {
            return Err(GeneratorError::InputNotFound(csv_path.to_path_buf()));
        }
        fs::create_dir_all(self.out_dir())?;

        let started_at = Utc::now();
        let mut manifest = Manifest::new(started_at, csv_path);
        tracing::info!(csv = %csv_path.display(), out = %self.out_dir().display(), "batch started");

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(csv_path)?;
        let rows = reader
            .deserialize::<CsvRow>()
            .map(|row| row.map_err(GeneratorError::from));
        self.process_rows(rows, &mut manifest)?;

        let manifest_path = self.out_dir().join(manifest.file_name());
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

        let upload_script_path = self.out_dir().join(manifest.upload_script_name());
        let artifacts: Vec<_> = manifest.results.iter().filter_map(RowOutcome::artifacts).collect();
        let script = render_upload_script(&self.target, artifacts.iter().map(|(t, p)| (*t, p)));
        write_upload_script(&upload_script_path, &script)?;

        tracing::info!(
            ok = manifest.ok_count(),
            errors = manifest.error_count(),
            manifest = %manifest_path.display(),
            "batch finished"
        );
        Ok(BatchReport { manifest, manifest_path, upload_script_path })
    }

    /// Process rows in order, appending one outcome per row. Row numbers
    /// are 1-based and count rejected rows too.
    pub fn process_rows<I>(&self, rows: I, manifest: &mut Manifest) -> Result<()>
    where
        I: IntoIterator<Item = Result<CsvRow>>,
    {
        let mut seq = IdSequence::from_options(&self.options);
        for (idx, row) in rows.into_iter().enumerate() {
            let outcome = self.process_row(idx + 1, &row?, &mut seq)?;
            manifest.push(outcome);
        }
        tracing::debug!(next_id = seq.next_value(), "identifier sequence closed");
        Ok(())
    }

    fn process_row(&self, row_number: usize, row: &CsvRow, seq: &mut IdSequence) -> Result<RowOutcome> {
        let valid = match self.validator.validate(row) {
            Ok(valid) => valid,
            Err(errors) => {
                tracing::warn!(row = row_number, reasons = ?errors, "row rejected");
                return Ok(RowOutcome::Rejected {
                    row: row_number,
                    nome: row.name().to_string(),
                    tipo: row.account_type().to_lowercase(),
                    endereco_evm: row.address().to_string(),
                    errors,
                });
            }
        };

        let id = assign_id(&valid, self.options.prefer_source_ids, seq);
        let fields = AccountFields {
            id,
            name: valid.name,
            account_type: valid.account_type,
            address: valid.address,
            status: valid.status,
            notes: valid.notes,
        };
        let record = self.generator.generate(&fields, Utc::now())?;
        let paths = record.artifact_paths();

        Ok(RowOutcome::Generated {
            row: row_number,
            id_conta: record.id_conta,
            nome: record.nome,
            tipo: record.tipo_conta,
            json: paths.json,
            pdf: paths.pdf,
            qrcode: paths.qrcode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(source_id: Option<&str>) -> ValidatedRow {
        ValidatedRow {
            name: "Ana".to_string(),
            account_type: AccountType::Client,
            address: "0x00000000000000000000000000000000000000aa".to_string(),
            status: AccountStatus::Public,
            notes: None,
            source_id: source_id.map(str::to_string),
        }
    }

    #[test]
    fn test_sequence_formatting() {
        let mut seq = IdSequence::new("BANTU-", 1, 4);
        assert_eq!(seq.issue(), "BANTU-0001");
        assert_eq!(seq.issue(), "BANTU-0002");

        let mut wide = IdSequence::new("X", 12345, 3);
        assert_eq!(wide.issue(), "X12345");

        let mut bare = IdSequence::new("", 7, 0);
        assert_eq!(bare.issue(), "7");
    }

    #[test]
    fn test_source_ids_do_not_consume_slots() {
        let mut seq = IdSequence::new("B-", 10, 2);
        assert_eq!(assign_id(&valid(Some("CSV-1")), true, &mut seq), "CSV-1");
        assert_eq!(seq.next_value(), 10);
        assert_eq!(assign_id(&valid(None), true, &mut seq), "B-10");
        assert_eq!(assign_id(&valid(Some("CSV-2")), false, &mut seq), "B-11");
        assert_eq!(seq.next_value(), 12);
    }

    #[test]
    fn test_outcome_serialization_tags() {
        let ok = RowOutcome::Generated {
            row: 1,
            id_conta: "BANTU-0001".to_string(),
            nome: "Ana".to_string(),
            tipo: AccountType::Client,
            json: PathBuf::from("a.json"),
            pdf: PathBuf::from("a.pdf"),
            qrcode: PathBuf::from("a.png"),
        };
        let err = RowOutcome::Rejected {
            row: 2,
            nome: String::new(),
            tipo: "x".to_string(),
            endereco_evm: String::new(),
            errors: vec!["nome vazio".to_string()],
        };

        let ok_json = serde_json::to_value(&ok).unwrap();
        assert_eq!(ok_json["status"], "OK");
        assert_eq!(ok_json["tipo"], "cliente");
        let err_json = serde_json::to_value(&err).unwrap();
        assert_eq!(err_json["status"], "ERRO");
        assert_eq!(err_json["errors"][0], "nome vazio");

        let back: RowOutcome = serde_json::from_value(err_json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_manifest_names_share_run_stamp() {
        use chrono::TimeZone;
        let started = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let manifest = Manifest::new(started, Path::new("in.csv"));
        assert_eq!(manifest.timestamp_utc, "20250102T030405Z");
        assert_eq!(manifest.file_name(), "manifest_20250102T030405Z.json");
        assert_eq!(manifest.upload_script_name(), "s3_upload_20250102T030405Z.sh");
    }

    #[test]
    fn test_rejected_rows_keep_numbering() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = BatchOrchestrator::new(dir.path(), BatchOptions::default(), UploadTarget::default());
        let rows = vec![
            Ok(CsvRow { nome: Some("".to_string()), ..Default::default() }),
            Ok(CsvRow {
                nome: Some("Ana".to_string()),
                tipo_conta: Some("cliente".to_string()),
                endereco_evm: Some("0x00000000000000000000000000000000000000aa".to_string()),
                ..Default::default()
            }),
        ];

        let mut manifest = Manifest::new(Utc::now(), Path::new("mem.csv"));
        orchestrator.process_rows(rows, &mut manifest).unwrap();

        assert_eq!(manifest.results.len(), 2);
        assert_eq!(manifest.results[0].row(), 1);
        assert!(!manifest.results[0].is_ok());
        assert_eq!(manifest.results[1].row(), 2);
        match &manifest.results[1] {
            RowOutcome::Generated { id_conta, .. } => assert_eq!(id_conta, "BANTU-0001"),
            other => panic!("expected generated row, got {other:?}"),
        }
    }
}
