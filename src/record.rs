//! Record Builder - assembles the canonical record from validated fields

use chrono::{DateTime, SubsecRound, Utc};
use std::fs;
use std::path::Path;

use crate::account::{AccountRecord, AccountStatus, AccountType, DocumentLinks, OutputLayout};
use crate::error::Result;
use crate::hashing::hash_address;
use crate::slug::slugify;

/// Constant signatory line carried by every record.
pub const ATTESTATION: &str =
    "Kizequiel Guilherme Nzau – Servo do Senhor, Responsável terreno da Obra";

/// Notes placeholder for batch rows without `observacoes`.
pub const NOTES_PLACEHOLDER: &str = "—";

/// Notes used by single-record generation when none are given.
pub const OFFICIAL_NOTES: &str =
    "Conta oficial selada dentro do Banco da Nova Terra (BANTU) — Obra SAIH GENESS.";

/// Validated input for one account. The caller guarantees the address format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFields {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    pub address: String,
    pub status: AccountStatus,
    pub notes: Option<String>,
}

/// Build the record for `fields`, stamped with `now` truncated to seconds.
pub fn build_record(fields: &AccountFields, layout: &OutputLayout, now: DateTime<Utc>) -> AccountRecord {
    let slug = slugify(&fields.name);
    let paths = layout.artifact_paths(fields.account_type, &slug);

    let notes = fields
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(NOTES_PLACEHOLDER);

    AccountRecord {
        id_conta: fields.id.clone(),
        nome: fields.name.clone(),
        tipo_conta: fields.account_type,
        endereco_evm: fields.address.clone(),
        hash_sha256: hash_address(&fields.address),
        qrcode: paths.qrcode,
        status: fields.status,
        data_registro: now.trunc_subsecs(0),
        observacoes: notes.to_string(),
        assinatura_responsavel: ATTESTATION.to_string(),
        documentos: DocumentLinks {
            pdf_selado: paths.pdf,
            json_original: paths.json,
        },
    }
}

/// Persist the record as pretty-printed UTF-8 JSON, overwriting any previous file.
pub fn write_record_json(record: &AccountRecord, path: &Path) -> Result<()> {
    let body = serde_json::to_string_pretty(record)?;
    fs::write(path, body)?;
    tracing::debug!(path = %path.display(), "record JSON written");
    Ok(())
}

pub fn read_record_json(path: &Path) -> Result<AccountRecord> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
