//! Account data model - the canonical record and where its artifacts live

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Closed set of account categories.
///
/// Declaration order is the order account types are grouped in the upload
/// script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "cliente")]
    Client,
    #[serde(rename = "ministerio")]
    Ministry,
    #[serde(rename = "levita")]
    Levite,
    #[serde(rename = "governo")]
    Government,
    #[serde(rename = "investidor")]
    Investor,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Client,
        AccountType::Ministry,
        AccountType::Levite,
        AccountType::Government,
        AccountType::Investor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Client => "cliente",
            AccountType::Ministry => "ministerio",
            AccountType::Levite => "levita",
            AccountType::Government => "governo",
            AccountType::Investor => "investidor",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        AccountType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or(wanted)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[default]
    #[serde(rename = "publico", alias = "public")]
    Public,
    #[serde(rename = "privado", alias = "private")]
    Private,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Public => "publico",
            AccountStatus::Private => "privado",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "publico" | "public" => Ok(AccountStatus::Public),
            "privado" | "private" => Ok(AccountStatus::Private),
            other => Err(other.to_string()),
        }
    }
}

/// Paths to the three artifacts produced for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub json: PathBuf,
    pub pdf: PathBuf,
    pub qrcode: PathBuf,
}

/// Output tree rooted at a base directory:
/// `contas/<type>/{json,pdf,qrcodes}/<slug>.{json,pdf,png}`.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    base: PathBuf,
}

impl OutputLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn type_dir(&self, account_type: AccountType) -> PathBuf {
        self.base.join("contas").join(account_type.as_str())
    }

    pub fn artifact_paths(&self, account_type: AccountType, slug: &str) -> ArtifactPaths {
        let dir = self.type_dir(account_type);
        ArtifactPaths {
            json: dir.join("json").join(format!("{slug}.json")),
            pdf: dir.join("pdf").join(format!("{slug}.pdf")),
            qrcode: dir.join("qrcodes").join(format!("{slug}.png")),
        }
    }
}

/// Nested `documentos` object of the persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLinks {
    pub pdf_selado: PathBuf,
    pub json_original: PathBuf,
}

/// The canonical account record. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id_conta: String,
    pub nome: String,
    pub tipo_conta: AccountType,
    pub endereco_evm: String,
    pub hash_sha256: String,
    pub qrcode: PathBuf,
    pub status: AccountStatus,
    #[serde(with = "utc_seconds")]
    pub data_registro: DateTime<Utc>,
    pub observacoes: String,
    pub assinatura_responsavel: String,
    pub documentos: DocumentLinks,
}

impl AccountRecord {
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            json: self.documentos.json_original.clone(),
            pdf: self.documentos.pdf_selado.clone(),
            qrcode: self.qrcode.clone(),
        }
    }

    /// `data_registro` as written to JSON and printed on the certificate.
    pub fn registered_at(&self) -> String {
        self.data_registro.format(utc_seconds::FORMAT).to_string()
    }
}

/// ISO-8601 UTC at second precision with a trailing `Z`.
mod utc_seconds {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
