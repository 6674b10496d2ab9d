//! Row Validator - batch input checks
//!
//! Every rule runs on every row; a row is rejected with the reasons of all
//! failing rules, not just the first.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::account::{AccountStatus, AccountType};

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("valid address regex"));

/// One input table row, keyed by header name. Absent columns read as `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub tipo_conta: Option<String>,
    #[serde(default)]
    pub endereco_evm: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub id_conta: Option<String>,
}

fn trimmed(field: &Option<String>) -> &str {
    field.as_deref().map(str::trim).unwrap_or("")
}

impl CsvRow {
    pub fn name(&self) -> &str {
        trimmed(&self.nome)
    }

    pub fn account_type(&self) -> &str {
        trimmed(&self.tipo_conta)
    }

    pub fn address(&self) -> &str {
        trimmed(&self.endereco_evm)
    }

    pub fn status(&self) -> &str {
        trimmed(&self.status)
    }

    pub fn notes(&self) -> &str {
        trimmed(&self.observacoes)
    }

    pub fn source_id(&self) -> Option<&str> {
        Some(trimmed(&self.id_conta)).filter(|id| !id.is_empty())
    }
}

/// `0x` followed by exactly 40 hexadecimal characters.
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address)
}

/// Row fields that passed every rule, ready for identifier assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    pub name: String,
    pub account_type: AccountType,
    pub address: String,
    pub status: AccountStatus,
    pub notes: Option<String>,
    pub source_id: Option<String>,
}

/// A single check over a row. Returns `None` when the row passes.
pub trait RowRule {
    fn name(&self) -> &'static str;
    fn check(&self, row: &CsvRow) -> Option<String>;
}

pub struct NameRule;

impl RowRule for NameRule {
    fn name(&self) -> &'static str { "nome" }

    fn check(&self, row: &CsvRow) -> Option<String> {
        row.name().is_empty().then(|| "nome vazio".to_string())
    }
}

pub struct AccountTypeRule;

impl RowRule for AccountTypeRule {
    fn name(&self) -> &'static str { "tipo_conta" }

    fn check(&self, row: &CsvRow) -> Option<String> {
        row.account_type()
            .parse::<AccountType>()
            .err()
            .map(|value| format!("tipo_conta inválido: {value}"))
    }
}

pub struct AddressRule;

impl RowRule for AddressRule {
    fn name(&self) -> &'static str { "endereco_evm" }

    fn check(&self, row: &CsvRow) -> Option<String> {
        let addr = row.address();
        (!is_valid_address(addr)).then(|| format!("endereco_evm inválido: {addr}"))
    }
}

pub struct StatusRule;

impl RowRule for StatusRule {
    fn name(&self) -> &'static str { "status" }

    fn check(&self, row: &CsvRow) -> Option<String> {
        let status = row.status();
        if status.is_empty() {
            return None;
        }
        status
            .parse::<AccountStatus>()
            .err()
            .map(|value| format!("status inválido: {value}"))
    }
}

/// Runs every rule against a row and applies the run-level status default.
pub struct RowValidator {
    rules: Vec<Box<dyn RowRule>>,
    default_status: AccountStatus,
}

impl RowValidator {
    pub fn new(default_status: AccountStatus) -> Self {
        Self {
            rules: vec![
                Box::new(NameRule),
                Box::new(AccountTypeRule),
                Box::new(AddressRule),
                Box::new(StatusRule),
            ],
            default_status,
        }
    }

    pub fn validate(&self, row: &CsvRow) -> Result<ValidatedRow, Vec<String>> {
        let reasons: Vec<String> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let reason = rule.check(row);
                if let Some(reason) = &reason {
                    tracing::trace!(rule = rule.name(), %reason, "rule failed");
                }
                reason
            })
            .collect();

        if !reasons.is_empty() {
            return Err(reasons);
        }

        let status = match row.status() {
            "" => self.default_status,
            s => s.parse().unwrap_or(self.default_status),
        };
        let account_type = row
            .account_type()
            .parse()
            .map_err(|value| vec![format!("tipo_conta inválido: {value}")])?;

        Ok(ValidatedRow {
            name: row.name().to_string(),
            account_type,
            address: row.address().to_string(),
            status,
            notes: Some(row.notes()).filter(|n| !n.is_empty()).map(str::to_string),
            source_id: row.source_id().map(str::to_string),
        })
    }
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new(AccountStatus::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0xAbC1230000000000000000000000000000dEaD00";

    fn row(nome: &str, tipo: &str, addr: &str) -> CsvRow {
        CsvRow {
            nome: Some(nome.to_string()),
            tipo_conta: Some(tipo.to_string()),
            endereco_evm: Some(addr.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_row_uses_default_status() {
        let validator = RowValidator::new(AccountStatus::Private);
        let valid = validator.validate(&row("  João Silva ", " Cliente", ADDR)).unwrap();
        assert_eq!(valid.name, "João Silva");
        assert_eq!(valid.account_type, AccountType::Client);
        assert_eq!(valid.status, AccountStatus::Private);
        assert_eq!(valid.notes, None);
        assert_eq!(valid.source_id, None);
    }

    #[test]
    fn test_explicit_status_wins() {
        let mut r = row("Ana", "governo", ADDR);
        r.status = Some("PUBLICO".to_string());
        let valid = RowValidator::new(AccountStatus::Private).validate(&r).unwrap();
        assert_eq!(valid.status, AccountStatus::Public);
    }

    #[test]
    fn test_all_reasons_reported() {
        let mut r = row("   ", "banco", "0x123");
        r.status = Some("secreto".to_string());
        let reasons = RowValidator::default().validate(&r).unwrap_err();
        assert_eq!(
            reasons,
            vec![
                "nome vazio".to_string(),
                "tipo_conta inválido: banco".to_string(),
                "endereco_evm inválido: 0x123".to_string(),
                "status inválido: secreto".to_string(),
            ]
        );
    }

    #[test]
    fn test_malformed_addresses() {
        let validator = RowValidator::default();
        let short = format!("0x{}", "a".repeat(39));
        let no_prefix = "a".repeat(42);
        let bad_char = format!("0x{}g", "a".repeat(39));
        for addr in [short.as_str(), no_prefix.as_str(), bad_char.as_str(), ""] {
            let reasons = validator.validate(&row("Ana", "cliente", addr)).unwrap_err();
            assert_eq!(reasons.len(), 1);
            assert!(reasons[0].contains("endereco_evm inválido"));
        }
    }

    #[test]
    fn test_missing_columns_are_empty() {
        let reasons = RowValidator::default().validate(&CsvRow::default()).unwrap_err();
        assert_eq!(reasons.len(), 3);
    }

    #[test]
    fn test_source_id_and_notes_trimmed() {
        let mut r = row("Ana", "levita", ADDR);
        r.id_conta = Some("  ID-9 ".to_string());
        r.observacoes = Some(" nota ".to_string());
        let valid = RowValidator::default().validate(&r).unwrap();
        assert_eq!(valid.source_id.as_deref(), Some("ID-9"));
        assert_eq!(valid.notes.as_deref(), Some("nota"));

        r.id_conta = Some("   ".to_string());
        assert_eq!(RowValidator::default().validate(&r).unwrap().source_id, None);
    }
}
