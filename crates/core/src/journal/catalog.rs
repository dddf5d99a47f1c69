//! Static reference data: journal types and tax codes.
//!
//! The catalog is immutable once built. [`Catalog::builtin`] hands out the
//! process-wide default, initialised on first use.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::JournalError;
use super::types::JournalType;

/// An account number with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRef {
    /// Account number.
    pub code: String,
    /// Account label.
    pub name: String,
}

impl AccountRef {
    /// Creates an account reference.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Configuration of one journal type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalTypeConfig {
    /// The journal type this configuration describes.
    pub journal_type: JournalType,
    /// Short label.
    pub label: String,
    /// Longer description.
    pub description: String,
    /// Account the journal's main lines usually post to.
    pub default_account: AccountRef,
    /// Plausible counterpart accounts, most likely first.
    pub counterpart_accounts: Vec<AccountRef>,
    /// Whether entries in this journal need a reference.
    pub requires_reference: bool,
    /// Three uppercase letters starting every reference of this journal.
    pub reference_prefix: String,
    /// Whether VAT handling applies.
    pub vat_applicable: bool,
}

/// Configuration of one tax code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxCodeConfig {
    /// Tax code key (e.g. `"N16"`).
    pub code: String,
    /// Label used on generated tax lines.
    pub label: String,
    /// Rate in percent.
    pub rate: Decimal,
    /// Account receiving the tax; `None` for exempt codes.
    pub account: Option<AccountRef>,
}

/// Immutable lookup tables for journal types and tax codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Indexed by [`JournalType::index`].
    journal_types: Vec<JournalTypeConfig>,
    tax_codes: Vec<TaxCodeConfig>,
}

static BUILTIN: Lazy<Arc<Catalog>> = Lazy::new(|| Arc::new(builtin_catalog()));

impl Catalog {
    /// Builds a catalog after checking its consistency.
    ///
    /// Every journal type must be configured exactly once, prefixes must be
    /// three uppercase ASCII letters and unique, counterpart lists must not be
    /// empty, and tax codes must be unique with a non-negative rate.
    pub fn new(
        journal_types: Vec<JournalTypeConfig>,
        tax_codes: Vec<TaxCodeConfig>,
    ) -> Result<Self, JournalError> {
        let mut ordered = Vec::with_capacity(JournalType::ALL.len());
        for journal_type in JournalType::ALL {
            let mut matching = journal_types.iter().filter(|c| c.journal_type == journal_type);
            let config = matching.next().ok_or_else(|| {
                JournalError::InvalidCatalog(format!("journal type {journal_type} is not configured"))
            })?;
            if matching.next().is_some() {
                return Err(JournalError::InvalidCatalog(format!(
                    "journal type {journal_type} is configured twice"
                )));
            }
            ordered.push(config.clone());
        }

        let mut prefixes = HashSet::new();
        for config in &ordered {
            let prefix = config.reference_prefix.as_str();
            if prefix.len() != 3 || !prefix.bytes().all(|b| b.is_ascii_uppercase()) {
                return Err(JournalError::InvalidCatalog(format!(
                    "prefix {prefix:?} of {} must be three uppercase letters",
                    config.journal_type
                )));
            }
            if !prefixes.insert(prefix) {
                return Err(JournalError::InvalidCatalog(format!(
                    "prefix {prefix} is used more than once"
                )));
            }
            if config.counterpart_accounts.is_empty() {
                return Err(JournalError::InvalidCatalog(format!(
                    "journal type {} has no counterpart account",
                    config.journal_type
                )));
            }
        }

        let mut codes = HashSet::new();
        for tax in &tax_codes {
            if !codes.insert(tax.code.to_ascii_uppercase()) {
                return Err(JournalError::InvalidCatalog(format!(
                    "tax code {} is defined more than once",
                    tax.code
                )));
            }
            if tax.rate.is_sign_negative() {
                return Err(JournalError::InvalidCatalog(format!(
                    "tax code {} has a negative rate",
                    tax.code
                )));
            }
        }

        Ok(Self {
            journal_types: ordered,
            tax_codes,
        })
    }

    /// Returns the process-wide built-in catalog.
    #[must_use]
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Configuration of `journal_type`.
    #[must_use]
    pub fn journal_type(&self, journal_type: JournalType) -> &JournalTypeConfig {
        &self.journal_types[journal_type.index()]
    }

    /// All journal type configurations, in [`JournalType::ALL`] order.
    #[must_use]
    pub fn journal_types(&self) -> &[JournalTypeConfig] {
        &self.journal_types
    }

    /// Finds the journal type whose reference prefix is `prefix`.
    #[must_use]
    pub fn by_prefix(&self, prefix: &str) -> Option<&JournalTypeConfig> {
        self.journal_types
            .iter()
            .find(|config| config.reference_prefix == prefix)
    }

    /// Looks up a tax code (case-insensitive).
    #[must_use]
    pub fn tax_code(&self, code: &str) -> Option<&TaxCodeConfig> {
        let code = code.trim();
        self.tax_codes
            .iter()
            .find(|tax| tax.code.eq_ignore_ascii_case(code))
    }

    /// All tax code configurations.
    #[must_use]
    pub fn tax_codes(&self) -> &[TaxCodeConfig] {
        &self.tax_codes
    }

    /// Finds an account mentioned anywhere in the catalog.
    #[must_use]
    pub fn account(&self, code: &str) -> Option<&AccountRef> {
        let journal_accounts = self.journal_types.iter().flat_map(|config| {
            std::iter::once(&config.default_account).chain(&config.counterpart_accounts)
        });
        let tax_accounts = self.tax_codes.iter().filter_map(|tax| tax.account.as_ref());
        journal_accounts
            .chain(tax_accounts)
            .find(|account| account.code == code)
    }
}

#[allow(clippy::too_many_arguments)]
fn journal(
    journal_type: JournalType,
    label: &str,
    description: &str,
    prefix: &str,
    default_account: AccountRef,
    counterpart_accounts: Vec<AccountRef>,
    requires_reference: bool,
    vat_applicable: bool,
) -> JournalTypeConfig {
    JournalTypeConfig {
        journal_type,
        label: label.to_string(),
        description: description.to_string(),
        default_account,
        counterpart_accounts,
        requires_reference,
        reference_prefix: prefix.to_string(),
        vat_applicable,
    }
}

fn builtin_catalog() -> Catalog {
    let suppliers = || AccountRef::new("401", "Fournisseurs");
    let customers = || AccountRef::new("411", "Clients");
    let banks = || AccountRef::new("521", "Banques");
    let cash = || AccountRef::new("571", "Caisse");
    let suspense = || AccountRef::new("471", "Comptes d'attente");
    let vat = || AccountRef::new("445", "État, TVA récupérable");

    Catalog {
        journal_types: vec![
            journal(
                JournalType::Bank,
                "Banque",
                "Mouvements des comptes bancaires",
                "BQE",
                banks(),
                vec![suppliers(), customers(), AccountRef::new("627", "Services bancaires")],
                true,
                false,
            ),
            journal(
                JournalType::Purchase,
                "Achats",
                "Factures et avoirs fournisseurs",
                "ACH",
                AccountRef::new("601", "Achats de marchandises"),
                vec![suppliers(), banks(), cash()],
                true,
                true,
            ),
            journal(
                JournalType::Sales,
                "Ventes",
                "Factures et avoirs clients",
                "VTE",
                AccountRef::new("701", "Ventes de marchandises"),
                vec![customers(), banks(), cash()],
                true,
                true,
            ),
            journal(
                JournalType::Cash,
                "Caisse",
                "Encaissements et décaissements en espèces",
                "CAI",
                cash(),
                vec![suppliers(), customers(), banks()],
                false,
                false,
            ),
            journal(
                JournalType::General,
                "Opérations diverses",
                "Régularisations, à-nouveaux et écritures d'inventaire",
                "ODV",
                suspense(),
                vec![suspense(), banks()],
                false,
                false,
            ),
        ],
        tax_codes: vec![
            TaxCodeConfig {
                code: "N16".to_string(),
                label: "TVA 16 %".to_string(),
                rate: Decimal::new(16, 0),
                account: Some(vat()),
            },
            TaxCodeConfig {
                code: "R8".to_string(),
                label: "TVA 8 %".to_string(),
                rate: Decimal::new(8, 0),
                account: Some(vat()),
            },
            TaxCodeConfig {
                code: "EXO".to_string(),
                label: "Exonéré".to_string(),
                rate: Decimal::ZERO,
                account: None,
            },
        ],
    }
}
