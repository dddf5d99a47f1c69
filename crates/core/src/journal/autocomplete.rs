//! Auto-completion of journal entries.
//!
//! Starting from the main line the user typed, the assistant proposes a tax
//! line and a balancing counterpart line. The counterpart account is only a
//! guess taken from the journal's candidate list: it stays unconfirmed until
//! the caller confirms or overrides it.

use std::sync::Arc;

use grandlivre_shared::types::percentage_of;
use serde::Serialize;

use super::catalog::{AccountRef, Catalog};
use super::types::{JournalLine, JournalType};

/// Options driving an auto-completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoCompleteOptions {
    /// Journal the entry belongs to.
    pub journal_type: JournalType,
    /// Tax code to apply to the main amount.
    pub tax_code: Option<String>,
    /// Counterpart account already chosen by the user.
    pub counterpart_account: Option<String>,
}

impl AutoCompleteOptions {
    /// Options for `journal_type` with no tax and no chosen counterpart.
    #[must_use]
    pub fn new(journal_type: JournalType) -> Self {
        Self {
            journal_type,
            tax_code: None,
            counterpart_account: None,
        }
    }

    /// Applies `tax_code` to the main amount.
    #[must_use]
    pub fn with_tax_code(mut self, tax_code: impl Into<String>) -> Self {
        self.tax_code = Some(tax_code.into());
        self
    }

    /// Posts the counterpart to `account` instead of the first candidate.
    #[must_use]
    pub fn with_counterpart(mut self, account: impl Into<String>) -> Self {
        self.counterpart_account = Some(account.into());
        self
    }
}

/// The counterpart account decision attached to a completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterpartProposal {
    /// Index of the counterpart line in [`Completion::lines`].
    pub line_index: usize,
    /// Account currently posted on the counterpart line.
    pub account: AccountRef,
    /// Every candidate the journal type offers.
    pub candidates: Vec<AccountRef>,
    /// False while the account is the assistant's guess.
    pub confirmed: bool,
}

/// Lines proposed by the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Main line first, then tax line if any, then counterpart line.
    pub lines: Vec<JournalLine>,
    /// Counterpart decision; `None` when nothing was generated.
    pub counterpart: Option<CounterpartProposal>,
}

impl Completion {
    fn main_only(main: &JournalLine) -> Self {
        Self {
            lines: vec![main.clone()],
            counterpart: None,
        }
    }

    /// Returns true while the counterpart account still awaits confirmation.
    #[must_use]
    pub fn requires_confirmation(&self) -> bool {
        self.counterpart
            .as_ref()
            .is_some_and(|proposal| !proposal.confirmed)
    }

    /// Confirms `account` as the counterpart, rewriting the counterpart line.
    ///
    /// Returns false when the completion has no counterpart line.
    pub fn confirm_counterpart(&mut self, account: AccountRef) -> bool {
        let Some(proposal) = self.counterpart.as_mut() else {
            return false;
        };
        let Some(line) = self.lines.get_mut(proposal.line_index) else {
            return false;
        };
        line.account_code = Some(account.code.clone());
        line.account_name = Some(account.name.clone());
        proposal.account = account;
        proposal.confirmed = true;
        true
    }

    /// Consumes the completion, keeping only the lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<JournalLine> {
        self.lines
    }
}

/// Proposes tax and counterpart lines from the catalog.
#[derive(Debug, Clone)]
pub struct AutoCompleteAssistant {
    catalog: Arc<Catalog>,
}

impl Default for AutoCompleteAssistant {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl AutoCompleteAssistant {
    /// Creates an assistant reading `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Completes an entry around `main`.
    ///
    /// The tax line (amount × rate / 100) sits on the same side as the main
    /// line; the counterpart line sits on the opposite side for main + tax.
    /// A main line without a positive amount is returned alone, as is one
    /// whose tax or total would overflow.
    #[must_use]
    pub fn complete(&self, main: &JournalLine, options: &AutoCompleteOptions) -> Completion {
        let Some((side, amount)) = main.posted_side() else {
            return Completion::main_only(main);
        };

        let mut lines = vec![main.clone()];
        let mut total = amount;

        let tax = options
            .tax_code
            .as_deref()
            .and_then(|code| self.catalog.tax_code(code))
            .and_then(|tax| tax.account.as_ref().map(|account| (tax, account)));
        if let Some((tax, account)) = tax {
            let Some((tax_amount, with_tax)) = percentage_of(amount, tax.rate)
                .and_then(|tax_amount| Some((tax_amount, total.checked_add(tax_amount)?)))
            else {
                tracing::warn!(%amount, tax_code = %tax.code, "Amount too large to complete");
                return Completion::main_only(main);
            };
            total = with_tax;
            lines.push(
                JournalLine::on_side(side, account.code.clone(), tax_amount)
                    .with_account_name(account.name.clone())
                    .with_description(tax.label.clone())
                    .with_tax_code(tax.code.clone()),
            );
        }

        let config = self.catalog.journal_type(options.journal_type);
        let candidates = config.counterpart_accounts.clone();
        let (account, confirmed) = match options.counterpart_account.as_deref() {
            Some(code) => (self.resolve_account(code, &candidates), true),
            None => (candidates[0].clone(), false),
        };

        let mut counterpart = JournalLine::on_side(side.opposite(), account.code.clone(), total)
            .with_account_name(account.name.clone());
        counterpart.description.clone_from(&main.description);
        lines.push(counterpart);

        tracing::debug!(
            journal_type = %options.journal_type,
            account = %account.code,
            confirmed,
            lines = lines.len(),
            "Proposed entry completion"
        );

        Completion {
            counterpart: Some(CounterpartProposal {
                line_index: lines.len() - 1,
                account,
                candidates,
                confirmed,
            }),
            lines,
        }
    }

    fn resolve_account(&self, code: &str, candidates: &[AccountRef]) -> AccountRef {
        let code = code.trim();
        candidates
            .iter()
            .find(|candidate| candidate.code == code)
            .or_else(|| self.catalog.account(code))
            .cloned()
            .unwrap_or_else(|| AccountRef::new(code, code))
    }
}
