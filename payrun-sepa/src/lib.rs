mod document;
mod error;
mod schema;
mod transaction;
mod transfer;

pub use document::{DocumentString, TransferDocument};
pub use error::SepaError;
pub use schema::Schema;
pub use transaction::{AgentInstruction, Creditor, PaymentBatch, Transaction};
pub use transfer::{ChargeBearer, CreditTransferDocument, Debtor};

use payrun_types::IbanData;
use rand::{thread_rng, Rng};
use xml::writer::XmlEvent;

/// The company documents are stamped with: initiating party, debtor account
/// and the id scheme for fresh messages.
#[derive(Debug, Clone, Default)]
pub struct Originator {
    company_name: String,
    company_iban: String,
    company_bic: String,
    organisation_id: Option<String>,
}

impl Originator {
    pub fn new(name: impl ToString, iban: impl ToString, bic: impl ToString) -> Self {
        Self {
            company_name: name.to_string(),
            company_iban: iban.to_string(),
            company_bic: bic.to_string(),
            organisation_id: None,
        }
    }

    pub fn with_organisation_id(mut self, id: impl ToString) -> Self {
        self.organisation_id = Some(id.to_string());
        self
    }

    pub fn from_config(cfg: &payrun_config::CompanyConfig) -> Self {
        let originator = Self::new(&cfg.name, &cfg.iban, &cfg.bic);
        if cfg.organisation_id.is_empty() {
            originator
        } else {
            originator.with_organisation_id(&cfg.organisation_id)
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn organisation_id(&self) -> Option<&str> {
        self.organisation_id.as_deref()
    }

    /// Date plus a random suffix: `YYYYMMDD-0123456789abcdef`.
    pub fn new_message_id(&self) -> String {
        let id = thread_rng().gen::<u64>();
        format!("{}-{:0>16x}", chrono::Local::now().format("%Y%m%d"), id)
    }

    /// Company name plus a random suffix: `ACMEPAYMENTS-0123456789abcdef`.
    pub fn new_payment_information_id(&self) -> String {
        let id = thread_rng().gen::<u64>();
        format!(
            "{}-{:0>16x}",
            self.company_name.to_uppercase().replace([' ', '-'], ""),
            id
        )
    }

    /// This company as the paying party of a credit transfer.
    pub fn debtor(&self) -> Debtor {
        Debtor::new(
            &self.company_name,
            IbanData::valid(&self.company_iban).with_bic(&self.company_bic),
        )
    }

    /// A ready-to-fill document: fresh message id, this company as
    /// initiating party and debtor. Fails when the company account data is
    /// not good enough to act as debtor.
    pub fn new_credit_transfer_document(&self) -> Result<CreditTransferDocument, SepaError> {
        let mut doc = CreditTransferDocument::new();
        doc.set_message_id(self.new_message_id());
        doc.set_initiating_party_name(&self.company_name);
        if let Some(id) = &self.organisation_id {
            doc.set_initiating_party_id(id);
        }
        doc.set_debtor(self.debtor())?;
        Ok(doc)
    }
}

pub trait ToXml {
    fn to_xml(&self) -> Vec<XmlEvent>;
}
