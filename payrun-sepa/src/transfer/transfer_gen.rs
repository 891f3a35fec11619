use payrun_types::{Address, Amount, Date};
use xml::writer::XmlEvent;

use crate::{
    transaction::{PaymentBatch, Transaction},
    ToXml,
};

use super::{CreditTransferDocument, Debtor};

/// Pre-formatted `PmtInf` block: one per batch, or a single one covering the
/// flat list. Every conditional on the wire is decided at construction.
pub struct PaymentInformationString {
    payment_information_id: String,
    number_of_transactions: String,
    control_sum: String,
    international: bool,
    local_instrument: Option<String>,
    category_purpose: Option<String>,
    execution_date: String,
    debtor_name: String,
    debtor_address: Option<AddressString>,
    debtor_organisation_id: Option<String>,
    debtor_iban: String,
    debtor_currency: String,
    debtor_bic: String,
    debtor_agent_address: Option<AddressString>,
    charge_bearer: &'static str,
    transactions: Vec<TransactionString>,
}

impl PaymentInformationString {
    pub(super) fn from_flat(doc: &CreditTransferDocument, debtor: &Debtor) -> Self {
        Self::build(
            doc,
            debtor,
            doc.requested_execution_date,
            &doc.info.transactions,
        )
    }

    pub(super) fn from_batch(
        doc: &CreditTransferDocument,
        debtor: &Debtor,
        batch: &PaymentBatch,
    ) -> Self {
        Self::build(doc, debtor, batch.execution_date(), batch.transactions())
    }

    fn build(
        doc: &CreditTransferDocument,
        debtor: &Debtor,
        execution_date: Date,
        transactions: &[Transaction],
    ) -> Self {
        let control_sum: Amount = transactions.iter().map(Transaction::amount).sum();
        Self {
            payment_information_id: doc.info.effective_payment_information_id(),
            number_of_transactions: transactions.len().to_string(),
            control_sum: control_sum.xml_string(),
            international: doc.international,
            local_instrument: doc.local_instrument.clone(),
            category_purpose: doc.category_purpose.clone(),
            execution_date: execution_date.to_string(),
            debtor_name: debtor.name().to_string(),
            debtor_address: debtor.postal_address().map(AddressString::from),
            debtor_organisation_id: doc.info.initiating_party_id.clone(),
            debtor_iban: debtor.iban_data().iban().to_string(),
            debtor_currency: doc.debtor_currency.clone(),
            debtor_bic: debtor.iban_data().bic().unwrap_or_default().to_string(),
            debtor_agent_address: debtor.agent_address().map(AddressString::from),
            // domestic transfers always follow the SEPA service level
            charge_bearer: if doc.international {
                doc.charge_bearer.code()
            } else {
                "SLEV"
            },
            transactions: transactions
                .iter()
                .map(|transaction| TransactionString::new(transaction, doc.international))
                .collect(),
        }
    }
}

impl ToXml for PaymentInformationString {
    fn to_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![
            XmlEvent::start_element("PmtInf").into(),
            XmlEvent::start_element("PmtInfId").into(),
            XmlEvent::characters(&self.payment_information_id),
            XmlEvent::end_element().into(),
            XmlEvent::start_element("PmtMtd").into(),
            XmlEvent::characters("TRF"),
            XmlEvent::end_element().into(),
            XmlEvent::start_element("NbOfTxs").into(),
            XmlEvent::characters(&self.number_of_transactions),
            XmlEvent::end_element().into(),
            XmlEvent::start_element("CtrlSum").into(),
            XmlEvent::characters(&self.control_sum),
            XmlEvent::end_element().into(),
            XmlEvent::start_element("PmtTpInf").into(),
        ];
        if self.international {
            v.push(XmlEvent::start_element("InstrPrty").into());
            v.push(XmlEvent::characters("NORM"));
            v.push(XmlEvent::end_element().into());
        } else {
            v.push(XmlEvent::start_element("SvcLvl").into());
            v.push(XmlEvent::start_element("Cd").into());
            v.push(XmlEvent::characters("SEPA"));
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
        }
        if let Some(code) = &self.local_instrument {
            v.push(XmlEvent::start_element("LclInstrm").into());
            v.push(XmlEvent::start_element("Cd").into());
            v.push(XmlEvent::characters(code));
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
        }
        if let Some(code) = &self.category_purpose {
            v.push(XmlEvent::start_element("CtgyPurp").into());
            v.push(XmlEvent::start_element("Cd").into());
            v.push(XmlEvent::characters(code));
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
        }
        v.push(XmlEvent::end_element().into());

        v.push(XmlEvent::start_element("ReqdExctnDt").into());
        v.push(XmlEvent::characters(&self.execution_date));
        v.push(XmlEvent::end_element().into());

        v.push(XmlEvent::start_element("Dbtr").into());
        v.push(XmlEvent::start_element("Nm").into());
        v.push(XmlEvent::characters(&self.debtor_name));
        v.push(XmlEvent::end_element().into());
        if let Some(address) = &self.debtor_address {
            v.extend(address.to_xml());
        }
        if let Some(id) = &self.debtor_organisation_id {
            v.push(XmlEvent::start_element("Id").into());
            v.push(XmlEvent::start_element("OrgId").into());
            v.push(XmlEvent::start_element("Othr").into());
            v.push(XmlEvent::start_element("Id").into());
            v.push(XmlEvent::characters(id));
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
        }
        v.push(XmlEvent::end_element().into());

        v.push(XmlEvent::start_element("DbtrAcct").into());
        v.push(XmlEvent::start_element("Id").into());
        v.push(XmlEvent::start_element("IBAN").into());
        v.push(XmlEvent::characters(&self.debtor_iban));
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::start_element("Ccy").into());
        v.push(XmlEvent::characters(&self.debtor_currency));
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());

        v.push(XmlEvent::start_element("DbtrAgt").into());
        v.push(XmlEvent::start_element("FinInstnId").into());
        v.push(XmlEvent::start_element("BIC").into());
        v.push(XmlEvent::characters(&self.debtor_bic));
        v.push(XmlEvent::end_element().into());
        if let Some(address) = &self.debtor_agent_address {
            v.extend(address.to_xml());
        }
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());

        v.push(XmlEvent::start_element("ChrgBr").into());
        v.push(XmlEvent::characters(self.charge_bearer));
        v.push(XmlEvent::end_element().into());

        for transaction in &self.transactions {
            v.extend(transaction.to_xml());
        }
        v.push(XmlEvent::end_element().into());
        v
    }
}

/// Pre-formatted `CdtTrfTxInf` block. Fields that only international
/// transfers may carry are dropped here when the document is domestic.
struct TransactionString {
    instruction_id: Option<String>,
    end_to_end_id: String,
    amount: String,
    currency: String,
    creditor_bic: String,
    creditor_name: String,
    creditor_address: Option<AddressString>,
    creditor_iban: String,
    agent_instruction: Option<AgentInstructionString>,
    purpose_code: Option<String>,
    regulatory_reporting_code: Option<String>,
    remittance_info: Option<String>,
}

struct AgentInstructionString {
    code: String,
    comment: Option<String>,
}

impl TransactionString {
    fn new(transaction: &Transaction, international: bool) -> Self {
        Self {
            instruction_id: transaction.instruction_id().map(str::to_string),
            end_to_end_id: transaction.end_to_end_id().to_string(),
            amount: transaction.amount().xml_string(),
            currency: transaction.currency().to_string(),
            creditor_bic: transaction.creditor().bic().to_string(),
            creditor_name: transaction.creditor().name().to_string(),
            creditor_address: transaction.creditor().address().map(AddressString::from),
            creditor_iban: transaction.creditor().iban().to_string(),
            agent_instruction: if international {
                transaction
                    .agent_instruction()
                    .map(|instruction| AgentInstructionString {
                        code: instruction.code().to_string(),
                        comment: instruction.comment().map(str::to_string),
                    })
            } else {
                None
            },
            purpose_code: transaction.purpose_code().map(str::to_string),
            regulatory_reporting_code: if international {
                transaction.regulatory_reporting_code().map(str::to_string)
            } else {
                None
            },
            remittance_info: if transaction.remittance_info().is_empty() {
                None
            } else {
                Some(transaction.remittance_info().to_string())
            },
        }
    }
}

impl ToXml for TransactionString {
    fn to_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![
            XmlEvent::start_element("CdtTrfTxInf").into(),
            XmlEvent::start_element("PmtId").into(),
        ];
        if let Some(id) = &self.instruction_id {
            v.push(XmlEvent::start_element("InstrId").into());
            v.push(XmlEvent::characters(id));
            v.push(XmlEvent::end_element().into());
        }
        v.push(XmlEvent::start_element("EndToEndId").into());
        v.push(XmlEvent::characters(&self.end_to_end_id));
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());

        v.push(XmlEvent::start_element("Amt").into());
        v.push(
            XmlEvent::start_element("InstdAmt")
                .attr("Ccy", &self.currency)
                .into(),
        );
        v.push(XmlEvent::characters(&self.amount));
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());

        v.push(XmlEvent::start_element("CdtrAgt").into());
        v.push(XmlEvent::start_element("FinInstnId").into());
        v.push(XmlEvent::start_element("BIC").into());
        v.push(XmlEvent::characters(&self.creditor_bic));
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());

        v.push(XmlEvent::start_element("Cdtr").into());
        v.push(XmlEvent::start_element("Nm").into());
        v.push(XmlEvent::characters(&self.creditor_name));
        v.push(XmlEvent::end_element().into());
        if let Some(address) = &self.creditor_address {
            v.extend(address.to_xml());
        }
        v.push(XmlEvent::end_element().into());

        v.push(XmlEvent::start_element("CdtrAcct").into());
        v.push(XmlEvent::start_element("Id").into());
        v.push(XmlEvent::start_element("IBAN").into());
        v.push(XmlEvent::characters(&self.creditor_iban));
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());

        if let Some(instruction) = &self.agent_instruction {
            v.push(XmlEvent::start_element("InstrForCdtrAgt").into());
            v.push(XmlEvent::start_element("Cd").into());
            v.push(XmlEvent::characters(&instruction.code));
            v.push(XmlEvent::end_element().into());
            if let Some(comment) = &instruction.comment {
                v.push(XmlEvent::start_element("InstrInf").into());
                v.push(XmlEvent::characters(comment));
                v.push(XmlEvent::end_element().into());
            }
            v.push(XmlEvent::end_element().into());
        }
        if let Some(code) = &self.purpose_code {
            v.push(XmlEvent::start_element("Purp").into());
            v.push(XmlEvent::start_element("Cd").into());
            v.push(XmlEvent::characters(code));
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
        }
        if let Some(code) = &self.regulatory_reporting_code {
            v.push(XmlEvent::start_element("RgltryRptg").into());
            v.push(XmlEvent::start_element("Dtls").into());
            v.push(XmlEvent::start_element("Cd").into());
            v.push(XmlEvent::characters(code));
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
        }
        if let Some(text) = &self.remittance_info {
            v.push(XmlEvent::start_element("RmtInf").into());
            v.push(XmlEvent::start_element("Ustrd").into());
            v.push(XmlEvent::characters(text));
            v.push(XmlEvent::end_element().into());
            v.push(XmlEvent::end_element().into());
        }
        v.push(XmlEvent::end_element().into());
        v
    }
}

/// `PstlAdr` contents: optional country code, then the address lines.
struct AddressString {
    country: Option<String>,
    lines: Vec<String>,
}

impl From<&Address> for AddressString {
    fn from(value: &Address) -> Self {
        Self {
            country: value.country.clone(),
            lines: value.lines().collect(),
        }
    }
}

impl ToXml for AddressString {
    fn to_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![XmlEvent::start_element("PstlAdr").into()];
        if let Some(country) = &self.country {
            v.push(XmlEvent::start_element("Ctry").into());
            v.push(XmlEvent::characters(country));
            v.push(XmlEvent::end_element().into());
        }
        for line in &self.lines {
            v.push(XmlEvent::start_element("AdrLine").into());
            v.push(XmlEvent::characters(line));
            v.push(XmlEvent::end_element().into());
        }
        v.push(XmlEvent::end_element().into());
        v
    }
}
