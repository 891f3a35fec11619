use std::io::Write;

use payrun_types::{Amount, Timestamp};
use xml::{writer::XmlEvent, EventWriter};

use crate::{
    transaction::{PaymentBatch, Transaction},
    Schema, SepaError, ToXml,
};

/// What every transfer document kind has to provide.
pub trait TransferDocument {
    /// Whether this document kind may be expressed in `schema`.
    fn supports_schema(schema: Schema) -> bool;

    /// Checks that every mandatory field is set, failing on the first
    /// missing one in a fixed order.
    fn check_mandatory_data(&self) -> Result<(), SepaError>;

    /// Validates, assembles and serializes the whole document to `writer`.
    fn generate<W: Write>(&self, writer: W) -> Result<(), SepaError>;
}

/// Message identity and transaction population shared by every document
/// kind: who sends it, when, under which schema, and what is in it.
#[derive(Debug, Clone, Default)]
pub(crate) struct MessageInfo {
    pub(crate) message_id: Option<String>,
    pub(crate) payment_information_id: Option<String>,
    pub(crate) creation_date_time: Timestamp,
    pub(crate) schema: Schema,
    pub(crate) initiating_party_name: Option<String>,
    pub(crate) initiating_party_id: Option<String>,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) batches: Vec<PaymentBatch>,
}

impl MessageInfo {
    /// The checks shared by all document kinds, in order: message id first,
    /// then the initiating party name. Creation time and schema cannot be
    /// absent by construction.
    pub(crate) fn check_base_mandatory(&self) -> Result<(), SepaError> {
        if self.message_id.as_deref().map_or(true, str::is_empty) {
            return Err(SepaError::MandatoryFieldMissing("message id"));
        }
        if self
            .initiating_party_name
            .as_deref()
            .map_or(true, str::is_empty)
        {
            return Err(SepaError::MandatoryFieldMissing("initiating party name"));
        }
        Ok(())
    }

    /// Total count over the population generation will walk: all batches
    /// when any exist, else the flat list.
    pub(crate) fn total_number_of_transactions(&self) -> u32 {
        if self.batches.is_empty() {
            self.transactions.len() as u32
        } else {
            self.batches.iter().map(PaymentBatch::number_of_transactions).sum()
        }
    }

    pub(crate) fn total_control_sum(&self) -> Amount {
        if self.batches.is_empty() {
            self.transactions.iter().map(Transaction::amount).sum()
        } else {
            self.batches.iter().map(PaymentBatch::control_sum).sum()
        }
    }

    /// `PmtInfId` falls back to the message id when no dedicated payment
    /// information id was set.
    pub(crate) fn effective_payment_information_id(&self) -> String {
        self.payment_information_id
            .clone()
            .or_else(|| self.message_id.clone())
            .unwrap_or_default()
    }
}

/// Pre-formatted `GrpHdr` contents.
pub(crate) struct HeaderString {
    pub(crate) message_id: String,
    pub(crate) creation_date_time: String,
    pub(crate) number_of_transactions: String,
    pub(crate) control_sum: String,
    pub(crate) initiating_party_name: Option<String>,
    pub(crate) initiating_party_id: Option<String>,
}

impl From<&MessageInfo> for HeaderString {
    fn from(value: &MessageInfo) -> Self {
        Self {
            message_id: value.message_id.clone().unwrap_or_default(),
            creation_date_time: value.creation_date_time.to_string(),
            number_of_transactions: value.total_number_of_transactions().to_string(),
            control_sum: value.total_control_sum().xml_string(),
            initiating_party_name: value
                .initiating_party_name
                .clone()
                .filter(|name| !name.is_empty()),
            initiating_party_id: value
                .initiating_party_id
                .clone()
                .filter(|id| !id.is_empty()),
        }
    }
}

impl ToXml for HeaderString {
    fn to_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![
            XmlEvent::start_element("GrpHdr").into(),
            XmlEvent::start_element("MsgId").into(),
            XmlEvent::characters(&self.message_id),
            XmlEvent::end_element().into(),
            XmlEvent::start_element("CreDtTm").into(),
            XmlEvent::characters(&self.creation_date_time),
            XmlEvent::end_element().into(),
            XmlEvent::start_element("NbOfTxs").into(),
            XmlEvent::characters(&self.number_of_transactions),
            XmlEvent::end_element().into(),
            XmlEvent::start_element("CtrlSum").into(),
            XmlEvent::characters(&self.control_sum),
            XmlEvent::end_element().into(),
        ];
        if self.initiating_party_name.is_some() || self.initiating_party_id.is_some() {
            v.push(XmlEvent::start_element("InitgPty").into());
            if let Some(name) = &self.initiating_party_name {
                v.push(XmlEvent::start_element("Nm").into());
                v.push(XmlEvent::characters(name));
                v.push(XmlEvent::end_element().into());
            }
            if let Some(id) = &self.initiating_party_id {
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
        }
        v.push(XmlEvent::end_element().into());
        v
    }
}

/// An assembled document tree, ready to serialize. The payment information
/// block type is supplied by the concrete document kind.
pub struct DocumentString<P> {
    pub(crate) schema_urn: String,
    pub(crate) message_root: &'static str,
    pub(crate) header: HeaderString,
    pub(crate) payment_information: Vec<P>,
}

impl<P: ToXml> ToXml for DocumentString<P> {
    fn to_xml(&self) -> Vec<XmlEvent> {
        let mut v = vec![
            XmlEvent::start_element("Document")
                .default_ns(self.schema_urn.as_str())
                .ns("xsi", "http://www.w3.org/2001/XMLSchema-instance")
                .into(),
            XmlEvent::start_element(self.message_root).into(),
        ];
        v.extend(self.header.to_xml());
        for payment_information in &self.payment_information {
            v.extend(payment_information.to_xml());
        }
        v.push(XmlEvent::end_element().into());
        v.push(XmlEvent::end_element().into());
        v
    }
}

impl<P: ToXml> DocumentString<P> {
    /// Serializes the tree to `writer`, XML declaration included.
    pub fn write<W: Write>(&self, writer: W) -> Result<(), SepaError> {
        let mut writer = EventWriter::new(writer);
        self.write_xml(&mut writer)?;
        Ok(())
    }

    fn write_xml<W: Write>(&self, writer: &mut EventWriter<W>) -> xml::writer::Result<()> {
        for event in self.to_xml() {
            writer.write(event)?;
        }
        writer.inner_mut().flush()?;
        Ok(())
    }
}
