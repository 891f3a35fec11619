use std::io::Write;

use payrun_types::{Address, Amount, Date, IbanData, Timestamp};

use crate::{
    document::{DocumentString, HeaderString, MessageInfo, TransferDocument},
    transaction::{PaymentBatch, Transaction},
    Schema, SepaError,
};

use self::transfer_gen::PaymentInformationString;

mod transfer_gen;

/// Who pays the transfer fees. On the wire this is `ChrgBr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeBearer {
    /// All fees borne by the debtor (`DEBT`).
    #[default]
    Debtor,
    /// All fees borne by the creditor (`CRED`).
    Creditor,
    /// Each side pays its own bank (`SHAR`).
    Shared,
    /// Fees follow the agreed service level (`SLEV`).
    FollowServiceLevel,
}

impl ChargeBearer {
    pub fn code(&self) -> &'static str {
        match self {
            ChargeBearer::Debtor => "DEBT",
            ChargeBearer::Creditor => "CRED",
            ChargeBearer::Shared => "SHAR",
            ChargeBearer::FollowServiceLevel => "SLEV",
        }
    }
}

/// The paying party: account holder name, externally checked account data
/// and optional postal addresses for the holder and their bank.
#[derive(Debug, Clone, PartialEq)]
pub struct Debtor {
    name: String,
    iban_data: IbanData,
    postal_address: Option<Address>,
    agent_address: Option<Address>,
}

impl Debtor {
    pub fn new(name: impl ToString, iban_data: IbanData) -> Self {
        Self {
            name: name.to_string(),
            iban_data,
            postal_address: None,
            agent_address: None,
        }
    }

    pub fn with_postal_address(mut self, address: Address) -> Self {
        self.postal_address = Some(address);
        self
    }

    pub fn with_agent_address(mut self, address: Address) -> Self {
        self.agent_address = Some(address);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn iban_data(&self) -> &IbanData {
        &self.iban_data
    }

    pub fn postal_address(&self) -> Option<&Address> {
        self.postal_address.as_ref()
    }

    pub fn agent_address(&self) -> Option<&Address> {
        self.agent_address.as_ref()
    }
}

/// One pain.001 customer credit transfer initiation message in the making.
///
/// Transactions go either into the flat list or into per-date batches; as
/// soon as any batch exists, generation walks the batches and ignores the
/// flat list entirely.
#[derive(Debug, Clone)]
pub struct CreditTransferDocument {
    info: MessageInfo,
    debtor: Option<Debtor>,
    debtor_currency: String,
    international: bool,
    charge_bearer: ChargeBearer,
    local_instrument: Option<String>,
    category_purpose: Option<String>,
    requested_execution_date: Date,
}

impl CreditTransferDocument {
    /// An empty document with the construction defaults: EUR account
    /// currency, schema pain.001.001.03, domestic, charge bearer `DEBT`,
    /// execution today, created now.
    pub fn new() -> Self {
        Self {
            info: MessageInfo::default(),
            debtor: None,
            debtor_currency: "EUR".to_string(),
            international: false,
            charge_bearer: ChargeBearer::default(),
            local_instrument: None,
            category_purpose: None,
            requested_execution_date: Date::today(),
        }
    }

    pub fn set_message_id(&mut self, id: impl ToString) {
        self.info.message_id = Some(id.to_string());
    }

    /// Without an explicit payment information id, `PmtInfId` falls back to
    /// the message id.
    pub fn set_payment_information_id(&mut self, id: impl ToString) {
        self.info.payment_information_id = Some(id.to_string());
    }

    pub fn set_creation_date_time(&mut self, when: Timestamp) {
        self.info.creation_date_time = when;
    }

    pub fn set_initiating_party_name(&mut self, name: impl ToString) {
        self.info.initiating_party_name = Some(name.to_string());
    }

    /// Organisation id of the initiating party, also stamped into the
    /// debtor block.
    pub fn set_initiating_party_id(&mut self, id: impl ToString) {
        self.info.initiating_party_id = Some(id.to_string());
    }

    pub fn set_schema(&mut self, schema: Schema) -> Result<(), SepaError> {
        if !Self::supports_schema(schema) {
            return Err(SepaError::UnsupportedSchema(schema.to_string()));
        }
        self.info.schema = schema;
        Ok(())
    }

    /// Attaches the paying party. Fails right here, never at generation,
    /// when the IBAN data reports itself invalid or carries no BIC.
    pub fn set_debtor(&mut self, debtor: Debtor) -> Result<(), SepaError> {
        if !debtor.iban_data().is_valid() {
            return Err(SepaError::InvalidDebtor(format!(
                "IBAN {} failed validation",
                debtor.iban_data().iban()
            )));
        }
        if !debtor.iban_data().has_known_bic() {
            return Err(SepaError::InvalidDebtor(format!(
                "no BIC known for IBAN {}",
                debtor.iban_data().iban()
            )));
        }
        self.debtor = Some(debtor);
        Ok(())
    }

    pub fn set_debtor_currency(&mut self, currency: impl ToString) {
        self.debtor_currency = currency.to_string();
    }

    /// Switches between SEPA (domestic) and international emission rules.
    pub fn set_international(&mut self, international: bool) {
        self.international = international;
    }

    /// Only honored on international documents; domestic output always says
    /// `SLEV`.
    pub fn set_charge_bearer(&mut self, charge_bearer: ChargeBearer) {
        self.charge_bearer = charge_bearer;
    }

    pub fn set_local_instrument(&mut self, code: impl ToString) {
        self.local_instrument = Some(code.to_string());
    }

    pub fn set_category_purpose(&mut self, code: impl ToString) {
        self.category_purpose = Some(code.to_string());
    }

    /// Execution date for the unbatched flat list; batches carry their own.
    pub fn set_requested_execution_date(&mut self, date: Date) {
        self.requested_execution_date = date;
    }

    /// Appends a copy of `transaction` to the flat list.
    pub fn add_credit_transfer(&mut self, transaction: &Transaction) {
        self.info.transactions.push(transaction.clone());
    }

    /// Routes a copy of `transaction` into the batch executing on `date`,
    /// creating that batch when absent. One batch per distinct date; callers
    /// that want several batches on the same date pass explicit values to
    /// [`CreditTransferDocument::add_batch`].
    pub fn add_credit_transfer_on(&mut self, transaction: &Transaction, date: Date) {
        if let Some(batch) = self
            .info
            .batches
            .iter_mut()
            .find(|batch| batch.execution_date() == date)
        {
            batch.add_transaction(transaction);
        } else {
            let mut batch = PaymentBatch::new(date);
            batch.add_transaction(transaction);
            self.info.batches.push(batch);
        }
    }

    pub fn add_batch(&mut self, batch: PaymentBatch) {
        self.info.batches.push(batch);
    }

    pub fn message_id(&self) -> Option<&str> {
        self.info.message_id.as_deref()
    }

    pub fn schema(&self) -> Schema {
        self.info.schema
    }

    pub fn debtor(&self) -> Option<&Debtor> {
        self.debtor.as_ref()
    }

    pub fn is_international(&self) -> bool {
        self.international
    }

    pub fn charge_bearer(&self) -> ChargeBearer {
        self.charge_bearer
    }

    pub fn requested_execution_date(&self) -> Date {
        self.requested_execution_date
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.info.transactions
    }

    pub fn batches(&self) -> &[PaymentBatch] {
        &self.info.batches
    }

    /// Transaction count over the population generation will walk.
    pub fn number_of_transactions(&self) -> u32 {
        self.info.total_number_of_transactions()
    }

    pub fn control_sum(&self) -> Amount {
        self.info.total_control_sum()
    }

    /// Validates and assembles the document tree without serializing it.
    pub fn to_xml_doc(&self) -> Result<DocumentString<PaymentInformationString>, SepaError> {
        self.check_mandatory_data()?;
        let debtor = self
            .debtor
            .as_ref()
            .ok_or(SepaError::MandatoryFieldMissing("debtor"))?;
        let payment_information = if self.info.batches.is_empty() {
            vec![PaymentInformationString::from_flat(self, debtor)]
        } else {
            self.info
                .batches
                .iter()
                .map(|batch| PaymentInformationString::from_batch(self, debtor, batch))
                .collect()
        };
        Ok(DocumentString {
            schema_urn: self.info.schema.urn(),
            message_root: "CstmrCdtTrfInitn",
            header: HeaderString::from(&self.info),
            payment_information,
        })
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<(), SepaError> {
        self.to_xml_doc()?.write(writer)
    }

    pub fn to_xml_string(&self) -> Result<String, SepaError> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

impl Default for CreditTransferDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferDocument for CreditTransferDocument {
    fn supports_schema(schema: Schema) -> bool {
        matches!(schema, Schema::Pain00100103 | Schema::Pain00100104)
    }

    fn check_mandatory_data(&self) -> Result<(), SepaError> {
        self.info.check_base_mandatory()?;
        if self.debtor.is_none() {
            return Err(SepaError::MandatoryFieldMissing("debtor"));
        }
        Ok(())
    }

    fn generate<W: Write>(&self, writer: W) -> Result<(), SepaError> {
        self.write(writer)
    }
}

#[cfg(test)]
mod tests {
    use payrun_types::{Amount, Date, IbanData, Timestamp};

    use crate::{
        AgentInstruction, ChargeBearer, CreditTransferDocument, Creditor, Debtor, Schema,
        SepaError, Transaction, TransferDocument,
    };

    fn debtor() -> Debtor {
        Debtor::new(
            "Acme Payments",
            IbanData::valid("FR1420041010050500013M02606").with_bic("PSSTFRPPSCE"),
        )
    }

    fn transaction(amount: Amount, id: &str) -> Transaction {
        let creditor = Creditor::new(
            "Test Creditor",
            "FR1420041010050500013M02607",
            "PSSTFRPPSCE",
        );
        Transaction::new(creditor, amount, id).unwrap()
    }

    fn valid_document() -> CreditTransferDocument {
        let mut doc = CreditTransferDocument::new();
        doc.set_message_id("MSG-1");
        doc.set_initiating_party_name("Acme Payments");
        doc.set_creation_date_time(Timestamp::new(2023, 4, 20, 23, 24, 31).unwrap());
        doc.set_debtor(debtor()).unwrap();
        doc
    }

    #[test]
    fn defaults_test() {
        let doc = CreditTransferDocument::new();
        assert_eq!(doc.schema(), Schema::Pain00100103);
        assert!(!doc.is_international());
        assert_eq!(doc.charge_bearer(), ChargeBearer::Debtor);
        assert!(doc.debtor().is_none());
        assert_eq!(doc.number_of_transactions(), 0);
    }

    #[test]
    fn set_debtor_is_eager_test() {
        let mut doc = CreditTransferDocument::new();

        let bad_iban = Debtor::new("Acme Payments", IbanData::invalid("XX00").with_bic("ABC"));
        let err = doc.set_debtor(bad_iban).unwrap_err();
        assert!(matches!(err, SepaError::InvalidDebtor(_)));

        let no_bic = Debtor::new("Acme Payments", IbanData::valid("FR1420041010050500013M02606"));
        let err = doc.set_debtor(no_bic).unwrap_err();
        assert!(matches!(err, SepaError::InvalidDebtor(_)));

        assert!(doc.set_debtor(debtor()).is_ok());
    }

    #[test]
    fn missing_debtor_fails_at_generation_test() {
        let mut doc = CreditTransferDocument::new();
        doc.set_message_id("MSG-1");
        doc.set_initiating_party_name("Acme Payments");
        doc.add_credit_transfer(&transaction(Amount::from(10), "TX1"));

        let err = doc.check_mandatory_data().unwrap_err();
        assert!(matches!(err, SepaError::MandatoryFieldMissing("debtor")));
        let err = doc.to_xml_string().unwrap_err();
        assert!(matches!(err, SepaError::MandatoryFieldMissing("debtor")));
    }

    #[test]
    fn mandatory_check_order_test() {
        let mut doc = CreditTransferDocument::new();
        let err = doc.check_mandatory_data().unwrap_err();
        assert!(matches!(err, SepaError::MandatoryFieldMissing("message id")));

        doc.set_message_id("MSG-1");
        let err = doc.check_mandatory_data().unwrap_err();
        assert!(matches!(
            err,
            SepaError::MandatoryFieldMissing("initiating party name")
        ));
    }

    #[test]
    fn schema_restriction_test() {
        let mut doc = valid_document();
        let err = doc.set_schema(Schema::Pain00800102).unwrap_err();
        assert!(matches!(err, SepaError::UnsupportedSchema(s) if s == "pain.008.001.02"));
        assert_eq!(doc.schema(), Schema::Pain00100103);

        doc.set_schema(Schema::Pain00100104).unwrap();
        doc.add_credit_transfer(&transaction(Amount::from(10), "TX1"));
        let xml = doc.to_xml_string().unwrap();
        assert!(xml.contains(r#"xmlns="urn:iso:std:iso:20022:tech:xsd:pain.001.001.04""#));
    }

    #[test]
    fn single_transaction_round_trip_test() {
        let mut doc = valid_document();
        doc.add_credit_transfer(&transaction(Amount::from(100), "TX1"));

        let xml = doc.to_xml_string().unwrap();
        assert!(xml.contains(r#"xmlns="urn:iso:std:iso:20022:tech:xsd:pain.001.001.03""#));
        assert_eq!(xml.matches("<PmtInf>").count(), 1);
        assert_eq!(xml.matches("<NbOfTxs>1</NbOfTxs>").count(), 2);
        assert_eq!(xml.matches("<CtrlSum>100.00</CtrlSum>").count(), 2);
        assert_eq!(xml.matches("<CdtTrfTxInf>").count(), 1);
        assert!(xml.contains("<EndToEndId>TX1</EndToEndId>"));
        assert!(xml.contains(r#"<InstdAmt Ccy="EUR">100.00</InstdAmt>"#));
        assert!(xml.contains("<IBAN>FR1420041010050500013M02606</IBAN>"));
        assert!(xml.contains("<IBAN>FR1420041010050500013M02607</IBAN>"));
    }

    #[test]
    fn two_batches_totals_test() {
        let d1 = Date::new(2024, 6, 3).unwrap();
        let d2 = Date::new(2024, 6, 10).unwrap();
        let mut doc = valid_document();
        doc.add_credit_transfer_on(&transaction(Amount::from(10), "A"), d1);
        doc.add_credit_transfer_on(&transaction(Amount::from(20), "B"), d1);
        doc.add_credit_transfer_on(&transaction(Amount::from(30), "C"), d2);
        doc.add_credit_transfer_on(&transaction(Amount::from(40), "D"), d2);

        assert_eq!(doc.batches().len(), 2);
        assert_eq!(doc.number_of_transactions(), 4);
        assert_eq!(doc.control_sum().xml_string(), "100.00");

        let xml = doc.to_xml_string().unwrap();
        assert_eq!(xml.matches("<PmtInf>").count(), 2);
        assert!(xml.contains("<NbOfTxs>4</NbOfTxs>"));
        assert!(xml.contains("<CtrlSum>100.00</CtrlSum>"));
        assert!(xml.contains("<CtrlSum>30.00</CtrlSum>"));
        assert!(xml.contains("<CtrlSum>70.00</CtrlSum>"));
        assert!(xml.contains("<ReqdExctnDt>2024-06-03</ReqdExctnDt>"));
        assert!(xml.contains("<ReqdExctnDt>2024-06-10</ReqdExctnDt>"));
    }

    #[test]
    fn batches_hide_flat_list_test() {
        let mut doc = valid_document();
        doc.add_credit_transfer(&transaction(Amount::from(999), "FLAT"));
        doc.add_credit_transfer_on(&transaction(Amount::from(10), "A"), Date::today());

        assert_eq!(doc.number_of_transactions(), 1);
        let xml = doc.to_xml_string().unwrap();
        assert!(!xml.contains("FLAT"));
        assert!(xml.contains("<EndToEndId>A</EndToEndId>"));
    }

    #[test]
    fn same_date_merges_into_one_batch_test() {
        let date = Date::new(2024, 6, 3).unwrap();
        let mut doc = valid_document();
        doc.add_credit_transfer_on(&transaction(Amount::from(10), "A"), date);
        doc.add_credit_transfer_on(&transaction(Amount::from(20), "B"), date);

        assert_eq!(doc.batches().len(), 1);
        assert_eq!(doc.batches()[0].number_of_transactions(), 2);
    }

    #[test]
    fn domestic_always_slev_test() {
        let mut doc = valid_document();
        doc.set_charge_bearer(ChargeBearer::Shared);
        doc.add_credit_transfer(&transaction(Amount::from(10), "TX1"));

        let xml = doc.to_xml_string().unwrap();
        assert!(xml.contains("<ChrgBr>SLEV</ChrgBr>"));
        assert!(!xml.contains("SHAR"));
        assert!(xml.contains("<SvcLvl><Cd>SEPA</Cd></SvcLvl>"));
        assert!(!xml.contains("InstrPrty"));
    }

    #[test]
    fn international_charge_bearer_test() {
        let mut doc = valid_document();
        doc.set_international(true);
        doc.set_charge_bearer(ChargeBearer::Shared);
        doc.add_credit_transfer(&transaction(Amount::from(10), "TX1"));

        let xml = doc.to_xml_string().unwrap();
        assert!(xml.contains("<ChrgBr>SHAR</ChrgBr>"));
        assert!(xml.contains("<InstrPrty>NORM</InstrPrty>"));
        assert!(!xml.contains("SvcLvl"));
    }

    #[test]
    fn international_only_fields_test() {
        let international_extras = transaction(Amount::from(10), "TX1")
            .with_regulatory_reporting("150")
            .with_agent_instruction(AgentInstruction::new("CHQB").with_comment("hold at counter"));

        let mut doc = valid_document();
        doc.add_credit_transfer(&international_extras);
        let xml = doc.to_xml_string().unwrap();
        assert!(!xml.contains("InstrForCdtrAgt"));
        assert!(!xml.contains("RgltryRptg"));

        doc.set_international(true);
        let xml = doc.to_xml_string().unwrap();
        assert!(xml.contains(
            "<InstrForCdtrAgt><Cd>CHQB</Cd><InstrInf>hold at counter</InstrInf></InstrForCdtrAgt>"
        ));
        assert!(xml.contains("<RgltryRptg><Dtls><Cd>150</Cd></Dtls></RgltryRptg>"));
    }

    #[test]
    fn flat_list_uses_document_date_test() {
        let mut doc = valid_document();
        doc.set_requested_execution_date(Date::new(2024, 7, 1).unwrap());
        doc.add_credit_transfer(&transaction(Amount::from(10), "TX1"));

        let xml = doc.to_xml_string().unwrap();
        assert!(xml.contains("<ReqdExctnDt>2024-07-01</ReqdExctnDt>"));
    }

    #[test]
    fn payment_information_id_in_output_test() {
        let mut doc = valid_document();
        doc.add_credit_transfer(&transaction(Amount::from(10), "TX1"));
        let xml = doc.to_xml_string().unwrap();
        assert!(xml.contains("<PmtInfId>MSG-1</PmtInfId>"));

        doc.set_payment_information_id("PMT-7");
        let xml = doc.to_xml_string().unwrap();
        assert!(xml.contains("<PmtInfId>PMT-7</PmtInfId>"));
    }

    #[test]
    fn generation_is_repeatable_test() {
        let mut doc = valid_document();
        doc.add_credit_transfer(&transaction(Amount::from(10), "TX1"));

        let first = doc.to_xml_string().unwrap();
        let second = doc.to_xml_string().unwrap();
        assert_eq!(first, second);

        let mut out = Vec::new();
        doc.generate(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), first);
    }
}
