use payrun_types::{Address, Amount, Date};

use crate::SepaError;

/// The receiving party of one transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Creditor {
    name: String,
    iban: String,
    bic: String,
    address: Option<Address>,
}

impl Creditor {
    pub fn new(name: impl ToString, iban: impl ToString, bic: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            iban: iban.to_string(),
            bic: bic.to_string(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn iban(&self) -> &str {
        &self.iban
    }

    pub fn bic(&self) -> &str {
        &self.bic
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }
}

/// An `InstrForCdtrAgt` payload: a code for the creditor's bank plus an
/// optional free-text comment. Only ever emitted on international transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInstruction {
    code: String,
    comment: Option<String>,
}

impl AgentInstruction {
    pub fn new(code: impl ToString) -> Self {
        Self {
            code: code.to_string(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl ToString) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// One credit transfer leg: who gets how much, and under which references.
///
/// Construction enforces the invariants a bank would bounce the file over:
/// the amount must be positive, the end-to-end id non-empty and the creditor
/// must carry an IBAN.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    instruction_id: Option<String>,
    end_to_end_id: String,
    amount: Amount,
    currency: String,
    creditor: Creditor,
    purpose_code: Option<String>,
    remittance_info: String,
    regulatory_reporting_code: Option<String>,
    agent_instruction: Option<AgentInstruction>,
}

impl Transaction {
    pub fn new(
        creditor: Creditor,
        amount: Amount,
        end_to_end_id: impl ToString,
    ) -> Result<Self, SepaError> {
        let end_to_end_id = end_to_end_id.to_string();
        if !amount.is_positive() {
            return Err(SepaError::InvalidTransaction(format!(
                "amount must be positive, got {}",
                amount.xml_string()
            )));
        }
        if end_to_end_id.is_empty() {
            return Err(SepaError::InvalidTransaction(
                "end-to-end id is empty".to_string(),
            ));
        }
        if creditor.iban().is_empty() {
            return Err(SepaError::InvalidTransaction(
                "creditor IBAN is empty".to_string(),
            ));
        }
        Ok(Self {
            instruction_id: None,
            end_to_end_id,
            amount,
            currency: "EUR".to_string(),
            creditor,
            purpose_code: None,
            remittance_info: String::new(),
            regulatory_reporting_code: None,
            agent_instruction: None,
        })
    }

    pub fn with_instruction_id(mut self, id: impl ToString) -> Self {
        self.instruction_id = Some(id.to_string());
        self
    }

    pub fn with_currency(mut self, currency: impl ToString) -> Self {
        self.currency = currency.to_string();
        self
    }

    pub fn with_purpose_code(mut self, code: impl ToString) -> Self {
        self.purpose_code = Some(code.to_string());
        self
    }

    pub fn with_remittance_info(mut self, text: impl ToString) -> Self {
        self.remittance_info = text.to_string();
        self
    }

    pub fn with_regulatory_reporting(mut self, code: impl ToString) -> Self {
        self.regulatory_reporting_code = Some(code.to_string());
        self
    }

    pub fn with_agent_instruction(mut self, instruction: AgentInstruction) -> Self {
        self.agent_instruction = Some(instruction);
        self
    }

    pub fn set_remittance_info(&mut self, text: impl ToString) {
        self.remittance_info = text.to_string();
    }

    pub fn instruction_id(&self) -> Option<&str> {
        self.instruction_id.as_deref()
    }

    pub fn end_to_end_id(&self) -> &str {
        &self.end_to_end_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn creditor(&self) -> &Creditor {
        &self.creditor
    }

    pub fn purpose_code(&self) -> Option<&str> {
        self.purpose_code.as_deref()
    }

    pub fn remittance_info(&self) -> &str {
        &self.remittance_info
    }

    pub fn regulatory_reporting_code(&self) -> Option<&str> {
        self.regulatory_reporting_code.as_deref()
    }

    pub fn agent_instruction(&self) -> Option<&AgentInstruction> {
        self.agent_instruction.as_ref()
    }
}

/// An ordered group of transactions sharing one requested execution date.
/// Each batch becomes its own `PmtInf` block.
#[derive(Debug, Clone)]
pub struct PaymentBatch {
    execution_date: Date,
    transactions: Vec<Transaction>,
}

impl PaymentBatch {
    pub fn new(execution_date: Date) -> Self {
        Self {
            execution_date,
            transactions: Vec::new(),
        }
    }

    /// Appends a copy of `transaction`; the caller keeps its value and later
    /// changes to it do not reach the batch.
    pub fn add_transaction(&mut self, transaction: &Transaction) {
        self.transactions.push(transaction.clone());
    }

    pub fn execution_date(&self) -> Date {
        self.execution_date
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn number_of_transactions(&self) -> u32 {
        self.transactions.len() as u32
    }

    pub fn control_sum(&self) -> Amount {
        self.transactions.iter().map(Transaction::amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use payrun_types::{Amount, Date};

    use crate::{Creditor, PaymentBatch, SepaError, Transaction};

    fn creditor() -> Creditor {
        Creditor::new("Test Creditor", "NL91ABNA0417164300", "ABNANL2A")
    }

    #[test]
    fn construction_invariants_test() {
        let err = Transaction::new(creditor(), Amount::default(), "TX1").unwrap_err();
        assert!(matches!(err, SepaError::InvalidTransaction(_)));

        let err = Transaction::new(creditor(), Amount::from(10), "").unwrap_err();
        assert!(matches!(err, SepaError::InvalidTransaction(_)));

        let no_iban = Creditor::new("Test Creditor", "", "ABNANL2A");
        let err = Transaction::new(no_iban, Amount::from(10), "TX1").unwrap_err();
        assert!(matches!(err, SepaError::InvalidTransaction(_)));

        assert!(Transaction::new(creditor(), Amount::from(10), "TX1").is_ok());
    }

    #[test]
    fn transaction_defaults_test() {
        let transaction = Transaction::new(creditor(), Amount::from(10), "TX1").unwrap();
        assert_eq!(transaction.currency(), "EUR");
        assert_eq!(transaction.remittance_info(), "");
        assert!(transaction.instruction_id().is_none());
        assert!(transaction.agent_instruction().is_none());
    }

    #[test]
    fn clone_on_insert_test() {
        let mut transaction = Transaction::new(creditor(), Amount::from(10), "TX1")
            .unwrap()
            .with_remittance_info("before");
        let mut batch = PaymentBatch::new(Date::today());
        batch.add_transaction(&transaction);

        transaction.set_remittance_info("after");
        assert_eq!(batch.transactions()[0].remittance_info(), "before");
        assert_eq!(transaction.remittance_info(), "after");
    }

    #[test]
    fn batch_totals_test() {
        let mut batch = PaymentBatch::new(Date::today());
        assert_eq!(batch.number_of_transactions(), 0);
        assert_eq!(batch.control_sum(), Amount::default());

        let a = Transaction::new(creditor(), Amount::new(10, 25), "A").unwrap();
        let b = Transaction::new(creditor(), Amount::new(4, 80), "B").unwrap();
        batch.add_transaction(&a);
        batch.add_transaction(&b);
        assert_eq!(batch.number_of_transactions(), 2);
        assert_eq!(batch.control_sum().xml_string(), "15.05");
        let order: Vec<&str> = batch
            .transactions()
            .iter()
            .map(Transaction::end_to_end_id)
            .collect();
        assert_eq!(order, vec!["A", "B"]);
    }
}
