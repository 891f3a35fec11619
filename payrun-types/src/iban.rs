use serde::{Deserialize, Serialize};

/// The outcome of an external IBAN check, together with the BIC that check
/// reported for the account's bank.
///
/// The engine itself never validates account numbers. Whatever produced this
/// value decides `valid`; the IBAN text is emitted on the wire verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbanData {
    iban: String,
    bic: Option<String>,
    valid: bool,
}

impl IbanData {
    /// Account data that passed the external check.
    pub fn valid(iban: impl ToString) -> Self {
        Self {
            iban: iban.to_string(),
            bic: None,
            valid: true,
        }
    }

    /// Account data that failed the external check.
    pub fn invalid(iban: impl ToString) -> Self {
        Self {
            iban: iban.to_string(),
            bic: None,
            valid: false,
        }
    }

    pub fn with_bic(mut self, bic: impl ToString) -> Self {
        self.bic = Some(bic.to_string());
        self
    }

    pub fn iban(&self) -> &str {
        &self.iban
    }

    pub fn bic(&self) -> Option<&str> {
        self.bic.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// True when the check resolved a usable, non-empty BIC.
    pub fn has_known_bic(&self) -> bool {
        self.bic.as_deref().is_some_and(|bic| !bic.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use crate::IbanData;

    #[test]
    fn known_bic_test() {
        let data = IbanData::valid("NL91ABNA0417164300").with_bic("ABNANL2A");
        assert!(data.is_valid());
        assert!(data.has_known_bic());
        assert_eq!(data.bic(), Some("ABNANL2A"));
    }

    #[test]
    fn missing_bic_test() {
        let data = IbanData::valid("NL91ABNA0417164300");
        assert!(!data.has_known_bic());
        let data = data.with_bic("");
        assert!(!data.has_known_bic());
    }

    #[test]
    fn invalid_test() {
        let data = IbanData::invalid("NL00FAKE0000000000");
        assert!(!data.is_valid());
        assert_eq!(data.iban(), "NL00FAKE0000000000");
    }
}
