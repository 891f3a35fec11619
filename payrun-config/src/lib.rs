use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The company that initiates transfers: name, account and the organisation
/// id some banks want in the debtor block. IBAN and BIC are taken at face
/// value here; they get checked when a document is assembled.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CompanyConfig {
    pub name: String,
    pub iban: String,
    pub bic: String,
    #[serde(default)]
    pub organisation_id: String,
}

/// Defaults applied when assembling transfer documents.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_days_until_execution")]
    pub days_until_execution: u64,
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_days_until_execution() -> u64 {
    2
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            days_until_execution: default_days_until_execution(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    company: CompanyConfig,
    #[serde(default)]
    transfer: TransferConfig,
}

impl Config {
    pub fn company(&self) -> &CompanyConfig {
        &self.company
    }

    pub fn company_mut(&mut self) -> &mut CompanyConfig {
        &mut self.company
    }

    pub fn transfer(&self) -> &TransferConfig {
        &self.transfer
    }

    pub fn transfer_mut(&mut self) -> &mut TransferConfig {
        &mut self.transfer
    }

    pub fn from_toml(toml: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    pub fn load_from_file() -> Self {
        let config_file = config_location();
        if !config_file.exists() {
            Default::default()
        } else {
            let config = std::fs::read_to_string(config_file).expect("Could not read config file");
            Self::from_toml(&config).expect("Could not parse config file")
        }
    }

    pub fn save_to_file(&self) {
        let config_file = config_location();
        let config_file = std::fs::File::create(config_file).unwrap();
        let toml = self.to_toml().expect("Could not serialize config");
        let mut buf = BufWriter::new(config_file);
        buf.write_all(toml.as_bytes())
            .expect("Could not write config file");
        buf.flush().expect("Could not flush config file");
    }

    /// get a list of all things potentially wrong with the config
    pub fn config_errors(&self) -> Vec<&str> {
        let mut errors = Vec::new();
        if self.company().name.is_empty() {
            errors.push("Company name is empty");
        }
        if self.company().iban.is_empty() {
            errors.push("Company IBAN is empty");
        }
        if self.company().bic.is_empty() {
            errors.push("Company BIC is empty");
        }
        if self.transfer().currency.is_empty() {
            errors.push("Transfer currency is empty");
        }
        errors
    }
}

fn config_location() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        let dir = config_dir.join("payrun");
        std::fs::create_dir_all(&dir).expect("Could not create config directory");
        dir.join("config.toml")
    } else {
        PathBuf::from("payrun.toml")
    }
}

#[cfg(test)]
mod tests {
    use crate::Config;

    #[test]
    fn toml_roundtrip_test() {
        let mut config = Config::default();
        config.company_mut().name = "Acme Payments".to_string();
        config.company_mut().iban = "NL91ABNA0417164300".to_string();
        config.company_mut().bic = "ABNANL2A".to_string();

        let toml = config.to_toml().unwrap();
        let parsed = Config::from_toml(&toml).unwrap();
        assert_eq!(parsed.company().name, "Acme Payments");
        assert_eq!(parsed.transfer().currency, "EUR");
        assert_eq!(parsed.transfer().days_until_execution, 2);
    }

    #[test]
    fn partial_toml_test() {
        let config = Config::from_toml(
            r#"
            [company]
            name = "Acme Payments"
            iban = "NL91ABNA0417164300"
            bic = "ABNANL2A"
            "#,
        )
        .unwrap();
        assert_eq!(config.company().organisation_id, "");
        assert_eq!(config.transfer().currency, "EUR");
    }

    #[test]
    fn config_errors_test() {
        let config = Config::default();
        let errors = config.config_errors();
        assert!(errors.contains(&"Company name is empty"));
        assert!(errors.contains(&"Company IBAN is empty"));
        assert!(errors.contains(&"Company BIC is empty"));

        let mut config = Config::default();
        config.company_mut().name = "Acme Payments".to_string();
        config.company_mut().iban = "NL91ABNA0417164300".to_string();
        config.company_mut().bic = "ABNANL2A".to_string();
        assert!(config.config_errors().is_empty());
    }
}
