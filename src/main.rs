use std::fs::File;

use payrun_config::Config;
use payrun_sepa::{Creditor, Originator, Transaction, TransferDocument};
use payrun_types::{Amount, Date};

const SAMPLE_CONFIG: &str = r#"
[company]
name = "Acme Payments"
iban = "NL91ABNA0417164300"
bic = "ABNANL2A"
organisation_id = "ACME-001"

[transfer]
currency = "EUR"
days_until_execution = 2
"#;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).expect("Could not read config file");
            Config::from_toml(&text).expect("Could not parse config file")
        }
        None => Config::from_toml(SAMPLE_CONFIG).unwrap(),
    };
    for problem in config.config_errors() {
        eprintln!("config: {}", problem);
    }

    let originator = Originator::from_config(config.company());
    let mut document = originator
        .new_credit_transfer_document()
        .expect("Company account data is incomplete");
    document.set_payment_information_id(originator.new_payment_information_id());
    document.set_debtor_currency(&config.transfer().currency);

    let rent = Transaction::new(
        Creditor::new("City Offices", "FR1420041010050500013M02606", "PSSTFRPPSCE"),
        Amount::new(1250, 0),
        "RENT-2026-08",
    )
    .unwrap()
    .with_remittance_info("Office rent August");

    let supplies = Transaction::new(
        Creditor::new("Paper & Co", "NL91ABNA0417164300", "ABNANL2A"),
        Amount::new(84, 50),
        "SUPP-0042",
    )
    .unwrap()
    .with_purpose_code("SUPP")
    .with_remittance_info("Invoice 0042");

    let soon = Date::in_some_days(config.transfer().days_until_execution);
    let later = Date::in_some_days(config.transfer().days_until_execution + 5);
    document.add_credit_transfer_on(&rent, soon);
    document.add_credit_transfer_on(&supplies, later);

    let file = File::create("credit-transfer.xml").expect("Could not create output file");
    document.generate(file).expect("Could not write document");
    println!(
        "credit-transfer.xml written: {} transaction(s) in {} batch(es), control sum {}",
        document.number_of_transactions(),
        document.batches().len(),
        document.control_sum()
    );
}
