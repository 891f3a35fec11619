mod address;
mod amount;
mod date;
mod iban;

pub use address::Address;
pub use amount::Amount;
pub use date::{Date, Timestamp};
pub use iban::IbanData;
