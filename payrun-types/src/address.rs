use serde::{Deserialize, Serialize};

/// A postal address in the shape a `PstlAdr` element wants it: an optional
/// country code and at most two free-form address lines. The account holder
/// name lives on the owning party, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street_and_number: String,
    pub postal_code: String,
    pub city: String,
    pub country: Option<String>,
}

impl Address {
    pub fn new(
        street_and_number: impl ToString,
        postal_code: impl ToString,
        city: impl ToString,
        country: Option<impl ToString>,
    ) -> Self {
        Self {
            street_and_number: street_and_number.to_string(),
            postal_code: postal_code.to_string(),
            city: city.to_string(),
            country: country.map(|c| c.to_string()),
        }
    }

    /// The `AdrLine` contents: the street first, then postal code and city
    /// joined on one line.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        AddressLines {
            address: self,
            index: 0,
        }
    }
}

struct AddressLines<'a> {
    address: &'a Address,
    index: u8,
}

impl<'a> Iterator for AddressLines<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.index += 1;
        match self.index {
            1 => Some(self.address.street_and_number.clone()),
            2 => Some(format!("{} {}", self.address.postal_code, self.address.city)),
            _ => None,
        }
    }
}
