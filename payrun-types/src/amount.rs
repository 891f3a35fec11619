use std::{
    fmt::{Debug, Display},
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// A monetary amount with cent precision, as written into `CtrlSum` and
/// `InstdAmt` elements.
#[derive(PartialEq, Clone, Copy, Default, PartialOrd)]
pub struct Amount(f64);

impl Eq for Amount {}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.partial_cmp(&other.0).unwrap()
    }
}

impl Amount {
    /// The decimal form banks expect: two fraction digits, dot separator.
    pub fn xml_string(&self) -> String {
        format!("{:.2}", self.0)
    }

    pub fn new(units: i32, cents: i32) -> Self {
        let cents = cents as f64 / 100.0;
        let units = units as f64;
        Amount(units + cents)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// rounds to the nearest cent
    fn round(mut self) -> Self {
        self.0 = (self.0 * 100.0).round() / 100.0;
        self
    }
}

impl FromStr for Amount {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let f = s.parse::<f64>().map_err(|_| "Invalid amount format")?;
        Ok(Amount::from(f))
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount::default() - self
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl From<(i32, i32)> for Amount {
    fn from((units, cents): (i32, i32)) -> Self {
        Amount::new(units, cents).round()
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount::new(value, 0).round()
    }
}

macro_rules! from_integer_type {
    ($($t:ty),* $(,)?) => {
        $(impl From<$t> for Amount {
            fn from(value: $t) -> Self {
                Amount::new(value as i32, 0).round()
            }
        })*
    };
}

from_integer_type!(i8, i16, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Debug for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.0 as f64;
        f.debug_tuple("Amount").field(&value).finish()
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = if f.sign_minus() { self.0.abs() } else { self.0 };
        write!(f, "{:.2}", value)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let r = s.parse::<f64>().map_err(serde::de::Error::custom)?;
        Ok(Amount(r).round())
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.xml_string().serialize(serializer)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0).round()
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0).round()
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl From<f32> for Amount {
    fn from(value: f32) -> Self {
        Self::from(value as f64)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount(value).round()
    }
}

impl Mul<f64> for Amount {
    type Output = Amount;

    fn mul(self, rhs: f64) -> Self::Output {
        Amount(self.0 * rhs).round()
    }
}

impl Mul<usize> for Amount {
    type Output = Amount;

    fn mul(self, rhs: usize) -> Self::Output {
        Amount(self.0 * rhs as f64).round()
    }
}
