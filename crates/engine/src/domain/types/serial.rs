use std::fmt;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Serialize, Serializer};

/// Certificate serial number: an arbitrary-precision non-negative integer
/// read from big-endian bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SerialNumber(BigUint);

impl SerialNumber {
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        SerialNumber(BigUint::from_bytes_be(bytes))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Minimal big-endian magnitude; zero is a single `0x00` byte.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }

    pub fn to_u128(&self) -> Option<u128> {
        self.0.to_u128()
    }

    /// Uppercase hex of the magnitude, padded to whole bytes (`00` for zero).
    pub fn to_hex(&self) -> String {
        let digits = self.0.to_str_radix(16).to_uppercase();
        if digits.len() % 2 == 1 {
            format!("0{digits}")
        } else {
            digits
        }
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for SerialNumber {
    fn from(v: u64) -> Self {
        SerialNumber(BigUint::from(v))
    }
}

impl From<BigUint> for SerialNumber {
    fn from(v: BigUint) -> Self {
        SerialNumber(v)
    }
}

impl Serialize for SerialNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_one() {
        assert_eq!(SerialNumber::from_be_bytes(&[0, 0, 0]).to_string(), "0");
        assert_eq!(SerialNumber::from_be_bytes(&[]).to_string(), "0");
        assert_eq!(SerialNumber::from_be_bytes(&[0x01]).to_string(), "1");
        assert!(SerialNumber::from_be_bytes(&[0, 0]).is_zero());
        assert_eq!(SerialNumber::from_be_bytes(&[]).to_hex(), "00");
    }

    #[test]
    fn leading_zeros_are_stripped() {
        let s = SerialNumber::from_be_bytes(&[0x00, 0x01, 0x00]);
        assert_eq!(s.to_be_bytes(), vec![0x01, 0x00]);
        assert_eq!(s.to_string(), "256");
        assert_eq!(s.to_hex(), "0100");
    }

    #[test]
    fn wider_than_u64() {
        let s = SerialNumber::from_be_bytes(&[0x01, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(s.to_string(), "18446744073709551616");
        assert_eq!(s.to_u128(), Some(1u128 << 64));
    }

    #[test]
    fn wider_than_u128() {
        let s = SerialNumber::from_be_bytes(&[0xff; 20]);
        assert_eq!(s.to_u128(), None);
        assert_eq!(s.to_string(), "1461501637330902918203684832716283019655932542975");
        assert_eq!(s.to_hex(), "FF".repeat(20));
    }

    #[test]
    fn serializes_as_decimal_string() {
        let s = SerialNumber::from(4096u64);
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"4096\"");
    }
}
