//! Curve parameter sets
//!
//! Curves are described by hex strings and loaded with serde. A coordinate (or
//! coefficient) is a single hex string for a prime-field curve and a list of hex
//! coefficients, lowest degree first, for an extension-field curve.

use crate::bigint::BigInt;
use crate::error::{NrError, NrResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A field element as written in a parameter file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Prime(String),
    Extension(Vec<String>),
}

impl Coordinate {
    /// Parses every coefficient as an N-limb integer
    pub fn parse<const N: usize>(&self, what: &str) -> NrResult<Vec<BigInt<N>>> {
        match self {
            Coordinate::Prime(s) => Ok(vec![parse_hex(s, what)?]),
            Coordinate::Extension(parts) => parts.iter().map(|s| parse_hex(s, what)).collect(),
        }
    }
}

impl From<&str> for Coordinate {
    fn from(s: &str) -> Self {
        Coordinate::Prime(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamPoint {
    pub x: Coordinate,
    pub y: Coordinate,
}

/// Short Weierstrass curve y² = x³ + ax + b with a base point of order `order`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParams {
    pub name: String,
    pub prime: String,
    /// Low coefficients c_0..c_{k-1} of the monic irreducible polynomial; absent for GF(p)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<String>>,
    pub a: Coordinate,
    pub b: Coordinate,
    pub generator: ParamPoint,
    pub order: String,
}

impl CurveParams {
    pub fn from_json(json: &str) -> NrResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> NrResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| NrError::Codec(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> NrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// NIST P-256 (secp256r1)
    pub fn p256() -> Self {
        Self {
            name: "P-256".into(),
            prime: "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF".into(),
            extension: None,
            a: "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC".into(),
            b: "5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B".into(),
            generator: ParamPoint {
                x: "6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296".into(),
                y: "4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5".into(),
            },
            order: "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551".into(),
        }
    }

    /// SEC 2 secp256k1
    pub fn secp256k1() -> Self {
        Self {
            name: "secp256k1".into(),
            prime: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F".into(),
            extension: None,
            a: "0".into(),
            b: "7".into(),
            generator: ParamPoint {
                x: "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798".into(),
                y: "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8".into(),
            },
            order: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141".into(),
        }
    }

    /// Looks up a built-in curve by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "p-256" | "p256" | "secp256r1" | "prime256v1" => Some(Self::p256()),
            "secp256k1" => Some(Self::secp256k1()),
            _ => None,
        }
    }
}

/// Parses a hex string into an N-limb integer
pub fn parse_hex<const N: usize>(hex: &str, what: &str) -> NrResult<BigInt<N>> {
    BigInt::from_hex(hex).ok_or_else(|| NrError::Codec(format!("bad {}: {:?}", what, hex)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup() {
        assert_eq!(CurveParams::builtin("P-256"), Some(CurveParams::p256()));
        assert_eq!(CurveParams::builtin("SECP256K1"), Some(CurveParams::secp256k1()));
        assert_eq!(CurveParams::builtin("p-384"), None);
    }

    #[test]
    fn prime_curve_json() {
        let json = r#"{
            "name": "toy",
            "prime": "1f",
            "a": "1",
            "b": "1c",
            "generator": { "x": "0", "y": "b" },
            "order": "17"
        }"#;
        let params = CurveParams::from_json(json).unwrap();
        assert_eq!(params.extension, None);
        assert_eq!(params.a, Coordinate::Prime("1".into()));
        assert_eq!(
            params.generator.y.parse::<1>("y").unwrap(),
            vec![BigInt::from_u64(11)]
        );
    }

    #[test]
    fn extension_curve_json() {
        let json = r#"{
            "name": "gf49",
            "prime": "7",
            "extension": ["1", "0"],
            "a": ["1", "0"],
            "b": ["3", "0"],
            "generator": { "x": ["1", "3"], "y": ["1", "3"] },
            "order": "f"
        }"#;
        let params = CurveParams::from_json(json).unwrap();
        assert_eq!(params.extension.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            params.generator.x.parse::<1>("x").unwrap(),
            vec![BigInt::from_u64(1), BigInt::from_u64(3)]
        );
    }

    #[test]
    fn round_trip_and_errors() {
        let p = CurveParams::secp256k1();
        let json = p.to_json().unwrap();
        assert!(!json.contains("extension"));
        assert_eq!(CurveParams::from_json(&json).unwrap(), p);

        assert!(matches!(CurveParams::from_json("{"), Err(NrError::Codec(_))));
        assert!(matches!(
            Coordinate::from("zz").parse::<1>("a"),
            Err(NrError::Codec(_))
        ));
        assert!(CurveParams::from_file("/nonexistent/curve.json").is_err());
    }
}
