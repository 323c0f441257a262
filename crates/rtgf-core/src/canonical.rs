//! # Canonical Serialization — RFC 8785 Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! used in digest computation across the PPE pipeline.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which serializes via
//! `serde_jcs` (RFC 8785, JSON Canonicalization Scheme): lexicographically
//! sorted object keys, compact separators, deterministic string escaping,
//! and ECMAScript number formatting (shortest round-trip, no trailing zeros,
//! no alternate exponent forms).
//!
//! Any function that computes a digest must accept `&CanonicalBytes`, so a
//! non-canonical byte sequence can never reach the hash boundary.
//!
//! ## Determinism
//!
//! Canonicalization consults no ambient state — no clocks, no randomness,
//! no locale. Two semantically equal structures (same keys and values, any
//! field ordering, any origin) produce identical canonical bytes.
//!
//! Non-finite numbers (NaN, ±Infinity) are forbidden by RFC 8785. serde's
//! JSON serializers render them as `null` rather than failing, so a
//! finite-check pass runs over the value before serialization and turns
//! them into errors. They must never appear in digestible artifacts;
//! reaching this error indicates a data-modeling bug upstream.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by RFC 8785 canonicalization.
///
/// # Invariants
///
/// - The only constructor is [`CanonicalBytes::new()`].
/// - Object keys are sorted lexicographically by UTF-16 code unit.
/// - No insignificant whitespace.
/// - Numbers use the ECMAScript shortest-round-trip rendering.
///
/// These invariants are enforced by the constructor and cannot be violated
/// by downstream code because the inner `Vec<u8>` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// This is the ONLY way to construct `CanonicalBytes`. All digest
    /// computation in the pipeline must flow through this constructor.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::SerializationFailed`] if the value
    /// contains non-finite numbers or kinds that have no JSON representation.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        // serde_json's serializer renders NaN and the infinities as
        // `null` before any formatter sees them, so the rejection must
        // happen in a pass of our own.
        obj.serialize(FiniteGuard)?;
        let s = serde_jcs::to_string(obj)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Serializer that visits every value and rejects non-finite floats.
///
/// serde_json's `Serializer` maps NaN and the infinities to `null` before
/// its formatter is consulted, and `serde_json::to_value` coerces them to
/// `Value::Null` the same way. Neither path reports an error, so the
/// canonical constructor runs this pass first. It produces no output; the
/// only observable effect is an error on the first non-finite number.
struct FiniteGuard;

fn non_finite_error() -> serde_json::Error {
    serde::ser::Error::custom("non-finite number (NaN or Infinity) has no canonical form")
}

macro_rules! finite_guard_ok {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Result<(), serde_json::Error> {
                Ok(())
            }
        )*
    };
}

impl serde::Serializer for FiniteGuard {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = FiniteGuardCompound;
    type SerializeTuple = FiniteGuardCompound;
    type SerializeTupleStruct = FiniteGuardCompound;
    type SerializeTupleVariant = FiniteGuardCompound;
    type SerializeMap = FiniteGuardCompound;
    type SerializeStruct = FiniteGuardCompound;
    type SerializeStructVariant = FiniteGuardCompound;

    finite_guard_ok! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_char: char,
        serialize_str: &str,
        serialize_bytes: &[u8],
    }

    fn serialize_f32(self, v: f32) -> Result<(), Self::Error> {
        if v.is_finite() {
            Ok(())
        } else {
            Err(non_finite_error())
        }
    }

    fn serialize_f64(self, v: f64) -> Result<(), Self::Error> {
        if v.is_finite() {
            Ok(())
        } else {
            Err(non_finite_error())
        }
    }

    fn serialize_none(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteGuard)
    }

    fn serialize_unit(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        value.serialize(FiniteGuard)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        value.serialize(FiniteGuard)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(FiniteGuardCompound)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(FiniteGuardCompound)
    }
}

struct FiniteGuardCompound;

impl serde::ser::SerializeSeq for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl serde::ser::SerializeTuple for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl serde::ser::SerializeTupleStruct for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl serde::ser::SerializeTupleVariant for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl serde::ser::SerializeMap for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        key.serialize(FiniteGuard)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl serde::ser::SerializeStruct for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl serde::ser::SerializeStructVariant for FiniteGuardCompound {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        value.serialize(FiniteGuard)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bytes_simple_object() {
        let data = serde_json::json!({"b": 2, "a": 1, "c": "hello"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn test_canonical_bytes_sorted_keys() {
        let data = serde_json::json!({"z": 1, "m": 2, "a": 3});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"a":3,"m":2,"z":1}"#);
    }

    #[test]
    fn test_canonical_bytes_nested() {
        let data = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "list": [3, 2, 1]
        });
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_struct_field_order_irrelevant() {
        // Two structs with the same fields declared in different order
        // must canonicalize to identical bytes.
        #[derive(Serialize)]
        struct Ab {
            alpha: u32,
            beta: u32,
        }
        #[derive(Serialize)]
        struct Ba {
            beta: u32,
            alpha: u32,
        }
        let a = CanonicalBytes::new(&Ab { alpha: 1, beta: 2 }).unwrap();
        let b = CanonicalBytes::new(&Ba { beta: 2, alpha: 1 }).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(CanonicalBytes::new(&f64::NAN).is_err());
        assert!(CanonicalBytes::new(&f64::INFINITY).is_err());
        assert!(CanonicalBytes::new(&f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_non_finite_struct_field_rejected() {
        // serde_json would render this as {"v":null}; the constructor
        // must error instead of producing bytes for a forbidden value.
        #[derive(Serialize)]
        struct Reading {
            v: f64,
        }
        let err = CanonicalBytes::new(&Reading { v: f64::NAN });
        assert!(err.is_err());
    }

    #[test]
    fn test_non_finite_nested_rejected() {
        assert!(CanonicalBytes::new(&vec![1.0, f64::INFINITY]).is_err());
        assert!(CanonicalBytes::new(&Some(f32::NAN)).is_err());

        let mut map = std::collections::BTreeMap::new();
        map.insert("rate", f64::NEG_INFINITY);
        assert!(CanonicalBytes::new(&map).is_err());
    }

    #[test]
    fn test_finite_float_formatting() {
        // RFC 8785: shortest round-trip, no trailing zeros.
        let cb = CanonicalBytes::new(&serde_json::json!({"v": 1.0})).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"v":1}"#);
    }

    #[test]
    fn test_integer_accepted() {
        let data = serde_json::json!({"amount": 42});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"amount":42}"#);
    }

    #[test]
    fn test_null_passthrough() {
        let data = serde_json::json!({"key": null});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"key":null}"#);
    }

    #[test]
    fn test_bool_passthrough() {
        let data = serde_json::json!({"flag": true, "other": false});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"flag":true,"other":false}"#);
    }

    #[test]
    fn test_empty_object() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
    }

    #[test]
    fn test_empty_array() {
        let cb = CanonicalBytes::new(&serde_json::json!([])).unwrap();
        assert_eq!(cb.as_bytes(), b"[]");
    }

    #[test]
    fn test_string_value() {
        let cb = CanonicalBytes::new(&"hello world").unwrap();
        assert_eq!(cb.as_bytes(), b"\"hello world\"");
    }

    #[test]
    fn test_len_and_is_empty() {
        let cb = CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap();
        assert!(!cb.is_empty());
        assert!(cb.len() > 0);
    }

    #[test]
    fn test_negative_integer() {
        let cb = CanonicalBytes::new(&serde_json::json!({"val": -42})).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"val":-42}"#);
    }

    #[test]
    fn test_unicode_passthrough() {
        // Non-ASCII characters pass through as UTF-8, not \u escapes.
        let data = serde_json::json!({"name": "\u{00e9}\u{00e8}\u{00ea}"});
        let cb = CanonicalBytes::new(&data).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert!(s.contains('\u{00e9}'));
    }
}
