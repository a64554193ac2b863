//! # kensa
//!
//! Core traits shared by the kensa certificate decoding crates.
//!
//! This crate defines the `Decoder` trait that establishes the type-safe
//! conversion pattern used by every layer of the decoder.
//!
//! ## Overview
//!
//! Decoding a certificate flows through these steps:
//! ```text
//! PEM text → DER bytes → TLV tokens → ASN.1 primitives → Certificate
//! ```
//!
//! Each step uses the `Decoder` trait to convert from one type to the next.
//! The marker trait `DecodableFrom` restricts which conversions exist, so an
//! invalid pairing is a compile error instead of a runtime surprise.
//!
//! ## Example
//!
//! ```ignore
//! use kensa::decoder::Decoder;
//! use kensa_der::Reader;
//! use kensa_asn1::ObjectIdentifier;
//!
//! let bytes = [0x06, 0x03, 0x55, 0x04, 0x03];
//! let tlv = Reader::new(&bytes).read_tlv().unwrap();
//! let oid: ObjectIdentifier = tlv.decode().unwrap();
//! assert_eq!(oid.to_string(), "2.5.4.3");
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
