//! Conversion traits between the layers of the certificate decoder.
//!
//! Every step from armored text to a `Certificate` is a `Decoder` impl on
//! the source type: `Pem` decodes to `Vec<u8>`, a DER `Tlv` decodes to ASN.1
//! primitives, and both `Pem` and `Vec<u8>` decode to a certificate. The
//! destination names itself through [`DecodableFrom`], so a pairing that has
//! no impl is rejected by the compiler.
//!
//! Callers pick the destination with a type annotation:
//!
//! ```ignore
//! use kensa::decoder::Decoder;
//! use kensa_asn1::Integer;
//! use kensa_der::Reader;
//!
//! let bytes = [0x02, 0x01, 0x2a];
//! let tlv = Reader::new(&bytes).read_tlv().unwrap();
//! let n: Integer = tlv.decode().unwrap();
//! ```

/// Converts `self`, a value of type `T`, into a `D`.
///
/// Implementations pair with a `DecodableFrom<T>` impl on `D`:
///
/// ```no_run
/// use kensa::decoder::{DecodableFrom, Decoder};
///
/// struct Armored(String);
/// struct Body(Vec<u8>);
///
/// #[derive(Debug)]
/// struct Empty;
///
/// impl DecodableFrom<Armored> for Body {}
///
/// impl Decoder<Armored, Body> for Armored {
///     type Error = Empty;
///
///     fn decode(&self) -> Result<Body, Self::Error> {
///         if self.0.is_empty() {
///             return Err(Empty);
///         }
///         Ok(Body(self.0.as_bytes().to_vec()))
///     }
/// }
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    type Error;

    /// Decodes `self` into `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marks `Self` as a valid decode target for values of type `T`.
pub trait DecodableFrom<T> {}
