//! DER tag-length-value reader.
//!
//! [`Reader`] is a cursor over an immutable byte buffer. Each call to
//! [`Reader::read_tlv`] decodes one element header, checks the declared
//! length against what is left, and hands back a [`Tlv`] that borrows the
//! value bytes. Constructed elements are walked by opening a child reader
//! over their value, so offsets reported in errors are always absolute
//! positions in the original buffer.
//!
//! ```
//! use kensa_der::{Reader, Tag};
//!
//! // SEQUENCE { INTEGER 7, INTEGER 8 }
//! let bytes = [0x30, 0x06, 0x02, 0x01, 0x07, 0x02, 0x01, 0x08];
//! let mut reader = Reader::new(&bytes);
//! let values = reader
//!     .read_sequence()
//!     .unwrap()
//!     .map(|tlv| tlv.map(|t| t.value()[0]))
//!     .collect::<Result<Vec<u8>, _>>()
//!     .unwrap();
//! assert_eq!(values, vec![7, 8]);
//! assert!(reader.finish().is_ok());
//! ```

use std::iter::FusedIterator;

use nom::error::ErrorKind;
use nom::{IResult, Parser};

pub mod error;
mod tag;

pub use error::{Error, LengthError};
pub use tag::{Class, Tag};

use tag::{TAG_CONSTRUCTED, TAG_NUMBER_MASK};

pub type Result<T> = std::result::Result<T, Error>;

type ParseResult<'a, T> = IResult<&'a [u8], T>;

/// Length octets as they appear on the wire, before DER rules are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Length<'a> {
    Short(u8),
    Long(&'a [u8]),
    Indefinite,
    Reserved,
}

impl Length<'_> {
    fn resolve(self, offset: usize) -> Result<usize> {
        let invalid = |reason| Error::InvalidLength { offset, reason };
        match self {
            Length::Short(n) => Ok(usize::from(n)),
            Length::Indefinite => Err(invalid(LengthError::Indefinite)),
            Length::Reserved => Err(invalid(LengthError::Reserved)),
            Length::Long(octets) => {
                if octets.len() > size_of::<usize>() {
                    return Err(invalid(LengthError::TooLong(octets.len())));
                }
                if octets.first() == Some(&0) {
                    return Err(invalid(LengthError::NonMinimal));
                }
                let n = octets
                    .iter()
                    .fold(0usize, |n, &b| (n << 8) | usize::from(b));
                if n < 0x80 {
                    return Err(invalid(LengthError::NonMinimal));
                }
                Ok(n)
            }
        }
    }
}

fn octet(input: &[u8]) -> ParseResult<'_, u8> {
    nom::number::complete::be_u8(input)
}

fn octets(input: &[u8], count: usize) -> ParseResult<'_, &[u8]> {
    nom::bytes::complete::take(count).parse(input)
}

fn reject(input: &[u8], kind: ErrorKind) -> nom::Err<nom::error::Error<&[u8]>> {
    nom::Err::Failure(nom::error::Error::new(input, kind))
}

fn parse_tag(input: &[u8]) -> ParseResult<'_, Tag> {
    let (mut input, identifier) = octet(input)?;
    let class = Class::from_identifier(identifier);
    let constructed = identifier & TAG_CONSTRUCTED != 0;
    let low = identifier & TAG_NUMBER_MASK;
    if low != TAG_NUMBER_MASK {
        return Ok((input, Tag::new(class, constructed, u32::from(low))));
    }

    // high-tag-number form: base-128 digits, bit 8 set on all but the last
    let mut number: u32 = 0;
    let mut leading = true;
    loop {
        let (rest, b) = octet(input)?;
        if leading && b == 0x80 {
            return Err(reject(input, ErrorKind::Verify));
        }
        if number > (u32::MAX >> 7) {
            return Err(reject(input, ErrorKind::TooLarge));
        }
        number = (number << 7) | u32::from(b & 0x7f);
        input = rest;
        leading = false;
        if b & 0x80 == 0 {
            break;
        }
    }
    if number < u32::from(TAG_NUMBER_MASK) {
        return Err(reject(input, ErrorKind::Verify));
    }
    Ok((input, Tag::new(class, constructed, number)))
}

fn parse_length(input: &[u8]) -> ParseResult<'_, Length<'_>> {
    let (input, n) = octet(input)?;
    match n {
        0x80 => Ok((input, Length::Indefinite)),
        0xff => Ok((input, Length::Reserved)),
        n if n & 0x80 == 0 => Ok((input, Length::Short(n))),
        n => {
            // long form: the low 7 bits count the length octets that follow
            let (input, bs) = octets(input, usize::from(n & 0x7f))?;
            Ok((input, Length::Long(bs)))
        }
    }
}

fn header_error(err: nom::Err<nom::error::Error<&[u8]>>, offset: usize, available: usize) -> Error {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e)
            if matches!(e.code, ErrorKind::Verify | ErrorKind::TooLarge) =>
        {
            Error::InvalidTag { offset }
        }
        _ => Error::Truncated {
            offset,
            needed: available + 1,
            available,
        },
    }
}

/// One decoded element: tag, position, and borrowed value bytes.
///
/// A `Tlv` is transient. Decoders consume it right away and keep only what
/// they turn it into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    tag: Tag,
    offset: usize,
    header_len: usize,
    value: &'a [u8],
    raw: &'a [u8],
}

impl<'a> Tlv<'a> {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Absolute offset of the first identifier octet.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Length of the value in bytes.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    pub fn value_offset(&self) -> usize {
        self.offset + self.header_len
    }

    /// The complete encoding, header included.
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// A reader over the value of this element.
    pub fn reader(&self) -> Reader<'a> {
        Reader::with_offset(self.value, self.value_offset())
    }

    /// Iterates the elements nested in this element's value.
    pub fn children(&self) -> Sequence<'a> {
        Sequence {
            reader: self.reader(),
            failed: false,
        }
    }
}

/// Cursor over a DER buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Reader::with_offset(input, 0)
    }

    /// A reader whose reported offsets start at `base`.
    pub fn with_offset(input: &'a [u8], base: usize) -> Self {
        Reader {
            input,
            pos: 0,
            base,
        }
    }

    /// Absolute offset of the next unread byte.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining().is_empty()
    }

    /// Tag of the next element without consuming it. `None` at end of input.
    pub fn peek_tag(&self) -> Result<Option<Tag>> {
        let input = self.remaining();
        if input.is_empty() {
            return Ok(None);
        }
        parse_tag(input)
            .map(|(_, tag)| Some(tag))
            .map_err(|e| header_error(e, self.offset(), input.len()))
    }

    pub fn read_tlv(&mut self) -> Result<Tlv<'a>> {
        let offset = self.offset();
        let input = self.remaining();
        let available = input.len();

        let (rest, tag) = parse_tag(input).map_err(|e| header_error(e, offset, available))?;
        let (rest, length) = parse_length(rest).map_err(|e| header_error(e, offset, available))?;
        let header_len = available - rest.len();
        let length = length.resolve(offset)?;

        // a declared length near usize::MAX must not wrap
        let total = header_len.saturating_add(length);
        let (value, raw) = match (rest.get(..length), input.get(..total)) {
            (Some(value), Some(raw)) => (value, raw),
            _ => {
                return Err(Error::Truncated {
                    offset,
                    needed: total,
                    available,
                });
            }
        };
        self.pos += total;

        Ok(Tlv {
            tag,
            offset,
            header_len,
            value,
            raw,
        })
    }

    /// Reads the next element and checks its tag.
    pub fn expect(&mut self, tag: Tag) -> Result<Tlv<'a>> {
        let offset = self.offset();
        match self.peek_tag()? {
            None => Err(Error::MissingElement {
                offset,
                expected: tag,
            }),
            Some(found) if found != tag => Err(Error::UnexpectedTag {
                offset,
                expected: tag,
                found,
            }),
            Some(_) => self.read_tlv(),
        }
    }

    /// Reads the next element only if it carries `tag`.
    pub fn read_optional(&mut self, tag: Tag) -> Result<Option<Tlv<'a>>> {
        match self.peek_tag()? {
            Some(found) if found == tag => self.read_tlv().map(Some),
            _ => Ok(None),
        }
    }

    /// Reads a SEQUENCE and returns an iterator over its elements.
    pub fn read_sequence(&mut self) -> Result<Sequence<'a>> {
        self.expect(Tag::SEQUENCE).map(|tlv| tlv.children())
    }

    /// Reads a SET and returns an iterator over its elements.
    pub fn read_set(&mut self) -> Result<Sequence<'a>> {
        self.expect(Tag::SET).map(|tlv| tlv.children())
    }

    /// Fails if any input is left unread.
    pub fn finish(&self) -> Result<()> {
        let remaining = self.remaining().len();
        if remaining == 0 {
            return Ok(());
        }
        Err(Error::TrailingData {
            offset: self.offset(),
            remaining,
        })
    }
}

/// Lazy iterator over the elements of a constructed value.
///
/// It consumes its reader, so it cannot be restarted. After the first error
/// it yields nothing more.
#[derive(Debug)]
pub struct Sequence<'a> {
    reader: Reader<'a>,
    failed: bool,
}

impl Sequence<'_> {
    /// Absolute offset of the next unread element.
    pub fn offset(&self) -> usize {
        self.reader.offset()
    }
}

impl<'a> Iterator for Sequence<'a> {
    type Item = Result<Tlv<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_empty() {
            return None;
        }
        let item = self.reader.read_tlv();
        self.failed = item.is_err();
        Some(item)
    }
}

impl FusedIterator for Sequence<'_> {}
