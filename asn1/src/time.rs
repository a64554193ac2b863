//! UTCTime and GeneralizedTime.
//!
//! X.509 restricts both types to whole seconds in UTC, so the only accepted
//! forms are `YYMMDDHHMMSSZ` and `YYYYMMDDHHMMSSZ`.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, Utc};
use kensa::decoder::{DecodableFrom, Decoder};
use kensa_der::{Tag, Tlv};
use serde::Serialize;
use thiserror::Error;

use crate::error::Error;

const UTC_TIME_LEN: usize = 13;
const GENERALIZED_TIME_LEN: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKind {
    UtcTime,
    GeneralizedTime,
}

impl Display for TimeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeKind::UtcTime => write!(f, "UTCTime"),
            TimeKind::GeneralizedTime => write!(f, "GeneralizedTime"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("expected {expected} characters, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("expected a digit")]
    Digit,
    #[error("missing 'Z' terminator")]
    MissingZone,
    #[error("date or time field out of range")]
    OutOfRange,
}

/// A decoded time value, remembering which ASN.1 type carried it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Time {
    UtcTime(DateTime<Utc>),
    GeneralizedTime(DateTime<Utc>),
}

impl Time {
    pub fn kind(&self) -> TimeKind {
        match self {
            Time::UtcTime(_) => TimeKind::UtcTime,
            Time::GeneralizedTime(_) => TimeKind::GeneralizedTime,
        }
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        match self {
            Time::UtcTime(t) | Time::GeneralizedTime(t) => *t,
        }
    }
}

/// Parses `YYMMDDHHMMSSZ`. Years 50-99 are 19xx, 00-49 are 20xx.
pub fn parse_utc_time(data: &[u8]) -> Result<DateTime<Utc>, TimeError> {
    let fields = strip_zone(data, UTC_TIME_LEN)?;
    let yy = digits(&fields[..2])? as i32;
    let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
    assemble(year, &fields[2..])
}

/// Parses `YYYYMMDDHHMMSSZ`.
pub fn parse_generalized_time(data: &[u8]) -> Result<DateTime<Utc>, TimeError> {
    let fields = strip_zone(data, GENERALIZED_TIME_LEN)?;
    let year = digits(&fields[..4])? as i32;
    assemble(year, &fields[4..])
}

fn strip_zone(data: &[u8], expected: usize) -> Result<&[u8], TimeError> {
    if data.len() != expected {
        return Err(TimeError::Length {
            expected,
            actual: data.len(),
        });
    }
    match data.split_last() {
        Some((b'Z', fields)) => Ok(fields),
        _ => Err(TimeError::MissingZone),
    }
}

fn digits(data: &[u8]) -> Result<u32, TimeError> {
    data.iter().try_fold(0u32, |n, &b| {
        if b.is_ascii_digit() {
            Ok(n * 10 + u32::from(b - b'0'))
        } else {
            Err(TimeError::Digit)
        }
    })
}

// MMDDHHMMSS
fn assemble(year: i32, fields: &[u8]) -> Result<DateTime<Utc>, TimeError> {
    let field = |i: usize| -> Result<u32, TimeError> {
        digits(fields.get(i..i + 2).ok_or(TimeError::Digit)?)
    };
    let (month, day, hour, minute, second) =
        (field(0)?, field(2)?, field(4)?, field(6)?, field(8)?);

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| dt.and_utc())
        .ok_or(TimeError::OutOfRange)
}

pub(crate) fn decode_utc_time(tlv: &Tlv<'_>) -> Result<DateTime<Utc>, Error> {
    parse_utc_time(tlv.value()).map_err(|reason| Error::InvalidTime {
        offset: tlv.offset(),
        kind: TimeKind::UtcTime,
        reason,
    })
}

pub(crate) fn decode_generalized_time(tlv: &Tlv<'_>) -> Result<DateTime<Utc>, Error> {
    parse_generalized_time(tlv.value()).map_err(|reason| Error::InvalidTime {
        offset: tlv.offset(),
        kind: TimeKind::GeneralizedTime,
        reason,
    })
}

impl<'a> DecodableFrom<Tlv<'a>> for Time {}

impl<'a> Decoder<Tlv<'a>, Time> for Tlv<'a> {
    type Error = Error;

    fn decode(&self) -> Result<Time, Self::Error> {
        match self.tag() {
            Tag::UTC_TIME => decode_utc_time(self).map(Time::UtcTime),
            Tag::GENERALIZED_TIME => decode_generalized_time(self).map(Time::GeneralizedTime),
            found => Err(Error::NotATime {
                offset: self.offset(),
                found,
            }),
        }
    }
}
