use std::fmt::{Display, Formatter};

pub(crate) const TAG_CONSTRUCTED: u8 = 0x20;
pub(crate) const TAG_NUMBER_MASK: u8 = 0x1f;

/*
X.690 8.1.2.2

| bit 8 | bit 7 | class            |
|-------|-------|------------------|
|   0   |   0   | Universal        |
|   0   |   1   | Application      |
|   1   |   0   | Context-specific |
|   1   |   1   | Private          |
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Class {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl Class {
    pub(crate) fn from_identifier(octet: u8) -> Self {
        match octet >> 6 {
            0 => Class::Universal,
            1 => Class::Application,
            2 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }
}

/// Identifier octets of a DER element.
///
/// Tags compare on all three parts, so `[0]` constructed and `[0]` primitive
/// are different tags. That is what IMPLICIT and EXPLICIT tagging rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    class: Class,
    constructed: bool,
    number: u32,
}

impl Tag {
    pub const BOOLEAN: Tag = Tag::universal(0x01, false);
    pub const INTEGER: Tag = Tag::universal(0x02, false);
    pub const BIT_STRING: Tag = Tag::universal(0x03, false);
    pub const OCTET_STRING: Tag = Tag::universal(0x04, false);
    pub const NULL: Tag = Tag::universal(0x05, false);
    pub const OBJECT_IDENTIFIER: Tag = Tag::universal(0x06, false);
    pub const UTF8_STRING: Tag = Tag::universal(0x0c, false);
    pub const SEQUENCE: Tag = Tag::universal(0x10, true);
    pub const SET: Tag = Tag::universal(0x11, true);
    pub const NUMERIC_STRING: Tag = Tag::universal(0x12, false);
    pub const PRINTABLE_STRING: Tag = Tag::universal(0x13, false);
    pub const TELETEX_STRING: Tag = Tag::universal(0x14, false);
    pub const IA5_STRING: Tag = Tag::universal(0x16, false);
    pub const UTC_TIME: Tag = Tag::universal(0x17, false);
    pub const GENERALIZED_TIME: Tag = Tag::universal(0x18, false);
    pub const VISIBLE_STRING: Tag = Tag::universal(0x1a, false);
    pub const UNIVERSAL_STRING: Tag = Tag::universal(0x1c, false);
    pub const BMP_STRING: Tag = Tag::universal(0x1e, false);

    pub const fn new(class: Class, constructed: bool, number: u32) -> Self {
        Tag {
            class,
            constructed,
            number,
        }
    }

    const fn universal(number: u32, constructed: bool) -> Self {
        Tag::new(Class::Universal, constructed, number)
    }

    /// `[number]` in the context-specific class.
    pub const fn context_specific(number: u32, constructed: bool) -> Self {
        Tag::new(Class::ContextSpecific, constructed, number)
    }

    pub const fn class(&self) -> Class {
        self.class
    }

    pub const fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub const fn number(&self) -> u32 {
        self.number
    }

    fn universal_name(&self) -> Option<&'static str> {
        if self.class != Class::Universal {
            return None;
        }
        let name = match self.number {
            0x01 => "BOOLEAN",
            0x02 => "INTEGER",
            0x03 => "BIT STRING",
            0x04 => "OCTET STRING",
            0x05 => "NULL",
            0x06 => "OBJECT IDENTIFIER",
            0x0a => "ENUMERATED",
            0x0c => "UTF8String",
            0x10 => "SEQUENCE",
            0x11 => "SET",
            0x12 => "NumericString",
            0x13 => "PrintableString",
            0x14 => "TeletexString",
            0x16 => "IA5String",
            0x17 => "UTCTime",
            0x18 => "GeneralizedTime",
            0x1a => "VisibleString",
            0x1c => "UniversalString",
            0x1e => "BMPString",
            _ => return None,
        };
        Some(name)
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.class {
            Class::Universal => match self.universal_name() {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "UNIVERSAL {}", self.number),
            },
            Class::Application => write!(f, "[APPLICATION {}]", self.number),
            Class::ContextSpecific => write!(f, "[{}]", self.number),
            Class::Private => write!(f, "[PRIVATE {}]", self.number),
        }
    }
}
