//! Command line parsing.
//!
//! A command line is either a bare keyword or an object address path:
//!
//! ```text
//! page=3
//! dim 50              (legacy two-token form)
//! p[1].b[4].txt=On
//! ```
//!
//! Splitting happens on the first `=`; a line without `=` falls back to a
//! single whitespace split so the legacy `keyword payload` form keeps
//! working. This is the only place command text is taken apart - every
//! transport funnels through [`Command::parse`].

/// Errors produced while taking a command line apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line was empty or whitespace only
    Empty,
    /// Address path did not match `p[<page>].b[<object>].<attribute>`
    BadAddress,
    /// Page or object id was not a decimal number in `0..=255`
    IdOutOfRange,
}

/// A parsed `p[<page>].b[<object>].<attribute>` address path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObjectPath<'a> {
    /// Page id (`0..=253`, or an overlay layer `254`/`255`)
    pub page: u8,
    /// Object id on that page; `0` addresses the page root
    pub obj: u8,
    /// Attribute name, without the separating dot
    pub attr: &'a str,
}

impl<'a> ObjectPath<'a> {
    /// Parse an address path such as `p[1].b[4].txt`
    pub fn parse(s: &'a str) -> Result<Self, ParseError> {
        let rest = s.strip_prefix("p[").ok_or(ParseError::BadAddress)?;
        let (page, rest) = rest.split_once(']').ok_or(ParseError::BadAddress)?;
        let rest = rest.strip_prefix(".b[").ok_or(ParseError::BadAddress)?;
        let (obj, attr) = rest.split_once(']').ok_or(ParseError::BadAddress)?;

        let page = parse_id(page)?;
        let obj = parse_id(obj)?;

        // The dot between `]` and the attribute is optional on input
        let attr = attr.strip_prefix('.').unwrap_or(attr);
        if attr.is_empty() {
            return Err(ParseError::BadAddress);
        }

        Ok(Self { page, obj, attr })
    }
}

fn parse_id(s: &str) -> Result<u8, ParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::IdOutOfRange);
    }
    s.parse().map_err(|_| ParseError::IdOutOfRange)
}

/// One command, split into its routing name and payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Object attribute set (non-empty payload) or query (empty payload)
    Attribute {
        path: ObjectPath<'a>,
        payload: &'a str,
    },
    /// Bare keyword command, payload interpreted by the dispatcher
    Keyword { name: &'a str, payload: &'a str },
}

impl<'a> Command<'a> {
    /// Parse a single command line
    pub fn parse(line: &'a str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        let (name, payload) = match line.split_once('=') {
            Some((name, payload)) => (name.trim_end(), payload),
            None => match line.split_once(|c: char| c.is_ascii_whitespace()) {
                Some((name, payload)) => (name, payload.trim_start()),
                None => (line, ""),
            },
        };

        if name.starts_with("p[") {
            Ok(Command::Attribute {
                path: ObjectPath::parse(name)?,
                payload,
            })
        } else {
            Ok(Command::Keyword { name, payload })
        }
    }

    /// Payload of either command form
    pub fn payload(&self) -> &'a str {
        match self {
            Command::Attribute { payload, .. } | Command::Keyword { payload, .. } => payload,
        }
    }
}

/// Split a bulk line into its sub-commands.
///
/// Sub-commands are separated by `;` and dispatched strictly in order;
/// empty segments are skipped so trailing separators are harmless.
pub fn split_bulk(line: &str) -> impl Iterator<Item = &str> {
    line.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Case-insensitive `ON` test for boolean payloads
pub fn is_on(payload: &str) -> bool {
    payload.eq_ignore_ascii_case("on")
}

/// Canonical boolean payload text
pub fn on_off(state: bool) -> &'static str {
    if state {
        "ON"
    } else {
        "OFF"
    }
}
