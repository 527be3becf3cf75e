//! Dotted path grammar.
//!
//! ```text
//! path      ::= segment ("." segment)*
//! segment   ::= name ("[" attribute ("," attribute)* "]")?
//! attribute ::= key "=" value
//! value     ::= bare | '"' quoted '"'
//! ```
//!
//! Quoted values may contain spaces, dots, commas and brackets; the quotes
//! are stripped on parse. Anything that does not fit the grammar is reported
//! as [`ConfiguratorError::MalformedPath`] with a span into the full path.

use std::fmt::{self, Display, Formatter};

use super::{attribute, Attribute};
use crate::{
    document::{is_xml_char, OPTION_TAG},
    error::{ConfiguratorError, Result},
};


/// One `.`-separated piece of a path, by byte range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PathSegment {
    pub start: usize,
    pub end: usize,
}

impl PathSegment {
    pub fn text<'a>(&self, path: &'a str) -> &'a str {
        &path[self.start..self.end]
    }
}


/// Splits `path` on every `.` that is outside of an attribute list.
pub(crate) fn split_path(path: &str) -> Result<Vec<PathSegment>> {
    if path.is_empty() {
        return Err(ConfiguratorError::malformed(path, 0, 0, "empty path"));
    }

    let mut segments = Vec::new();
    let mut segment_start = 0;
    let mut bracket_start: Option<usize> = None;
    let mut quote_start: Option<usize> = None;

    for (index, character) in path.char_indices() {
        if !is_xml_char(character) {
            return Err(ConfiguratorError::malformed(
                path,
                index,
                character.len_utf8(),
                format!("character {character:?} cannot be stored in a document"),
            ));
        }

        if quote_start.is_some() {
            if character == '"' {
                quote_start = None;
            }
            continue;
        }

        match character {
            '"' if bracket_start.is_some() => quote_start = Some(index),
            '"' => {
                return Err(ConfiguratorError::malformed(
                    path,
                    index,
                    1,
                    "quotes are only allowed inside an attribute list",
                ));
            }
            '[' if bracket_start.is_some() => {
                return Err(ConfiguratorError::malformed(path, index, 1, "nested `[`"));
            }
            '[' => bracket_start = Some(index),
            ']' if bracket_start.is_none() => {
                return Err(ConfiguratorError::malformed(path, index, 1, "unmatched `]`"));
            }
            ']' => bracket_start = None,
            '.' if bracket_start.is_none() => {
                segments.push(non_empty_segment(path, segment_start, index)?);
                segment_start = index + 1;
            }
            _ => {}
        }
    }

    if let Some(start) = quote_start {
        return Err(ConfiguratorError::malformed(
            path,
            start,
            path.len() - start,
            "unterminated quote",
        ));
    }

    if let Some(start) = bracket_start {
        return Err(ConfiguratorError::malformed(
            path,
            start,
            path.len() - start,
            "unclosed `[`",
        ));
    }

    segments.push(non_empty_segment(path, segment_start, path.len())?);
    Ok(segments)
}

fn non_empty_segment(path: &str, start: usize, end: usize) -> Result<PathSegment> {
    if start == end {
        return Err(ConfiguratorError::malformed(path, start, 0, "empty path segment"));
    }

    Ok(PathSegment { start, end })
}


/// Splits an option path into its section segments and the option name.
pub(crate) fn split_option_path(path: &str) -> Result<(Vec<PathSegment>, PathSegment)> {
    let mut segments = split_path(path)?;

    // PANIC SAFETY: `split_path` never returns an empty list.
    let option = segments.pop().unwrap();
    if segments.is_empty() {
        return Err(ConfiguratorError::malformed(
            path,
            option.start,
            option.end - option.start,
            "an option path needs at least one section before the option name",
        ));
    }

    validate_option_name(path, option.start, option.text(path))?;
    Ok((segments, option))
}

/// Option names are free-form, except for the characters the path grammar reserves.
pub(crate) fn validate_option_name(source: &str, offset: usize, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ConfiguratorError::malformed(source, offset, 0, "empty option name"));
    }

    if let Some((position, character)) = name.char_indices().find(|(_, character)| !is_xml_char(*character)) {
        return Err(ConfiguratorError::malformed(
            source,
            offset + position,
            character.len_utf8(),
            format!("character {character:?} cannot be stored in a document"),
        ));
    }

    if let Some(position) = name.find(['.', '[', ']', '"']) {
        return Err(ConfiguratorError::malformed(
            source,
            offset + position,
            1,
            "option names cannot contain `.`, `[`, `]` or `\"`",
        ));
    }

    Ok(())
}

/// Section and attribute names end up as XML names in the backing document.
pub(crate) fn validate_xml_name(source: &str, offset: usize, name: &str) -> Result<()> {
    let mut characters = name.char_indices();

    let Some((_, first)) = characters.next() else {
        return Err(ConfiguratorError::malformed(source, offset, 0, "empty name"));
    };

    if !(first.is_alphabetic() || first == '_') {
        return Err(ConfiguratorError::malformed(
            source,
            offset,
            first.len_utf8(),
            "names must start with a letter or `_`",
        ));
    }

    for (position, character) in characters {
        if !(character.is_alphanumeric() || matches!(character, '_' | '-')) {
            return Err(ConfiguratorError::malformed(
                source,
                offset + position,
                character.len_utf8(),
                "names may only contain letters, digits, `_` and `-`",
            ));
        }
    }

    Ok(())
}


/// Option and attribute values may hold anything an XML document can represent.
pub(crate) fn validate_value(value: &str) -> Result<()> {
    match value.char_indices().find(|(_, character)| !is_xml_char(*character)) {
        Some((position, character)) => Err(ConfiguratorError::InvalidValue {
            value: value.to_string(),
            span: (position, character.len_utf8()).into(),
            reason: format!("character {character:?} cannot be stored in a document"),
        }),
        None => Ok(()),
    }
}


/// A parsed path segment: a section name plus an optional attribute predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionSelector {
    name: String,
    attributes: Vec<Attribute>,
}

impl SectionSelector {
    /// Parses a single segment such as `Binary[name="some binary",arch=arm64]`.
    pub fn parse(segment: &str) -> Result<Self> {
        let segments = split_path(segment)?;
        if segments.len() != 1 {
            return Err(ConfiguratorError::malformed(
                segment,
                0,
                segment.len(),
                "expected a single path segment",
            ));
        }

        Self::parse_in(segment, segments[0])
    }

    /// Parses `segment` of `path`, reporting errors against the whole path.
    pub(crate) fn parse_in(path: &str, segment: PathSegment) -> Result<Self> {
        let text = segment.text(path);

        let Some(bracket) = text.find('[') else {
            validate_section_name(path, segment.start, text)?;
            return Ok(Self {
                name: text.to_string(),
                attributes: Vec::new(),
            });
        };

        let name = &text[..bracket];
        validate_section_name(path, segment.start, name)?;

        // `split_path` guarantees a matching `]` for every `[`.
        let closing = text.rfind(']').unwrap_or(text.len());
        if closing + 1 != text.len() {
            return Err(ConfiguratorError::malformed(
                path,
                segment.start + closing + 1,
                text.len() - closing - 1,
                "unexpected text after `]`",
            ));
        }

        let list_offset = segment.start + bracket + 1;
        let attributes = parse_attribute_list(path, list_offset, &text[bracket + 1..closing])?;

        Ok(Self {
            name: name.to_string(),
            attributes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute predicate; empty when the segment had no `[...]`.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Whether a section with this name and these attributes is selected.
    pub fn matches(&self, name: &str, attributes: &[Attribute]) -> bool {
        self.name == name && attribute::contains_all(attributes, &self.attributes)
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Attribute>) {
        (self.name, self.attributes)
    }
}

impl Display for SectionSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;

        if !self.attributes.is_empty() {
            f.write_str("[")?;
            for (index, attribute) in self.attributes.iter().enumerate() {
                if index > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{attribute}")?;
            }
            f.write_str("]")?;
        }

        Ok(())
    }
}

fn validate_section_name(path: &str, offset: usize, name: &str) -> Result<()> {
    validate_xml_name(path, offset, name)?;

    if name == OPTION_TAG {
        return Err(ConfiguratorError::malformed(
            path,
            offset,
            name.len(),
            "`option` is reserved for option elements",
        ));
    }

    Ok(())
}

fn parse_attribute_list(path: &str, offset: usize, list: &str) -> Result<Vec<Attribute>> {
    if list.trim().is_empty() {
        return Err(ConfiguratorError::malformed(
            path,
            offset,
            list.len(),
            "empty attribute list",
        ));
    }

    let mut attributes: Vec<Attribute> = Vec::new();

    for (pair_offset, pair) in split_outside_quotes(list, ',') {
        let pair_offset = offset + pair_offset;
        let attribute = parse_attribute(path, pair_offset, pair)?;

        if attributes
            .iter()
            .any(|existing| existing.name() == attribute.name())
        {
            return Err(ConfiguratorError::malformed(
                path,
                pair_offset,
                pair.len(),
                format!("duplicate attribute `{}`", attribute.name()),
            ));
        }

        attributes.push(attribute);
    }

    Ok(attributes)
}

fn parse_attribute(path: &str, offset: usize, pair: &str) -> Result<Attribute> {
    let Some(equals) = pair.find('=') else {
        return Err(ConfiguratorError::malformed(
            path,
            offset,
            pair.len(),
            "expected `key=value`",
        ));
    };

    let raw_key = &pair[..equals];
    let key = raw_key.trim();
    let key_offset = offset + (raw_key.len() - raw_key.trim_start().len());
    validate_xml_name(path, key_offset, key)?;

    let raw_value = &pair[equals + 1..];
    let value = raw_value.trim();
    let value_offset = offset + equals + 1 + (raw_value.len() - raw_value.trim_start().len());

    let value = match value.strip_prefix('"') {
        Some(quoted) => match quoted.strip_suffix('"') {
            Some(inner) if !inner.contains('"') => inner,
            _ => {
                return Err(ConfiguratorError::malformed(
                    path,
                    value_offset,
                    value.len(),
                    "a quoted value must be a single `\"...\"`",
                ));
            }
        },
        None if value.contains('"') => {
            return Err(ConfiguratorError::malformed(
                path,
                value_offset,
                value.len(),
                "stray quote in attribute value",
            ));
        }
        None => value,
    };

    Ok(Attribute::new(key, value))
}

/// Splits on `separator` outside of `"..."`, yielding each piece with its offset.
fn split_outside_quotes(text: &str, separator: char) -> Vec<(usize, &str)> {
    let mut pieces = Vec::new();
    let mut piece_start = 0;
    let mut quoted = false;

    for (index, character) in text.char_indices() {
        if character == '"' {
            quoted = !quoted;
        } else if character == separator && !quoted {
            pieces.push((piece_start, &text[piece_start..index]));
            piece_start = index + character.len_utf8();
        }
    }

    pieces.push((piece_start, &text[piece_start..]));
    pieces
}
