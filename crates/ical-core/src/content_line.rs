//! Content-line grammar (RFC 5545 §3.1): `name *(";" param) ":" value`.
//!
//! Parsing works on one already-unfolded logical line and never looks past
//! the first value-separating colon: the value is taken verbatim. Every
//! violation fails with its own error kind; nothing is guessed or repaired
//! unless [`DecoderOptions::lenient_param_quoting`] asks for it.
//!
//! Serializing is the inverse, with parameters in name order so that output
//! is reproducible.

use crate::decoder::DecoderOptions;
use crate::error::{IcalError, Result};
use crate::property::{Params, Property};

/// Parse one logical line into a [`Property`].
pub fn parse_content_line(line: &str, options: &DecoderOptions) -> Result<Property> {
    let mut cursor = Cursor {
        line,
        rest: line,
        lenient_quoting: options.lenient_param_quoting,
    };

    let name = cursor.name()?;
    let mut params = Params::new();
    while cursor.consume(';') {
        let (param_name, values) = cursor.param()?;
        params.extend(&param_name, values);
    }

    if !cursor.consume(':') {
        return Err(IcalError::MalformedProperty(format!(
            "{line:?}: expected ':' before the value"
        )));
    }

    Ok(Property {
        name,
        params,
        value: cursor.rest.to_string(),
    })
}

/// Serialize `prop` as one logical line (no folding, no line terminator).
///
/// Fails on anything the parser would read back differently: an empty or
/// delimiter-bearing property or parameter name, or a parameter without
/// values.
pub fn write_content_line(prop: &Property, out: &mut String) -> Result<()> {
    if prop.name.is_empty() || prop.name.contains([';', ':', '"', '\r', '\n']) {
        return Err(IcalError::MalformedProperty(format!(
            "{:?}: property name cannot be written",
            prop.name
        )));
    }
    out.push_str(&prop.name);

    for (name, values) in &prop.params {
        if name.is_empty() || name.contains([';', ':', '=', ',', '"', '\r', '\n']) {
            return Err(IcalError::MalformedParam(format!(
                "{};{name:?}: param name cannot be written",
                prop.name
            )));
        }
        if values.is_empty() {
            return Err(IcalError::MalformedParam(format!(
                "{};{name}: param has no values",
                prop.name
            )));
        }
        out.push(';');
        out.push_str(name);
        out.push('=');
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if value.contains('"') {
                return Err(IcalError::ParamValueContainsQuote(name.clone()));
            }
            if value.contains(['\r', '\n']) {
                return Err(IcalError::ValueContainsControlCharacters(format!(
                    "{};{name}",
                    prop.name
                )));
            }
            if value.contains([';', ':', ',']) {
                out.push('"');
                out.push_str(value);
                out.push('"');
            } else {
                out.push_str(value);
            }
        }
    }

    out.push(':');
    if prop.value.contains(['\r', '\n']) {
        return Err(IcalError::ValueContainsControlCharacters(prop.name.clone()));
    }
    out.push_str(&prop.value);
    Ok(())
}

/// Position within the logical line being parsed.
struct Cursor<'a> {
    line: &'a str,
    rest: &'a str,
    lenient_quoting: bool,
}

impl<'a> Cursor<'a> {
    fn consume(&mut self, c: char) -> bool {
        match self.rest.strip_prefix(c) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn take(&mut self, len: usize) -> &'a str {
        let (taken, rest) = self.rest.split_at(len);
        self.rest = rest;
        taken
    }

    /// Property name: everything before the first `;` or `:`.
    fn name(&mut self) -> Result<String> {
        let end = self.rest.find([';', ':']).ok_or_else(|| {
            IcalError::MalformedLine(format!("{:?}: missing ':'", self.line))
        })?;
        if end == 0 {
            return Err(IcalError::MalformedLine(format!(
                "{:?}: empty property name",
                self.line
            )));
        }
        Ok(self.take(end).to_ascii_uppercase())
    }

    /// `name=value[,value...]`, positioned just after the `;`.
    fn param(&mut self) -> Result<(String, Vec<String>)> {
        let end = self.rest.find(['=', ';', ':']).unwrap_or(self.rest.len());
        if self.rest[end..].chars().next() != Some('=') {
            return Err(IcalError::MalformedParam(format!(
                "{:?}: missing '=' after param name",
                self.line
            )));
        }
        if end == 0 {
            return Err(IcalError::MalformedParam(format!(
                "{:?}: empty param name",
                self.line
            )));
        }
        let name = self.take(end).to_ascii_uppercase();
        self.consume('=');

        let mut values = Vec::new();
        loop {
            values.push(self.param_value()?);
            match self.peek() {
                Some(',') => {
                    self.consume(',');
                }
                Some(';' | ':') | None => break,
                Some(c) => {
                    return Err(IcalError::MalformedParamValue(format!(
                        "{:?}: unexpected {c:?} after param value",
                        self.line
                    )))
                }
            }
        }
        Ok((name, values))
    }

    /// One quoted or bare parameter value.
    fn param_value(&mut self) -> Result<String> {
        if self.consume('"') {
            let end = self.rest.find('"').ok_or_else(|| {
                IcalError::MalformedParamValue(format!(
                    "{:?}: unterminated quoted string",
                    self.line
                ))
            })?;
            let value = self.take(end).to_string();
            self.consume('"');
            return Ok(value);
        }

        let end = if self.lenient_quoting {
            self.rest.find([';', ',', ':'])
        } else {
            self.rest.find([';', ',', ':', '"'])
        }
        .unwrap_or(self.rest.len());

        if self.rest[end..].starts_with('"') {
            return Err(IcalError::MalformedParamValue(format!(
                "{:?}: illegal double-quote",
                self.line
            )));
        }
        Ok(self.take(end).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Property> {
        parse_content_line(line, &DecoderOptions::default())
    }

    #[test]
    fn parses_name_and_value() {
        let prop = parse("uid:abc:def").unwrap();
        assert_eq!(prop.name, "UID");
        assert!(prop.params.is_empty());
        assert_eq!(prop.value, "abc:def");
    }

    #[test]
    fn parses_quoted_and_multi_valued_params() {
        let prop = parse(r#"SUMMARY;FOO=bar,"b:az":Hello"#).unwrap();
        assert_eq!(prop.name, "SUMMARY");
        assert_eq!(prop.params.get_all("FOO"), ["bar", "b:az"]);
        assert_eq!(prop.value, "Hello");
    }

    #[test]
    fn param_names_are_upper_cased() {
        let prop = parse("DTSTART;tzid=Europe/Paris:20200923T195100").unwrap();
        assert_eq!(prop.params.get("TZID"), Some("Europe/Paris"));
    }

    #[test]
    fn repeated_param_names_accumulate() {
        let prop = parse("X;A=1;A=2,3:v").unwrap();
        assert_eq!(prop.params.get_all("A"), ["1", "2", "3"]);
    }

    #[test]
    fn empty_value_is_allowed() {
        assert_eq!(parse("DESCRIPTION:").unwrap().value, "");
    }

    #[test]
    fn missing_colon_is_malformed_line() {
        assert!(matches!(parse("NOCOLON"), Err(IcalError::MalformedLine(_))));
    }

    #[test]
    fn empty_name_is_malformed_line() {
        assert!(matches!(parse(":value"), Err(IcalError::MalformedLine(_))));
    }

    #[test]
    fn param_without_equals_is_malformed_param() {
        assert!(matches!(parse("A;B:c"), Err(IcalError::MalformedParam(_))));
        assert!(matches!(parse("A;=x:c"), Err(IcalError::MalformedParam(_))));
    }

    #[test]
    fn unterminated_quote_is_malformed_param_value() {
        assert!(matches!(
            parse(r#"A;B="xyz:c"#),
            Err(IcalError::MalformedParamValue(_))
        ));
    }

    #[test]
    fn quote_inside_bare_value_is_malformed_param_value() {
        assert!(matches!(
            parse(r#"A;B=x"y:c"#),
            Err(IcalError::MalformedParamValue(_))
        ));
    }

    #[test]
    fn lenient_quoting_keeps_stray_quote() {
        let options = DecoderOptions {
            lenient_param_quoting: true,
            ..DecoderOptions::default()
        };
        let prop = parse_content_line(r#"A;B=x"y:c"#, &options).unwrap();
        assert_eq!(prop.params.get("B"), Some(r#"x"y"#));
    }

    #[test]
    fn params_without_value_separator_is_malformed_property() {
        assert!(matches!(
            parse("A;B=c"),
            Err(IcalError::MalformedProperty(_))
        ));
    }

    #[test]
    fn serializes_params_sorted_and_quoted() {
        let mut prop = Property::with_value("ATTENDEE", "mailto:a@example.com");
        prop.params.set("ROLE", "REQ-PARTICIPANT");
        prop.params.set("CN", "Doe, Jane");
        let mut out = String::new();
        write_content_line(&prop, &mut out).unwrap();
        assert_eq!(
            out,
            r#"ATTENDEE;CN="Doe, Jane";ROLE=REQ-PARTICIPANT:mailto:a@example.com"#
        );
    }

    #[test]
    fn serializing_quote_in_param_fails() {
        let mut prop = Property::with_value("X", "v");
        prop.params.set("P", "say \"hi\"");
        let err = write_content_line(&prop, &mut String::new()).unwrap_err();
        assert!(matches!(err, IcalError::ParamValueContainsQuote(_)));
    }

    #[test]
    fn serializing_newline_in_value_fails() {
        let prop = Property::with_value("DESCRIPTION", "a\r\nb");
        let err = write_content_line(&prop, &mut String::new()).unwrap_err();
        assert!(matches!(err, IcalError::ValueContainsControlCharacters(_)));
    }
}
