//! CodeLite macro references in generated text.
//!
//! CodeLite lets option strings, paths and build commands refer to project
//! values through `$(Name)` references, for example:
//!
//! - `-I$(ProjectName)/include`
//! - `./Build/$(ConfigurationName)/$(ProjectName)`
//!
//! The same syntax is used by Make for variable expansion, so generated text
//! mixes both kinds.  Only the macros handed to [`expand_macros`] are
//! replaced; every other reference is written back unchanged.
//!
//! Uses [`chumsky`] for the tokenizer.
//!
//! ## Grammar
//!
//! ```text
//! text      = segment* EOF
//! segment   = reference | literal | '$'
//! reference = '$(' name ')'
//! name      = [A-Za-z0-9_]+
//! literal   = [^$]+
//! ```

use chumsky::prelude::*;

/// A piece of text that is either copied through or looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    /// The name between `$(` and `)`.
    Reference(&'a str),
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Chumsky parser
// ═══════════════════════════════════════════════════════════════════════════════

type ParseErr<'a> = extra::Err<Simple<'a, char>>;

fn segment_parser<'a>() -> impl Parser<'a, &'a str, Vec<Segment<'a>>, ParseErr<'a>> {
    let name = any()
        .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .to_slice();

    let reference = just("$(")
        .ignore_then(name)
        .then_ignore(just(')'))
        .map(Segment::Reference);

    let literal = none_of('$')
        .repeated()
        .at_least(1)
        .to_slice()
        .map(Segment::Literal);

    // A '$' that does not open a reference.
    let dollar = just('$').to_slice().map(Segment::Literal);

    choice((reference, literal, dollar))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

/// Split `input` into literal text and `$(Name)` references.
pub fn parse_segments(input: &str) -> Result<Vec<Segment<'_>>, String> {
    segment_parser()
        .parse(input)
        .into_result()
        .map_err(|errs| {
            let messages: Vec<String> = errs.iter().map(|e| format!("{e}")).collect();
            format!("Failed to tokenize '{}': {}", input, messages.join("; "))
        })
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Expansion
// ═══════════════════════════════════════════════════════════════════════════════

/// Replace the references named in `macros` with their values.
///
/// Replacement values are not rescanned, so a project called
/// `$(ConfigurationName)` stays literal.
pub fn expand_macros(input: &str, macros: &[(&str, &str)]) -> String {
    let segments = match parse_segments(input) {
        Ok(segments) => segments,
        Err(message) => {
            log::debug!("{message}");
            return input.to_string();
        }
    };

    let mut result = String::with_capacity(input.len());
    for segment in segments {
        match segment {
            Segment::Literal(text) => result.push_str(text),
            Segment::Reference(name) => {
                match macros.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => result.push_str(value),
                    None => {
                        result.push_str("$(");
                        result.push_str(name);
                        result.push(')');
                    }
                }
            }
        }
    }

    result
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════
