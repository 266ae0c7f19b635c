//! Recursive-descent parser for type-tag text.
//!
//! Grammar (whitespace is ignored everywhere):
//!
//! ```text
//! type      := name [ '<' type { ',' type } '>' ]
//! name      := primitive | 'vector' | address '::' ident '::' ident
//! ```
//!
//! Each `<` recurses one level and must be closed by a matching `>` at the
//! same depth. Nesting stops at [`MAX_NESTING_DEPTH`].

use std::str::FromStr;

use crate::bcs::MAX_NESTING_DEPTH;
use crate::error::ParseError;
use crate::types::address::AccountAddress;
use crate::types::type_tag::{StructTag, TypeTag};

pub(crate) fn parse_type_tag(input: &str) -> Result<TypeTag, ParseError> {
    let mut parser = Parser::new(input);
    let tag = parser.type_tag()?;
    match parser.next_significant() {
        None => Ok(tag),
        Some((position, '>')) => Err(ParseError::UnbalancedBracket { ch: '>', position }),
        Some((position, ch)) => Err(ParseError::UnexpectedCharacter { ch, position }),
    }
}

/// Move identifier: ASCII letter or `_`, then letters, digits or `_`.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

struct Parser {
    chars: Vec<(usize, char)>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.char_indices().collect(),
            index: 0,
            depth: 0,
        }
    }

    fn end_position(&self) -> usize {
        self.chars.last().map(|(i, c)| i + c.len_utf8()).unwrap_or(0)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.get(self.index), Some((_, c)) if c.is_whitespace()) {
            self.index += 1;
        }
    }

    fn peek_significant(&mut self) -> Option<(usize, char)> {
        self.skip_whitespace();
        self.chars.get(self.index).copied()
    }

    fn next_significant(&mut self) -> Option<(usize, char)> {
        let next = self.peek_significant();
        if next.is_some() {
            self.index += 1;
        }
        next
    }

    /// Accumulate one segment name up to the next delimiter.
    fn name(&mut self) -> (usize, String) {
        let start = self
            .peek_significant()
            .map(|(i, _)| i)
            .unwrap_or_else(|| self.end_position());
        let mut name = String::new();
        while let Some((_, c)) = self.chars.get(self.index).copied() {
            match c {
                '<' | ',' | '>' => break,
                c if c.is_whitespace() => {}
                c => name.push(c),
            }
            self.index += 1;
        }
        (start, name)
    }

    fn type_tag(&mut self) -> Result<TypeTag, ParseError> {
        let (position, name) = self.name();
        if name.is_empty() {
            return Err(ParseError::EmptySegment { position });
        }

        let type_args = match self.peek_significant() {
            Some((open, '<')) => {
                if self.depth == MAX_NESTING_DEPTH {
                    return Err(ParseError::NestingTooDeep {
                        position: open,
                        max: MAX_NESTING_DEPTH,
                    });
                }
                self.index += 1;
                self.depth += 1;
                let args = self.type_args(open)?;
                self.depth -= 1;
                args
            }
            _ => Vec::new(),
        };

        build(name, type_args)
    }

    /// Comma-separated arguments after an opening `<` at `open`, consuming the
    /// matching `>`.
    fn type_args(&mut self, open: usize) -> Result<Vec<TypeTag>, ParseError> {
        let mut args = Vec::new();
        loop {
            if self.peek_significant().is_none() {
                return Err(ParseError::UnterminatedGenerics { position: open });
            }
            args.push(self.type_tag()?);
            match self.next_significant() {
                Some((_, ',')) => continue,
                Some((_, '>')) => return Ok(args),
                Some((position, ch)) => {
                    return Err(ParseError::UnexpectedCharacter { ch, position })
                }
                None => return Err(ParseError::UnterminatedGenerics { position: open }),
            }
        }
    }
}

fn build(name: String, type_args: Vec<TypeTag>) -> Result<TypeTag, ParseError> {
    if name.contains("::") {
        return build_struct(&name, type_args).map(TypeTag::from);
    }

    let primitive = match name.as_str() {
        "vector" => {
            if type_args.len() != 1 {
                return Err(ParseError::WrongArity {
                    name,
                    expected: 1,
                    actual: type_args.len(),
                });
            }
            let mut type_args = type_args;
            return Ok(TypeTag::vector(type_args.remove(0)));
        }
        "bool" => TypeTag::Bool,
        "u8" => TypeTag::U8,
        "u16" => TypeTag::U16,
        "u32" => TypeTag::U32,
        "u64" => TypeTag::U64,
        "u128" => TypeTag::U128,
        "u256" => TypeTag::U256,
        "address" => TypeTag::Address,
        "signer" => TypeTag::Signer,
        _ => return Err(ParseError::UnknownType(name)),
    };

    if !type_args.is_empty() {
        return Err(ParseError::WrongArity {
            name,
            expected: 0,
            actual: type_args.len(),
        });
    }
    Ok(primitive)
}

fn build_struct(path: &str, type_args: Vec<TypeTag>) -> Result<StructTag, ParseError> {
    let parts: Vec<&str> = path.split("::").collect();
    let [address, module, name] = parts.as_slice() else {
        return Err(ParseError::InvalidPath(path.to_string()));
    };
    if !is_identifier(module) || !is_identifier(name) {
        return Err(ParseError::InvalidPath(path.to_string()));
    }
    Ok(StructTag::new(
        AccountAddress::from_str(address)?,
        *module,
        *name,
        type_args,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<TypeTag, ParseError> {
        parse_type_tag(s)
    }

    #[test]
    fn test_plain_struct_has_no_type_args() {
        let tag = StructTag::from_str("0x1::endless_coin::EndlessCoin").unwrap();
        assert_eq!(tag.address, AccountAddress::ONE);
        assert_eq!(tag.module, "endless_coin");
        assert_eq!(tag.name, "EndlessCoin");
        assert!(tag.type_args.is_empty());
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let spaced = parse(" 0x1 :: m :: A < 0x1::m::B ,0x1::m::C< u8 > > ").unwrap();
        let tight = parse("0x1::m::A<0x1::m::B,0x1::m::C<u8>>").unwrap();
        assert_eq!(spaced, tight);
        assert_eq!(tight.to_string(), "0x1::m::A<0x1::m::B, 0x1::m::C<u8>>");
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 64;
        let mut text = String::new();
        for i in 0..depth {
            text.push_str(&format!("0x1::m{i}::S<"));
        }
        text.push_str("u8");
        text.push_str(&">".repeat(depth));

        let tag = parse(&text).unwrap();
        assert_eq!(tag.to_string(), text);

        let mut cursor = &tag;
        for _ in 0..depth {
            cursor = &cursor.as_struct().unwrap().type_args[0];
        }
        assert_eq!(*cursor, TypeTag::U8);
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!(
            "{}u8{}",
            "vector<".repeat(MAX_NESTING_DEPTH),
            ">".repeat(MAX_NESTING_DEPTH)
        );
        assert!(parse(&at_limit).is_ok());

        let hostile = "vector<".repeat(100_000);
        assert_eq!(
            parse(&hostile).unwrap_err(),
            ParseError::NestingTooDeep {
                position: MAX_NESTING_DEPTH * 7 + 6,
                max: MAX_NESTING_DEPTH
            }
        );
    }

    #[test]
    fn test_primitives_and_vectors() {
        assert_eq!(parse("u256").unwrap(), TypeTag::U256);
        assert_eq!(
            parse("vector<vector<address>>").unwrap(),
            TypeTag::vector(TypeTag::vector(TypeTag::Address))
        );
        let tag = parse("0x1::table::Table<address, vector<u8>>").unwrap();
        assert_eq!(tag.to_string(), "0x1::table::Table<address, vector<u8>>");
    }

    #[test]
    fn test_long_address_is_kept_canonical() {
        let text = format!("0x{}::m::S", "ab".repeat(32));
        assert_eq!(parse(&text).unwrap().to_string(), text);
        // Short non-special addresses are normalized to the long form.
        assert_eq!(
            parse("0x10::m::S").unwrap().to_string(),
            format!("0x{:0>64}::m::S", "10")
        );
    }

    #[test]
    fn test_unterminated_generics() {
        assert_eq!(
            parse("0x1::m::A<0x1::m::B").unwrap_err(),
            ParseError::UnterminatedGenerics { position: 9 }
        );
        assert!(matches!(
            parse("0x1::m::A<0x1::m::B<u8>"),
            Err(ParseError::UnterminatedGenerics { .. })
        ));
        assert!(matches!(
            parse("0x1::m::A<"),
            Err(ParseError::UnterminatedGenerics { .. })
        ));
    }

    #[test]
    fn test_extra_closing_bracket() {
        assert_eq!(
            parse("0x1::m::A<u8>>").unwrap_err(),
            ParseError::UnbalancedBracket {
                ch: '>',
                position: 13
            }
        );
        assert!(matches!(
            parse("0x1::m::A>"),
            Err(ParseError::UnbalancedBracket { .. })
        ));
    }

    #[test]
    fn test_empty_segments() {
        assert!(matches!(parse(""), Err(ParseError::EmptySegment { .. })));
        assert!(matches!(
            parse("0x1::m::A<>"),
            Err(ParseError::EmptySegment { .. })
        ));
        assert!(matches!(
            parse("0x1::m::A<u8,>"),
            Err(ParseError::EmptySegment { .. })
        ));
        assert!(matches!(
            parse("0x1::m::A<,u8>"),
            Err(ParseError::EmptySegment { .. })
        ));
    }

    #[test]
    fn test_malformed_paths() {
        assert!(matches!(parse("0x1::m"), Err(ParseError::InvalidPath(_))));
        assert!(matches!(
            parse("0x1::m::A::B"),
            Err(ParseError::InvalidPath(_))
        ));
        assert!(matches!(parse("0x1::::A"), Err(ParseError::InvalidPath(_))));
        assert!(matches!(
            parse("0xzz::m::A"),
            Err(ParseError::InvalidAddress(_))
        ));
        assert!(matches!(parse("u9"), Err(ParseError::UnknownType(_))));
    }

    #[test]
    fn test_arity_checks() {
        assert!(matches!(
            parse("vector<u8, u16>"),
            Err(ParseError::WrongArity { expected: 1, .. })
        ));
        assert!(matches!(
            parse("vector"),
            Err(ParseError::WrongArity { actual: 0, .. })
        ));
        assert!(matches!(
            parse("u8<u8>"),
            Err(ParseError::WrongArity { expected: 0, .. })
        ));
    }

    #[test]
    fn test_junk_after_generics() {
        assert!(matches!(
            parse("0x1::m::A<u8><u16>"),
            Err(ParseError::UnexpectedCharacter { ch: '<', .. })
        ));
        assert!(matches!(
            parse("0x1::m::A<u8>,"),
            Err(ParseError::UnexpectedCharacter { ch: ',', .. })
        ));
    }

    #[test]
    fn test_struct_tag_rejects_primitive() {
        assert!(StructTag::from_str("u64").is_err());
    }
}
