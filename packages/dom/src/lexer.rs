//! Markup lexer using logos
//!
//! Only the token boundaries of static pages are recognised: tags,
//! comments, doctype and text. Attribute lists are scanned by hand inside the
//! start-tag callback so that `>` inside quoted values does not end the tag.

use crate::document::Attribute;
use logos::{Lexer, Logos};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexError {
    #[default]
    Invalid,
    /// Start tag without a closing `>`
    UnterminatedTag(String),
}

/// A start tag with its attributes already split out.
#[derive(Debug, Clone, PartialEq)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
pub enum Token<'src> {
    #[token("<!--", lex_comment)]
    Comment(&'src str),

    #[regex(r"<![dD][oO][cC][tT][yY][pP][eE][^>]*>", |lex| lex.slice())]
    Doctype(&'src str),

    /// `<![CDATA[...]>`, `<?xml ...?>` and friends; kept as comments
    #[regex(r"<![^-dD>][^>]*>", |lex| lex.slice())]
    #[regex(r"<\?[^>]*>", |lex| lex.slice())]
    Bogus(&'src str),

    #[regex(r"<[a-zA-Z][a-zA-Z0-9:_-]*", lex_start_tag)]
    StartTag(StartTag),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9:_-]*[^>]*>", lex_end_tag)]
    EndTag(String),

    #[regex(r"[^<]+", |lex| lex.slice())]
    #[token("<", |lex| lex.slice())]
    Text(&'src str),
}

fn lex_comment<'s>(lex: &mut Lexer<'s, Token<'s>>) -> &'s str {
    let rest = lex.remainder();
    match rest.find("-->") {
        Some(end) => {
            lex.bump(end + 3);
            &rest[..end]
        }
        None => {
            lex.bump(rest.len());
            rest
        }
    }
}

fn lex_end_tag<'s>(lex: &mut Lexer<'s, Token<'s>>) -> String {
    lex.slice()[2..]
        .trim_end_matches('>')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn lex_start_tag<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Result<StartTag, LexError> {
    let name = lex.slice()[1..].to_ascii_lowercase();
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let mut attributes = Vec::new();
    let mut i = 0;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return Err(LexError::UnterminatedTag(name));
        }
        match bytes[i] {
            b'>' => {
                lex.bump(i + 1);
                return Ok(StartTag {
                    name,
                    attributes,
                    self_closing: false,
                });
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                lex.bump(i + 2);
                return Ok(StartTag {
                    name,
                    attributes,
                    self_closing: true,
                });
            }
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'>'
            && !(bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'>'))
        {
            i += 1;
        }
        let attr_name = rest[name_start..i].to_ascii_lowercase();

        let mut j = i;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j >= bytes.len() || bytes[j] != b'=' {
            if !attr_name.is_empty() {
                attributes.push(Attribute::new(attr_name, ""));
            }
            continue;
        }

        i = j + 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let value = match bytes.get(i) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let value_start = i + 1;
                let end = rest[value_start..]
                    .find(quote as char)
                    .ok_or_else(|| LexError::UnterminatedTag(name.clone()))?;
                i = value_start + end + 1;
                &rest[value_start..value_start + end]
            }
            _ => {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                &rest[value_start..i]
            }
        };
        if !attr_name.is_empty() {
            attributes.push(Attribute::new(attr_name, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token<'_>> {
        Token::lexer(src).map(|t| t.unwrap()).collect()
    }

    #[test]
    fn test_start_tag_attributes() {
        let toks = tokens(r#"<a href="/x?a>b" data-x='1' hidden target=_blank>"#);
        let Token::StartTag(tag) = &toks[0] else {
            panic!("expected start tag, got {:?}", toks[0]);
        };
        assert_eq!(tag.name, "a");
        assert_eq!(
            tag.attributes,
            vec![
                Attribute::new("href", "/x?a>b"),
                Attribute::new("data-x", "1"),
                Attribute::new("hidden", ""),
                Attribute::new("target", "_blank"),
            ]
        );
        assert!(!tag.self_closing);
    }

    #[test]
    fn test_self_closing_and_end_tags() {
        let toks = tokens("<br/><DIV Class=x></Div >");
        assert!(matches!(&toks[0], Token::StartTag(t) if t.name == "br" && t.self_closing));
        assert!(matches!(&toks[1], Token::StartTag(t) if t.name == "div" && t.attributes[0].name == "class"));
        assert_eq!(toks[2], Token::EndTag("div".to_string()));
    }

    #[test]
    fn test_comment_and_doctype() {
        let toks = tokens("<!DOCTYPE html><!-- a <b> -->text");
        assert_eq!(toks[0], Token::Doctype("<!DOCTYPE html>"));
        assert_eq!(toks[1], Token::Comment(" a <b> "));
        assert_eq!(toks[2], Token::Text("text"));
    }

    #[test]
    fn test_stray_lt_is_text() {
        let toks = tokens("a < b");
        assert_eq!(toks, vec![Token::Text("a "), Token::Text("<"), Token::Text(" b")]);
    }

    #[test]
    fn test_unterminated_tag_is_an_error() {
        let mut lex = Token::lexer(r#"<div class="x"#);
        assert_eq!(lex.next(), Some(Err(LexError::UnterminatedTag("div".to_string()))));
    }
}
