use super::err::{Result, XmlError};
use logos::{Logos, SpannedIter};
use std::fmt::Display;

/// Tokens of the abixml subset of XML. Documents carry no meaningful text
/// content: everything lives in element names and attributes, so comments,
/// the prolog and doctype are skipped outright.
#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"<\?([^?]|\?[^>])*\?>")]
#[logos(skip r"<!--([^-]|-[^-])*-->")]
#[logos(skip r"<!DOCTYPE[^>]*>")]
pub enum Tok<'input> {
    #[token("</")]
    OpenSlash,
    #[token("<")]
    Open,
    #[token("/>")]
    SlashClose,
    #[token(">")]
    Close,
    #[token("=")]
    Equals,
    #[regex(r"[A-Za-z_:][A-Za-z0-9_:.-]*")]
    Name(&'input str),
    #[regex(r#""[^"]*""#)]
    Quoted(&'input str),
    #[regex(r"'[^']*'")]
    QuotedSingle(&'input str),
}

impl Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | Tok::OpenSlash => write!(f, "</"),
            | Tok::Open => write!(f, "<"),
            | Tok::SlashClose => write!(f, "/>"),
            | Tok::Close => write!(f, ">"),
            | Tok::Equals => write!(f, "="),
            | Tok::Name(s) => write!(f, "{}", s),
            | Tok::Quoted(s) | Tok::QuotedSingle(s) => write!(f, "{}", s),
        }
    }
}

pub struct Lexer<'source> {
    inner: SpannedIter<'source, Tok<'source>>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self { inner: Tok::lexer(source).spanned() }
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Result<(usize, Tok<'source>, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next() {
            | Some((Ok(tok), range)) => Some(Ok((range.start, tok, range.end))),
            | Some((Err(()), range)) => Some(Err(XmlError::Lex { at: range.start })),
            | None => None,
        }
    }
}

/// Resolve the five predefined XML entities; anything else is left as-is.
pub fn unescape(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_owned();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let entity = [
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&amp;", '&'),
            ("&quot;", '"'),
            ("&apos;", '\''),
        ]
        .iter()
        .find(|(pat, _)| rest.starts_with(pat));
        match entity {
            | Some((pat, ch)) => {
                out.push(*ch);
                rest = &rest[pat.len()..];
            }
            | None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
