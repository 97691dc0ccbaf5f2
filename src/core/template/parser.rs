//! Template source parser.
//!
//! ```text
//! Hello, {name}!                     text and a parameter
//! {count} {plural count "file" "files" "files"}
//! Price: \{not a substitution\}      escaped braces
//! ```

use std::{iter::Peekable, str::CharIndices, sync::LazyLock};

use regex::Regex;

use crate::error::TemplateError;

static IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid number regex"));

/// Dotted parameter reference such as `user.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamPath(pub Vec<String>);

impl ParamPath {
    /// JavaScript expression reading the parameter from `params`.
    pub fn to_js(&self) -> String {
        format!("params.{}", self.0.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Param(ParamPath),
    Str(String),
    Num(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subst {
    Param(ParamPath),
    Call {
        name: String,
        args: Vec<Arg>,
        /// Offset of the opening brace.
        offset: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Subst(Subst),
}

#[derive(Debug)]
enum Token {
    Ident(String, usize),
    Str(String),
    Num(String),
}

pub fn parse_template(source: &str) -> Result<Vec<Part>, TemplateError> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => text.push(escaped),
                None => return Err(TemplateError::new("Trailing `\\`", offset)),
            },
            '}' => return Err(TemplateError::new("Unexpected `}`", offset)),
            '{' => {
                if !text.is_empty() {
                    parts.push(Part::Text(std::mem::take(&mut text)));
                }
                let tokens = read_substitution(&mut chars, offset)?;
                parts.push(Part::Subst(build_subst(tokens, offset)?));
            }
            _ => text.push(c),
        }
    }

    if !text.is_empty() {
        parts.push(Part::Text(text));
    }
    Ok(parts)
}

fn read_substitution(
    chars: &mut Peekable<CharIndices<'_>>,
    open: usize,
) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();

    loop {
        while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}

        let Some(&(offset, c)) = chars.peek() else {
            return Err(TemplateError::new("Unclosed `{`", open));
        };

        match c {
            '}' => {
                chars.next();
                return Ok(tokens);
            }
            '{' => return Err(TemplateError::new("Nested `{`", offset)),
            '"' | '\'' => {
                chars.next();
                tokens.push(Token::Str(read_string(chars, c, offset)?));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let word = read_word(chars);
                if !NUMBER.is_match(&word) {
                    return Err(TemplateError::new(format!("Invalid number `{}`", word), offset));
                }
                tokens.push(Token::Num(word));
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                tokens.push(Token::Ident(read_word(chars), offset));
            }
            other => {
                return Err(TemplateError::new(
                    format!("Unexpected character `{}`", other),
                    offset,
                ));
            }
        }
    }
}

fn read_word(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut word = String::new();
    while let Some((_, c)) =
        chars.next_if(|&(_, c)| !c.is_whitespace() && !matches!(c, '{' | '}' | '"' | '\''))
    {
        word.push(c);
    }
    word
}

fn read_string(
    chars: &mut Peekable<CharIndices<'_>>,
    quote: char,
    start: usize,
) -> Result<String, TemplateError> {
    let mut value = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, escaped)) => value.push(escaped),
                None => break,
            },
            c if c == quote => return Ok(value),
            c => value.push(c),
        }
    }
    Err(TemplateError::new("Unterminated string", start))
}

fn parse_param(word: &str, offset: usize) -> Result<ParamPath, TemplateError> {
    let segments: Vec<String> = word.split('.').map(str::to_string).collect();
    if segments.iter().any(|s| !IDENT.is_match(s)) {
        return Err(TemplateError::new(
            format!("Invalid parameter name `{}`", word),
            offset,
        ));
    }
    Ok(ParamPath(segments))
}

fn build_subst(tokens: Vec<Token>, open: usize) -> Result<Subst, TemplateError> {
    let mut tokens = tokens.into_iter();
    let head = match tokens.next() {
        None => return Err(TemplateError::new("Empty substitution `{}`", open)),
        Some(Token::Ident(word, offset)) => (word, offset),
        Some(_) => {
            return Err(TemplateError::new(
                "Expected a parameter or function name",
                open,
            ));
        }
    };

    let rest: Vec<Token> = tokens.collect();
    if rest.is_empty() {
        return Ok(Subst::Param(parse_param(&head.0, head.1)?));
    }

    if !IDENT.is_match(&head.0) {
        return Err(TemplateError::new(
            format!("Invalid function name `{}`", head.0),
            head.1,
        ));
    }

    let args = rest
        .into_iter()
        .map(|token| match token {
            Token::Ident(word, offset) => parse_param(&word, offset).map(Arg::Param),
            Token::Str(s) => Ok(Arg::Str(s)),
            Token::Num(n) => Ok(Arg::Num(n)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Subst::Call {
        name: head.0,
        args,
        offset: open,
    })
}
