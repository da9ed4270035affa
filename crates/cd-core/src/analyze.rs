//! Class extraction from TypeScript-style source.
//!
//! The collaborator behind "analyze file → add block": scans source text for
//! the first `class` declaration and produces the `ClassInfo` payload the
//! store consumes. Member parsing is best-effort — a member that does not
//! parse is skipped; only the absence of any class declaration is an error.
//!
//! Built on `winnow` 0.7, mixing combinators with manual `&mut &str`
//! slicing for the brace/paren-balanced regions.

use crate::model::{Attribute, ClassInfo};
use smallvec::SmallVec;
use winnow::ascii::space0;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Failure modes of class extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzeError {
    /// The input contained no class declaration.
    #[error("no class found in source")]
    NoClassFound,
}

/// Keywords carried onto extracted attributes as modifiers. `get`/`set`
/// are included so accessors come out as methods with a marker.
const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "readonly", "static", "abstract", "async", "override",
    "get", "set",
];

/// Extract the first class declaration from `source`.
pub fn analyze(source: &str) -> Result<ClassInfo, AnalyzeError> {
    let (name, body) = find_class(source).ok_or(AnalyzeError::NoClassFound)?;
    let mut info = ClassInfo::named(name);
    collect_members(body, &mut info);
    log::debug!(
        "analyzed class {} ({} properties, {} methods)",
        info.name,
        info.properties.len(),
        info.methods.len()
    );
    Ok(info)
}

// ─── Class declaration scan ──────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
enum Lex {
    Code,
    LineComment,
    BlockComment,
    Str(char),
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Find the `class` keyword outside comments and string literals, returning
/// the class name and its brace-balanced body.
fn find_class(source: &str) -> Option<(String, &str)> {
    let mut state = Lex::Code;
    let mut prev = '\0';
    for (i, c) in source.char_indices() {
        match state {
            Lex::Code => {
                let rest = &source[i..];
                if rest.starts_with("//") {
                    state = Lex::LineComment;
                } else if rest.starts_with("/*") {
                    state = Lex::BlockComment;
                } else if matches!(c, '"' | '\'' | '`') {
                    state = Lex::Str(c);
                } else if rest.starts_with("class") && !is_ident_char(prev) {
                    let after = &rest[5..];
                    if after.starts_with(char::is_whitespace)
                        && let Some(found) = parse_class_at(after)
                    {
                        return Some(found);
                    }
                }
            }
            Lex::LineComment => {
                if c == '\n' {
                    state = Lex::Code;
                }
            }
            Lex::BlockComment => {
                if prev == '*' && c == '/' {
                    state = Lex::Code;
                }
            }
            Lex::Str(delim) => {
                if c == delim && prev != '\\' {
                    state = Lex::Code;
                }
            }
        }
        prev = c;
    }
    None
}

/// Parse `<Name> [heritage] { body }` right after the `class` keyword.
fn parse_class_at(mut rest: &str) -> Option<(String, &str)> {
    rest = rest.trim_start();
    let name = identifier.parse_next(&mut rest).ok()?;
    let brace = rest.find('{')?;
    let (body, _) = balanced_block(&rest[brace..])?;
    Some((name.to_string(), body))
}

/// Slice the inner text of a `{ ... }` block, honoring nested braces,
/// comments, and string literals. Returns `(inner, after)`.
fn balanced_block(s: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut state = Lex::Code;
    let mut prev = '\0';
    for (i, c) in s.char_indices() {
        match state {
            Lex::Code => {
                if s[i..].starts_with("//") {
                    state = Lex::LineComment;
                } else if s[i..].starts_with("/*") {
                    state = Lex::BlockComment;
                } else {
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth = depth.saturating_sub(1);
                            if depth == 0 {
                                return Some((&s[1..i], &s[i + 1..]));
                            }
                        }
                        '"' | '\'' | '`' => state = Lex::Str(c),
                        _ => {}
                    }
                }
            }
            Lex::LineComment => {
                if c == '\n' {
                    state = Lex::Code;
                }
            }
            Lex::BlockComment => {
                if prev == '*' && c == '/' {
                    state = Lex::Code;
                }
            }
            Lex::Str(delim) => {
                if c == delim && prev != '\\' {
                    state = Lex::Code;
                }
            }
        }
        prev = c;
    }
    None
}

// ─── Member parsing ──────────────────────────────────────────────────────

enum Member {
    Property(Attribute),
    Method(Attribute),
}

fn collect_members(body: &str, info: &mut ClassInfo) {
    let mut rest = body;
    loop {
        skip_trivia(&mut rest);
        if rest.is_empty() {
            break;
        }
        match parse_member(&mut rest) {
            Ok(Some(Member::Property(attr))) => info.properties.push(attr),
            Ok(Some(Member::Method(attr))) => info.methods.push(attr),
            Ok(None) => {}
            // Recovery: drop the malformed line and keep going.
            Err(_) => skip_line(&mut rest),
        }
    }
}

fn parse_member(input: &mut &str) -> ModalResult<Option<Member>> {
    // Decorators apply to the following member; consume and ignore.
    if input.starts_with('@') {
        skip_line(input);
        return Ok(None);
    }

    let mut modifiers: SmallVec<[String; 2]> = SmallVec::new();
    let name = loop {
        let word = identifier.parse_next(input)?;
        skip_space(input);
        // A member can be *named* like a modifier (`static: number`), so a
        // keyword only counts as a modifier when a declaration follows it.
        if MODIFIERS.contains(&word) && !input.starts_with(['(', ':', '=', ';', '\n']) {
            modifiers.push(word.to_string());
            continue;
        }
        break word.to_string();
    };

    if input.starts_with('(') {
        let parameters = parse_params(input)?;
        skip_space(input);
        let ty = if let Some(rest) = input.strip_prefix(':') {
            *input = rest;
            skip_space(input);
            take_type(input, &['{', ';', '\n']).trim().to_string()
        } else {
            "void".to_string()
        };
        let trimmed = input.trim_start();
        if trimmed.starts_with('{') {
            *input = match balanced_block(trimmed) {
                Some((_, after)) => after,
                None => "",
            };
        } else if let Some(rest) = input.strip_prefix(';') {
            *input = rest;
        }
        if name == "constructor" {
            return Ok(None);
        }
        Ok(Some(Member::Method(Attribute {
            name,
            ty,
            access_modifiers: modifiers,
            parameters: Some(parameters),
        })))
    } else {
        let ty = if let Some(rest) = input.strip_prefix(':') {
            *input = rest;
            skip_space(input);
            take_type(input, &['=', ';', '\n']).trim().to_string()
        } else {
            "any".to_string()
        };
        if input.starts_with('=') {
            *input = &input[1..];
            let _ = take_type(input, &[';', '\n']);
        }
        if let Some(rest) = input.strip_prefix(';') {
            *input = rest;
        }
        Ok(Some(Member::Property(Attribute {
            name,
            ty,
            access_modifiers: modifiers,
            parameters: None,
        })))
    }
}

/// Consume `( ... )` and extract the declared type of each parameter.
fn parse_params(input: &mut &str) -> ModalResult<Vec<String>> {
    let s = *input;
    let mut depth = 0i32;
    let mut end = None;
    let mut boundaries = vec![1usize];
    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(i);
                    break;
                }
            }
            ']' | '}' | '>' => depth -= 1,
            ',' if depth == 1 => boundaries.push(i + 1),
            _ => {}
        }
    }
    let Some(end) = end else {
        return Err(ErrMode::Backtrack(ContextError::new()));
    };
    boundaries.push(end + 1);

    let mut params = Vec::new();
    for pair in boundaries.windows(2) {
        let segment = s[pair[0]..pair[1] - 1].trim();
        if !segment.is_empty() {
            params.push(param_type(segment));
        }
    }
    *input = &s[end + 1..];
    Ok(params)
}

/// The declared type of one parameter: the text after the top-level `:`,
/// with any default value stripped. Untyped parameters come out as `any`.
fn param_type(param: &str) -> String {
    let mut depth = 0i32;
    let mut colon = None;
    let mut eq = None;
    let mut chars = param.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '=' && matches!(chars.peek(), Some(&(_, '>'))) {
            chars.next();
            continue;
        }
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            ':' if depth == 0 && colon.is_none() => colon = Some(i),
            '=' if depth == 0 && eq.is_none() => eq = Some(i),
            _ => {}
        }
    }
    let end = eq.unwrap_or(param.len());
    match colon {
        Some(c) if c < end => param[c + 1..end].trim().to_string(),
        _ => "any".to_string(),
    }
}

/// Take type text until a top-level stop character. Bracket pairs nest and
/// `=>` arrows never terminate.
fn take_type<'a>(input: &mut &'a str, stop: &[char]) -> &'a str {
    let s = *input;
    let mut depth = 0i32;
    let mut idx = s.len();
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '=' && matches!(chars.peek(), Some(&(_, '>'))) {
            chars.next();
            continue;
        }
        if depth <= 0 && stop.contains(&c) {
            idx = i;
            break;
        }
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            _ => {}
        }
    }
    let (ty, rest) = s.split_at(idx);
    *input = rest;
    ty
}

// ─── Low-level parsers ───────────────────────────────────────────────────

fn identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., is_ident_char).parse_next(input)
}

fn skip_space(input: &mut &str) {
    let _: ModalResult<&str> = space0.parse_next(input);
}

fn skip_line(input: &mut &str) {
    let _: ModalResult<&str> = take_till(0.., '\n').parse_next(input);
    if let Some(rest) = input.strip_prefix('\n') {
        *input = rest;
    }
}

/// Skip whitespace, comments, and stray `;` between members.
fn skip_trivia(input: &mut &str) {
    loop {
        let before = *input;
        *input = input.trim_start();
        if let Some(rest) = input.strip_prefix("//") {
            *input = rest;
            skip_line(input);
        } else if input.starts_with("/*") {
            match input.find("*/") {
                Some(pos) => *input = &input[pos + 2..],
                None => *input = "",
            }
        } else if let Some(rest) = input.strip_prefix(';') {
            *input = rest;
        }
        if *input == before {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_name_properties_and_methods() {
        let source = r#"
import { UserRepository } from './repo'

export class UserService {
  private readonly repo: UserRepository
  count = 0

  constructor(repo: UserRepository) {
    this.repo = repo
  }

  public findUser(id: string, flags: number): Promise<User> {
    return this.repo.find(id)
  }

  clear(): void {}
}
"#;
        let info = analyze(source).unwrap();
        assert_eq!(info.name, "UserService");

        assert_eq!(info.properties.len(), 2);
        assert_eq!(info.properties[0].name, "repo");
        assert_eq!(info.properties[0].ty, "UserRepository");
        assert_eq!(
            info.properties[0].access_modifiers.as_slice(),
            ["private".to_string(), "readonly".to_string()]
        );
        assert_eq!(info.properties[1].name, "count");
        assert_eq!(info.properties[1].ty, "any");

        assert_eq!(info.methods.len(), 2);
        assert_eq!(info.methods[0].name, "findUser");
        assert_eq!(info.methods[0].ty, "Promise<User>");
        assert_eq!(
            info.methods[0].parameters.as_deref(),
            Some(&["string".to_string(), "number".to_string()][..])
        );
        assert_eq!(info.methods[0].visibility(), Some("public"));
        assert_eq!(info.methods[1].name, "clear");
        assert_eq!(info.methods[1].ty, "void");
        assert_eq!(info.methods[1].parameters.as_deref(), Some(&[][..]));
    }

    #[test]
    fn no_class_is_an_error() {
        assert_eq!(analyze("const x = 1"), Err(AnalyzeError::NoClassFound));
        assert_eq!(analyze(""), Err(AnalyzeError::NoClassFound));
    }

    #[test]
    fn keyword_in_comment_or_string_does_not_count() {
        let source = r#"
// class Fake {}
/* class AlsoFake {} */
const s = "class StringFake {}"
"#;
        assert_eq!(analyze(source), Err(AnalyzeError::NoClassFound));
    }

    #[test]
    fn keyword_must_stand_alone() {
        assert_eq!(
            analyze("const subclass = {}"),
            Err(AnalyzeError::NoClassFound)
        );
    }

    #[test]
    fn heritage_clause_is_skipped() {
        let info = analyze("class A extends Base<T> implements X, Y {}").unwrap();
        assert_eq!(info.name, "A");
        assert!(info.properties.is_empty());
        assert!(info.methods.is_empty());
    }

    #[test]
    fn first_class_wins() {
        let info = analyze("class First {}\nclass Second {}").unwrap();
        assert_eq!(info.name, "First");
    }

    #[test]
    fn function_typed_property_keeps_its_arrow() {
        let info = analyze("class A { handler: (e: Event) => void = noop }").unwrap();
        assert_eq!(info.properties.len(), 1);
        assert_eq!(info.properties[0].ty, "(e: Event) => void");
    }

    #[test]
    fn optional_and_defaulted_parameters() {
        let info = analyze("class A { fmt(value: number, width = 2, tail?: string): string {} }")
            .unwrap();
        assert_eq!(
            info.methods[0].parameters.as_deref(),
            Some(&["number".to_string(), "any".to_string(), "string".to_string()][..])
        );
    }
}
