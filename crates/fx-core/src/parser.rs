//! FX text front-end.
//!
//! The grammar handled here is the declaration layer of an effect file:
//! global parameter declarations, `technique { pass { ... } }` blocks and
//! everything else (functions, structs, preprocessor lines), which is passed
//! through untouched as shader source for the compiler.

use crate::effect::{
    EffectDesc, ParameterDesc, ParameterUsage, PassDesc, ShaderEntry, TechniqueDesc,
};
use crate::error::FxError;
use crate::state::RenderState;

const TECHNIQUE_KEYWORDS: &[&str] = &["technique", "technique9", "technique10", "technique11"];
const PASS_KEYWORDS: &[&str] = &["pass"];

/// Byte range of one statement inside the text it was split from.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    fn trimmed(text: &str, start: usize, end: usize) -> Option<Self> {
        let raw = &text[start..end];
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lead = raw.len() - raw.trim_start().len();
        Some(Self {
            start: start + lead,
            end: start + lead + trimmed.len(),
        })
    }

    fn of<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Parse FX text into an [`EffectDesc`].
pub fn parse_effect(text: &str) -> Result<EffectDesc, FxError> {
    let text = strip_comments(text);
    let spans = split_statements(&text, TECHNIQUE_KEYWORDS)?;

    let mut source = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut technique_spans = Vec::new();
    let mut parameters = Vec::new();

    for span in &spans {
        let stmt = span.of(&text);
        if starts_with_keyword(stmt, TECHNIQUE_KEYWORDS) {
            source.push_str(&text[cursor..span.start]);
            cursor = span.end;
            technique_spans.push(*span);
        } else if is_declaration(stmt) {
            match parse_parameter(stmt) {
                Some(param) => parameters.push(param),
                None => tracing::debug!(stmt, "skipping unrecognised declaration"),
            }
        }
    }
    source.push_str(&text[cursor..]);

    let techniques = technique_spans
        .iter()
        .enumerate()
        .map(|(index, span)| parse_technique(span.of(&text), index, &source))
        .collect::<Result<Vec<_>, _>>()?;

    let effect = EffectDesc {
        techniques,
        parameters,
    };
    effect.validate()?;

    tracing::debug!(
        techniques = effect.techniques.len(),
        passes = effect.pass_count(),
        parameters = effect.parameters.len(),
        "parsed effect"
    );
    Ok(effect)
}

/// Remove `//` and `/* */` comments, leaving string literals alone. Newlines
/// inside block comments are kept so preprocessor lines stay intact.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Split `text` into top-level statements.
///
/// A statement ends at a `;` outside braces and annotations, or at the `}`
/// closing a block whose head is a function signature or starts with one of
/// `block_keywords`. Preprocessor lines are skipped.
fn split_statements(text: &str, block_keywords: &[&str]) -> Result<Vec<Span>, FxError> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut seen_assign = false;
    let mut first_brace: Option<usize> = None;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if in_string {
            match c {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }
        let mut ended_at = None;
        match c {
            b'"' => in_string = true,
            b'#' if depth == 0 && text[start..i].trim().is_empty() => {
                let end = preprocessor_end(text, i);
                i = end;
                start = end;
                continue;
            }
            b'<' if depth == 0 && !seen_assign => angle += 1,
            b'>' if depth == 0 && angle > 0 => angle -= 1,
            b'=' if depth == 0 && angle == 0 => seen_assign = true,
            b'{' => {
                if depth == 0 && angle == 0 && first_brace.is_none() {
                    first_brace = Some(i);
                }
                depth += 1;
            }
            b'}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| FxError::Load(format!("unbalanced '}}' at byte {i}")))?;
                if depth == 0 && angle == 0 {
                    let head = &text[start..first_brace.unwrap_or(i)];
                    if head.contains('(') || starts_with_keyword(head, block_keywords) {
                        ended_at = Some((i + 1, i + 1));
                    }
                }
            }
            b';' if depth == 0 && angle == 0 => ended_at = Some((i, i + 1)),
            _ => {}
        }
        if let Some((end, next)) = ended_at {
            spans.extend(Span::trimmed(text, start, end));
            start = next;
            seen_assign = false;
            first_brace = None;
        }
        i += 1;
    }

    if depth != 0 {
        return Err(FxError::Load("unbalanced '{' in effect source".into()));
    }
    if !text[start..].trim().is_empty() {
        return Err(FxError::Load(format!(
            "unterminated declaration: '{}'",
            text[start..].trim()
        )));
    }
    Ok(spans)
}

/// End of the preprocessor directive starting at `from`, following
/// backslash-continued lines.
fn preprocessor_end(text: &str, from: usize) -> usize {
    let mut line_start = from;
    loop {
        let line_end = text[line_start..]
            .find('\n')
            .map_or(text.len(), |n| line_start + n);
        if line_end == text.len() || !text[line_start..line_end].trim_end().ends_with('\\') {
            return line_end;
        }
        line_start = line_end + 1;
    }
}

/// Characters of `text` outside string literals, with their byte offsets.
fn unquoted(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut in_string = false;
    let mut escaped = false;
    text.char_indices().filter(move |&(_, c)| {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            false
        } else {
            in_string = c == '"';
            !in_string
        }
    })
}

fn first_word(text: &str) -> &str {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    &text[..end]
}

fn starts_with_keyword(text: &str, keywords: &[&str]) -> bool {
    let word = first_word(text);
    keywords.iter().any(|k| word.eq_ignore_ascii_case(k))
}

/// Variable declarations, as opposed to functions, structs and typedefs.
fn is_declaration(stmt: &str) -> bool {
    if starts_with_keyword(stmt, &["struct", "typedef", "cbuffer", "tbuffer"]) {
        return false;
    }
    match (stmt.find('('), stmt.find('=')) {
        (Some(paren), Some(assign)) => assign < paren,
        (Some(_), None) => false,
        _ => true,
    }
}

/// Split a declaration into its head (annotations removed) and the
/// initializer following the first top-level `=`.
fn split_initializer(stmt: &str) -> (String, Option<&str>) {
    let mut head = String::new();
    let mut angle = 0usize;
    for (i, c) in unquoted(stmt) {
        match c {
            '<' => angle += 1,
            '>' if angle > 0 => angle -= 1,
            '=' if angle == 0 => return (head, Some(stmt[i + 1..].trim())),
            _ if angle == 0 => head.push(c),
            _ => {}
        }
    }
    (head, None)
}

fn parse_parameter(stmt: &str) -> Option<ParameterDesc> {
    let (head, init) = split_initializer(stmt);

    let mut parts = head.split(':');
    let lhs = parts.next()?;
    let semantic = parts
        .map(str::trim)
        .find(|s| !s.is_empty() && !s.starts_with("register") && !s.starts_with("packoffset"))
        .unwrap_or("")
        .to_string();

    let mut tokens: Vec<&str> = lhs.split_whitespace().collect();
    // `float4 lights [4]` → treat the array suffix as part of the name.
    if tokens.len() > 2 && tokens.last()?.starts_with('[') {
        tokens.pop();
    }
    let (name_token, rest) = tokens.split_last()?;
    let (type_name, modifiers) = rest.split_last()?;
    let name = name_token.split('[').next()?.trim();
    if name.is_empty() {
        return None;
    }

    let usage = if modifiers
        .iter()
        .any(|m| *m == "const" || *m == "static")
    {
        ParameterUsage::Const
    } else if modifiers.contains(&"varying") {
        ParameterUsage::Varying
    } else {
        ParameterUsage::Uniform
    };

    Some(ParameterDesc {
        usage,
        type_name: type_name.to_string(),
        name: name.to_string(),
        semantic,
        default_expr: init.unwrap_or("").to_string(),
    })
}

/// Split `keyword name <annotations> { body }` into its name and body.
fn split_block(stmt: &str) -> Result<(Option<&str>, &str), FxError> {
    let mut angle = 0usize;
    let open = unquoted(stmt)
        .find(|&(_, c)| match c {
            '<' => {
                angle += 1;
                false
            }
            '>' if angle > 0 => {
                angle -= 1;
                false
            }
            '{' => angle == 0,
            _ => false,
        })
        .map(|(i, _)| i)
        .ok_or_else(|| FxError::Load(format!("expected '{{' in '{stmt}'")))?;
    let close = stmt
        .rfind('}')
        .filter(|&close| close > open)
        .ok_or_else(|| FxError::Load(format!("expected '}}' in '{stmt}'")))?;

    let head = stmt[..open].split('<').next().unwrap_or("");
    let name = head.split_whitespace().nth(1);
    Ok((name, &stmt[open + 1..close]))
}

fn parse_technique(stmt: &str, index: usize, source: &str) -> Result<TechniqueDesc, FxError> {
    let (name, body) = split_block(stmt)?;
    let name = name.map_or_else(|| format!("technique{index}"), str::to_string);

    let mut passes = Vec::new();
    for span in split_statements(body, PASS_KEYWORDS)? {
        let stmt = span.of(body);
        if starts_with_keyword(stmt, PASS_KEYWORDS) {
            passes.push(parse_pass(stmt, passes.len(), source)?);
        } else {
            tracing::debug!(technique = %name, stmt, "ignoring technique-level statement");
        }
    }
    if passes.is_empty() {
        return Err(FxError::Load(format!("technique '{name}' has no passes")));
    }
    Ok(TechniqueDesc { name, passes })
}

fn parse_pass(stmt: &str, index: usize, source: &str) -> Result<PassDesc, FxError> {
    let (name, body) = split_block(stmt)?;
    let mut pass = PassDesc::new(&name.map_or_else(|| format!("pass{index}"), str::to_string));

    for span in split_statements(body, &[])? {
        let assignment = span.of(body);
        let Some((key, value)) = assignment.split_once('=') else {
            tracing::debug!(pass = %pass.name, assignment, "ignoring pass statement");
            continue;
        };
        let key = key.trim();
        match key.to_ascii_lowercase().as_str() {
            "vertexshader" | "vertexprogram" => pass.vertex = parse_compile(value, source),
            "pixelshader" | "fragmentshader" | "fragmentprogram" => {
                pass.pixel = parse_compile(value, source)
            }
            _ => pass.states.push(RenderState::parse(key, value)),
        }
    }
    Ok(pass)
}

/// `compile <profile> <entry>(<args>)`; `NULL` disables the stage.
fn parse_compile(value: &str, source: &str) -> Option<ShaderEntry> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("null") {
        return None;
    }
    let Some(rest) = value.strip_prefix("compile") else {
        tracing::warn!(value, "shader assignment without a compile clause");
        return None;
    };
    let rest = rest.trim_start();
    let profile_end = rest.find(char::is_whitespace)?;
    let profile = &rest[..profile_end];
    let entry = rest[profile_end..]
        .split('(')
        .next()
        .map(str::trim)
        .filter(|e| !e.is_empty())?;
    Some(ShaderEntry::new(source, entry, profile))
}
