use super::Segment;

const OPEN_PARAM: char = '{';
const CLOSE_PARAM: char = '}';
const OPEN_OPTIONAL: char = '[';
const CLOSE_OPTIONAL: char = ']';
const COLON: char = ':';

pub const DEFAULT_PARAM_REGEX: &str = "[^/]+";

/// Expands optional groups into the list of concrete alternatives, shortest first.
pub(super) fn split_optionals(pattern: &str) -> Result<Vec<String>, &'static str> {
    let without_closing = pattern.trim_end_matches(CLOSE_OPTIONAL);
    let closing = pattern.len() - without_closing.len();

    let mut parts: Vec<&str> = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in without_closing.char_indices() {
        match c {
            OPEN_PARAM => depth += 1,
            CLOSE_PARAM => depth = depth.saturating_sub(1),
            OPEN_OPTIONAL if depth == 0 => {
                parts.push(&without_closing[start..i]);
                start = i + c.len_utf8();
            }
            CLOSE_OPTIONAL if depth == 0 => {
                return Err("optional segments can only occur at the end of a route");
            }
            _ => {}
        }
    }
    parts.push(&without_closing[start..]);

    if parts.len() - 1 != closing {
        return Err("number of opening '[' and closing ']' does not match");
    }

    let mut alternatives = Vec::with_capacity(parts.len());
    let mut current = String::with_capacity(without_closing.len());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 && part.is_empty() {
            return Err("empty optional part");
        }
        current.push_str(part);
        alternatives.push(current.clone());
    }
    Ok(alternatives)
}

/// Splits one alternative into literal runs and placeholders.
pub(super) fn split_segments(alternative: &str) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = alternative.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            OPEN_PARAM => {
                let body_start = i + c.len_utf8();
                let mut depth = 1usize;
                let mut body_end = None;
                for (j, c) in chars.by_ref() {
                    match c {
                        OPEN_PARAM => depth += 1,
                        CLOSE_PARAM => {
                            depth -= 1;
                            if depth == 0 {
                                body_end = Some(j);
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                let body_end = body_end.ok_or_else(|| "unmatched '{'".to_owned())?;

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(placeholder(&alternative[body_start..body_end])?);
            }
            CLOSE_PARAM => return Err("unmatched '}'".to_owned()),
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn placeholder(body: &str) -> Result<Segment, String> {
    let (name, regex) = match body.find(COLON) {
        Some(pos) => (body[..pos].trim(), body[pos + 1..].trim()),
        None => (body.trim(), DEFAULT_PARAM_REGEX),
    };

    if name.is_empty() {
        return Err("parameter name can not be empty".to_owned());
    }
    if !is_valid_name(name) {
        return Err(format!("invalid parameter name {:?}", name));
    }
    if regex.is_empty() {
        return Err(format!("empty constraint for parameter {:?}", name));
    }

    Ok(Segment::Param {
        name: name.into(),
        regex: regex.into(),
    })
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
