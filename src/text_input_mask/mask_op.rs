//!
//! Freestanding operations over a compiled [InputMask].
//!
//! None of these keep any state, they all work on the raw text
//! and/or the display text given. Indices are counted in chars.
//!

use crate::MaskError;
use crate::text_input_mask::mask_token::{InputMask, TokenKind};
use std::cmp::min;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Check the char against the input class.
///
/// Returns the char as it should be stored, which is the uppercase
/// variant for [TokenKind::RequiredLetterUpper] and [TokenKind::OptionalLetterUpper].
/// Literals accept nothing.
pub fn validate(c: char, kind: TokenKind) -> Option<char> {
    match kind {
        TokenKind::Literal => None,
        TokenKind::RequiredDigit | TokenKind::OptionalDigit => is_decimal_digit(c).then_some(c),
        TokenKind::RequiredLetter | TokenKind::OptionalLetter => c.is_alphabetic().then_some(c),
        TokenKind::RequiredLetterUpper | TokenKind::OptionalLetterUpper => {
            c.is_alphabetic().then(|| to_upper(c))
        }
        TokenKind::RequiredAny | TokenKind::OptionalAny => Some(c),
    }
}

// Decimal digits only, no ½ or ².
fn is_decimal_digit(c: char) -> bool {
    c.general_category() == GeneralCategory::DecimalNumber
}

// Single char uppercase, or the char itself if that
// would expand to more than one char (ß).
fn to_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Can the char be appended to a raw text of length `raw_len`?
///
/// Checks the capacity and the input class of the next free slot.
/// The prompt char is never accepted. An empty mask accepts everything.
pub fn accept_next(mask: &InputMask, raw_len: usize, c: char, prompt: char) -> Option<char> {
    if mask.is_empty() {
        return Some(c);
    }
    if c == prompt {
        return None;
    }
    let slot = mask.slot(raw_len)?;
    validate(c, slot.kind)
}

/// Render the raw text with the mask.
///
/// * Literals are copied.
/// * Placeholders take the next raw char if it's valid for the slot.
///   Otherwise, the slot is skipped and the raw char is kept for the next one.
/// * Unfilled slots show the prompt.
///
/// With `compact` the display is meant for an unfocused field:
/// unfilled optional slots are left out and rendering stops
/// after the literals following the last raw char.
/// An empty raw text gives an empty display.
///
/// An empty mask returns the raw text.
pub fn format(mask: &InputMask, raw: &str, prompt: char, compact: bool) -> String {
    if mask.is_empty() {
        return raw.to_string();
    }
    if compact && raw.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(mask.len());
    let mut raw = raw.chars().peekable();
    for t in mask.tokens() {
        if t.is_literal() {
            out.push(t.character);
            continue;
        }

        match raw.peek() {
            Some(c) => {
                if let Some(v) = validate(*c, t.kind) {
                    raw.next();
                    out.push(v);
                } else if t.is_required() || !compact {
                    out.push(prompt);
                }
            }
            None => {
                if compact {
                    break;
                }
                out.push(prompt);
            }
        }
    }
    out
}

/// Extract the raw text from a display text.
///
/// Tolerates text that doesn't contain the literals at all,
/// so it works for pasted input too.
///
/// * A literal is consumed only if it matches the literal token.
///   A mismatch skips the literal token, the char is tried against
///   the following tokens.
/// * A prompt char at a placeholder position is skipped together
///   with that position, so the following literals still line up.
///   Anywhere else it's ignored.
/// * Chars at a placeholder position are checked against the slot
///   they take in the raw text, which is the next free one.
///   Rejected chars are dropped.
///
/// The n-th raw char always fits the n-th slot, and the result never
/// exceeds the capacity of the mask. An empty mask returns the display text.
pub fn unformat(mask: &InputMask, display: &str, prompt: char) -> String {
    if mask.is_empty() {
        return display.to_string();
    }

    let tokens = mask.tokens();
    let mut slots = mask.slots().peekable();
    let mut raw = String::new();
    let mut idx = 0;
    let mut chars = display.chars().peekable();
    while let Some(&c) = chars.peek() {
        let Some(t) = tokens.get(idx) else {
            break;
        };

        if t.is_literal() {
            if c == t.character {
                chars.next();
            } else if c == prompt {
                chars.next();
                continue;
            }
            idx += 1;
        } else if c == prompt {
            chars.next();
            idx += 1;
        } else {
            chars.next();
            let Some(slot) = slots.peek() else {
                break;
            };
            if let Some(v) = validate(c, slot.kind) {
                raw.push(v);
                slots.next();
                idx += 1;
            }
        }
    }
    raw
}

/// Are all required slots filled with valid chars?
///
/// The n-th placeholder is checked against the n-th raw char.
/// An empty mask is complete if there is any text.
pub fn is_complete(mask: &InputMask, raw: &str) -> bool {
    if mask.is_empty() {
        return !raw.is_empty();
    }

    let mut raw = raw.chars();
    for t in mask.slots() {
        let c = raw.next();
        if t.is_required() {
            match c {
                Some(c) if validate(c, t.kind).is_some() => {}
                _ => return false,
            }
        }
    }
    true
}

/// Display position of the cursor for a raw text of the given length.
///
/// That's right behind the raw_len-th placeholder.
/// For 0 it's not the start of the display but the first placeholder,
/// behind any leading literals, which is where the next char goes.
///
/// The result is always in the range 0..=display-len.
pub fn cursor_for_raw_len(mask: &InputMask, raw_len: usize, display: &str) -> usize {
    let display_len = display.chars().count();
    if mask.is_empty() {
        return min(raw_len, display_len);
    }

    let mut count = 0;
    for (i, t) in mask.tokens().iter().enumerate() {
        if t.is_placeholder() {
            if raw_len == 0 {
                return min(i, display_len);
            }
            count += 1;
            if count == raw_len {
                return min(i + 1, display_len);
            }
        }
    }
    display_len
}

/// Number of raw chars left of the given display position.
///
/// This is the inverse of [cursor_for_raw_len] for the fully rendered display.
pub fn raw_len_for_cursor(mask: &InputMask, display_cursor: usize) -> usize {
    if mask.is_empty() {
        return display_cursor;
    }
    let end = min(display_cursor, mask.len());
    mask.tokens()[..end]
        .iter()
        .filter(|t| t.is_placeholder())
        .count()
}

/// Create the value with literals from the raw text.
///
/// Literals are added up to the last raw char. Trailing literals
/// are added only if all slots are filled.
pub fn insert_literals(mask: &InputMask, raw: &str) -> String {
    if mask.is_empty() {
        return raw.to_string();
    }

    let mut out = String::new();
    let mut pending = String::new();
    let mut raw = raw.chars();
    for t in mask.tokens() {
        if t.is_literal() {
            pending.push(t.character);
        } else {
            let Some(c) = raw.next() else {
                return out;
            };
            out.push_str(&pending);
            pending.clear();
            out.push(c);
        }
    }
    out.push_str(&pending);
    out
}

/// Remove the literals inserted by [insert_literals].
///
/// Literals are only removed at their expected position.
/// At the first mismatch the rest of the value is copied as is.
pub fn remove_literals(mask: &InputMask, value: &str) -> String {
    if mask.is_empty() {
        return value.to_string();
    }

    let mut out = String::new();
    let mut chars = value.chars();
    let mut tokens = mask.tokens().iter();
    while let Some(c) = chars.next() {
        match tokens.next() {
            Some(t) if t.is_literal() => {
                if c != t.character {
                    out.push(c);
                    break;
                }
            }
            Some(_) => out.push(c),
            None => {
                out.push(c);
                break;
            }
        }
    }
    out.extend(chars);
    out
}

/// Strict check of a raw text.
///
/// Returns the normalized raw text, or the first char that
/// doesn't fit.
pub fn validate_raw(mask: &InputMask, raw: &str, prompt: char) -> Result<String, MaskError> {
    if mask.is_empty() {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut slots = mask.slots();
    for (i, c) in raw.chars().enumerate() {
        let Some(slot) = slots.next() else {
            return Err(MaskError::CapacityExceeded(
                raw.chars().count(),
                mask.capacity().unwrap_or_default(),
            ));
        };
        if c == prompt {
            return Err(MaskError::InvalidChar(i, c));
        }
        match validate(c, slot.kind) {
            Some(v) => out.push(v),
            None => return Err(MaskError::InvalidChar(i, c)),
        }
    }
    Ok(out)
}
