//!
//! Reconciles the text-change notifications of mobile input methods.
//!
//! An IME doesn't report keystrokes, it reports the new content of the
//! native text box. Depending on the platform that's the full display
//! text with the edit applied, only the newly typed char, or the
//! accumulated unformatted input. This works out which raw text
//! explains the change.
//!
//! The rules are tried in order, the first match wins:
//!
//! 1. Echo: the box reports what was written last. Nothing to do.
//! 2. Clear: the box is empty. The raw text is cleared.
//! 3. SingleChar: a single char replaced the full display text.
//!    It's appended to the raw text if it fits the next slot.
//! 4. Append: the unformatted display extends the raw text.
//! 5. Delete: the unformatted display is a shorter prefix of the raw text.
//! 6. RawAccumulation: the display is plain raw input, valid slot by slot,
//!    and at least as long as the raw text.
//! 7. Fallback: whatever the unformatted display gives, if not empty.
//! 8. NoOp: keep everything.
//!

use crate::text_input_mask::mask_op::{accept_next, cursor_for_raw_len, format, unformat};
use crate::text_input_mask::mask_token::InputMask;
use log::debug;

/// One change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobileEdit<'a> {
    /// Content of the text box before the change.
    pub old_display: &'a str,
    /// Content of the text box now.
    pub new_display: &'a str,
    /// The last display text written to the text box.
    pub expected_display: &'a str,
    /// The current raw text.
    pub raw: &'a str,
}

/// Which rule decided the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobileRule {
    Echo,
    Clear,
    SingleChar,
    Append,
    Delete,
    RawAccumulation,
    Fallback,
    NoOp,
}

/// Result of [process_mobile_input].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileOutcome {
    /// New raw text.
    pub raw: String,
    /// Display text to write back into the text box.
    pub display: String,
    /// Cursor position in the display text.
    pub cursor: usize,
    /// Rule that was applied.
    pub rule: MobileRule,
}

impl<'a> MobileEdit<'a> {
    pub fn new(
        old_display: &'a str,
        new_display: &'a str,
        expected_display: &'a str,
        raw: &'a str,
    ) -> Self {
        Self {
            old_display,
            new_display,
            expected_display,
            raw,
        }
    }
}

impl MobileRule {
    /// Rules that leave the raw text as it is.
    pub fn is_noop(&self) -> bool {
        matches!(self, MobileRule::Echo | MobileRule::NoOp)
    }
}

/// Find the raw text that explains the change and render it.
///
/// `compact` renders the display for an unfocused field, see [format].
///
/// This never fails. Calling it again with the returned display as both
/// new and expected display returns the same outcome.
pub fn process_mobile_input(
    mask: &InputMask,
    edit: &MobileEdit<'_>,
    prompt: char,
    compact: bool,
) -> MobileOutcome {
    let (rule, raw) = reconcile(mask, edit, prompt);
    if !rule.is_noop() {
        debug!(
            "mobile input {:?}: {:?} -> {:?} raw {:?} -> {:?}",
            rule, edit.old_display, edit.new_display, edit.raw, raw
        );
    }

    let display = format(mask, &raw, prompt, compact);
    let cursor = cursor_for_raw_len(mask, raw.chars().count(), &display);
    MobileOutcome {
        raw,
        display,
        cursor,
        rule,
    }
}

fn reconcile(mask: &InputMask, edit: &MobileEdit<'_>, prompt: char) -> (MobileRule, String) {
    let raw = edit.raw;

    if edit.new_display == edit.expected_display {
        return (MobileRule::Echo, raw.to_string());
    }
    if edit.new_display.is_empty() {
        return (MobileRule::Clear, String::new());
    }
    if is_single_char_replace(edit) {
        return match single_char(mask, edit, prompt) {
            Some(new_raw) => (MobileRule::SingleChar, new_raw),
            None => (MobileRule::NoOp, raw.to_string()),
        };
    }

    let candidate = unformat(mask, edit.new_display, prompt);
    if candidate.len() > raw.len() && candidate.starts_with(raw) {
        return (MobileRule::Append, candidate);
    }
    if candidate.len() < raw.len() && raw.starts_with(candidate.as_str()) {
        return (MobileRule::Delete, candidate);
    }
    if let Some(accumulated) = raw_accumulation(mask, edit.new_display, prompt)
        && accumulated.chars().count() >= raw.chars().count()
    {
        return (MobileRule::RawAccumulation, accumulated);
    }
    if !candidate.is_empty() {
        return (MobileRule::Fallback, candidate);
    }

    (MobileRule::NoOp, raw.to_string())
}

// The box was showing our text and now contains a single char.
fn is_single_char_replace(edit: &MobileEdit<'_>) -> bool {
    let mut new = edit.new_display.chars();
    let single = new.next().is_some() && new.next().is_none();
    single && edit.old_display.chars().nth(1).is_some() && edit.old_display == edit.expected_display
}

// Append the single char if it fits.
fn single_char(mask: &InputMask, edit: &MobileEdit<'_>, prompt: char) -> Option<String> {
    let c = edit.new_display.chars().next()?;
    let raw_len = edit.raw.chars().count();
    let c = accept_next(mask, raw_len, c, prompt)?;

    let mut new_raw = edit.raw.to_string();
    new_raw.push(c);
    Some(new_raw)
}

// Every char of the display must be valid for the slot at the same index.
fn raw_accumulation(mask: &InputMask, display: &str, prompt: char) -> Option<String> {
    display
        .chars()
        .enumerate()
        .map(|(i, c)| accept_next(mask, i, c, prompt))
        .collect()
}
