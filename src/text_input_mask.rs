//! State of a text field with an input mask.
//!
//! * Keeps the raw text, that is only the chars entered into the
//!   placeholder slots of the mask, as the single source of truth.
//! * Renders the display text with the literals and prompt chars.
//! * Maps the raw text length to the cursor position in the display.
//! * Reconciles the text-change notifications of mobile input methods.
//!
//! * Accepts an input mask:
//!   * `0`: must enter a digit
//!   * `9`: can enter a digit
//!   * `A`: must enter a letter
//!   * `a`: can enter a letter
//!   * `L`: must enter a letter, converted to uppercase
//!   * `?`: can enter a letter, converted to uppercase
//!   * `&`: must enter any char
//!   * `C`: can enter any char
//!   * `\`: escapes the following character and uses it as a literal.
//!   * everything else is a literal.
//!
//! ```rust
//! use rat_mask::text_input_mask::MaskedInputState;
//!
//! let mut phone = MaskedInputState::new().with_mask("(000) 000-0000");
//! phone.set_focused(true);
//!
//! for c in "555123".chars() {
//!     phone.insert_char(c);
//! }
//! assert_eq!(phone.raw_text(), "555123");
//! assert_eq!(phone.text(), "(555) 123-____");
//! assert_eq!(phone.cursor(), 9);
//! ```
//!
//! The state doesn't render anything by itself. The host widget writes
//! [text()](MaskedInputState::text) into its text box and places the
//! caret at [cursor()](MaskedInputState::cursor).
//!
//! Keystrokes on the desktop go to [insert_char](MaskedInputState::insert_char),
//! [delete_prev_char](MaskedInputState::delete_prev_char) or
//! [set_text](MaskedInputState::set_text). Mobile text boxes report every
//! change with [process_mobile_input](MaskedInputState::process_mobile_input).
//!
use crate::MaskError;
use crate::event::TextOutcome;
use crate::text_input_mask::mask_op::{
    accept_next, cursor_for_raw_len, format, insert_literals, is_complete, raw_len_for_cursor,
    remove_literals, unformat, validate_raw,
};
use crate::text_input_mask::mask_token::InputMask;
use crate::text_input_mask::mobile_op::{MobileEdit, process_mobile_input};
use log::debug;
use std::borrow::Cow;
use std::cmp::min;
use std::sync::Arc;

pub mod mask_op;
pub mod mask_token;
pub mod mobile_op;

/// Default prompt char.
pub const DEFAULT_PROMPT: char = '_';

/// State of one masked text field.
///
/// The compiled mask is shared, everything else is per field.
#[derive(Debug, Clone)]
pub struct MaskedInputState {
    /// Compiled mask.
    mask: Arc<InputMask>,
    /// Raw text. Never longer than the capacity of the mask,
    /// the n-th char always fits the n-th slot.
    raw: String,
    /// Display text as it was last rendered.
    display: String,
    /// Fill char for empty slots.
    prompt: char,
    /// value() contains the literals.
    include_literals: bool,
    /// Render the full mask. Otherwise, the compact form.
    focused: bool,
}

impl Default for MaskedInputState {
    fn default() -> Self {
        Self {
            mask: Default::default(),
            raw: Default::default(),
            display: Default::default(),
            prompt: DEFAULT_PROMPT,
            include_literals: false,
            focused: false,
        }
    }
}

impl MaskedInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// With input mask.
    pub fn with_mask<S: AsRef<str>>(mut self, mask: S) -> Self {
        self.set_mask(mask);
        self
    }

    /// With an already compiled mask.
    pub fn with_shared_mask(mut self, mask: Arc<InputMask>) -> Self {
        self.set_shared_mask(mask);
        self
    }

    /// With the fill char for empty slots.
    pub fn with_prompt_char(mut self, prompt: char) -> Self {
        self.set_prompt_char(prompt);
        self
    }

    /// Include the literals in [value()](MaskedInputState::value).
    pub fn with_include_literals(mut self, include: bool) -> Self {
        self.set_include_literals(include);
        self
    }

    /// Set the input mask.
    ///
    /// The raw text is kept, but every char is checked again against
    /// its new slot. Chars that don't fit any more are dropped and the
    /// rest is cut to the capacity of the new mask.
    ///
    /// * `0`: must enter a digit
    /// * `9`: can enter a digit
    /// * `A`: must enter a letter
    /// * `a`: can enter a letter
    /// * `L`: must enter a letter, converted to uppercase
    /// * `?`: can enter a letter, converted to uppercase
    /// * `&`: must enter any char
    /// * `C`: can enter any char
    /// * `\`: escapes the following character and uses it as a literal.
    /// * everything else is a literal.
    pub fn set_mask<S: AsRef<str>>(&mut self, mask: S) {
        self.set_shared_mask(Arc::new(InputMask::new(mask)));
    }

    /// Set an already compiled mask.
    pub fn set_shared_mask(&mut self, mask: Arc<InputMask>) {
        self.mask = mask;
        self.refit_raw();
        self.render();
    }

    /// Compiled mask.
    pub fn mask(&self) -> &InputMask {
        &self.mask
    }

    /// Compiled mask for use with another field.
    pub fn shared_mask(&self) -> Arc<InputMask> {
        Arc::clone(&self.mask)
    }

    /// Set the fill char for empty slots.
    ///
    /// The prompt char is never part of the raw text, so it
    /// is removed from the raw text if necessary.
    pub fn set_prompt_char(&mut self, prompt: char) {
        self.prompt = prompt;
        self.refit_raw();
        self.render();
    }

    pub fn prompt_char(&self) -> char {
        self.prompt
    }

    /// Include the literals in [value()](MaskedInputState::value).
    pub fn set_include_literals(&mut self, include: bool) {
        self.include_literals = include;
    }

    pub fn include_literals(&self) -> bool {
        self.include_literals
    }

    /// Focus changes the rendering. Without focus the compact form
    /// is shown, which leaves out the empty slots at the end.
    pub fn set_focused(&mut self, focused: bool) -> TextOutcome {
        if self.focused == focused {
            return TextOutcome::Unchanged;
        }
        self.focused = focused;
        self.render().into()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

impl MaskedInputState {
    /// Raw text without literals.
    #[inline]
    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    /// Display text. This is what the text box should show.
    #[inline]
    pub fn text(&self) -> &str {
        &self.display
    }

    /// Render the current raw text as if the field had the given focus.
    pub fn masked_text(&self, focused: bool) -> String {
        format(&self.mask, &self.raw, self.prompt, !focused)
    }

    /// Number of chars in the raw text.
    pub fn raw_len(&self) -> usize {
        self.raw.chars().count()
    }

    /// Maximum length of the raw text. None if there is no mask.
    pub fn max_raw_len(&self) -> Option<usize> {
        self.mask.capacity()
    }

    /// No raw text.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// All required slots are filled.
    pub fn is_mask_complete(&self) -> bool {
        is_complete(&self.mask, &self.raw)
    }

    /// Cursor position in the display text.
    pub fn cursor(&self) -> usize {
        self.cursor_for(self.raw_len())
    }

    /// Cursor position in the display text for a raw text of the given length.
    pub fn cursor_for(&self, raw_len: usize) -> usize {
        cursor_for_raw_len(&self.mask, raw_len, &self.display)
    }

    /// Raw text position for a position in the display text.
    /// Positions behind the raw text map to its end.
    pub fn raw_cursor_at(&self, display_pos: usize) -> usize {
        min(raw_len_for_cursor(&self.mask, display_pos), self.raw_len())
    }
}

impl MaskedInputState {
    /// Value for storage.
    ///
    /// This is the raw text, or with [set_include_literals](MaskedInputState::set_include_literals)
    /// the raw text with the literals of the mask.
    pub fn value(&self) -> Cow<'_, str> {
        if self.include_literals {
            Cow::Owned(insert_literals(&self.mask, &self.raw))
        } else {
            Cow::Borrowed(&self.raw)
        }
    }

    /// Set a stored value.
    ///
    /// Removes the literals if [include_literals](MaskedInputState::include_literals)
    /// is set. Chars that don't fit are dropped.
    pub fn set_value(&mut self, value: &str) -> TextOutcome {
        if self.include_literals {
            let raw = remove_literals(&self.mask, value);
            self.set_raw_text(&raw)
        } else {
            self.set_raw_text(value)
        }
    }
}

impl MaskedInputState {
    /// Set the text as typed or pasted into the text box.
    /// It may or may not contain the literals.
    pub fn set_text(&mut self, text: &str) -> TextOutcome {
        let raw = unformat(&self.mask, text, self.prompt);
        self.replace_raw(raw)
    }

    /// Set the raw text. Chars that don't fit their slot are skipped.
    pub fn set_raw_text(&mut self, raw: &str) -> TextOutcome {
        let raw = self.fit_raw(raw);
        self.replace_raw(raw)
    }

    /// Set the raw text.
    ///
    /// Fails if any char doesn't fit its slot or if the text
    /// is too long. The state is unchanged in that case.
    pub fn try_set_raw_text(&mut self, raw: &str) -> Result<TextOutcome, MaskError> {
        let raw = validate_raw(&self.mask, raw, self.prompt)?;
        Ok(self.replace_raw(raw))
    }

    /// Append a char to the raw text.
    ///
    /// Returns false if the char was rejected.
    pub fn insert_char(&mut self, c: char) -> bool {
        self.try_insert_char(c).is_ok()
    }

    /// Append a char to the raw text.
    ///
    /// Fails if the mask is full or the char doesn't fit the next slot.
    pub fn try_insert_char(&mut self, c: char) -> Result<(), MaskError> {
        let raw_len = self.raw_len();
        if let Some(capacity) = self.mask.capacity()
            && raw_len >= capacity
        {
            return Err(MaskError::CapacityExceeded(raw_len + 1, capacity));
        }
        let Some(c) = accept_next(&self.mask, raw_len, c, self.prompt) else {
            return Err(MaskError::InvalidChar(raw_len, c));
        };
        self.raw.push(c);
        self.render();
        Ok(())
    }

    /// Append all chars that fit. Rejected chars are skipped.
    ///
    /// Returns true if anything was added.
    pub fn insert_str(&mut self, s: &str) -> bool {
        let mut changed = false;
        for c in s.chars() {
            if let Some(c) = accept_next(&self.mask, self.raw_len(), c, self.prompt) {
                self.raw.push(c);
                changed = true;
            }
        }
        if changed {
            self.render();
        }
        changed
    }

    /// Remove the last char of the raw text.
    pub fn delete_prev_char(&mut self) -> bool {
        if self.raw.pop().is_some() {
            self.render();
            true
        } else {
            false
        }
    }

    /// Clear the raw text.
    pub fn clear(&mut self) -> bool {
        if self.raw.is_empty() {
            false
        } else {
            self.raw.clear();
            self.render();
            true
        }
    }
}

impl MaskedInputState {
    /// The native text box changed from `old_display` to `new_display`.
    ///
    /// Works out the edit and updates the raw text. The state itself
    /// knows what was written to the text box last.
    ///
    /// * TextChanged: the raw text changed.
    /// * Changed: the raw text is the same, but the text box shows something
    ///   else and must be overwritten with [text()](MaskedInputState::text).
    /// * Unchanged: nothing to do.
    ///
    /// Either way the cursor should be set to [cursor()](MaskedInputState::cursor).
    pub fn process_mobile_input(&mut self, old_display: &str, new_display: &str) -> TextOutcome {
        let edit = MobileEdit::new(old_display, new_display, &self.display, &self.raw);
        let r = process_mobile_input(&self.mask, &edit, self.prompt, !self.focused);

        let text_changed = r.raw != self.raw;
        let box_differs = r.display != new_display;
        self.raw = r.raw;
        self.display = r.display;

        if text_changed {
            TextOutcome::TextChanged
        } else {
            box_differs.into()
        }
    }
}

impl MaskedInputState {
    // Keep every char that fits the next free slot.
    fn fit_raw(&self, raw: &str) -> String {
        let mut new_raw = String::with_capacity(raw.len());
        let mut len = 0;
        for c in raw.chars() {
            if let Some(c) = accept_next(&self.mask, len, c, self.prompt) {
                new_raw.push(c);
                len += 1;
            }
        }
        new_raw
    }

    // Check the raw text again after the mask or the prompt changed.
    fn refit_raw(&mut self) {
        let raw = self.fit_raw(&self.raw);
        if raw != self.raw {
            debug!(
                "mask {:?} changes raw text {:?} to {:?}",
                self.mask.pattern(),
                self.raw,
                raw
            );
            self.raw = raw;
        }
    }

    fn replace_raw(&mut self, raw: String) -> TextOutcome {
        if raw == self.raw {
            return self.render().into();
        }
        self.raw = raw;
        self.render();
        TextOutcome::TextChanged
    }

    // Returns true if the display changed.
    fn render(&mut self) -> bool {
        let display = format(&self.mask, &self.raw, self.prompt, !self.focused);
        if display != self.display {
            self.display = display;
            true
        } else {
            false
        }
    }
}
