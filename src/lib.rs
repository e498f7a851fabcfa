#![doc = include_str!("../readme.md")]
#![allow(clippy::uninlined_format_args)]
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod text_input_mask;

pub use text_input_mask::MaskedInputState;
pub use text_input_mask::mask_token::{InputMask, Token, TokenKind};

pub mod event {
    //!
    //! Results of the state operations.
    //!

    /// Result of an operation on the state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum TextOutcome {
        /// Nothing changed. Input that doesn't fit the mask
        /// is silently rejected with this.
        Unchanged,
        /// The display text changed, the raw text is the same.
        /// The text box should be updated.
        Changed,
        /// The raw text changed.
        TextChanged,
    }

    impl TextOutcome {
        /// Raw text or display changed.
        pub fn is_changed(&self) -> bool {
            *self != TextOutcome::Unchanged
        }
    }

    // Useful for converting most display-only results.
    impl From<bool> for TextOutcome {
        fn from(value: bool) -> Self {
            if value {
                TextOutcome::Changed
            } else {
                TextOutcome::Unchanged
            }
        }
    }
}

/// Errors of the strict `try_*` operations.
///
/// Everything else just rejects what doesn't fit the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskError {
    /// The char at this raw position doesn't match its slot.
    InvalidChar(usize, char),
    /// The raw text would be too long.
    ///
    /// Contains the attempted length and the capacity of the mask.
    CapacityExceeded(usize, usize),
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MaskError {}
