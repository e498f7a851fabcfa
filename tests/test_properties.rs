use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rat_mask::text_input_mask::mask_op::{
    cursor_for_raw_len, format, is_complete, unformat, validate_raw,
};
use rat_mask::text_input_mask::mobile_op::{MobileEdit, MobileRule, process_mobile_input};
use rat_mask::{InputMask, MaskedInputState, TokenKind};
use std::env;
use std::fs;

const PROMPT: char = '_';
const SYMBOLS: &[char] = &['0', '9', 'A', 'a', 'L', '?', '&', 'C'];
const LITERALS: &[char] = &['(', ')', '-', '/', ' ', '.', 'x', '0', 'ä'];
const ANY: &[char] = &['a', 'Z', '1', '-', '.', ' ', 'ä', '€'];
const ROUNDS: usize = 500;

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = env::temp_dir().join("rat-mask-test.log");
    if log.exists() {
        fs::remove_file(&log)?;
    }
    fern::Dispatch::new()
        .format(|out, message, _record| out.finish(format_args!("{}", message)))
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(&log)?)
        .apply()?;
    Ok(())
}

fn pick(rng: &mut StdRng, chars: &[char]) -> char {
    chars[rng.gen_range(0..chars.len())]
}

fn random_mask(rng: &mut StdRng) -> InputMask {
    let mut pattern = String::new();
    for _ in 0..rng.gen_range(1..12) {
        match rng.gen_range(0..10) {
            0..=5 => pattern.push(pick(rng, SYMBOLS)),
            6 => {
                pattern.push('\\');
                pattern.push(pick(rng, LITERALS));
            }
            _ => {
                let c = pick(rng, LITERALS);
                if SYMBOLS.contains(&c) {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
        }
    }
    InputMask::new(pattern)
}

// A char that is valid for the slot and stored as is.
fn valid_char(rng: &mut StdRng, kind: TokenKind) -> char {
    match kind {
        TokenKind::RequiredDigit | TokenKind::OptionalDigit => rng.gen_range('0'..='9'),
        TokenKind::RequiredLetter | TokenKind::OptionalLetter => {
            pick(rng, &['a', 'b', 'Y', 'Z', 'ä', 'ß'])
        }
        TokenKind::RequiredLetterUpper | TokenKind::OptionalLetterUpper => {
            pick(rng, &['A', 'B', 'Y', 'Z', 'Ä'])
        }
        TokenKind::RequiredAny | TokenKind::OptionalAny => pick(rng, ANY),
        TokenKind::Literal => unreachable!(),
    }
}

fn random_raw(rng: &mut StdRng, mask: &InputMask) -> String {
    let capacity = mask.capacity().unwrap_or_default();
    let len = rng.gen_range(0..=capacity);
    mask.slots()
        .take(len)
        .map(|t| valid_char(rng, t.kind))
        .collect()
}

fn random_text(rng: &mut StdRng) -> String {
    let mut s = String::new();
    for _ in 0..rng.gen_range(0..16) {
        match rng.gen_range(0..3) {
            0 => s.push(rng.gen_range('0'..='9')),
            1 => s.push(pick(rng, ANY)),
            _ => s.push(pick(rng, LITERALS)),
        }
    }
    s
}

// Typical edits of a text box.
fn random_edit(rng: &mut StdRng, display: &str) -> String {
    let mut chars = display.chars().collect::<Vec<_>>();
    match rng.gen_range(0..7) {
        0 => String::new(),
        1 => rng.gen_range('0'..='9').to_string(),
        2 => {
            if !chars.is_empty() {
                chars.remove(rng.gen_range(0..chars.len()));
            }
            chars.into_iter().collect()
        }
        3 => {
            let c = pick(rng, ANY);
            chars.insert(rng.gen_range(0..=chars.len()), c);
            chars.into_iter().collect()
        }
        4 => {
            let n = rng.gen_range(0..=chars.len());
            chars.truncate(n);
            chars.into_iter().collect()
        }
        5 => {
            // type into the empty slots.
            let prompts = chars
                .iter()
                .enumerate()
                .filter(|(_, c)| **c == PROMPT)
                .map(|(i, _)| i)
                .collect::<Vec<_>>();
            if !prompts.is_empty() {
                let i = prompts[rng.gen_range(0..prompts.len())];
                let c = pick(rng, &['1', '7', 'a', 'Q', 'ä']);
                if rng.gen_bool(0.5) {
                    chars.insert(i, c);
                } else {
                    chars[i] = c;
                }
            }
            chars.into_iter().collect()
        }
        _ => random_text(rng),
    }
}

#[test]
fn test_round_trip() {
    _ = setup_logging();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..ROUNDS {
        let mask = random_mask(&mut rng);
        let raw = random_raw(&mut rng, &mask);

        let display = format(&mask, &raw, PROMPT, false);
        assert_eq!(
            unformat(&mask, &display, PROMPT),
            raw,
            "mask {:?} display {:?}",
            mask.pattern(),
            display
        );
        assert_eq!(display.chars().count(), mask.len());
        assert!(validate_raw(&mask, &raw, PROMPT).is_ok());

        let compact = format(&mask, &raw, PROMPT, true);
        assert_eq!(
            unformat(&mask, &compact, PROMPT),
            raw,
            "mask {:?} compact {:?}",
            mask.pattern(),
            compact
        );
    }
}

#[test]
fn test_capacity() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..ROUNDS {
        let mask = random_mask(&mut rng);
        let capacity = mask.capacity().unwrap_or_default();
        let text = random_text(&mut rng);

        let raw = unformat(&mask, &text, PROMPT);
        assert!(raw.chars().count() <= capacity);
        assert!(
            validate_raw(&mask, &raw, PROMPT).is_ok(),
            "mask {:?} text {:?} raw {:?}",
            mask.pattern(),
            text,
            raw
        );

        let mut state = MaskedInputState::new().with_shared_mask(mask.clone().into());
        state.set_raw_text(&text);
        assert!(state.raw_len() <= capacity);
        state.insert_str(&text);
        assert!(state.raw_len() <= capacity);
        assert!(validate_raw(&mask, state.raw_text(), PROMPT).is_ok());

        state.set_text(&text);
        assert!(validate_raw(&mask, state.raw_text(), PROMPT).is_ok());
    }
}

#[test]
fn test_cursor() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..ROUNDS {
        let mask = random_mask(&mut rng);
        let raw = random_raw(&mut rng, &mask);
        let capacity = mask.capacity().unwrap_or_default();

        for compact in [false, true] {
            let display = format(&mask, &raw, PROMPT, compact);
            let len = display.chars().count();
            let mut last = 0;
            for n in 0..=capacity + 2 {
                let cursor = cursor_for_raw_len(&mask, n, &display);
                assert!(cursor <= len);
                assert!(cursor >= last);
                last = cursor;
            }
        }
    }
}

#[test]
fn test_complete_monotone() {
    let mut rng = StdRng::seed_from_u64(13);

    for _ in 0..ROUNDS {
        let mask = random_mask(&mut rng);
        let full = mask
            .slots()
            .map(|t| valid_char(&mut rng, t.kind))
            .collect::<String>();
        assert!(is_complete(&mask, &full));

        let mut was_complete = false;
        for n in 0..=full.chars().count() {
            let prefix = full.chars().take(n).collect::<String>();
            let complete = is_complete(&mask, &prefix);
            if was_complete {
                assert!(complete, "mask {:?} raw {:?}", mask.pattern(), prefix);
            }
            was_complete = complete;
        }
    }
}

#[test]
fn test_mobile_total() {
    _ = setup_logging();
    let mut rng = StdRng::seed_from_u64(17);

    for _ in 0..ROUNDS {
        let mask = random_mask(&mut rng);
        let raw = random_raw(&mut rng, &mask);
        let compact = rng.gen_bool(0.3);
        let expected = format(&mask, &raw, PROMPT, compact);
        let old = if rng.gen_bool(0.8) {
            expected.clone()
        } else {
            random_edit(&mut rng, &expected)
        };
        let new = random_edit(&mut rng, &old);

        let edit = MobileEdit::new(&old, &new, &expected, &raw);
        let r = process_mobile_input(&mask, &edit, PROMPT, compact);
        assert!(
            r.raw.chars().count() <= mask.capacity().unwrap_or_default(),
            "mask {:?} new {:?} raw {:?}",
            mask.pattern(),
            new,
            r.raw
        );
        assert!(
            validate_raw(&mask, &r.raw, PROMPT).is_ok(),
            "mask {:?} new {:?} raw {:?}",
            mask.pattern(),
            new,
            r.raw
        );
        assert_eq!(r.display, format(&mask, &r.raw, PROMPT, compact));
        assert!(r.cursor <= r.display.chars().count());
        if r.rule.is_noop() {
            assert_eq!(r.raw, raw);
        }

        let echo = MobileEdit::new(&new, &r.display, &r.display, &r.raw);
        let r2 = process_mobile_input(&mask, &echo, PROMPT, compact);
        assert_eq!(r2.rule, MobileRule::Echo);
        assert_eq!(r2.raw, r.raw);
        assert_eq!(r2.display, r.display);
        assert_eq!(r2.cursor, r.cursor);
    }
}
