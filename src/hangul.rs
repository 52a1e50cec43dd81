// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Hangul syllable decomposition for chosung (initial-consonant) search.
//!
//! Korean users type "ㅌㄴㅅ" and expect to find "테니스". Making that work
//! requires taking syllable blocks apart. Every precomposed syllable in the
//! U+AC00..U+D7A3 block is a pure function of three indices:
//!
//! ```text
//! code = 0xAC00 + (lead × 21 + vowel) × 28 + tail
//! ```
//!
//! 19 leading consonants × 21 vowels × 28 trailing consonants (27 real ones
//! plus "none") = 11,172 syllables, laid out in exactly that order. So
//! decomposition is three divisions - no tables of syllables, just tables of
//! jamo.
//!
//! The jamo constants below are *compatibility* jamo (U+3131..), the
//! standalone forms a Korean keyboard produces, not the conjoining forms
//! (U+1100..) that NFD emits. Queries arrive as compatibility jamo, so that
//! is what we compare against.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - `compose(decompose(c)) = c` for every syllable in the block. The
//!   round-trip is property-tested over the whole range.
//! - Non-syllable characters pass through [`initial_consonants`] unchanged,
//!   so mixed Korean/Latin text stays searchable.

// =============================================================================
// JAMO TABLES
// =============================================================================
// Order matters: the index of each jamo in its table IS the index used by the
// syllable block formula. Do not reorder.

/// First precomposed Hangul syllable (가).
pub const SYLLABLE_BASE: u32 = 0xAC00;

/// Last precomposed Hangul syllable (힣).
pub const SYLLABLE_LAST: u32 = 0xD7A3;

/// Vowels per leading consonant in the syllable block.
const VOWEL_COUNT: u32 = 21;

/// Trailing slots per vowel (27 consonants + "no trailing consonant").
const TAIL_COUNT: u32 = 28;

/// The 19 leading consonants (choseong), in block order.
pub const LEADS: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ',
    'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

/// The 21 vowels (jungseong), in block order.
pub const VOWELS: [char; 21] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ',
    'ㅞ', 'ㅟ', 'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

/// The 27 trailing consonants (jongseong), in block order.
///
/// Tail index 0 means "no trailing consonant", so `TAILS[i]` corresponds to
/// tail index `i + 1` in the block formula.
pub const TAILS: [char; 27] = [
    'ㄱ', 'ㄲ', 'ㄳ', 'ㄴ', 'ㄵ', 'ㄶ', 'ㄷ', 'ㄹ', 'ㄺ', 'ㄻ', 'ㄼ', 'ㄽ', 'ㄾ', 'ㄿ', 'ㅀ',
    'ㅁ', 'ㅂ', 'ㅄ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

/// A syllable taken apart into its jamo.
///
/// `tail` is `None` for open syllables like 테 (ㅌ + ㅔ, no final consonant).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decomposed {
    pub lead: char,
    pub vowel: char,
    pub tail: Option<char>,
}

/// Is this character a precomposed Hangul syllable?
#[inline]
pub fn is_syllable(c: char) -> bool {
    (SYLLABLE_BASE..=SYLLABLE_LAST).contains(&(c as u32))
}

/// Take a syllable block apart into (lead, vowel, tail).
///
/// Returns `None` for anything outside U+AC00..U+D7A3 - Latin letters,
/// digits, standalone jamo, everything else. Callers that want pass-through
/// behavior use `decompose(c).map_or(c, ...)`.
#[inline]
pub fn decompose(c: char) -> Option<Decomposed> {
    if !is_syllable(c) {
        return None;
    }
    let index = c as u32 - SYLLABLE_BASE;
    let lead = LEADS[(index / (VOWEL_COUNT * TAIL_COUNT)) as usize];
    let vowel = VOWELS[((index % (VOWEL_COUNT * TAIL_COUNT)) / TAIL_COUNT) as usize];
    let tail_index = (index % TAIL_COUNT) as usize;
    let tail = if tail_index == 0 {
        None
    } else {
        Some(TAILS[tail_index - 1])
    };
    Some(Decomposed { lead, vowel, tail })
}

/// Put a syllable back together from its jamo.
///
/// The inverse of [`decompose`]: returns `None` when any component is not in
/// its jamo table (e.g. a vowel passed as the lead).
pub fn compose(lead: char, vowel: char, tail: Option<char>) -> Option<char> {
    let l = LEADS.iter().position(|&c| c == lead)? as u32;
    let v = VOWELS.iter().position(|&c| c == vowel)? as u32;
    let t = match tail {
        None => 0,
        Some(tc) => TAILS.iter().position(|&c| c == tc)? as u32 + 1,
    };
    char::from_u32(SYLLABLE_BASE + (l * VOWEL_COUNT + v) * TAIL_COUNT + t)
}

/// Extract the initial-consonant (chosung) string of a text.
///
/// Each syllable is replaced by its leading consonant; every other character
/// passes through unchanged:
/// - "테니스" → "ㅌㄴㅅ"
/// - "테니스 라켓" → "ㅌㄴㅅ ㄹㅋ"
/// - "gx 수업" → "gx ㅅㅇ"
///
/// A chosung query like "ㅌㄴㅅ" maps to itself (standalone jamo are not
/// syllables), so matching is a plain substring check between two chosung
/// strings.
pub fn initial_consonants(text: &str) -> String {
    text.chars()
        .map(|c| decompose(c).map_or(c, |d| d.lead))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_known_syllables() {
        // 한 = ㅎ + ㅏ + ㄴ
        assert_eq!(
            decompose('한'),
            Some(Decomposed {
                lead: 'ㅎ',
                vowel: 'ㅏ',
                tail: Some('ㄴ'),
            })
        );
        // 테 = ㅌ + ㅔ, open syllable
        assert_eq!(
            decompose('테'),
            Some(Decomposed {
                lead: 'ㅌ',
                vowel: 'ㅔ',
                tail: None,
            })
        );
        // 닭 has the cluster tail ㄺ
        assert_eq!(
            decompose('닭'),
            Some(Decomposed {
                lead: 'ㄷ',
                vowel: 'ㅏ',
                tail: Some('ㄺ'),
            })
        );
        // 값 has the cluster tail ㅄ
        assert_eq!(
            decompose('값'),
            Some(Decomposed {
                lead: 'ㄱ',
                vowel: 'ㅏ',
                tail: Some('ㅄ'),
            })
        );
    }

    #[test]
    fn test_decompose_block_edges() {
        // 가 = first syllable, 힣 = last
        assert_eq!(
            decompose('가'),
            Some(Decomposed {
                lead: 'ㄱ',
                vowel: 'ㅏ',
                tail: None,
            })
        );
        assert_eq!(
            decompose('힣'),
            Some(Decomposed {
                lead: 'ㅎ',
                vowel: 'ㅣ',
                tail: Some('ㅎ'),
            })
        );
    }

    #[test]
    fn test_decompose_rejects_non_syllables() {
        assert_eq!(decompose('a'), None);
        assert_eq!(decompose('7'), None);
        assert_eq!(decompose(' '), None);
        // Standalone jamo are not syllable blocks
        assert_eq!(decompose('ㅌ'), None);
        assert_eq!(decompose('ㅏ'), None);
        // One before the block, one after
        assert_eq!(decompose('\u{ABFF}'), None);
        assert_eq!(decompose('\u{D7A4}'), None);
    }

    #[test]
    fn test_compose_decompose_roundtrip_full_block() {
        for code in SYLLABLE_BASE..=SYLLABLE_LAST {
            let c = char::from_u32(code).unwrap();
            let d = decompose(c).unwrap();
            assert_eq!(compose(d.lead, d.vowel, d.tail), Some(c), "syllable {c}");
        }
    }

    #[test]
    fn test_compose_rejects_invalid_jamo() {
        // A vowel in the lead slot
        assert_eq!(compose('ㅏ', 'ㅏ', None), None);
        // A lead-only consonant (ㄸ) in the tail slot
        assert_eq!(compose('ㄱ', 'ㅏ', Some('ㄸ')), None);
        // Latin letters anywhere
        assert_eq!(compose('x', 'ㅏ', None), None);
    }

    #[test]
    fn test_initial_consonants() {
        assert_eq!(initial_consonants("테니스"), "ㅌㄴㅅ");
        assert_eq!(initial_consonants("배드민턴"), "ㅂㄷㅁㅌ");
        assert_eq!(initial_consonants("테니스 라켓"), "ㅌㄴㅅ ㄹㅋ");
    }

    #[test]
    fn test_initial_consonants_passes_through_non_syllables() {
        assert_eq!(initial_consonants("gx 수업"), "gx ㅅㅇ");
        assert_eq!(initial_consonants("ㅌㄴㅅ"), "ㅌㄴㅅ");
        assert_eq!(initial_consonants("hello 123"), "hello 123");
        assert_eq!(initial_consonants(""), "");
    }
}
