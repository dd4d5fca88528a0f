//! Reading time estimate for post bodies

use super::post::ContentSection;

/// Reading speed used for the estimate
pub const WORDS_PER_MINUTE: usize = 200;

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Words in the headings and body blocks of every section.
///
/// A section without a heading contributes nothing, its body included.
// FIXME: the headingless case looks like an accidental early return; kept
// until product confirms whether those bodies should count.
pub fn word_count(sections: &[ContentSection]) -> usize {
    sections
        .iter()
        .map(|section| match section.heading.as_deref() {
            Some(heading) if !heading.is_empty() => {
                count_words(heading)
                    + section
                        .body
                        .blocks()
                        .iter()
                        .map(|block| count_words(block.text()))
                        .sum::<usize>()
            }
            _ => 0,
        })
        .sum()
}

/// Estimated minutes to read, rounded up
pub fn reading_time(sections: &[ContentSection]) -> usize {
    word_count(sections).div_ceil(WORDS_PER_MINUTE)
}
