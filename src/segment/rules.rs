//! Rule-based English segmenter.
//!
//! Three passes over the text:
//! 1. **Tokenize** word-like runs with byte spans, marking punctuation breaks
//! 2. **Name runs**: consecutive capitalised tokens become person, place or
//!    organisation names
//! 3. **Noun phrases**: maximal runs of remaining content words
//!
//! Everything returned is a slice of the input, so span lookup downstream
//! always succeeds.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractResult;

use super::{Candidates, Lexicon, Segmenter};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}$][\p{L}\p{N}'\x{2019}\-%$.,]*[\p{L}\p{N}%]|[\p{L}\p{N}]").unwrap()
});

#[derive(Debug, Clone, Copy)]
struct Token<'t> {
    text: &'t str,
    start: usize,
    end: usize,
    /// Non-whitespace characters (or start of text) separate this token from the previous one.
    breaks_before: bool,
    sentence_initial: bool,
}

impl Token<'_> {
    fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }

    fn has_digit(&self) -> bool {
        self.text.chars().any(|c| c.is_ascii_digit())
    }

    /// Byte length of a trailing possessive `'s`, if any.
    fn possessive_len(&self) -> usize {
        ["'s", "\u{2019}s"]
            .iter()
            .find(|suffix| self.text.len() > suffix.len() && self.text.ends_with(*suffix))
            .map_or(0, |suffix| suffix.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameKind {
    Person,
    Place,
    Organization,
}

/// Deterministic, lexicon-driven segmenter for English prose.
#[derive(Debug, Clone, Default)]
pub struct RuleSegmenter {
    lexicon: Lexicon,
}

impl RuleSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn tokenize<'t>(&self, text: &'t str) -> Vec<Token<'t>> {
        let mut tokens = Vec::new();
        let mut prev_end = 0;
        for m in TOKEN.find_iter(text) {
            let gap = &text[prev_end..m.start()];
            let first = tokens.is_empty();
            tokens.push(Token {
                text: m.as_str(),
                start: m.start(),
                end: m.end(),
                breaks_before: first || gap.chars().any(|c| !c.is_whitespace()),
                sentence_initial: first || gap.chars().any(is_sentence_end),
            });
            prev_end = m.end();
        }
        tokens
    }

    /// Could this token be part of a proper name?
    fn is_name_token(&self, token: &Token<'_>) -> bool {
        if !token.is_capitalized() || token.has_digit() {
            return false;
        }
        let word = &token.text[..token.text.len() - token.possessive_len()];
        if self.lexicon.is_function_word(word)
            || self.lexicon.is_verb(word)
            || self.lexicon.is_adverb(word)
        {
            return false;
        }
        // "Improving ..." at the start of a sentence is a verb, not a name.
        !(token.sentence_initial && self.lexicon.is_participle(word))
    }

    fn is_content(&self, tokens: &[Token<'_>], i: usize) -> bool {
        let token = &tokens[i];
        let word = token.text;
        if self.lexicon.is_function_word(word)
            || self.lexicon.is_verb(word)
            || self.lexicon.is_adverb(word)
        {
            return false;
        }
        if token.has_digit() || word.contains('-') {
            return true;
        }
        if self.lexicon.is_participle(word) {
            return i > 0 && !token.breaks_before && self.lexicon.is_determiner(tokens[i - 1].text);
        }
        true
    }

    /// Decide whether a capitalised run is a name and what kind.
    fn classify_run(&self, tokens: &[Token<'_>], run: &[Token<'_>], first: usize, name: &str) -> Option<NameKind> {
        let words: Vec<&str> = name.split_whitespace().collect();
        let preceding = first.checked_sub(1).map(|i| &tokens[i]);

        let is_name = words.len() >= 2
            || self.lexicon.is_first_name(name)
            || self.lexicon.is_place(name)
            || preceding.is_some_and(|p| self.lexicon.is_title(p.text));
        if !is_name {
            return None;
        }

        if words.iter().any(|w| self.lexicon.is_org_indicator(w)) {
            return Some(NameKind::Organization);
        }
        let after_place_preposition =
            preceding.is_some_and(|p| !run[0].breaks_before && self.lexicon.is_place_preposition(p.text));
        if self.lexicon.is_place(name)
            || words.iter().any(|w| self.lexicon.is_location_indicator(w))
            || after_place_preposition
        {
            return Some(NameKind::Place);
        }
        Some(NameKind::Person)
    }
}

impl Segmenter for RuleSegmenter {
    fn sentences(&self, text: &str) -> ExtractResult<Vec<String>> {
        Ok(split_sentences(text, &self.lexicon))
    }

    fn candidates(&self, text: &str) -> ExtractResult<Candidates> {
        let tokens = self.tokenize(text);
        let mut in_name = vec![false; tokens.len()];
        let mut candidates = Candidates::default();

        let mut i = 0;
        while i < tokens.len() {
            if !self.is_name_token(&tokens[i]) {
                i += 1;
                continue;
            }
            let mut j = i + 1;
            while j < tokens.len()
                && !tokens[j].breaks_before
                && tokens[j - 1].possessive_len() == 0
                && self.is_name_token(&tokens[j])
            {
                j += 1;
            }
            let run = &tokens[i..j];
            let last = &run[run.len() - 1];
            let name = &text[run[0].start..last.end - last.possessive_len()];
            if let Some(kind) = self.classify_run(&tokens, run, i, name) {
                in_name[i..j].fill(true);
                let bucket = match kind {
                    NameKind::Person => &mut candidates.people,
                    NameKind::Place => &mut candidates.places,
                    NameKind::Organization => &mut candidates.organizations,
                };
                bucket.push(name.to_string());
            }
            i = j;
        }

        let mut phrase: Option<(usize, usize)> = None;
        for (i, token) in tokens.iter().enumerate() {
            let content = !in_name[i] && self.is_content(&tokens, i);
            match phrase {
                Some((start, _)) if content && !token.breaks_before => {
                    phrase = Some((start, token.end));
                }
                _ => {
                    if let Some((s, e)) = phrase.take() {
                        candidates.noun_phrases.push(text[s..e].to_string());
                    }
                    if content {
                        phrase = Some((token.start, token.end));
                    }
                }
            }
        }
        if let Some((s, e)) = phrase {
            candidates.noun_phrases.push(text[s..e].to_string());
        }

        tracing::trace!(
            tokens = tokens.len(),
            noun_phrases = candidates.noun_phrases.len(),
            people = candidates.people.len(),
            places = candidates.places.len(),
            organizations = candidates.organizations.len(),
            "segmented candidates"
        );
        Ok(candidates)
    }
}

/// Split on `.`, `!` or `?` followed by whitespace or end of text.
///
/// A `.` right after a known title (`Dr. Smith`) does not end a sentence.
/// Pieces are trimmed slices of the input; empty pieces are dropped.
pub fn split_sentences(text: &str, lexicon: &Lexicon) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_sentence_end(c) {
            continue;
        }
        if c == '.' {
            let word = text[..i].rsplit(|ch: char| !ch.is_alphanumeric()).next().unwrap_or("");
            if lexicon.is_title(word) {
                continue;
            }
        }
        if chars.peek().is_none_or(|(_, next)| next.is_whitespace()) {
            let end = i + c.len_utf8();
            let trimmed = text[start..end].trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            start = end;
        }
    }

    // Remaining text (no trailing punctuation)
    let trimmed = text[start..].trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> Candidates {
        RuleSegmenter::new().candidates(text).unwrap()
    }

    #[test]
    fn sentences_keep_decimals_together() {
        let sentences = split_sentences(
            "Revenue grew 2.5x this year. Churn fell!  Next? ok",
            &Lexicon::default(),
        );
        assert_eq!(
            sentences,
            ["Revenue grew 2.5x this year.", "Churn fell!", "Next?", "ok"]
        );
    }

    #[test]
    fn sentences_of_empty_text() {
        assert!(split_sentences("", &Lexicon::default()).is_empty());
        assert!(split_sentences("   ", &Lexicon::default()).is_empty());
    }

    #[test]
    fn titles_do_not_end_sentences() {
        let sentences = split_sentences(
            "Dr. Smith and Ms. Lee led the review. Churn fell.",
            &Lexicon::default(),
        );
        assert_eq!(
            sentences,
            ["Dr. Smith and Ms. Lee led the review.", "Churn fell."]
        );
    }

    #[test]
    fn person_and_noun_phrases() {
        let c = segment("Sarah Johnson led the engineering team to improve customer metrics in Q2 2024.");
        assert_eq!(c.people, ["Sarah Johnson"]);
        assert_eq!(
            c.noun_phrases,
            ["engineering team", "customer metrics", "Q2 2024"]
        );
        assert!(c.places.is_empty());
        assert!(c.organizations.is_empty());
    }

    #[test]
    fn organisations_and_places() {
        let c = segment("The Customer Success Team met with Acme Corp in New York.");
        assert_eq!(c.organizations, ["Customer Success Team", "Acme Corp"]);
        assert_eq!(c.places, ["New York"]);
    }

    #[test]
    fn single_capitalised_word_is_a_noun() {
        let c = segment("Performance improved by 25%.");
        assert!(c.people.is_empty());
        assert_eq!(c.noun_phrases, ["Performance", "25%"]);
    }

    #[test]
    fn known_first_name_and_possessive() {
        let c = segment("We thanked Priya's team for the rollout.");
        assert_eq!(c.people, ["Priya"]);
        assert!(c.noun_phrases.contains(&"team".to_string()));
        assert!(c.noun_phrases.contains(&"rollout".to_string()));
    }

    #[test]
    fn participles_only_after_determiners() {
        let c = segment("Improving onboarding reduced the projected churn.");
        assert_eq!(c.noun_phrases, ["onboarding", "projected churn"]);
    }

    #[test]
    fn punctuation_breaks_phrases() {
        let c = segment("growth, retention; expansion");
        assert_eq!(c.noun_phrases, ["growth", "retention", "expansion"]);
    }

    #[test]
    fn stopword_only_text_has_no_candidates() {
        assert!(segment("the and or but in on at to for of with by").is_empty());
    }

    #[test]
    fn every_candidate_is_a_substring() {
        let text = "Dr. Smith from London shipped AI-powered insights for mid-sized SaaS customers in EMEA.";
        let c = segment(text);
        for s in c
            .noun_phrases
            .iter()
            .chain(&c.people)
            .chain(&c.places)
            .chain(&c.organizations)
        {
            assert!(text.contains(s.as_str()), "{s}");
        }
        assert!(c.places.contains(&"London".to_string()));
        assert!(c.places.contains(&"EMEA".to_string()));
        assert!(c.noun_phrases.contains(&"AI-powered insights".to_string()));
    }
}
