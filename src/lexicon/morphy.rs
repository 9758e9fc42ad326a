//! WordNet base-form reduction ("morphy").
//!
//! Inflected forms are reduced to lemmas found in the WordNet index by first
//! consulting the per-POS exception lists (`noun.exc`, `verb.exc`, ...) and
//! otherwise detaching known suffixes repeatedly until a known form appears.

use ahash::{AHashMap, AHashSet};

use crate::lexicon::PartOfSpeech;

/// Irregular inflection -> base forms, per part of speech.
pub type ExceptionMap = AHashMap<String, Vec<String>>;

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

const ADJECTIVE_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

/// Suffix substitutions for a part of speech.
pub fn substitutions(pos: PartOfSpeech) -> &'static [(&'static str, &'static str)] {
    match pos {
        PartOfSpeech::Noun => NOUN_RULES,
        PartOfSpeech::Verb => VERB_RULES,
        PartOfSpeech::Adjective => ADJECTIVE_RULES,
        PartOfSpeech::Adverb => &[],
    }
}

/// Parse the contents of a WordNet exception file.
///
/// Each line holds an inflected form followed by one or more base forms.
pub fn parse_exceptions(content: &str) -> ExceptionMap {
    let mut map = ExceptionMap::new();
    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let Some(inflected) = parts.next() else {
            continue;
        };
        let bases: Vec<String> = parts.map(str::to_string).collect();
        if !bases.is_empty() {
            map.entry(inflected.to_string()).or_default().extend(bases);
        }
    }
    map
}

/// Reduce `form` to the lemmas of `pos` that `is_known` accepts.
///
/// The form itself is kept when it is known. Results are deduplicated and
/// keep discovery order.
pub fn base_forms<F>(
    form: &str,
    pos: PartOfSpeech,
    exceptions: &ExceptionMap,
    is_known: F,
) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let filter = |candidates: Vec<String>| -> Vec<String> {
        let mut seen = AHashSet::new();
        candidates
            .into_iter()
            .filter(|c| is_known(c) && seen.insert(c.clone()))
            .collect()
    };

    if let Some(bases) = exceptions.get(form) {
        let mut candidates = vec![form.to_string()];
        candidates.extend(bases.iter().cloned());
        return filter(candidates);
    }

    let rules = substitutions(pos);
    let mut forms = apply_rules(&[form.to_string()], rules);

    let mut first = vec![form.to_string()];
    first.extend(forms.iter().cloned());
    let results = filter(first);
    if !results.is_empty() {
        return results;
    }

    while !forms.is_empty() {
        forms = apply_rules(&forms, rules);
        let results = filter(forms.clone());
        if !results.is_empty() {
            return results;
        }
    }

    Vec::new()
}

fn apply_rules(forms: &[String], rules: &[(&str, &str)]) -> Vec<String> {
    forms
        .iter()
        .flat_map(|form| {
            rules.iter().filter_map(move |(old, new)| {
                form.strip_suffix(old).map(|stem| format!("{stem}{new}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(words: &'static [&'static str]) -> impl Fn(&str) -> bool {
        move |w: &str| words.contains(&w)
    }

    #[test]
    fn test_plural_nouns() {
        let exc = ExceptionMap::new();
        let is_known = known(&["address", "city", "box"]);

        assert_eq!(base_forms("addresses", PartOfSpeech::Noun, &exc, &is_known), vec!["address"]);
        assert_eq!(base_forms("cities", PartOfSpeech::Noun, &exc, &is_known), vec!["city"]);
        assert_eq!(base_forms("boxes", PartOfSpeech::Noun, &exc, &is_known), vec!["box"]);
        assert_eq!(base_forms("city", PartOfSpeech::Noun, &exc, &is_known), vec!["city"]);
    }

    #[test]
    fn test_verb_forms() {
        let exc = ExceptionMap::new();
        let is_known = known(&["name", "call"]);

        assert_eq!(base_forms("named", PartOfSpeech::Verb, &exc, &is_known), vec!["name"]);
        assert_eq!(base_forms("calling", PartOfSpeech::Verb, &exc, &is_known), vec!["call"]);
    }

    #[test]
    fn test_exceptions_take_precedence() {
        let exc = parse_exceptions("children child\nmice mouse\n");
        let is_known = known(&["child", "mouse"]);

        assert_eq!(base_forms("children", PartOfSpeech::Noun, &exc, &is_known), vec!["child"]);
        assert_eq!(base_forms("mice", PartOfSpeech::Noun, &exc, &is_known), vec!["mouse"]);
    }

    #[test]
    fn test_unknown_word() {
        let exc = ExceptionMap::new();
        assert!(base_forms("zzzs", PartOfSpeech::Noun, &exc, known(&["name"])).is_empty());
        assert!(base_forms("quickly", PartOfSpeech::Adverb, &exc, known(&["quick"])).is_empty());
    }

    #[test]
    fn test_parse_exceptions_skips_malformed_lines() {
        let exc = parse_exceptions("geese goose\nlonely\n\nbetter good well\n");
        assert_eq!(exc.len(), 2);
        assert_eq!(
            exc.get("better"),
            Some(&vec!["good".to_string(), "well".to_string()])
        );
    }
}
