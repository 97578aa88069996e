//! Sentence segmentation over normalized text.
//!
//! A sentence ends at a run of `.`, `!` or `?` (plus any closing quotes or
//! brackets) that is followed by whitespace or the end of the text. A single
//! `.` closing a known abbreviation, an initial (`j.`) or a dotted acronym
//! (`u.s.`) does not end the sentence. Segmentation does not rely on
//! capitalization because it runs on lower-cased text.

/// Abbreviations whose trailing period never ends a sentence.
const ABBREVIATIONS: &[&str] = &[
    "al.", "approx.", "ca.", "cf.", "ch.", "co.", "dept.", "dr.", "ed.", "eds.", "eq.", "esp.",
    "fig.", "figs.", "inc.", "jr.", "ltd.", "mr.", "mrs.", "ms.", "nos.", "p.", "pp.",
    "prof.", "resp.", "sec.", "sr.", "st.", "univ.", "viz.", "vol.", "vols.", "vs.", "jan.",
    "feb.", "mar.", "apr.", "jun.", "jul.", "aug.", "sep.", "sept.", "oct.", "nov.", "dec.",
];

/// Lazy iterator over the sentences of a text, in order.
///
/// Yields trimmed slices of the input; empty sentences are skipped.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    text: &'a str,
    pos: usize,
}

/// Split `text` into sentences.
pub fn sentences(text: &str) -> Sentences<'_> {
    Sentences { text, pos: 0 }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while self.pos < self.text.len() {
            let rest = &self.text[self.pos..];
            let end = boundary(rest);
            self.pos += end;

            let sentence = rest[..end].trim();
            if !sentence.is_empty() {
                return Some(sentence);
            }
        }
        None
    }
}

/// Byte offset one past the end of the first sentence in `text`.
fn boundary(text: &str) -> usize {
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_terminal(c) {
            continue;
        }

        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if is_terminal(next) || is_closer(next) {
                end = j + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        match chars.peek() {
            None => return end,
            Some(&(_, next)) if next.is_whitespace() => {
                let lone_period = c == '.' && end == i + 1;
                if lone_period && is_abbreviation(last_token(&text[..end])) {
                    continue;
                }
                return end;
            }
            // "3.5", "e.g" and friends: punctuation inside a token
            Some(_) => continue,
        }
    }

    text.len()
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '\u{201d}' | '\u{2019}' | '\u{bb}')
}

fn last_token(text: &str) -> &str {
    let token = text.rsplit(char::is_whitespace).next().unwrap_or(text);
    token.trim_start_matches(['(', '[', '{', '"', '\'', '\u{201c}', '\u{2018}', '\u{ab}'])
}

fn is_abbreviation(token: &str) -> bool {
    if ABBREVIATIONS.contains(&token) {
        return true;
    }
    // initials and dotted acronyms: "j.", "u.s.", "e.g.", "i.e."
    match token.strip_suffix('.') {
        Some(body) if !body.is_empty() => body.split('.').all(|part| {
            let mut chars = part.chars();
            matches!((chars.next(), chars.next()), (Some(ch), None) if ch.is_alphabetic())
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<&str> {
        sentences(text).collect()
    }

    #[test]
    fn test_splits_on_terminal_punctuation() {
        assert_eq!(
            split("first sentence. second one! third? fourth"),
            vec!["first sentence.", "second one!", "third?", "fourth"]
        );
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(split("").is_empty());
        assert!(split("   ").is_empty());
    }

    #[test]
    fn test_no_terminal_punctuation_is_one_sentence() {
        assert_eq!(
            split("this trait is considered abnormal and a biological anomaly"),
            vec!["this trait is considered abnormal and a biological anomaly"]
        );
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        assert_eq!(
            split("as shown by smith et al. the effect holds. see fig. 2 for details."),
            vec![
                "as shown by smith et al. the effect holds.",
                "see fig. 2 for details."
            ]
        );
    }

    #[test]
    fn test_sentence_ending_in_no_splits() {
        assert_eq!(
            split("most participants answered no. others were deemed abnormal."),
            vec!["most participants answered no.", "others were deemed abnormal."]
        );
    }

    #[test]
    fn test_dotted_acronyms_and_initials() {
        assert_eq!(
            split("in the u.s. sample, e.g. in j. doe's data, we saw it. then more."),
            vec![
                "in the u.s. sample, e.g. in j. doe's data, we saw it.",
                "then more."
            ]
        );
    }

    #[test]
    fn test_decimals_do_not_split() {
        assert_eq!(
            split("the mean was 3.5 points. next."),
            vec!["the mean was 3.5 points.", "next."]
        );
    }

    #[test]
    fn test_closing_quotes_stay_with_sentence() {
        assert_eq!(
            split("they called it \"deviant.\" we disagree."),
            vec!["they called it \"deviant.\"", "we disagree."]
        );
    }

    #[test]
    fn test_repeated_terminals() {
        assert_eq!(split("really?! yes..."), vec!["really?!", "yes..."]);
    }

    #[test]
    fn test_is_lazy_and_restartable_by_cloning() {
        let mut iter = sentences("one. two. three.");
        assert_eq!(iter.next(), Some("one."));
        let rest: Vec<_> = iter.clone().collect();
        assert_eq!(rest, vec!["two.", "three."]);
        assert_eq!(iter.count(), 2);
    }
}
