//*** START FILE: src/parsing/lesson_parser.rs ***//
use crate::dictionary::TranslationTable;
use crate::error::LessonError;
use crate::types::lesson::{Lesson, Sentence, Word, WordId};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// The lesson shipped with the reader.
pub const BUNDLED_LESSON: &str = include_str!("../../assets/lesson.txt");

lazy_static! {
    // Sentence-ending punctuation followed by whitespace. The punctuation stays with the sentence.
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]\s+").expect("valid sentence regex");
}

/// Splits raw lesson text into a [`Lesson`].
///
/// The first line is the title; the remaining lines are joined with spaces and
/// split into sentences after `.`, `!` or `?` followed by whitespace. Words are
/// whitespace-separated tokens with ids `w0, w1, ...` in document order.
pub fn parse_lesson_text(text: &str, translations: &TranslationTable) -> Result<Lesson, LessonError> {
    if text.trim().is_empty() {
        return Err(LessonError::Empty);
    }

    let mut lines = text.lines();
    let title = lines.next().unwrap_or_default().trim().to_string();
    let body = lines.collect::<Vec<_>>().join(" ");

    let mut sentence_texts: Vec<String> = Vec::new();
    let mut last_end = 0;
    for m in SENTENCE_END.find_iter(&body) {
        // The punctuation is a single ASCII byte at the start of the match.
        push_sentence_text(&mut sentence_texts, &body[last_end..m.start()], &body[m.start()..m.start() + 1]);
        last_end = m.end();
    }
    push_sentence_text(&mut sentence_texts, &body[last_end..], "");

    let mut next_order = 0;
    let mut sentences = Vec::with_capacity(sentence_texts.len());
    for sentence_text in &sentence_texts {
        let words: Vec<Word> = sentence_text
            .split_whitespace()
            .map(|token| {
                let word = Word {
                    id: WordId::from_order(next_order),
                    text: token.to_string(),
                    translation: Some(translations.translate(token)),
                };
                next_order += 1;
                word
            })
            .collect();
        if !words.is_empty() {
            sentences.push(Sentence { words });
        }
    }

    debug!(sentences = sentences.len(), words = next_order, "parsed lesson body");
    Ok(Lesson::new(title, sentences))
}

// A chunk holding nothing but its terminator is stray punctuation: glue it onto
// the previous sentence, or drop it when there is none yet.
fn push_sentence_text(sentences: &mut Vec<String>, chunk: &str, terminator: &str) {
    if chunk.trim().is_empty() {
        if terminator.is_empty() {
            return;
        }
        match sentences.last_mut() {
            Some(previous) => previous.push_str(terminator),
            None => warn!(terminator, "dropping punctuation before the first sentence"),
        }
        return;
    }
    sentences.push(format!("{}{}", chunk, terminator));
}

/// Reads and parses a lesson file.
pub fn load_lesson_file(path: &Path, translations: &TranslationTable) -> Result<Lesson, LessonError> {
    let contents = fs::read_to_string(path).map_err(|source| LessonError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let lesson = parse_lesson_text(&contents, translations)?;
    info!(path = %path.display(), title = lesson.title(), words = lesson.word_count(), "loaded lesson");
    Ok(lesson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::lesson::join_texts;

    fn texts(lesson: &Lesson) -> Vec<String> {
        lesson.sentences().iter().map(|s| join_texts(&s.words)).collect()
    }

    #[test]
    fn first_line_is_title_and_rest_is_body() {
        let lesson = parse_lesson_text("Mon titre\nUn deux.\nTrois quatre !", &TranslationTable::new()).unwrap();
        assert_eq!(lesson.title(), "Mon titre");
        assert_eq!(texts(&lesson), vec!["Un deux.", "Trois quatre !"]);
    }

    #[test]
    fn ids_are_sequential_across_sentences() {
        let lesson = parse_lesson_text("T\nA b. C d? E", &TranslationTable::new()).unwrap();
        let ids: Vec<&str> = lesson.words().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["w0", "w1", "w2", "w3", "w4"]);
        assert_eq!(lesson.sentences().len(), 3);
        assert_eq!(lesson.locate("w2").unwrap().sentence_index, 1);
    }

    #[test]
    fn spaced_punctuation_becomes_its_own_token() {
        let lesson = parse_lesson_text("T\nDes chats meurent . La vidéo .", &TranslationTable::new()).unwrap();
        assert_eq!(texts(&lesson), vec!["Des chats meurent .", "La vidéo ."]);
        assert_eq!(lesson.word_count(), 7);
    }

    #[test]
    fn stray_terminators_attach_to_previous_sentence() {
        let lesson = parse_lesson_text("T\nHello. . World", &TranslationTable::new()).unwrap();
        assert_eq!(texts(&lesson), vec!["Hello..", "World"]);
    }

    #[test]
    fn leading_stray_terminator_is_dropped() {
        let lesson = parse_lesson_text("T\n. Bonjour", &TranslationTable::new()).unwrap();
        assert_eq!(texts(&lesson), vec!["Bonjour"]);
    }

    #[test]
    fn abbreviations_without_following_space_do_not_split() {
        let lesson = parse_lesson_text("T\nIl a 3.5 ans.", &TranslationTable::new()).unwrap();
        assert_eq!(lesson.sentences().len(), 1);
    }

    #[test]
    fn translations_use_lookup_cascade() {
        let mut table = TranslationTable::new();
        table.insert("chats", "cats");
        let lesson = parse_lesson_text("T\nChats, chiens.", &table).unwrap();
        assert_eq!(lesson.words()[0].translation.as_deref(), Some("cats"));
        assert_eq!(lesson.words()[1].translation.as_deref(), Some("chiens."));
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(parse_lesson_text("  \n ", &TranslationTable::new()), Err(LessonError::Empty)));
    }

    #[test]
    fn title_only_yields_empty_lesson() {
        let lesson = parse_lesson_text("Just a title", &TranslationTable::new()).unwrap();
        assert!(lesson.is_empty());
        assert_eq!(lesson.title(), "Just a title");
    }

    #[test]
    fn bundled_lesson_parses() {
        let lesson = parse_lesson_text(BUNDLED_LESSON, &TranslationTable::bundled().unwrap()).unwrap();
        assert_eq!(lesson.title(), "Des chats meurent pour la science : STOP ou encore ?");
        assert!(lesson.sentences().len() > 20);
        assert_eq!(lesson.words()[0].text, "La");
        assert_eq!(lesson.words()[0].translation.as_deref(), Some("The"));
    }
}
//*** END FILE: src/parsing/lesson_parser.rs ***//
