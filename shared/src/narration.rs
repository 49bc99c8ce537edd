//! Text preparation for speech synthesis
//!
//! Generated plans are markdown. Before narration the markup is stripped so
//! the speech engine does not read symbols aloud, and the text is cut into
//! pieces small enough for the hosted speech endpoint.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Longest piece of text the speech endpoint accepts in one request
pub const MAX_SPEECH_CHUNK_CHARS: usize = 100;

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").unwrap());
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{1,2}").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove common markdown symbols and collapse whitespace
pub fn clean_markdown(text: &str) -> String {
    let text = LINK.replace_all(text, "$1");
    let text = text.replace('#', "");
    let text = EMPHASIS.replace_all(&text, "");
    let text = text.replace('_', "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Split text into chunks of at most `max_chars` characters
///
/// Words are never split unless a single word is longer than `max_chars`.
/// Chunk order follows the text.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;

        // Sentence ends are natural pauses; start a new request there once
        // the chunk is reasonably full.
        if current_len * 2 >= max_chars && ends_sentence(word) {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn ends_sentence(word: &str) -> bool {
    matches!(word.chars().last(), Some('.' | '!' | '?' | ';' | ':'))
}
