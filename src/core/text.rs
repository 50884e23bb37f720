use regex::{Captures, Regex};
use std::sync::OnceLock;

const TAB_SIZE: usize = 8;

/// Fill `text` into lines of at most `width` characters.
///
/// Tabs are expanded and the ASCII whitespace characters `\t \n \x0b \x0c \r`
/// become plain spaces; other characters, including the no-break space the
/// C64 uses as shifted space, are part of words. Lines break between words
/// or after a hyphen inside a word, and before or after a run of two or
/// more hyphens used as a dash. Whitespace at a break is dropped, whitespace
/// before the first word is kept. Words longer than `width` are split,
/// preferably after their last hyphen that still fits.
pub fn wrap(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut chunks = split_chunks(&normalize_whitespace(text));
    chunks.reverse();

    let mut lines: Vec<String> = Vec::new();
    while !chunks.is_empty() {
        let mut line: Vec<Vec<char>> = Vec::new();
        let mut len = 0;

        if !lines.is_empty() && chunks.last().is_some_and(|c| is_blank(c)) {
            chunks.pop();
        }

        while let Some(chunk) = chunks.pop() {
            if len + chunk.len() > width {
                chunks.push(chunk);
                break;
            }
            len += chunk.len();
            line.push(chunk);
        }

        if let Some(chunk) = chunks.pop() {
            if chunk.len() > width {
                let (head, rest) = split_long_word(chunk, width - len);
                if !head.is_empty() {
                    line.push(head);
                }
                chunks.push(rest);
            } else {
                chunks.push(chunk);
            }
        }

        if line.last().is_some_and(|c| is_blank(c)) {
            line.pop();
        }
        if !line.is_empty() {
            lines.push(line.concat().into_iter().collect());
        }
    }

    lines.join("\n")
}

fn is_blank(chunk: &[char]) -> bool {
    chunk.iter().all(|c| c.is_whitespace())
}

fn is_ascii_space(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0b' | '\x0c' | '\r' | ' ')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_letter(c: char) -> bool {
    is_word_char(c) && !c.is_numeric()
}

fn is_dash_neighbour(c: char) -> bool {
    is_word_char(c) || matches!(c, '!' | '"' | '\'' | '&' | '.' | ',' | '?')
}

/// Cut an over-long word so the head fits into `room` columns.
fn split_long_word(mut chunk: Vec<char>, room: usize) -> (Vec<char>, Vec<char>) {
    let mut end = room;
    if let Some(hyphen) = chunk[..room].iter().rposition(|&c| c == '-') {
        if hyphen > 0 && chunk[..hyphen].iter().any(|&c| c != '-') {
            end = hyphen + 1;
        }
    }
    let rest = chunk.split_off(end);
    (chunk, rest)
}

fn normalize_whitespace(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(' ');
                column = 0;
            }
            c if is_ascii_space(c) => {
                out.push(' ');
                column += 1;
            }
            c => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

// Runs of spaces, and words cut at their break points.
fn split_chunks(chars: &[char]) -> Vec<Vec<char>> {
    let mut chunks: Vec<Vec<char>> = Vec::new();
    let mut start = 0;
    for end in 1..=chars.len() {
        if end < chars.len() && (chars[end] == ' ') == (chars[start] == ' ') {
            continue;
        }
        let run = &chars[start..end];
        if run[0] == ' ' {
            chunks.push(run.to_vec());
        } else {
            chunks.extend(split_word(run));
        }
        start = end;
    }
    chunks
}

fn split_word(word: &[char]) -> Vec<Vec<char>> {
    let letter_at = |i: usize| word.get(i).is_some_and(|&c| is_letter(c));
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < word.len() {
        if word[i] != '-' {
            i += 1;
            continue;
        }

        let dash_end = i + word[i..].iter().take_while(|&&c| c == '-').count();
        if dash_end - i >= 2
            && i > 0
            && is_dash_neighbour(word[i - 1])
            && word.get(dash_end).is_some_and(|&c| is_word_char(c))
        {
            if start < i {
                pieces.push(word[start..i].to_vec());
            }
            pieces.push(word[i..dash_end].to_vec());
            start = dash_end;
            i = dash_end;
            continue;
        }

        let after_letters = (i >= 2 && letter_at(i - 2) && letter_at(i - 1))
            || (i >= 3 && letter_at(i - 3) && word[i - 2] == '-' && letter_at(i - 1));
        let before_letters = letter_at(i + 1)
            && (letter_at(i + 2) || (word.get(i + 2) == Some(&'-') && letter_at(i + 3)));
        if i > start && after_letters && before_letters {
            pieces.push(word[start..=i].to_vec());
            start = i + 1;
        }
        i += 1;
    }

    if start < word.len() {
        pieces.push(word[start..].to_vec());
    }
    pieces
}

fn umlaut_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new("ae|Ae|oe|Oe|ue|Ue|ss").unwrap_or_else(|e| panic!("invalid umlaut pattern: {e}"))
    })
}

/// Replace the two-letter spellings used on machines without umlauts.
pub fn replace_alt_umlauts(text: &str) -> String {
    umlaut_pattern()
        .replace_all(text, |caps: &Captures| match &caps[0] {
            "ae" => "ä",
            "Ae" => "Ä",
            "oe" => "ö",
            "Oe" => "Ö",
            "ue" => "ü",
            "Ue" => "Ü",
            _ => "ß",
        })
        .into_owned()
}
