//! Inline paragraph markup: `<b>` … `</b>` toggles bold, everything else is literal text

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

/// A run of non-whitespace text, possibly mixing bold and regular fragments
pub type Word = Vec<Span>;

const OPEN: &str = "<b>";
const CLOSE: &str = "</b>";

/// Split `markup` into styled spans; an unclosed `<b>` runs to the end
pub fn parse_inline(markup: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut bold = false;
    let mut rest = markup;

    loop {
        let next = [OPEN, CLOSE]
            .iter()
            .filter_map(|tag| rest.find(tag).map(|at| (at, *tag)))
            .min_by_key(|(at, _)| *at);
        match next {
            Some((at, tag)) => {
                push_span(&mut spans, &rest[..at], bold);
                bold = tag == OPEN;
                rest = &rest[at + tag.len()..];
            }
            None => {
                push_span(&mut spans, rest, bold);
                return spans;
            }
        }
    }
}

fn push_span(spans: &mut Vec<Span>, text: &str, bold: bool) {
    if text.is_empty() {
        return;
    }
    let text = to_base_font_text(text);
    match spans.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(&text),
        _ => spans.push(Span { text, bold }),
    }
}

/// Break spans into words, collapsing all whitespace
pub fn words(spans: &[Span]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Word = Vec::new();

    for span in spans {
        for c in span.text.chars() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                continue;
            }
            match current.last_mut() {
                Some(fragment) if fragment.bold == span.bold => fragment.text.push(c),
                _ => current.push(Span {
                    text: c.to_string(),
                    bold: span.bold,
                }),
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Blank-line separated paragraphs of the narrative
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

/// Replace characters the standard PDF fonts cannot show.
///
/// Typographic punctuation maps to ASCII, emoji are dropped and anything else
/// outside ASCII becomes `?`.
pub fn to_base_font_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' | '\n' | '\t' => out.push(c),
            '\u{00A0}' | '\u{2002}'..='\u{200A}' | '\u{202F}' => out.push(' '),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2022}' | '\u{2023}' | '\u{2043}' | '\u{25CF}' | '\u{25E6}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00D7}' => out.push('x'),
            '\u{200B}' | '\u{200D}' | '\u{FE0F}' | '\u{1F000}'..='\u{1FAFF}' | '\u{2600}'..='\u{27BF}' => {}
            _ => out.push('?'),
        }
    }
    out
}
