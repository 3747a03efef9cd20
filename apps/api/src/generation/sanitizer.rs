//! Text sanitizer — normalizes raw model output into display-safe text.
//!
//! Rules, in order:
//! 1. drop everything except printable ASCII, `\n`, `\t`, U+2028/U+2029 and emoji/symbol ranges
//! 2. leave `*`/`**` emphasis markers untouched (they are printable ASCII)
//! 3. collapse 4+ newlines to 3
//! 4. collapse 3+ spaces to 2
//! 5. add one space after `.` `!` `?` when the next character is not a space or newline
//! 6. trim
//!
//! The transform is pure and idempotent: `sanitize(sanitize(s)) == sanitize(s)`.

const MAX_NEWLINE_RUN: usize = 3;
const MAX_SPACE_RUN: usize = 2;

pub fn sanitize(raw: &str) -> String {
    let kept: String = raw.chars().filter(|&c| is_allowed(c)).collect();
    let collapsed = collapse_runs(&kept, '\n', MAX_NEWLINE_RUN);
    let collapsed = collapse_runs(&collapsed, ' ', MAX_SPACE_RUN);
    space_after_terminals(&collapsed).trim().to_string()
}

fn is_allowed(c: char) -> bool {
    matches!(c,
        ' '..='~'
        | '\n'
        | '\t'
        | '\u{2028}'
        | '\u{2029}'
        // zero-width joiner and emoji presentation selector keep composed emoji intact
        | '\u{200D}'
        | '\u{FE0F}'
        | '\u{2300}'..='\u{23FF}'
        | '\u{2600}'..='\u{27BF}'
        | '\u{2B00}'..='\u{2BFF}'
        | '\u{1F000}'..='\u{1FAFF}')
}

/// Caps every run of `target` at `max` repetitions.
fn collapse_runs(text: &str, target: char, max: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0;
    for c in text.chars() {
        if c == target {
            run += 1;
            if run > max {
                continue;
            }
        } else {
            run = 0;
        }
        out.push(c);
    }
    out
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Inserts a space after sentence-terminal punctuation followed by anything but a
/// space or newline. Applies per character, so "..." becomes ". . .".
fn space_after_terminals(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if is_terminal(c) && matches!(chars.peek(), Some(&next) if next != ' ' && next != '\n') {
            out.push(' ');
        }
    }
    out
}
