//! Shell-like word splitting
//!
//! Whitespace separates words. Single quotes are literal, double quotes
//! honour `\"` and `\\`, and a backslash outside quotes escapes the next
//! character. Quoted and unquoted parts that touch form one word.

use crate::error::TokenizeError;

/// Tokenizer state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Between words
    Blank,
    /// Inside an unquoted word
    Word,
    Single,
    Double,
}

/// Split a command line into words
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut state = State::Blank;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match state {
            State::Blank | State::Word => match ch {
                c if c.is_whitespace() => {
                    if state == State::Word {
                        words.push(std::mem::take(&mut current));
                        state = State::Blank;
                    }
                }
                '\'' => state = State::Single,
                '"' => state = State::Double,
                '\\' => {
                    let escaped = chars.next().ok_or(TokenizeError::TrailingEscape)?;
                    current.push(escaped);
                    state = State::Word;
                }
                c => {
                    current.push(c);
                    state = State::Word;
                }
            },
            State::Single => match ch {
                '\'' => state = State::Word,
                c => current.push(c),
            },
            State::Double => match ch {
                '"' => state = State::Word,
                '\\' => match chars.next() {
                    Some(c @ ('"' | '\\')) => current.push(c),
                    Some(c) => {
                        current.push('\\');
                        current.push(c);
                    }
                    None => return Err(TokenizeError::UnterminatedQuote('"')),
                },
                c => current.push(c),
            },
        }
    }

    match state {
        State::Single => Err(TokenizeError::UnterminatedQuote('\'')),
        State::Double => Err(TokenizeError::UnterminatedQuote('"')),
        State::Word => {
            words.push(current);
            Ok(words)
        }
        State::Blank => Ok(words),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        tokenize(line).unwrap()
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(words("  echo   hello world "), vec!["echo", "hello", "world"]);
        assert!(words("   ").is_empty());
    }

    #[test]
    fn test_quotes() {
        assert_eq!(words(r#"echo "a b" 'c d'"#), vec!["echo", "a b", "c d"]);
        assert_eq!(words(r#"say "it's""#), vec!["say", "it's"]);
        assert_eq!(words(r#"x 'no \escape'"#), vec!["x", r"no \escape"]);
    }

    #[test]
    fn test_adjacent_parts_join() {
        assert_eq!(words(r#"--name="John Smith""#), vec!["--name=John Smith"]);
        assert_eq!(words(r#"a"b"'c'"#), vec!["abc"]);
    }

    #[test]
    fn test_empty_quotes_make_empty_word() {
        assert_eq!(words(r#"echo "" x"#), vec!["echo", "", "x"]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(words(r"a\ b"), vec!["a b"]);
        assert_eq!(words(r#""say \"hi\" \n""#), vec![r#"say "hi" \n"#]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(tokenize("echo 'oops"), Err(TokenizeError::UnterminatedQuote('\'')));
        assert_eq!(tokenize("echo \"oops"), Err(TokenizeError::UnterminatedQuote('"')));
        assert_eq!(tokenize("echo \\"), Err(TokenizeError::TrailingEscape));
    }
}
