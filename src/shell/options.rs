//! Flag and option parsing for command arguments
//!
//! Turns the words after the command name into positional arguments and
//! a string map of options. Recognized options come from an
//! [`OptionSpec`]; anything else that looks like a flag is kept under its
//! literal name.

use std::collections::HashMap;

/// Parsed option values, keyed by long name
pub type Options = HashMap<String, String>;

/// One recognized option
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionDef {
    pub long: String,
    pub short: Option<char>,
    /// Whether the option consumes a value (`--name bob`)
    pub takes_value: bool,
    pub default: Option<String>,
}

/// Set of recognized options for one command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionSpec {
    defs: Vec<OptionDef>,
}

impl OptionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a boolean flag
    pub fn flag(mut self, long: &str, short: Option<char>) -> Self {
        self.push(long, short, false);
        self
    }

    /// Add an option that takes a value
    pub fn value(mut self, long: &str, short: Option<char>) -> Self {
        self.push(long, short, true);
        self
    }

    /// Set the value used when the option is absent
    pub fn with_default(mut self, long: &str, value: &str) -> Self {
        if let Some(def) = self.defs.iter_mut().find(|d| d.long == long) {
            def.default = Some(value.to_string());
        }
        self
    }

    fn push(&mut self, long: &str, short: Option<char>, takes_value: bool) {
        // Redefinition replaces
        self.defs.retain(|d| d.long != long);
        self.defs.push(OptionDef {
            long: long.to_string(),
            short,
            takes_value,
            default: None,
        });
    }

    pub fn defs(&self) -> &[OptionDef] {
        &self.defs
    }

    fn by_long(&self, name: &str) -> Option<&OptionDef> {
        self.defs.iter().find(|d| d.long == name)
    }

    fn by_short(&self, ch: char) -> Option<&OptionDef> {
        self.defs.iter().find(|d| d.short == Some(ch))
    }
}

fn looks_like_number(word: &str) -> bool {
    word.parse::<f64>().is_ok()
}

fn looks_like_flag(word: &str) -> bool {
    word.len() > 1 && word.starts_with('-') && !looks_like_number(word)
}

/// Take the next token as an option value unless it is itself a flag
fn take_value(rest: &mut std::slice::Iter<'_, String>) -> String {
    match rest.as_slice().first() {
        Some(next) if !looks_like_flag(next) => {
            rest.next();
            next.clone()
        }
        _ => String::new(),
    }
}

/// Split `tokens` into positional arguments and options
pub fn parse_options(tokens: &[String], spec: &OptionSpec) -> (Vec<String>, Options) {
    let mut positional = Vec::new();
    let mut options = Options::new();
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        if token == "--" {
            positional.extend(iter.by_ref().cloned());
            break;
        }

        if let Some(body) = token.strip_prefix("--") {
            let (name, inline) = match body.split_once('=') {
                Some((n, v)) => (n, Some(v.to_string())),
                None => (body, None),
            };

            if let Some(def) = spec.by_long(name) {
                let value = match inline {
                    Some(v) => v,
                    None if def.takes_value => take_value(&mut iter),
                    None => "true".to_string(),
                };
                options.insert(def.long.clone(), value);
                continue;
            }

            if inline.is_none() {
                if let Some(negated) = name.strip_prefix("no-") {
                    if spec.by_long(negated).map_or(true, |d| !d.takes_value) {
                        options.insert(negated.to_string(), "false".to_string());
                        continue;
                    }
                }
            }

            options.insert(name.to_string(), inline.unwrap_or_else(|| "true".to_string()));
            continue;
        }

        if looks_like_flag(token) {
            parse_short_cluster(&token[1..], &mut iter, spec, &mut options);
            continue;
        }

        positional.push(token.clone());
    }

    for def in spec.defs() {
        if let Some(default) = &def.default {
            options
                .entry(def.long.clone())
                .or_insert_with(|| default.clone());
        }
    }

    (positional, options)
}

fn parse_short_cluster(
    cluster: &str,
    rest: &mut std::slice::Iter<'_, String>,
    spec: &OptionSpec,
    options: &mut Options,
) {
    let chars: Vec<char> = cluster.chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        let def = spec.by_short(ch);
        let key = def.map_or_else(|| ch.to_string(), |d| d.long.clone());

        if def.map_or(false, |d| d.takes_value) {
            let attached: String = chars[i + 1..].iter().collect();
            let attached = attached.strip_prefix('=').map(str::to_string).unwrap_or(attached);
            let value = if !attached.is_empty() {
                attached
            } else {
                take_value(rest)
            };
            options.insert(key, value);
            return;
        }

        options.insert(key, "true".to_string());
    }
}
