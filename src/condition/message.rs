//! Condition message construction
//!
//! A `False` condition's message is either used verbatim or rendered from a
//! printf-style template. The two cases behave differently on purpose: a
//! verbatim message is never scanned for verbs, so a literal `%` survives.

use std::fmt::Display;

/// Message for a `False` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionMessage {
    /// Used as-is
    Verbatim(String),
    /// Printf-style template plus its substitution arguments
    Template { format: String, args: Vec<String> },
}

impl ConditionMessage {
    /// Build a templated message from a format string and its arguments
    ///
    /// With no arguments the format string is kept verbatim.
    pub fn template<I, A>(format: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Display,
    {
        let format = format.into();
        let args: Vec<String> = args.into_iter().map(|a| a.to_string()).collect();
        if args.is_empty() {
            ConditionMessage::Verbatim(format)
        } else {
            ConditionMessage::Template { format, args }
        }
    }

    /// Produce the final message text
    pub fn render(&self) -> String {
        match self {
            ConditionMessage::Verbatim(message) => message.clone(),
            ConditionMessage::Template { format, args } => substitute(format, args),
        }
    }
}

impl From<&str> for ConditionMessage {
    fn from(message: &str) -> Self {
        ConditionMessage::Verbatim(message.to_string())
    }
}

impl From<String> for ConditionMessage {
    fn from(message: String) -> Self {
        ConditionMessage::Verbatim(message)
    }
}

/// Substitute `%s`, `%d`, `%v` and `%q` with successive arguments
///
/// Mismatches are reported inline the way printf does. Every verb consumes
/// one argument: an unsupported verb renders as `%!<verb>(string=<arg>)`, a
/// verb with no argument left as `%!<verb>(MISSING)`, and leftover arguments
/// are appended as `%!(EXTRA ...)`.
fn substitute(format: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut remaining = args.iter();
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let verb = match chars.next() {
            Some('%') => {
                out.push('%');
                continue;
            }
            Some(verb) => verb,
            None => {
                out.push_str("%!(NOVERB)");
                continue;
            }
        };
        match (verb, remaining.next()) {
            ('s' | 'd' | 'v', Some(arg)) => out.push_str(arg),
            ('q', Some(arg)) => out.push_str(&quote(arg)),
            (_, Some(arg)) => out.push_str(&format!("%!{}(string={})", verb, arg)),
            (_, None) => out.push_str(&format!("%!{}(MISSING)", verb)),
        }
    }

    let extra: Vec<&str> = remaining.map(String::as_str).collect();
    if !extra.is_empty() {
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }
    out
}

/// Double-quoted string literal with C-style escapes
fn quote(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
