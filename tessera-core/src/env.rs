//! Environment variable expansion for settings files.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::{TesseraError, TesseraResult};

/// Where variable values come from.
pub trait EnvSource: Send + Sync {
    /// Look up a variable.
    fn get(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Expands `${VAR}`, `${VAR:-default}` and `${VAR:?message}`.
///
/// Empty values count as unset for the `:-` and `:?` forms. A `$` that is not
/// followed by `{` is kept literally, and `$${` writes a literal `${`.
#[derive(Debug, Clone)]
pub struct EnvExpander<S: EnvSource = ProcessEnv> {
    source: S,
}

impl Default for EnvExpander<ProcessEnv> {
    fn default() -> Self {
        Self { source: ProcessEnv }
    }
}

impl<S: EnvSource> EnvExpander<S> {
    /// Create an expander reading from `source`.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Expand every reference in `input`.
    ///
    /// ```rust
    /// use tessera_core::env::{EnvExpander, MapEnv};
    ///
    /// let expander = EnvExpander::with_source(MapEnv::new().set("DB_HOST", "db:27017"));
    /// assert_eq!(expander.expand("${DB_HOST}").unwrap(), "db:27017");
    /// assert_eq!(expander.expand("pa$word").unwrap(), "pa$word");
    /// ```
    pub fn expand(&self, input: &str) -> TesseraResult<String> {
        let mut out = String::with_capacity(input.len());
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('{') => {
                    chars.next();
                    out.push_str(&self.expand_braced(&mut chars)?);
                }
                Some('$') => {
                    chars.next();
                    if chars.next_if_eq(&'{').is_some() {
                        out.push_str("${");
                    } else {
                        out.push_str("$$");
                    }
                }
                _ => out.push(c),
            }
        }

        Ok(out)
    }

    fn expand_braced(&self, chars: &mut Peekable<Chars<'_>>) -> TesseraResult<String> {
        let mut body = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            body.push(c);
        }
        if !closed {
            return Err(TesseraError::env(format!("unterminated '${{{}'", body)));
        }

        let (name, modifier) = match body.split_once(':') {
            Some((name, rest)) => (name, Some(rest)),
            None => (body.as_str(), None),
        };
        if name.is_empty() {
            return Err(TesseraError::env("empty variable name"));
        }

        let value = self.source.get(name).filter(|v| !v.is_empty());
        match (value, modifier) {
            (Some(value), _) => Ok(value),
            (None, Some(m)) if m.starts_with('-') => Ok(m[1..].to_string()),
            (None, Some(m)) if m.starts_with('?') && m.len() > 1 => {
                Err(TesseraError::env(m[1..].to_string()))
            }
            (None, _) => Err(TesseraError::env(format!("variable '{}' is not set", name))),
        }
    }
}
