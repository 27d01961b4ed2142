//! `{name}` token interpolation.

use std::collections::BTreeMap;

/// Named values substituted into `{name}` placeholders of a log message.
///
/// ```
/// use backwater::logger::{interpolate, Context};
///
/// let ctx = Context::new().with("user", "ada").with("attempt", 3);
/// assert_eq!(interpolate("{user} failed {attempt} times", &ctx), "ada failed 3 times");
///
/// let ctx = Context::from([("token", "world")]);
/// assert_eq!(interpolate("Hello {token}", &ctx), "Hello world");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a value.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no names are bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Context
where
    K: Into<String>,
    V: ToString,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Context::new();
        for (name, value) in iter {
            context.insert(name, value);
        }
        context
    }
}

/// Replace every `{name}` in `template` that is bound in `context`.
///
/// Placeholders with no binding, and unmatched braces, are kept verbatim.
pub fn interpolate(template: &str, context: &Context) -> String {
    if context.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        match context.get(&after[..close]) {
            Some(value) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
