//! User template variables
//!
//! The host dashboard owns variable resolution; expansion only supplies the
//! rule that turns a selected value into TQL text. [`VariableTable`] is a
//! self-contained implementation for callers without a host.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Formatter handed to a [`TemplateSubstitution`]
pub type InterpolateFn<'f> = &'f dyn Fn(&VariableValue, &TemplateVariable) -> String;

/// Current selection of a variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Single(String),
    Multi(Vec<String>),
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for VariableValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

/// A dashboard template variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariable {
    pub name: String,
    #[serde(default)]
    pub multi: bool,
    #[serde(default)]
    pub include_all: bool,
    pub current: VariableValue,
}

impl TemplateVariable {
    pub fn new(name: impl Into<String>, current: impl Into<VariableValue>) -> Self {
        Self {
            name: name.into(),
            multi: false,
            include_all: false,
            current: current.into(),
        }
    }

    pub fn multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    pub fn include_all(mut self, include_all: bool) -> Self {
        self.include_all = include_all;
        self
    }
}

/// Host template substitution
///
/// Implementations find variable references in `text` and replace each one
/// with whatever `format` returns for that variable.
pub trait TemplateSubstitution: Send + Sync {
    fn substitute(&self, text: &str, format: InterpolateFn<'_>) -> String;
}

/// Interpolation rule for TQL
///
/// Plain variables become their bare value, as does a one-element selection.
/// Anything else becomes a regex alternation `(a|b|c)` with every value
/// escaped.
pub fn interpolate(value: &VariableValue, variable: &TemplateVariable) -> String {
    if !variable.multi && !variable.include_all {
        return match value {
            VariableValue::Single(v) => v.clone(),
            VariableValue::Multi(values) => values.join(","),
        };
    }

    match value {
        VariableValue::Single(v) => v.clone(),
        VariableValue::Multi(values) if values.len() == 1 => values[0].clone(),
        VariableValue::Multi(values) => {
            let escaped: Vec<String> = values.iter().map(|v| escape_regex(v)).collect();
            format!("({})", escaped.join("|"))
        }
    }
}

/// Backslash-escape `\ ^ $ * + ? . ( ) | [ ] { } /`
fn escape_regex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '^' | '$' | '*' | '+' | '?' | '.' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '/'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$(?P<bare>\w+)|\$\{(?P<braced>\w+)\}|\[\[(?P<bracket>\w+)\]\]")
            .expect("variable reference pattern compiles")
    })
}

/// In-memory variable table
///
/// Resolves `$name`, `${name}` and `[[name]]`. Names that are not in the
/// table are left as written, which keeps `$__` macros intact.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    variables: HashMap<String, TemplateVariable>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: TemplateVariable) {
        self.variables.insert(variable.name.clone(), variable);
    }

    pub fn with(mut self, variable: TemplateVariable) -> Self {
        self.insert(variable);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TemplateVariable> {
        self.variables.get(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl FromIterator<TemplateVariable> for VariableTable {
    fn from_iter<I: IntoIterator<Item = TemplateVariable>>(iter: I) -> Self {
        let mut table = Self::new();
        for variable in iter {
            table.insert(variable);
        }
        table
    }
}

impl TemplateSubstitution for VariableTable {
    fn substitute(&self, text: &str, format: InterpolateFn<'_>) -> String {
        reference_pattern()
            .replace_all(text, |caps: &Captures| {
                let name = caps
                    .name("bare")
                    .or_else(|| caps.name("braced"))
                    .or_else(|| caps.name("bracket"))
                    .map(|m| m.as_str())
                    .unwrap_or_default();

                match self.variables.get(name) {
                    Some(variable) => {
                        let replaced = format(&variable.current, variable);
                        tracing::trace!(variable = %name, value = %replaced, "Substituted variable");
                        replaced
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}
