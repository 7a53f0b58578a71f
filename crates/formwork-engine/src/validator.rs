//! Named-rule registry and pipe-delimited rule evaluation.
//!
//! Rule strings like `"required|notEmpty"` name registered rules in
//! order. Evaluation is **first applicable rule wins**: the first name
//! that resolves to a rule *with a predicate* decides the verdict, and
//! everything after it never runs. This is not "all rules must pass" —
//! a value failing both `required` and `notEmpty` reports only the
//! `required` message.

use crate::PathStore;
use formwork_types::{Name, PathKey};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Predicate deciding whether a value passes a rule.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A named validation rule: an optional predicate plus the message
/// recorded when the predicate fails.
///
/// A rule without a predicate can be registered (say, a message reserved
/// while the check is still being written) but is skipped during
/// evaluation as if its name were unregistered.
#[derive(Clone)]
pub struct Rule {
    predicate: Option<Predicate>,
    message: String,
}

impl Rule {
    /// Creates a rule with a predicate and failure message.
    #[must_use]
    pub fn new(message: impl Into<String>, predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Some(Arc::new(predicate)),
            message: message.into(),
        }
    }

    /// Creates a rule that only reserves a message; it is never
    /// evaluated until a predicate is registered under the same name.
    #[must_use]
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            predicate: None,
            message: message.into(),
        }
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if this rule can be evaluated.
    #[must_use]
    pub fn is_evaluable(&self) -> bool {
        self.predicate.is_some()
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("message", &self.message)
            .field("evaluable", &self.is_evaluable())
            .finish()
    }
}

/// Outcome of evaluating a rule string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "camelCase")]
pub enum Verdict {
    /// The deciding rule's predicate passed.
    Pass,
    /// The deciding rule's predicate failed.
    Fail {
        /// The failing rule's message.
        message: String,
    },
    /// No named rule was evaluable; nothing was checked or recorded.
    NotEvaluated,
}

impl Verdict {
    /// Returns `true` for [`Verdict::Pass`].
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns `true` for [`Verdict::Fail`].
    #[must_use]
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    /// Returns the failure message, if failing.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Fail { message } => Some(message),
            _ => None,
        }
    }
}

/// Name-keyed rule table with its own error tree.
///
/// Evaluation reads a value out of a caller-supplied tree and records
/// the outcome per path: the deciding rule's message on failure, a
/// cleared slot on success. Failures are data — nothing here returns
/// `Result`.
pub struct Validator {
    rules: RwLock<HashMap<String, Rule>>,
    errors: PathStore,
}

impl Validator {
    /// Creates an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(HashMap::new()),
            errors: PathStore::new(),
        }
    }

    /// Registers `rule` under `name`, silently overwriting any previous
    /// rule with that name.
    pub fn define_rule(&self, name: impl Into<String>, rule: Rule) {
        let name = name.into();
        tracing::debug!(rule = %name, evaluable = rule.is_evaluable(), "rule defined");
        self.rules.write().insert(name, rule);
    }

    /// Returns `true` if a rule is registered under `name`.
    #[must_use]
    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.read().contains_key(name)
    }

    /// Evaluates `rule_str` against the value at `name` inside `tree`.
    ///
    /// `rule_str` is split on `|`; unregistered names are skipped; the
    /// first evaluable rule decides. On failure its message is recorded
    /// as the path's error; on success the path's error is cleared. An
    /// absent value evaluates as null.
    pub fn evaluate(&self, tree: &Value, name: &Name, rule_str: &str) -> Verdict {
        let rules = self.resolve(rule_str);
        let value = value_at(tree, name).unwrap_or(Value::Null);

        for rule in rules {
            let Some(predicate) = &rule.predicate else {
                continue;
            };
            return if predicate(&value) {
                self.errors.set(name, Value::Null);
                Verdict::Pass
            } else {
                tracing::debug!(path = %PathKey::from_name(name), message = %rule.message, "rule failed");
                self.errors.set(name, Value::String(rule.message.clone()));
                Verdict::Fail {
                    message: rule.message.clone(),
                }
            };
        }

        Verdict::NotEvaluated
    }

    /// Evaluates `rule_str` against a bare value.
    ///
    /// Same first-applicable-rule semantics as [`evaluate`](Self::evaluate),
    /// but nothing is recorded: this is a single-value check with no
    /// path. Nested trees are not walked; passing an object checks the
    /// object itself against the rules.
    #[must_use]
    pub fn validate_value(&self, value: &Value, rule_str: &str) -> Verdict {
        for rule in self.resolve(rule_str) {
            let Some(predicate) = &rule.predicate else {
                continue;
            };
            return if predicate(value) {
                Verdict::Pass
            } else {
                Verdict::Fail {
                    message: rule.message.clone(),
                }
            };
        }
        Verdict::NotEvaluated
    }

    /// Returns the error recorded for `name`, if any.
    #[must_use]
    pub fn field_error(&self, name: &Name) -> Option<Value> {
        self.errors.get(name).filter(|v| !v.is_null())
    }

    /// Resolves a pipe-delimited rule string into registered rules,
    /// preserving order and skipping unknown or empty names.
    fn resolve(&self, rule_str: &str) -> Vec<Rule> {
        let table = self.rules.read();
        rule_str
            .split('|')
            .filter(|part| !part.is_empty())
            .filter_map(|part| table.get(part).cloned())
            .collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads the value at `name` out of a plain tree.
fn value_at(tree: &Value, name: &Name) -> Option<Value> {
    let mut node = tree;
    for segment in name.segments() {
        node = match (&segment, node) {
            (formwork_types::Segment::Key(k), Value::Object(map)) => map.get(k)?,
            (formwork_types::Segment::Key(k), Value::Array(items)) => {
                items.get(k.parse::<usize>().ok()?)?
            }
            (formwork_types::Segment::Index(i), Value::Array(items)) => items.get(*i)?,
            (formwork_types::Segment::Index(i), Value::Object(map)) => map.get(&i.to_string())?,
            _ => return None,
        };
    }
    Some(node.clone())
}
