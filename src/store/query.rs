//! Structured queries for the document store.
//!
//! Filters, updates and pipeline stages are plain data so that any backend
//! can translate them; [`Filter::matches`] and friends give the reference
//! semantics used by the in-memory store.

use serde_json::{Map, Value};

/// A predicate over a JSON document.
///
/// Field names may be dotted paths (`"a.b"`). A missing field compares equal
/// to `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals value.
    Eq(String, Value),
    /// Field equals one of the values.
    In(String, Vec<Value>),
    /// Field is an array with at least one element matching the filter.
    ElemMatch(String, Box<Filter>),
    /// Every filter matches. An empty conjunction matches everything.
    And(Vec<Filter>),
}

impl Filter {
    /// `field == value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    /// `field` is one of `values`.
    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    /// Some element of the array `field` matches `element`.
    pub fn elem_match(field: impl Into<String>, element: Filter) -> Self {
        Filter::ElemMatch(field.into(), Box::new(element))
    }

    /// Evaluates the filter against a document.
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Filter::Eq(field, expected) => lookup(document, field) == expected,
            Filter::In(field, candidates) => {
                let actual = lookup(document, field);
                candidates.iter().any(|c| c == actual)
            }
            Filter::ElemMatch(field, element) => match lookup(document, field) {
                Value::Array(items) => items.iter().any(|item| element.matches(item)),
                _ => false,
            },
            Filter::And(filters) => filters.iter().all(|f| f.matches(document)),
        }
    }
}

/// A modification applied to the first document matching a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Append every value to the array `field`, creating it if absent.
    PushEach {
        /// The array field.
        field: String,
        /// Values to append, in order.
        values: Vec<Value>,
    },
    /// Set `field` on the first element of `array` that matches `element`.
    SetFirstMatch {
        /// The array field.
        array: String,
        /// Selects the element to modify.
        element: Filter,
        /// The field of the element to set.
        field: String,
        /// The new value.
        value: Value,
    },
}

impl Update {
    /// Applies the update in place. Returns whether the document changed, or
    /// a message if the document does not have the expected shape.
    ///
    /// The update runs against a copy that replaces `document` only on
    /// success, so a failed update leaves it untouched.
    pub fn apply(&self, document: &mut Value) -> Result<bool, String> {
        let mut candidate = document.clone();
        let modified = self.apply_to(&mut candidate)?;
        if modified {
            *document = candidate;
        }
        Ok(modified)
    }

    fn apply_to(&self, document: &mut Value) -> Result<bool, String> {
        match self {
            Update::PushEach { field, values } => {
                let slot = lookup_mut(document, field)?;
                if slot.is_null() {
                    *slot = Value::Array(Vec::new());
                }
                let items = slot
                    .as_array_mut()
                    .ok_or_else(|| format!("field '{}' is not an array", field))?;
                items.extend(values.iter().cloned());
                Ok(!values.is_empty())
            }
            Update::SetFirstMatch {
                array,
                element,
                field,
                value,
            } => {
                let items = lookup_mut(document, array)?
                    .as_array_mut()
                    .ok_or_else(|| format!("field '{}' is not an array", array))?;
                let Some(target) = items.iter_mut().find(|item| element.matches(item)) else {
                    return Ok(false);
                };
                let slot = lookup_mut(target, field)?;
                if slot == value {
                    return Ok(false);
                }
                *slot = value.clone();
                Ok(true)
            }
        }
    }
}

/// One stage of an aggregation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep only documents matching the filter.
    Match(Filter),
    /// Keep only the elements of the array `field` that match `cond`.
    FilterArray {
        /// The array field.
        field: String,
        /// Condition each kept element satisfies.
        cond: Filter,
    },
}

impl Stage {
    /// Runs the stage over a set of documents.
    pub fn run(&self, documents: Vec<Value>) -> Vec<Value> {
        match self {
            Stage::Match(filter) => documents.into_iter().filter(|d| filter.matches(d)).collect(),
            Stage::FilterArray { field, cond } => documents
                .into_iter()
                .map(|mut document| {
                    if let Ok(Value::Array(items)) = lookup_mut(&mut document, field) {
                        items.retain(|item| cond.matches(item));
                    }
                    document
                })
                .collect(),
        }
    }
}

/// Result of an `update_one` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchResult {
    /// Documents that matched the filter (0 or 1).
    pub matched_count: u64,
    /// Documents actually changed (0 or 1).
    pub modified_count: u64,
}

static NULL: Value = Value::Null;

fn lookup<'a>(document: &'a Value, path: &str) -> &'a Value {
    path.split('.')
        .try_fold(document, |current, key| current.get(key))
        .unwrap_or(&NULL)
}

fn lookup_mut<'a>(document: &'a mut Value, path: &str) -> Result<&'a mut Value, String> {
    let mut current = document;
    for key in path.split('.') {
        let object: &mut Map<String, Value> = current
            .as_object_mut()
            .ok_or_else(|| format!("cannot address '{}' in a non-object", path))?;
        current = object.entry(key.to_string()).or_insert(Value::Null);
    }
    Ok(current)
}
