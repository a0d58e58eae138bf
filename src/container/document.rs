use std::{io::Read, ops::Deref};

use byte_unit::Byte;
use serde_json::Value;

use crate::error::{DumpError, IndexingError, LoadError};

struct Selector<'a, T> {
    keys: &'a [T],
    next_key_pos: usize,
}

impl<'a, T: Deref<Target = str>> Selector<'a, T> {
    fn new(keys: &'a [T]) -> Self {
        Self {
            keys,
            next_key_pos: 0,
        }
    }

    fn next(&mut self) -> Option<&str> {
        let res = self.keys.get(self.next_key_pos);
        self.next_key_pos = (self.next_key_pos + 1).min(self.keys.len());
        res.map(Deref::deref)
    }
}

/// A JSON document whose object keys keep their file order.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Document(Value);

impl Document {
    /// Parses a document, refusing inputs larger than `limit`.
    pub fn load(reader: impl Read, limit: Byte) -> Result<Self, LoadError> {
        let mut content = Vec::new();
        reader
            .take(limit.as_u64().saturating_add(1))
            .read_to_end(&mut content)?;
        if content.len() as u64 > limit.as_u64() {
            return Err(LoadError::TooLarge { limit });
        }

        let value: Value = sonic_rs::from_slice(&content)?;
        Ok(Self(value))
    }

    pub fn to_string_pretty(value: &Value) -> Result<String, DumpError> {
        sonic_rs::to_string_pretty(value).map_err(Into::into)
    }

    pub fn root(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

pub fn subtree<'v, T: Deref<Target = str>>(
    root: &'v Value,
    selector: &[T],
) -> Result<&'v Value, IndexingError> {
    subtree_inner(root, Selector::new(selector))
}

/// Looks up a dotted path such as `address.city`.
///
/// Every failed step, including an absent root, yields `None`. A `null`
/// stored at the path is a hit.
pub fn resolve<'v>(root: Option<&'v Value>, path: &str) -> Option<&'v Value> {
    let root = root?;
    let keys = path.split('.').collect::<Vec<_>>();
    subtree(root, &keys).ok()
}

fn subtree_inner<'v, T: Deref<Target = str>>(
    value: &'v Value,
    mut selector: Selector<'_, T>,
) -> Result<&'v Value, IndexingError> {
    let Some(next_key) = selector.next() else {
        return Ok(value);
    };

    let missing_key = || IndexingError::MissingKey(next_key.to_string());
    let next_value = match value {
        Value::Array(values) => {
            let index = next_key.parse::<usize>().map_err(|_| missing_key())?;
            values.get(index).ok_or_else(missing_key)?
        }
        Value::Object(map) => map.get(next_key).ok_or_else(missing_key)?,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            return Err(IndexingError::NotIndexable);
        }
    };

    subtree_inner(next_value, selector)
}
