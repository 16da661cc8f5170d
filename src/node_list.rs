//! Evaluation output.
//!
//! Most queries used for metric mapping select exactly one node, so the
//! singleton case avoids allocating a list at all.

use crate::{
    list::{AllocError, RefList},
    output::to_json,
    value::Value,
};

/// The nodes selected by a query, in encounter order, duplicates kept.
///
/// Values are deep clones of document data and do not borrow from it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeList {
    #[default]
    Empty,
    One(Value),
    Many(RefList<Value>),
}

impl NodeList {
    pub fn new() -> Self {
        NodeList::Empty
    }

    /// Appends a node, promoting `Empty` to `One` and `One` to `Many`.
    pub fn push(&mut self, value: Value) -> Result<(), AllocError> {
        if let NodeList::Many(list) = self {
            return list.push(value);
        }
        *self = match std::mem::take(self) {
            NodeList::One(first) => {
                let mut list = RefList::with_capacity(2);
                list.push(first)?;
                list.push(value)?;
                NodeList::Many(list)
            }
            _ => NodeList::One(value),
        };
        Ok(())
    }

    pub fn len(&self) -> usize {
        match self {
            NodeList::Empty => 0,
            NodeList::One(_) => 1,
            NodeList::Many(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            NodeList::Empty => None,
            NodeList::One(v) => (index == 0).then_some(v),
            NodeList::Many(list) => list.get(index),
        }
    }

    pub fn first(&self) -> Option<&Value> {
        self.get(0)
    }

    /// The only node, if there is exactly one.
    pub fn single(&self) -> Option<&Value> {
        match self {
            NodeList::One(v) => Some(v),
            NodeList::Many(list) if list.len() == 1 => list.first(),
            _ => None,
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            index: 0,
        }
    }

    pub fn into_vec(self) -> Vec<Value> {
        match self {
            NodeList::Empty => Vec::new(),
            NodeList::One(v) => vec![v],
            NodeList::Many(list) => list.into_vec(),
        }
    }

    /// Text of a singleton scalar, the way a metric name, label or value is read.
    ///
    /// Strings come back unquoted; numbers and booleans in their JSON spelling.
    /// Null, containers, empty lists and multi-node lists give `None`.
    pub fn scalar_text(&self) -> Option<String> {
        match self.single()? {
            Value::String(s) => Some(s.clone()),
            v @ (Value::Integer(_) | Value::Float(_) | Value::Boolean(_)) => Some(to_json(v)),
            _ => None,
        }
    }
}

pub struct Iter<'a> {
    list: &'a NodeList,
    index: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.list.get(self.index)?;
        self.index += 1;
        Some(item)
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
