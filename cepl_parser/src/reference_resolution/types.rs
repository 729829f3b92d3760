//! Variable table built from a parsed query

use crate::utils::Span;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// One bound variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableInfo {
    pub name: String,
    /// Dense id in first-binding order
    pub id: usize,
    /// Relations binding this variable, in first-binding order, without duplicates
    pub relations: Vec<String>,
    /// Properties referenced through `name.property`
    pub properties: BTreeSet<String>,
    pub binding_span: Span,
    /// Number of ASSIGN nodes binding this variable
    pub binding_count: usize,
}

impl VariableInfo {
    pub fn is_rebound(&self) -> bool {
        self.relations.len() > 1
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VariableTable {
    variables: Vec<VariableInfo>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a binding; returns true when it ties the variable to a new relation
    /// after an earlier binding to a different one
    pub(super) fn bind(&mut self, name: &str, relation: &str, span: Span) -> bool {
        match self.index.get(name) {
            Some(&id) => {
                let info = &mut self.variables[id];
                info.binding_count += 1;
                if info.relations.iter().any(|r| r == relation) {
                    false
                } else {
                    info.relations.push(relation.to_string());
                    true
                }
            }
            None => {
                let id = self.variables.len();
                self.index.insert(name.to_string(), id);
                self.variables.push(VariableInfo {
                    name: name.to_string(),
                    id,
                    relations: vec![relation.to_string()],
                    properties: BTreeSet::new(),
                    binding_span: span,
                    binding_count: 1,
                });
                false
            }
        }
    }

    /// Attach a property reference; false if the variable is unbound
    pub(super) fn reference(&mut self, name: &str, property: &str) -> bool {
        match self.index.get(name) {
            Some(&id) => {
                self.variables[id].properties.insert(property.to_string());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&VariableInfo> {
        self.index.get(name).map(|&id| &self.variables[id])
    }

    pub fn by_id(&self, id: usize) -> Option<&VariableInfo> {
        self.variables.get(id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableInfo> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Total distinct `variable.property` pairs
    pub fn property_reference_count(&self) -> usize {
        self.variables.iter().map(|v| v.properties.len()).sum()
    }
}
