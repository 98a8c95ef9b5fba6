//! Variant bindings and cross products

use indexmap::IndexMap;

use crate::configuration::value::{ParamValues, Value};

/// One combination of variant values
///
/// Holds the bound value of every varying parameter together with the
/// position of that value in the parameter's admissible list. Index 0 is the
/// parameter's current value when it has one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variant {
    values: ParamValues,
    indexes: IndexMap<String, usize>,
}

impl Variant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value at index 0
    pub fn bind(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind_indexed(name, value, 0)
    }

    pub fn bind_indexed(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        index: usize,
    ) -> Self {
        let name = name.into();
        self.indexes.insert(name.clone(), index);
        self.values.insert(name, value.into());
        self
    }

    pub fn values(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Position of the bound value; unbound names report 0
    pub fn index_of(&self, name: &str) -> usize {
        self.indexes.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_values(&self) -> &ParamValues {
        &self.values
    }

    pub fn into_values(self) -> ParamValues {
        self.values
    }
}

/// Lexicographic product over `(name, admissible values)` axes
///
/// Axes are enumerated in the order given; the last axis varies fastest.
/// An empty axis list or any empty axis yields no combinations.
pub(crate) fn cross_product(axes: &[(String, Vec<Value>)]) -> Vec<Variant> {
    if axes.is_empty() || axes.iter().any(|(_, values)| values.is_empty()) {
        return Vec::new();
    }

    let total: usize = axes.iter().map(|(_, values)| values.len()).product();
    let mut combinations = Vec::with_capacity(total);
    let mut cursor = vec![0usize; axes.len()];

    loop {
        let variant = axes
            .iter()
            .zip(&cursor)
            .fold(Variant::new(), |variant, ((name, values), &index)| {
                variant.bind_indexed(name.clone(), values[index].clone(), index)
            });
        combinations.push(variant);

        // Advance the odometer from the rightmost axis
        let mut axis = axes.len();
        loop {
            if axis == 0 {
                return combinations;
            }
            axis -= 1;
            cursor[axis] += 1;
            if cursor[axis] < axes[axis].1.len() {
                break;
            }
            cursor[axis] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product_order() {
        let axes = vec![
            ("a".to_string(), vec![Value::Int(1), Value::Int(2)]),
            ("b".to_string(), vec![Value::from("x"), Value::from("y"), Value::from("z")]),
        ];
        let combinations = cross_product(&axes);
        assert_eq!(combinations.len(), 6);
        assert_eq!(combinations[0].get("a"), Some(&Value::Int(1)));
        assert_eq!(combinations[0].get("b"), Some(&Value::from("x")));
        assert_eq!(combinations[1].get("b"), Some(&Value::from("y")));
        assert_eq!(combinations[3].get("a"), Some(&Value::Int(2)));
        assert_eq!(combinations[5].index_of("b"), 2);
    }

    #[test]
    fn test_cross_product_empty() {
        assert!(cross_product(&[]).is_empty());
        assert!(cross_product(&[("a".to_string(), Vec::new())]).is_empty());
    }

    #[test]
    fn test_unbound_index_defaults_to_zero() {
        let variant = Variant::new().bind_indexed("x", 3, 2);
        assert_eq!(variant.index_of("x"), 2);
        assert_eq!(variant.index_of("missing"), 0);
    }
}
