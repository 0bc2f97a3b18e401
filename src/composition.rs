use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::Display;

/// Element symbol to stoichiometric count, as parsed from a formula.
///
/// Iteration and display are ordered by symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    counts: BTreeMap<String, f64>,
}

impl Composition {
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.counts.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.counts.iter().map(|(symbol, count)| (symbol.as_str(), *count))
    }

    /// Sum of all counts, i.e. the number of atoms in one formula unit.
    pub fn total(&self) -> f64 {
        self.counts.values().sum()
    }

    /// Every count multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        self.iter()
            .map(|(symbol, count)| (symbol.to_string(), count * factor))
            .collect()
    }

    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.counts
    }
}

impl FromIterator<(String, f64)> for Composition {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Composition {
            counts: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Composition {
    type Item = (String, f64);
    type IntoIter = btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

impl Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (symbol, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{symbol}:{count}")?;
        }
        Ok(())
    }
}
