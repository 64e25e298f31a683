//! Sort state and stable ordering of records

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{Record, display_string};

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Column the view is sorted by, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    #[serde(rename = "columnKey")]
    pub column_key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Select `key`: the current column flips direction, any other column
    /// becomes current in ascending order
    pub fn select(&mut self, key: &str) {
        if self.column_key.as_deref() == Some(key) {
            self.direction = self.direction.toggled();
        } else {
            self.column_key = Some(key.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    pub fn is_sorted_by(&self, key: &str) -> bool {
        self.column_key.as_deref() == Some(key)
    }
}

fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Native ordering of two attribute values
///
/// Numbers compare numerically, strings lexically, booleans false < true.
/// Missing and null sort first; values of different kinds order by kind.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
            }
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x @ Value::Array(_)), Some(y @ Value::Array(_)))
        | (Some(x @ Value::Object(_)), Some(y @ Value::Object(_))) => {
            display_string(x).cmp(&display_string(y))
        }
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

/// Reorder `indices` by the sort column, keeping ties in their current order
///
/// Does nothing when no column is selected.
pub fn sort_indices<R: Record>(records: &[R], indices: &mut Vec<usize>, sort: &SortState) {
    let Some(key) = sort.column_key.as_deref() else {
        return;
    };

    // Extract each key once; Record::field may serialize the whole row.
    let mut keyed: Vec<(usize, Option<Value>)> = indices
        .iter()
        .map(|&i| (i, records[i].field(key)))
        .collect();

    // slice::sort_by is stable
    keyed.sort_by(|a, b| sort.direction.apply(compare_values(a.1.as_ref(), b.1.as_ref())));

    *indices = keyed.into_iter().map(|(i, _)| i).collect();
}

/// Stable sort of owned records
pub fn stable_sort<R: Record>(records: Vec<R>, sort: &SortState) -> Vec<R> {
    let mut indices: Vec<usize> = (0..records.len()).collect();
    sort_indices(&records, &mut indices, sort);
    indices.into_iter().map(|i| records[i].clone()).collect()
}
