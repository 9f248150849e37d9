use std::cmp::Ordering;
use crate::engine::statement::{OrderBy, OrderDirection, SelectStatement};
use crate::engine::store::TableStore;
use crate::utils::types::{Row, Value};

/// Run a SELECT against the store.
///
/// A missing table reads as empty. The WHERE clause is only applied when
/// parameters were supplied; with an empty slice every row passes.
pub fn execute_select(store: &TableStore, select: &SelectStatement, params: &[Value]) -> Vec<Row> {
    let rows = store.rows(&select.table);

    let mut matched: Vec<&Row> = match (&select.predicate, params.is_empty()) {
        (Some(predicate), false) => {
            rows.iter().filter(|row| predicate.evaluate(row, params)).collect()
        }
        _ => rows.iter().collect(),
    };

    if let Some(order_by) = &select.order_by {
        sort_rows(&mut matched, order_by);
    }

    if let Some(limit) = select.limit {
        matched.truncate(limit);
    }

    match &select.projection {
        Some(columns) => matched.into_iter().map(|row| project(row, columns)).collect(),
        None => matched.into_iter().cloned().collect(),
    }
}

/// Stable single-column sort; absent values go last, then nulls, in either direction
pub fn sort_rows(rows: &mut [&Row], order_by: &OrderBy) {
    let column = order_by.column.as_str();
    rows.sort_by(|a, b| compare_for_order(a.get(column), b.get(column), order_by.direction));
}

fn compare_for_order(a: Option<&Value>, b: Option<&Value>, direction: OrderDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Null), Some(Value::Null)) => Ordering::Equal,
        (Some(Value::Null), Some(_)) => Ordering::Greater,
        (Some(_), Some(Value::Null)) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = a.sort_cmp(b);
            match direction {
                OrderDirection::Ascending => ordering,
                OrderDirection::Descending => ordering.reverse(),
            }
        }
    }
}

/// Fresh row holding only the requested columns that exist on `row`
fn project(row: &Row, columns: &[String]) -> Row {
    let mut projected = Row::new();
    for column in columns {
        if let Some(value) = row.get(column) {
            projected.set(column.clone(), value.clone());
        }
    }
    projected
}
