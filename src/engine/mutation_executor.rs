use crate::engine::predicate::Predicate;
use crate::engine::statement::Statement;
use crate::engine::store::TableStore;
use crate::utils::config::IdStrategy;
use crate::utils::types::{ExecuteResult, Row, Value};

/// Apply a write statement to the store.
///
/// SELECT and unrecognized statements are soft no-ops here and report zero
/// affected rows.
pub fn execute_mutation(
    store: &mut TableStore,
    statement: &Statement,
    params: &[Value],
    id_strategy: IdStrategy,
) -> ExecuteResult {
    match statement {
        Statement::CreateTable { table, columns, if_not_exists } => {
            if !(*if_not_exists && store.contains_table(table)) {
                store.create_table(table, columns.clone());
            }
            ExecuteResult::none()
        }
        Statement::DropTable { table } => {
            ExecuteResult::affected(store.drop_table(table).unwrap_or(0) as u64)
        }
        Statement::Insert { table, columns } => {
            insert(store, table, columns.as_deref(), params, id_strategy)
        }
        Statement::Update { table, assignments, set_param_count, predicate } => {
            update(store, table, assignments, *set_param_count, predicate.as_ref(), params)
        }
        Statement::Delete { table, predicate } => delete(store, table, predicate.as_ref(), params),
        Statement::Select(_) | Statement::Unrecognized => ExecuteResult::none(),
    }
}

fn insert(
    store: &mut TableStore,
    table: &str,
    columns: Option<&[String]>,
    params: &[Value],
    id_strategy: IdStrategy,
) -> ExecuteResult {
    let columns: Vec<String> = match columns {
        Some(explicit) => explicit.to_vec(),
        None => store.schema(table).map(<[String]>::to_vec).unwrap_or_default(),
    };

    let id = store.next_id(table, id_strategy);
    let mut row = Row::new();
    row.set("id", Value::Integer(id as i64));
    for (column, value) in columns.into_iter().zip(params.iter()) {
        row.set(column, value.clone());
    }

    store.append(table, row);
    ExecuteResult::inserted(id)
}

fn update(
    store: &mut TableStore,
    table: &str,
    assignments: &[String],
    set_param_count: usize,
    predicate: Option<&Predicate>,
    params: &[Value],
) -> ExecuteResult {
    let Some(rows) = store.rows_mut(table) else {
        return ExecuteResult::none();
    };

    let split = set_param_count.min(params.len());
    let (set_params, where_params) = params.split_at(split);

    let mut matched = 0u64;
    for row in rows.iter_mut() {
        if !predicate.map_or(true, |p| p.evaluate(row, where_params)) {
            continue;
        }
        for (column, value) in assignments.iter().zip(set_params.iter()) {
            row.set(column.clone(), value.clone());
        }
        matched += 1;
    }

    ExecuteResult::affected(matched)
}

fn delete(
    store: &mut TableStore,
    table: &str,
    predicate: Option<&Predicate>,
    params: &[Value],
) -> ExecuteResult {
    if !store.contains_table(table) {
        return ExecuteResult::none();
    }

    let rows = store.rows(table);
    let survivors: Vec<Row> = rows
        .iter()
        .filter(|row| !predicate.map_or(true, |p| p.evaluate(row, params)))
        .cloned()
        .collect();
    let removed = rows.len() - survivors.len();

    store.replace_rows(table, survivors);
    ExecuteResult::affected(removed as u64)
}
