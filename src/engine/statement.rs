use regex::{Regex, RegexBuilder};
use crate::engine::predicate::{ComparisonOp, Condition, Predicate};
use crate::utils::error::{DataStoreError, DataStoreResult};

/// Table name used when a statement names none
pub const DEFAULT_TABLE: &str = "default";

/// Coarse statement kind, decided by the leading keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    CreateTable,
    DropTable,
    Insert,
    Update,
    Delete,
    Select,
    Unrecognized,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

/// Single-column ORDER BY
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub table: String,
    /// `None` for `*`
    pub projection: Option<Vec<String>>,
    pub predicate: Option<Predicate>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

/// Parsed form of one SQL statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable {
        table: String,
        columns: Vec<String>,
        if_not_exists: bool,
    },
    DropTable {
        table: String,
    },
    Insert {
        table: String,
        /// Explicit `(col, ...)` list, if written
        columns: Option<Vec<String>>,
    },
    Update {
        table: String,
        assignments: Vec<String>,
        /// Leading parameters owned by SET; the rest go to WHERE
        set_param_count: usize,
        predicate: Option<Predicate>,
    },
    Delete {
        table: String,
        predicate: Option<Predicate>,
    },
    Select(SelectStatement),
    Unrecognized,
}

/// Column-definition tokens that start a table constraint, not a column
const CONSTRAINT_KEYWORDS: &[&str] = &["primary", "foreign", "unique", "constraint", "check"];

/// Regex-driven parser for the narrow statement shapes the engine executes
#[derive(Debug)]
pub struct StatementParser {
    leading_keyword: Regex,
    table_name: Regex,
    if_not_exists: Regex,
    insert_columns: Regex,
    projection: Regex,
    where_clause: Regex,
    order_by: Regex,
    limit: Regex,
    set_clause: Regex,
    and_separator: Regex,
    comparison: Regex,
    identifier: Regex,
}

fn compile(pattern: &str) -> DataStoreResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| DataStoreError::Internal(format!("Failed to compile statement regex: {}", e)))
}

impl StatementParser {
    /// Create a new parser instance
    pub fn new() -> DataStoreResult<Self> {
        Ok(Self {
            leading_keyword: compile(
                r"^(create\s+table|drop\s+table|insert|update|delete|select)\b",
            )?,
            table_name: compile(
                r#"\b(?:from|into|update|table)\s+["`]?([A-Za-z_][A-Za-z0-9_.]*)"#,
            )?,
            if_not_exists: compile(r"\btable\s+if\s+not\s+exists\s+")?,
            insert_columns: compile(r#"\binto\s+["`]?[A-Za-z_][A-Za-z0-9_.]*["`]?\s*\(([^)]*)\)"#)?,
            projection: compile(r"^select\s+(.*?)\s+from\s")?,
            where_clause: compile(r"\bwhere\s+(.*?)(?:\s+order\s+by\s|\s+limit\s|$)")?,
            order_by: compile(r"\border\s+by\s+([A-Za-z_][A-Za-z0-9_]*)(?:\s+(asc|desc))?")?,
            limit: compile(r"\blimit\s+(\d+)")?,
            set_clause: compile(r"\bset\s+(.*?)(?:\s+where\s|$)")?,
            and_separator: compile(r"\s+and\s+")?,
            comparison: compile(
                r#"^["`]?([A-Za-z_][A-Za-z0-9_]*)["`]?\s*(>=|<=|!=|<>|=|>|<)\s*\$(\d+)$"#,
            )?,
            identifier: compile(r#"^["`]?([A-Za-z_][A-Za-z0-9_]*)"#)?,
        })
    }

    /// Route statement text by its leading keyword
    pub fn classify(&self, sql: &str) -> StatementKind {
        let sql = normalize(sql);
        let Some(caps) = self.leading_keyword.captures(sql) else {
            return StatementKind::Unrecognized;
        };
        let keyword = caps[1].to_ascii_lowercase();
        match keyword.split_whitespace().next().unwrap_or_default() {
            "create" => StatementKind::CreateTable,
            "drop" => StatementKind::DropTable,
            "insert" => StatementKind::Insert,
            "update" => StatementKind::Update,
            "delete" => StatementKind::Delete,
            "select" => StatementKind::Select,
            _ => StatementKind::Unrecognized,
        }
    }

    /// First identifier after `from`, `into`, `update` or `table`, else [`DEFAULT_TABLE`]
    pub fn resolve_table(&self, sql: &str) -> String {
        let sql = normalize(sql);
        let sql = self.if_not_exists.replace(sql, "table ");
        self.table_name
            .captures(&sql)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| DEFAULT_TABLE.to_string())
    }

    /// Parse statement text into a [`Statement`]
    pub fn parse(&self, sql: &str) -> Statement {
        let kind = self.classify(sql);
        let text = normalize(sql);

        match kind {
            StatementKind::CreateTable => Statement::CreateTable {
                table: self.resolve_table(text),
                columns: self.column_definitions(text),
                if_not_exists: self.if_not_exists.is_match(text),
            },
            StatementKind::DropTable => Statement::DropTable { table: self.resolve_table(text) },
            StatementKind::Insert => Statement::Insert {
                table: self.resolve_table(text),
                columns: self
                    .insert_columns
                    .captures(text)
                    .map(|caps| {
                        split_list(&caps[1])
                            .filter_map(|c| self.leading_identifier(c))
                            .collect()
                    }),
            },
            StatementKind::Update => {
                let set_text = self
                    .set_clause
                    .captures(text)
                    .map(|caps| caps[1].to_string())
                    .unwrap_or_default();
                Statement::Update {
                    table: self.resolve_table(text),
                    assignments: set_text
                        .split(',')
                        .filter(|segment| segment.contains('='))
                        .filter_map(|segment| segment.split('=').next())
                        .filter_map(|column| self.leading_identifier(column))
                        .collect(),
                    set_param_count: set_text.matches('=').count(),
                    predicate: self.where_predicate(text),
                }
            }
            StatementKind::Delete => Statement::Delete {
                table: self.resolve_table(text),
                predicate: self.where_predicate(text),
            },
            StatementKind::Select => Statement::Select(self.parse_select(text)),
            StatementKind::Unrecognized => Statement::Unrecognized,
        }
    }

    fn parse_select(&self, text: &str) -> SelectStatement {
        let projection = self.projection.captures(text).and_then(|caps| {
            let list = caps[1].trim();
            if list == "*" {
                None
            } else {
                Some(
                    split_list(list)
                        .map(|c| c.trim_matches(|ch: char| ch == '"' || ch == '`').to_string())
                        .collect(),
                )
            }
        });

        let order_by = self.order_by.captures(text).map(|caps| OrderBy {
            column: caps[1].to_string(),
            direction: match caps.get(2) {
                Some(dir) if dir.as_str().eq_ignore_ascii_case("desc") => {
                    OrderDirection::Descending
                }
                _ => OrderDirection::Ascending,
            },
        });

        SelectStatement {
            table: self.resolve_table(text),
            projection,
            predicate: self.where_predicate(text),
            order_by,
            limit: self.limit.captures(text).and_then(|caps| caps[1].parse().ok()),
        }
    }

    /// Parse the text of a WHERE clause into an AND-chain
    pub fn parse_predicate(&self, clause: &str) -> Predicate {
        let mut slot = 0;
        let conditions = self
            .and_separator
            .split(clause.trim())
            .map(|segment| {
                let segment = segment.trim();
                let parsed = self.comparison.captures(segment).and_then(|caps| {
                    ComparisonOp::from_symbol(&caps[2]).map(|op| (caps[1].to_string(), op))
                });
                match parsed {
                    Some((column, op)) => {
                        let condition = Condition::Comparison { column, op, param_slot: slot };
                        slot += 1;
                        condition
                    }
                    None => Condition::Unmatched(segment.to_string()),
                }
            })
            .collect();

        Predicate::new(conditions)
    }

    fn where_predicate(&self, text: &str) -> Option<Predicate> {
        self.where_clause
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|clause| !clause.is_empty())
            .map(|clause| self.parse_predicate(&clause))
    }

    fn column_definitions(&self, text: &str) -> Vec<String> {
        let (Some(open), Some(close)) = (text.find('('), text.rfind(')')) else {
            return Vec::new();
        };
        if close <= open {
            return Vec::new();
        }

        split_list(&text[open + 1..close])
            .filter_map(|definition| self.leading_identifier(definition))
            .filter(|name| !CONSTRAINT_KEYWORDS.contains(&name.to_ascii_lowercase().as_str()))
            .collect()
    }

    fn leading_identifier(&self, text: &str) -> Option<String> {
        self.identifier.captures(text.trim()).map(|caps| caps[1].to_string())
    }
}

/// Trim whitespace and a trailing semicolon
fn normalize(sql: &str) -> &str {
    sql.trim().trim_end_matches(';').trim_end()
}

/// Split a comma-separated list at parenthesis depth zero
fn split_list(list: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in list.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts.into_iter().map(str::trim).filter(|part| !part.is_empty())
}
