//! Compiles filters into parameterized Postgres statements.
//!
//! Each present filter field becomes one [`Predicate`]. Predicates are
//! written in a fixed field order by [`SqlWriter`], which owns placeholder
//! numbering: the n-th bound value is always `$n`. Column names and sort
//! direction come from closed enums, never from request text.

use std::fmt::Write as _;

use models::period::StartPeriod;
use sea_orm::{DbBackend, Statement, Value};
use uuid::Uuid;

use super::filter::{ListFilter, SortDir, SortKey, SumFilter};

pub const TABLE: &str = "service_list";

/// Columns of `service_list` that queries may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Price,
    Owner,
    CreatedAt,
}

impl Field {
    pub fn column_name(&self) -> &'static str {
        match self {
            Field::Id => "service_id",
            Field::Name => "service_name",
            Field::Price => "service_price",
            Field::Owner => "service_uuid",
            Field::CreatedAt => "service_created_at",
        }
    }
}

impl From<SortKey> for Field {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::CreatedAt => Field::CreatedAt,
            SortKey::Price => Field::Price,
            SortKey::Name => Field::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Case-insensitive pattern match
    ILike,
    Eq,
    Gte,
    Lte,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::ILike => "ILIKE",
            Operator::Eq => "=",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }
}

/// One `column <op> $n` condition and the value bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: Field,
    pub operator: Operator,
    pub value: Value,
}

impl Predicate {
    /// Substring match; LIKE wildcards in `needle` are matched literally.
    pub fn contains(field: Field, needle: &str) -> Self {
        Self { field, operator: Operator::ILike, value: Value::from(like_contains(needle)) }
    }

    pub fn eq(field: Field, value: impl Into<Value>) -> Self {
        Self { field, operator: Operator::Eq, value: value.into() }
    }

    pub fn at_or_after(field: Field, start: &StartPeriod) -> Self {
        Self { field, operator: Operator::Gte, value: Value::from(start.first_instant()) }
    }

    pub fn at_or_before(field: Field, end: &StartPeriod) -> Self {
        Self { field, operator: Operator::Lte, value: Value::from(end.first_instant()) }
    }
}

/// Escape `\`, `%` and `_`, then wrap in `%...%`. Backslash is the default
/// LIKE escape character in Postgres.
pub fn like_contains(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// Shared clause order: name, price, owner, from, to.
fn common_predicates(
    name: Option<&str>,
    price: Option<i32>,
    owner: Option<Uuid>,
    from: Option<&StartPeriod>,
    to: Option<&StartPeriod>,
) -> Vec<Predicate> {
    let mut out = Vec::new();
    if let Some(name) = name {
        out.push(Predicate::contains(Field::Name, name));
    }
    if let Some(price) = price {
        out.push(Predicate::eq(Field::Price, price));
    }
    if let Some(owner) = owner {
        out.push(Predicate::eq(Field::Owner, owner));
    }
    if let Some(from) = from {
        out.push(Predicate::at_or_after(Field::CreatedAt, from));
    }
    if let Some(to) = to {
        out.push(Predicate::at_or_before(Field::CreatedAt, to));
    }
    out
}

pub fn list_predicates(f: &ListFilter) -> Vec<Predicate> {
    // price <= 0 never reaches the filter, see filter::parse_price
    let price = f.price.filter(|p| *p > 0);
    common_predicates(f.name.as_deref(), price, f.owner, f.from.as_ref(), f.to.as_ref())
}

pub fn sum_predicates(f: &SumFilter) -> Vec<Predicate> {
    common_predicates(f.name.as_deref(), None, f.owner, f.from.as_ref(), f.to.as_ref())
}

/// SQL text plus the values bound to `$1..$n`, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub values: Vec<Value>,
}

impl CompiledQuery {
    pub fn into_statement(self) -> Statement {
        Statement::from_sql_and_values(DbBackend::Postgres, self.sql, self.values)
    }
}

/// Accumulates SQL text and bound values, numbering placeholders as it goes.
#[derive(Debug, Default)]
pub struct SqlWriter {
    sql: String,
    values: Vec<Value>,
}

impl SqlWriter {
    pub fn new() -> Self { Self::default() }

    pub fn append_syntax(&mut self, syntax: &str) {
        self.sql.push_str(syntax);
    }

    pub fn append_column(&mut self, field: Field) {
        self.sql.push_str(field.column_name());
    }

    /// Bind `value` and write its `$n` placeholder.
    pub fn append_param(&mut self, value: Value) {
        self.values.push(value);
        let _ = write!(self.sql, "${}", self.values.len());
    }

    pub fn append_predicate(&mut self, p: &Predicate) {
        self.append_column(p.field);
        self.append_syntax(" ");
        self.append_syntax(p.operator.as_sql());
        self.append_syntax(" ");
        self.append_param(p.value.clone());
    }

    /// ` WHERE a AND b ...`, or nothing when there are no predicates.
    pub fn append_where(&mut self, predicates: &[Predicate]) {
        for (i, p) in predicates.iter().enumerate() {
            self.append_syntax(if i == 0 { " WHERE " } else { " AND " });
            self.append_predicate(p);
        }
    }

    pub fn finish(self) -> CompiledQuery {
        CompiledQuery { sql: self.sql, values: self.values }
    }
}

const SELECT_COLUMNS: [Field; 5] =
    [Field::Id, Field::Name, Field::Price, Field::Owner, Field::CreatedAt];

/// `SELECT ... WHERE ... ORDER BY ... LIMIT $n` for listing rows.
pub fn compile_list(f: &ListFilter) -> CompiledQuery {
    let mut w = SqlWriter::new();
    w.append_syntax("SELECT ");
    for (i, field) in SELECT_COLUMNS.iter().enumerate() {
        if i > 0 {
            w.append_syntax(", ");
        }
        w.append_column(*field);
    }
    w.append_syntax(" FROM ");
    w.append_syntax(TABLE);
    w.append_where(&list_predicates(f));
    append_order_by(&mut w, f.sort, f.dir);
    w.append_syntax(" LIMIT ");
    w.append_param(Value::from(f.limit.get()));
    w.finish()
}

/// Sort column first, then id in the same direction so pages are stable.
fn append_order_by(w: &mut SqlWriter, key: SortKey, dir: SortDir) {
    w.append_syntax(" ORDER BY ");
    w.append_column(Field::from(key));
    w.append_syntax(" ");
    w.append_syntax(dir.as_sql());
    w.append_syntax(", ");
    w.append_column(Field::Id);
    w.append_syntax(" ");
    w.append_syntax(dir.as_sql());
}

/// `SELECT COALESCE(SUM(price), 0) AS total ...`; zero when nothing matches.
pub fn compile_sum(f: &SumFilter) -> CompiledQuery {
    let mut w = SqlWriter::new();
    w.append_syntax("SELECT COALESCE(SUM(");
    w.append_column(Field::Price);
    w.append_syntax("), 0) AS total FROM ");
    w.append_syntax(TABLE);
    w.append_where(&sum_predicates(f));
    w.finish()
}
