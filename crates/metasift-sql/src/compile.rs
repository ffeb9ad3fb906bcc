use crate::schema::Table;
use metasift_core::{
    compile::Compiled,
    filter::{Compare, CompareOp, Filter, Membership, SetOp},
    value::Scalar,
};
use thiserror::Error as ThisError;

///
/// SqlError
///
/// Defects surfaced while lowering a filter to SQL. Schema misses are a
/// caller configuration problem; non-finite floats have no SQL literal.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum SqlError {
    #[error("column \"{column}\" is not declared by table \"{table}\"")]
    UnknownColumn { table: String, column: String },

    #[error("cannot render non-finite float {value} for key \"{key}\"")]
    NonFiniteFloat { key: String, value: f64 },
}

/// Double-quote `name` as a SQL identifier, doubling embedded quotes.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

///
/// SqlCompiler
///
/// Lowers a filter tree into one parenthesized boolean SQL expression.
/// Column rendering stays a caller concern: the mapper receives the key
/// and a representative operand and answers with the column expression,
/// which lets callers address plain columns and JSON-path extractions
/// alike. `Ne` and `NotIn` OR in an `IS NULL` arm so NULL-valued rows
/// match them, mirroring how local evaluation treats absent keys; a bare
/// `Not` wrap carries no such rewrite and keeps SQL's own NULL semantics.
///

pub struct SqlCompiler<M> {
    mapper: M,
    table: Option<Table>,
}

impl<M> SqlCompiler<M>
where
    M: Fn(&str, &Scalar) -> String,
{
    pub fn new(mapper: M) -> Self {
        Self {
            mapper,
            table: None,
        }
    }

    /// Check every key against `table` before rendering.
    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    /// Compile to a fragment, or to a sentinel when simplification proves
    /// the filter vacuous.
    pub fn compile(&self, filter: &Filter) -> Result<Compiled<String>, SqlError> {
        match filter {
            Filter::Compare(compare) => self.compile_compare(compare),
            Filter::Membership(membership) => self.compile_membership(membership),
            Filter::And(lhs, rhs) => self.compile(lhs)?.and_with(
                || self.compile(rhs),
                |left, right| format!("({left}) AND ({right})"),
            ),
            Filter::Or(lhs, rhs) => self.compile(lhs)?.or_with(
                || self.compile(rhs),
                |left, right| format!("({left}) OR ({right})"),
            ),
            Filter::Not(inner) => Ok(self
                .compile(inner)?
                .negate(|clause| format!("NOT ({clause})"))),
        }
    }

    /// Compile to a string that is always a valid predicate, rendering the
    /// sentinels as `1=1` / `1=0`.
    pub fn to_where_clause(&self, filter: &Filter) -> Result<String, SqlError> {
        Ok(self
            .compile(filter)?
            .into_clause(|| "1=1".to_string(), || "1=0".to_string()))
    }

    // ------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------

    fn compile_compare(&self, compare: &Compare) -> Result<Compiled<String>, SqlError> {
        let column = self.column_expr(&compare.key, &compare.value)?;
        let key = compare.key.as_str();

        let fragment = match compare.op {
            CompareOp::Eq => format!("{column} = {}", render_scalar(key, &compare.value)?),
            CompareOp::Ne => format!(
                "({column} <> {} OR {column} IS NULL)",
                render_scalar(key, &compare.value)?
            ),
            CompareOp::Gt => format!("{column} > {}", render_scalar(key, &compare.value)?),
            CompareOp::Gte => format!("{column} >= {}", render_scalar(key, &compare.value)?),
            CompareOp::Lt => format!("{column} < {}", render_scalar(key, &compare.value)?),
            CompareOp::Lte => format!("{column} <= {}", render_scalar(key, &compare.value)?),
            CompareOp::Contains => {
                format!("{column} LIKE {}", like_pattern(key, &compare.value)?)
            }
        };

        Ok(Compiled::Clause(fragment))
    }

    fn compile_membership(&self, membership: &Membership) -> Result<Compiled<String>, SqlError> {
        // Degenerate sets fold to sentinels; `IN ()` is not valid SQL.
        let Some(example) = membership.values.first() else {
            return Ok(match membership.op {
                SetOp::In => Compiled::NoRows,
                SetOp::NotIn => Compiled::AllRows,
            });
        };

        let column = self.column_expr(&membership.key, example)?;

        let mut members = Vec::with_capacity(membership.values.len());
        for value in &membership.values {
            members.push(render_scalar(&membership.key, value)?);
        }
        let list = members.join(", ");

        let fragment = match membership.op {
            SetOp::In => format!("{column} IN ({list})"),
            SetOp::NotIn => format!("({column} NOT IN ({list}) OR {column} IS NULL)"),
        };

        Ok(Compiled::Clause(fragment))
    }

    fn column_expr(&self, key: &str, example: &Scalar) -> Result<String, SqlError> {
        if let Some(table) = &self.table {
            if table.column(key).is_none() {
                return Err(SqlError::UnknownColumn {
                    table: table.name().to_string(),
                    column: key.to_string(),
                });
            }
        }

        Ok((self.mapper)(key, example))
    }
}

// ----------------------------------------------------------------------
// Literal rendering
// ----------------------------------------------------------------------

fn render_scalar(key: &str, value: &Scalar) -> Result<String, SqlError> {
    let rendered = match value {
        Scalar::Text(text) => quote_text(text),
        _ => raw_text(key, value)?,
    };

    Ok(rendered)
}

// Unquoted rendering, shared by bare literals and LIKE patterns.
fn raw_text(key: &str, value: &Scalar) -> Result<String, SqlError> {
    let text = match value {
        Scalar::Text(text) => text.clone(),
        Scalar::Bool(flag) => flag.to_string(),
        Scalar::Int32(v) => v.to_string(),
        Scalar::Int64(v) => v.to_string(),
        Scalar::Float32(v) => finite(key, f64::from(*v))?.to_string(),
        Scalar::Float64(v) => finite(key, *v)?.to_string(),
    };

    Ok(text)
}

fn like_pattern(key: &str, value: &Scalar) -> Result<String, SqlError> {
    let needle = raw_text(key, value)?;

    Ok(format!("'%{}%'", needle.replace('\'', "''")))
}

fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn finite(key: &str, value: f64) -> Result<f64, SqlError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SqlError::NonFiniteFloat {
            key: key.to_string(),
            value,
        })
    }
}

///
/// TESTS
///
