//! WHERE / HAVING / ON condition rendering.

use super::Compiler;
use super::context::SqlContext;
use crate::ast::{Component, Condition, ConditionKind, Query, Value};
use crate::error::{ComposeError, ComposeResult};

/// Date-part comparison handed to the dialect hook. The operator is already
/// checked against the whitelist.
#[derive(Debug, Clone, Copy)]
pub struct DateCondition<'a> {
    pub part: &'a str,
    pub column: &'a str,
    pub operator: &'a str,
    pub value: &'a Value,
    pub is_not: bool,
}

impl DateCondition<'_> {
    pub fn negate(&self, sql: String) -> String {
        negate(self.is_not, sql)
    }
}

fn negate(is_not: bool, sql: String) -> String {
    if is_not {
        format!("NOT ({})", sql)
    } else {
        sql
    }
}

impl Compiler {
    /// Flat AND/OR chain. Conditions rendering to nothing are skipped and
    /// the first rendered one carries no connector.
    pub fn compile_conditions<'a>(
        &self,
        ctx: &mut SqlContext<'a>,
        conditions: &[&'a Condition],
    ) -> ComposeResult<String> {
        let mut parts: Vec<String> = Vec::with_capacity(conditions.len());
        for condition in conditions {
            let compiled = self.compile_condition(ctx, condition)?;
            if compiled.is_empty() {
                continue;
            }
            let connector = match (parts.is_empty(), condition.is_or) {
                (true, _) => "",
                (false, true) => "OR ",
                (false, false) => "AND ",
            };
            parts.push(format!("{}{}", connector, compiled));
        }
        Ok(parts.join(" "))
    }

    pub fn compile_condition<'a>(
        &self,
        ctx: &mut SqlContext<'a>,
        condition: &'a Condition,
    ) -> ComposeResult<String> {
        let is_not = condition.is_not;
        match &condition.kind {
            ConditionKind::Basic {
                column,
                operator,
                value,
            } => {
                let op = self.check_operator(operator)?;
                let sql = format!("{} {} {}", self.wrap(column), op, self.parameter(ctx, value)?);
                Ok(negate(is_not, sql))
            }

            ConditionKind::Like {
                column,
                operator,
                value,
                case_sensitive,
                escape,
            } => self.compile_like(ctx, column, operator, value, *case_sensitive, *escape, is_not),

            ConditionKind::Date {
                part,
                column,
                operator,
                value,
            } => {
                let op = self.check_operator(operator)?;
                let date = DateCondition {
                    part,
                    column,
                    operator: &op,
                    value,
                    is_not,
                };
                self.generator().compile_date_condition(self, ctx, &date)
            }

            ConditionKind::Columns {
                first,
                operator,
                second,
            } => {
                let op = self.check_operator(operator)?;
                Ok(negate(is_not, format!("{} {} {}", self.wrap(first), op, self.wrap(second))))
            }

            ConditionKind::Null { column } => {
                let op = if is_not { "IS NOT NULL" } else { "IS NULL" };
                Ok(format!("{} {}", self.wrap(column), op))
            }

            ConditionKind::Boolean { column, value } => {
                let literal = if *value {
                    self.generator().compile_true()
                } else {
                    self.generator().compile_false()
                };
                let op = if is_not { "!=" } else { "=" };
                Ok(format!("{} {} {}", self.wrap(column), op, literal))
            }

            ConditionKind::In { column, values } => {
                if values.is_empty() {
                    return Ok(if is_not {
                        "1 = 1 /* NOT IN [empty list] */".to_string()
                    } else {
                        "1 = 0 /* IN [empty list] */".to_string()
                    });
                }
                let op = if is_not { "NOT IN" } else { "IN" };
                let markers = self.parameterize(ctx, values)?;
                Ok(format!("{} {} ({})", self.wrap(column), op, markers))
            }

            ConditionKind::InQuery { column, query } => {
                let op = if is_not { "NOT IN" } else { "IN" };
                let sub = self.compile_nested(ctx, query)?;
                Ok(format!("{} {} ({})", self.wrap(column), op, sub))
            }

            ConditionKind::Between {
                column,
                lower,
                higher,
            } => {
                let op = if is_not { "NOT BETWEEN" } else { "BETWEEN" };
                let lower = self.parameter(ctx, lower)?;
                let higher = self.parameter(ctx, higher)?;
                Ok(format!("{} {} {} AND {}", self.wrap(column), op, lower, higher))
            }

            ConditionKind::Exists { query } => {
                let op = if is_not { "NOT EXISTS" } else { "EXISTS" };
                let sub = self.compile_nested(ctx, query)?;
                Ok(format!("{} ({})", op, sub))
            }

            ConditionKind::ColumnQuery {
                column,
                operator,
                query,
            } => {
                let op = self.check_operator(operator)?;
                let sub = self.compile_nested(ctx, query)?;
                Ok(negate(is_not, format!("{} {} ({})", self.wrap(column), op, sub)))
            }

            ConditionKind::SubQuery {
                query,
                operator,
                value,
            } => {
                let op = self.check_operator(operator)?;
                let sub = self.compile_nested(ctx, query)?;
                let marker = self.parameter(ctx, value)?;
                Ok(negate(is_not, format!("({}) {} {}", sub, op, marker)))
            }

            ConditionKind::Nested { query } => {
                let engine = Some(self.engine());
                let query: &'a Query = query;
                let conditions = query.get_components::<Condition>(Component::Where, engine)?;
                if conditions.is_empty() {
                    return Ok(String::new());
                }
                let sql = self.compile_conditions(ctx, &conditions)?;
                if sql.is_empty() {
                    return Ok(sql);
                }
                Ok(if is_not {
                    format!("NOT ({})", sql)
                } else {
                    format!("({})", sql)
                })
            }

            ConditionKind::Raw {
                expression,
                bindings,
            } => {
                ctx.bindings.extend(bindings.iter().cloned());
                Ok(negate(is_not, self.wrap_identifiers(expression)))
            }
        }
    }

    /// Subquery SQL with its bindings appended to `ctx`.
    fn compile_nested(&self, ctx: &mut SqlContext<'_>, query: &Query) -> ComposeResult<String> {
        let sub = self.compile_select(query, &ctx.scopes())?;
        ctx.bindings.extend(sub.bindings);
        Ok(sub.sql)
    }

    #[allow(clippy::too_many_arguments)]
    fn compile_like(
        &self,
        ctx: &mut SqlContext<'_>,
        column: &str,
        operator: &str,
        value: &Value,
        case_sensitive: bool,
        escape: Option<char>,
        is_not: bool,
    ) -> ComposeResult<String> {
        let mut column = self.wrap(column);
        let resolved = self.resolve(ctx, value)?;
        let mut text = match &resolved {
            Value::String(s) | Value::Raw(s) => s.clone(),
            other => {
                return Err(ComposeError::InvalidValue(format!(
                    "expected a string for a LIKE comparison, got {}",
                    other
                )));
            }
        };

        let method = match operator {
            "starts" => {
                text = format!("{}%", text);
                "like"
            }
            "ends" => {
                text = format!("%{}", text);
                "like"
            }
            "contains" => {
                text = format!("%{}%", text);
                "like"
            }
            "like" => "like",
            other => other,
        };
        let op = self.check_operator(method)?;

        if !case_sensitive {
            column = format!("LOWER({})", column);
            text = text.to_lowercase();
        }

        let right = if matches!(value, Value::Raw(_)) {
            tracing::warn!(literal = %text, "inlining unsafe literal");
            text
        } else {
            self.parameter(ctx, &Value::String(text))?
        };

        let mut sql = format!("{} {} {}", column, op, right);
        if let Some(escape) = escape {
            sql = format!("{} ESCAPE '{}'", sql, escape);
        }
        Ok(negate(is_not, sql))
    }

    /// `PART(column) op ?`
    pub fn base_date_condition(
        &self,
        ctx: &mut SqlContext<'_>,
        condition: &DateCondition<'_>,
    ) -> ComposeResult<String> {
        let column = self.wrap(condition.column);
        let value = self.parameter(ctx, condition.value)?;
        Ok(condition.negate(format!(
            "{}({}) {} {}",
            condition.part.to_uppercase(),
            column,
            condition.operator,
            value
        )))
    }
}
