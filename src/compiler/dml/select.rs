//! SELECT SQL generation.

use crate::ast::{
    AggregateClause, Column, Combine, Component, Condition, FromClause, Join, OrderBy, Query, Value,
};
use crate::compiler::Compiler;
use crate::compiler::context::{Fragment, SqlContext};
use crate::error::{ComposeError, ComposeResult};

impl Compiler {
    /// Render every select component in fixed order, drop the absent ones
    /// and join the rest with a space.
    pub fn base_select(&self, query: &Query, parents: &[&Query]) -> ComposeResult<Fragment> {
        let mut ctx = SqlContext::new(query, parents);
        let generator = self.generator();

        let parts = [
            Some(generator.compile_columns(self, &mut ctx)?),
            Some(self.compile_from(&mut ctx)?),
            self.compile_joins(&mut ctx)?,
            self.compile_wheres(&mut ctx)?,
            self.compile_groups(&mut ctx)?,
            self.compile_having(&mut ctx)?,
            self.compile_orders(&mut ctx)?,
            generator.compile_limit(self, &mut ctx)?,
            self.compile_union(&mut ctx)?,
        ];

        let sql = parts
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(ctx.into_fragment(sql))
    }

    /// `SELECT [DISTINCT] cols`, or the aggregate call for aggregate
    /// statements.
    pub fn base_columns(&self, ctx: &mut SqlContext<'_>) -> ComposeResult<String> {
        let query = ctx.query;
        let engine = Some(self.engine());

        if let Some(aggregate) =
            query.get_one_component::<AggregateClause>(Component::Aggregate, engine)?
        {
            if aggregate.columns.len() != 1 {
                return Ok("SELECT 1".to_string());
            }
            let mut column = self.wrap(&aggregate.columns[0]);
            if query.distinct {
                column = format!("DISTINCT {}", column);
            }
            return Ok(format!(
                "SELECT {}({}) {}{}",
                aggregate.function.to_uppercase(),
                column,
                self.dialect().column_as,
                self.wrap_value(&aggregate.function)
            ));
        }

        let columns = query
            .get_components::<Column>(Component::Select, engine)?
            .into_iter()
            .map(|column| self.compile_column(ctx, column))
            .collect::<ComposeResult<Vec<_>>>()?;

        let distinct = if query.distinct { "DISTINCT " } else { "" };
        let select = if columns.is_empty() {
            "*".to_string()
        } else {
            columns.join(", ")
        };
        Ok(format!("SELECT {}{}", distinct, select))
    }

    pub fn compile_column(&self, ctx: &mut SqlContext<'_>, column: &Column) -> ComposeResult<String> {
        match column {
            Column::Named(name) => Ok(self.wrap(name)),
            Column::Raw {
                expression,
                bindings,
            } => {
                ctx.bindings.extend(bindings.iter().cloned());
                Ok(self.wrap_identifiers(expression))
            }
            Column::Query { query, alias } => {
                let alias = alias
                    .as_deref()
                    .or(query.alias.as_deref())
                    .filter(|a| !a.trim().is_empty())
                    .map(|a| format!(" {}{}", self.dialect().column_as, self.wrap_value(a)))
                    .unwrap_or_default();
                let sub = self.compile_select(query, &ctx.scopes())?;
                ctx.bindings.extend(sub.bindings);
                Ok(format!("({}){}", sub.sql, alias))
            }
        }
    }

    pub fn compile_from(&self, ctx: &mut SqlContext<'_>) -> ComposeResult<String> {
        let query = ctx.query;
        let from = query
            .get_one_component::<FromClause>(Component::From, Some(self.engine()))?
            .ok_or(ComposeError::MissingTable { operation: "select" })?;
        Ok(format!("FROM {}", self.compile_table_expression(ctx, from)?))
    }

    pub fn compile_table_expression(
        &self,
        ctx: &mut SqlContext<'_>,
        from: &FromClause,
    ) -> ComposeResult<String> {
        match from {
            FromClause::Table { table } => Ok(self.wrap(table)),
            FromClause::Raw {
                expression,
                bindings,
                ..
            } => {
                ctx.bindings.extend(bindings.iter().cloned());
                Ok(self.wrap_identifiers(expression))
            }
            FromClause::Query { query, .. } => {
                let alias = from
                    .alias()
                    .filter(|a| !a.is_empty())
                    .map(|a| format!(" {}{}", self.dialect().table_as, self.wrap_value(a)))
                    .unwrap_or_default();
                let sub = self.compile_select(query, &ctx.scopes())?;
                ctx.bindings.extend(sub.bindings);
                Ok(format!("({}){}", sub.sql, alias))
            }
        }
    }

    /// Each join on its own line.
    pub fn compile_joins<'a>(&self, ctx: &mut SqlContext<'a>) -> ComposeResult<Option<String>> {
        let query = ctx.query;
        let joins = query.get_components::<Join>(Component::Join, Some(self.engine()))?;
        if joins.is_empty() {
            return Ok(None);
        }

        let compiled = joins
            .into_iter()
            .map(|join| self.compile_join(ctx, join))
            .collect::<ComposeResult<Vec<_>>>()?;
        Ok(Some(format!("\n{}", compiled.join("\n"))))
    }

    pub fn compile_join<'a>(&self, ctx: &mut SqlContext<'a>, join: &'a Join) -> ComposeResult<String> {
        let engine = Some(self.engine());
        let target: &'a Query = &join.query;
        let from = target
            .get_one_component::<FromClause>(Component::From, engine)?
            .ok_or(ComposeError::MissingTable { operation: "join" })?;
        let conditions = target.get_components::<Condition>(Component::Where, engine)?;

        let table = self.compile_table_expression(ctx, from)?;
        let constraints = self.compile_conditions(ctx, &conditions)?;
        let on = if constraints.is_empty() {
            String::new()
        } else {
            format!(" ON {}", constraints)
        };
        Ok(format!("{} {}{}", join.kind, table, on))
    }

    /// `WHERE ...`, or `None` when there is nothing to filter.
    pub fn compile_wheres<'a>(&self, ctx: &mut SqlContext<'a>) -> ComposeResult<Option<String>> {
        let query = ctx.query;
        let engine = Some(self.engine());
        if !query.has_component(Component::From, engine) || !query.has_component(Component::Where, engine) {
            return Ok(None);
        }

        let conditions = query.get_components::<Condition>(Component::Where, engine)?;
        let sql = self.compile_conditions(ctx, &conditions)?;
        let sql = sql.trim();
        Ok((!sql.is_empty()).then(|| format!("WHERE {}", sql)))
    }

    pub fn compile_groups(&self, ctx: &mut SqlContext<'_>) -> ComposeResult<Option<String>> {
        let query = ctx.query;
        let columns = query.get_components::<Column>(Component::Group, Some(self.engine()))?;
        if columns.is_empty() {
            return Ok(None);
        }
        let compiled = columns
            .into_iter()
            .map(|column| self.compile_column(ctx, column))
            .collect::<ComposeResult<Vec<_>>>()?;
        Ok(Some(format!("GROUP BY {}", compiled.join(", "))))
    }

    pub fn compile_having<'a>(&self, ctx: &mut SqlContext<'a>) -> ComposeResult<Option<String>> {
        let query = ctx.query;
        let conditions = query.get_components::<Condition>(Component::Having, Some(self.engine()))?;
        if conditions.is_empty() {
            return Ok(None);
        }
        let sql = self.compile_conditions(ctx, &conditions)?;
        Ok((!sql.is_empty()).then(|| format!("HAVING {}", sql)))
    }

    pub fn compile_orders(&self, ctx: &mut SqlContext<'_>) -> ComposeResult<Option<String>> {
        let query = ctx.query;
        let orders = query.get_components::<OrderBy>(Component::Order, Some(self.engine()))?;
        if orders.is_empty() {
            return Ok(None);
        }

        let columns: Vec<String> = orders
            .into_iter()
            .map(|order| match order {
                OrderBy::Column { column, ascending } => {
                    let direction = if *ascending { "" } else { " DESC" };
                    format!("{}{}", self.wrap(column), direction)
                }
                OrderBy::Raw {
                    expression,
                    bindings,
                } => {
                    ctx.bindings.extend(bindings.iter().cloned());
                    self.wrap_identifiers(expression)
                }
                OrderBy::Random { seed } => self.generator().compile_random(seed),
            })
            .collect();
        Ok(Some(format!("ORDER BY {}", columns.join(", "))))
    }

    /// `LIMIT ?`, `OFFSET ?` or `LIMIT ? OFFSET ?`; zero means unset.
    pub fn base_limit(&self, ctx: &mut SqlContext<'_>) -> ComposeResult<Option<String>> {
        let engine = Some(self.engine());
        let limit = ctx.query.get_limit(engine)?;
        let offset = ctx.query.get_offset(engine)?;

        let sql = match (limit, offset) {
            (0, 0) => None,
            (limit, 0) => {
                ctx.bindings.push(Value::UInt(limit));
                Some("LIMIT ?".to_string())
            }
            (0, offset) => {
                ctx.bindings.push(Value::UInt(offset));
                Some("OFFSET ?".to_string())
            }
            (limit, offset) => {
                ctx.bindings.push(Value::UInt(limit));
                ctx.bindings.push(Value::UInt(offset));
                Some("LIMIT ? OFFSET ?".to_string())
            }
        };
        Ok(sql)
    }

    /// UNION / EXCEPT / INTERSECT tails.
    pub fn compile_union(&self, ctx: &mut SqlContext<'_>) -> ComposeResult<Option<String>> {
        let query = ctx.query;
        let combines = query.get_components::<Combine>(Component::Combine, Some(self.engine()))?;
        if combines.is_empty() {
            return Ok(None);
        }

        let mut parts = Vec::with_capacity(combines.len());
        for combine in combines {
            match combine {
                Combine::Query {
                    operation,
                    all,
                    query,
                } => {
                    let sub = self.compile_select(query, &ctx.scopes())?;
                    ctx.bindings.extend(sub.bindings);
                    let all = if *all { "ALL " } else { "" };
                    parts.push(format!("{} {}{}", operation, all, sub.sql));
                }
                Combine::Raw {
                    expression,
                    bindings,
                } => {
                    ctx.bindings.extend(bindings.iter().cloned());
                    parts.push(self.wrap_identifiers(expression));
                }
            }
        }
        Ok(Some(parts.join(" ")))
    }
}
