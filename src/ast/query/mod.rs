use crate::ast::{
    Clause, ClauseKind, ClauseVariant, Component, Engine, LimitClause, Method, OffsetClause, Value,
};
use crate::error::{ComposeError, ComposeResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An engine-agnostic, mutable description of one SQL statement.
///
/// Clauses live in named component buckets and keep their insertion order,
/// which is also their rendering order. `Clone` is a deep copy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub method: Method,
    /// Alias used when this statement is embedded as a subquery or CTE.
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    clauses: Vec<Clause>,
    #[serde(default)]
    variables: IndexMap<String, Value>,
    #[serde(skip)]
    engine_scope: Option<Engine>,
    #[serde(skip)]
    pending_or: bool,
    #[serde(skip)]
    pending_not: bool,
}

mod clauses;
mod conditions;
mod constructors;
mod cte;

impl Query {
    /// Every clause in insertion order, across all buckets.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Append a clause to a bucket, tagged with the active engine scope.
    pub fn add_component(mut self, component: Component, kind: ClauseKind) -> Self {
        self.push_component(component, kind);
        self
    }

    pub(crate) fn push_component(&mut self, component: Component, kind: ClauseKind) {
        self.clauses.push(Clause {
            component,
            engine: self.engine_scope,
            kind,
        });
    }

    /// Replace the clause of the same bucket and engine scope, or append one.
    pub fn add_or_replace_component(mut self, component: Component, kind: ClauseKind) -> Self {
        let engine = self.engine_scope;
        match self
            .clauses
            .iter_mut()
            .find(|c| c.component == component && c.engine == engine)
        {
            Some(existing) => existing.kind = kind,
            None => self.push_component(component, kind),
        }
        self
    }

    fn visible(clause: &Clause, component: Component, engine: Option<Engine>) -> bool {
        clause.component == component
            && (clause.engine.is_none() || engine.is_none() || clause.engine == engine)
    }

    /// Clauses of a bucket applicable to `engine`, in insertion order.
    ///
    /// Fails when the bucket holds a clause of another family.
    pub fn get_components<T: ClauseVariant>(
        &self,
        component: Component,
        engine: Option<Engine>,
    ) -> ComposeResult<Vec<&T>> {
        self.clauses
            .iter()
            .filter(|c| Self::visible(c, component, engine))
            .map(|c| {
                T::from_kind(&c.kind)
                    .ok_or_else(|| ComposeError::invalid_clause(component.name(), c.kind.type_name()))
            })
            .collect()
    }

    /// The most engine-specific clause of a bucket.
    pub fn get_one_component<T: ClauseVariant>(
        &self,
        component: Component,
        engine: Option<Engine>,
    ) -> ComposeResult<Option<&T>> {
        let candidates: Vec<&Clause> = self
            .clauses
            .iter()
            .filter(|c| Self::visible(c, component, engine))
            .collect();

        let chosen = candidates
            .iter()
            .find(|c| engine.is_some() && c.engine == engine)
            .or_else(|| candidates.iter().find(|c| c.engine.is_none()))
            .or_else(|| candidates.first());

        match chosen {
            Some(clause) => T::from_kind(&clause.kind)
                .map(Some)
                .ok_or_else(|| ComposeError::invalid_clause(component.name(), clause.kind.type_name())),
            None => Ok(None),
        }
    }

    pub fn has_component(&self, component: Component, engine: Option<Engine>) -> bool {
        self.clauses
            .iter()
            .any(|c| Self::visible(c, component, engine))
    }

    /// Empty a bucket. Without an explicit engine the active scope is used;
    /// with neither, every clause of the bucket is removed.
    pub fn clear_component(mut self, component: Component, engine: Option<Engine>) -> Self {
        self.remove_component(component, engine);
        self
    }

    pub(crate) fn remove_component(&mut self, component: Component, engine: Option<Engine>) {
        let engine = engine.or(self.engine_scope);
        self.clauses
            .retain(|c| !Self::visible(c, component, engine));
    }

    /// Limit for `engine`; zero means unset.
    pub fn get_limit(&self, engine: Option<Engine>) -> ComposeResult<u64> {
        Ok(self
            .get_one_component::<LimitClause>(Component::Limit, engine)?
            .map_or(0, |l| l.0))
    }

    /// Offset for `engine`; zero means unset.
    pub fn get_offset(&self, engine: Option<Engine>) -> ComposeResult<u64> {
        Ok(self
            .get_one_component::<OffsetClause>(Component::Offset, engine)?
            .map_or(0, |o| o.0))
    }

    pub fn has_limit(&self, engine: Option<Engine>) -> ComposeResult<bool> {
        Ok(self.get_limit(engine)? > 0)
    }

    pub fn has_offset(&self, engine: Option<Engine>) -> ComposeResult<bool> {
        Ok(self.get_offset(engine)? > 0)
    }

    /// Define a variable for `Value::Variable` references in this statement
    /// and the statements nested in it.
    pub fn define(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn find_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Build clauses that only apply when compiling for `engine`.
    pub fn for_engine(mut self, engine: Engine, f: impl FnOnce(Query) -> Query) -> Self {
        let previous = self.engine_scope.replace(engine);
        self = f(self);
        self.engine_scope = previous;
        self
    }

    /// Join the next condition with OR instead of AND.
    pub fn or(mut self) -> Self {
        self.pending_or = true;
        self
    }

    /// Negate the next condition. Calling it twice cancels out.
    pub fn not(mut self) -> Self {
        self.pending_not = !self.pending_not;
        self
    }

    pub(crate) fn take_flags(&mut self) -> (bool, bool) {
        let flags = (self.pending_or, self.pending_not);
        self.pending_or = false;
        self.pending_not = false;
        flags
    }
}
