//! One compiler per engine, keyed by engine code.

use super::{CompileResult, Compiler};
use crate::ast::{Engine, Query};
use crate::config::CompilerConfig;
use crate::error::ComposeResult;
use indexmap::IndexMap;

#[derive(Debug)]
pub struct CompilerRegistry {
    compilers: IndexMap<&'static str, Compiler>,
}

impl Default for CompilerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerRegistry {
    /// Every supported engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(&CompilerConfig::default())
    }

    pub fn with_config(config: &CompilerConfig) -> Self {
        let mut registry = Self::empty();
        for engine in Engine::ALL {
            registry.register(Compiler::with_config(engine, config));
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            compilers: IndexMap::new(),
        }
    }

    /// Add or replace the compiler for its engine code.
    pub fn register(&mut self, compiler: Compiler) -> &mut Self {
        self.compilers.insert(compiler.engine_code(), compiler);
        self
    }

    pub fn get(&self, code: &str) -> Option<&Compiler> {
        self.compilers.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Compiler> {
        self.compilers.get_mut(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.compilers.keys().copied()
    }

    /// Compile `query` with every registered compiler, in registration order.
    pub fn compile_all(&self, query: &Query) -> ComposeResult<IndexMap<&'static str, CompileResult>> {
        self.compilers
            .iter()
            .map(|(code, compiler)| Ok((*code, compiler.compile(query)?)))
            .collect()
    }
}
