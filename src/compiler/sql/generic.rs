use crate::ast::Engine;
use crate::compiler::traits::SqlGenerator;

/// Dialect-neutral generator: double-quoted identifiers, `LIMIT ? OFFSET ?`.
pub struct GenericGenerator;

impl SqlGenerator for GenericGenerator {
    fn engine(&self) -> Engine {
        Engine::Generic
    }
}
