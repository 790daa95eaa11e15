use crate::ast::Engine;
use crate::compiler::traits::SqlGenerator;

/// Firebird Generator. Identifiers are upper-cased when wrapped.
pub struct FirebirdGenerator;

impl SqlGenerator for FirebirdGenerator {
    fn engine(&self) -> Engine {
        Engine::Firebird
    }

    fn wrap_value(&self, value: &str) -> String {
        if value == "*" {
            return value.to_string();
        }
        format!("\"{}\"", value.replace('"', "\"\"")).to_uppercase()
    }
}
