use crate::ast::Engine;
use crate::compiler::sql::firebird::FirebirdGenerator;
use crate::compiler::sql::generic::GenericGenerator;
use crate::compiler::sql::mysql::MysqlGenerator;
use crate::compiler::sql::postgres::PostgresGenerator;
use crate::compiler::sql::sqlite::SqliteGenerator;
use crate::compiler::sql::sqlserver::SqlServerGenerator;
use crate::compiler::traits::SqlGenerator;

impl Default for Engine {
    fn default() -> Self {
        Self::Generic
    }
}

impl Engine {
    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Engine::Generic => Box::new(GenericGenerator),
            Engine::MySql => Box::new(MysqlGenerator),
            Engine::Postgres => Box::new(PostgresGenerator),
            Engine::SqlServer => Box::new(SqlServerGenerator),
            Engine::Sqlite => Box::new(SqliteGenerator),
            Engine::Firebird => Box::new(FirebirdGenerator),
        }
    }
}
