use actix::prelude::*;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Result};
use std::fs;
use std::path::Path;

use crate::errors::JoblyError;

mod migrate {
    use refinery::embed_migrations;
    embed_migrations!("src/database");
}

pub const DATABASE_FILE_NAME: &str = "jobly-database.db";

/// Owns the single SQLite connection. Every statement goes through this
/// actor's mailbox, so statements are executed one at a time.
pub struct Database {
    connection: rusqlite::Connection,
}

impl Database {
    pub fn open(path: &str) -> Result<Self, JoblyError> {
        let path = shellexpand::tilde(path).into_owned();
        fs::create_dir_all(&path).map_err(|err| JoblyError::CreateDatabaseDir { source: err })?;

        let database_path = Path::new(&path).join(DATABASE_FILE_NAME);
        debug!("Opening database at {}", database_path.display());

        Self::init(Connection::open(database_path)?)
    }

    pub fn in_memory() -> Result<Self, JoblyError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(mut connection: Connection) -> Result<Self, JoblyError> {
        connection.pragma_update(None, "foreign_keys", true)?;
        register_functions(&connection)?;

        debug!("Running database migrations");
        let report = migrate::migrations::runner()
            .run(&mut connection)
            .map_err(|err| JoblyError::Migrate { source: err })?;
        for migration in report.applied_migrations() {
            debug!("Applied migration {}", migration);
        }

        Ok(Self { connection })
    }
}

/// SQLite's `lower()` only folds ASCII, `unicode_lower()` folds everything
/// `str::to_lowercase` does.
fn register_functions(connection: &Connection) -> Result<()> {
    connection.create_scalar_function(
        "unicode_lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text = ctx.get::<Option<String>>(0)?;
            Ok(text.map(|text| text.to_lowercase()))
        },
    )
}

impl Actor for Database {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Context<Self>) {
        debug!("Connected to the database");
    }

    fn stopped(&mut self, _ctx: &mut Context<Self>) {
        debug!("Disconnected from database");
    }
}

/// Runs a statement and resolves to the number of affected rows.
#[derive(Message)]
#[rtype(result = "Result<usize>")]
pub struct Execute {
    pub query: String,
    pub params: Vec<Value>,
}

impl Handler<Execute> for Database {
    type Result = Result<usize>;

    fn handle(&mut self, execute: Execute, _ctx: &mut Context<Self>) -> Self::Result {
        self.connection
            .execute(execute.query.as_str(), params_from_iter(execute.params))
    }
}

/// Runs a statement that yields rows (including `RETURNING` statements) and
/// maps every row with `map_result`.
pub struct Query<T, F>
where
    T: 'static,
    F: FnMut(&rusqlite::Row<'_>) -> Result<T>,
{
    pub query: String,
    pub params: Vec<Value>,
    pub map_result: F,
}

impl<T, F> Message for Query<T, F>
where
    T: 'static,
    F: FnMut(&rusqlite::Row<'_>) -> Result<T>,
{
    type Result = Result<Vec<T>>;
}

impl<T, F> Handler<Query<T, F>> for Database
where
    T: 'static,
    F: FnMut(&rusqlite::Row<'_>) -> Result<T>,
{
    type Result = Result<Vec<T>>;

    fn handle(&mut self, query: Query<T, F>, _ctx: &mut Context<Self>) -> Self::Result {
        let result: Result<Vec<T>> = self
            .connection
            .prepare(query.query.as_str())?
            .query_map(params_from_iter(query.params), query.map_result)?
            .collect();

        result
    }
}
