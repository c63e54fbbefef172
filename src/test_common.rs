use actix::{Actor, Addr};
use rusqlite::types::Value;

use crate::auth::{create_token, Permissions};
use crate::database::{Database, Execute};
use crate::Context;

pub const SECRET: &str = "test-secret";

pub fn context() -> Context {
    Context {
        secret: SECRET.to_owned(),
    }
}

/// Token allowed to create, update and delete jobs.
pub fn admin_token() -> String {
    create_token(SECRET, vec![Permissions::JobWrite], 60).unwrap()
}

pub fn user_token() -> String {
    create_token(SECRET, vec![], 60).unwrap()
}

async fn execute(database: &Addr<Database>, query: &str, params: Vec<Value>) {
    database
        .send(Execute {
            query: query.to_owned(),
            params,
        })
        .await
        .unwrap()
        .unwrap();
}

/// In-memory database with companies c1..c3 and jobs new1..new3. Jobs are
/// inserted out of title order.
pub async fn seeded_database() -> Addr<Database> {
    let database = Database::in_memory().unwrap().start();

    for handle in &["c1", "c2", "c3"] {
        execute(
            &database,
            "INSERT INTO companies (handle, name, num_employees, description, logo_url)
             VALUES ($1, $2, $3, $4, $5)",
            vec![
                Value::from(handle.to_string()),
                Value::from(handle.to_uppercase()),
                Value::from(1i64),
                Value::from(format!("Desc{}", handle)),
                Value::from(format!("http://{}.img", handle)),
            ],
        )
        .await;
    }

    let jobs = [
        ("new2", 2i64, "0.2", "c2"),
        ("new1", 1, "1", "c1"),
        ("new3", 3, "0.3", "c3"),
    ];
    for (title, salary, equity, handle) in &jobs {
        execute(
            &database,
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4)",
            vec![
                Value::from(title.to_string()),
                Value::from(*salary),
                Value::from(equity.to_string()),
                Value::from(handle.to_string()),
            ],
        )
        .await;
    }

    database
}
