use crate::database::{Database, Execute, Query};
use crate::sql;
use crate::JoblyError;
use actix::Addr;
use actix_web::dev::Payload;
use actix_web::{web, HttpRequest};
use futures::future;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod query;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<String>,
    pub company_handle: String,
}

impl Job {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Job> {
        Ok(Job {
            id: row.get(0)?,
            title: row.get(1)?,
            salary: row.get(2)?,
            equity: row.get(3)?,
            company_handle: row.get(4)?,
        })
    }
}

/// Fraction of the company offered with a job, kept as the decimal string it
/// was given. Accepts JSON strings (`"0.5"`) and numbers (`0.5`) in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "RawEquity", into = "String")]
pub struct Equity(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEquity {
    Text(String),
    Number(serde_json::Number),
}

impl TryFrom<RawEquity> for Equity {
    type Error = String;

    fn try_from(raw: RawEquity) -> Result<Self, Self::Error> {
        let text = match raw {
            RawEquity::Text(text) => text.trim().to_owned(),
            RawEquity::Number(number) => number.to_string(),
        };

        match text.parse::<f64>() {
            Ok(value) if is_plain_decimal(&text) && (0.0..=1.0).contains(&value) => {
                Ok(Equity(text))
            }
            _ => Err(format!("equity must be a decimal between 0 and 1, got '{}'", text)),
        }
    }
}

/// Digits with an optional fractional part: `1`, `0.25`. No sign, no
/// exponent.
fn is_plain_decimal(text: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    match text.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(text),
    }
}

impl From<Equity> for String {
    fn from(equity: Equity) -> String {
        equity.0
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<Equity>,
    pub company_handle: String,
}

impl NewJob {
    pub fn validate(&self) -> Result<(), JoblyError> {
        validate_title(&self.title)?;
        validate_salary(self.salary)?;
        if self.company_handle.trim().is_empty() {
            return Err(JoblyError::invalid_input("company_handle must not be empty"));
        }
        Ok(())
    }
}

/// Fields a partial update may touch. `id` and `company_handle` are not
/// accepted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub salary: Option<i64>,
    pub equity: Option<Equity>,
}

impl JobUpdate {
    pub fn validate(&self) -> Result<(), JoblyError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_salary(self.salary)
    }

    fn into_fields(self) -> Vec<(&'static str, Value)> {
        let mut fields = Vec::new();
        if let Some(title) = self.title {
            fields.push(("title", Value::from(title)));
        }
        if let Some(salary) = self.salary {
            fields.push(("salary", Value::from(salary)));
        }
        if let Some(equity) = self.equity {
            fields.push(("equity", Value::from(String::from(equity))));
        }
        fields
    }
}

fn validate_title(title: &str) -> Result<(), JoblyError> {
    if title.trim().is_empty() {
        return Err(JoblyError::invalid_input("title must not be empty"));
    }
    Ok(())
}

fn validate_salary(salary: Option<i64>) -> Result<(), JoblyError> {
    match salary {
        Some(salary) if salary < 0 => Err(JoblyError::invalid_input(format!(
            "salary must be greater than or equal to 0, got {}",
            salary
        ))),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobFilter {
    /// Case-insensitive substring match on the title.
    Title(String),
    /// Jobs without a salary never match, `MinSalary(0)` included.
    MinSalary(i64),
    /// `true` keeps jobs that have an equity value; `false` applies no
    /// restriction.
    HasEquity(bool),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct JobQuery {
    pub title: Option<String>,
    pub min: Option<i64>,
    pub has_equity: Option<bool>,
}

impl JobQuery {
    /// `title` wins over `min`, which wins over `hasEquity`.
    pub fn into_filter(self) -> Option<JobFilter> {
        if let Some(title) = self.title {
            Some(JobFilter::Title(title))
        } else if let Some(min) = self.min {
            Some(JobFilter::MinSalary(min))
        } else {
            self.has_equity.map(JobFilter::HasEquity)
        }
    }
}

#[derive(Clone)]
pub struct JobStore {
    database: Addr<Database>,
}

impl JobStore {
    pub fn new(database: Addr<Database>) -> Self {
        Self { database }
    }

    async fn query(&self, query: &str, params: Vec<Value>) -> Result<Vec<Job>, JoblyError> {
        let jobs = self
            .database
            .send(Query {
                query: query.to_owned(),
                params,
                map_result: Job::from_row,
            })
            .await??;

        Ok(jobs)
    }

    async fn query_one(&self, query: &str, params: Vec<Value>) -> Result<Option<Job>, JoblyError> {
        let jobs = self.query(query, params).await?;
        Ok(jobs.into_iter().next())
    }

    /// Inserts a job unless one with the same title already exists.
    ///
    /// The duplicate check and the insert are separate statements, so two
    /// concurrent creators of the same title can both succeed.
    pub async fn create(&self, job: NewJob) -> Result<Job, JoblyError> {
        let duplicate = self
            .query_one(query::GET_JOB_BY_TITLE, vec![Value::from(job.title.clone())])
            .await?;

        if duplicate.is_some() {
            return Err(JoblyError::DuplicateEntity {
                message: format!("Duplicate job: {}", job.title),
            });
        }

        let company_handle = job.company_handle.clone();
        let params = vec![
            Value::from(job.title),
            Value::from(job.salary),
            Value::from(job.equity.map(String::from)),
            Value::from(job.company_handle),
        ];

        let created = self
            .query_one(query::INSERT_JOB, params)
            .await
            .map_err(|err| match err {
                JoblyError::BackendFailure { source } if is_foreign_key_violation(&source) => {
                    JoblyError::invalid_input(format!("No company: {}", company_handle))
                }
                err => err,
            })?
            .ok_or(rusqlite::Error::QueryReturnedNoRows)?;

        debug!("Job {} created with id {}", created.title, created.id);
        Ok(created)
    }

    pub async fn find_all(&self) -> Result<Vec<Job>, JoblyError> {
        self.query(query::GET_ALL_JOBS, vec![]).await
    }

    pub async fn get(&self, title: &str) -> Result<Job, JoblyError> {
        self.query_one(query::GET_JOB_BY_TITLE, vec![Value::from(title.to_owned())])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {}", title)))
    }

    pub async fn search(&self, id: i64) -> Result<Option<Job>, JoblyError> {
        self.query_one(query::GET_JOB_BY_ID, vec![Value::from(id)])
            .await
    }

    pub async fn filter(&self, filter: JobFilter) -> Result<Vec<Job>, JoblyError> {
        match filter {
            JobFilter::Title(title) => {
                self.query(query::FILTER_JOBS_BY_TITLE, vec![Value::from(title)])
                    .await
            }
            JobFilter::MinSalary(min) => {
                self.query(query::FILTER_JOBS_BY_MIN_SALARY, vec![Value::from(min)])
                    .await
            }
            JobFilter::HasEquity(true) => self.query(query::FILTER_JOBS_WITH_EQUITY, vec![]).await,
            JobFilter::HasEquity(false) => self.find_all().await,
        }
    }

    /// Applies a partial update to the job with the given id and returns the
    /// stored result.
    pub async fn update(&self, id: i64, data: JobUpdate) -> Result<Job, JoblyError> {
        let update = sql::sql_for_partial_update(data.into_fields(), &HashMap::new())?;

        let statement = format!(
            "UPDATE jobs SET {} WHERE id = {} RETURNING {}",
            update.set_cols,
            update.next_placeholder(),
            query::JOB_COLUMNS
        );

        let mut params = update.values;
        params.push(Value::from(id));

        self.query_one(&statement, params)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {}", id)))
    }

    pub async fn remove(&self, title: &str) -> Result<(), JoblyError> {
        let deleted = self
            .database
            .send(Execute {
                query: query::DELETE_JOB_BY_TITLE.to_owned(),
                params: vec![Value::from(title.to_owned())],
            })
            .await??;

        if deleted == 0 {
            return Err(JoblyError::not_found(format!("No job: {}", title)));
        }

        debug!("Removed {} job(s) titled {}", deleted, title);
        Ok(())
    }
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(err, _) => {
            err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
        }
        _ => false,
    }
}

impl actix_web::FromRequest for JobStore {
    type Error = JoblyError;
    type Future = future::Ready<Result<Self, JoblyError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let store = req
            .app_data::<web::Data<Addr<Database>>>()
            .map(|database| JobStore::new(database.get_ref().clone()))
            .ok_or(JoblyError::ReadContext {});

        future::ready(store)
    }
}
