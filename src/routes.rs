use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;

use crate::auth::{Permissions, User};
use crate::errors::JoblyError;
use crate::job::{JobQuery, JobStore, JobUpdate, NewJob};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz)
        .service(info)
        .service(create_job)
        .service(list_jobs)
        .service(get_job)
        .service(update_job)
        .service(delete_job);
}

/// Malformed JSON bodies are reported like any other invalid input.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| JoblyError::invalid_input(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| JoblyError::invalid_input(err.to_string()).into())
}

#[get("/healthz")]
async fn healthz() -> impl Responder {
    HttpResponse::Ok().body("200 Ok")
}

#[get("/info")]
async fn info() -> impl Responder {
    HttpResponse::Ok().json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

#[post("/jobs")]
async fn create_job(
    user: User,
    store: JobStore,
    body: web::Json<NewJob>,
) -> Result<HttpResponse, JoblyError> {
    user.require(Permissions::JobWrite)?;

    let new_job = body.into_inner();
    new_job.validate()?;

    let job = store.create(new_job).await?;
    Ok(HttpResponse::Created().json(json!({ "job": job })))
}

#[get("/jobs")]
async fn list_jobs(
    store: JobStore,
    query: web::Query<JobQuery>,
) -> Result<HttpResponse, JoblyError> {
    let jobs = match query.into_inner().into_filter() {
        Some(filter) => {
            debug!("Listing jobs with filter {:?}", filter);
            store.filter(filter).await?
        }
        None => store.find_all().await?,
    };

    Ok(HttpResponse::Ok().json(json!({ "jobs": jobs })))
}

#[get("/jobs/{title}")]
async fn get_job(store: JobStore, title: web::Path<String>) -> Result<HttpResponse, JoblyError> {
    let job = store.get(&title).await?;
    Ok(HttpResponse::Ok().json(json!({ "job": job })))
}

#[patch("/jobs/{title}")]
async fn update_job(
    user: User,
    store: JobStore,
    title: web::Path<String>,
    body: web::Json<JobUpdate>,
) -> Result<HttpResponse, JoblyError> {
    user.require(Permissions::JobWrite)?;

    let data = body.into_inner();
    data.validate()?;

    let job = store.get(&title).await?;

    // Renaming onto another job's title would break title lookups.
    if let Some(new_title) = data.title.as_deref() {
        if new_title != job.title {
            match store.get(new_title).await {
                Ok(_) => {
                    return Err(JoblyError::DuplicateEntity {
                        message: format!("Duplicate job: {}", new_title),
                    })
                }
                Err(JoblyError::NotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }
    }

    let job = store.update(job.id, data).await?;
    Ok(HttpResponse::Ok().json(json!({ "job": job })))
}

#[delete("/jobs/{title}")]
async fn delete_job(
    user: User,
    store: JobStore,
    title: web::Path<String>,
) -> Result<HttpResponse, JoblyError> {
    user.require(Permissions::JobWrite)?;

    let title = title.into_inner();
    store.remove(&title).await?;

    Ok(HttpResponse::Ok().json(json!({ "deleted": title })))
}
