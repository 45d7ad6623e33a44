use actix_web::{
    delete, get, patch, post,
    web::{self, Data, Json, Path, Query, ServiceConfig},
    HttpResponse,
};
use tracing::info;

use super::store::{JobStore, StoreError};
use crate::api::job::dto::{BulkRequest, DeleteResponse, Envelope, FilterRequest, ListQuery};
use crate::api::job::{FilterField, FilterSet, JobDraft, JobPatch};

#[get("")]
async fn list_jobs(
    store: Data<JobStore>,
    query: Query<ListQuery>,
) -> Result<HttpResponse, StoreError> {
    let query = query.into_inner();
    let filters = FilterSet::new()
        .with(FilterField::Status, query.status.unwrap_or_default())
        .with(FilterField::StartDate, query.start_date.unwrap_or_default())
        .with(FilterField::EndDate, query.end_date.unwrap_or_default());

    let page = store.page(&filters, query.page, query.limit)?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/filter")]
async fn filter_jobs(
    store: Data<JobStore>,
    body: Json<FilterRequest>,
) -> Result<HttpResponse, StoreError> {
    let FilterRequest {
        page,
        limit,
        filters,
    } = body.into_inner();
    let filters = filters.compacted();
    info!("Filtering jobs: [{}]", filters);

    let page = store.page(&filters, page, limit)?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/stats")]
async fn job_stats(store: Data<JobStore>) -> HttpResponse {
    HttpResponse::Ok().json(Envelope {
        data: store.stats(),
    })
}

#[post("/bulk")]
async fn bulk_create_jobs(store: Data<JobStore>, body: Json<BulkRequest>) -> HttpResponse {
    let response = store.bulk_create(body.into_inner().jobs);
    HttpResponse::Created().json(response)
}

#[get("/{id}")]
async fn get_job(store: Data<JobStore>, id: Path<String>) -> Result<HttpResponse, StoreError> {
    let job = store.get(&id)?;
    Ok(HttpResponse::Ok().json(Envelope { data: job }))
}

#[post("")]
async fn create_job(
    store: Data<JobStore>,
    draft: actix_web_validator::Json<JobDraft>,
) -> Result<HttpResponse, StoreError> {
    let job = store.create(draft.into_inner())?;
    Ok(HttpResponse::Created().json(Envelope { data: job }))
}

#[patch("/{id}")]
async fn update_job(
    store: Data<JobStore>,
    id: Path<String>,
    patch: actix_web_validator::Json<JobPatch>,
) -> Result<HttpResponse, StoreError> {
    let job = store.update(&id, patch.into_inner())?;
    Ok(HttpResponse::Ok().json(Envelope { data: job }))
}

#[delete("/{id}")]
async fn delete_job(store: Data<JobStore>, id: Path<String>) -> Result<HttpResponse, StoreError> {
    store.delete(&id)?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Job deleted successfully".to_string(),
    }))
}

// Literal paths are registered before `/{id}` so they are matched first.
pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        web::scope("/api/jobs")
            .service(list_jobs)
            .service(filter_jobs)
            .service(job_stats)
            .service(bulk_create_jobs)
            .service(get_job)
            .service(create_job)
            .service(update_job)
            .service(delete_job),
    );
}
