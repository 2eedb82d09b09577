use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::clients::models::{ClientResponse, CreateClientRequest, ListClientsQuery};
use crate::modules::clients::services::ClientService;

/// POST /clients
pub async fn create_client(
    service: web::Data<Arc<ClientService>>,
    request: web::Json<CreateClientRequest>,
) -> Result<HttpResponse, AppError> {
    let client = service.create_client(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ClientResponse::from(client)))
}

/// GET /clients
pub async fn list_clients(
    service: web::Data<Arc<ClientService>>,
    query: web::Query<ListClientsQuery>,
) -> Result<HttpResponse, AppError> {
    let clients = service.list_clients(query.limit, query.offset).await?;
    let body: Vec<ClientResponse> = clients.into_iter().map(ClientResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /clients/{id}
pub async fn get_client(
    service: web::Data<Arc<ClientService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let client = service.get_client(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ClientResponse::from(client)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clients")
            .route("", web::post().to(create_client))
            .route("", web::get().to(list_clients))
            .route("/{id}", web::get().to(get_client)),
    );
}
