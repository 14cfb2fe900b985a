//! HTTP API Layer
//!
//! REST API for addresses and persons using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers per resource
//! - **Middleware**: Request id, tracing, request logging
//! - **DTOs**: Message bodies; domain types serialize directly
//! - **Error Handling**: [`error::ApiError`] turns service errors into responses
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(addresses, persons, Arc::new(lookup));
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_address::{AddressPort, AddressService, PostalLookupPort};
use domain_person::{PersonPort, PersonService};

use crate::handlers::{address, health, person};
use crate::middleware::request_logging_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub addresses: AddressService,
    pub persons: PersonService,
    /// Adapters probed by the readiness check
    pub health_checks: Vec<Arc<dyn HealthCheckable>>,
}

impl AppState {
    /// Wires the services to their adapters
    pub fn new<A, P, L>(addresses: Arc<A>, persons: Arc<P>, lookup: Arc<L>) -> Self
    where
        A: AddressPort,
        P: PersonPort,
        L: PostalLookupPort,
    {
        let address_health: Arc<dyn HealthCheckable> = addresses.clone();
        let person_health: Arc<dyn HealthCheckable> = persons.clone();
        let address_port: Arc<dyn AddressPort> = addresses;
        let person_port: Arc<dyn PersonPort> = persons;

        Self {
            addresses: AddressService::new(address_port.clone(), lookup),
            persons: PersonService::new(person_port, address_port),
            health_checks: vec![address_health, person_health],
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let api_routes = Router::new()
        .route(
            "/enderecos/",
            get(address::list_addresses)
                .post(address::create_address)
                .delete(address::delete_all_addresses),
        )
        .route("/enderecos/busca_cep/:cep", get(address::find_by_postal_code))
        .route(
            "/enderecos/:id",
            get(address::get_address)
                .put(address::update_address)
                .delete(address::delete_address),
        )
        .route(
            "/pessoas/",
            get(person::list_persons)
                .post(person::create_person)
                .delete(person::delete_all_persons),
        )
        .route(
            "/pessoas/:id",
            get(person::get_person)
                .put(person::update_person)
                .delete(person::delete_person),
        );

    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(request_logging_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
