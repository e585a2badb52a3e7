//! HTTP server for the car-wash order API.
//!
//! All endpoints live under `/api/orders`. Request bodies and path parameters
//! are decoded by axum's extractors, so malformed JSON, unknown status values
//! and non-UUID ids are rejected with a 4xx before any handler runs.

use axum::{
	extract::{DefaultBodyLimit, Path, State},
	http::{HeaderName, HeaderValue, Method, StatusCode},
	response::Json,
	routing::{get, patch},
	Router,
};
use carwash_config::ApiConfig;
use carwash_core::OrderStore;
use carwash_types::{APIError, HealthResponse, Order, OrderStatus, StatusUpdateRequest};
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// The order store every handler reads and writes.
	pub store: Arc<OrderStore>,
}

/// Starts the HTTP server and serves until Ctrl-C is received.
pub async fn start_server(
	api_config: ApiConfig,
	store: Arc<OrderStore>,
) -> Result<(), Box<dyn std::error::Error>> {
	let cors = cors_layer(&api_config)?;
	let app = build_router(AppState { store }, &api_config, cors);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Car-wash order API listening on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(async {
			let _ = tokio::signal::ctrl_c().await;
			tracing::info!("Shutting down API server");
		})
		.await?;

	Ok(())
}

/// Builds the router with every order endpoint and the middleware stack.
pub fn build_router(state: AppState, api_config: &ApiConfig, cors: CorsLayer) -> Router {
	let orders = Router::new()
		.route("/api_status", get(handle_health))
		.route("/", get(handle_list_orders).post(handle_create_order))
		.route(
			"/{order_id}",
			get(handle_get_order)
				.put(handle_update_order)
				.delete(handle_delete_order),
		)
		.route("/{order_id}/status", patch(handle_update_status))
		.route("/status/{status}", get(handle_orders_by_status));

	Router::new()
		.nest("/api/orders", orders)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(cors)
				.layer(DefaultBodyLimit::max(api_config.max_request_size)),
		)
		.with_state(state)
}

/// Builds the CORS layer from configuration.
///
/// Without an `[api.cors]` section every origin is allowed, which is what a
/// separately served frontend needs during development.
pub fn cors_layer(api_config: &ApiConfig) -> Result<CorsLayer, String> {
	let Some(ref cors) = api_config.cors else {
		return Ok(CorsLayer::permissive());
	};

	let origins = cors
		.allowed_origins
		.iter()
		.map(|origin| {
			HeaderValue::from_str(origin)
				.map_err(|e| format!("Invalid CORS origin '{}': {}", origin, e))
		})
		.collect::<Result<Vec<_>, _>>()?;

	let mut layer = CorsLayer::new().allow_origin(origins);

	layer = if cors.allowed_methods.is_empty() {
		layer.allow_methods([
			Method::GET,
			Method::POST,
			Method::PUT,
			Method::PATCH,
			Method::DELETE,
		])
	} else {
		let methods = cors
			.allowed_methods
			.iter()
			.map(|method| {
				Method::from_str(method)
					.map_err(|e| format!("Invalid CORS method '{}': {}", method, e))
			})
			.collect::<Result<Vec<_>, _>>()?;
		layer.allow_methods(methods)
	};

	layer = if cors.allowed_headers.is_empty() {
		layer.allow_headers(Any)
	} else {
		let headers = cors
			.allowed_headers
			.iter()
			.map(|header| {
				HeaderName::from_str(header)
					.map_err(|e| format!("Invalid CORS header '{}': {}", header, e))
			})
			.collect::<Result<Vec<_>, _>>()?;
		layer.allow_headers(headers)
	};

	Ok(layer)
}

/// Handles GET /api/orders/api_status.
async fn handle_health() -> Json<HealthResponse> {
	Json(HealthResponse::ok())
}

/// Handles GET /api/orders.
async fn handle_list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, APIError> {
	crate::apis::order::list_orders(&state.store).await.map(Json)
}

/// Handles GET /api/orders/{order_id}.
async fn handle_get_order(
	Path(order_id): Path<Uuid>,
	State(state): State<AppState>,
) -> Result<Json<Order>, APIError> {
	crate::apis::order::get_order(&state.store, order_id)
		.await
		.map(Json)
}

/// Handles POST /api/orders.
async fn handle_create_order(
	State(state): State<AppState>,
	Json(order): Json<Order>,
) -> Result<(StatusCode, Json<Order>), APIError> {
	let created = crate::apis::order::create_order(&state.store, order).await?;
	Ok((StatusCode::CREATED, Json(created)))
}

/// Handles PUT /api/orders/{order_id}.
async fn handle_update_order(
	Path(order_id): Path<Uuid>,
	State(state): State<AppState>,
	Json(order): Json<Order>,
) -> Result<Json<Order>, APIError> {
	crate::apis::order::update_order(&state.store, order_id, order)
		.await
		.map(Json)
}

/// Handles PATCH /api/orders/{order_id}/status.
async fn handle_update_status(
	Path(order_id): Path<Uuid>,
	State(state): State<AppState>,
	Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Order>, APIError> {
	crate::apis::order::update_order_status(&state.store, order_id, request.status)
		.await
		.map(Json)
}

/// Handles DELETE /api/orders/{order_id}.
async fn handle_delete_order(
	Path(order_id): Path<Uuid>,
	State(state): State<AppState>,
) -> Result<StatusCode, APIError> {
	crate::apis::order::delete_order(&state.store, order_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

/// Handles GET /api/orders/status/{status}.
async fn handle_orders_by_status(
	Path(status): Path<OrderStatus>,
	State(state): State<AppState>,
) -> Result<Json<Vec<Order>>, APIError> {
	crate::apis::order::orders_by_status(&state.store, status)
		.await
		.map(Json)
}
