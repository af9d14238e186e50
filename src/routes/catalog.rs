//! Service catalog page handlers

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::booking::services;
use crate::error::Result;
use crate::models::{Extra, OptionGroup, ServiceSummary};
use crate::AppState;

/// Service listing template
#[derive(Template)]
#[template(path = "catalog/list.html")]
struct ServiceListTemplate {
    services: Vec<ServiceSummary>,
    has_services: bool,
}

/// Service detail template
#[derive(Template)]
#[template(path = "catalog/detail.html")]
struct ServiceDetailTemplate {
    id: i64,
    name: String,
    description: String,
    base_price: String,
    base_duration_minutes: i32,
    option_groups: Vec<OptionGroup>,
    extras: Vec<Extra>,
    has_description: bool,
    has_options: bool,
    has_extras: bool,
}

/// Service listing page
pub async fn list(State(state): State<AppState>) -> Result<Html<String>> {
    let services = services::list_services(&state).await?;

    let template = ServiceListTemplate {
        has_services: !services.is_empty(),
        services: services.as_ref().clone(),
    };

    Ok(Html(template.render()?))
}

/// Service detail page with its option groups and extras
pub async fn detail(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Html<String>> {
    let service = services::load_service(&state, id).await?;
    let option_groups = service.option_groups();

    let template = ServiceDetailTemplate {
        id: service.id,
        name: service.name.clone(),
        has_description: !service.description.is_empty(),
        description: service.description.clone(),
        base_price: service.base_price.round_dp(2).to_string(),
        base_duration_minutes: service.base_duration_minutes,
        has_options: !option_groups.is_empty(),
        option_groups,
        has_extras: !service.extras.is_empty(),
        extras: service.extras.clone(),
    };

    Ok(Html(template.render()?))
}
