//! Formation catalog endpoint

use axum::Json;
use serde_json::{json, Value};

use rotaplan_core::{classify, Formation, FIELD_SIZES};

/// List the built-in formations with their position roles
pub async fn get_formations() -> Json<Value> {
    let formations: Vec<Value> = FIELD_SIZES
        .iter()
        .filter_map(|&size| Formation::for_field_size(size))
        .map(|formation| {
            let roles: Vec<String> = formation
                .positions()
                .iter()
                .map(|p| format!("{:?}", classify(p)).to_lowercase())
                .collect();
            json!({
                "name": formation.name,
                "field_size": formation.field_size(),
                "positions": formation.positions(),
                "roles": roles,
            })
        })
        .collect();

    Json(json!({ "formations": formations }))
}
