use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSnapsQuery {
    /// Number of snaps to return, newest first. Defaults to 4, capped at 50.
    pub limit: Option<u64>,
}
