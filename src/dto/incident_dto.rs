use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportIncidentRequest {
    #[validate(length(max = 64), custom = "validate_not_blank")]
    pub route_id: String,

    #[validate(length(max = 2000), custom = "validate_not_blank")]
    pub description: String,
}
