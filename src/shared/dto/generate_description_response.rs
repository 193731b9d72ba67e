use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GenerateDescriptionResponse {
    pub success: bool,
    pub description: String,
}
