use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GenerateDescriptionRequest {
    #[serde(default)]
    pub title: String,
}
