use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}
