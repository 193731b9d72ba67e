use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn admits(self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !completed,
            StatusFilter::Completed => completed,
        }
    }
}
