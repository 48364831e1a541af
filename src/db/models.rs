use serde::{Deserialize, Serialize};

/// Value stored under each code key. The code itself is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub url: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDetail {
    pub code: String,
    pub url: String,
    pub created_at: String,
}

impl LinkDetail {
    pub fn new(code: String, record: LinkRecord) -> Self {
        Self {
            code,
            url: record.url,
            created_at: record.created_at,
        }
    }
}
