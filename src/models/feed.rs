use serde::{Deserialize, Serialize};

/// One entry in the static feed registry. Immutable after load; only
/// enabled feeds participate in a refresh cycle, in registry order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDescriptor {
    pub id: String,
    pub name: String,
    pub url: String,
    pub enabled: bool,
}

impl FeedDescriptor {
    pub fn new<S: Into<String>>(id: S, name: S, url: S) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            enabled: true,
        }
    }
}
