use oso::PolarClass;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct User {
    #[polar(attribute)]
    pub id: String,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
