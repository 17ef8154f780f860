use serde::{Deserialize, Serialize};

/// A registered non-resident property owner.
///
/// The NIE (foreigner tax identification number) is the identifier that
/// appears on every Modelo 210 filing; uniqueness is enforced by the
/// persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub nie: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub active: bool,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
