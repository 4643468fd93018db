/// A network/location segment grouping hosts in the inventory backend.
///
/// Sourced entirely from the backend; never created or mutated locally,
/// only cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudArea {
    pub id: i64,
    pub name: String,
}

impl CloudArea {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
