use serde::{Deserialize, Serialize};

/// Embeddable identifier + active flag pair.
///
/// Flatten it into a concrete entity with `#[serde(flatten)]` and mark it
/// `#[entity(base)]` for the derive. The id is never serialized; `active`
/// is, and defaults to `true` when a stored document lacks it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBase {
    #[serde(skip)]
    id: String,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for EntityBase {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityBase {
    /// A fresh, not-yet-stored base: empty id, active.
    pub fn new() -> Self {
        Self {
            id: String::new(),
            active: true,
        }
    }

    /// A base for an already-stored entity.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: String) {
        self.id = id;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
