use serde::{Deserialize, Serialize};
use std::fmt;

/// A single requirement within a compliance framework
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub framework: String,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Natural key of a control: `(framework, id)`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControlKey {
    pub framework: String,
    pub id: String,
}

impl Control {
    pub fn new(
        framework: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            framework: framework.into(),
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn key(&self) -> ControlKey {
        ControlKey::new(&self.framework, &self.id)
    }
}

impl ControlKey {
    pub fn new(framework: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            framework: framework.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.framework, self.id)
    }
}
