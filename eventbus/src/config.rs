use serde::{Deserialize, Serialize};

/// Which occurrence(s) `remove_listener` detaches when a callback was added more than once.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Multicast delegate rule: the most recently added matching occurrence.
    LastOccurrence,
    FirstOccurrence,
    AllOccurrences,
}

impl Default for RemovalPolicy {
    fn default() -> Self {
        RemovalPolicy::LastOccurrence
    }
}

/// What a post does when its payload type differs from the registered listener type.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCheck {
    /// Return `BusError::TypeMismatch`.
    Strict,
    /// Log the mismatch and treat the post as a no-op.
    Lenient,
}

impl Default for TypeCheck {
    fn default() -> Self {
        TypeCheck::Strict
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct BusConfig {
    pub removal: RemovalPolicy,
    pub type_check: TypeCheck,
}

impl BusConfig {
    pub fn removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    pub fn type_check(mut self, type_check: TypeCheck) -> Self {
        self.type_check = type_check;
        self
    }
}
