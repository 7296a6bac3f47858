//! Switchable stream payloads

use serde::{Deserialize, Serialize};

/// An optional payload with an explicit enabled/disabled status
///
/// A stream can be configured (value present) yet switched off by the user;
/// drivers only see the value through [`Toggle::active`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toggle<T> {
    #[serde(default)]
    pub value: Option<T>,
    #[serde(default)]
    pub status: bool,
}

impl<T> Toggle<T> {
    /// Enabled toggle carrying `value`
    pub fn enabled(value: T) -> Self {
        Self {
            value: Some(value),
            status: true,
        }
    }

    /// Disabled toggle with no value
    pub fn disabled() -> Self {
        Self {
            value: None,
            status: false,
        }
    }

    /// The value, if present and enabled
    pub fn active(&self) -> Option<&T> {
        if self.status { self.value.as_ref() } else { None }
    }
}

impl<T> Default for Toggle<T> {
    fn default() -> Self {
        Self::disabled()
    }
}
