use crate::{Result, TaskError};

/// A named value that starts absent and can be set by a task action.
///
/// Downstream consumers read it after the producing task ran; reading an
/// absent value through [`Property::get`] is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property<T> {
    name: String,
    value: Option<T>,
}

impl<T> Property<T> {
    /// Create an absent property.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Property name, used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the current value.
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    /// Set the value, or clear it when `value` is `None`.
    pub fn set_optional(&mut self, value: Option<T>) {
        self.value = value;
    }

    /// Whether a value has been set.
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    /// The current value.
    ///
    /// # Errors
    /// Returns [`TaskError::MissingProperty`] if no value was set
    pub fn get(&self) -> Result<&T> {
        self.value
            .as_ref()
            .ok_or_else(|| TaskError::MissingProperty(self.name.clone()))
    }

    /// The current value, if any.
    pub fn get_or_none(&self) -> Option<&T> {
        self.value.as_ref()
    }
}
