/// Required, non-empty text field of a contact submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactField(String);

impl ContactField {
    /// Parse a contact field, rejecting absent and empty values
    ///
    /// Whitespace-only values are kept as-is: only emptiness counts as missing.
    pub fn parse(field: &str, value: Option<String>) -> Result<Self, String> {
        match value {
            Some(value) if !value.is_empty() => Ok(Self(value)),
            Some(_) => Err(format!("`{field}` is empty")),
            None => Err(format!("`{field}` is missing")),
        }
    }
}

impl AsRef<str> for ContactField {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
