/// One schema field, as supplied by the schema provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// Field name (unique within a schema).
    pub name: String,
    /// Stable position of the field in the schema.
    pub index: usize,
}

impl Field {
    /// Create a field.
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// Build a field list from names, indexing them in order.
    pub fn from_names<I, S>(names: I) -> Vec<Field>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Field::new(name, index))
            .collect()
    }
}
