use std::cell::RefCell;

use super::Field;

/// Supplier of the field list.
///
/// Structural changes are reported to the grid through
/// [`GridView::fields_inserted`](crate::viewer::GridView::fields_inserted) and
/// friends after the provider has updated what [`fields`](Self::fields) returns.
pub trait SchemaServer {
    /// Current fields, in field-index order.
    fn fields(&self) -> Vec<Field>;
}

/// In-memory schema keyed by field name.
#[derive(Debug, Default)]
pub struct StaticSchema {
    fields: RefCell<Vec<Field>>,
}

impl StaticSchema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: RefCell::new(Field::from_names(names)),
        }
    }

    /// Replace every field.
    pub fn set_field_names<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.fields.borrow_mut() = Field::from_names(names);
    }

    /// Insert fields at `index`, re-indexing later fields.
    pub fn insert_fields<I, S>(&self, index: usize, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = self.fields.borrow_mut();
        let index = index.min(fields.len());
        let inserted: Vec<Field> = names.into_iter().map(|name| Field::new(name, 0)).collect();
        let tail = fields.split_off(index);
        fields.extend(inserted);
        fields.extend(tail);
        reindex(&mut fields);
    }

    /// Delete `count` fields starting at `index`, re-indexing later fields.
    pub fn delete_fields(&self, index: usize, count: usize) {
        let mut fields = self.fields.borrow_mut();
        let start = index.min(fields.len());
        let end = index.saturating_add(count).min(fields.len());
        fields.drain(start..end);
        reindex(&mut fields);
    }

    /// Remove every field.
    pub fn clear(&self) {
        self.fields.borrow_mut().clear();
    }
}

fn reindex(fields: &mut [Field]) {
    for (index, field) in fields.iter_mut().enumerate() {
        field.index = index;
    }
}

impl SchemaServer for StaticSchema {
    fn fields(&self) -> Vec<Field> {
        self.fields.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete_reindex() {
        let schema = StaticSchema::new(["a", "b", "c"]);
        schema.insert_fields(1, ["x", "y"]);
        let names: Vec<String> = schema.fields().into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["a", "x", "y", "b", "c"]);
        assert!(schema.fields().iter().enumerate().all(|(i, f)| f.index == i));

        schema.delete_fields(1, 2);
        let names: Vec<String> = schema.fields().into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
