// file: src/index/schema.rs
// description: tantivy schema for crawled posts and field handle lookup
// reference: https://docs.rs/tantivy

use crate::error::Result;
use tantivy::schema::{Field, INDEXED, FAST, STORED, STRING, Schema, TEXT};

pub const FIELD_ID: &str = "Id";
pub const FIELD_URL: &str = "URL";
pub const FIELD_TITLE: &str = "Title";
pub const FIELD_BODY: &str = "Body";
pub const FIELD_COMMENTS: &str = "Comments";
pub const FIELD_MOD_DATE: &str = "mod_date";

/// Field handles resolved against a concrete schema.
#[derive(Debug, Clone, Copy)]
pub struct PostFields {
    pub id: Field,
    pub url: Field,
    pub title: Field,
    pub body: Field,
    pub comments: Field,
    pub mod_date: Field,
}

impl PostFields {
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        Ok(Self {
            id: schema.get_field(FIELD_ID)?,
            url: schema.get_field(FIELD_URL)?,
            title: schema.get_field(FIELD_TITLE)?,
            body: schema.get_field(FIELD_BODY)?,
            comments: schema.get_field(FIELD_COMMENTS)?,
            mod_date: schema.get_field(FIELD_MOD_DATE)?,
        })
    }
}

pub struct SchemaManager;

impl SchemaManager {
    /// URL and Title are stored verbatim, Body and Comments are tokenized
    /// with positions so phrase queries work, mod_date is a range-queryable
    /// integer that is not stored.
    pub fn build() -> (Schema, PostFields) {
        let mut builder = Schema::builder();

        let id = builder.add_text_field(FIELD_ID, STRING | STORED);
        let url = builder.add_text_field(FIELD_URL, STRING | STORED);
        let title = builder.add_text_field(FIELD_TITLE, STRING | STORED);
        let body = builder.add_text_field(FIELD_BODY, TEXT | STORED);
        let comments = builder.add_text_field(FIELD_COMMENTS, TEXT | STORED);
        let mod_date = builder.add_i64_field(FIELD_MOD_DATE, INDEXED | FAST);

        let fields = PostFields {
            id,
            url,
            title,
            body,
            comments,
            mod_date,
        };

        (builder.build(), fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let (schema, fields) = SchemaManager::build();
        assert_eq!(schema.fields().count(), 6);

        let resolved = PostFields::from_schema(&schema).unwrap();
        assert_eq!(resolved.body, fields.body);
        assert_eq!(resolved.mod_date, fields.mod_date);

        assert!(schema.get_field_entry(fields.body).is_stored());
        assert!(!schema.get_field_entry(fields.mod_date).is_stored());
        assert!(schema.get_field_entry(fields.mod_date).is_indexed());
    }

    #[test]
    fn test_foreign_schema_is_rejected() {
        let mut builder = Schema::builder();
        builder.add_text_field("content", TEXT);
        let schema = builder.build();

        assert!(PostFields::from_schema(&schema).is_err());
    }
}
