// file: src/query/builder.rs
// description: builds tantivy queries for free-text and structured search modes
// reference: https://docs.rs/tantivy

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::query::wildcard::wildcard_to_regex;
use std::ops::Bound;
use tantivy::query::{
    BooleanQuery, Occur, PhraseQuery, Query, QueryParser, RangeQuery, RegexQuery, TermQuery,
};
use tantivy::schema::{Field, FieldType, IndexRecordOption};
use tantivy::tokenizer::TokenStream;
use tantivy::{Index, Term};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum StructuredQuery {
    /// Query-parser syntax against the default field.
    Text(String),
    /// Query-parser syntax (with `^` boosts) added as an optional clause.
    Boost(String),
    Boolean {
        must: Vec<String>,
        should: Vec<String>,
        must_not: Vec<String>,
    },
    Proximity {
        words: Vec<String>,
        slop: u32,
    },
    /// Inclusive on both ends.
    Range {
        field: String,
        start: i64,
        end: i64,
    },
    Wildcard(String),
}

pub struct QueryBuilder<'a> {
    index: &'a Index,
    field: Field,
    conjunction_by_default: bool,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(index: &'a Index, config: &SearchConfig) -> Result<Self> {
        let schema = index.schema();
        let field = schema.get_field(&config.default_field)?;

        if !matches!(schema.get_field_entry(field).field_type(), FieldType::Str(_)) {
            return Err(SearchError::InvalidQuery(format!(
                "default field '{}' is not a text field",
                config.default_field
            )));
        }

        Ok(Self {
            index,
            field,
            conjunction_by_default: config.conjunction_by_default,
        })
    }

    pub fn build(&self, query: &StructuredQuery) -> Result<Box<dyn Query>> {
        debug!("Building query: {:?}", query);

        match query {
            StructuredQuery::Text(text) => self.parse(text),
            StructuredQuery::Boost(text) => {
                let parsed = self.parse(text)?;
                Ok(Box::new(BooleanQuery::new(vec![(Occur::Should, parsed)])))
            }
            StructuredQuery::Boolean {
                must,
                should,
                must_not,
            } => self.boolean(must, should, must_not),
            StructuredQuery::Proximity { words, slop } => self.proximity(words, *slop),
            StructuredQuery::Range { field, start, end } => self.range(field, *start, *end),
            StructuredQuery::Wildcard(pattern) => self.wildcard(pattern),
        }
    }

    fn parse(&self, text: &str) -> Result<Box<dyn Query>> {
        if text.trim().is_empty() {
            return Err(SearchError::InvalidQuery("query text is empty".to_string()));
        }

        let mut parser = QueryParser::for_index(self.index, vec![self.field]);
        if self.conjunction_by_default {
            parser.set_conjunction_by_default();
        }

        Ok(parser.parse_query(text)?)
    }

    /// Runs `text` through the default field's analyzer.
    fn analyze(&self, text: &str) -> Result<Vec<Term>> {
        let mut analyzer = self.index.tokenizer_for_field(self.field)?;
        let mut stream = analyzer.token_stream(text);
        let mut terms = Vec::new();

        while stream.advance() {
            terms.push(Term::from_field_text(self.field, &stream.token().text));
        }

        Ok(terms)
    }

    fn term_query(term: Term) -> Box<dyn Query> {
        Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs))
    }

    fn boolean(
        &self,
        must: &[String],
        should: &[String],
        must_not: &[String],
    ) -> Result<Box<dyn Query>> {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        for (occur, words) in [
            (Occur::Must, must),
            (Occur::Should, should),
            (Occur::MustNot, must_not),
        ] {
            for word in words {
                for term in self.analyze(word)? {
                    clauses.push((occur, Self::term_query(term)));
                }
            }
        }

        if clauses.is_empty() {
            return Err(SearchError::InvalidQuery(
                "boolean query needs at least one term".to_string(),
            ));
        }

        Ok(Box::new(BooleanQuery::new(clauses)))
    }

    fn proximity(&self, words: &[String], slop: u32) -> Result<Box<dyn Query>> {
        let mut terms = self.analyze(&words.join(" "))?;

        match terms.len() {
            0 => Err(SearchError::InvalidQuery(
                "proximity query needs at least one word".to_string(),
            )),
            1 => Ok(Self::term_query(terms.remove(0))),
            _ => {
                let mut phrase = PhraseQuery::new(terms);
                phrase.set_slop(slop);
                Ok(Box::new(phrase))
            }
        }
    }

    fn range(&self, field_name: &str, start: i64, end: i64) -> Result<Box<dyn Query>> {
        let schema = self.index.schema();
        let field = schema.get_field(field_name)?;
        let entry = schema.get_field_entry(field);

        if !matches!(entry.field_type(), FieldType::I64(_)) || !entry.is_indexed() {
            return Err(SearchError::InvalidQuery(format!(
                "field '{}' is not an indexed integer field",
                field_name
            )));
        }

        if start > end {
            return Err(SearchError::InvalidQuery(format!(
                "range start {} is greater than end {}",
                start, end
            )));
        }

        Ok(Box::new(RangeQuery::new_i64_bounds(
            field_name.to_string(),
            Bound::Included(start),
            Bound::Included(end),
        )))
    }

    fn wildcard(&self, pattern: &str) -> Result<Box<dyn Query>> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(SearchError::InvalidQuery("wildcard pattern is empty".to_string()));
        }

        // Indexed terms are lowercased by the default analyzer.
        let regex = wildcard_to_regex(&pattern.to_lowercase());
        Ok(Box::new(RegexQuery::from_pattern(&regex, self.field)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::schema::SchemaManager;

    fn index() -> Index {
        let (schema, _) = SchemaManager::build();
        Index::create_in_ram(schema)
    }

    #[test]
    fn test_rejects_non_text_default_field() {
        let index = index();
        let config = SearchConfig {
            default_field: "mod_date".to_string(),
            ..SearchConfig::default()
        };
        assert!(matches!(
            QueryBuilder::new(&index, &config),
            Err(SearchError::InvalidQuery(_))
        ));

        let config = SearchConfig {
            default_field: "Nope".to_string(),
            ..SearchConfig::default()
        };
        assert!(QueryBuilder::new(&index, &config).is_err());
    }

    #[test]
    fn test_analyze_lowercases() {
        let index = index();
        let builder = QueryBuilder::new(&index, &SearchConfig::default()).unwrap();
        let terms = builder.analyze("PLMOKN Android").unwrap();

        let texts: Vec<String> = terms
            .iter()
            .map(|t| t.value().as_str().unwrap().to_string())
            .collect();
        assert_eq!(texts, vec!["plmokn", "android"]);
    }

    #[test]
    fn test_invalid_structured_queries() {
        let index = index();
        let builder = QueryBuilder::new(&index, &SearchConfig::default()).unwrap();

        let empty_boolean = StructuredQuery::Boolean {
            must: vec![],
            should: vec!["...".to_string()],
            must_not: vec![],
        };
        assert!(builder.build(&empty_boolean).is_err());

        let empty_phrase = StructuredQuery::Proximity {
            words: vec![],
            slop: 4,
        };
        assert!(builder.build(&empty_phrase).is_err());

        let bad_field = StructuredQuery::Range {
            field: "Body".to_string(),
            start: 0,
            end: 1,
        };
        assert!(builder.build(&bad_field).is_err());

        let reversed = StructuredQuery::Range {
            field: "mod_date".to_string(),
            start: 10,
            end: 1,
        };
        assert!(builder.build(&reversed).is_err());

        assert!(builder.build(&StructuredQuery::Wildcard("  ".to_string())).is_err());
        assert!(builder.build(&StructuredQuery::Text(" ".to_string())).is_err());
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let index = index();
        let builder = QueryBuilder::new(&index, &SearchConfig::default()).unwrap();

        assert!(matches!(
            builder.build(&StructuredQuery::Text("Nope:rust".to_string())),
            Err(SearchError::QueryParse(_))
        ));
    }
}
