//! End-to-end tests through the `sieve` facade.
//!
//! A declared request is assembled into a predicate, evaluated by the CRUD
//! service over an in-memory repository, and rendered as SQL.

use pretty_assertions::assert_eq;
use sieve::prelude::*;
use sieve::query::{EntitySchema, Schema};

#[derive(Debug, Clone, PartialEq)]
struct Person {
    id: i64,
    name: String,
    age: i64,
    city: Option<String>,
}

entity!(Person as "people" {
    id: FieldType::Int,
    name: FieldType::Text,
    age: FieldType::Int,
    city: FieldType::optional(FieldType::Text),
});

impl Record for Person {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

#[derive(Default)]
struct PersonSearch {
    age: Option<RangeBounds>,
    name: Option<String>,
    city: Option<String>,
    ids: Option<Vec<i64>>,
}

filter_request!(PersonSearch {
    age => "Range",
    name => "Contains",
    city => "StartsWith" ignore_case = false,
    ids => "NotIn" on "id",
});

fn person(id: i64, name: &str, age: i64, city: Option<&str>) -> Person {
    Person {
        id,
        name: name.into(),
        age,
        city: city.map(str::to_string),
    }
}

fn service() -> CrudService<Person, MemoryRepository<Person>> {
    CrudService::new(MemoryRepository::with_records([
        person(1, "John", 25, Some("Oslo")),
        person(2, "Amy", 40, Some("Lima")),
        person(3, "Joanna", 17, None),
        person(4, "Bob", 33, Some("oslo")),
    ]))
}

fn names(page: &Page<Person>) -> Vec<&str> {
    page.items.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn test_range_and_contains() {
    let search = PersonSearch {
        age: Some(RangeBounds::between(18, 60)),
        name: Some("O".into()),
        ..Default::default()
    };
    let page = service().list(Some(&search), &Pagination::new()).await.unwrap();
    assert_eq!(names(&page), ["John", "Bob"]);
}

#[tokio::test]
async fn test_case_sensitive_prefix_on_optional_field() {
    let search = PersonSearch {
        city: Some("Os".into()),
        ..Default::default()
    };
    let page = service().list(Some(&search), &Pagination::new()).await.unwrap();
    assert_eq!(names(&page), ["John"]);
}

#[tokio::test]
async fn test_not_in_and_paging() {
    let search = PersonSearch {
        ids: Some(vec![2, 4]),
        ..Default::default()
    };
    let page = service().list(Some(&search), &Pagination::new().take(1)).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(names(&page), ["John"]);
    assert!(page.has_more());
}

#[tokio::test]
async fn test_unset_request_fields_are_ignored() {
    let page = service()
        .list(Some(&PersonSearch::default()), &Pagination::new())
        .await
        .unwrap();
    assert_eq!(page.total, 4);
}

#[tokio::test]
async fn test_type_mismatch_is_reported() {
    let request =
        ShapedRequest::new().with("age", FilterSpec::new("GreaterThan"), FilterValue::from("old"));
    let err = service().list(Some(&request), &Pagination::new()).await.unwrap_err();
    match err {
        CrudError::Filter(inner) => {
            assert!(inner.is_assembly());
            assert!(inner.is_conversion());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_rendered_sql() {
    let search = PersonSearch {
        age: Some(RangeBounds::between(18, 60)),
        name: Some("O".into()),
        ..Default::default()
    };
    let predicate = FilterAssembler::with_global()
        .compile_for::<Person, _>(Some(&search))
        .unwrap();
    let (sql, params) = predicate.to_sql(0);
    assert_eq!(sql, "((age >= $1 AND age <= $2) AND LOWER(name) LIKE $3)");
    assert_eq!(
        params,
        vec![FilterValue::Int(18), FilterValue::Int(60), FilterValue::Text("%o%".into())]
    );
}

#[test]
fn test_predicate_macro_matches_assembled_filter() {
    let search = PersonSearch {
        ids: Some(vec![2, 4]),
        ..Default::default()
    };
    let assembled = FilterAssembler::with_global()
        .compile_for::<Person, _>(Some(&search))
        .unwrap();
    assert_eq!(assembled, predicate!(id not in [2i64, 4i64]));
}

#[test]
fn test_entity_schema_is_exposed() {
    let schema = EntitySchema::<Person>::new();
    assert_eq!(schema.name(), "people");
    assert!(schema.field_type("city").unwrap().is_optional());
    assert!(schema.field_type("missing").is_none());
    assert!(schema.require_field("missing").unwrap_err().is_validation());
}
