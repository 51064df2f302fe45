//! End-to-end filter assembly tests.

use pretty_assertions::assert_eq;
use sieve_query::{
    entity, filter_request, names, Comparison, EnumType, FieldType, FilterAssembler, FilterOperator,
    FilterRegistry, FilterValue, Predicate, RangeBounds, ScalarOperator, SieveConfig,
};

#[derive(Debug, Clone)]
struct Person {
    name: String,
    nickname: Option<String>,
    age: i64,
    status: FilterValue,
}

fn status_type() -> EnumType {
    EnumType::new("Status", [("Active", 0), ("Suspended", 1)])
}

entity!(Person {
    name: FieldType::Text,
    nickname: FieldType::optional(FieldType::Text),
    age: FieldType::Int,
    status: FieldType::enumeration(status_type()),
});

fn person(name: &str, nickname: Option<&str>, age: i64, status: i64) -> Person {
    Person {
        name: name.into(),
        nickname: nickname.map(str::to_string),
        age,
        status: FilterValue::Enum(status_type().by_discriminant(status)),
    }
}

fn people() -> Vec<Person> {
    vec![
        person("John", Some("Johnny"), 25, 0),
        person("Amy", None, 40, 1),
        person("Joanna", Some("Jo"), 17, 0),
    ]
}

fn names_matching(predicate: &Predicate) -> Vec<String> {
    people()
        .into_iter()
        .filter(|p| predicate.matches(p))
        .map(|p| p.name)
        .collect()
}

#[derive(Default)]
struct PersonSearch {
    age: Option<RangeBounds>,
    name: Option<String>,
    nickname: Option<String>,
    older_than: Option<i64>,
    status: Option<Vec<String>>,
    #[allow(dead_code)]
    sort: Option<String>,
}

filter_request!(PersonSearch {
    age => "Range",
    name => "Contains" ignore_case = true,
    nickname => "StartsWith",
    older_than => "GreaterThan" on "age",
    status => "In",
});

fn compile(search: &PersonSearch) -> Predicate {
    let registry = FilterRegistry::new();
    FilterAssembler::new(&registry)
        .compile_for::<Person, _>(Some(search))
        .unwrap()
}

#[test]
fn test_range_and_contains_select_one_person() {
    let search = PersonSearch {
        age: Some(RangeBounds::between(18, 30)),
        name: Some("jo".into()),
        ..Default::default()
    };
    assert_eq!(names_matching(&compile(&search)), ["John"]);
}

#[test]
fn test_empty_request_matches_everything() {
    let predicate = compile(&PersonSearch::default());
    assert_eq!(predicate, Predicate::Always);
    assert_eq!(names_matching(&predicate).len(), 3);
}

#[test]
fn test_optional_text_field_skips_absent_values() {
    let search = PersonSearch {
        nickname: Some("JO".into()),
        ..Default::default()
    };
    assert_eq!(names_matching(&compile(&search)), ["John", "Joanna"]);
}

#[test]
fn test_target_override_and_enum_set() {
    let search = PersonSearch {
        older_than: Some(20),
        status: Some(vec!["active".into()]),
        ..Default::default()
    };
    let predicate = compile(&search);
    assert_eq!(names_matching(&predicate), ["John"]);

    let (sql, params) = predicate.to_sql(0);
    assert_eq!(sql, "(age > $1 AND status IN ($2))");
    assert_eq!(params[0], FilterValue::Int(20));
}

#[test]
fn test_range_bounds_alone() {
    let lower = PersonSearch {
        age: Some(RangeBounds::at_least(30)),
        ..Default::default()
    };
    assert_eq!(names_matching(&compile(&lower)), ["Amy"]);

    let upper = PersonSearch {
        age: Some(RangeBounds::at_most("20")),
        ..Default::default()
    };
    assert_eq!(names_matching(&compile(&upper)), ["Joanna"]);

    let neither = PersonSearch {
        age: Some(RangeBounds::default()),
        ..Default::default()
    };
    let registry = FilterRegistry::new();
    let err = FilterAssembler::new(&registry)
        .compile_for::<Person, _>(Some(&neither))
        .unwrap_err();
    assert!(err.is_assembly());
    assert!(err.is_validation());
}

#[test]
fn test_unknown_status_is_a_conversion_error() {
    let search = PersonSearch {
        status: Some(vec!["Retired".into()]),
        ..Default::default()
    };
    let registry = FilterRegistry::new();
    let err = FilterAssembler::new(&registry)
        .compile_for::<Person, _>(Some(&search))
        .unwrap_err();
    assert!(err.is_conversion());
}

#[test]
fn test_custom_operator_kind() {
    #[derive(Default)]
    struct Search {
        at_least: Option<i64>,
    }
    filter_request!(Search {
        at_least => "AtLeast" on "age",
    });

    #[derive(Debug, Default)]
    struct AtLeast {
        field: String,
        value: Option<FilterValue>,
    }

    impl FilterOperator for AtLeast {
        fn kind(&self) -> &str {
            "AtLeast"
        }
        fn shape(&self) -> sieve_query::OperatorShape {
            sieve_query::OperatorShape::Scalar
        }
        fn field(&self) -> &str {
            &self.field
        }
        fn set_field(&mut self, field: sieve_query::FieldName) {
            self.field = field.into_owned();
        }
        fn assign(&mut self, input: sieve_query::OperatorInput) -> sieve_query::FilterResult<()> {
            if let sieve_query::OperatorInput::Value(v) = input {
                self.value = Some(v);
            }
            Ok(())
        }
        fn build(&self, schema: &dyn sieve_query::Schema) -> sieve_query::FilterResult<Predicate> {
            let value = self.value.clone().unwrap_or(FilterValue::Null);
            let below = ScalarOperator::with(Comparison::LessThan, self.field.clone(), value);
            Ok(Predicate::not(below.build(schema)?))
        }
    }

    let registry = FilterRegistry::new();
    registry.register("AtLeast", || Box::new(AtLeast::default())).unwrap();
    assert!(registry.names().contains(&"AtLeast".to_string()));
    assert!(registry.contains(names::EQUALS));

    let predicate = FilterAssembler::new(&registry)
        .compile_for::<Person, _>(Some(&Search { at_least: Some(25) }))
        .unwrap();
    assert_eq!(names_matching(&predicate), ["John", "Amy"]);
}

#[test]
fn test_config_driven_request() {
    let config: SieveConfig = r#"
        [filters.aliases]
        between = "Range"

        [enums.Status]
        Active = 0
        Suspended = 1

        [schemas.people]
        name = "text"
        nickname = "text?"
        age = "int"
        status = "enum:Status"

        [requests.search]
        schema = "people"
        age = { operator = "between" }
        q = { operator = "Contains", target = "name" }
        state = { operator = "NotIn", target = "status" }
    "#
    .parse()
    .unwrap();
    config.validate().unwrap();

    let registry = config.registry().unwrap();
    let schema = config.schema("people").unwrap();
    let request = config
        .request_shape("search")
        .unwrap()
        .bind_value(&serde_json::json!({
            "age": { "start": "18" },
            "q": "O",
            "state": ["Suspended"],
            "ignored": 1,
        }))
        .unwrap();

    let predicate = config.assembler(&registry).compile(Some(&request), &schema).unwrap();
    assert_eq!(names_matching(&predicate), ["John"]);
}
