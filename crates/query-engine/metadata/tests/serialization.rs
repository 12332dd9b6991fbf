use similar_asserts::assert_eq;

use query_engine_metadata::metadata::{
    DefaultSort, FieldSpec, FilterOperator, QueryConfiguration, SortDirection, ValueType,
};

#[test]
fn deserializes_field_capabilities_with_defaults() {
    let configuration: QueryConfiguration = serde_json::from_value(serde_json::json!({
        "fields": {
            "id": { "column": "id", "type": "number", "sortable": true, "filters": ["eq"] },
            "createdAt": { "column": "created_at", "type": "date" }
        },
        "defaultSort": [{ "field": "id" }]
    }))
    .unwrap();

    let expected = QueryConfiguration::empty()
        .with_field(
            "id",
            FieldSpec::new("id", ValueType::Number)
                .sortable()
                .filterable(&[FilterOperator::Eq]),
        )
        .with_field("createdAt", FieldSpec::new("created_at", ValueType::Date))
        .with_default_sort("id", SortDirection::Asc);

    assert_eq!(configuration, expected);
}

#[test]
fn serialization_keeps_declaration_order() {
    let configuration = QueryConfiguration::empty()
        .with_field("name", FieldSpec::new("name", ValueType::String))
        .with_field("id", FieldSpec::new("id", ValueType::Number))
        .with_field("status", FieldSpec::new("status", ValueType::String));

    let serialized = serde_json::to_value(&configuration).unwrap();
    let keys: Vec<&String> = serialized["fields"].as_object().unwrap().keys().collect();

    assert_eq!(keys, vec!["name", "id", "status"]);
}

#[test]
fn omitted_filters_are_not_serialized_as_an_empty_list() {
    let spec = FieldSpec::new("updated_at", ValueType::Date).sortable();
    let serialized = serde_json::to_value(&spec).unwrap();

    assert_eq!(
        serialized,
        serde_json::json!({ "column": "updated_at", "type": "date", "sortable": true })
    );
}

#[test]
fn default_sort_order_may_be_omitted() {
    let default_sort: DefaultSort =
        serde_json::from_value(serde_json::json!({ "field": "name" })).unwrap();
    assert_eq!(default_sort.order, None);
    assert_eq!(
        serde_json::to_value(&default_sort).unwrap(),
        serde_json::json!({ "field": "name" })
    );

    let default_sort: DefaultSort =
        serde_json::from_value(serde_json::json!({ "field": "name", "order": "asc" })).unwrap();
    assert_eq!(default_sort.order, Some(SortDirection::Asc));
}
