use query_engine_metadata::metadata::{
    FieldSpec, FilterOperator, QueryConfiguration, SortDirection, ValueType,
};
use query_engine_translation::translation::query::{self, ParsedRequest, Predicate, QueryParams};

/// The capabilities of the products list endpoint.
pub fn products_configuration() -> QueryConfiguration {
    QueryConfiguration::empty()
        .with_field(
            "id",
            FieldSpec::new("id", ValueType::Number)
                .sortable()
                .filterable(&[FilterOperator::Eq]),
        )
        .with_field(
            "categoryId",
            FieldSpec::new("category_id", ValueType::Number)
                .sortable()
                .filterable(&[FilterOperator::Eq]),
        )
        .with_field(
            "name",
            FieldSpec::new("name", ValueType::String)
                .sortable()
                .filterable(&[FilterOperator::Like]),
        )
        .with_field(
            "status",
            FieldSpec::new("status", ValueType::String)
                .with_column_type("product_status")
                .sortable()
                .filterable(&[FilterOperator::Like, FilterOperator::Eq]),
        )
        .with_field(
            "price",
            FieldSpec::new("price", ValueType::Number)
                .sortable()
                .filterable(&[FilterOperator::Gte, FilterOperator::Lte]),
        )
        .with_field(
            "stock",
            FieldSpec::new("stock", ValueType::Number)
                .sortable()
                .filterable(&[FilterOperator::Gte, FilterOperator::Lte]),
        )
        .with_field(
            "availableAt",
            FieldSpec::new("available_at", ValueType::Date)
                .sortable()
                .filterable(&[FilterOperator::Gte, FilterOperator::Lte]),
        )
        .with_field(
            "isActive",
            FieldSpec::new("is_active", ValueType::Boolean).filterable(&[FilterOperator::Eq]),
        )
        .with_field(
            "ownerId",
            FieldSpec::new("owner_id", ValueType::Uuid)
                .filterable(&[FilterOperator::Eq, FilterOperator::Ne]),
        )
        .with_field("createdAt", FieldSpec::new("created_at", ValueType::Date).sortable())
        .with_field("updatedAt", FieldSpec::new("updated_at", ValueType::Date))
        .with_default_sort("id", SortDirection::Asc)
}

/// Parse a raw query string against the products configuration.
pub fn parse_products(query_string: &str) -> ParsedRequest {
    parse_products_with(query_string, vec![])
}

pub fn parse_products_with(query_string: &str, extra_predicates: Vec<Predicate>) -> ParsedRequest {
    query::parse(
        &QueryParams::parse(query_string),
        &products_configuration(),
        extra_predicates,
    )
}
