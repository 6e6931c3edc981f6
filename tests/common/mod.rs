//! Shared schema for the integration tests

#![allow(dead_code)]

use odata_filter::analyzer::ResourceContext;
use odata_filter::model::Schema;
use odata_filter::{FilterExpression, FilterParser, ParseResult};

pub const REF_SCENARIO: &str = r#"{
    "namespace": "RefScenario",
    "entity_types": [
        { "name": "Employee", "properties": [
            { "name": "EmployeeId", "type": "Edm.String" },
            { "name": "EmployeeName", "type": "Edm.String" },
            { "name": "Age", "type": "Edm.Int32" },
            { "name": "Grade", "type": "Edm.Byte" },
            { "name": "Salary", "type": "Edm.Decimal" },
            { "name": "Rating", "type": "Edm.Double" },
            { "name": "EntryDate", "type": "Edm.DateTime" },
            { "name": "BirthTime", "type": "Edm.Time" },
            { "name": "ImageData", "type": "Edm.Binary" },
            { "name": "IsActive", "type": "Edm.Boolean" },
            { "name": "concat", "type": "Edm.String" },
            { "name": "Location", "type": "complex:c_Location" },
            { "name": "ne_Team", "type": "entity:Team" },
            { "name": "ne_Manager", "type": "entity:Manager", "multiplicity": "zero_or_one" }
        ] },
        { "name": "Team", "properties": [
            { "name": "Id", "type": "Edm.String" },
            { "name": "Name", "type": "Edm.String" },
            { "name": "isScrumTeam", "type": "Edm.Boolean" },
            { "name": "nt_Employees", "type": "entity:Employee", "multiplicity": "many" }
        ] },
        { "name": "Manager", "properties": [
            { "name": "EmployeeName", "type": "Edm.String" },
            { "name": "nm_Employees", "type": "entity:Employee", "multiplicity": "many" }
        ] }
    ],
    "complex_types": [
        { "name": "c_Location", "properties": [
            { "name": "Country", "type": "Edm.String" },
            { "name": "City", "type": "complex:c_City" }
        ] },
        { "name": "c_City", "properties": [
            { "name": "PostalCode", "type": "Edm.String" },
            { "name": "CityName", "type": "Edm.String" }
        ] }
    ]
}"#;

pub fn ref_scenario() -> Schema {
    Schema::from_json(REF_SCENARIO).expect("reference schema loads")
}

pub fn typed_parser<'m>(schema: &'m Schema, entity_type: &str) -> FilterParser<'m> {
    let entity_type = schema
        .entity_type(entity_type)
        .expect("entity type exists in reference schema");
    FilterParser::with_resource(ResourceContext::new(schema, entity_type))
}

pub fn parse_typed(entity_type: &str, expression: &str) -> ParseResult<FilterExpression> {
    let schema = ref_scenario();
    typed_parser(&schema, entity_type).parse_filter(expression)
}
