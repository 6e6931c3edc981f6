use criterion::{Criterion, criterion_group, criterion_main};
use odata_filter::analyzer::ResourceContext;
use odata_filter::model::{EdmMultiplicity, EdmSimpleTypeKind, Schema};
use odata_filter::parser::{FilterParser, Tokenizer, parse_filter, parse_order_by};
use std::hint::black_box;

const EXPRESSIONS: &[&str] = &[
    "EmployeeName eq 'Walter Winter'",
    "Age gt 30 and Age le 60",
    "startswith(EmployeeName, 'W') or substringof('inter', EmployeeName)",
    "Location/City/PostalCode eq '69124' and ne_Team/Name ne 'Team 2'",
    "(Age add 5) mul 2L gt 100 and not (EntryDate lt datetime'2003-01-01T00:00')",
    "round(Salary) eq 1500M or length(concat(EmployeeName, ' ', EmployeeName)) gt 20",
];

fn schema() -> Schema {
    let mut schema = Schema::new("RefScenario");
    schema
        .add_entity_type("Employee")
        .simple("EmployeeName", EdmSimpleTypeKind::String)
        .simple("Age", EdmSimpleTypeKind::Int32)
        .simple("Salary", EdmSimpleTypeKind::Decimal)
        .simple("EntryDate", EdmSimpleTypeKind::DateTime)
        .complex("Location", "c_Location")
        .navigation("ne_Team", "Team", EdmMultiplicity::One);
    schema
        .add_entity_type("Team")
        .simple("Name", EdmSimpleTypeKind::String);
    schema
        .add_complex_type("c_Location")
        .complex("City", "c_City");
    schema
        .add_complex_type("c_City")
        .simple("PostalCode", EdmSimpleTypeKind::String);
    schema
}

fn benchmark_tokenizer(c: &mut Criterion) {
    let expression = EXPRESSIONS[3];

    c.bench_function("tokenizer", |b| {
        b.iter(|| {
            let mut tokenizer = Tokenizer::new(black_box(expression));
            let mut token_count = 0;
            while let Ok(Some(_)) = tokenizer.next_token() {
                token_count += 1;
            }
            black_box(token_count)
        })
    });
}

fn benchmark_untyped(c: &mut Criterion) {
    for (i, expression) in EXPRESSIONS.iter().enumerate() {
        c.bench_function(&format!("expr_{i}_untyped"), |b| {
            b.iter(|| black_box(parse_filter(black_box(expression))))
        });
    }
}

fn benchmark_typed(c: &mut Criterion) {
    let schema = schema();
    let Some(employee) = schema.entity_type("Employee") else {
        return;
    };
    let parser = FilterParser::with_resource(ResourceContext::new(&schema, employee));

    let mut group = c.benchmark_group("typed");
    for (i, expression) in EXPRESSIONS.iter().enumerate() {
        group.bench_function(format!("expr_{i}"), |b| {
            b.iter(|| black_box(parser.parse_filter(black_box(expression))))
        });
    }
    group.finish();
}

fn benchmark_order_by(c: &mut Criterion) {
    let expression = "Age desc, EmployeeName, Location/City/PostalCode asc";

    c.bench_function("order_by", |b| {
        b.iter(|| black_box(parse_order_by(black_box(expression))))
    });
}

criterion_group!(
    benches,
    benchmark_tokenizer,
    benchmark_untyped,
    benchmark_typed,
    benchmark_order_by
);
criterion_main!(benches);
