//! Interval literal validation against qualifier shapes and field ranges

use sqltree::Error;
use sqltree::ast::{Literal, Span};
use sqltree::interval::{IntervalQualifier, IntervalValue, TimeUnit};
use sqltree::typing::DataType;

fn day_to_second() -> IntervalQualifier {
    IntervalQualifier::new(TimeUnit::Day, Some(TimeUnit::Second))
}

fn hour_to_minute() -> IntervalQualifier {
    IntervalQualifier::new(TimeUnit::Hour, Some(TimeUnit::Minute))
}

#[test]
fn day_to_second_parses_all_fields() {
    let fields = day_to_second()
        .validate_literal("1 2:3:4", Span::ZERO)
        .unwrap();
    assert_eq!(fields.sign, 1);
    assert_eq!(fields.day, 1);
    assert_eq!(fields.hour, 2);
    assert_eq!(fields.minute, 3);
    assert_eq!(fields.second, 4);
    assert_eq!(fields.millis, 0);
}

#[test]
fn fractional_seconds_normalize_to_milliseconds() {
    let fields = day_to_second()
        .validate_literal("0 0:0:1.5", Span::ZERO)
        .unwrap();
    assert_eq!(fields.millis, 500);

    let fields = day_to_second()
        .validate_literal("0 0:0:1.123456", Span::ZERO)
        .unwrap();
    assert_eq!(fields.millis, 123);
}

#[test]
fn malformed_shape_fails_before_range_checking() {
    assert!(matches!(
        hour_to_minute().validate_literal("1:2:3:4", Span::ZERO),
        Err(Error::InvalidIntervalLiteral { .. })
    ));
}

#[test]
fn leading_field_bound_depends_on_precision() {
    // Default leading precision is 2, so 25 hours fit (bound 10^2).
    assert!(hour_to_minute().validate_literal("25:00", Span::ZERO).is_ok());

    // With precision 1 the bound tightens to 10.
    let narrow = hour_to_minute().with_leading_precision(1);
    assert!(matches!(
        narrow.validate_literal("25:00", Span::ZERO),
        Err(Error::IntervalFieldOverflow { .. })
    ));
}

#[test]
fn secondary_fields_are_bounded_by_their_modulus() {
    assert!(matches!(
        day_to_second().validate_literal("1 24:0:0", Span::ZERO),
        Err(Error::IntervalFieldOverflow { .. })
    ));
    assert!(matches!(
        day_to_second().validate_literal("1 2:60:0", Span::ZERO),
        Err(Error::IntervalFieldOverflow { .. })
    ));
    assert!(matches!(
        IntervalQualifier::new(TimeUnit::Year, Some(TimeUnit::Month))
            .validate_literal("1-12", Span::ZERO),
        Err(Error::IntervalFieldOverflow { .. })
    ));
}

#[test]
fn signs_propagate_through_parsing() {
    let value = IntervalValue::parse("-3 0:0:0", day_to_second(), Span::ZERO).unwrap();
    assert_eq!(value.sign(), -1);

    let value = IntervalValue::parse("+5", IntervalQualifier::new(TimeUnit::Day, None), Span::ZERO)
        .unwrap();
    assert_eq!(value.sign(), 1);
}

#[test]
fn negative_interval_renders_a_single_sign() {
    // The sign lives outside the quotes; the quoted body stays unsigned.
    let value = IntervalValue::parse("-3 0:0:0", day_to_second(), Span::ZERO).unwrap();
    assert_eq!(value.text(), "3 0:0:0");
    assert_eq!(value.to_string(), "-'3 0:0:0' DAY TO SECOND");

    let literal = Literal::interval(value, Span::ZERO);
    assert_eq!(
        literal.value().to_string(),
        "INTERVAL -'3 0:0:0' DAY TO SECOND"
    );
}

#[test]
fn trailing_zero_milliseconds_are_stripped_in_canonical_text() {
    let value = IntervalValue::parse("0 0:0:1.500", day_to_second(), Span::ZERO).unwrap();
    assert_eq!(value.canonical_text(), "0 0:00:01.5");

    let value = IntervalValue::parse("0 0:0:1.000", day_to_second(), Span::ZERO).unwrap();
    assert_eq!(value.canonical_text(), "0 0:00:01");
}

#[test]
fn interval_literal_types_by_its_qualifier() {
    let qualifier = IntervalQualifier::new(TimeUnit::Year, None);
    let value = IntervalValue::parse("7", qualifier.clone(), Span::ZERO).unwrap();
    let literal = Literal::interval(value, Span::ZERO);
    assert_eq!(literal.derive_type(), DataType::Interval(qualifier));
}

#[test]
fn qualifier_display_carries_precisions() {
    assert_eq!(day_to_second().to_string(), "DAY TO SECOND");
    assert_eq!(
        IntervalQualifier::new(TimeUnit::Year, None)
            .with_leading_precision(3)
            .to_string(),
        "YEAR(3)"
    );
}
