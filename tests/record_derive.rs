use shaya::{FieldValue, Record, RecordError};

#[derive(Clone, Debug, Default, PartialEq, shaya::Record)]
struct Shipment {
    id: Option<i64>,
    r#type: String,
    bags: i64,
    destination: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, shaya::Record)]
struct Tagged<T: Clone + Default + shaya::ToFieldValue + shaya::FromFieldValue> {
    value: T,
}

#[test]
fn raw_identifiers_are_unprefixed() {
    assert_eq!(
        Shipment::field_names(),
        &["id", "type", "bags", "destination"]
    );
    assert!(Shipment::has_field("type"));
    assert!(!Shipment::has_field("r#type"));
}

#[test]
fn get_reads_every_field() {
    let shipment = Shipment {
        id: Some(8),
        r#type: "pergamino".to_string(),
        bags: 40,
        destination: None,
    };
    assert_eq!(shipment.get("id"), Some(FieldValue::Number(8)));
    assert_eq!(shipment.get("type"), Some(FieldValue::from("pergamino")));
    assert_eq!(shipment.get("bags"), Some(FieldValue::Number(40)));
    assert_eq!(shipment.get("destination"), Some(FieldValue::Null));
    assert_eq!(shipment.get("edit"), None);
}

#[test]
fn set_converts_text_input() {
    let mut shipment = Shipment::default();
    shipment.set("bags", FieldValue::from(" 12 ")).unwrap();
    shipment.set("type", FieldValue::from("excelso")).unwrap();
    shipment
        .set("destination", FieldValue::from("Hamburgo"))
        .unwrap();
    assert_eq!(
        shipment,
        Shipment {
            id: None,
            r#type: "excelso".to_string(),
            bags: 12,
            destination: Some("Hamburgo".to_string()),
        }
    );
}

#[test]
fn set_reports_bad_values() {
    let mut shipment = Shipment::default();
    assert_eq!(
        shipment.set("bags", FieldValue::Null),
        Err(RecordError::InvalidValue {
            field: "bags".to_string(),
            reason: "a number is required".to_string(),
        })
    );
    let err = shipment.set("bags", FieldValue::from("doce")).unwrap_err();
    assert_eq!(err.to_string(), "Invalid value for 'bags': 'doce' is not a number");
    assert_eq!(
        shipment.set("weight", FieldValue::Number(1)),
        Err(RecordError::UnknownField("weight".to_string()))
    );
    assert_eq!(shipment, Shipment::default());
}

#[test]
fn generic_records_derive() {
    let mut tagged = Tagged::<i64>::default();
    tagged.set("value", FieldValue::Number(3)).unwrap();
    assert_eq!(tagged.get("value"), Some(FieldValue::Number(3)));
    assert_eq!(Tagged::<String>::field_names(), &["value"]);
}
