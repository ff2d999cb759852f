use bus::Payload;

use crate::error::RecordSide;

/// Field-wise override of `current` by `partial`, one level deep.
///
/// Every field of `partial` replaces the field of the same name in `current`, fields absent from
/// `partial` are kept. Nested records are replaced as a whole, never combined.
pub(crate) fn merge_fields(current: Payload, partial: Payload) -> Result<Payload, (RecordSide, &'static str)> {
    let mut fields = match current {
        Payload::Object(fields) => fields,
        other => return Err((RecordSide::Current, kind(&other))),
    };
    let overrides = match partial {
        Payload::Object(overrides) => overrides,
        other => return Err((RecordSide::Partial, kind(&other))),
    };

    for (name, value) in overrides {
        fields.insert(name, value);
    }

    Ok(Payload::Object(fields))
}

fn kind(payload: &Payload) -> &'static str {
    match payload {
        Payload::Null => "null",
        Payload::Bool(_) => "boolean",
        Payload::Number(_) => "number",
        Payload::String(_) => "string",
        Payload::Array(_) => "array",
        Payload::Object(_) => "record",
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!({"x": 1, "y": 2}), json!({"y": 5}), json!({"x": 1, "y": 5}))]
    #[case(json!({"x": 1}), json!({}), json!({"x": 1}))]
    #[case(json!({}), json!({"x": 1}), json!({"x": 1}))]
    #[case(json!({"x": 1}), json!({"z": null}), json!({"x": 1, "z": null}))]
    #[case(
        json!({"window": {"width": 800, "height": 600}, "title": "a"}),
        json!({"window": {"width": 1024}}),
        json!({"window": {"width": 1024}, "title": "a"})
    )]
    #[case(json!({"tags": ["a", "b"]}), json!({"tags": ["c"]}), json!({"tags": ["c"]}))]
    fn merge(#[case] current: Payload, #[case] partial: Payload, #[case] expected: Payload) {
        // when
        let result = merge_fields(current, partial);

        // then
        assert_eq!(result.unwrap(), expected);
    }

    #[rstest]
    #[case(json!([1]), json!({}), RecordSide::Current, "array")]
    #[case(json!(null), json!({}), RecordSide::Current, "null")]
    #[case(json!({}), json!(5), RecordSide::Partial, "number")]
    #[case(json!({}), json!("x"), RecordSide::Partial, "string")]
    #[case(json!({}), json!(true), RecordSide::Partial, "boolean")]
    fn merge_requires_records(
        #[case] current: Payload,
        #[case] partial: Payload,
        #[case] expected_side: RecordSide,
        #[case] expected_kind: &str,
    ) {
        // when
        let result = merge_fields(current, partial);

        // then
        assert_eq!(result, Err((expected_side, expected_kind)));
    }
}
