//! Case-insensitive field matching on top of a parsed `serde_json::Value`.
//!
//! [`CaseInsensitive`] is a `serde::Deserializer` that behaves like
//! `serde_json::Value`'s own, except that when the target asks for a struct
//! it renames object keys to the struct's declared field names ignoring
//! letter case. An exact key always wins over a folded one; among folded
//! keys the first in document order claims the field and the rest are left
//! as unknown fields.
//!
//! Folding applies wherever serde calls `deserialize_struct` (plain structs,
//! struct variants, and through `Option`, `Vec`, maps and newtypes). Types
//! that buffer their input first (`#[serde(flatten)]`, internally tagged or
//! untagged enums) see the keys unchanged.

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    Unexpected, VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use serde_json::{map, Error, Map, Value};

/// Deserialize `T` from `value`, matching struct fields case-insensitively.
pub(crate) fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(CaseInsensitive(value))
}

pub(crate) struct CaseInsensitive(Value);

fn fold_keys(object: Map<String, Value>, fields: &'static [&'static str]) -> Map<String, Value> {
    let mut claimed: Vec<&'static str> = fields
        .iter()
        .copied()
        .filter(|field| object.contains_key(*field))
        .collect();

    let mut folded = Map::with_capacity(object.len());
    for (key, value) in object {
        if fields.iter().any(|field| *field == key) {
            folded.insert(key, value);
            continue;
        }
        let lower = key.to_lowercase();
        match fields
            .iter()
            .copied()
            .find(|field| !claimed.contains(field) && field.to_lowercase() == lower)
        {
            Some(field) => {
                claimed.push(field);
                folded.insert(field.to_string(), value);
            }
            None => {
                folded.insert(key, value);
            }
        }
    }
    folded
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Unexpected::Unsigned(u)
            } else if let Some(i) = n.as_i64() {
                Unexpected::Signed(i)
            } else {
                Unexpected::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

/// Numbers go through `serde_json::Value`'s own deserializer so that, with
/// `arbitrary_precision`, 128-bit integers resolve exactly as they do when
/// parsing straight from text.
macro_rules! deserialize_number {
    ($($method:ident)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                match self.0 {
                    number @ Value::Number(_) => de::Deserializer::$method(number, visitor),
                    other => de::Deserializer::deserialize_any(CaseInsensitive(other), visitor),
                }
            }
        )*
    };
}

fn visit_array<'de, V: Visitor<'de>>(items: Vec<Value>, visitor: V) -> Result<V::Value, Error> {
    let len = items.len();
    let mut seq = SeqDeserializer {
        iter: items.into_iter(),
    };
    let out = visitor.visit_seq(&mut seq)?;
    if seq.iter.next().is_none() {
        Ok(out)
    } else {
        Err(de::Error::invalid_length(len, &"fewer elements in array"))
    }
}

fn visit_object<'de, V: Visitor<'de>>(
    object: Map<String, Value>,
    visitor: V,
) -> Result<V::Value, Error> {
    let len = object.len();
    let mut access = MapDeserializer {
        iter: object.into_iter(),
        value: None,
    };
    let out = visitor.visit_map(&mut access)?;
    if access.iter.next().is_none() {
        Ok(out)
    } else {
        Err(de::Error::invalid_length(len, &"fewer elements in map"))
    }
}

impl<'de> de::Deserializer<'de> for CaseInsensitive {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            number @ Value::Number(_) => de::Deserializer::deserialize_any(number, visitor),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(items) => visit_array(items, visitor),
            Value::Object(object) => visit_object(object, visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(CaseInsensitive(other)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.0 {
            Value::Object(object) => visit_object(fold_keys(object, fields), visitor),
            other => de::Deserializer::deserialize_any(CaseInsensitive(other), visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.0 {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            Value::Object(object) => {
                let mut iter = object.into_iter();
                match (iter.next(), iter.next()) {
                    (Some((variant, value)), None) => visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: Some(value),
                    }),
                    _ => Err(de::Error::invalid_value(
                        Unexpected::Map,
                        &"map with a single key",
                    )),
                }
            }
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"string or map",
            )),
        }
    }

    deserialize_number! {
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
        deserialize_f32 deserialize_f64
    }

    forward_to_deserialize_any! {
        bool char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl<'de> SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Error> {
        match self.iter.next() {
            Some(value) => seed.deserialize(CaseInsensitive(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: map::IntoIter,
    value: Option<Value>,
}

impl<'de> MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Error> {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(MapKey(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        match self.value.take() {
            Some(value) => seed.deserialize(CaseInsensitive(value)),
            None => Err(de::Error::custom("value is missing")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// Object key. JSON keys are always strings, but map types keyed by numbers
/// or booleans expect the key parsed.
struct MapKey(String);

macro_rules! deserialize_parsed_key {
    ($($method:ident => $visit:ident,)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                match self.0.parse() {
                    Ok(parsed) => visitor.$visit(parsed),
                    Err(_) => Err(de::Error::invalid_value(Unexpected::Str(&self.0), &visitor)),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for MapKey {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_string(self.0)
    }

    deserialize_parsed_key! {
        deserialize_bool => visit_bool,
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_i128 => visit_i128,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_u128 => visit_u128,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_enum(EnumDeserializer {
            variant: self.0,
            value: None,
        })
    }

    forward_to_deserialize_any! {
        char str string bytes byte_buf option unit unit_struct seq
        tuple tuple_struct map struct identifier ignored_any
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, VariantDeserializer), Error> {
        let variant: de::value::StringDeserializer<Error> = self.variant.into_deserializer();
        let tag = seed.deserialize(variant)?;
        Ok((tag, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Error> {
        match self.value {
            None | Some(Value::Null) => Ok(()),
            Some(other) => Err(de::Error::invalid_type(
                unexpected(&other),
                &"unit variant",
            )),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, Error> {
        match self.value {
            Some(value) => seed.deserialize(CaseInsensitive(value)),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"newtype variant",
            )),
        }
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Some(Value::Array(items)) => visit_array(items, visitor),
            Some(other) => Err(de::Error::invalid_type(
                unexpected(&other),
                &"tuple variant",
            )),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"tuple variant",
            )),
        }
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.value {
            Some(Value::Object(object)) => visit_object(fold_keys(object, fields), visitor),
            Some(other) => Err(de::Error::invalid_type(
                unexpected(&other),
                &"struct variant",
            )),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"struct variant",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default, rename_all = "PascalCase")]
    struct Widget {
        name: String,
        value: i32,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Order {
        order_id: u64,
        widgets: Vec<Widget>,
        primary: Option<Widget>,
        by_slot: BTreeMap<u32, Widget>,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    enum Shape {
        Point,
        Circle(f64),
        Rect { width: u32, height: u32 },
    }

    #[test]
    fn test_fold_plain_struct() {
        let w: Widget = from_value(json!({"name": "Widgets", "VALUE": 100})).unwrap();
        assert_eq!(
            w,
            Widget {
                name: "Widgets".into(),
                value: 100
            }
        );
    }

    #[test]
    fn test_fold_reaches_nested_containers() {
        let order: Order = from_value(json!({
            "ORDERID": 7,
            "Widgets": [{"name": "a", "value": 1}],
            "PRIMARY": {"NAME": "b"},
            "bySlot": {"3": {"vAlUe": 9}},
        }))
        .unwrap();

        assert_eq!(order.order_id, 7);
        assert_eq!(order.widgets[0].name, "a");
        assert_eq!(order.primary.unwrap().name, "b");
        assert_eq!(order.by_slot[&3].value, 9);
    }

    #[test]
    fn test_exact_match_wins_over_folded() {
        let w: Widget = from_value(json!({"NAME": "folded", "Name": "exact"})).unwrap();
        assert_eq!(w.name, "exact");
    }

    #[test]
    fn test_first_folded_key_wins() {
        let w: Widget = from_value(json!({"name": "first", "NAME": "second"})).unwrap();
        assert_eq!(w.name, "first");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let w: Widget = from_value(json!({"name": "x", "color": "red"})).unwrap();
        assert_eq!(w.name, "x");
        assert_eq!(w.value, 0);
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let value: Value = serde_json::from_str(r#"{"name":"a","name":"b"}"#).unwrap();
        let w: Widget = from_value(value).unwrap();
        assert_eq!(w.name, "b");
    }

    #[test]
    fn test_wide_integers_resolve_exactly() {
        let value: Value = serde_json::from_str(
            r#"{"max":340282366920938463463374607431768211455,"min":-170141183460469231731687303715884105728}"#,
        )
        .unwrap();
        let max: u128 = from_value(value["max"].clone()).unwrap();
        let min: i128 = from_value(value["min"].clone()).unwrap();
        assert_eq!(max, u128::MAX);
        assert_eq!(min, i128::MIN);

        let keyed: HashMap<u128, bool> =
            from_value(json!({"340282366920938463463374607431768211455": true})).unwrap();
        assert!(keyed[&u128::MAX]);
    }

    #[test]
    fn test_enums() {
        let shapes: Vec<Shape> = from_value(json!([
            "Point",
            {"Circle": 1.5},
            {"Rect": {"WIDTH": 2, "Height": 3}},
        ]))
        .unwrap();
        assert_eq!(
            shapes,
            vec![
                Shape::Point,
                Shape::Circle(1.5),
                Shape::Rect {
                    width: 2,
                    height: 3
                },
            ]
        );
    }

    #[test]
    fn test_enum_with_two_keys_rejected() {
        let res: Result<Shape, _> = from_value(json!({"Point": null, "Circle": 1.0}));
        assert!(res.is_err());
    }

    #[test]
    fn test_numeric_map_keys() {
        let m: HashMap<i32, bool> = from_value(json!({"-1": true, "2": false})).unwrap();
        assert!(m[&-1]);
        assert!(!m[&2]);

        let bad: Result<HashMap<u8, bool>, _> = from_value(json!({"x": true}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_type_mismatch_is_error() {
        let res: Result<Widget, _> = from_value(json!({"Value": "not a number"}));
        assert!(res.unwrap_err().is_data());
    }

    #[test]
    fn test_scalars_and_tuples() {
        let t: (u8, i64, f64, bool, String, Option<u8>) =
            from_value(json!([1, -2, 0.5, true, "s", null])).unwrap();
        assert_eq!(t, (1, -2, 0.5, true, "s".to_string(), None));

        let too_long: Result<(u8,), _> = from_value(json!([1, 2]));
        assert!(too_long.is_err());
    }
}
