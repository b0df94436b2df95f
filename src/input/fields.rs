//! Typed field access on one JSON object of the request document

use serde_json::{Map, Value};

use super::EntityKind;
use crate::elements::Fixity;
use crate::error::{SchemaError, SchemaProblem};

/// Reads fields out of one collection entry, recording every problem found
///
/// Accessors return `None` when the field is missing or malformed; the
/// problem itself is kept and handed back by [`FieldReader::finish`].
pub(super) struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    entity: EntityKind,
    index: usize,
    id: Option<i64>,
    errors: Vec<SchemaError>,
}

impl<'a> FieldReader<'a> {
    pub fn new(object: &'a Map<String, Value>, entity: EntityKind, index: usize) -> Self {
        Self {
            object,
            entity,
            index,
            id: None,
            errors: Vec::new(),
        }
    }

    /// Attach the entry's id to every problem reported from now on
    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    /// Id attached by [`FieldReader::set_id`]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn report(&mut self, field: &str, problem: SchemaProblem) {
        self.errors.push(
            SchemaError::new(self.entity, Some(self.index), field, problem).with_id(self.id),
        );
    }

    /// Raw value of an optional field, without reporting anything
    pub fn peek(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field)
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let value = self.object.get(field);
        if value.is_none() {
            self.report(field, SchemaProblem::Missing);
        }
        value
    }

    fn typed<T>(
        &mut self,
        field: &str,
        expected: &'static str,
        convert: impl Fn(&'a Value) -> Option<T>,
    ) -> Option<T> {
        let value = self.required(field)?;
        let converted = convert(value);
        if converted.is_none() {
            self.report(field, SchemaProblem::WrongType { expected });
        }
        converted
    }

    pub fn integer(&mut self, field: &str) -> Option<i64> {
        self.typed(field, "an integer", Value::as_i64)
    }

    pub fn number(&mut self, field: &str) -> Option<f64> {
        self.typed(field, "a number", Value::as_f64)
    }

    pub fn string(&mut self, field: &str) -> Option<&'a str> {
        self.typed(field, "a string", Value::as_str)
    }

    /// A number strictly greater than zero
    pub fn positive(&mut self, field: &str) -> Option<f64> {
        let value = self.number(field)?;
        if value > 0.0 {
            Some(value)
        } else {
            self.report(field, SchemaProblem::NonPositive(value));
            None
        }
    }

    /// An array of exactly `N` entries, each converted by `item`
    fn array<T: Copy + Default, const N: usize>(
        &mut self,
        field: &str,
        expected: &'static str,
        item_expected: &'static str,
        item: impl Fn(&'a Value) -> Option<T>,
    ) -> Option<[T; N]> {
        let items = self.typed(field, expected, Value::as_array)?;
        if items.len() != N {
            self.report(
                field,
                SchemaProblem::WrongLength {
                    expected: N,
                    found: items.len(),
                },
            );
            return None;
        }

        let mut out = [T::default(); N];
        let mut complete = true;
        for (k, value) in items.iter().enumerate() {
            match item(value) {
                Some(v) => out[k] = v,
                None => {
                    self.report(
                        &format!("{}[{}]", field, k),
                        SchemaProblem::WrongType {
                            expected: item_expected,
                        },
                    );
                    complete = false;
                }
            }
        }
        complete.then_some(out)
    }

    pub fn numbers<const N: usize>(&mut self, field: &str) -> Option<[f64; N]> {
        self.array(field, "an array of numbers", "a number", Value::as_f64)
    }

    pub fn integers<const N: usize>(&mut self, field: &str) -> Option<[i64; N]> {
        self.array(field, "an array of integers", "an integer", Value::as_i64)
    }

    /// Optional `[ux, uy, rz]` restraint flags, each a boolean or an integer
    ///
    /// Returns `Ok(None)` when the field is absent and `Err(())` when it is
    /// present but malformed.
    pub fn fixity(&mut self, field: &str) -> Result<Option<Fixity>, ()> {
        if self.peek(field).is_none() {
            return Ok(None);
        }
        self.array(field, "an array of flags", "a boolean or integer", restraint_flag)
            .map(|flags| Some(Fixity::from_flags(flags)))
            .ok_or(())
    }

    pub fn finish(self) -> Vec<SchemaError> {
        self.errors
    }
}

/// Non-zero integers and `true` restrain
fn restraint_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        _ => value.as_i64().map(|v| v != 0),
    }
}
