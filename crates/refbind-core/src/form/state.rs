use crate::{
    form::{FormBinding, FormError, FormPath, PathSegment},
    model::CareerRecord,
};
use serde_json::Value;

///
/// FormState
///
/// In-memory form value held as a JSON tree.
/// `set` never creates intermediate containers: the parent of the written
/// path must already exist with the right shape.
///

#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    values: Value,
}

impl FormState {
    #[must_use]
    pub const fn new(values: Value) -> Self {
        Self { values }
    }

    /// Seed the form from a typed record.
    pub fn from_record(record: &CareerRecord) -> Result<Self, FormError> {
        let values =
            serde_json::to_value(record).map_err(|err| FormError::encode(&FormPath::root(), &err))?;

        Ok(Self { values })
    }

    /// Decode the current form value back into a typed record.
    pub fn to_record(&self) -> Result<CareerRecord, FormError> {
        serde_json::from_value(self.values.clone())
            .map_err(|err| FormError::decode(&FormPath::root(), &err))
    }

    #[must_use]
    pub const fn values(&self) -> &Value {
        &self.values
    }

    fn node(&self, path: &FormPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.values, |node, seg| match seg {
                PathSegment::Field(name) => node.as_object()?.get(name),
                PathSegment::Index(index) => node.as_array()?.get(*index),
            })
    }

    fn node_mut(&mut self, path: &FormPath) -> Option<&mut Value> {
        path.segments()
            .iter()
            .try_fold(&mut self.values, |node, seg| match seg {
                PathSegment::Field(name) => node.as_object_mut()?.get_mut(name),
                PathSegment::Index(index) => node.as_array_mut()?.get_mut(*index),
            })
    }
}

impl From<Value> for FormState {
    fn from(values: Value) -> Self {
        Self::new(values)
    }
}

impl FormBinding for FormState {
    fn get(&self, path: &FormPath) -> Option<Value> {
        self.node(path).cloned()
    }

    fn set(&mut self, path: &FormPath, value: Value) -> Result<(), FormError> {
        let Some((parent_path, last)) = path.split_last() else {
            self.values = value;
            return Ok(());
        };

        let parent = self
            .node_mut(&parent_path)
            .ok_or_else(|| FormError::not_found(&parent_path))?;

        match last {
            PathSegment::Field(name) => {
                let object = parent
                    .as_object_mut()
                    .ok_or_else(|| FormError::type_mismatch(&parent_path, "object"))?;
                object.insert(name.clone(), value);
            }
            PathSegment::Index(index) => {
                let array = parent
                    .as_array_mut()
                    .ok_or_else(|| FormError::type_mismatch(&parent_path, "array"))?;
                let len = array.len();
                let slot = array
                    .get_mut(*index)
                    .ok_or_else(|| FormError::IndexOutOfRange {
                        path: parent_path.to_string(),
                        index: *index,
                        len,
                    })?;
                *slot = value;
            }
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> FormState {
        FormState::new(json!({
            "company": "Acme",
            "appointment": { "position": "Engineer", "references": [] },
            "skills": ["Welding", "Rigging"],
        }))
    }

    #[test]
    fn get_walks_objects_and_arrays() {
        let form = form();

        assert_eq!(form.get(&FormPath::parse("skills.1")), Some(json!("Rigging")));
        assert_eq!(
            form.get(&FormPath::parse("appointment.position")),
            Some(json!("Engineer"))
        );
        assert_eq!(form.get(&FormPath::parse("skills.7")), None);
        assert_eq!(form.get(&FormPath::parse("company.name")), None);
    }

    #[test]
    fn set_replaces_existing_and_inserts_new_keys() {
        let mut form = form();

        form.set(&FormPath::parse("skills.0"), json!("Advanced Welding"))
            .expect("set existing element should succeed");
        form.set(&FormPath::parse("appointment.rank"), json!("Captain"))
            .expect("set new key should succeed");

        assert_eq!(form.get(&FormPath::parse("skills.0")), Some(json!("Advanced Welding")));
        assert_eq!(form.get(&FormPath::parse("appointment.rank")), Some(json!("Captain")));
    }

    #[test]
    fn set_never_creates_intermediate_containers() {
        let mut form = form();
        let before = form.clone();

        let err = form
            .set(&FormPath::parse("missing.field"), json!(1))
            .expect_err("missing parent must be rejected");
        assert!(matches!(err, FormError::PathNotFound { .. }));

        let err = form
            .set(&FormPath::parse("skills.2"), json!("Painting"))
            .expect_err("writing past the end must be rejected");
        assert_eq!(
            err,
            FormError::IndexOutOfRange {
                path: "skills".to_string(),
                index: 2,
                len: 2,
            }
        );

        assert_eq!(form, before);
    }

    #[test]
    fn array_helpers_round_trip_through_set() {
        let mut form = form();
        let list = FormPath::parse("skills");

        form.append(&list, json!("Painting")).expect("append should succeed");
        form.update(&list, 0, json!("Welding II")).expect("update should succeed");
        let removed = form.remove(&list, 1).expect("remove should succeed");

        assert_eq!(removed, json!("Rigging"));
        assert_eq!(form.get(&list), Some(json!(["Welding II", "Painting"])));
        assert!(form.update(&list, 5, json!("x")).is_err());
    }
}
