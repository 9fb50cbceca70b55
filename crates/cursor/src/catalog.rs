use serde::{Deserialize, Serialize};
use sky_pathcodec::{DataType, PropertyId};

use crate::descriptor::{
    DataDescriptor, ACTION_ID_SLOT, FIRST_PROPERTY_SLOT, TIMESTAMP_SLOT, TS_SLOT,
};
use crate::error::CatalogError;

/// Whether a property describes the object or a single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Object,
    Action,
}

impl PropertyKind {
    fn name(self) -> &'static str {
        match self {
            PropertyKind::Object => "object",
            PropertyKind::Action => "action",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub data_type: DataType,
}

impl Property {
    /// The kind follows from the sign of the id.
    pub fn kind(&self) -> PropertyKind {
        if self.id < 0 {
            PropertyKind::Action
        } else {
            PropertyKind::Object
        }
    }
}

/// The properties of a table, looked up by id or name.
///
/// Only used while building a [`DataDescriptor`]; decoding never consults it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Property>", into = "Vec<Property>")]
pub struct PropertyTable {
    properties: Vec<Property>,
}

impl TryFrom<Vec<Property>> for PropertyTable {
    type Error = CatalogError;

    fn try_from(properties: Vec<Property>) -> Result<Self, Self::Error> {
        let mut table = PropertyTable::new();
        for property in properties {
            table.insert(property)?;
        }
        Ok(table)
    }
}

impl From<PropertyTable> for Vec<Property> {
    fn from(table: PropertyTable) -> Self {
        table.properties
    }
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn find_by_id(&self, id: PropertyId) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Adds a property with an explicit id.
    pub fn insert(&mut self, property: Property) -> Result<(), CatalogError> {
        if property.id == 0 {
            return Err(CatalogError::ReservedPropertyId);
        }
        if self.find_by_name(&property.name).is_some() {
            return Err(CatalogError::DuplicateName(property.name));
        }
        if self.find_by_id(property.id).is_some() {
            return Err(CatalogError::DuplicateId(property.id));
        }
        self.properties.push(property);
        Ok(())
    }

    /// Adds a property, allocating the next free id for its kind: object
    /// ids count up from 1, action ids count down from -1.
    pub fn add(
        &mut self,
        name: &str,
        kind: PropertyKind,
        data_type: DataType,
    ) -> Result<&Property, CatalogError> {
        let id = match kind {
            PropertyKind::Object => self
                .iter()
                .map(|p| p.id)
                .filter(|id| *id > 0)
                .max()
                .unwrap_or(0)
                .checked_add(1),
            PropertyKind::Action => self
                .iter()
                .map(|p| p.id)
                .filter(|id| *id < 0)
                .min()
                .unwrap_or(0)
                .checked_sub(1),
        }
        .ok_or(CatalogError::IdSpaceExhausted(kind.name()))?;

        self.insert(Property {
            id,
            name: name.to_string(),
            data_type,
        })?;
        Ok(&self.properties[self.properties.len() - 1])
    }

    /// Builds a descriptor for the named properties.
    ///
    /// The shifted timestamp, whole seconds and action id occupy the first
    /// three slots; the properties follow in the order given.
    pub fn descriptor_for(&self, names: &[&str]) -> Result<DataDescriptor, CatalogError> {
        let mut descriptor = DataDescriptor::new();
        descriptor.set_time(TS_SLOT, TIMESTAMP_SLOT);
        descriptor.set_action(ACTION_ID_SLOT);
        for (i, name) in names.iter().enumerate() {
            let property = self
                .find_by_name(name)
                .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
            descriptor
                .set(property.id, FIRST_PROPERTY_SLOT + i, property.data_type)
                .map_err(|_| CatalogError::ReservedPropertyId)?;
        }
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_add_allocates_ids() {
        let mut table = PropertyTable::new();
        assert_eq!(
            table
                .add("first_name", PropertyKind::Object, DataType::String)
                .unwrap()
                .id,
            1
        );
        assert_eq!(
            table
                .add("purchase", PropertyKind::Action, DataType::Double)
                .unwrap()
                .id,
            -1
        );
        assert_eq!(
            table.add("age", PropertyKind::Object, DataType::Int).unwrap().id,
            2
        );
        assert_eq!(table.find_by_id(-1).unwrap().kind(), PropertyKind::Action);
        assert_eq!(table.find_by_name("age").unwrap().kind(), PropertyKind::Object);
    }

    #[test]
    fn test_duplicate_name() {
        let mut table = PropertyTable::new();
        table.add("x", PropertyKind::Object, DataType::Int).unwrap();
        assert_matches!(
            table.add("x", PropertyKind::Action, DataType::Int),
            Err(CatalogError::DuplicateName(name)) if name == "x"
        );
    }

    #[test]
    fn test_id_space_exhausted() {
        let mut table = PropertyTable::new();
        table
            .insert(Property {
                id: PropertyId::MAX,
                name: "last".to_string(),
                data_type: DataType::Int,
            })
            .unwrap();
        assert_matches!(
            table.add("overflow", PropertyKind::Object, DataType::Int),
            Err(CatalogError::IdSpaceExhausted("object"))
        );
    }

    #[test]
    fn test_descriptor_for() {
        let mut table = PropertyTable::new();
        table.add("x", PropertyKind::Object, DataType::Int).unwrap();
        table.add("y", PropertyKind::Object, DataType::Int).unwrap();
        table.add("label", PropertyKind::Action, DataType::String).unwrap();

        let d = table.descriptor_for(&["y", "label"]).unwrap();
        assert_eq!(d.ts_slot(), Some(TS_SLOT));
        assert_eq!(d.timestamp_slot(), Some(TIMESTAMP_SLOT));
        assert_eq!(d.action_slot(), Some(ACTION_ID_SLOT));
        assert_eq!(d.lookup(1), None);
        assert_eq!(d.lookup(2).unwrap().slot, FIRST_PROPERTY_SLOT);
        assert_eq!(d.lookup(-1).unwrap().slot, FIRST_PROPERTY_SLOT + 1);
        assert_eq!(d.lookup(-1).unwrap().data_type, DataType::String);
        assert_eq!(d.slot_count(), 5);

        assert_matches!(
            table.descriptor_for(&["missing"]),
            Err(CatalogError::NotFound(_))
        );
    }

    #[test]
    fn test_from_json() {
        let table = PropertyTable::from_json(
            r#"[
                {"id": 1, "name": "name", "dataType": "string"},
                {"id": -1, "name": "amount", "dataType": "Double"}
            ]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.find_by_name("amount").unwrap().data_type, DataType::Double);

        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(PropertyTable::from_json(&json).unwrap(), table);
    }

    #[test]
    fn test_from_json_rejects_duplicates() {
        let result = PropertyTable::from_json(
            r#"[
                {"id": 1, "name": "a", "dataType": "int"},
                {"id": 1, "name": "b", "dataType": "int"}
            ]"#,
        );
        assert!(result.is_err());
    }
}
