use sky_pathcodec::{DataType, PropertyId, Value};

use crate::error::DescriptorError;
use crate::record::EventRecord;

/// Number of distinct property ids.
pub const PROPERTY_ID_COUNT: usize = 1 << PropertyId::BITS;

/// Slot layout used by [`crate::PropertyTable::descriptor_for`].
pub const TS_SLOT: usize = 0;
pub const TIMESTAMP_SLOT: usize = 1;
pub const ACTION_ID_SLOT: usize = 2;
pub const FIRST_PROPERTY_SLOT: usize = 3;

/// Where and how a decoded property value is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    pub slot: usize,
    pub data_type: DataType,
}

/// Maps property ids and the built-in fields to record slots.
///
/// Lookups index a dense table by the biased property id, so every id in the
/// `i8` range resolves in constant time. Ids without a binding are still
/// decoded by the path decoder, then discarded.
#[derive(Debug, Clone)]
pub struct DataDescriptor {
    properties: Vec<Option<FieldBinding>>,
    ts_slot: Option<usize>,
    timestamp_slot: Option<usize>,
    action_slot: Option<usize>,
}

impl Default for DataDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn index(id: PropertyId) -> usize {
    (id as i16 - PropertyId::MIN as i16) as usize
}

impl DataDescriptor {
    pub fn new() -> Self {
        Self {
            properties: vec![None; PROPERTY_ID_COUNT],
            ts_slot: None,
            timestamp_slot: None,
            action_slot: None,
        }
    }

    /// Builds a descriptor from `(id, slot, type)` entries.
    pub fn from_table<I>(entries: I) -> Result<Self, DescriptorError>
    where
        I: IntoIterator<Item = (PropertyId, usize, DataType)>,
    {
        let mut descriptor = Self::new();
        for (id, slot, data_type) in entries {
            descriptor.set(id, slot, data_type)?;
        }
        Ok(descriptor)
    }

    /// Records the slot and type of a property, replacing any previous binding.
    pub fn set(
        &mut self,
        id: PropertyId,
        slot: usize,
        data_type: DataType,
    ) -> Result<(), DescriptorError> {
        if id == 0 {
            return Err(DescriptorError::ReservedPropertyId);
        }
        self.properties[index(id)] = Some(FieldBinding { slot, data_type });
        Ok(())
    }

    /// Binds the event time. `ts_slot` receives the shifted timestamp and
    /// `timestamp_slot` receives the whole seconds.
    pub fn set_time(&mut self, ts_slot: usize, timestamp_slot: usize) {
        self.ts_slot = Some(ts_slot);
        self.timestamp_slot = Some(timestamp_slot);
    }

    /// Binds the action id.
    pub fn set_action(&mut self, slot: usize) {
        self.action_slot = Some(slot);
    }

    #[inline]
    pub fn lookup(&self, id: PropertyId) -> Option<FieldBinding> {
        self.properties[index(id)]
    }

    pub fn ts_slot(&self) -> Option<usize> {
        self.ts_slot
    }

    pub fn timestamp_slot(&self) -> Option<usize> {
        self.timestamp_slot
    }

    pub fn action_slot(&self) -> Option<usize> {
        self.action_slot
    }

    /// Iterates over every bound property in ascending id order.
    pub fn bindings(&self) -> impl Iterator<Item = (PropertyId, FieldBinding)> + '_ {
        (PropertyId::MIN..=PropertyId::MAX)
            .filter_map(move |id| self.lookup(id).map(|binding| (id, binding)))
    }

    /// Iterates over the bindings of action properties, which are reset on
    /// every event.
    pub fn action_bindings(&self) -> impl Iterator<Item = FieldBinding> + '_ {
        self.properties[..index(0)].iter().flatten().copied()
    }

    /// The number of slots a record needs to hold every binding.
    pub fn slot_count(&self) -> usize {
        let builtins = [self.ts_slot, self.timestamp_slot, self.action_slot];
        self.properties
            .iter()
            .flatten()
            .map(|b| b.slot)
            .chain(builtins.into_iter().flatten())
            .map(|slot| slot + 1)
            .max()
            .unwrap_or(0)
    }

    /// Creates a record with every slot set to the zero value of its type.
    pub fn new_record(&self) -> EventRecord {
        let mut record = EventRecord::with_slots(self.slot_count());
        self.reset_record(&mut record);
        record
    }

    /// Resets every bound slot of `record` to its zero value.
    pub fn reset_record(&self, record: &mut EventRecord) {
        for slot in [self.ts_slot, self.timestamp_slot, self.action_slot]
            .into_iter()
            .flatten()
        {
            record.set(slot, Value::Int(0));
        }
        for binding in self.properties.iter().flatten() {
            if let Some(v) = record.slot_mut(binding.slot) {
                v.reset(binding.data_type);
            }
        }
    }
}
