use sky_pathcodec::Value;

/// The decoded state of the current event.
///
/// Slots are assigned by a [`crate::DataDescriptor`]. Object property slots
/// carry their value forward from event to event, action property slots are
/// reset to their zero value on every event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventRecord {
    slots: Vec<Value>,
}

impl EventRecord {
    pub fn with_slots(n: usize) -> Self {
        Self {
            slots: vec![Value::None; n],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Value] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<&Value> {
        self.slots.get(slot)
    }

    pub(crate) fn slot_mut(&mut self, slot: usize) -> Option<&mut Value> {
        self.slots.get_mut(slot)
    }

    pub(crate) fn set(&mut self, slot: usize, value: Value) {
        if let Some(v) = self.slots.get_mut(slot) {
            *v = value;
        }
    }

    /// Returns the string in `slot`, or `""` if the slot holds no string.
    pub fn string(&self, slot: usize) -> &str {
        self.get(slot).and_then(Value::as_str).unwrap_or("")
    }

    /// Returns the integer in `slot`, or 0 if the slot holds no integer.
    pub fn int(&self, slot: usize) -> i64 {
        self.get(slot).and_then(Value::as_int).unwrap_or(0)
    }

    /// Returns the double in `slot`, or 0.0 if the slot holds no double.
    pub fn double(&self, slot: usize) -> f64 {
        self.get(slot).and_then(Value::as_double).unwrap_or(0.0)
    }

    /// Returns the boolean in `slot`, or false if the slot holds no boolean.
    pub fn boolean(&self, slot: usize) -> bool {
        self.get(slot).and_then(Value::as_bool).unwrap_or(false)
    }
}
