use crate::models::TickField;

/// Fixed-size column table keyed by `TickField` discriminant.
///
/// A slot is `Some` once that field was declared for the series; lookup is a
/// single array index. Undeclared fields stay `None` and cost one pointer.
pub(crate) struct FieldColumns<V> {
    slots: [Option<Vec<V>>; TickField::COUNT],
}

impl<V> FieldColumns<V> {
    /// Table with the given fields declared as empty columns.
    pub fn new(fields: &[TickField]) -> Self {
        let mut slots: [Option<Vec<V>>; TickField::COUNT] = std::array::from_fn(|_| None);
        for &field in fields {
            slots[field.slot()] = Some(Vec::new());
        }
        Self { slots }
    }

    pub fn get(&self, field: TickField) -> Option<&Vec<V>> {
        self.slots[field.slot()].as_ref()
    }

    pub fn get_mut(&mut self, field: TickField) -> Option<&mut Vec<V>> {
        self.slots[field.slot()].as_mut()
    }

    /// Installs `column` for `field`, returning the column it displaced.
    pub fn set(&mut self, field: TickField, column: Vec<V>) -> Option<Vec<V>> {
        self.slots[field.slot()].replace(column)
    }

    /// Declared columns with their fields, in discriminant order.
    pub fn iter(&self) -> impl Iterator<Item = (TickField, &Vec<V>)> {
        TickField::ALL
            .iter()
            .filter_map(move |&field| self.slots[field.slot()].as_ref().map(|col| (field, col)))
    }

    /// Mutable pass over every declared column.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Vec<V>> {
        self.slots.iter_mut().filter_map(|slot| slot.as_mut())
    }
}
