use crate::{
    descriptors::{
        DescriptorTable,
        MetricDescriptor,
        MetricKey,
    },
    error::{
        CollectError,
        Result,
    },
};

/// One sample produced by a response mapper.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub key: MetricKey,
    pub value: f64,
    pub labels: Vec<String>,
}

impl Emission {
    pub fn new<L, S>(key: MetricKey, value: f64, labels: L) -> Self
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key,
            value,
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

/// Receives validated emissions together with their descriptor.
pub trait MetricSink: Send {
    fn emit(&mut self, descriptor: &MetricDescriptor, emission: Emission);
}

impl MetricSink for Vec<Emission> {
    fn emit(&mut self, _descriptor: &MetricDescriptor, emission: Emission) {
        self.push(emission);
    }
}

/// Checks emissions against the descriptor table before forwarding them to a
/// sink. Invalid emissions are logged and dropped.
pub struct Emitter<'a> {
    table: &'a DescriptorTable,
    sink: &'a mut dyn MetricSink,
    emitted: usize,
    skipped: usize,
}

impl<'a> Emitter<'a> {
    pub fn new(table: &'a DescriptorTable, sink: &'a mut dyn MetricSink) -> Self {
        Self {
            table,
            sink,
            emitted: 0,
            skipped: 0,
        }
    }

    /// Forwards `emission` if it matches its descriptor. Returns whether it was forwarded.
    pub fn emit(&mut self, emission: Emission) -> bool {
        let table = self.table;
        match validate(table, &emission) {
            Ok(descriptor) => {
                self.sink.emit(descriptor, emission);
                self.emitted += 1;
                true
            }
            Err(err) => {
                warn!(%err, labels = ?emission.labels, "Skipping emission");
                self.skipped += 1;
                false
            }
        }
    }

    pub fn emit_all(&mut self, emissions: impl IntoIterator<Item = Emission>) -> usize {
        let mut forwarded = 0;
        for emission in emissions {
            if self.emit(emission) {
                forwarded += 1;
            }
        }
        forwarded
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Looks up the descriptor of `emission` and checks its label arity.
pub fn validate<'t>(table: &'t DescriptorTable, emission: &Emission) -> Result<&'t MetricDescriptor> {
    let descriptor = table.lookup(emission.key)?;
    if descriptor.label_names.len() != emission.labels.len() {
        return Err(CollectError::LabelMismatch {
            key: emission.key,
            expected: descriptor.label_names.len(),
            actual: emission.labels.len(),
        });
    }
    Ok(descriptor)
}
