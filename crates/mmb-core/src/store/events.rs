use crate::model::compound::Compound;
use crate::model::config::{GlobalConfig, JobType, MdParameters, Reporting, Stage, StageSpan};
use crate::model::files::{AdditionalFile, DensityFitFiles};
use crate::model::helix::DoubleHelix;
use crate::model::interaction::BaseInteraction;
use crate::model::mobilizer::Mobilizer;
use crate::model::ntc::{NtcConformation, NtcForceScaleFactor};
use crate::params::AdvancedParameters;

/// Every addressable field of the setup model, one notification channel each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Compounds,
    DoubleHelices,
    BaseInteractions,
    Ntcs,
    NtcForceScaleFactor,
    Mobilizers,
    AdvancedParameters,
    AdditionalFiles,
    DensityFitFiles,
    GlobalConfig,
    Reporting,
    MdParameters,
    Stages,
    Stage,
    JobType,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::Compounds,
        Field::DoubleHelices,
        Field::BaseInteractions,
        Field::Ntcs,
        Field::NtcForceScaleFactor,
        Field::Mobilizers,
        Field::AdvancedParameters,
        Field::AdditionalFiles,
        Field::DensityFitFiles,
        Field::GlobalConfig,
        Field::Reporting,
        Field::MdParameters,
        Field::Stages,
        Field::Stage,
        Field::JobType,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Compounds => "compounds",
            Field::DoubleHelices => "doubleHelices",
            Field::BaseInteractions => "baseInteractions",
            Field::Ntcs => "ntcs",
            Field::NtcForceScaleFactor => "ntcForceScaleFactor",
            Field::Mobilizers => "mobilizers",
            Field::AdvancedParameters => "advancedParameters",
            Field::AdditionalFiles => "additionalFiles",
            Field::DensityFitFiles => "densityFitFiles",
            Field::GlobalConfig => "globalConfig",
            Field::Reporting => "reporting",
            Field::MdParameters => "mdParameters",
            Field::Stages => "stages",
            Field::Stage => "stage",
            Field::JobType => "jobType",
        }
    }
}

/// The committed value delivered on a field's channel, an owned clone of the
/// store's state at commit time.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Compounds(Vec<Compound>),
    DoubleHelices(Vec<DoubleHelix>),
    BaseInteractions(Vec<BaseInteraction>),
    Ntcs(Vec<NtcConformation>),
    NtcForceScaleFactor(NtcForceScaleFactor),
    Mobilizers(Vec<Mobilizer>),
    AdvancedParameters(AdvancedParameters),
    AdditionalFiles(Vec<AdditionalFile>),
    DensityFitFiles(DensityFitFiles),
    GlobalConfig(GlobalConfig),
    Reporting(Reporting),
    MdParameters(MdParameters),
    Stages(StageSpan),
    Stage(Stage),
    JobType(JobType),
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            FieldValue::Compounds(_) => Field::Compounds,
            FieldValue::DoubleHelices(_) => Field::DoubleHelices,
            FieldValue::BaseInteractions(_) => Field::BaseInteractions,
            FieldValue::Ntcs(_) => Field::Ntcs,
            FieldValue::NtcForceScaleFactor(_) => Field::NtcForceScaleFactor,
            FieldValue::Mobilizers(_) => Field::Mobilizers,
            FieldValue::AdvancedParameters(_) => Field::AdvancedParameters,
            FieldValue::AdditionalFiles(_) => Field::AdditionalFiles,
            FieldValue::DensityFitFiles(_) => Field::DensityFitFiles,
            FieldValue::GlobalConfig(_) => Field::GlobalConfig,
            FieldValue::Reporting(_) => Field::Reporting,
            FieldValue::MdParameters(_) => Field::MdParameters,
            FieldValue::Stages(_) => Field::Stages,
            FieldValue::Stage(_) => Field::Stage,
            FieldValue::JobType(_) => Field::JobType,
        }
    }
}

pub type FieldObserver = Box<dyn FnMut(&FieldValue)>;
pub type AggregateObserver = Box<dyn FnMut(&[Field])>;

/// Handle identifying one subscription; dispose it with
/// [`EventBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Synchronous, ordered change-notification dispatch.
///
/// Field channels deliver the committed value; the aggregate channel delivers
/// the list of fields a commit touched, and always fires last. The bus never
/// delivers anything on its own; the store drives it strictly after commits.
#[derive(Default)]
pub struct EventBus {
    field_observers: Vec<(SubscriptionId, Field, FieldObserver)>,
    aggregate_observers: Vec<(SubscriptionId, AggregateObserver)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    pub fn subscribe(&mut self, field: Field, observer: FieldObserver) -> SubscriptionId {
        let id = self.next_id();
        self.field_observers.push((id, field, observer));
        id
    }

    pub fn subscribe_all(&mut self, observer: AggregateObserver) -> SubscriptionId {
        let id = self.next_id();
        self.aggregate_observers.push((id, observer));
        id
    }

    /// Removes a subscription; returns whether it was still registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let fields_before = self.field_observers.len();
        let aggregates_before = self.aggregate_observers.len();
        self.field_observers.retain(|(sub, _, _)| *sub != id);
        self.aggregate_observers.retain(|(sub, _)| *sub != id);
        self.field_observers.len() != fields_before
            || self.aggregate_observers.len() != aggregates_before
    }

    pub(crate) fn emit(&mut self, value: &FieldValue) {
        let field = value.field();
        for (_, subscribed, observer) in &mut self.field_observers {
            if *subscribed == field {
                observer(value);
            }
        }
    }

    pub(crate) fn emit_aggregate(&mut self, fields: &[Field]) {
        for (_, observer) in &mut self.aggregate_observers {
            observer(fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn field_channels_only_receive_their_own_field() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe(
            Field::Reporting,
            Box::new(move |value| sink.borrow_mut().push(value.clone())),
        );

        bus.emit(&FieldValue::Stage(Stage(2)));
        assert!(seen.borrow().is_empty());

        bus.emit(&FieldValue::Reporting(Reporting::default()));
        assert_eq!(
            *seen.borrow(),
            vec![FieldValue::Reporting(Reporting::default())]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let sink = count.clone();
        let id = bus.subscribe(Field::Stage, Box::new(move |_| *sink.borrow_mut() += 1));

        bus.emit(&FieldValue::Stage(Stage(1)));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&FieldValue::Stage(Stage(2)));

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn aggregate_channel_receives_the_affected_field_list() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe_all(Box::new(move |fields| {
            sink.borrow_mut().push(fields.to_vec())
        }));

        bus.emit_aggregate(&[Field::Compounds, Field::Mobilizers]);
        assert_eq!(*seen.borrow(), vec![vec![Field::Compounds, Field::Mobilizers]]);
    }

    #[test]
    fn field_names_are_stable() {
        assert_eq!(Field::Compounds.name(), "compounds");
        assert_eq!(Field::NtcForceScaleFactor.name(), "ntcForceScaleFactor");
        assert_eq!(Field::ALL.len(), 15);
    }
}
