//! # Store Module
//!
//! The mutable container owning the single canonical copy of a simulation
//! job, together with the validation engine gating every mutation and the
//! per-field change-notification bus.
//!
//! ## Mutation contract
//!
//! Every mutator builds the provisional next state, runs the relevant
//! validators against it, and only then commits. On failure the committed
//! state is untouched and the caller receives the full list of
//! human-readable error strings; on success the affected field channels fire,
//! followed by the aggregate channel. Scalar `set` calls short-circuit when
//! the new value equals the current one, unless forced.
//!
//! The store is single-threaded and not reentrant: observers must not mutate
//! the store from within a notification triggered by the same mutation.

pub mod events;
pub mod validation;

use crate::model::compound::Compound;
use crate::model::config::{GlobalConfig, JobType, MdParameters, Reporting, Stage, StageSpan};
use crate::model::files::{AdditionalFile, DensityFitFiles};
use crate::model::helix::DoubleHelix;
use crate::model::interaction::BaseInteraction;
use crate::model::mobilizer::Mobilizer;
use crate::model::ntc::{NtcConformation, NtcForceScaleFactor};
use crate::params::catalog;
use crate::params::value::ParamValue;
use crate::params::AdvancedParameters;
use events::{AggregateObserver, EventBus, Field, FieldObserver, FieldValue, SubscriptionId};
use std::collections::HashSet;
use thiserror::Error;

/// Validation failure of a mutation or reset; the store is guaranteed
/// unchanged when this is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", errors.join("; "))]
pub struct ValidationErrors {
    pub errors: Vec<String>,
}

impl ValidationErrors {
    fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }
}

/// One complete, plain snapshot of a simulation job.
///
/// This is the value the store guards; it is also what deserialization
/// produces and what `reset` consumes. Cloning it is the deep copy every
/// defensive accessor hands out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetupData {
    pub compounds: Vec<Compound>,
    pub double_helices: Vec<DoubleHelix>,
    pub base_interactions: Vec<BaseInteraction>,
    pub ntcs: Vec<NtcConformation>,
    pub mobilizers: Vec<Mobilizer>,
    pub additional_files: Vec<AdditionalFile>,
    pub advanced_parameters: AdvancedParameters,
    pub density_fit_files: DensityFitFiles,
    pub global: GlobalConfig,
    pub reporting: Reporting,
    pub md_parameters: MdParameters,
    pub stages: StageSpan,
    pub stage: Stage,
    pub ntc_force_scale_factor: NtcForceScaleFactor,
    pub job_type: JobType,
}

fn field_value(data: &SetupData, field: Field) -> FieldValue {
    match field {
        Field::Compounds => FieldValue::Compounds(data.compounds.clone()),
        Field::DoubleHelices => FieldValue::DoubleHelices(data.double_helices.clone()),
        Field::BaseInteractions => FieldValue::BaseInteractions(data.base_interactions.clone()),
        Field::Ntcs => FieldValue::Ntcs(data.ntcs.clone()),
        Field::NtcForceScaleFactor => {
            FieldValue::NtcForceScaleFactor(data.ntc_force_scale_factor)
        }
        Field::Mobilizers => FieldValue::Mobilizers(data.mobilizers.clone()),
        Field::AdvancedParameters => {
            FieldValue::AdvancedParameters(data.advanced_parameters.clone())
        }
        Field::AdditionalFiles => FieldValue::AdditionalFiles(data.additional_files.clone()),
        Field::DensityFitFiles => FieldValue::DensityFitFiles(data.density_fit_files.clone()),
        Field::GlobalConfig => FieldValue::GlobalConfig(data.global),
        Field::Reporting => FieldValue::Reporting(data.reporting),
        Field::MdParameters => FieldValue::MdParameters(data.md_parameters),
        Field::Stages => FieldValue::Stages(data.stages),
        Field::Stage => FieldValue::Stage(data.stage),
        Field::JobType => FieldValue::JobType(data.job_type),
    }
}

/// A collection-valued field of the setup model.
///
/// Implemented by the six entity types the store keeps ordered collections
/// of; the store's generic `add`/`remove`/`update` family is written against
/// this trait.
pub trait SetupEntity: Clone + PartialEq + Sized {
    const FIELD: Field;

    fn collection(data: &SetupData) -> &Vec<Self>;
    fn collection_mut(data: &mut SetupData) -> &mut Vec<Self>;
    fn validate(candidate: &Self, data: &SetupData, siblings: &[Self]) -> Vec<String>;

    /// Follow-up pass after a successful add commit; returns the extra
    /// fields it modified.
    fn after_add(_data: &mut SetupData) -> Vec<Field> {
        Vec::new()
    }

    /// Follow-up pass after a successful remove commit; returns the extra
    /// fields it modified.
    fn after_remove(_data: &mut SetupData) -> Vec<Field> {
        Vec::new()
    }
}

impl SetupEntity for Compound {
    const FIELD: Field = Field::Compounds;

    fn collection(data: &SetupData) -> &Vec<Self> {
        &data.compounds
    }
    fn collection_mut(data: &mut SetupData) -> &mut Vec<Self> {
        &mut data.compounds
    }
    fn validate(candidate: &Self, data: &SetupData, siblings: &[Self]) -> Vec<String> {
        validation::validate_compound(candidate, data, siblings)
    }
    fn after_remove(data: &mut SetupData) -> Vec<Field> {
        drop_orphaned_references(data)
    }
}

impl SetupEntity for DoubleHelix {
    const FIELD: Field = Field::DoubleHelices;

    fn collection(data: &SetupData) -> &Vec<Self> {
        &data.double_helices
    }
    fn collection_mut(data: &mut SetupData) -> &mut Vec<Self> {
        &mut data.double_helices
    }
    fn validate(candidate: &Self, data: &SetupData, siblings: &[Self]) -> Vec<String> {
        validation::validate_double_helix(candidate, data, siblings)
    }
}

impl SetupEntity for BaseInteraction {
    const FIELD: Field = Field::BaseInteractions;

    fn collection(data: &SetupData) -> &Vec<Self> {
        &data.base_interactions
    }
    fn collection_mut(data: &mut SetupData) -> &mut Vec<Self> {
        &mut data.base_interactions
    }
    fn validate(candidate: &Self, data: &SetupData, siblings: &[Self]) -> Vec<String> {
        validation::validate_base_interaction(candidate, data, siblings)
    }
}

impl SetupEntity for NtcConformation {
    const FIELD: Field = Field::Ntcs;

    fn collection(data: &SetupData) -> &Vec<Self> {
        &data.ntcs
    }
    fn collection_mut(data: &mut SetupData) -> &mut Vec<Self> {
        &mut data.ntcs
    }
    fn validate(candidate: &Self, data: &SetupData, siblings: &[Self]) -> Vec<String> {
        validation::validate_ntc(candidate, data, siblings)
    }
}

impl SetupEntity for Mobilizer {
    const FIELD: Field = Field::Mobilizers;

    fn collection(data: &SetupData) -> &Vec<Self> {
        &data.mobilizers
    }
    fn collection_mut(data: &mut SetupData) -> &mut Vec<Self> {
        &mut data.mobilizers
    }
    fn validate(candidate: &Self, data: &SetupData, siblings: &[Self]) -> Vec<String> {
        validation::validate_mobilizer(candidate, data, siblings)
    }
}

impl SetupEntity for AdditionalFile {
    const FIELD: Field = Field::AdditionalFiles;

    fn collection(data: &SetupData) -> &Vec<Self> {
        &data.additional_files
    }
    fn collection_mut(data: &mut SetupData) -> &mut Vec<Self> {
        &mut data.additional_files
    }
    fn validate(candidate: &Self, data: &SetupData, siblings: &[Self]) -> Vec<String> {
        validation::validate_additional_file(candidate, data, siblings)
    }
    fn after_add(data: &mut SetupData) -> Vec<Field> {
        fix_up_file_parameters(data)
    }
    fn after_remove(data: &mut SetupData) -> Vec<Field> {
        fix_up_file_parameters(data)
    }
}

/// Cascade pass run after a compound removal: drops every entry of the
/// dependent collections whose chain reference no longer resolves.
fn drop_orphaned_references(data: &mut SetupData) -> Vec<Field> {
    let live: HashSet<char> = data.compounds.iter().map(|c| c.chain.name).collect();
    let mut affected = Vec::new();

    let before = data.base_interactions.len();
    data.base_interactions
        .retain(|i| live.contains(&i.chain_name_a) && live.contains(&i.chain_name_b));
    if data.base_interactions.len() != before {
        affected.push(Field::BaseInteractions);
    }

    let before = data.double_helices.len();
    data.double_helices
        .retain(|h| live.contains(&h.chain_name_a) && live.contains(&h.chain_name_b));
    if data.double_helices.len() != before {
        affected.push(Field::DoubleHelices);
    }

    let before = data.mobilizers.len();
    data.mobilizers
        .retain(|m| m.chain_name.is_none_or(|chain| live.contains(&chain)));
    if data.mobilizers.len() != before {
        affected.push(Field::Mobilizers);
    }

    let before = data.ntcs.len();
    data.ntcs.retain(|n| live.contains(&n.chain_name));
    if data.ntcs.len() != before {
        affected.push(Field::Ntcs);
    }

    affected
}

/// File-list fix-up pass: every file-backed parameter whose value no longer
/// names an uploaded file is moved to the first remaining file, or unset when
/// none remain.
fn fix_up_file_parameters(data: &mut SetupData) -> Vec<Field> {
    let names: Vec<&str> = data.additional_files.iter().map(|f| f.name.as_str()).collect();
    let mut reassignments: Vec<(String, Option<ParamValue>)> = Vec::new();

    for descriptor in catalog::file_backed_parameters() {
        if let Some(ParamValue::Option(assigned)) = data.advanced_parameters.get(descriptor.name) {
            if !names.contains(&assigned.as_str()) {
                let replacement = names
                    .first()
                    .map(|first| ParamValue::Option(first.to_string()));
                reassignments.push((descriptor.name.to_string(), replacement));
            }
        }
    }

    if reassignments.is_empty() {
        return Vec::new();
    }
    for (name, replacement) in reassignments {
        match replacement {
            Some(value) => data.advanced_parameters.set(name, value),
            None => {
                data.advanced_parameters.unset(&name);
            }
        }
    }
    vec![Field::AdvancedParameters]
}

/// A scalar-valued field of the setup model.
pub trait SetupScalar: Clone + PartialEq + Sized {
    const FIELD: Field;

    fn get(data: &SetupData) -> &Self;
    fn put(data: &mut SetupData, value: Self);
    fn validate(candidate: &Self, data: &SetupData) -> Vec<String>;
}

macro_rules! impl_setup_scalar {
    ($type:ty, $field:expr, $member:ident, $validator:path) => {
        impl SetupScalar for $type {
            const FIELD: Field = $field;

            fn get(data: &SetupData) -> &Self {
                &data.$member
            }
            fn put(data: &mut SetupData, value: Self) {
                data.$member = value;
            }
            fn validate(candidate: &Self, data: &SetupData) -> Vec<String> {
                $validator(candidate, data)
            }
        }
    };
}

fn no_validation<T>(_candidate: &T, _data: &SetupData) -> Vec<String> {
    Vec::new()
}

impl_setup_scalar!(
    GlobalConfig,
    Field::GlobalConfig,
    global,
    validation::validate_global_config
);
impl_setup_scalar!(
    Reporting,
    Field::Reporting,
    reporting,
    validation::validate_reporting
);
impl_setup_scalar!(
    MdParameters,
    Field::MdParameters,
    md_parameters,
    no_validation
);
impl_setup_scalar!(
    StageSpan,
    Field::Stages,
    stages,
    validation::validate_stage_span
);
impl_setup_scalar!(Stage, Field::Stage, stage, validation::validate_stage);
impl_setup_scalar!(
    NtcForceScaleFactor,
    Field::NtcForceScaleFactor,
    ntc_force_scale_factor,
    validation::validate_ntc_force_scale
);
impl_setup_scalar!(
    DensityFitFiles,
    Field::DensityFitFiles,
    density_fit_files,
    validation::validate_density_fit_files
);
impl_setup_scalar!(JobType, Field::JobType, job_type, no_validation);
impl_setup_scalar!(
    AdvancedParameters,
    Field::AdvancedParameters,
    advanced_parameters,
    validation::validate_advanced_parameters
);

/// The entity store: the one mutable copy of a job's setup model.
#[derive(Default)]
pub struct SetupStore {
    data: SetupData,
    bus: EventBus,
}

impl SetupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store around existing data without validating it; prefer
    /// [`SetupStore::reset`] for anything that crossed a trust boundary.
    pub fn with_data(data: SetupData) -> Self {
        Self {
            data,
            bus: EventBus::new(),
        }
    }

    // --- Read access -----------------------------------------------------

    pub fn data(&self) -> &SetupData {
        &self.data
    }

    /// A deep copy of the complete model.
    pub fn snapshot(&self) -> SetupData {
        self.data.clone()
    }

    pub fn compounds(&self) -> &[Compound] {
        &self.data.compounds
    }

    pub fn double_helices(&self) -> &[DoubleHelix] {
        &self.data.double_helices
    }

    pub fn base_interactions(&self) -> &[BaseInteraction] {
        &self.data.base_interactions
    }

    pub fn ntcs(&self) -> &[NtcConformation] {
        &self.data.ntcs
    }

    pub fn mobilizers(&self) -> &[Mobilizer] {
        &self.data.mobilizers
    }

    pub fn additional_files(&self) -> &[AdditionalFile] {
        &self.data.additional_files
    }

    pub fn advanced_parameters(&self) -> &AdvancedParameters {
        &self.data.advanced_parameters
    }

    pub fn density_fit_files(&self) -> &DensityFitFiles {
        &self.data.density_fit_files
    }

    pub fn global_config(&self) -> GlobalConfig {
        self.data.global
    }

    pub fn reporting(&self) -> Reporting {
        self.data.reporting
    }

    pub fn md_parameters(&self) -> MdParameters {
        self.data.md_parameters
    }

    pub fn stages(&self) -> StageSpan {
        self.data.stages
    }

    pub fn stage(&self) -> Stage {
        self.data.stage
    }

    pub fn ntc_force_scale_factor(&self) -> NtcForceScaleFactor {
        self.data.ntc_force_scale_factor
    }

    pub fn job_type(&self) -> JobType {
        self.data.job_type
    }

    // --- Collection mutation ---------------------------------------------

    pub fn add<T: SetupEntity>(&mut self, item: T) -> Result<(), ValidationErrors> {
        let errors = T::validate(&item, &self.data, T::collection(&self.data));
        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors));
        }
        T::collection_mut(&mut self.data).push(item);
        let extra = T::after_add(&mut self.data);
        self.notify_commit(T::FIELD, &extra);
        Ok(())
    }

    /// Removes the first element equal to `item`; returns whether anything
    /// was removed.
    pub fn remove<T: SetupEntity>(&mut self, item: &T) -> bool {
        match T::collection(&self.data).iter().position(|x| x == item) {
            Some(index) => self.remove_at::<T>(index).is_some(),
            None => false,
        }
    }

    pub fn remove_at<T: SetupEntity>(&mut self, index: usize) -> Option<T> {
        if index >= T::collection(&self.data).len() {
            return None;
        }
        let removed = T::collection_mut(&mut self.data).remove(index);
        let extra = T::after_remove(&mut self.data);
        self.notify_commit(T::FIELD, &extra);
        Some(removed)
    }

    /// Removes every listed element (each matched once, by equality) in a
    /// single commit; returns how many were removed.
    pub fn remove_many<T: SetupEntity>(&mut self, items: &[T]) -> usize {
        let mut removed = 0;
        for item in items {
            if let Some(index) = T::collection(&self.data).iter().position(|x| x == item) {
                T::collection_mut(&mut self.data).remove(index);
                removed += 1;
            }
        }
        if removed > 0 {
            let extra = T::after_remove(&mut self.data);
            self.notify_commit(T::FIELD, &extra);
        }
        removed
    }

    /// Replaces the element matched by the item's own equality, revalidating
    /// it against the rest of the model.
    pub fn update<T: SetupEntity>(&mut self, item: T) -> Result<(), ValidationErrors> {
        match T::collection(&self.data).iter().position(|x| *x == item) {
            Some(index) => self.update_at(index, item),
            None => Err(ValidationErrors::new(vec![format!(
                "No matching entry in {} to update",
                T::FIELD.name()
            )])),
        }
    }

    pub fn update_at<T: SetupEntity>(
        &mut self,
        index: usize,
        item: T,
    ) -> Result<(), ValidationErrors> {
        let collection = T::collection(&self.data);
        if index >= collection.len() {
            return Err(ValidationErrors::new(vec![format!(
                "Index {} is out of bounds for {}",
                index,
                T::FIELD.name()
            )]));
        }
        let mut siblings = collection.clone();
        siblings.remove(index);
        let errors = T::validate(&item, &self.data, &siblings);
        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors));
        }
        T::collection_mut(&mut self.data)[index] = item;
        self.notify_commit(T::FIELD, &[]);
        Ok(())
    }

    // --- Scalar mutation -------------------------------------------------

    /// Sets a scalar field, short-circuiting without commit or notification
    /// when the value is unchanged.
    pub fn set<S: SetupScalar>(&mut self, value: S) -> Result<(), ValidationErrors> {
        self.set_inner(value, false)
    }

    /// Sets a scalar field, committing and notifying even when the value is
    /// unchanged.
    pub fn set_forced<S: SetupScalar>(&mut self, value: S) -> Result<(), ValidationErrors> {
        self.set_inner(value, true)
    }

    fn set_inner<S: SetupScalar>(&mut self, value: S, force: bool) -> Result<(), ValidationErrors> {
        if !force && *S::get(&self.data) == value {
            return Ok(());
        }
        let errors = S::validate(&value, &self.data);
        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors));
        }
        S::put(&mut self.data, value);
        self.notify_commit(S::FIELD, &[]);
        Ok(())
    }

    /// Assigns (or, with `None`, unassigns) one advanced parameter.
    pub fn assign_parameter(
        &mut self,
        name: &str,
        value: Option<ParamValue>,
    ) -> Result<(), ValidationErrors> {
        let mut next = self.data.advanced_parameters.clone();
        match value {
            Some(value) => next.set(name, value),
            None => {
                next.unset(name);
            }
        }
        self.set(next)
    }

    // --- Whole-model replacement -----------------------------------------

    /// Replaces the entire model atomically.
    ///
    /// Every collection element and every scalar is validated against the new
    /// data set first; any failure returns the whole error list and leaves
    /// the store untouched. A successful reset replays every field channel.
    pub fn reset(&mut self, data: SetupData) -> Result<(), ValidationErrors> {
        let errors = validation::validate_all(&data);
        if !errors.is_empty() {
            return Err(ValidationErrors::new(errors));
        }
        self.data = data;
        self.notify_all();
        Ok(())
    }

    // --- Notification ----------------------------------------------------

    pub fn subscribe(&mut self, field: Field, observer: FieldObserver) -> SubscriptionId {
        self.bus.subscribe(field, observer)
    }

    pub fn subscribe_all(&mut self, observer: AggregateObserver) -> SubscriptionId {
        self.bus.subscribe_all(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Replays the current value of every field once, for consumers that
    /// need to resynchronize after being constructed.
    pub fn reannounce(&mut self) {
        self.notify_all();
    }

    fn notify_commit(&mut self, primary: Field, extra: &[Field]) {
        let mut fields = vec![primary];
        for field in extra {
            if !fields.contains(field) {
                fields.push(*field);
            }
        }
        for field in &fields {
            let value = field_value(&self.data, *field);
            self.bus.emit(&value);
        }
        self.bus.emit_aggregate(&fields);
    }

    fn notify_all(&mut self) {
        for field in Field::ALL {
            let value = field_value(&self.data, field);
            self.bus.emit(&value);
        }
        self.bus.emit_aggregate(&Field::ALL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::chain::Chain;
    use crate::model::compound::CompoundType;
    use crate::model::interaction::{Edge, Orientation};
    use crate::model::mobilizer::BondMobility;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rna_compound(chain: char, sequence: &str) -> Compound {
        Compound::new(Chain::new(chain), CompoundType::RNA, sequence.chars(), 1)
    }

    fn store_with_chains(chains: &[(char, &str)]) -> SetupStore {
        let mut store = SetupStore::new();
        for (chain, sequence) in chains {
            store.add(rna_compound(*chain, sequence)).unwrap();
        }
        store
    }

    fn interaction(
        chain_a: char,
        res_a: isize,
        edge_a: Edge,
        chain_b: char,
        res_b: isize,
        edge_b: Edge,
    ) -> BaseInteraction {
        BaseInteraction {
            chain_name_a: chain_a,
            res_no_a: res_a,
            edge_a,
            chain_name_b: chain_b,
            res_no_b: res_b,
            edge_b,
            orientation: Orientation::Cis,
        }
    }

    fn helix(
        chain_a: char,
        first_a: isize,
        last_a: isize,
        chain_b: char,
        first_b: isize,
        last_b: isize,
    ) -> DoubleHelix {
        DoubleHelix {
            chain_name_a: chain_a,
            first_a,
            last_a,
            chain_name_b: chain_b,
            first_b,
            last_b,
        }
    }

    mod compounds {
        use super::*;

        #[test]
        fn added_compound_gets_sequential_numbering() {
            let store = store_with_chains(&[('A', "ACGU")]);
            let compound = &store.compounds()[0];

            assert_eq!(compound.residues.len(), 4);
            for (i, residue) in compound.residues.iter().enumerate() {
                assert_eq!(residue.number, i as isize + 1);
                assert_eq!(residue.auth_number, i as isize + 1);
            }
        }

        #[test]
        fn duplicate_chain_name_is_rejected() {
            let mut store = store_with_chains(&[('A', "ACGU")]);
            let result = store.add(rna_compound('A', "GG"));
            let errors = result.unwrap_err().errors;
            assert!(errors.iter().any(|e| e.contains("already used")), "{:?}", errors);
            assert_eq!(store.compounds().len(), 1);
        }

        #[test]
        fn invalid_symbols_for_type_are_rejected() {
            let mut store = SetupStore::new();
            let compound =
                Compound::new(Chain::new('A'), CompoundType::DNA, "ACGU".chars(), 1);
            let errors = store.add(compound).unwrap_err().errors;
            assert!(errors.iter().any(|e| e.contains("'U'")), "{:?}", errors);
        }
    }

    mod cross_references {
        use super::*;

        #[test]
        fn interaction_requires_existing_chains_and_residues() {
            let mut store = store_with_chains(&[('A', "ACGU")]);

            let missing_chain =
                interaction('A', 1, Edge::WatsonCrick, 'B', 1, Edge::WatsonCrick);
            let errors = store.add(missing_chain).unwrap_err().errors;
            assert!(errors.iter().any(|e| e.contains("Chain B does not exist")));

            let out_of_range =
                interaction('A', 1, Edge::WatsonCrick, 'A', 9, Edge::WatsonCrick);
            let errors = store.add(out_of_range).unwrap_err().errors;
            assert!(errors.iter().any(|e| e.contains("out of range")));
        }

        #[test]
        fn residue_cannot_interact_with_itself() {
            let mut store = store_with_chains(&[('A', "ACGU")]);
            let self_interaction =
                interaction('A', 1, Edge::WatsonCrick, 'A', 1, Edge::SugarEdge);
            let errors = store.add(self_interaction).unwrap_err().errors;
            assert!(
                errors
                    .iter()
                    .any(|e| e.contains("cannot interact with itself")),
                "{:?}",
                errors
            );
        }

        #[test]
        fn referential_integrity_holds_after_mixed_mutations() {
            let mut store = store_with_chains(&[('A', "ACGUACGU"), ('B', "ACGUACGU")]);
            store
                .add(interaction('A', 1, Edge::WatsonCrick, 'B', 8, Edge::WatsonCrick))
                .unwrap();
            store.add(helix('A', 2, 4, 'B', 7, 5)).unwrap();
            store
                .add(Mobilizer::for_span(BondMobility::Rigid, 'B', 1, 4))
                .unwrap();
            store.remove(&rna_compound('B', "ACGUACGU"));

            let live: Vec<char> = store.compounds().iter().map(|c| c.chain.name).collect();
            for i in store.base_interactions() {
                assert!(live.contains(&i.chain_name_a) && live.contains(&i.chain_name_b));
            }
            for h in store.double_helices() {
                assert!(live.contains(&h.chain_name_a) && live.contains(&h.chain_name_b));
            }
            for m in store.mobilizers() {
                assert!(m.chain_name.is_none_or(|c| live.contains(&c)));
            }
        }
    }

    mod double_helices {
        use super::*;

        #[test]
        fn helix_sides_must_run_in_opposite_orders() {
            let mut store = store_with_chains(&[('A', "ACGUACGU"), ('B', "ACGUACGU")]);

            let inverted_a = helix('A', 4, 2, 'B', 8, 6);
            assert!(store.add(inverted_a).is_err());

            let ascending_b = helix('A', 1, 3, 'B', 5, 7);
            assert!(store.add(ascending_b).is_err());
        }

        #[test]
        fn self_overlapping_helix_on_one_chain_is_rejected() {
            let mut store = store_with_chains(&[('A', "ACGUACGU")]);
            let errors = store.add(helix('A', 1, 4, 'A', 6, 3)).unwrap_err().errors;
            assert!(errors.iter().any(|e| e.contains("overlap")), "{:?}", errors);
        }

        #[test]
        fn committed_helices_never_overlap() {
            let mut store = store_with_chains(&[('A', "ACGUACGUACGU"), ('B', "ACGUACGUACGU")]);
            store.add(helix('A', 1, 3, 'B', 12, 10)).unwrap();

            // Side A collides with the committed side A.
            assert!(store.add(helix('A', 3, 5, 'B', 9, 7)).is_err());
            // Side B collides with the committed side B.
            assert!(store.add(helix('A', 4, 6, 'B', 10, 8)).is_err());
            // Candidate side A collides with the committed side B.
            assert!(store.add(helix('B', 10, 12, 'A', 6, 4)).is_err());
            // Disjoint ranges commit fine.
            store.add(helix('A', 4, 6, 'B', 9, 7)).unwrap();

            for x in store.double_helices() {
                for y in store.double_helices() {
                    if x != y {
                        assert!(!validation::helices_overlap(x, y));
                    }
                }
            }
        }

        #[test]
        fn unequal_strand_lengths_are_rejected() {
            let mut store = store_with_chains(&[('A', "ACGUACGU"), ('B', "ACGUACGU")]);
            let errors = store.add(helix('A', 1, 4, 'B', 8, 6)).unwrap_err().errors;
            assert!(
                errors.iter().any(|e| e.contains("different numbers")),
                "{:?}",
                errors
            );
        }
    }

    mod mobilizers {
        use super::*;

        #[test]
        fn whole_structure_mobilizer_is_exclusive() {
            let mut store = store_with_chains(&[('A', "ACGU")]);
            store
                .add(Mobilizer::whole_structure(BondMobility::Rigid))
                .unwrap();

            let errors = store
                .add(Mobilizer::for_chain(BondMobility::Torsion, 'A'))
                .unwrap_err()
                .errors;
            assert!(errors.iter().any(|e| e.contains("already exists")), "{:?}", errors);

            let mut store = store_with_chains(&[('A', "ACGU")]);
            store
                .add(Mobilizer::for_chain(BondMobility::Torsion, 'A'))
                .unwrap();
            assert!(
                store
                    .add(Mobilizer::whole_structure(BondMobility::Rigid))
                    .is_err()
            );
        }

        #[test]
        fn same_chain_span_overlap_is_rejected() {
            let mut store = store_with_chains(&[('A', "ACGUACGU")]);
            store
                .add(Mobilizer::for_span(BondMobility::Rigid, 'A', 1, 4))
                .unwrap();

            assert!(
                store
                    .add(Mobilizer::for_span(BondMobility::Torsion, 'A', 4, 6))
                    .is_err()
            );
            // A spanless mobilizer covers the whole chain.
            assert!(
                store
                    .add(Mobilizer::for_chain(BondMobility::Free, 'A'))
                    .is_err()
            );
            store
                .add(Mobilizer::for_span(BondMobility::Torsion, 'A', 5, 8))
                .unwrap();
        }
    }

    mod cascade {
        use super::*;

        #[test]
        fn removing_a_compound_drops_every_reference_to_it() {
            let mut store = store_with_chains(&[('A', "ACGUACGU"), ('B', "ACGUACGU")]);
            store
                .add(interaction('A', 1, Edge::WatsonCrick, 'A', 3, Edge::Hoogsteen))
                .unwrap();
            store
                .add(interaction('A', 2, Edge::WatsonCrick, 'B', 7, Edge::WatsonCrick))
                .unwrap();
            store.add(helix('A', 4, 6, 'B', 3, 1)).unwrap();
            store
                .add(Mobilizer::for_chain(BondMobility::Rigid, 'A'))
                .unwrap();
            store
                .add(NtcConformation {
                    chain_name: 'A',
                    first_res_no: 1,
                    last_res_no: 3,
                    ntc: "AA00".to_string(),
                })
                .unwrap();

            let compound = store.compounds()[0].clone();
            assert!(store.remove(&compound));

            assert!(store.base_interactions().is_empty());
            assert!(store.double_helices().is_empty());
            assert!(store.mobilizers().is_empty());
            assert!(store.ntcs().is_empty());
        }

        #[test]
        fn cascade_fires_one_notification_per_affected_collection() {
            let mut store = store_with_chains(&[('A', "ACGU")]);
            store
                .add(Mobilizer::for_chain(BondMobility::Rigid, 'A'))
                .unwrap();

            let mobilizer_events = Rc::new(RefCell::new(Vec::new()));
            let sink = mobilizer_events.clone();
            store.subscribe(
                Field::Mobilizers,
                Box::new(move |value| sink.borrow_mut().push(value.clone())),
            );

            let aggregate = Rc::new(RefCell::new(Vec::new()));
            let sink = aggregate.clone();
            store.subscribe_all(Box::new(move |fields| {
                sink.borrow_mut().push(fields.to_vec())
            }));

            let compound = store.compounds()[0].clone();
            store.remove(&compound);

            assert_eq!(
                *mobilizer_events.borrow(),
                vec![FieldValue::Mobilizers(Vec::new())]
            );
            let aggregate = aggregate.borrow();
            assert_eq!(aggregate.len(), 1);
            assert!(aggregate[0].contains(&Field::Compounds));
            assert!(aggregate[0].contains(&Field::Mobilizers));
        }
    }

    mod scalars {
        use super::*;

        #[test]
        fn set_short_circuits_on_equal_value() {
            let mut store = SetupStore::new();
            let count = Rc::new(RefCell::new(0));
            let sink = count.clone();
            store.subscribe(
                Field::GlobalConfig,
                Box::new(move |_| *sink.borrow_mut() += 1),
            );

            store.set(GlobalConfig::default()).unwrap();
            assert_eq!(*count.borrow(), 0);

            store.set_forced(GlobalConfig::default()).unwrap();
            assert_eq!(*count.borrow(), 1);

            store
                .set(GlobalConfig {
                    temperature: 300.0,
                    ..GlobalConfig::default()
                })
                .unwrap();
            assert_eq!(*count.borrow(), 2);
        }

        #[test]
        fn out_of_range_scalars_are_rejected() {
            let mut store = SetupStore::new();
            assert!(
                store
                    .set(GlobalConfig {
                        base_interaction_scale_factor: -1.0,
                        temperature: 10.0,
                    })
                    .is_err()
            );
            assert!(
                store
                    .set(Reporting {
                        interval: 0.0,
                        count: 5,
                    })
                    .is_err()
            );
            assert!(store.set(NtcForceScaleFactor(-0.5)).is_err());
        }

        #[test]
        fn stage_must_stay_within_the_span() {
            let mut store = SetupStore::new();
            store.set(StageSpan { first: 1, last: 3 }).unwrap();
            store.set(Stage(4)).unwrap();
            assert!(store.set(Stage(5)).is_err());

            // Shrinking the span under the current stage is rejected too.
            let errors = store
                .set(StageSpan { first: 1, last: 2 })
                .unwrap_err()
                .errors;
            assert!(errors.iter().any(|e| e.contains("stage 4")), "{:?}", errors);
        }
    }

    mod advanced_parameters {
        use super::*;

        #[test]
        fn out_of_range_parameter_value_is_reported_by_name() {
            let mut store = SetupStore::new();
            let errors = store
                .assign_parameter("cutoffRadius", Some(ParamValue::Real(0.05)))
                .unwrap_err()
                .errors;
            assert_eq!(errors, vec!["cutoffRadius is invalid".to_string()]);
        }

        #[test]
        fn unknown_parameter_names_are_rejected() {
            let mut store = SetupStore::new();
            let errors = store
                .assign_parameter("noSuchKnob", Some(ParamValue::Boolean(true)))
                .unwrap_err()
                .errors;
            assert!(errors[0].contains("not a known parameter"));
        }

        #[test]
        fn file_backed_parameter_follows_the_file_list() {
            let mut store = SetupStore::new();
            store.add(AdditionalFile::uploaded("amber.prm", 10)).unwrap();
            store.add(AdditionalFile::uploaded("charmm.prm", 10)).unwrap();
            store
                .assign_parameter(
                    "tinkerParameterFileName",
                    Some(ParamValue::Option("charmm.prm".to_string())),
                )
                .unwrap();

            // Removing the assigned file moves the value to the first
            // remaining one.
            store.remove(&AdditionalFile::uploaded("charmm.prm", 10));
            assert_eq!(
                store.advanced_parameters().get("tinkerParameterFileName"),
                Some(&ParamValue::Option("amber.prm".to_string()))
            );

            // Removing the last file unsets the parameter.
            store.remove(&AdditionalFile::uploaded("amber.prm", 10));
            assert_eq!(
                store.advanced_parameters().get("tinkerParameterFileName"),
                None
            );
        }

        #[test]
        fn type_mismatch_is_invalid() {
            let mut store = SetupStore::new();
            let errors = store
                .assign_parameter("minimize", Some(ParamValue::Textual("yes".to_string())))
                .unwrap_err()
                .errors;
            assert_eq!(errors, vec!["minimize is invalid".to_string()]);
        }
    }

    mod reset {
        use super::*;

        #[test]
        fn invalid_reset_leaves_every_field_untouched() {
            let mut store = store_with_chains(&[('A', "ACGU")]);
            store.set(Stage(2)).unwrap();
            let before = store.snapshot();

            let mut bad = before.clone();
            bad.compounds
                .push(Compound::new(Chain::new('B'), CompoundType::RNA, "".chars(), 1));
            bad.global.temperature = -5.0;

            let errors = store.reset(bad).unwrap_err().errors;
            assert!(errors.len() >= 2);
            assert_eq!(store.snapshot(), before);
        }

        #[test]
        fn successful_reset_replays_every_field() {
            let mut store = SetupStore::new();
            let fields = Rc::new(RefCell::new(Vec::new()));
            let sink = fields.clone();
            store.subscribe_all(Box::new(move |affected| {
                sink.borrow_mut().push(affected.to_vec())
            }));

            let mut data = SetupData::default();
            data.compounds.push(rna_compound('A', "ACGU"));
            store.reset(data).unwrap();

            assert_eq!(store.compounds().len(), 1);
            let fields = fields.borrow();
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].len(), Field::ALL.len());
        }
    }

    mod updates {
        use super::*;

        #[test]
        fn update_at_replaces_in_place_after_validation() {
            let mut store = store_with_chains(&[('A', "ACGUACGU")]);
            store
                .add(Mobilizer::for_span(BondMobility::Rigid, 'A', 1, 2))
                .unwrap();

            store
                .update_at(0, Mobilizer::for_span(BondMobility::Free, 'A', 3, 4))
                .unwrap();
            assert_eq!(
                store.mobilizers()[0],
                Mobilizer::for_span(BondMobility::Free, 'A', 3, 4)
            );

            let result = store.update_at(0, Mobilizer::for_span(BondMobility::Free, 'A', 7, 12));
            assert!(result.is_err());
        }

        #[test]
        fn update_of_a_missing_item_is_an_error() {
            let mut store = store_with_chains(&[('A', "ACGU")]);
            let result = store.update(Mobilizer::for_chain(BondMobility::Rigid, 'A'));
            let errors = result.unwrap_err().errors;
            assert!(errors[0].contains("No matching entry"));
        }

        #[test]
        fn remove_many_commits_once() {
            let mut store = store_with_chains(&[('A', "ACGUACGU")]);
            store
                .add(Mobilizer::for_span(BondMobility::Rigid, 'A', 1, 2))
                .unwrap();
            store
                .add(Mobilizer::for_span(BondMobility::Rigid, 'A', 3, 4))
                .unwrap();

            let count = Rc::new(RefCell::new(0));
            let sink = count.clone();
            store.subscribe(Field::Mobilizers, Box::new(move |_| *sink.borrow_mut() += 1));

            let removed = store.remove_many(&[
                Mobilizer::for_span(BondMobility::Rigid, 'A', 1, 2),
                Mobilizer::for_span(BondMobility::Rigid, 'A', 3, 4),
                Mobilizer::for_span(BondMobility::Rigid, 'A', 5, 6),
            ]);
            assert_eq!(removed, 2);
            assert!(store.mobilizers().is_empty());
            assert_eq!(*count.borrow(), 1);
        }
    }

    mod reannounce {
        use super::*;

        #[test]
        fn reannounce_replays_current_values() {
            let mut store = store_with_chains(&[('A', "ACGU")]);

            let seen = Rc::new(RefCell::new(Vec::new()));
            let sink = seen.clone();
            store.subscribe(
                Field::Compounds,
                Box::new(move |value| sink.borrow_mut().push(value.clone())),
            );

            store.reannounce();
            let seen = seen.borrow();
            assert_eq!(seen.len(), 1);
            match &seen[0] {
                FieldValue::Compounds(compounds) => assert_eq!(compounds.len(), 1),
                other => panic!("unexpected payload: {:?}", other),
            }
        }
    }
}
