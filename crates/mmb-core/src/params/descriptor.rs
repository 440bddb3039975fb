use super::value::{ParamKind, ParamValue};
use crate::model::files::AdditionalFile;

/// Inclusive integral bounds; `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntRange {
    pub fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Real bounds with per-bound exclusivity, so ranges like `(0, 1]` are
/// expressible.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RealRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub exclusive_min: bool,
    pub exclusive_max: bool,
}

impl RealRange {
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            ..Self::default()
        }
    }

    pub fn above(min: f64) -> Self {
        Self {
            min: Some(min),
            exclusive_min: true,
            ..Self::default()
        }
    }

    /// The open-below, closed-above range `(min, max]`.
    pub fn half_open(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            exclusive_min: true,
            exclusive_max: false,
        }
    }

    /// The fully open range `(min, max)`.
    pub fn open(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            exclusive_min: true,
            exclusive_max: true,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let above_min = match self.min {
            Some(min) if self.exclusive_min => value > min,
            Some(min) => value >= min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) if self.exclusive_max => value < max,
            Some(max) => value <= max,
            None => true,
        };
        above_min && below_max
    }
}

/// The concrete, resolved argument specification of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgSpec {
    Integral(IntRange),
    Real(RealRange),
    Boolean,
    Textual { allow_empty: bool },
    Options { options: Vec<String>, from_files: bool },
}

impl ArgSpec {
    pub fn kind(&self) -> ParamKind {
        match self {
            ArgSpec::Integral(_) => ParamKind::Integral,
            ArgSpec::Real(_) => ParamKind::Real,
            ArgSpec::Boolean => ParamKind::Boolean,
            ArgSpec::Textual { .. } => ParamKind::Textual,
            ArgSpec::Options { .. } => ParamKind::Options,
        }
    }

    /// Checks that the value's variant matches this specification's kind.
    pub fn type_checks(&self, value: &ParamValue) -> bool {
        value.kind() == self.kind()
    }

    /// Checks the value against the range or membership constraint.
    ///
    /// File-backed option lists are exempt from the membership check; the
    /// store's file fix-up rule owns that invariant.
    pub fn validates(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ArgSpec::Integral(range), ParamValue::Integral(v)) => range.contains(*v),
            (ArgSpec::Real(range), ParamValue::Real(v)) => range.contains(*v),
            (ArgSpec::Boolean, ParamValue::Boolean(_)) => true,
            (ArgSpec::Textual { allow_empty }, ParamValue::Textual(v)) => {
                *allow_empty || !v.is_empty()
            }
            (
                ArgSpec::Options {
                    options,
                    from_files,
                },
                ParamValue::Option(v),
            ) => *from_files || options.iter().any(|o| o == v),
            _ => false,
        }
    }

    /// The value a freshly-assigned parameter starts from, when one exists.
    pub fn default_value(&self) -> Option<ParamValue> {
        match self {
            ArgSpec::Boolean => Some(ParamValue::Boolean(false)),
            ArgSpec::Options { options, .. } => {
                options.first().map(|o| ParamValue::Option(o.clone()))
            }
            _ => None,
        }
    }
}

/// Model state a dynamic descriptor draws its constraints from.
#[derive(Debug, Clone, Copy)]
pub struct DynamicContext<'a> {
    pub additional_files: &'a [AdditionalFile],
}

impl DynamicContext<'_> {
    pub fn file_names(&self) -> Vec<String> {
        self.additional_files
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }
}

/// Where a descriptor's argument specification comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgSource {
    /// Constraints fixed at catalog-definition time.
    Static(ArgSpec),
    /// Options instantiated per use from the uploaded file names.
    DynamicFiles,
}

/// A named, typed advanced-parameter definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    source: ArgSource,
}

impl ParameterDescriptor {
    pub const fn fixed(name: &'static str, description: &'static str, spec: ArgSpec) -> Self {
        Self {
            name,
            description,
            source: ArgSource::Static(spec),
        }
    }

    pub const fn from_files(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            source: ArgSource::DynamicFiles,
        }
    }

    pub fn is_file_backed(&self) -> bool {
        matches!(self.source, ArgSource::DynamicFiles)
    }

    /// Resolves the concrete argument specification for the given context.
    ///
    /// Resolution is idempotent and side-effect-free; static descriptors
    /// ignore the context entirely.
    pub fn resolve(&self, ctx: &DynamicContext) -> ArgSpec {
        match &self.source {
            ArgSource::Static(spec) => spec.clone(),
            ArgSource::DynamicFiles => ArgSpec::Options {
                options: ctx.file_names(),
                from_files: true,
            },
        }
    }

    pub fn default_value(&self, ctx: &DynamicContext) -> Option<ParamValue> {
        self.resolve(ctx).default_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with(names: &[&str]) -> Vec<AdditionalFile> {
        names.iter().map(|n| AdditionalFile::new(*n)).collect()
    }

    mod ranges {
        use super::*;

        #[test]
        fn int_range_bounds_are_inclusive() {
            let range = IntRange {
                min: Some(0),
                max: Some(10),
            };
            assert!(range.contains(0));
            assert!(range.contains(10));
            assert!(!range.contains(-1));
            assert!(!range.contains(11));
            assert!(IntRange::default().contains(i64::MIN));
        }

        #[test]
        fn real_range_honors_per_bound_exclusivity() {
            let half_open = RealRange::half_open(0.0, 1.0);
            assert!(!half_open.contains(0.0));
            assert!(half_open.contains(1.0));
            assert!(half_open.contains(0.5));

            let open = RealRange::open(0.0, 1.0);
            assert!(!open.contains(0.0));
            assert!(!open.contains(1.0));

            assert!(RealRange::at_least(0.1).contains(0.1));
            assert!(!RealRange::at_least(0.1).contains(0.05));
            assert!(!RealRange::above(0.0).contains(0.0));
        }

        #[test]
        fn real_range_rejects_non_finite_values() {
            let range = RealRange::default();
            assert!(!range.contains(f64::NAN));
            assert!(!range.contains(f64::INFINITY));
        }
    }

    mod specs {
        use super::*;

        #[test]
        fn type_check_requires_matching_variant() {
            let spec = ArgSpec::Real(RealRange::at_least(0.1));
            assert!(spec.type_checks(&ParamValue::Real(0.5)));
            assert!(!spec.type_checks(&ParamValue::Integral(1)));
            assert!(!spec.type_checks(&ParamValue::Textual("0.5".into())));
        }

        #[test]
        fn validity_check_applies_range_and_membership() {
            let real = ArgSpec::Real(RealRange::at_least(0.1));
            assert!(real.validates(&ParamValue::Real(0.1)));
            assert!(!real.validates(&ParamValue::Real(0.05)));

            let options = ArgSpec::Options {
                options: vec!["Verlet".into(), "RungeKuttaMerson".into()],
                from_files: false,
            };
            assert!(options.validates(&ParamValue::Option("Verlet".into())));
            assert!(!options.validates(&ParamValue::Option("Euler".into())));
        }

        #[test]
        fn file_backed_options_skip_membership() {
            let spec = ArgSpec::Options {
                options: vec!["a.prm".into()],
                from_files: true,
            };
            assert!(spec.validates(&ParamValue::Option("anything.prm".into())));
        }

        #[test]
        fn defaults_exist_for_booleans_and_options() {
            assert_eq!(
                ArgSpec::Boolean.default_value(),
                Some(ParamValue::Boolean(false))
            );
            let options = ArgSpec::Options {
                options: vec!["NoseHoover".into(), "Andersen".into()],
                from_files: false,
            };
            assert_eq!(
                options.default_value(),
                Some(ParamValue::Option("NoseHoover".into()))
            );
            assert_eq!(ArgSpec::Integral(IntRange::default()).default_value(), None);
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn static_descriptors_ignore_the_context() {
            let descriptor = ParameterDescriptor::fixed(
                "cutoffRadius",
                "Nonbonded cutoff radius (nm)",
                ArgSpec::Real(RealRange::at_least(0.1)),
            );
            let files = ctx_with(&["a.prm"]);
            let ctx = DynamicContext {
                additional_files: &files,
            };
            assert!(!descriptor.is_file_backed());
            assert_eq!(
                descriptor.resolve(&ctx),
                ArgSpec::Real(RealRange::at_least(0.1))
            );
        }

        #[test]
        fn dynamic_descriptors_take_options_from_the_file_list() {
            let descriptor =
                ParameterDescriptor::from_files("tinkerParameterFileName", "Tinker parameter file");
            let files = ctx_with(&["amber.prm", "charmm.prm"]);
            let ctx = DynamicContext {
                additional_files: &files,
            };
            assert!(descriptor.is_file_backed());
            assert_eq!(
                descriptor.resolve(&ctx),
                ArgSpec::Options {
                    options: vec!["amber.prm".into(), "charmm.prm".into()],
                    from_files: true,
                }
            );
            assert_eq!(
                descriptor.default_value(&ctx),
                Some(ParamValue::Option("amber.prm".into()))
            );

            // Resolution is idempotent.
            assert_eq!(descriptor.resolve(&ctx), descriptor.resolve(&ctx));
        }
    }
}
