use super::descriptor::{ArgSpec, IntRange, ParameterDescriptor, RealRange};
use std::collections::BTreeMap;
use std::sync::LazyLock;

fn boolean(name: &'static str, description: &'static str) -> ParameterDescriptor {
    ParameterDescriptor::fixed(name, description, ArgSpec::Boolean)
}

fn real(name: &'static str, description: &'static str, range: RealRange) -> ParameterDescriptor {
    ParameterDescriptor::fixed(name, description, ArgSpec::Real(range))
}

fn integral(name: &'static str, description: &'static str, range: IntRange) -> ParameterDescriptor {
    ParameterDescriptor::fixed(name, description, ArgSpec::Integral(range))
}

fn options(
    name: &'static str,
    description: &'static str,
    values: &[&str],
) -> ParameterDescriptor {
    ParameterDescriptor::fixed(
        name,
        description,
        ArgSpec::Options {
            options: values.iter().map(|v| v.to_string()).collect(),
            from_files: false,
        },
    )
}

/// The catalog of advanced parameters the engine understands.
///
/// Names and constraints follow the MMB command reference; the two
/// file-name parameters are dynamic, their legal values being whatever
/// files were uploaded alongside the job.
static CATALOG: LazyLock<BTreeMap<&'static str, ParameterDescriptor>> = LazyLock::new(|| {
    let scale = RealRange::at_least(0.0);
    let descriptors = vec![
        boolean("addAllAtomSterics", "Enable steric spheres on every atom"),
        boolean(
            "addAllHeavyAtomSterics",
            "Enable steric spheres on heavy atoms only",
        ),
        boolean(
            "addProteinBackboneSterics",
            "Enable sterics on protein backbone atoms",
        ),
        boolean(
            "addRNABackboneSterics",
            "Enable sterics on RNA backbone atoms",
        ),
        boolean("applyC1pSprings", "Attach springs to C1' atoms"),
        boolean(
            "calcBaseBodyFramesAtEveryTimeStep",
            "Recompute base body frames every integration step",
        ),
        boolean("calcEnergy", "Report potential energy during the run"),
        boolean(
            "constrainRigidSegments",
            "Replace rigid segments with constraints",
        ),
        real(
            "constraintTolerance",
            "Constraint solver tolerance",
            RealRange::above(0.0),
        ),
        real(
            "cutoffRadius",
            "Nonbonded interaction cutoff radius (nm)",
            RealRange::at_least(0.1),
        ),
        real(
            "densityAtomFraction",
            "Fraction of atoms fitted into the density map",
            RealRange::half_open(0.0, 1.0),
        ),
        real(
            "densityForceConstant",
            "Force constant coupling atoms to the density map",
            scale,
        ),
        real(
            "dutyCycle",
            "Fraction of each period spent with forces active",
            RealRange::open(0.0, 1.0),
        ),
        real(
            "excludedVolumeRadius",
            "Excluded-volume sphere radius (nm)",
            scale,
        ),
        real(
            "excludedVolumeStiffness",
            "Excluded-volume contact stiffness",
            scale,
        ),
        options(
            "firstResidueMobilizerType",
            "Mobility granted to the first residue of each chain",
            &["Rigid", "Free"],
        ),
        real(
            "globalAmberImproperTorsionScaleFactor",
            "Scale applied to AMBER improper torsions",
            scale,
        ),
        real(
            "globalBondBendScaleFactor",
            "Scale applied to bond-bend terms",
            scale,
        ),
        real(
            "globalBondStretchScaleFactor",
            "Scale applied to bond-stretch terms",
            scale,
        ),
        real(
            "globalBondTorsionScaleFactor",
            "Scale applied to bond-torsion terms",
            scale,
        ),
        real(
            "globalCoulombScaleFactor",
            "Scale applied to Coulomb interactions",
            scale,
        ),
        real(
            "globalGbsaScaleFactor",
            "Scale applied to GBSA solvation terms",
            scale,
        ),
        real(
            "globalVdwScaleFactor",
            "Scale applied to van der Waals interactions",
            scale,
        ),
        boolean("guessCoordinates", "Guess coordinates for missing atoms"),
        real(
            "initialSeparation",
            "Initial separation between chains (nm)",
            scale,
        ),
        real(
            "integratorAccuracy",
            "Relative accuracy target of the integrator",
            RealRange::half_open(0.0, 1.0),
        ),
        real(
            "integratorStepSize",
            "Fixed integrator step size (ps)",
            RealRange::above(0.0),
        ),
        options(
            "integratorType",
            "Numerical integrator used for dynamics",
            &["RungeKuttaMerson", "Verlet"],
        ),
        ParameterDescriptor::from_files(
            "leontisWesthofInFileName",
            "Leontis-Westhof interaction definition file",
        ),
        boolean(
            "loadTinkerParameterFile",
            "Load a Tinker parameter file before the run",
        ),
        boolean(
            "matchHydrogenAtomLocations",
            "Match hydrogen positions from the input structure",
        ),
        real(
            "matchingMinimizerTolerance",
            "Tolerance of the coordinate-matching minimizer",
            RealRange::above(0.0),
        ),
        boolean("minimize", "Run energy minimization instead of dynamics"),
        real(
            "monteCarloTemperature",
            "Temperature used by the Monte Carlo sampler",
            RealRange::above(0.0),
        ),
        real(
            "noseHooverTime",
            "Relaxation time of the Nose-Hoover thermostat (ps)",
            RealRange::above(0.0),
        ),
        real(
            "physicsRadius",
            "Radius around flexible atoms receiving full physics (nm)",
            scale,
        ),
        real(
            "planarityThreshold",
            "Threshold for treating a base as planar",
            RealRange::above(0.0),
        ),
        boolean("proteinCapping", "Add capping groups to protein chain ends"),
        boolean(
            "randomizeInitialVelocities",
            "Draw initial velocities from a Boltzmann distribution",
        ),
        boolean(
            "readPreviousFrameFile",
            "Start from the last frame of the previous stage",
        ),
        integral(
            "removeMomentumPeriod",
            "Steps between momentum removals",
            IntRange::at_least(1),
        ),
        boolean(
            "removeRigidBodyMomentum",
            "Remove whole-body momentum during dynamics",
        ),
        boolean(
            "safeParameters",
            "Restrict parameters to well-tested ranges",
        ),
        real(
            "scrubberPeriod",
            "Period of the force scrubber (ps)",
            RealRange::above(0.0),
        ),
        boolean("setChiBondMobility", "Enable chi bond mobility for nucleosides"),
        real(
            "smallGroupInertiaMultiplier",
            "Inertia multiplier for small rigid groups",
            RealRange::above(0.0),
        ),
        options(
            "thermostatType",
            "Thermostat coupling the system to the heat bath",
            &["NoseHoover", "Andersen"],
        ),
        ParameterDescriptor::from_files(
            "tinkerParameterFileName",
            "Tinker force-field parameter file",
        ),
        real(
            "twoTransformForceMultiplier",
            "Multiplier for two-transform forces",
            scale,
        ),
        boolean("useFixedStepSize", "Integrate with a fixed step size"),
        real(
            "vanderWallSphereRadius",
            "Van der Waals sphere radius (nm)",
            scale,
        ),
        integral(
            "velocityRescalingInterval",
            "Steps between velocity rescalings",
            IntRange::at_least(1),
        ),
        boolean("verbose", "Emit verbose engine diagnostics"),
        boolean("weldToGround", "Weld the first body to ground"),
    ];

    descriptors.into_iter().map(|d| (d.name, d)).collect()
});

/// The full parameter catalog, keyed by parameter name.
pub fn catalog() -> &'static BTreeMap<&'static str, ParameterDescriptor> {
    &CATALOG
}

/// Looks up one descriptor by name.
pub fn descriptor(name: &str) -> Option<&'static ParameterDescriptor> {
    CATALOG.get(name)
}

/// Names of every file-backed (dynamic) parameter in the catalog.
pub fn file_backed_parameters() -> impl Iterator<Item = &'static ParameterDescriptor> {
    CATALOG.values().filter(|d| d.is_file_backed())
}
