use phf::{Set, phf_set};

/// The fixed catalog of NtC dinucleotide conformer classes the engine accepts.
static NTC_CLASSES: Set<&'static str> = phf_set! {
    "AA00", "AA01", "AA02", "AA03", "AA04", "AA05", "AA06", "AA07", "AA08",
    "AA09", "AA10", "AA11", "AA12", "AA13",
    "AB01", "AB02", "AB03", "AB04", "AB05", "AB1S", "AB2S",
    "BA01", "BA05", "BA08", "BA09", "BA10", "BA13", "BA16", "BA17",
    "BB00", "BB01", "BB02", "BB03", "BB04", "BB05", "BB07", "BB08", "BB10",
    "BB11", "BB12", "BB13", "BB14", "BB15", "BB16", "BB17", "BB20",
    "BB1S", "BB2S",
    "IC01", "IC02", "IC03", "IC04", "IC05", "IC06", "IC07",
    "OP01", "OP02", "OP03", "OP04", "OP05", "OP06", "OP07", "OP08", "OP09",
    "OP10", "OP11", "OP12", "OP13", "OP14", "OP15", "OP16", "OP17", "OP18",
    "OP19", "OP20", "OP21", "OP22", "OP23", "OP24", "OP25", "OP26", "OP27",
    "OP28", "OP29", "OP30", "OP31", "OP1S", "OP2S", "OPS1",
    "SYN",
    "ZZ01", "ZZ02", "ZZ1S", "ZZ2S", "ZZS1", "ZZS2",
};

pub fn is_known_ntc_class(code: &str) -> bool {
    NTC_CLASSES.contains(code)
}

pub fn ntc_class_count() -> usize {
    NTC_CLASSES.len()
}

/// An assigned conformer class for a residue span of one chain.
///
/// The span is expressed in internal residue numbers and must cover at least
/// one dinucleotide step, hence `last_res_no > first_res_no`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NtcConformation {
    pub chain_name: char,
    pub first_res_no: isize,
    pub last_res_no: isize,
    pub ntc: String,
}

/// Model-wide weight applied to every NtC restraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NtcForceScaleFactor(pub f64);

impl Default for NtcForceScaleFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_contains_the_common_classes() {
        assert!(is_known_ntc_class("AA00"));
        assert!(is_known_ntc_class("BB00"));
        assert!(is_known_ntc_class("OP31"));
        assert!(is_known_ntc_class("SYN"));
    }

    #[test]
    fn catalog_rejects_unknown_codes() {
        assert!(!is_known_ntc_class("AA99"));
        assert!(!is_known_ntc_class("aa00"));
        assert!(!is_known_ntc_class(""));
    }

    #[test]
    fn catalog_has_the_full_class_set() {
        assert_eq!(ntc_class_count(), 96);
    }

    #[test]
    fn force_scale_factor_defaults_to_unity() {
        assert_eq!(NtcForceScaleFactor::default().0, 1.0);
    }
}
