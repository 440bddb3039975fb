/// A named strand of a biomolecule.
///
/// The single-character `name` is the primary cross-reference key every other
/// structural entity uses to point at a compound. `auth_name` is the external
/// display name used by depositors and defaults to `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub name: char,
    pub auth_name: String,
}

impl Chain {
    pub fn new(name: char) -> Self {
        Self {
            name,
            auth_name: name.to_string(),
        }
    }

    pub fn with_auth_name(name: char, auth_name: impl Into<String>) -> Self {
        Self {
            name,
            auth_name: auth_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_name_defaults_to_name() {
        let chain = Chain::new('A');
        assert_eq!(chain.auth_name, "A");
    }

    #[test]
    fn explicit_auth_name_is_kept() {
        let chain = Chain::with_auth_name('A', "H");
        assert_eq!(chain.name, 'A');
        assert_eq!(chain.auth_name, "H");
    }
}
