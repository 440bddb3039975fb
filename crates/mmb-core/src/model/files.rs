/// A file uploaded alongside a job.
///
/// `size` stays `None` until the transport layer has reported it, and
/// `is_uploaded` flips once the transfer completed. The core never initiates
/// transfers; it only records what the upload subsystem tells it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalFile {
    pub name: String,
    pub size: Option<u64>,
    pub is_uploaded: bool,
}

impl AdditionalFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            is_uploaded: false,
        }
    }

    pub fn uploaded(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size: Some(size),
            is_uploaded: true,
        }
    }
}

/// The file pair a density-fit job runs against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DensityFitFiles {
    pub structure_file: Option<AdditionalFile>,
    pub density_map_file: Option<AdditionalFile>,
}

impl DensityFitFiles {
    pub fn is_complete(&self) -> bool {
        self.structure_file.is_some() && self.density_map_file.is_some()
    }
}
