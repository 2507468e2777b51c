//! Candidate column names for every label field, most preferred first.

/// Customer name.
pub const CUSTOMER_NAME: &[&str] = &["Customer Name", "Shipping Name", "Billing Name", "Name"];

/// Prescription type.
pub const PRESCRIPTION_TYPE: &[&str] = &["Prescription Type", "Prescription", "Lens Type"];

/// Explicit lens index text.
pub const INDEX_LENS: &[&str] = &["Index Lens", "Lens Index"];

/// Free-text lens notes.
pub const LENS_NOTES: &[&str] = &["Lens Notes", "Notes"];

/// Combined pupillary distance.
pub const SINGLE_PD: &[&str] = &["Single PD", "PD", "Pupillary Distance"];

/// Candidate names for one eye's measurements.
#[derive(Debug, Clone, Copy)]
pub struct EyeFields {
    /// Sphere
    pub sph: &'static [&'static str],
    /// Cylinder
    pub cyl: &'static [&'static str],
    /// Axis
    pub axis: &'static [&'static str],
    /// Near addition
    pub add: &'static [&'static str],
    /// Prism
    pub prism: &'static [&'static str],
    /// Prism base direction
    pub base: &'static [&'static str],
    /// Monocular pupillary distance
    pub pd: &'static [&'static str],
}

/// Right eye.
pub const OD: EyeFields = EyeFields {
    sph: &["OD SPH", "OD_SPH", "OD Sphere", "Sphere OD", "Right Sphere"],
    cyl: &["OD CYL", "OD_CYL", "OD Cylinder", "Cylinder OD", "Right Cylinder"],
    axis: &["OD AXIS", "OD_AXIS", "OD Axis", "Axis OD", "Right Axis"],
    add: &["OD ADD", "OD_ADD", "OD Add", "ADD OD", "Add OD"],
    prism: &["OD Prism", "OD_PRISM", "Prism OD"],
    base: &["OD Base", "OD_BASE", "Base OD"],
    pd: &["PD OD", "OD PD", "PD_OD", "OD_PD", "Right PD", "Pupillary Distance OD"],
};

/// Left eye.
pub const OS: EyeFields = EyeFields {
    sph: &["OS SPH", "OS_SPH", "OS Sphere", "Sphere OS", "Left Sphere"],
    cyl: &["OS CYL", "OS_CYL", "OS Cylinder", "Cylinder OS", "Left Cylinder"],
    axis: &["OS AXIS", "OS_AXIS", "OS Axis", "Axis OS", "Left Axis"],
    add: &["OS ADD", "OS_ADD", "OS Add", "ADD OS", "Add OS"],
    prism: &["OS Prism", "OS_PRISM", "Prism OS"],
    base: &["OS Base", "OS_BASE", "Base OS"],
    pd: &["PD OS", "OS PD", "PD_OS", "OS_PD", "Left PD", "Pupillary Distance OS"],
};
