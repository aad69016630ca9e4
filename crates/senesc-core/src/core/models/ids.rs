use std::fmt;
use std::str::FromStr;

/// Classifies the photosynthetic organs whose elements are subject to senescence.
///
/// The model distinguishes laminae from stem-like organs when deciding whether
/// tissue death is triggered, so algorithms branch on this classification
/// rather than on free-form organ labels coming from the host pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhotosyntheticOrgan {
    /// Leaf lamina, the main site of protein storage and remobilisation.
    Blade,
    /// Internode of the stem.
    Internode,
    /// Leaf sheath wrapped around the stem.
    Sheath,
    /// Peduncle, the topmost internode bearing the ear.
    Peduncle,
    /// Ear (inflorescence).
    Ear,
}

impl PhotosyntheticOrgan {
    /// Returns the lowercase label used in tabular inputs and outputs.
    pub const fn as_str(self) -> &'static str {
        match self {
            PhotosyntheticOrgan::Blade => "blade",
            PhotosyntheticOrgan::Internode => "internode",
            PhotosyntheticOrgan::Sheath => "sheath",
            PhotosyntheticOrgan::Peduncle => "peduncle",
            PhotosyntheticOrgan::Ear => "ear",
        }
    }
}

impl fmt::Display for PhotosyntheticOrgan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotosyntheticOrgan {
    type Err = ();

    /// Parses an organ label into a `PhotosyntheticOrgan`.
    ///
    /// Matching is case-insensitive. Labels outside the modeled organ set
    /// (e.g. roots, grains) are rejected.
    ///
    /// # Errors
    ///
    /// Returns `()` if the label does not name a photosynthetic organ.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blade" | "lamina" => Ok(PhotosyntheticOrgan::Blade),
            "internode" => Ok(PhotosyntheticOrgan::Internode),
            "sheath" => Ok(PhotosyntheticOrgan::Sheath),
            "peduncle" => Ok(PhotosyntheticOrgan::Peduncle),
            "ear" => Ok(PhotosyntheticOrgan::Ear),
            _ => Err(()),
        }
    }
}

/// Identifies the root compartment of one axis.
///
/// There is exactly one root compartment per axis, so the pair
/// (plant, axis) is a complete address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootsId {
    /// Index of the plant in the stand (1-based in the usual datasets).
    pub plant: u32,
    /// Botanical label of the axis (e.g. "MS" for the main stem, "T1" for a tiller).
    pub axis: String,
}

impl fmt::Display for RootsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.plant, self.axis)
    }
}

/// Identifies one photosynthetic element.
///
/// Elements are the finest grain the model works at: a labeled part of an
/// organ (e.g. the exposed and enclosed parts of a lamina), located by its
/// plant, axis and metamer. The derived ordering follows the topology, so
/// sorting by id yields the canonical row order of tabular outputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    /// Index of the plant in the stand.
    pub plant: u32,
    /// Botanical label of the axis.
    pub axis: String,
    /// Rank of the phytomer bearing the organ.
    pub metamer: u32,
    /// Organ class of the element.
    pub organ: PhotosyntheticOrgan,
    /// Label of the element within its organ (e.g. "LeafElement1").
    pub element: String,
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.plant, self.axis, self.metamer, self.organ, self.element
        )
    }
}
