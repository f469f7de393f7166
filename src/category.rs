//! Per-category layout rules for the monthly report sheets.
//!
//! Each sheet of a report shares the same block structure, but a few positions
//! deviate: the aircraft sheet swaps its departure/arrival columns, the
//! cabotage row only physically exists in one sheet, and the mail sheet has a
//! row layout that cannot anchor entity discovery. These rules live here as
//! data so the populator never compares category indices inline.

/// Sheet position whose columns are in arrival, departure order
const SWAPPED_COLUMNS_POSITION: usize = 0;
/// Sheet position whose rows include every sub-category (no cabotage gap)
const IDENTITY_ROWS_POSITION: usize = 4;
/// Sheet position with the structurally different (mail) row layout
const NON_REFERENCE_POSITION: usize = 3;

const CABOTAGE_SUB_CATEGORY: usize = 3;
const CABOTAGE_OWNER: usize = 3;
const TRANSIT_DIRECTION: usize = 2;
const TRANSIT_OWNER: usize = 2;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Reference category {position} is out of range ({count} categories)")]
    ReferenceOutOfRange { position: usize, count: usize },

    #[error("Category {0} has a row layout that cannot be used as the reference")]
    NotReferenceCapable(usize),
}

/// How a sub-category index maps to a row offset inside an entity block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRemap {
    /// Row offset equals the sub-category index
    Identity,
    /// The cabotage row is missing, so every later sub-category shifts up one row
    AbsentCabotageRow,
}

impl RowRemap {
    pub fn offset(self, sub_category: usize) -> usize {
        match self {
            RowRemap::Identity => sub_category,
            RowRemap::AbsentCabotageRow if sub_category > 2 => sub_category - 1,
            RowRemap::AbsentCabotageRow => sub_category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDescriptor {
    /// Table column per direction index
    pub column_map: Vec<usize>,
    pub row_remap: RowRemap,
    /// Whether this sheet's row labels can anchor entity discovery
    pub reference_capable: bool,
}

impl CategoryDescriptor {
    pub fn column(&self, direction: usize) -> Option<usize> {
        self.column_map.get(direction).copied()
    }
}

/// Sub-categories and directions that only one category carries
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Exclusivity {
    /// (sub-category index, owning category index)
    pub sub_categories: Vec<(usize, usize)>,
    /// (direction index, owning category index)
    pub directions: Vec<(usize, usize)>,
}

impl Exclusivity {
    /// False when the combination hits a rule owned by another category
    pub fn allows(&self, category: usize, sub_category: usize, direction: usize) -> bool {
        let sub_ok = self
            .sub_categories
            .iter()
            .all(|&(sub, owner)| sub != sub_category || owner == category);
        let dir_ok = self
            .directions
            .iter()
            .all(|&(dir, owner)| dir != direction || owner == category);
        sub_ok && dir_ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLayout {
    descriptors: Vec<CategoryDescriptor>,
    exclusivity: Exclusivity,
    reference: usize,
}

impl CategoryLayout {
    /// The archive's known layout, derived from sheet positions
    pub fn positional(count: usize) -> Self {
        let descriptors = (0..count)
            .map(|position| CategoryDescriptor {
                column_map: if position == SWAPPED_COLUMNS_POSITION {
                    vec![2, 0, 6]
                } else {
                    vec![0, 2, 6]
                },
                row_remap: if position == IDENTITY_ROWS_POSITION {
                    RowRemap::Identity
                } else {
                    RowRemap::AbsentCabotageRow
                },
                reference_capable: position != NON_REFERENCE_POSITION,
            })
            .collect();

        Self {
            descriptors,
            exclusivity: Exclusivity {
                sub_categories: vec![(CABOTAGE_SUB_CATEGORY, CABOTAGE_OWNER)],
                directions: vec![(TRANSIT_DIRECTION, TRANSIT_OWNER)],
            },
            reference: 0,
        }
    }

    pub fn with_reference(mut self, position: usize) -> Result<Self, LayoutError> {
        let descriptor =
            self.descriptors
                .get(position)
                .ok_or(LayoutError::ReferenceOutOfRange {
                    position,
                    count: self.descriptors.len(),
                })?;
        if !descriptor.reference_capable {
            return Err(LayoutError::NotReferenceCapable(position));
        }
        self.reference = position;
        Ok(self)
    }

    pub fn reference(&self) -> usize {
        self.reference
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn descriptor(&self, category: usize) -> Option<&CategoryDescriptor> {
        self.descriptors.get(category)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = (usize, &CategoryDescriptor)> {
        self.descriptors.iter().enumerate()
    }

    pub fn allows(&self, category: usize, sub_category: usize, direction: usize) -> bool {
        self.exclusivity.allows(category, sub_category, direction)
    }
}
