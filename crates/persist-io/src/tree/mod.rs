mod dates;
mod newick;
mod nexus;
mod reference;

pub use dates::{calendar_date, decimal_date, DEFAULT_TIP_DATE_PATTERN};
pub use newick::{PhyloTree, TreeNode};
pub use nexus::TreeFile;
pub use reference::{
    load_reference_date, parse_reference_date, reference_date, tip_dates, TipDate,
    TipDatePattern,
};
