pub use self::{board::*, candidate_grades::*};

pub(crate) mod board;
pub(crate) mod candidate_grades;
