pub mod groundwater;
pub mod helpers;
pub mod lake;
pub mod preproc;
pub mod rootzone;
pub mod streams;
pub mod swshed;
pub mod traits;
pub mod unsat;

pub use lake::LakeRewriter;
pub use swshed::SmallWatershedRewriter;
pub use traits::{Nested, RewriteContext, Rewritten, SubmodelRewriter};
pub use unsat::UnsatRewriter;
