//! Preprocessor input files: nodes, elements, stratigraphy, stream
//! specification and lake configuration.

mod elem;
mod lake;
mod node;
mod strat;
mod stream;

pub use elem::{PreprocElementRewriter, parse_element_rings};
pub use lake::{PreprocLakeRewriter, parse_lakes};
pub use node::{PreprocNodeRewriter, parse_node_coords};
pub use strat::PreprocStratRewriter;
pub use stream::{PreprocStreamRewriter, RatingTable, StreamReach, StreamSpec};
