pub mod block;
pub mod cursor;
pub mod record;
pub mod scanner;

pub use block::{infer_layer_count, remove_unlisted};
pub use cursor::LineCursor;
pub use record::{
    blank_reference, count_header, description, file_reference, is_blank, leading_int,
    pad_both, parse_token, reference_name, reference_tag, tokens,
};
pub use scanner::{
    CommentMarkers, DEFAULT_COMMENT_MARKERS, is_comment, skip_ahead, skip_ahead_with,
    try_skip_ahead,
};
