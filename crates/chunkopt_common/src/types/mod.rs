pub mod block;
pub mod entrypoint;
pub mod origin;
pub mod raw_idx;
pub mod reason;
pub mod source_location;
