//! Library side of the runmark CLI: the inspect transforms, shared with the
//! binary and its tests.

pub mod transforms;
