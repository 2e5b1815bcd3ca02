/// The upload pipeline
///
/// One entry at a time: read the backing file (payload.rs describes the
/// multipart body, transport.rs actually sends it), interpret the outcome,
/// and on success clean the entry out of the roll (pipeline.rs).

pub mod payload;
pub mod pipeline;
pub mod transport;
