pub mod handler;

pub use handler::{
    consume_fragment_stream, emit, emit_template_chunks, whitespace_tokens, RemoteOutcome,
};
