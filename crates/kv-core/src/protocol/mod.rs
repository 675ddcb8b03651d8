//! Protocol module containing the tokenizer, the message codec, and the
//! reserved key table shared by both directions.

pub mod codec;
pub mod field;
pub mod keys;
pub mod parser;
pub mod tokenizer;

pub use codec::{encode_message, KvMessage, KvWriter, Payload};
pub use field::FieldBuffer;
pub use keys::*;
pub use parser::{decode_message, KvPair, KvParser, ParseStep};
pub use tokenizer::{Token, Tokenizer};
