//! Records persisted and exchanged by the Custodia storage-proof contract.
//!
//! Every type here has a canonical wire encoding (see `custodia-codec`) and a
//! serde representation used for configuration files and notifications.

pub mod address;
pub mod event;
pub mod file;
pub mod node;
pub mod pdp;
pub mod prove;
pub mod read;
pub mod settings;

mod serde_hex;

pub use address::*;
pub use event::*;
pub use file::*;
pub use node::*;
pub use pdp::*;
pub use prove::*;
pub use read::*;
pub use settings::*;

use custodia_codec::{Decode, DecodeError, Encode, ZeroCopySink, ZeroCopySource};

/// Write a list as `count || nested(item)*`.
pub(crate) fn write_list<T: Encode>(sink: &mut ZeroCopySink, items: &[T]) {
    sink.write_var_uint(items.len() as u64);
    for item in items {
        sink.write_nested(item);
    }
}

/// Read a list written by [`write_list`].
pub(crate) fn read_list<T: Decode>(
    source: &mut ZeroCopySource<'_>,
) -> custodia_codec::Result<Vec<T>> {
    let count = source.next_var_uint()?;
    // Every nested item takes at least one byte, so a larger count cannot fit.
    if count > source.remaining() as u64 {
        return Err(DecodeError::Malformed("list count exceeds input"));
    }
    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        items.push(source.next_nested()?);
    }
    Ok(items)
}
