/// Core functionality modules
///
/// The rentals document codec, the file-backed store, append intake and the
/// listing documents built on top of both stores.

pub mod codec;
pub mod file_store;
pub mod intake;
pub mod listing;

pub use codec::RecordCodec;
pub use file_store::FileRecordStore;
pub use intake::{RentalForm, RentalIntake};
pub use listing::Listing;
