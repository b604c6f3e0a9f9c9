use crate::types::{ObjectId, ObjectIdError};
use std::sync::{LazyLock, Mutex, PoisonError};
use ulid::Generator;

///
/// GENERATOR
///
/// Process-wide monotonic generator. Ids minted in the same millisecond
/// increment the random part so creation order is preserved.
///

static GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::new()));

/// Generate an id using the global monotonic generator.
pub(crate) fn generate() -> Result<ObjectId, ObjectIdError> {
    // generator state stays valid even if a holder panicked
    let mut generator = GENERATOR.lock().unwrap_or_else(PoisonError::into_inner);

    generator
        .generate()
        .map(ObjectId::from)
        .map_err(|_| ObjectIdError::GeneratorOverflow)
}

///
/// TESTS
///
