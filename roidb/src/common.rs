pub use anyhow::{ensure, Context, Result};
pub use bbox::{prelude::*, TLBR};
pub use serde::{Deserialize, Deserializer, Serialize, Serializer};
pub use std::path::{Path, PathBuf};
