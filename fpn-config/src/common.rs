pub use anyhow::{ensure, Context, Result};
pub use noisy_float::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::path::Path;
