// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod error;
pub mod filter;
pub mod ids;
pub mod labels;
pub mod messages;
pub mod model;
pub mod selection;
pub mod session;
pub mod view;

pub use error::*;
pub use filter::*;
pub use ids::*;
pub use labels::*;
pub use messages::*;
pub use model::*;
pub use selection::*;
pub use session::*;
pub use view::*;
